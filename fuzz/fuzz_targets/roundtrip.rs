#![no_main]
use libfuzzer_sys::fuzz_target;
use parlzw::{compress, decompress, parallel_compress, parallel_decompress};

fuzz_target!(|data: &[u8]| {
    let encoded = compress(data);
    let decoded = decompress(&encoded.bytes, encoded.bit_len);
    assert!(decoded.as_deref() == Ok(data), "{:?}", decoded.err());

    let count = usize::from(data.first().copied().unwrap_or(1) % 8) + 1;
    let compressed = parallel_compress(data, count).unwrap();
    let restored = parallel_decompress(&compressed.header, &compressed.segments);
    assert!(restored.as_deref() == Ok(data), "{:?}", restored.err());
});
