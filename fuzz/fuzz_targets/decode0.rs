#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|raw_data: &[u8]| {
    let _ = parlzw::decompress(raw_data, raw_data.len() * 8);
    let _ = parlzw::Archive::from_bytes(raw_data).and_then(|archive| archive.decompress());
});
