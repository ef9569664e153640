//! Exact streams for small inputs.
use parlzw::{compress, decompress, encode::Encoder};

#[test]
fn empty() {
    let encoded = compress(&[]);
    assert!(encoded.bytes.is_empty());
    assert_eq!(encoded.bit_len, 0);
    assert_eq!(decompress(&[], 0).unwrap(), b"");
}

#[test]
fn single_bytes() {
    for byte in 0..=255u8 {
        let encoded = compress(&[byte]);
        assert_eq!(encoded.bytes, [byte]);
        assert_eq!(encoded.bit_len, 8);
        assert_eq!(decompress(&encoded.bytes, 8).unwrap(), [byte]);
    }
}

#[test]
fn four_a() {
    let encoded = compress(b"AAAA");
    assert_eq!(encoded.bytes, [0x41, 0x80, 0x10, 0x40]);
    assert_eq!(encoded.byte_len(), 4);
    assert_eq!(decompress(&encoded.bytes, encoded.bit_len).unwrap(), b"AAAA");
}

#[test]
fn abaabaaab() {
    let data = b"ABAABAAAB";
    assert_eq!(
        Encoder::new().codes(data),
        [(65, 8), (66, 9), (65, 9), (256, 9), (258, 9), (256, 9)]
    );

    let encoded = compress(data);
    assert_eq!(encoded.bit_len, 53);
    assert_eq!(encoded.byte_len(), 7);
    assert_eq!(decompress(&encoded.bytes, encoded.bit_len).unwrap(), data);
}

#[test]
fn tobeornot() {
    let data = b"TOBEORNOTTOBEORTOBEORNOT";
    let codes: Vec<u16> = Encoder::new().codes(data).into_iter().map(|(c, _)| c).collect();
    assert_eq!(
        codes,
        [84, 79, 66, 69, 79, 82, 78, 79, 84, 256, 258, 260, 265, 259, 261, 263]
    );
    let encoded = compress(data);
    assert_eq!(encoded.bit_len, 8 + 15 * 9);
    assert_eq!(decompress(&encoded.bytes, encoded.bit_len).unwrap(), data);
}

#[test]
fn width_reaches_ten_in_step() {
    // Varied enough to grow the dictionary past 1024 entries.
    let data: Vec<u8> = (0..2000u32).map(|i| (i * 7 % 256) as u8 ^ (i / 256) as u8).collect();
    let codes = Encoder::new().codes(&data);
    for (idx, &(_, width)) in codes.iter().enumerate() {
        // The n-th code (n >= 1) is written after n - 1 insertions that followed the first one.
        let size = 256 + idx;
        let expected = match idx {
            0 => 8,
            _ if size <= 512 => 9,
            _ if size <= 1024 => 10,
            _ if size <= 2048 => 11,
            _ => 12,
        };
        assert_eq!(width, expected, "code {}", idx);
    }
    let encoded = compress(&data);
    assert_eq!(decompress(&encoded.bytes, encoded.bit_len).unwrap(), data);
}
