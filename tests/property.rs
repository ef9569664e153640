use parlzw::{
    compress, decompress, encode::Encoder, parallel_compress, parallel_decompress, SegmentHeader,
};
use proptest::prelude::*;

proptest! {
    #[test]
    fn roundtrip(data in prop::collection::vec(any::<u8>(), 0..4096)) {
        let encoded = compress(&data);
        prop_assert_eq!(decompress(&encoded.bytes, encoded.bit_len).unwrap(), data);
    }

    #[test]
    fn roundtrip_small_alphabet(data in prop::collection::vec(0u8..3, 0..20_000)) {
        let encoded = compress(&data);
        prop_assert_eq!(decompress(&encoded.bytes, encoded.bit_len).unwrap(), data);
    }

    #[test]
    fn parallel_roundtrip(
        data in prop::collection::vec(any::<u8>(), 0..2048),
        count in 1usize..20,
    ) {
        let compressed = parallel_compress(&data, count).unwrap();
        prop_assert_eq!(parallel_decompress(&compressed.header, &compressed.segments).unwrap(), data);
    }

    #[test]
    fn bit_length_is_sum_of_widths(data in prop::collection::vec(0u8..8, 1..10_000)) {
        let codes = Encoder::new().codes(&data);
        let encoded = compress(&data);
        let total: usize = codes.iter().map(|&(_, width)| usize::from(width)).sum();
        prop_assert_eq!(encoded.bit_len, total);
        prop_assert_eq!(encoded.bytes.len(), (total + 7) / 8);
        prop_assert!(codes.iter().all(|&(code, width)| (8..=12).contains(&width) && code < 1 << width));
    }

    #[test]
    fn corrupt_streams_never_panic(
        data in prop::collection::vec(any::<u8>(), 0..512),
        bit_len in 0usize..5000,
    ) {
        let _ = decompress(&data, bit_len);
    }

    #[test]
    fn arbitrary_headers_never_panic(
        header in prop::collection::vec((any::<usize>(), any::<usize>()), 0..8),
        segments in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..64), 0..8),
    ) {
        let header: Vec<SegmentHeader> = header
            .into_iter()
            .map(|(bit_len, decoded_len)| SegmentHeader { bit_len, decoded_len })
            .collect();
        let _ = parallel_decompress(&header, &segments);
    }

    #[test]
    fn consistent_headers_never_panic(
        segments in prop::collection::vec(prop::collection::vec(any::<u8>(), 1..64), 1..8),
        padding in 0usize..8,
        decoded_len in any::<usize>(),
    ) {
        // Byte lengths agree, so every segment reaches the decoder.
        let header: Vec<SegmentHeader> = segments
            .iter()
            .map(|segment| SegmentHeader {
                bit_len: segment.len() * 8 - padding,
                decoded_len,
            })
            .collect();
        let _ = parallel_decompress(&header, &segments);
    }
}
