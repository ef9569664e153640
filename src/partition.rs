//! Splitting one input into contiguous segments that are coded independently.
//!
//! Every segment gets its own encoder with its own dictionary, nothing is shared between them.
//! With the `parallel` feature the segments are processed on the rayon thread pool, otherwise one
//! after another. Both produce identical output.
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::decode::Decoder;
use crate::dict::Strategy;
use crate::encode::Encoder;
use crate::LzwError;

/// A slice `offset..offset + len` of the input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Partition {
    pub offset: usize,
    pub len: usize,
}

/// What the decoder needs to know about one compressed segment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SegmentHeader {
    /// Exact length of the compressed segment in bits.
    pub bit_len: usize,
    /// Length of the original slice in bytes.
    pub decoded_len: usize,
}

/// The result of [`parallel_compress`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Compressed {
    /// One entry per segment, in input order.
    pub header: Vec<SegmentHeader>,
    /// The compressed segments, in input order.
    pub segments: Vec<Vec<u8>>,
}

/// Split `len` bytes into `count` contiguous partitions.
///
/// The first `len % count` partitions are one byte longer than the rest. Zero partitions are
/// returned for a zero `count`.
pub fn split(len: usize, count: usize) -> Vec<Partition> {
    if count == 0 {
        return Vec::new();
    }

    let base = len / count;
    let longer = len % count;
    let mut offset = 0;
    (0..count)
        .map(|idx| {
            let len = base + usize::from(idx < longer);
            let part = Partition { offset, len };
            offset += len;
            part
        })
        .collect()
}

/// Compress `data` as `count` independent segments with hashed dictionaries.
pub fn parallel_compress(data: &[u8], count: usize) -> Result<Compressed, LzwError> {
    parallel_compress_with(data, count, Strategy::Hashed)
}

/// Compress `data` as `count` independent segments.
pub fn parallel_compress_with(
    data: &[u8],
    count: usize,
    strategy: Strategy,
) -> Result<Compressed, LzwError> {
    if count == 0 {
        return Err(LzwError::InvalidSegmentCount);
    }

    let parts = split(data.len(), count);
    tracing::trace!(len = data.len(), segments = count, ?strategy, "partitioned input");

    let results = map_segments(&parts, |idx, part| {
        let slice = &data[part.offset..part.offset + part.len];
        let encoded = Encoder::with_strategy(strategy).encode(slice);
        tracing::debug!(
            segment = idx,
            input = part.len,
            output = encoded.byte_len(),
            "segment compressed"
        );
        let header = SegmentHeader {
            bit_len: encoded.bit_len,
            decoded_len: part.len,
        };
        (header, encoded.bytes)
    });

    let (header, segments) = results.into_iter().unzip();
    Ok(Compressed { header, segments })
}

/// Decompress the segments described by `header` and concatenate them.
pub fn parallel_decompress<S>(header: &[SegmentHeader], segments: &[S]) -> Result<Vec<u8>, LzwError>
where
    S: AsRef<[u8]> + Sync,
{
    if header.len() != segments.len() {
        return Err(LzwError::SegmentMismatch {
            index: header.len().min(segments.len()),
        });
    }

    if let Some(index) = header
        .iter()
        .zip(segments)
        .position(|(head, segment)| head.byte_len() != segment.as_ref().len())
    {
        return Err(LzwError::SegmentMismatch { index });
    }

    let jobs: Vec<_> = header.iter().zip(segments).collect();
    let decoded = map_segments(&jobs, |index, &(head, segment)| {
        let out = Decoder::new().decode_limited(segment.as_ref(), head.bit_len, head.decoded_len)?;
        if out.len() != head.decoded_len {
            return Err(LzwError::LengthMismatch {
                index,
                expected: head.decoded_len,
                actual: out.len(),
            });
        }
        tracing::debug!(segment = index, output = out.len(), "segment decompressed");
        Ok(out)
    });

    let decoded = decoded.into_iter().collect::<Result<Vec<_>, _>>()?;
    Ok(decoded.concat())
}

impl SegmentHeader {
    /// Length of the compressed segment in bytes.
    pub fn byte_len(&self) -> usize {
        self.bit_len / 8 + usize::from(self.bit_len % 8 != 0)
    }
}

impl Partition {
    pub fn end(&self) -> usize {
        self.offset + self.len
    }
}

/// Run `work` once per item, in parallel if enabled, collecting results in item order.
fn map_segments<T, R, F>(items: &[T], work: F) -> Vec<R>
where
    T: Sync,
    R: Send,
    F: Fn(usize, &T) -> R + Send + Sync,
{
    #[cfg(feature = "parallel")]
    {
        items
            .par_iter()
            .enumerate()
            .map(|(idx, item)| work(idx, item))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        items
            .iter()
            .enumerate()
            .map(|(idx, item)| work(idx, item))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{parallel_compress, parallel_decompress, split, Partition, SegmentHeader};
    use crate::{compress, LzwError};

    #[test]
    fn split_covers_input() {
        for len in [0usize, 1, 7, 10, 99, 1000] {
            for count in 1..12 {
                let parts = split(len, count);
                assert_eq!(parts.len(), count);
                let mut expected_offset = 0;
                for (idx, part) in parts.iter().enumerate() {
                    assert_eq!(part.offset, expected_offset);
                    assert_eq!(part.len, len / count + usize::from(idx < len % count));
                    expected_offset = part.end();
                }
                assert_eq!(expected_offset, len);
            }
        }
    }

    #[test]
    fn split_uneven() {
        assert_eq!(
            split(10, 3),
            [
                Partition { offset: 0, len: 4 },
                Partition { offset: 4, len: 3 },
                Partition { offset: 7, len: 3 },
            ]
        );
        assert!(split(10, 0).is_empty());
    }

    #[test]
    fn single_segment_matches_plain() {
        let data = b"TOBEORNOTTOBEORTOBEORNOT";
        let compressed = parallel_compress(data, 1).unwrap();
        let plain = compress(data);
        assert_eq!(compressed.segments, [plain.bytes]);
        assert_eq!(
            compressed.header,
            [SegmentHeader {
                bit_len: plain.bit_len,
                decoded_len: data.len(),
            }]
        );
    }

    #[test]
    fn more_segments_than_bytes() {
        let compressed = parallel_compress(b"abc", 5).unwrap();
        assert_eq!(compressed.header.len(), 5);
        assert_eq!(compressed.header[3], SegmentHeader::default());
        assert!(compressed.segments[4].is_empty());
        let restored = parallel_decompress(&compressed.header, &compressed.segments).unwrap();
        assert_eq!(restored, b"abc");
    }

    #[test]
    fn zero_segments() {
        assert_eq!(parallel_compress(b"abc", 0), Err(LzwError::InvalidSegmentCount));
    }

    #[test]
    fn header_must_match_segments() {
        let compressed = parallel_compress(b"hello hello hello", 3).unwrap();
        assert_eq!(
            parallel_decompress(&compressed.header[..2], &compressed.segments),
            Err(LzwError::SegmentMismatch { index: 2 })
        );

        let mut segments = compressed.segments.clone();
        segments[1].push(0);
        assert_eq!(
            parallel_decompress(&compressed.header, &segments),
            Err(LzwError::SegmentMismatch { index: 1 })
        );
    }

    #[test]
    fn decoded_length_is_checked() {
        let mut compressed = parallel_compress(b"hello hello hello", 2).unwrap();
        compressed.header[1].decoded_len += 1;
        assert_eq!(
            parallel_decompress(&compressed.header, &compressed.segments),
            Err(LzwError::LengthMismatch {
                index: 1,
                expected: 9,
                actual: 8,
            })
        );

        compressed.header[1].decoded_len -= 2;
        assert!(matches!(
            parallel_decompress(&compressed.header, &compressed.segments),
            Err(LzwError::OutputBufferOverflow { capacity: 7 })
        ));
    }
}
