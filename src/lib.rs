//! # Segmented LZW encoder and decoder
//!
//! This crate provides an LZW [`Encoder`](encode::Encoder) and
//! [`Decoder`](decode::Decoder) with a fixed code width schedule and bit packing, plus a
//! partitioner that runs many independent codec instances over disjoint slices of one input.
//!
//! The stream format is deliberately bare. There is no clear code and no end code:
//!
//!  * codes `0..=255` are the single bytes, every later code is assigned in insertion order,
//!  * the first code of a pass is written with 8 bits, after that the width grows by one bit
//!    whenever the dictionary size reaches the next power of two, up to 12 bits,
//!  * codes are packed most significant bit first and the last byte is padded with zeros,
//!  * the stream length is carried out of band in bits.
//!
//! When the dictionary holds 4096 entries the next insertion resets it instead, and the stream
//! continues exactly as if a new pass had started.
//!
//! Exemplary use:
//!
//! ```
//! let data = b"TOBEORNOTTOBEORTOBEORNOT";
//! let encoded = parlzw::compress(data);
//! let decoded = parlzw::decompress(&encoded.bytes, encoded.bit_len).unwrap();
//! assert_eq!(&decoded[..], &data[..]);
//! ```
//!
//! Large inputs can be split into segments that are compressed in parallel:
//!
//! ```
//! let data = vec![7u8; 10_000];
//! let compressed = parlzw::parallel_compress(&data, 4).unwrap();
//! let restored = parlzw::parallel_decompress(&compressed.header, &compressed.segments).unwrap();
//! assert_eq!(restored, data);
//! ```
pub(crate) const MIN_CODESIZE: u8 = 8;
pub(crate) const MAX_CODESIZE: u8 = 12;
pub(crate) const MAX_ENTRIES: usize = 1 << MAX_CODESIZE as usize;
/// Number of single byte codes present in every fresh dictionary.
pub(crate) const ROOT_ENTRIES: usize = 1 << MIN_CODESIZE as usize;

/// Alias for a LZW code point
pub type Code = u16;

/// Prefix value carried by the 256 single byte root entries.
pub const INVALID_CODE: Code = Code::MAX;

mod bits;
pub mod container;
pub mod decode;
pub mod dict;
pub mod encode;
mod error;
pub mod partition;

pub use crate::bits::{BitReader, BitWriter};
pub use crate::container::Archive;
pub use crate::dict::Strategy;
pub use crate::encode::Encoded;
pub use crate::error::LzwError;
pub use crate::partition::{
    parallel_compress, parallel_compress_with, parallel_decompress, split, Compressed, Partition,
    SegmentHeader,
};

/// Compress `data` with a fresh hashed dictionary.
pub fn compress(data: &[u8]) -> Encoded {
    encode::Encoder::new().encode(data)
}

/// Decompress a stream of `bit_len` bits produced by [`compress`].
pub fn decompress(data: &[u8], bit_len: usize) -> Result<Vec<u8>, LzwError> {
    decode::Decoder::new().decode(data, bit_len)
}
