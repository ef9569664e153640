use thiserror::Error;

use crate::Code;

/// The fatal conditions of the codec.
///
/// An empty input and a full dictionary are not errors. The first yields an empty stream, the
/// second resets the dictionary as part of normal control flow.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LzwError {
    /// The produced data does not fit the caller supplied buffer.
    #[error("output exceeds the buffer capacity of {capacity} bytes")]
    OutputBufferOverflow {
        /// Capacity of the destination in bytes.
        capacity: usize,
    },

    /// A code was read that is neither assigned nor the next code to be assigned.
    #[error("code {code} at bit {bit_offset} is undefined, next assignable code is {next}")]
    MalformedBitstream {
        /// The offending code.
        code: Code,
        /// Bit offset of the code within its stream.
        bit_offset: usize,
        /// The code the decoder would assign next.
        next: Code,
    },

    /// Fewer bits remain than the next read requires.
    #[error("stream truncated: {needed} bits needed but only {available} available")]
    TruncatedStream {
        /// Bits required by the read.
        needed: usize,
        /// Bits actually left.
        available: usize,
    },

    /// A code was to be packed or unpacked with a width outside `1..=12` bits.
    #[error("code width of {width} bits is not supported")]
    InvalidCodeWidth {
        /// The requested width.
        width: u8,
    },

    /// A partitioned operation was asked for zero segments.
    #[error("at least one segment is required")]
    InvalidSegmentCount,

    /// The header does not describe the supplied segments.
    #[error("segment {index} does not match its header entry")]
    SegmentMismatch {
        /// Index of the first inconsistent segment, or the header length if counts differ.
        index: usize,
    },

    /// A segment decoded to a different length than its header announced.
    #[error("segment {index} decoded to {actual} bytes, header announced {expected}")]
    LengthMismatch {
        /// Index of the segment.
        index: usize,
        /// Length from the header.
        expected: usize,
        /// Length actually decoded.
        actual: usize,
    },

    /// A serialized archive could not be parsed.
    #[error("invalid archive: {reason}")]
    InvalidHeader {
        /// What went wrong.
        reason: &'static str,
    },
}
