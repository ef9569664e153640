//! Bit level packing of codes, most significant bit first.
use crate::{Code, LzwError, MAX_CODESIZE};

/// Appends variable width codes to a byte buffer.
///
/// Codes are staged in a 64-bit buffer whose top bits are the next to be written. Full bytes are
/// moved out after every code, so at most 7 bits stay pending between writes.
pub struct BitWriter {
    /// The finished bytes.
    bytes: Vec<u8>,
    /// Maximum number of bytes we may produce.
    limit: usize,
    /// The buffer bits.
    buffer: u64,
    /// The number of valid buffer bits.
    bits_in_buffer: u8,
    /// Total number of bits written so far.
    bit_len: usize,
}

/// Reads variable width codes from a byte buffer.
///
/// The reader is bounded by a bit length instead of the byte length, so the zero padding at the
/// end of a stream is never mistaken for a code.
pub struct BitReader<'a> {
    inp: &'a [u8],
    bit_buffer: u64,
    bits: u8,
    /// Bits of the stream not yet returned by `read`.
    remaining: usize,
    /// Bits already returned by `read`.
    offset: usize,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::with_limit(usize::MAX)
    }

    /// A writer that fails as soon as more than `limit` bytes would be produced.
    pub fn with_limit(limit: usize) -> Self {
        BitWriter {
            bytes: Vec::new(),
            limit,
            buffer: 0,
            bits_in_buffer: 0,
            bit_len: 0,
        }
    }

    /// Append the low `width` bits of `code`.
    pub fn write(&mut self, code: Code, width: u8) -> Result<(), LzwError> {
        check_width(width)?;
        let mask = (1u64 << width) - 1;
        let shift = 64 - self.bits_in_buffer - width;
        self.buffer |= (u64::from(code) & mask) << shift;
        self.bits_in_buffer += width;
        self.bit_len += usize::from(width);

        while self.bits_in_buffer >= 8 {
            self.push_byte()?;
            self.bits_in_buffer -= 8;
        }

        Ok(())
    }

    /// Number of bits written so far.
    pub fn bit_len(&self) -> usize {
        self.bit_len
    }

    /// Pad the last byte with zeros and return the bytes with the exact bit length.
    pub fn finish(mut self) -> Result<(Vec<u8>, usize), LzwError> {
        if self.bits_in_buffer > 0 {
            // The low bits of the buffer are always clear, so this is the padding.
            self.push_byte()?;
            self.bits_in_buffer = 0;
        }

        debug_assert_eq!(self.bytes.len(), (self.bit_len + 7) / 8);
        Ok((self.bytes, self.bit_len))
    }

    fn push_byte(&mut self) -> Result<(), LzwError> {
        if self.bytes.len() >= self.limit {
            return Err(LzwError::OutputBufferOverflow {
                capacity: self.limit,
            });
        }

        self.bytes.push((self.buffer >> 56) as u8);
        self.buffer <<= 8;
        Ok(())
    }
}

impl Default for BitWriter {
    fn default() -> Self {
        BitWriter::new()
    }
}

impl<'a> BitReader<'a> {
    /// Read the first `bit_len` bits of `inp`.
    pub fn new(inp: &'a [u8], bit_len: usize) -> Result<Self, LzwError> {
        let available = inp.len().saturating_mul(8);
        if bit_len > available {
            return Err(LzwError::TruncatedStream {
                needed: bit_len,
                available,
            });
        }

        let used = bit_len / 8 + usize::from(bit_len % 8 != 0);
        Ok(BitReader {
            inp: &inp[..used],
            bit_buffer: 0,
            bits: 0,
            remaining: bit_len,
            offset: 0,
        })
    }

    /// Extract the next `width` bits as a code.
    pub fn read(&mut self, width: u8) -> Result<Code, LzwError> {
        check_width(width)?;
        if self.remaining < usize::from(width) {
            return Err(LzwError::TruncatedStream {
                needed: usize::from(width),
                available: self.remaining,
            });
        }

        if self.bits < width {
            self.refill_bits();
        }

        let mask = (1 << width) - 1;
        let rotbuf = self.bit_buffer.rotate_left(width.into());
        self.bit_buffer = rotbuf & !mask;
        self.bits -= width;
        self.remaining -= usize::from(width);
        self.offset += usize::from(width);
        Ok((rotbuf & mask) as Code)
    }

    /// Whether every bit of the stream has been read.
    pub fn is_empty(&self) -> bool {
        self.remaining == 0
    }

    /// Bits not yet read.
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    /// Current bit offset from the start of the stream.
    pub fn offset(&self) -> usize {
        self.offset
    }

    fn refill_bits(&mut self) {
        let wish_count = (64 - self.bits) / 8;
        let mut buffer = [0u8; 8];
        let new_bits = match self.inp.get(..usize::from(wish_count)) {
            Some(bytes) => {
                buffer[..usize::from(wish_count)].copy_from_slice(bytes);
                self.inp = &self.inp[usize::from(wish_count)..];
                wish_count * 8
            }
            None => {
                let new_bits = self.inp.len() * 8;
                buffer[..self.inp.len()].copy_from_slice(self.inp);
                self.inp = &[];
                new_bits as u8
            }
        };
        self.bit_buffer |= u64::from_be_bytes(buffer) >> self.bits;
        self.bits += new_bits;
    }
}

fn check_width(width: u8) -> Result<(), LzwError> {
    if (1..=MAX_CODESIZE).contains(&width) {
        Ok(())
    } else {
        Err(LzwError::InvalidCodeWidth { width })
    }
}
