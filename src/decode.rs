//! A module for all decoding needs.
use crate::bits::BitReader;
use crate::dict::CodeSize;
use crate::{Code, LzwError, MAX_ENTRIES, ROOT_ENTRIES};

/// An LZW decompressor.
///
/// Like the [`Encoder`](crate::encode::Encoder) every call is an independent pass with a fresh
/// table.
pub struct Decoder {
    table: Table,
}

/// A decoded byte sequence, stored as its location in the output produced so far.
///
/// The sequence of a new code is always the previous output followed by the first byte of the
/// current one. Both are adjacent in the output, so every entry is a contiguous range of it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Span {
    start: usize,
    len: usize,
}

/// The sequences of all codes beyond the roots, in assignment order.
struct Table {
    inner: Vec<Span>,
    code_size: CodeSize,
}

impl Decoder {
    pub fn new() -> Self {
        Decoder {
            table: Table::new(),
        }
    }

    /// Decompress the first `bit_len` bits of `inp`.
    pub fn decode(&mut self, inp: &[u8], bit_len: usize) -> Result<Vec<u8>, LzwError> {
        self.decode_limited(inp, bit_len, usize::MAX)
    }

    /// Decompress into `out`, returning the number of bytes written.
    ///
    /// Fails with [`LzwError::OutputBufferOverflow`] instead of truncating when the decoded data
    /// does not fit.
    pub fn decode_into(
        &mut self,
        inp: &[u8],
        bit_len: usize,
        out: &mut [u8],
    ) -> Result<usize, LzwError> {
        let decoded = self.decode_limited(inp, bit_len, out.len())?;
        out[..decoded.len()].copy_from_slice(&decoded);
        Ok(decoded.len())
    }

    /// Decompress, failing as soon as the output would exceed `limit` bytes.
    pub(crate) fn decode_limited(
        &mut self,
        inp: &[u8],
        bit_len: usize,
        limit: usize,
    ) -> Result<Vec<u8>, LzwError> {
        let mut out = Vec::with_capacity(limit.min(inp.len().saturating_mul(4)));
        self.advance(inp, bit_len, &mut out, limit)?;
        Ok(out)
    }

    fn advance(
        &mut self,
        inp: &[u8],
        bit_len: usize,
        out: &mut Vec<u8>,
        limit: usize,
    ) -> Result<(), LzwError> {
        let mut reader = BitReader::new(inp, bit_len)?;
        self.table.clear();

        // The output of the previous code, none at the start and after a reset.
        let mut last: Option<Span> = None;

        while !reader.is_empty() {
            let bit_offset = reader.offset();
            let code = reader.read(self.table.code_size.get())?;
            let start = out.len();

            let prev = match last {
                Some(prev) => prev,
                None => {
                    // Read with 8 bits, so this is always a root.
                    push_byte(out, limit, code as u8)?;
                    self.table.code_size.grow(ROOT_ENTRIES);
                    last = Some(Span { start, len: 1 });
                    continue;
                }
            };

            let next = self.table.next_code();
            if usize::from(code) < ROOT_ENTRIES {
                push_byte(out, limit, code as u8)?;
            } else if let Some(span) = self.table.at(code) {
                push_span(out, limit, span)?;
            } else if code == next {
                // The code the encoder assigned right before emitting it. Its sequence is the
                // previous one extended by its own first byte.
                push_span(out, limit, prev)?;
                let first = out[prev.start];
                push_byte(out, limit, first)?;
            } else {
                return Err(LzwError::MalformedBitstream {
                    code,
                    bit_offset,
                    next,
                });
            }

            let cleared = self.table.derive(Span {
                start: prev.start,
                len: prev.len + 1,
            });

            last = if cleared {
                None
            } else {
                Some(Span {
                    start,
                    len: out.len() - start,
                })
            };
        }

        Ok(())
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Decoder::new()
    }
}

fn push_byte(out: &mut Vec<u8>, limit: usize, byte: u8) -> Result<(), LzwError> {
    if out.len() >= limit {
        return Err(LzwError::OutputBufferOverflow { capacity: limit });
    }

    out.push(byte);
    Ok(())
}

fn push_span(out: &mut Vec<u8>, limit: usize, span: Span) -> Result<(), LzwError> {
    if span.len > limit.saturating_sub(out.len()) {
        return Err(LzwError::OutputBufferOverflow { capacity: limit });
    }

    out.extend_from_within(span.start..span.start + span.len);
    Ok(())
}

impl Table {
    fn new() -> Self {
        Table {
            inner: Vec::with_capacity(MAX_ENTRIES - ROOT_ENTRIES),
            code_size: CodeSize::initial(),
        }
    }

    fn clear(&mut self) {
        self.inner.clear();
        self.code_size = CodeSize::initial();
    }

    fn len(&self) -> usize {
        ROOT_ENTRIES + self.inner.len()
    }

    fn next_code(&self) -> Code {
        self.len() as Code
    }

    fn at(&self, code: Code) -> Option<Span> {
        let idx = usize::from(code).checked_sub(ROOT_ENTRIES)?;
        self.inner.get(idx).copied()
    }

    /// Append the sequence of the next code.
    ///
    /// The encoder widens its codes when it inserts an entry, one code before we see that entry,
    /// so the width is adjusted against the size after our insertion. A full table is cleared
    /// at once, since the encoder resets on its next insertion. Returns whether that happened.
    fn derive(&mut self, span: Span) -> bool {
        self.inner.push(span);
        let len = self.len();
        if len >= MAX_ENTRIES {
            tracing::debug!(entries = len, "decoder table full, resetting");
            self.clear();
            return true;
        }

        self.code_size.grow(len);
        false
    }
}

#[cfg(test)]
mod tests {
    use super::Decoder;
    use crate::encode::Encoder;
    use crate::{BitWriter, LzwError};

    fn pack(codes: &[(u16, u8)]) -> (Vec<u8>, usize) {
        let mut writer = BitWriter::new();
        for &(code, width) in codes {
            writer.write(code, width).unwrap();
        }
        writer.finish().unwrap()
    }

    #[test]
    fn empty_stream() {
        assert_eq!(Decoder::new().decode(&[], 0), Ok(vec![]));
    }

    #[test]
    fn single_code() {
        assert_eq!(Decoder::new().decode(&[0x7f], 8), Ok(vec![0x7f]));
    }

    #[test]
    fn repeated_code_is_synthesized() {
        let decoded = Decoder::new().decode(&[0x41, 0x80, 0x10, 0x40], 26);
        assert_eq!(decoded.unwrap(), b"AAAA");
    }

    #[test]
    fn decodes_known_codes() {
        let (bytes, bits) = pack(&[(65, 8), (66, 9), (65, 9), (256, 9), (258, 9), (256, 9)]);
        assert_eq!(bits, 53);
        assert_eq!(Decoder::new().decode(&bytes, bits).unwrap(), b"ABAABAAAB");
    }

    #[test]
    fn undefined_code() {
        let (bytes, bits) = pack(&[(65, 8), (300, 9)]);
        assert_eq!(
            Decoder::new().decode(&bytes, bits),
            Err(LzwError::MalformedBitstream {
                code: 300,
                bit_offset: 8,
                next: 256,
            })
        );
    }

    #[test]
    fn truncated_code() {
        assert_eq!(
            Decoder::new().decode(&[0x41, 0x80, 0x10, 0x40], 20),
            Err(LzwError::TruncatedStream {
                needed: 9,
                available: 3,
            })
        );
    }

    #[test]
    fn output_limit() {
        let mut out = [0u8; 3];
        assert_eq!(
            Decoder::new().decode_into(&[0x41, 0x80, 0x10, 0x40], 26, &mut out),
            Err(LzwError::OutputBufferOverflow { capacity: 3 })
        );

        let mut out = [0u8; 8];
        let len = Decoder::new()
            .decode_into(&[0x41, 0x80, 0x10, 0x40], 26, &mut out)
            .unwrap();
        assert_eq!(&out[..len], b"AAAA");
    }

    #[test]
    fn survives_resets() {
        // Long enough for several full tables.
        let data: Vec<u8> = (0..300_000u32)
            .map(|i| (i.wrapping_mul(2_654_435_761) >> 27) as u8)
            .collect();
        let encoded = Encoder::new().encode(&data);
        let decoded = Decoder::new().decode(&encoded.bytes, encoded.bit_len).unwrap();
        assert!(decoded == data);
    }

    #[test]
    fn long_runs() {
        // Runs grow by one byte per code, this fills the table twice.
        let data = vec![0u8; 12_000_000];
        let encoded = Encoder::new().encode(&data);
        let decoded = Decoder::new().decode(&encoded.bytes, encoded.bit_len).unwrap();
        assert!(decoded == data);
    }
}
