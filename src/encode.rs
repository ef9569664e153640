//! A module for all encoding needs.
use crate::bits::BitWriter;
use crate::dict::{self, Dictionary, Strategy};
use crate::{Code, LzwError};

/// An LZW compressor.
///
/// Each call to one of the `encode` methods is an independent pass that starts from a fresh
/// dictionary, so an encoder can be reused for any number of inputs.
pub struct Encoder {
    dict: Box<dyn Dictionary + Send + 'static>,
}

/// A compressed stream together with its exact length in bits.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Encoded {
    /// The packed codes, the last byte padded with zero bits.
    pub bytes: Vec<u8>,
    /// The number of meaningful bits in `bytes`.
    pub bit_len: usize,
}

/// Receives every emitted code with the width it is written at.
trait CodeSink {
    fn put(&mut self, code: Code, width: u8) -> Result<(), LzwError>;
}

impl Encoder {
    /// An encoder with the hashed dictionary.
    pub fn new() -> Self {
        Encoder::with_strategy(Strategy::Hashed)
    }

    pub fn with_strategy(strategy: Strategy) -> Self {
        Encoder {
            dict: dict::boxed(strategy),
        }
    }

    /// Compress all of `inp`.
    pub fn encode(&mut self, inp: &[u8]) -> Encoded {
        match self.encode_limited(inp, usize::MAX) {
            Ok(encoded) => encoded,
            Err(err) => unreachable!("unbounded output failed: {}", err),
        }
    }

    /// Compress `inp` into `out`, returning the number of bits written.
    ///
    /// Fails with [`LzwError::OutputBufferOverflow`] as soon as the stream outgrows `out`. The
    /// contents of `out` are unspecified in that case.
    pub fn encode_into(&mut self, inp: &[u8], out: &mut [u8]) -> Result<usize, LzwError> {
        let encoded = self.encode_limited(inp, out.len())?;
        out[..encoded.bytes.len()].copy_from_slice(&encoded.bytes);
        Ok(encoded.bit_len)
    }

    /// The codes `encode` would emit for `inp`, each with its bit width.
    pub fn codes(&mut self, inp: &[u8]) -> Vec<(Code, u8)> {
        let mut codes = Vec::new();
        match self.run(inp, &mut codes) {
            Ok(()) => codes,
            Err(err) => unreachable!("collecting codes failed: {}", err),
        }
    }

    fn encode_limited(&mut self, inp: &[u8], limit: usize) -> Result<Encoded, LzwError> {
        let mut writer = BitWriter::with_limit(limit);
        self.run(inp, &mut writer)?;
        let (bytes, bit_len) = writer.finish()?;
        Ok(Encoded { bytes, bit_len })
    }

    fn run(&mut self, inp: &[u8], sink: &mut impl CodeSink) -> Result<(), LzwError> {
        self.dict.reset();

        let (&first, rest) = match inp.split_first() {
            Some(split) => split,
            None => return Ok(()),
        };

        // The code corresponding to the currently matched characters.
        let mut current_code = Code::from(first);
        for &byte in rest {
            match self.dict.find(current_code, byte) {
                Some(code) => current_code = code,
                None => {
                    // Written at the width in effect before the insertion below.
                    sink.put(current_code, self.dict.code_size())?;
                    self.dict.add(current_code, byte);
                    current_code = Code::from(byte);
                }
            }
        }

        sink.put(current_code, self.dict.code_size())
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Encoder::new()
    }
}

impl Encoded {
    /// Length of the stream in bytes, `bit_len` rounded up.
    pub fn byte_len(&self) -> usize {
        self.bytes.len()
    }
}

impl CodeSink for BitWriter {
    fn put(&mut self, code: Code, width: u8) -> Result<(), LzwError> {
        self.write(code, width)
    }
}

impl CodeSink for Vec<(Code, u8)> {
    fn put(&mut self, code: Code, width: u8) -> Result<(), LzwError> {
        self.push((code, width));
        Ok(())
    }
}
