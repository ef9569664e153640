//! A self-describing byte layout for partitioned streams.
//!
//! ```text
//! magic "PLZW" | version u8 | count u32 | count * (bit_len u64, decoded_len u64) | segments
//! ```
//!
//! All integers are big endian. The segments follow back to back, each `ceil(bit_len / 8)`
//! bytes long.
use crate::partition::{self, Compressed, SegmentHeader};
use crate::{LzwError, Strategy};

const MAGIC: [u8; 4] = *b"PLZW";
const VERSION: u8 = 1;
const FIXED_LEN: usize = MAGIC.len() + 1 + 4;
const ENTRY_LEN: usize = 16;

/// A parsed or freshly compressed archive, borrowing nothing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Archive {
    compressed: Compressed,
}

impl Archive {
    /// Compress `data` in `segments` independent parts.
    pub fn compress(data: &[u8], segments: usize, strategy: Strategy) -> Result<Self, LzwError> {
        let compressed = partition::parallel_compress_with(data, segments, strategy)?;
        Ok(Archive { compressed })
    }

    /// Restore the original data.
    pub fn decompress(&self) -> Result<Vec<u8>, LzwError> {
        partition::parallel_decompress(&self.compressed.header, &self.compressed.segments)
    }

    pub fn header(&self) -> &[SegmentHeader] {
        &self.compressed.header
    }

    pub fn segments(&self) -> &[Vec<u8>] {
        &self.compressed.segments
    }

    /// Total length of the original data.
    pub fn decoded_len(&self) -> usize {
        self.header()
            .iter()
            .fold(0, |total, head| total.saturating_add(head.decoded_len))
    }

    /// Serialize header and segments into one buffer.
    pub fn to_bytes(&self) -> Vec<u8> {
        let payload: usize = self.segments().iter().map(Vec::len).sum();
        let mut out = Vec::with_capacity(FIXED_LEN + ENTRY_LEN * self.header().len() + payload);
        out.extend_from_slice(&MAGIC);
        out.push(VERSION);
        out.extend_from_slice(&(self.header().len() as u32).to_be_bytes());
        for head in self.header() {
            out.extend_from_slice(&(head.bit_len as u64).to_be_bytes());
            out.extend_from_slice(&(head.decoded_len as u64).to_be_bytes());
        }
        for segment in self.segments() {
            out.extend_from_slice(segment);
        }
        out
    }

    /// Parse the output of [`to_bytes`](Self::to_bytes).
    pub fn from_bytes(mut data: &[u8]) -> Result<Self, LzwError> {
        if take(&mut data, MAGIC.len())? != MAGIC {
            return Err(invalid("bad magic"));
        }

        if take(&mut data, 1)?[0] != VERSION {
            return Err(invalid("unsupported version"));
        }

        let count = u32::from_be_bytes(array(take(&mut data, 4)?)) as usize;
        if count == 0 {
            return Err(invalid("no segments"));
        }
        // Guards the allocation below against absurd counts.
        if count > data.len() / ENTRY_LEN {
            return Err(invalid("header truncated"));
        }

        let mut header = Vec::with_capacity(count);
        for _ in 0..count {
            let bit_len = read_len(&mut data)?;
            let decoded_len = read_len(&mut data)?;
            header.push(SegmentHeader {
                bit_len,
                decoded_len,
            });
        }

        let mut segments = Vec::with_capacity(count);
        for head in &header {
            segments.push(take(&mut data, head.byte_len())?.to_vec());
        }

        if !data.is_empty() {
            return Err(invalid("trailing bytes"));
        }

        Ok(Archive {
            compressed: Compressed { header, segments },
        })
    }
}

impl From<Compressed> for Archive {
    fn from(compressed: Compressed) -> Self {
        Archive { compressed }
    }
}

impl From<Archive> for Compressed {
    fn from(archive: Archive) -> Self {
        archive.compressed
    }
}

fn invalid(reason: &'static str) -> LzwError {
    LzwError::InvalidHeader { reason }
}

fn take<'a>(data: &mut &'a [u8], len: usize) -> Result<&'a [u8], LzwError> {
    if data.len() < len {
        return Err(invalid("unexpected end of data"));
    }

    let (head, tail) = data.split_at(len);
    *data = tail;
    Ok(head)
}

fn array<const N: usize>(bytes: &[u8]) -> [u8; N] {
    let mut out = [0; N];
    out.copy_from_slice(bytes);
    out
}

fn read_len(data: &mut &[u8]) -> Result<usize, LzwError> {
    let value = u64::from_be_bytes(array(take(data, 8)?));
    usize::try_from(value).map_err(|_| invalid("length out of range"))
}
