//! Dictionaries mapping a `(prefix, byte)` pair to the code of the extended sequence.
//!
//! Two interchangeable implementations exist. [`HashDictionary`] indexes the entries with an
//! open addressing hash table probed by double hashing, [`ScanDictionary`] compares the pair
//! against every live entry. Both assign the same codes at the same time, so they produce
//! identical streams.
use crate::{Code, INVALID_CODE, MAX_CODESIZE, MAX_ENTRIES, MIN_CODESIZE, ROOT_ENTRIES};

/// Number of buckets in the hashed dictionary.
///
/// Root entries are never hashed, so at most `MAX_ENTRIES - ROOT_ENTRIES` buckets are occupied
/// and every probe sequence reaches an empty bucket.
pub(crate) const HASH_SLOTS: usize = 2 * MAX_ENTRIES;
const SLOT_BITS: u32 = HASH_SLOTS.trailing_zeros();

/// One dictionary entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DictionaryEntry {
    /// Code of the sequence this entry extends, `INVALID_CODE` for roots.
    pub prefix: Code,
    /// The byte appended to the prefix sequence.
    pub ext: u8,
    /// The code of this entry.
    pub code: Code,
}

/// Selects the dictionary implementation used by an encoder.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Strategy {
    /// Open addressing with double hashing.
    #[default]
    Hashed,
    /// Linear scan over all live entries.
    Scan,
}

/// The code table of an encoder.
pub trait Dictionary {
    /// Drop all non-root entries and restart the code width at 8 bits.
    fn reset(&mut self);
    /// Look up the code of `prefix` extended by `ext`.
    fn find(&self, prefix: Code, ext: u8) -> Option<Code>;
    /// Assign the next code to `prefix` extended by `ext`.
    ///
    /// A full table is reset instead and the pair is dropped, in which case `None` is returned.
    /// The first code written after such a reset is always a root, exactly like at the start of
    /// a stream, which keeps the decoder in step.
    fn add(&mut self, prefix: Code, ext: u8) -> Option<Code>;
    /// Number of live entries, roots included.
    fn len(&self) -> usize;
    /// Width in bits of the next code to be written.
    fn code_size(&self) -> u8;
    /// The entry with the given code, if it is assigned.
    fn entry(&self, code: Code) -> Option<DictionaryEntry>;
}

/// The code width schedule shared by encoder and decoder.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct CodeSize(u8);

/// Code-indexed entries and the current code width.
struct Entries {
    entries: Vec<DictionaryEntry>,
    code_size: CodeSize,
}

pub struct HashDictionary {
    entries: Entries,
    slots: Box<[Slot]>,
    occupied: Box<[bool]>,
}

pub struct ScanDictionary {
    entries: Entries,
}

#[derive(Clone, Copy, Default)]
struct Slot {
    prefix: Code,
    ext: u8,
    code: Code,
}

pub(crate) fn boxed(strategy: Strategy) -> Box<dyn Dictionary + Send + 'static> {
    match strategy {
        Strategy::Hashed => Box::new(HashDictionary::new()),
        Strategy::Scan => Box::new(ScanDictionary::new()),
    }
}

fn key(prefix: Code, ext: u8) -> u32 {
    (u32::from(prefix) << 8) | u32::from(ext)
}

/// Start bucket of the probe sequence.
pub(crate) fn hash1(prefix: Code, ext: u8) -> usize {
    (key(prefix, ext).wrapping_mul(0x9e37_79b1) >> (32 - SLOT_BITS)) as usize
}

/// Stride of the probe sequence. Always odd, hence coprime to the table size.
pub(crate) fn hash2(prefix: Code, ext: u8) -> usize {
    (key(prefix, ext).wrapping_mul(0x85eb_ca6b) >> (32 - SLOT_BITS)) as usize | 1
}

/// All buckets in probe order for a pair.
fn probe(prefix: Code, ext: u8) -> impl Iterator<Item = usize> {
    let start = hash1(prefix, ext);
    let step = hash2(prefix, ext);
    (0..HASH_SLOTS).map(move |i| start.wrapping_add(i.wrapping_mul(step)) & (HASH_SLOTS - 1))
}

impl DictionaryEntry {
    fn root(byte: u8) -> Self {
        DictionaryEntry {
            prefix: INVALID_CODE,
            ext: byte,
            code: Code::from(byte),
        }
    }

    /// Whether this is one of the 256 single byte entries.
    pub fn is_root(&self) -> bool {
        self.prefix == INVALID_CODE
    }
}

impl CodeSize {
    pub(crate) const fn initial() -> Self {
        CodeSize(MIN_CODESIZE)
    }

    /// Widen by one bit once `size` codes no longer fit the current width.
    pub(crate) fn grow(&mut self, size: usize) {
        if size >= 1 << self.0 && self.0 < MAX_CODESIZE {
            self.0 += 1;
        }
    }

    pub(crate) fn get(self) -> u8 {
        self.0
    }
}

impl Entries {
    fn new() -> Self {
        let mut entries = Entries {
            entries: Vec::with_capacity(MAX_ENTRIES),
            code_size: CodeSize::initial(),
        };
        entries.reset();
        entries
    }

    fn reset(&mut self) {
        self.entries.clear();
        self.entries
            .extend((0..ROOT_ENTRIES).map(|byte| DictionaryEntry::root(byte as u8)));
        self.code_size = CodeSize::initial();
    }

    /// The code for the next entry, widening first if needed.
    ///
    /// Resets and returns `None` when the table is full.
    fn next_code(&mut self) -> Option<Code> {
        let size = self.entries.len();
        if size >= MAX_ENTRIES {
            tracing::debug!(entries = size, "dictionary full, resetting");
            self.reset();
            return None;
        }

        self.code_size.grow(size);
        Some(size as Code)
    }

    fn push(&mut self, prefix: Code, ext: u8, code: Code) {
        debug_assert_eq!(usize::from(code), self.entries.len());
        self.entries.push(DictionaryEntry { prefix, ext, code });
    }

    fn get(&self, code: Code) -> Option<DictionaryEntry> {
        self.entries.get(usize::from(code)).copied()
    }
}

impl HashDictionary {
    pub fn new() -> Self {
        HashDictionary {
            entries: Entries::new(),
            slots: vec![Slot::default(); HASH_SLOTS].into_boxed_slice(),
            occupied: vec![false; HASH_SLOTS].into_boxed_slice(),
        }
    }

    /// Number of occupied hash buckets.
    pub fn occupied(&self) -> usize {
        self.occupied.iter().filter(|&&used| used).count()
    }
}

impl Default for HashDictionary {
    fn default() -> Self {
        HashDictionary::new()
    }
}

impl Dictionary for HashDictionary {
    fn reset(&mut self) {
        self.entries.reset();
        self.occupied.fill(false);
    }

    fn find(&self, prefix: Code, ext: u8) -> Option<Code> {
        for idx in probe(prefix, ext) {
            if !self.occupied[idx] {
                return None;
            }

            let slot = &self.slots[idx];
            if slot.prefix == prefix && slot.ext == ext {
                return Some(slot.code);
            }
        }

        None
    }

    fn add(&mut self, prefix: Code, ext: u8) -> Option<Code> {
        let code = match self.entries.next_code() {
            Some(code) => code,
            None => {
                self.occupied.fill(false);
                return None;
            }
        };

        let free = probe(prefix, ext).find(|&idx| !self.occupied[idx]);
        debug_assert!(free.is_some(), "hash table without a free bucket");
        if let Some(idx) = free {
            self.slots[idx] = Slot { prefix, ext, code };
            self.occupied[idx] = true;
        }

        self.entries.push(prefix, ext, code);
        Some(code)
    }

    fn len(&self) -> usize {
        self.entries.entries.len()
    }

    fn code_size(&self) -> u8 {
        self.entries.code_size.get()
    }

    fn entry(&self, code: Code) -> Option<DictionaryEntry> {
        self.entries.get(code)
    }
}

impl ScanDictionary {
    pub fn new() -> Self {
        ScanDictionary {
            entries: Entries::new(),
        }
    }
}

impl Default for ScanDictionary {
    fn default() -> Self {
        ScanDictionary::new()
    }
}

impl Dictionary for ScanDictionary {
    fn reset(&mut self) {
        self.entries.reset();
    }

    fn find(&self, prefix: Code, ext: u8) -> Option<Code> {
        self.entries.entries[ROOT_ENTRIES..]
            .iter()
            .find(|entry| entry.prefix == prefix && entry.ext == ext)
            .map(|entry| entry.code)
    }

    fn add(&mut self, prefix: Code, ext: u8) -> Option<Code> {
        let code = self.entries.next_code()?;
        self.entries.push(prefix, ext, code);
        Some(code)
    }

    fn len(&self) -> usize {
        self.entries.entries.len()
    }

    fn code_size(&self) -> u8 {
        self.entries.code_size.get()
    }

    fn entry(&self, code: Code) -> Option<DictionaryEntry> {
        self.entries.get(code)
    }
}
