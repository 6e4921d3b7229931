//! The sequence store: an immutable, random-access collection of 2-bit
//! encoded nucleotide sequences.
//!
//! The store holds one or two collections (a primary collection and an
//! optional query collection). It is built once, before any indexing starts,
//! and afterwards only handed around by shared reference; extension workers
//! all read the same store concurrently.

use anyhow::{Context, Result};
use std::ops::Deref;
use std::path::Path;

/// Code for a base that cannot take part in an exact seed (N and friends).
pub const WILDCARD: u8 = 0xFF;

/// ASCII to 2-bit code (A=0, C=1, G=2, T/U=3, everything else wildcard).
const ENCODE_LUT: [u8; 256] = {
    let mut lut = [WILDCARD; 256];
    lut[b'A' as usize] = 0;
    lut[b'a' as usize] = 0;
    lut[b'C' as usize] = 1;
    lut[b'c' as usize] = 1;
    lut[b'G' as usize] = 2;
    lut[b'g' as usize] = 2;
    lut[b'T' as usize] = 3;
    lut[b't' as usize] = 3;
    lut[b'U' as usize] = 3;
    lut[b'u' as usize] = 3;
    lut
};

#[inline(always)]
pub fn encode_base(base: u8) -> u8 {
    ENCODE_LUT[base as usize]
}

#[inline(always)]
pub fn complement_code(code: u8) -> u8 {
    if code < 4 {
        3 - code
    } else {
        WILDCARD
    }
}

/// True when two codes represent the same unambiguous base.
#[inline(always)]
pub fn codes_match(a: u8, b: u8) -> bool {
    a < 4 && a == b
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Strand {
    Forward,
    Reverse,
}

impl Strand {
    pub fn symbol(self) -> char {
        match self {
            Strand::Forward => 'F',
            Strand::Reverse => 'R',
        }
    }
}

/// Which of the two collections a sequence index refers to. With a single
/// input both sides of the comparison use `Primary`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Primary,
    Query,
}

/// One immutable encoded sequence. Never mutated after construction.
#[derive(Debug, Clone)]
pub struct EncodedSequence {
    codes: Vec<u8>,
}

impl EncodedSequence {
    pub fn from_bases(bases: &[u8]) -> Self {
        let codes = bases.iter().map(|&b| encode_base(b)).collect();
        EncodedSequence { codes }
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    #[inline(always)]
    pub fn codes(&self) -> &[u8] {
        &self.codes
    }

    /// Codes of the reverse-complement strand, materialized.
    pub fn reverse_complement(&self) -> Vec<u8> {
        self.codes
            .iter()
            .rev()
            .map(|&c| complement_code(c))
            .collect()
    }
}

/// The random-access store over one or two sequence collections.
pub struct SequenceStore {
    primary: Vec<EncodedSequence>,
    query: Vec<EncodedSequence>,
}

impl SequenceStore {
    pub fn from_fasta_file(path: &Path) -> Result<Self> {
        let primary = read_fasta(path)?;
        Ok(SequenceStore {
            primary,
            query: Vec::new(),
        })
    }

    pub fn from_fasta_pair(primary_path: &Path, query_path: &Path) -> Result<Self> {
        let primary = read_fasta(primary_path)?;
        let query = read_fasta(query_path)?;
        Ok(SequenceStore { primary, query })
    }

    /// Build a store directly from raw base strings (test fixtures and the
    /// brute-force verifier use this).
    pub fn from_raw_sequences(primary: &[&[u8]], query: Option<&[&[u8]]>) -> Self {
        SequenceStore {
            primary: primary
                .iter()
                .map(|bases| EncodedSequence::from_bases(bases))
                .collect(),
            query: query
                .map(|seqs| {
                    seqs.iter()
                        .map(|bases| EncodedSequence::from_bases(bases))
                        .collect()
                })
                .unwrap_or_default(),
        }
    }

    pub fn has_query_collection(&self) -> bool {
        !self.query.is_empty()
    }

    /// The collection the second side of the comparison draws from: the query
    /// collection when present, otherwise the primary one (self comparison).
    pub fn second_collection(&self) -> Collection {
        if self.has_query_collection() {
            Collection::Query
        } else {
            Collection::Primary
        }
    }

    fn sequences(&self, collection: Collection) -> &[EncodedSequence] {
        match collection {
            Collection::Primary => &self.primary,
            Collection::Query => &self.query,
        }
    }

    pub fn num_sequences(&self, collection: Collection) -> usize {
        self.sequences(collection).len()
    }

    #[inline]
    pub fn seq(&self, collection: Collection, idx: usize) -> &EncodedSequence {
        &self.sequences(collection)[idx]
    }

    pub fn seq_len(&self, collection: Collection, idx: usize) -> usize {
        self.seq(collection, idx).len()
    }

    /// Length of the longest sequence over both collections. The maximum
    /// permissible seed length is derived from this.
    pub fn longest_seq_len(&self) -> usize {
        self.primary
            .iter()
            .chain(self.query.iter())
            .map(|s| s.len())
            .max()
            .unwrap_or(0)
    }

    /// Base composition over both collections, wildcards excluded.
    pub fn composition(&self) -> [u64; 4] {
        let mut counts = [0u64; 4];
        for seq in self.primary.iter().chain(self.query.iter()) {
            for &code in seq.codes() {
                if code < 4 {
                    counts[code as usize] += 1;
                }
            }
        }
        counts
    }

    /// Strand-oriented code view of one sequence under the selected
    /// computation-amortization policy. Both policies must deliver identical
    /// codes; they differ only in how the bases are fetched.
    pub fn codes_view(
        &self,
        collection: Collection,
        idx: usize,
        strand: Strand,
        cam: CamPolicy,
    ) -> CodesView<'_> {
        let seq = self.seq(collection, idx);
        match (strand, cam) {
            (Strand::Forward, CamPolicy::Direct) => CodesView::Borrowed(seq.codes()),
            (Strand::Forward, CamPolicy::Buffered) => {
                CodesView::Owned(BufferedCodeReader::new(seq.codes()).collect())
            }
            (Strand::Reverse, CamPolicy::Direct) => CodesView::Owned(seq.reverse_complement()),
            (Strand::Reverse, CamPolicy::Buffered) => {
                let rc = seq.reverse_complement();
                CodesView::Owned(BufferedCodeReader::new(&rc).collect())
            }
        }
    }
}

fn read_fasta(path: &Path) -> Result<Vec<EncodedSequence>> {
    let reader = bio::io::fasta::Reader::from_file(path)
        .with_context(|| format!("cannot open sequence file {}", path.display()))?;
    let mut seqs = Vec::new();
    for record in reader.records() {
        let record =
            record.with_context(|| format!("malformed FASTA record in {}", path.display()))?;
        seqs.push(EncodedSequence::from_bases(record.seq()));
    }
    Ok(seqs)
}

/// Performance-only choice of sequence access during extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CamPolicy {
    /// Random access into the encoded store.
    Direct,
    /// Buffered sequential reads through a fixed-size chunk window.
    Buffered,
}

impl CamPolicy {
    pub const NAMES: [&'static str; 2] = ["direct", "buffered"];

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "direct" => Some(CamPolicy::Direct),
            "buffered" => Some(CamPolicy::Buffered),
            _ => None,
        }
    }
}

/// A strand-oriented run of codes, either borrowed straight from the store or
/// materialized by one of the access policies.
pub enum CodesView<'a> {
    Borrowed(&'a [u8]),
    Owned(Vec<u8>),
}

impl Deref for CodesView<'_> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            CodesView::Borrowed(codes) => codes,
            CodesView::Owned(codes) => codes,
        }
    }
}

const READER_CHUNK: usize = 4096;

/// Pull-based sequential reader over a code slice. Each call to `next`
/// serves from an internal chunk window that is refilled in `READER_CHUNK`
/// blocks; the stage owns only its source slice and releases it on drop.
pub struct BufferedCodeReader<'a> {
    source: &'a [u8],
    buffered_until: usize,
    pos: usize,
}

impl<'a> BufferedCodeReader<'a> {
    pub fn new(source: &'a [u8]) -> Self {
        BufferedCodeReader {
            source,
            buffered_until: 0,
            pos: 0,
        }
    }
}

impl Iterator for BufferedCodeReader<'_> {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        if self.pos >= self.source.len() {
            return None;
        }
        if self.pos >= self.buffered_until {
            self.buffered_until = (self.buffered_until + READER_CHUNK).min(self.source.len());
        }
        let code = self.source[self.pos];
        self.pos += 1;
        Some(code)
    }
}
