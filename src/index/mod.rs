//! K-mer index construction.
//!
//! The builder walks every position of a collection where a seed-length
//! window fits, computing 2-bit packed k-mer codes with a rolling window
//! (wildcards reset the window), and records one occurrence per position.
//! Occurrence tables are sorted by code and consumed read-only by the
//! frequency analyzer and the seed pair generator.

pub mod frequency;

use crate::sequence::{Collection, SequenceStore, Strand, WILDCARD};

/// One k-mer occurrence. `endpos` is the position of the last base of the
/// window, on the strand the table was built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KmerOccurrence {
    pub code: u64,
    pub seqnum: u32,
    pub endpos: u32,
}

/// An occurrence table for one (collection, strand) combination, sorted by
/// (code, seqnum, endpos). Immutable once built.
pub struct KmerTable {
    pub collection: Collection,
    pub strand: Strand,
    occurrences: Vec<KmerOccurrence>,
}

impl KmerTable {
    pub fn occurrences(&self) -> &[KmerOccurrence] {
        &self.occurrences
    }

    pub fn len(&self) -> usize {
        self.occurrences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.occurrences.is_empty()
    }

    /// Iterate over runs of occurrences sharing a k-mer code.
    pub fn code_runs(&self) -> CodeRuns<'_> {
        CodeRuns {
            rest: &self.occurrences,
        }
    }
}

#[inline]
fn kmer_mask(seedlength: usize) -> u64 {
    if seedlength >= 32 {
        u64::MAX
    } else {
        (1u64 << (2 * seedlength)) - 1
    }
}

/// Build the occurrence table for one collection and strand.
pub fn build_kmer_table(
    store: &SequenceStore,
    collection: Collection,
    strand: Strand,
    seedlength: usize,
) -> KmerTable {
    let mask = kmer_mask(seedlength);
    let mut occurrences = Vec::new();

    for seqnum in 0..store.num_sequences(collection) {
        let seq = store.seq(collection, seqnum);
        if seq.len() < seedlength {
            continue;
        }
        let codes = match strand {
            Strand::Forward => seq.codes().to_vec(),
            Strand::Reverse => seq.reverse_complement(),
        };

        let mut current: u64 = 0;
        let mut valid_bases = 0usize;
        for (pos, &code) in codes.iter().enumerate() {
            if code == WILDCARD {
                current = 0;
                valid_bases = 0;
                continue;
            }
            current = ((current << 2) | code as u64) & mask;
            valid_bases += 1;
            if valid_bases < seedlength {
                continue;
            }
            occurrences.push(KmerOccurrence {
                code: current,
                seqnum: seqnum as u32,
                endpos: pos as u32,
            });
        }
    }

    occurrences.sort_unstable_by_key(|occ| (occ.code, occ.seqnum, occ.endpos));
    KmerTable {
        collection,
        strand,
        occurrences,
    }
}

/// Iterator over maximal same-code runs of a sorted occurrence slice.
pub struct CodeRuns<'a> {
    rest: &'a [KmerOccurrence],
}

impl<'a> Iterator for CodeRuns<'a> {
    type Item = (u64, &'a [KmerOccurrence]);

    fn next(&mut self) -> Option<Self::Item> {
        let first = self.rest.first()?;
        let code = first.code;
        let end = self
            .rest
            .iter()
            .position(|occ| occ.code != code)
            .unwrap_or(self.rest.len());
        let (run, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some((code, run))
    }
}
