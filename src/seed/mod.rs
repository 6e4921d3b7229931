//! Seed pair generation.
//!
//! For every k-mer code that survives the frequency cutoff, all valid
//! cross-collection position pairs are emitted. The output ordering is fixed
//! (seq1, seq2, diagonal, pos1) and independent of processing order or
//! thread count.

pub mod filter;
pub mod verify;

/// A pair of k-mer end positions sharing a code, one per compared sequence.
/// The window length always equals the configured seed length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SeedPair {
    pub seq1: u32,
    pub seq2: u32,
    pub pos1: u32,
    pub pos2: u32,
}

impl SeedPair {
    /// The alignment offset this seed suggests.
    #[inline]
    pub fn diagonal(&self) -> i64 {
        self.pos1 as i64 - self.pos2 as i64
    }

    /// Fixed reporting order: by sequence pair, then diagonal, then position
    /// within the diagonal.
    #[inline]
    pub fn sort_key(&self) -> (u32, u32, i64, u32) {
        (self.seq1, self.seq2, self.diagonal(), self.pos1)
    }
}

/// How the two occurrence lists relate, which decides pair admissibility.
#[derive(Debug, Clone, Copy)]
pub struct PairingRules {
    pub seedlength: u32,
    /// Keep seed pairs whose windows overlap on the same sequence.
    pub allow_overlap: bool,
    /// Both sides are the identical table (single collection, forward vs
    /// forward): each unordered pair is generated once.
    pub same_table: bool,
    /// Both sides draw sequences from the same collection (covers the
    /// reverse-strand self comparison): mirrored pairs are deduplicated by
    /// requiring seq1 <= seq2.
    pub same_collection: bool,
}

use crate::index::KmerTable;

/// Expand all admissible seed pairs for codes whose joint occurrence count
/// does not exceed `limit`.
pub fn generate_seed_pairs(
    table1: &KmerTable,
    table2: &KmerTable,
    limit: u32,
    rules: PairingRules,
) -> Vec<SeedPair> {
    let mut pairs = Vec::new();

    if rules.same_table {
        for (_, run) in table1.code_runs() {
            if run.len() as u64 > limit as u64 {
                continue;
            }
            for (i, a) in run.iter().enumerate() {
                for b in &run[i + 1..] {
                    // run is sorted by (seqnum, endpos), so a <= b holds
                    if a.seqnum == b.seqnum
                        && !rules.allow_overlap
                        && b.endpos - a.endpos < rules.seedlength
                    {
                        continue;
                    }
                    pairs.push(SeedPair {
                        seq1: a.seqnum,
                        seq2: b.seqnum,
                        pos1: a.endpos,
                        pos2: b.endpos,
                    });
                }
            }
        }
    } else {
        let mut runs1 = table1.code_runs().peekable();
        let mut runs2 = table2.code_runs().peekable();
        while let (Some(&(code1, run1)), Some(&(code2, run2))) = (runs1.peek(), runs2.peek()) {
            if code1 < code2 {
                runs1.next();
                continue;
            }
            if code2 < code1 {
                runs2.next();
                continue;
            }
            if (run1.len() + run2.len()) as u64 <= limit as u64 {
                for a in run1 {
                    for b in run2 {
                        if rules.same_collection && a.seqnum > b.seqnum {
                            continue;
                        }
                        pairs.push(SeedPair {
                            seq1: a.seqnum,
                            seq2: b.seqnum,
                            pos1: a.endpos,
                            pos2: b.endpos,
                        });
                    }
                }
            }
            runs1.next();
            runs2.next();
        }
    }

    pairs.sort_unstable_by_key(SeedPair::sort_key);
    pairs
}
