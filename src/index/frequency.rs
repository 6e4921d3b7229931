//! Frequency analysis: turning an explicit occurrence cap or a memory budget
//! into a single k-mer frequency cutoff.
//!
//! The memory-derived cutoff walks frequency buckets from the most
//! restrictive cutoff (2) upward, accumulating the bytes the retained
//! occurrences and the seed pairs they imply would occupy, and keeps the
//! largest cutoff whose accounting still fits the budget.

use std::collections::BTreeMap;
use std::mem;

use crate::error::{EngineError, EngineResult};
use crate::index::KmerTable;

/// Bytes one retained occurrence contributes to the accounting.
pub const OCCURRENCE_BYTES: u64 = mem::size_of::<crate::index::KmerOccurrence>() as u64;
/// Bytes one expected seed pair contributes to the accounting.
pub const SEED_PAIR_BYTES: u64 = mem::size_of::<crate::seed::SeedPair>() as u64;

pub const MEGABYTE: u64 = 1 << 20;
pub const GIGABYTE: u64 = 1 << 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CutoffRationale {
    /// The user named the cap directly.
    ExplicitCap,
    /// Derived from a memory budget by incremental accounting.
    MemoryBudget,
    /// No cap requested; every k-mer takes part in seed generation.
    Unbounded,
}

/// The single cutoff applied before seed generation: any k-mer whose
/// occurrence count exceeds `limit` is excluded.
#[derive(Debug, Clone, Copy)]
pub struct FrequencyCutoff {
    pub limit: u32,
    pub rationale: CutoffRationale,
}

impl FrequencyCutoff {
    pub fn unbounded() -> Self {
        FrequencyCutoff {
            limit: u32::MAX,
            rationale: CutoffRationale::Unbounded,
        }
    }

    pub fn explicit(limit: u32) -> Self {
        FrequencyCutoff {
            limit,
            rationale: CutoffRationale::ExplicitCap,
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Bucket {
    occurrences: u64,
    pairs: u64,
}

/// Per-frequency accounting over every strand pairing of the run. Keyed by
/// the joint occurrence count of a k-mer code across the two tables being
/// paired, so a cutoff F retains exactly the buckets with key <= F.
#[derive(Default)]
pub struct FrequencyHistogram {
    buckets: BTreeMap<u32, Bucket>,
}

impl FrequencyHistogram {
    pub fn new() -> Self {
        FrequencyHistogram::default()
    }

    /// Account one strand pairing. `same_table` marks the self comparison of
    /// a table against itself (single collection, forward vs forward), where
    /// each unordered position pair is generated once.
    pub fn add_pairing(&mut self, table1: &KmerTable, table2: &KmerTable, same_table: bool) {
        if same_table {
            for (_, run) in table1.code_runs() {
                let c = run.len() as u64;
                self.record(c as u32, c, c * (c - 1) / 2);
            }
            return;
        }

        let mut runs1 = table1.code_runs().peekable();
        let mut runs2 = table2.code_runs().peekable();
        loop {
            match (runs1.peek(), runs2.peek()) {
                (Some(&(code1, run1)), Some(&(code2, run2))) => {
                    if code1 < code2 {
                        let c = run1.len() as u64;
                        self.record(c as u32, c, 0);
                        runs1.next();
                    } else if code2 < code1 {
                        let c = run2.len() as u64;
                        self.record(c as u32, c, 0);
                        runs2.next();
                    } else {
                        let c1 = run1.len() as u64;
                        let c2 = run2.len() as u64;
                        self.record((c1 + c2) as u32, c1 + c2, c1 * c2);
                        runs1.next();
                        runs2.next();
                    }
                }
                (Some(&(_, run1)), None) => {
                    let c = run1.len() as u64;
                    self.record(c as u32, c, 0);
                    runs1.next();
                }
                (None, Some(&(_, run2))) => {
                    let c = run2.len() as u64;
                    self.record(c as u32, c, 0);
                    runs2.next();
                }
                (None, None) => break,
            }
        }
    }

    fn record(&mut self, freq: u32, occurrences: u64, pairs: u64) {
        let bucket = self.buckets.entry(freq).or_default();
        bucket.occurrences += occurrences;
        bucket.pairs += pairs;
    }

    /// Highest joint occurrence count present in any pairing.
    pub fn max_frequency(&self) -> Option<u32> {
        self.buckets.keys().next_back().copied()
    }

    /// Seed pairs expected once every k-mer above `cutoff` is excluded.
    pub fn expected_pairs_at(&self, cutoff: u32) -> u64 {
        self.buckets
            .range(..=cutoff)
            .map(|(_, bucket)| bucket.pairs)
            .sum()
    }

    fn bytes_at(&self, cutoff: u32) -> u64 {
        self.buckets
            .range(..=cutoff)
            .map(|(_, bucket)| {
                bucket.occurrences * OCCURRENCE_BYTES + bucket.pairs * SEED_PAIR_BYTES
            })
            .sum()
    }

    /// The bytes the engine needs even under the most restrictive usable
    /// cutoff (2). Budgets below this cannot support the run.
    pub fn minimal_working_set_bytes(&self) -> u64 {
        self.bytes_at(2)
    }

    /// Largest cutoff whose retained occurrences and expected seed pairs fit
    /// `budget_bytes`. Fails with a ResourceError naming the minimum budget
    /// when even cutoff 2 does not fit.
    pub fn cutoff_for_budget(&self, budget_bytes: u64) -> EngineResult<u32> {
        let minimal = self.minimal_working_set_bytes();
        if budget_bytes < minimal {
            let need_mb = minimal.div_ceil(MEGABYTE).max(1);
            return Err(EngineError::resource(format!(
                "option --memlimit too strict: need at least {need_mb}MB"
            )));
        }

        let mut running = 0u64;
        let mut chosen = 2u32;
        for (&freq, bucket) in &self.buckets {
            running += bucket.occurrences * OCCURRENCE_BYTES + bucket.pairs * SEED_PAIR_BYTES;
            if running <= budget_bytes {
                if freq > chosen {
                    chosen = freq;
                }
            } else {
                break;
            }
        }
        Ok(chosen)
    }
}
