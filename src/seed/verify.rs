//! Brute-force verification of seed generation.
//!
//! An independent recomputation of the seed pairs implied by the raw
//! sequences, bypassing the packed k-mer codes: windows are compared as
//! plain code slices. Any disagreement with the indexed path is a fatal
//! internal-consistency failure, never silently tolerated.

use rustc_hash::FxHashMap;

use crate::error::{EngineError, EngineResult};
use crate::seed::{PairingRules, SeedPair};
use crate::sequence::{Collection, SequenceStore, Strand, WILDCARD};

type WindowLists = FxHashMap<Vec<u8>, Vec<(u32, u32)>>;

fn window_lists(
    store: &SequenceStore,
    collection: Collection,
    strand: Strand,
    seedlength: usize,
) -> WindowLists {
    let mut lists: WindowLists = FxHashMap::default();
    for seqnum in 0..store.num_sequences(collection) {
        let seq = store.seq(collection, seqnum);
        if seq.len() < seedlength {
            continue;
        }
        let codes = match strand {
            Strand::Forward => seq.codes().to_vec(),
            Strand::Reverse => seq.reverse_complement(),
        };
        for end in (seedlength - 1)..codes.len() {
            let window = &codes[end + 1 - seedlength..=end];
            if window.contains(&WILDCARD) {
                continue;
            }
            lists
                .entry(window.to_vec())
                .or_default()
                .push((seqnum as u32, end as u32));
        }
    }
    lists
}

/// Recompute the seed pairs of one strand pairing by scanning raw windows.
pub fn brute_force_seed_pairs(
    store: &SequenceStore,
    collection2: Collection,
    strand2: Strand,
    limit: u32,
    rules: PairingRules,
) -> Vec<SeedPair> {
    let seedlength = rules.seedlength as usize;
    let side1 = window_lists(store, Collection::Primary, Strand::Forward, seedlength);
    let mut pairs = Vec::new();

    if rules.same_table {
        for occurrences in side1.values() {
            if occurrences.len() as u64 > limit as u64 {
                continue;
            }
            for (i, &(seq1, pos1)) in occurrences.iter().enumerate() {
                for &(seq2, pos2) in &occurrences[i + 1..] {
                    if seq1 == seq2 && !rules.allow_overlap && pos2 - pos1 < rules.seedlength {
                        continue;
                    }
                    pairs.push(SeedPair { seq1, seq2, pos1, pos2 });
                }
            }
        }
    } else {
        let side2 = window_lists(store, collection2, strand2, seedlength);
        for (window, list1) in &side1 {
            let Some(list2) = side2.get(window) else {
                continue;
            };
            if (list1.len() + list2.len()) as u64 > limit as u64 {
                continue;
            }
            for &(seq1, pos1) in list1 {
                for &(seq2, pos2) in list2 {
                    if rules.same_collection && seq1 > seq2 {
                        continue;
                    }
                    pairs.push(SeedPair { seq1, seq2, pos1, pos2 });
                }
            }
        }
    }

    pairs.sort_unstable_by_key(SeedPair::sort_key);
    pairs
}

/// Compare the indexed seed pairs of one pairing against the brute-force
/// recomputation. Fatal on any difference.
pub fn verify_pairing(
    indexed: &[SeedPair],
    store: &SequenceStore,
    collection2: Collection,
    strand2: Strand,
    limit: u32,
    rules: PairingRules,
    label: &str,
) -> EngineResult<()> {
    let recomputed = brute_force_seed_pairs(store, collection2, strand2, limit, rules);
    if indexed == recomputed.as_slice() {
        return Ok(());
    }
    let first_diff = indexed
        .iter()
        .zip(recomputed.iter())
        .position(|(a, b)| a != b)
        .unwrap_or_else(|| indexed.len().min(recomputed.len()));
    Err(EngineError::internal(format!(
        "{label} seed pairs diverge from brute-force enumeration \
         (indexed {}, recomputed {}, first difference at {})",
        indexed.len(),
        recomputed.len(),
        first_diff
    )))
}
