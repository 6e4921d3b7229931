//! Fixed fixtures with known seed pair coordinates: positions are the end
//! position of the k-mer window, and enumeration order follows
//! (seq1, seq2, diagonal, pos1).

use seedex::index::build_kmer_table;
use seedex::seed::{generate_seed_pairs, PairingRules, SeedPair};
use seedex::sequence::{Collection, SequenceStore, Strand};

fn self_rules(seedlength: u32) -> PairingRules {
    PairingRules {
        seedlength,
        allow_overlap: false,
        same_table: true,
        same_collection: true,
    }
}

#[test]
fn poly_a_fixture_yields_the_known_end_positions() {
    // sequence 0 is one 13-mer of A; sequence 2 starts with fourteen A, so
    // the shared 13-mer ends there at positions 12 and 13
    let store = SequenceStore::from_raw_sequences(
        &[
            b"AAAAAAAAAAAAA",
            b"CGCGCGCGCGCGCG",
            b"AAAAAAAAAAAAAACGT",
        ],
        None,
    );
    let table = build_kmer_table(&store, Collection::Primary, Strand::Forward, 13);
    let pairs = generate_seed_pairs(&table, &table, u32::MAX, self_rules(13));

    // diagonal -1 sorts before diagonal 0
    assert_eq!(
        pairs,
        vec![
            SeedPair { seq1: 0, seq2: 2, pos1: 12, pos2: 13 },
            SeedPair { seq1: 0, seq2: 2, pos1: 12, pos2: 12 },
        ]
    );
}

#[test]
fn pair_count_is_reproducible_on_a_fixed_fixture() {
    let store = SequenceStore::from_raw_sequences(
        &[b"ACGTACGTACGTACGTACGT", b"TTACGTACGTACGTACGTTT"],
        None,
    );
    let table = build_kmer_table(&store, Collection::Primary, Strand::Forward, 10);
    let pairs = generate_seed_pairs(&table, &table, u32::MAX, self_rules(10));
    // every run of this fixture enumerates exactly the same pairs
    let again = generate_seed_pairs(&table, &table, u32::MAX, self_rules(10));
    assert_eq!(pairs, again);
    assert!(!pairs.is_empty());
    assert!(pairs
        .windows(2)
        .all(|w| w[0].sort_key() <= w[1].sort_key()));
}

#[test]
fn overlapping_windows_on_one_sequence_need_the_flag() {
    let store = SequenceStore::from_raw_sequences(&[b"AAAAAAAAAAAAAAAA"], None);
    let table = build_kmer_table(&store, Collection::Primary, Strand::Forward, 13);
    let pairs = generate_seed_pairs(&table, &table, u32::MAX, self_rules(13));
    assert!(pairs.is_empty());

    let mut rules = self_rules(13);
    rules.allow_overlap = true;
    let pairs = generate_seed_pairs(&table, &table, u32::MAX, rules);
    // end positions 12..=15, all six ordered combinations
    assert_eq!(pairs.len(), 6);
}
