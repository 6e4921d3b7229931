//! The brute-force cross-check must accept every indexed enumeration on
//! valid input, across strands, cutoffs and overlap settings.

use rand::rngs::StdRng;
use rand::SeedableRng;

use seedex::engine::generate_seeds;
use seedex::sequence::SequenceStore;

use crate::helpers::{config_from, random_sequence};

fn wildcard_sprinkled(mut seq: Vec<u8>) -> Vec<u8> {
    let mut pos = 37;
    while pos < seq.len() {
        seq[pos] = b'N';
        pos += 37;
    }
    seq
}

#[test]
fn verification_accepts_valid_self_comparisons() {
    let mut rng = StdRng::seed_from_u64(13);
    let a = wildcard_sprinkled(random_sequence(&mut rng, 600));
    let mut b = random_sequence(&mut rng, 600);
    b[50..250].copy_from_slice(&a[300..500]);
    let store = SequenceStore::from_raw_sequences(&[&a, &b], None);

    for argv in [
        vec!["--verify", "--seedlength", "8", "--ii", "unused.fas"],
        vec!["--verify", "--seedlength", "8", "--maxfreq", "4", "--ii", "unused.fas"],
        vec!["--verify", "--seedlength", "8", "--overlappingseeds", "--ii", "unused.fas"],
        vec!["--verify", "--seedlength", "8", "--no-reverse", "--ii", "unused.fas"],
        vec!["--verify", "--seedlength", "8", "--no-forward", "--ii", "unused.fas"],
    ] {
        let config = config_from(&argv);
        generate_seeds(&config, &store)
            .unwrap_or_else(|e| panic!("verification failed for {argv:?}: {e}"));
    }
}

#[test]
fn verification_accepts_query_comparisons() {
    let mut rng = StdRng::seed_from_u64(29);
    let a = random_sequence(&mut rng, 500);
    let mut q = wildcard_sprinkled(random_sequence(&mut rng, 400));
    q[100..200].copy_from_slice(&a[200..300]);
    let store = SequenceStore::from_raw_sequences(&[&a], Some(&[&q]));

    let config = config_from(&["--verify", "--seedlength", "10", "--ii", "unused.fas"]);
    generate_seeds(&config, &store).expect("verification on a query run");
}
