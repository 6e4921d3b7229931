//! The reported alignments are a pure function of input and parameters:
//! thread count and sequence access policy never change a single byte.

use rand::rngs::StdRng;
use rand::SeedableRng;

use seedex::engine::compute_records;
use seedex::sequence::SequenceStore;

use crate::helpers::{config_from, mutate_every, random_sequence};

fn store_with_shared_regions(seed: u64) -> SequenceStore {
    let mut rng = StdRng::seed_from_u64(seed);
    let a = random_sequence(&mut rng, 1200);
    let mut b = random_sequence(&mut rng, 1200);
    let mut c = random_sequence(&mut rng, 800);
    // implant two mutated copies of regions of a into b and c
    b[100..400].copy_from_slice(&mutate_every(&a[200..500], 40, &mut rng));
    c[300..550].copy_from_slice(&mutate_every(&a[700..950], 50, &mut rng));
    SequenceStore::from_raw_sequences(&[&a, &b, &c], None)
}

#[test]
fn thread_count_never_changes_the_records() {
    let store = store_with_shared_regions(11);
    let baseline = compute_records(&config_from(&["--ii", "unused.fas", "-t", "3"]), &store)
        .expect("alignment run");
    assert!(!baseline.is_empty());
    for threads in ["4", "5", "7"] {
        let records = compute_records(
            &config_from(&["--ii", "unused.fas", "-t", threads]),
            &store,
        )
        .expect("alignment run");
        assert_eq!(records, baseline, "diverged at {threads} threads");
    }
}

#[test]
fn access_policies_report_identical_alignments() {
    let store = store_with_shared_regions(23);
    let direct = compute_records(
        &config_from(&["--ii", "unused.fas", "--cam", "direct"]),
        &store,
    )
    .expect("alignment run");
    let buffered = compute_records(
        &config_from(&["--ii", "unused.fas", "--cam", "buffered"]),
        &store,
    )
    .expect("alignment run");
    assert!(!direct.is_empty());
    assert_eq!(direct, buffered);
}

#[test]
fn repeated_runs_are_idempotent() {
    let store = store_with_shared_regions(42);
    let config = config_from(&["--ii", "unused.fas", "--extendxdrop", "-t", "3"]);
    let first = compute_records(&config, &store).expect("alignment run");
    let second = compute_records(&config, &store).expect("alignment run");
    assert_eq!(first, second);
}

#[test]
fn output_order_is_the_documented_one() {
    let store = store_with_shared_regions(5);
    let records =
        compute_records(&config_from(&["--ii", "unused.fas"]), &store).expect("alignment run");
    let keys: Vec<_> = records.iter().map(|r| r.report_key()).collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);
}
