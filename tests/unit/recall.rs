//! Synthetic recall: implanted homologous regions are recovered above the
//! configured length and identity floors, on both strands.

use rand::rngs::StdRng;
use rand::SeedableRng;

use seedex::engine::compute_records;
use seedex::sequence::{SequenceStore, Strand};

use crate::helpers::{config_from, mutate_every, random_sequence};

fn reverse_complement(seq: &[u8]) -> Vec<u8> {
    seq.iter()
        .rev()
        .map(|&b| match b {
            b'A' => b'T',
            b'C' => b'G',
            b'G' => b'C',
            _ => b'A',
        })
        .collect()
}

#[test]
fn implanted_regions_are_recovered() {
    for seed in [1u64, 8, 21, 34, 55] {
        let mut rng = StdRng::seed_from_u64(seed);
        let long = random_sequence(&mut rng, 4000);
        let mut host = random_sequence(&mut rng, 1500);
        // one mutated implant per host, about 96% identity
        let implant = mutate_every(&long[500..800], 25, &mut rng);
        host[600..900].copy_from_slice(&implant);

        let store = SequenceStore::from_raw_sequences(&[&long], Some(&[&host]));
        let records = compute_records(
            &config_from(&["--alignlength", "100", "--ii", "unused.fas"]),
            &store,
        )
        .expect("alignment run");

        let hit = records
            .iter()
            .find(|r| r.strand == Strand::Forward && r.len1 >= 200)
            .unwrap_or_else(|| panic!("implant not recovered for seed {seed}"));
        assert!(hit.identity >= 90.0);
        // the alignment must lie on the implant
        assert!(hit.start1 >= 450 && hit.start1 < 800);
        assert!(hit.start2 >= 550 && hit.start2 < 900);
    }
}

#[test]
fn reverse_strand_implants_are_recovered() {
    let mut rng = StdRng::seed_from_u64(99);
    let long = random_sequence(&mut rng, 3000);
    let mut host = random_sequence(&mut rng, 1000);
    let implant = reverse_complement(&mutate_every(&long[1000..1300], 30, &mut rng));
    host[400..700].copy_from_slice(&implant);

    let store = SequenceStore::from_raw_sequences(&[&long], Some(&[&host]));
    let records = compute_records(
        &config_from(&["--alignlength", "100", "--ii", "unused.fas"]),
        &store,
    )
    .expect("alignment run");
    assert!(records
        .iter()
        .any(|r| r.strand == Strand::Reverse && r.len1 >= 200 && r.identity >= 90.0));

    // and nothing on the reverse strand when it is disabled
    let records = compute_records(
        &config_from(&["--alignlength", "100", "--no-reverse", "--ii", "unused.fas"]),
        &store,
    )
    .expect("alignment run");
    assert!(records.iter().all(|r| r.strand == Strand::Forward));
}
