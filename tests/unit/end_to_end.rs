//! File input to file output through the application entry path.

use std::fs;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::TempDir;

use seedex::engine;

use crate::helpers::{config_from, random_sequence, write_fasta};

fn fixture_sequences(seed: u64) -> (Vec<u8>, Vec<u8>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let a = random_sequence(&mut rng, 900);
    let mut b = random_sequence(&mut rng, 900);
    b[200..500].copy_from_slice(&a[300..600]);
    (a, b)
}

#[test]
fn alignments_are_written_in_the_fixed_column_format() {
    let dir = TempDir::new().unwrap();
    let (a, b) = fixture_sequences(61);
    let input = write_fasta(&dir, "input.fas", &[&a, &b]);
    let output = dir.path().join("out.txt");

    let config = config_from(&[
        "--ii",
        input.to_str().unwrap(),
        "--alignlength",
        "100",
        "--outfile",
        output.to_str().unwrap(),
    ]);
    engine::run(&config).expect("engine run");

    let text = fs::read_to_string(&output).unwrap();
    assert!(!text.is_empty());
    for line in text.lines() {
        let fields: Vec<&str> = line.split(' ').collect();
        assert_eq!(fields.len(), 10, "bad line: {line}");
        for field in &fields[..3] {
            field.parse::<u64>().unwrap();
        }
        assert!(fields[3] == "F" || fields[3] == "R");
        fields[7].parse::<i64>().unwrap();
        fields[8].parse::<u64>().unwrap();
        let identity: f64 = fields[9].parse().unwrap();
        assert!((0.0..=100.0).contains(&identity));
        assert!(fields[9].contains('.'));
    }
}

#[test]
fn seed_display_appends_three_fields() {
    let dir = TempDir::new().unwrap();
    let (a, b) = fixture_sequences(62);
    let input = write_fasta(&dir, "input.fas", &[&a, &b]);
    let output = dir.path().join("out.txt");

    let config = config_from(&[
        "--ii",
        input.to_str().unwrap(),
        "--alignlength",
        "100",
        "--seed-display",
        "--outfile",
        output.to_str().unwrap(),
    ]);
    engine::run(&config).expect("engine run");

    let text = fs::read_to_string(&output).unwrap();
    assert!(!text.is_empty());
    for line in text.lines() {
        let fields: Vec<&str> = line.split(' ').collect();
        assert_eq!(fields.len(), 13, "bad line: {line}");
        // seedlength, then both window end positions
        assert_eq!(fields[10], "14");
        fields[11].parse::<u64>().unwrap();
        fields[12].parse::<u64>().unwrap();
    }
}

#[test]
fn query_file_runs_end_to_end() {
    let dir = TempDir::new().unwrap();
    let (a, b) = fixture_sequences(63);
    let primary = write_fasta(&dir, "primary.fas", &[&a]);
    let query = write_fasta(&dir, "query.fas", &[&b]);
    let output = dir.path().join("out.txt");

    let config = config_from(&[
        "--ii",
        primary.to_str().unwrap(),
        "--qii",
        query.to_str().unwrap(),
        "--alignlength",
        "100",
        "--outfile",
        output.to_str().unwrap(),
    ]);
    engine::run(&config).expect("engine run");
    let text = fs::read_to_string(&output).unwrap();
    assert!(!text.is_empty());
}

#[test]
fn only_seeds_writes_no_alignments() {
    let dir = TempDir::new().unwrap();
    let (a, b) = fixture_sequences(64);
    let input = write_fasta(&dir, "input.fas", &[&a, &b]);
    let output = dir.path().join("out.txt");

    let config = config_from(&[
        "--ii",
        input.to_str().unwrap(),
        "--only-seeds",
        "--outfile",
        output.to_str().unwrap(),
    ]);
    engine::run(&config).expect("engine run");
    assert!(!output.exists());
}
