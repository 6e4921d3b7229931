//! Shared fixtures: on-disk FASTA files, seeded random sequences, and
//! configuration construction through the real CLI path.

use std::fs::File;
use std::io::Write as _;
use std::path::PathBuf;

use clap::Parser;
use rand::rngs::StdRng;
use rand::Rng;
use tempfile::TempDir;

use seedex::config::{validate, CliArgs, SeedExtendConfig};

/// Write sequences as a FASTA file into `dir` and return its path.
pub fn write_fasta(dir: &TempDir, name: &str, seqs: &[&[u8]]) -> PathBuf {
    let path = dir.path().join(name);
    let mut file = File::create(&path).unwrap();
    for (i, seq) in seqs.iter().enumerate() {
        writeln!(file, ">seq{i}").unwrap();
        file.write_all(seq).unwrap();
        writeln!(file).unwrap();
    }
    path
}

/// Parse and validate a full argument vector (without the binary name).
pub fn config_from(argv: &[&str]) -> SeedExtendConfig {
    let mut full = vec!["seedex"];
    full.extend_from_slice(argv);
    let args = CliArgs::try_parse_from(full).expect("arguments parse");
    validate(args).expect("arguments validate")
}

pub fn random_sequence(rng: &mut StdRng, len: usize) -> Vec<u8> {
    const BASES: [u8; 4] = [b'A', b'C', b'G', b'T'];
    (0..len).map(|_| BASES[rng.gen_range(0..4)]).collect()
}

/// Substitute one base every `step` positions, leaving clean runs between
/// the mutations for exact seeds.
pub fn mutate_every(seq: &[u8], step: usize, rng: &mut StdRng) -> Vec<u8> {
    const BASES: [u8; 4] = [b'A', b'C', b'G', b'T'];
    let mut out = seq.to_vec();
    let mut pos = step;
    while pos < out.len() {
        let current = out[pos];
        let replacement = loop {
            let candidate = BASES[rng.gen_range(0..4)];
            if candidate != current {
                break candidate;
            }
        };
        out[pos] = replacement;
        pos += step;
    }
    out
}
