//! Integration tests, organized by concern:
//! - `config` - option constraints surfaced through the full CLI path
//! - `determinism` - identical results across thread counts and access policies
//! - `equivalence` - strategy and self-vs-query equivalences
//! - `recall` - synthetic implanted alignments are recovered
//! - `seed_coordinates` - fixed fixtures with known seed pair coordinates
//! - `verification` - brute-force cross-check on valid inputs
//! - `end_to_end` - file input to file output through the binary entry path

mod helpers;

mod config;
mod determinism;
mod end_to_end;
mod recall;
mod seed_coordinates;
mod verification;
