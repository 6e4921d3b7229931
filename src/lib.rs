//! Seed-and-extend local alignment of nucleotide sequence collections.
//!
//! The pipeline finds exact k-mer seeds between one or two sequence
//! collections, filters them by diagonal band coverage, and extends the
//! survivors into local alignments with either X-drop or greedy extension.

pub mod common;
pub mod config;
pub mod engine;
pub mod error;
pub mod extend;
pub mod index;
pub mod report;
pub mod seed;
pub mod sequence;
