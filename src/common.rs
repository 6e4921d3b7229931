//! Shared reporting types.

use std::io::{self, Write};

use crate::sequence::Strand;

/// Seed coordinates carried along for `--seed-display`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedAnnotation {
    pub seedlength: u32,
    pub pos1: u32,
    pub pos2: u32,
}

/// One reported local alignment. Coordinates are zero-based starts on the
/// original (forward) sequences; on the reverse strand `start2` refers to
/// the reverse-complemented orientation of sequence 2.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignmentRecord {
    pub len1: u32,
    pub seq1: u32,
    pub start1: u32,
    pub strand: Strand,
    pub len2: u32,
    pub seq2: u32,
    pub start2: u32,
    pub score: i64,
    pub editdist: u64,
    pub identity: f64,
    pub seed: Option<SeedAnnotation>,
}

impl AlignmentRecord {
    #[inline]
    pub fn diagonal(&self) -> i64 {
        self.start1 as i64 - self.start2 as i64
    }

    /// Fixed output order: by sequence pair, then start on sequence 1, then
    /// diagonal. Independent of computation order and thread count.
    #[inline]
    pub fn report_key(&self) -> (u32, u32, u32, i64) {
        (self.seq1, self.seq2, self.start1, self.diagonal())
    }

    pub fn end1(&self) -> u32 {
        self.start1 + self.len1
    }

    pub fn end2(&self) -> u32 {
        self.start2 + self.len2
    }
}

/// Write records in the fixed column format, one per line.
pub fn write_records(
    records: &[AlignmentRecord],
    seed_display: bool,
    out: &mut dyn Write,
) -> io::Result<()> {
    let mut buf = io::BufWriter::new(out);
    for record in records {
        write!(
            buf,
            "{} {} {} {} {} {} {} {} {} {:.2}",
            record.len1,
            record.seq1,
            record.start1,
            record.strand.symbol(),
            record.len2,
            record.seq2,
            record.start2,
            record.score,
            record.editdist,
            record.identity
        )?;
        if seed_display {
            if let Some(seed) = record.seed {
                write!(buf, " {} {} {}", seed.seedlength, seed.pos1, seed.pos2)?;
            }
        }
        writeln!(buf)?;
    }
    buf.flush()
}
