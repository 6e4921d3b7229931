//! Result assembly.
//!
//! Extensions of different seeds frequently converge on the same alignment
//! region. Before output the records of each sequence pair and strand are
//! deduplicated: a record fully contained in a kept record on both
//! sequences is dropped, keeping the higher-scoring one. The survivors are
//! emitted in the fixed report order.

use rustc_hash::FxHashMap;

use crate::common::AlignmentRecord;
use crate::sequence::Strand;

type GroupKey = (u32, u32, Strand);

fn contains(outer: &AlignmentRecord, inner: &AlignmentRecord) -> bool {
    outer.start1 <= inner.start1
        && inner.end1() <= outer.end1()
        && outer.start2 <= inner.start2
        && inner.end2() <= outer.end2()
}

/// Deduplicate and order the records for output.
pub fn assemble(records: Vec<AlignmentRecord>) -> Vec<AlignmentRecord> {
    let mut groups: FxHashMap<GroupKey, Vec<AlignmentRecord>> = FxHashMap::default();
    for record in records {
        groups
            .entry((record.seq1, record.seq2, record.strand))
            .or_default()
            .push(record);
    }

    let mut result = Vec::new();
    for (_, mut group) in groups {
        // highest score first so containment always drops the weaker record
        group.sort_unstable_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then_with(|| a.editdist.cmp(&b.editdist))
                .then_with(|| a.report_key().cmp(&b.report_key()))
        });
        let mut kept: Vec<AlignmentRecord> = Vec::new();
        for record in group {
            if kept.iter().any(|k| contains(k, &record)) {
                continue;
            }
            kept.push(record);
        }
        result.extend(kept);
    }

    result.sort_unstable_by_key(AlignmentRecord::report_key);
    result
}
