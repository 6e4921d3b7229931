//! Diagonal band filtering.
//!
//! Seed pairs are partitioned into bands of diagonals; a band survives only
//! if its seeds jointly cover enough bases. This is purely an optimization
//! gate ahead of extension, never a scoring adjustment.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::seed::SeedPair;

type BandKey = (u32, u32, i64);

#[inline]
fn band_of(diagonal: i64, width: u64) -> i64 {
    if width == 0 {
        diagonal
    } else {
        diagonal.div_euclid(width as i64)
    }
}

/// Bases covered by the seed spans on sequence 2: the union of the spans, or
/// the raw seed-length sum when overlap deduplication is off.
fn band_coverage(mut spans: Vec<(u32, u32)>, seedlength: u64, raw_sum: bool) -> u64 {
    if raw_sum {
        return spans.len() as u64 * seedlength;
    }
    spans.sort_unstable();
    let mut covered = 0u64;
    let mut current: Option<(u32, u32)> = None;
    for (start, end) in spans {
        match current {
            Some((cur_start, cur_end)) if start <= cur_end + 1 => {
                current = Some((cur_start, cur_end.max(end)));
            }
            Some((cur_start, cur_end)) => {
                covered += (cur_end - cur_start + 1) as u64;
                current = Some((start, end));
            }
            None => current = Some((start, end)),
        }
    }
    if let Some((start, end)) = current {
        covered += (end - start + 1) as u64;
    }
    covered
}

/// Drop every band whose coverage stays below `mincoverage`, and with it all
/// of the band's seed pairs. The relative order of survivors is preserved.
pub fn filter_by_diagonal_bands(
    pairs: Vec<SeedPair>,
    diagbandwidth: u64,
    mincoverage: u64,
    seedlength: u64,
    raw_sum: bool,
) -> Vec<SeedPair> {
    let mut bands: FxHashMap<BandKey, Vec<(u32, u32)>> = FxHashMap::default();
    for pair in &pairs {
        let key = (pair.seq1, pair.seq2, band_of(pair.diagonal(), diagbandwidth));
        let span_start = pair.pos2 + 1 - seedlength as u32;
        bands.entry(key).or_default().push((span_start, pair.pos2));
    }

    let surviving: FxHashSet<BandKey> = bands
        .into_iter()
        .filter(|(_, spans)| band_coverage(spans.clone(), seedlength, raw_sum) >= mincoverage)
        .map(|(key, _)| key)
        .collect();

    pairs
        .into_iter()
        .filter(|pair| {
            surviving.contains(&(pair.seq1, pair.seq2, band_of(pair.diagonal(), diagbandwidth)))
        })
        .collect()
}
