//! Seed extension.
//!
//! The strategy is chosen once per run (a closed two-variant choice, never
//! per-seed dispatch) and applied to every surviving seed pair. Both
//! strategies only decide the extended segment endpoints; scoring of the
//! reported alignment goes through one shared evaluator so that equivalent
//! parameters produce identical records regardless of strategy.

pub mod greedy;
pub mod xdrop;

use crate::sequence::codes_match;

/// Per-run extension strategy and its parameters.
#[derive(Debug, Clone, Copy)]
pub enum ExtensionStrategy {
    Xdrop(XdropParams),
    Greedy(GreedyParams),
}

#[derive(Debug, Clone, Copy)]
pub struct XdropParams {
    /// Extension in a direction stops once the running score has fallen more
    /// than this below the best score seen in that direction.
    pub xdropbelow: i64,
}

#[derive(Debug, Clone, Copy)]
pub struct GreedyParams {
    /// Sliding window size over the last compared positions, at most 64 so
    /// the window fits one machine word.
    pub history: u32,
    /// Match-percentage floor over a full history window.
    pub percmathistory: u32,
    /// The two extended segment lengths may never differ by more than this.
    pub maxalilendiff: u64,
    /// Caps the number of edits explored in a direction, derived from the
    /// minimum identity.
    pub maxerr_percent: u32,
    /// A front is abandoned once its running score has fallen more than
    /// this below the best score seen in the direction; defaults to the
    /// X-drop threshold of the same sensitivity.
    pub scoredrop: i64,
}

/// Directional view over a code slice; left extensions read the same codes
/// back to front without materializing a reversed copy.
#[derive(Clone, Copy)]
pub struct DirView<'a> {
    codes: &'a [u8],
    reversed: bool,
}

impl<'a> DirView<'a> {
    pub fn forward(codes: &'a [u8]) -> Self {
        DirView { codes, reversed: false }
    }

    pub fn backward(codes: &'a [u8]) -> Self {
        DirView { codes, reversed: true }
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    #[inline(always)]
    pub fn at(&self, i: usize) -> u8 {
        if self.reversed {
            self.codes[self.codes.len() - 1 - i]
        } else {
            self.codes[i]
        }
    }
}

/// The extended segment, half-open on both sequences, seed included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extension {
    pub start1: usize,
    pub end1: usize,
    pub start2: usize,
    pub end2: usize,
}

impl Extension {
    pub fn len1(&self) -> usize {
        self.end1 - self.start1
    }

    pub fn len2(&self) -> usize {
        self.end2 - self.start2
    }

    /// The reported alignment length: the longer of the two segments.
    pub fn alignment_len(&self) -> usize {
        self.len1().max(self.len2())
    }
}

/// Extend one seed in both directions. `seed_end1`/`seed_end2` are the
/// positions of the last seed base on the strand-oriented code slices.
pub fn extend_seed(
    strategy: &ExtensionStrategy,
    codes1: &[u8],
    codes2: &[u8],
    seed_end1: usize,
    seed_end2: usize,
    seedlength: usize,
) -> Extension {
    let seed_start1 = seed_end1 + 1 - seedlength;
    let seed_start2 = seed_end2 + 1 - seedlength;

    let left_a = DirView::backward(&codes1[..seed_start1]);
    let left_b = DirView::backward(&codes2[..seed_start2]);
    let right_a = DirView::forward(&codes1[seed_end1 + 1..]);
    let right_b = DirView::forward(&codes2[seed_end2 + 1..]);

    let ((l1, l2), (r1, r2)) = match strategy {
        ExtensionStrategy::Xdrop(params) => (
            xdrop::xdrop_extend(left_a, left_b, params),
            xdrop::xdrop_extend(right_a, right_b, params),
        ),
        ExtensionStrategy::Greedy(params) => (
            greedy::greedy_extend(left_a, left_b, params),
            greedy::greedy_extend(right_a, right_b, params),
        ),
    };

    Extension {
        start1: seed_start1 - l1,
        end1: seed_end1 + 1 + r1,
        start2: seed_start2 - l2,
        end2: seed_end2 + 1 + r2,
    }
}

/// Scoring of a finished extension, shared by both strategies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    pub editdist: u64,
    pub score: i64,
    pub identity: f64,
}

/// Unit edit distance of the two segments, banded with band doubling until
/// the band provably contains the optimum. Score counts a match as +1 and
/// every edit as -2; identity follows the longer segment.
pub fn evaluate_segments(a: &[u8], b: &[u8]) -> Evaluation {
    let maxlen = a.len().max(b.len()) as u64;
    if maxlen == 0 {
        return Evaluation { editdist: 0, score: 0, identity: 0.0 };
    }
    let editdist = edit_distance(a, b);
    let score = maxlen as i64 - 3 * editdist as i64;
    let identity = 100.0 * (1.0 - editdist as f64 / maxlen as f64);
    Evaluation { editdist, score, identity }
}

fn edit_distance(a: &[u8], b: &[u8]) -> u64 {
    let diff = a.len().abs_diff(b.len());
    let mut band = (diff + 1).max(8);
    loop {
        if let Some(d) = banded_edit_distance(a, b, band) {
            if (d as usize) < band || band >= a.len().max(b.len()) {
                return d;
            }
        }
        band *= 2;
    }
}

/// Edit distance restricted to |i - j| <= band. Returns None when the final
/// cell is unreachable within the band.
fn banded_edit_distance(a: &[u8], b: &[u8], band: usize) -> Option<u64> {
    const INF: u64 = u64::MAX / 2;
    let (n, m) = (a.len(), b.len());
    if n.abs_diff(m) > band {
        return None;
    }

    // row i covers j in [i - band, i + band]
    let width = 2 * band + 1;
    let mut prev = vec![INF; width];
    let mut curr = vec![INF; width];

    // row 0: j in [0, band]
    for j in 0..=band.min(m) {
        prev[band + j] = j as u64;
    }

    for i in 1..=n {
        curr.fill(INF);
        let j_lo = i.saturating_sub(band);
        let j_hi = (i + band).min(m);
        for j in j_lo..=j_hi {
            let w = j + band - i;
            let mut best = INF;
            // deletion from a: (i-1, j)
            if j + band >= i && j + band - i + 1 < width {
                best = best.min(prev[w + 1].saturating_add(1));
            }
            // insertion into a: (i, j-1)
            if j > j_lo {
                best = best.min(curr[w - 1].saturating_add(1));
            }
            // diagonal
            if j > 0 {
                let cost = u64::from(!codes_match(a[i - 1], b[j - 1]));
                best = best.min(prev[w].saturating_add(cost));
            }
            curr[w] = best;
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    let w = m + band - n;
    let d = prev[w];
    (d < INF).then_some(d)
}

/// Raise the greedy match-rate floor when the store's base composition is
/// skewed: skew inflates the random match rate, so the floor tracks it.
pub fn bias_adjusted_floor(percmathistory: u32, composition: &[u64; 4]) -> u32 {
    let total: u64 = composition.iter().sum();
    if total == 0 {
        return percmathistory;
    }
    let random_match_rate: f64 = composition
        .iter()
        .map(|&c| {
            let f = c as f64 / total as f64;
            f * f
        })
        .sum();
    let excess = ((random_match_rate - 0.25) * 100.0).round();
    if excess <= 0.0 {
        return percmathistory;
    }
    (percmathistory + excess as u32).min(100)
}
