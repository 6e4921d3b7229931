//! Greedy extension.
//!
//! Distance fronts in the style of Myers' O(ND) algorithm: for a growing
//! error count d, each diagonal keeps the furthest row reachable with d
//! edits, found by sliding along matches. Every front carries a running
//! alignment score (match +1, mismatch -1, indel -2) and a bitmask of its
//! last compared positions; a front is abandoned when its match rate over a
//! full history window falls below the configured floor, or when its score
//! falls more than the score-drop threshold below the best score seen. The
//! reported endpoint rolls back to the best-scoring one, so trailing noise
//! never lengthens the extension.

use super::{DirView, GreedyParams};
use crate::sequence::codes_match;

#[derive(Clone, Copy)]
struct Front {
    row: i64,
    score: i64,
    mask: u64,
    compared: u32,
}

const DEAD: Front = Front { row: -1, score: 0, mask: 0, compared: 0 };

impl Front {
    fn alive(&self) -> bool {
        self.row >= 0
    }

    fn push(&mut self, matched: bool) {
        self.mask = (self.mask << 1) | u64::from(matched);
        self.compared = self.compared.saturating_add(1);
    }

    /// Furthest row wins; equal rows keep the higher running score.
    fn dominates(&self, other: &Front) -> bool {
        self.row > other.row || (self.row == other.row && self.score > other.score)
    }
}

fn slide(front: &mut Front, k: i64, a: DirView, b: DirView) {
    let mut i = front.row;
    let mut j = i - k;
    while (i as usize) < a.len() && (j as usize) < b.len() && codes_match(a.at(i as usize), b.at(j as usize))
    {
        front.push(true);
        front.score += 1;
        i += 1;
        j += 1;
    }
    front.row = i;
}

fn window_ok(front: &Front, history: u32, percmathistory: u32) -> bool {
    if front.compared < history {
        return true;
    }
    let window_mask = if history >= 64 {
        u64::MAX
    } else {
        (1u64 << history) - 1
    };
    let matches = (front.mask & window_mask).count_ones();
    matches * 100 >= percmathistory * history
}

/// Extend in one direction; returns the number of positions consumed on
/// each side at the best-scoring endpoint.
pub fn greedy_extend(a: DirView, b: DirView, p: &GreedyParams) -> (usize, usize) {
    let (alen, blen) = (a.len() as i64, b.len() as i64);
    if alen == 0 && blen == 0 {
        return (0, 0);
    }

    let width = p.maxalilendiff.min(i32::MAX as u64) as i64;
    let size = (2 * width + 1) as usize;
    let offset = width;

    let mut best = (0usize, 0usize);
    let mut best_score = 0i64;

    let mut prev = vec![DEAD; size];
    let mut first = Front { row: 0, score: 0, mask: 0, compared: 0 };
    slide(&mut first, 0, a, b);
    if first.score > 0 {
        best = (first.row as usize, first.row as usize);
        best_score = first.score;
    }
    prev[offset as usize] = first;

    // d beyond this can never improve on an endpoint the score cutoff would
    // still accept
    let budget = (alen.max(blen) as u64) * p.maxerr_percent as u64 / 100 + width as u64 + 2;

    let mut prev_span = 0i64;
    for d in 1..=budget {
        let span = (d as i64).min(width);
        let mut curr = vec![DEAD; size];
        let mut any_alive = false;

        for k in -span..=span {
            let mut front = DEAD;

            // substitution, then gap in b, then gap in a
            if k.abs() <= prev_span {
                let f = prev[(k + offset) as usize];
                if f.alive() && f.row + 1 <= alen && f.row + 1 - k <= blen {
                    front = f;
                    front.row += 1;
                    front.score -= 1;
                    front.push(false);
                }
            }
            if k - 1 >= -prev_span && k - 1 <= prev_span {
                let f = prev[(k - 1 + offset) as usize];
                if f.alive() && f.row + 1 <= alen && f.row + 1 - k <= blen {
                    let mut cand = f;
                    cand.row += 1;
                    cand.score -= 2;
                    cand.push(false);
                    if cand.dominates(&front) {
                        front = cand;
                    }
                }
            }
            if k + 1 >= -prev_span && k + 1 <= prev_span {
                let f = prev[(k + 1 + offset) as usize];
                if f.alive() && f.row <= alen && f.row - k <= blen {
                    let mut cand = f;
                    cand.score -= 2;
                    cand.push(false);
                    if cand.dominates(&front) {
                        front = cand;
                    }
                }
            }

            if !front.alive() || front.row - k < 0 {
                continue;
            }

            slide(&mut front, k, a, b);
            if !window_ok(&front, p.history, p.percmathistory) {
                continue;
            }

            if front.score > best_score {
                best_score = front.score;
                best = (front.row as usize, (front.row - k) as usize);
            }
            if front.score < best_score - p.scoredrop {
                continue;
            }

            curr[(k + offset) as usize] = front;
            any_alive = true;
        }

        if !any_alive {
            break;
        }
        prev = curr;
        prev_span = span;
    }

    best
}
