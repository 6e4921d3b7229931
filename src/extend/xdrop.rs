//! X-drop extension.
//!
//! Banded score dynamic program in one direction. Cells whose score falls
//! more than the X threshold below the running best are pruned, the live
//! window shrinks around the survivors, and the extension ends when the
//! window empties. The reported endpoint rolls back to the best-scoring
//! cell, so trailing noise never lengthens the alignment.

use super::{DirView, XdropParams};
use crate::sequence::codes_match;

const MATCH_SCORE: i64 = 1;
const MISMATCH_SCORE: i64 = -1;
const GAP_SCORE: i64 = -2;
const NEG_INF: i64 = i64::MIN / 2;

/// Extend in one direction; returns the number of positions consumed on
/// each side at the best-scoring endpoint.
pub fn xdrop_extend(a: DirView, b: DirView, params: &XdropParams) -> (usize, usize) {
    let x = params.xdropbelow;
    let (alen, blen) = (a.len(), b.len());
    if alen == 0 || blen == 0 {
        return (0, 0);
    }

    let mut best_score = 0i64;
    let mut best = (0usize, 0usize);

    // row 0: leading gaps in a, viable while their cost stays within X
    let mut lo = 0usize;
    let mut hi = ((x / -GAP_SCORE) as usize).min(blen);
    let mut prev: Vec<i64> = (0..=hi).map(|j| GAP_SCORE * j as i64).collect();

    for i in 1..=alen {
        let row_lo = lo;
        let row_hi = (hi + 1).min(blen);
        if row_lo > row_hi {
            break;
        }
        let mut curr = vec![NEG_INF; row_hi - row_lo + 1];
        for j in row_lo..=row_hi {
            let mut s = NEG_INF;
            if j >= lo && j <= hi {
                s = s.max(prev[j - lo] + GAP_SCORE);
            }
            if j > row_lo {
                s = s.max(curr[j - 1 - row_lo] + GAP_SCORE);
            }
            if j > 0 && j - 1 >= lo && j - 1 <= hi {
                let sub = if codes_match(a.at(i - 1), b.at(j - 1)) {
                    MATCH_SCORE
                } else {
                    MISMATCH_SCORE
                };
                s = s.max(prev[j - 1 - lo] + sub);
            }
            if s < best_score - x {
                s = NEG_INF;
            } else if s > best_score {
                best_score = s;
                best = (i, j);
            }
            curr[j - row_lo] = s;
        }

        let Some(first) = curr.iter().position(|&v| v > NEG_INF) else {
            break;
        };
        let last = curr.iter().rposition(|&v| v > NEG_INF).unwrap_or(first);
        lo = row_lo + first;
        hi = row_lo + last;
        prev = curr[first..=last].to_vec();
    }

    best
}
