//! Search: score conventions, the precomputed evaluator, position hashing,
//! the transposition table and the iterative-deepening driver.

pub mod alphabeta;
pub mod eval;
pub mod tt;
pub mod zobrist;

use crate::board::moves::Move;

pub type Score = i32;

/// Window bound; safely negatable (`-SCORE_INF` is not `i32::MIN`).
pub const SCORE_INF: Score = i32::MAX;

/// Score of a game won at ply 0; an actual win scores
/// `WIN_SCORE - plies_played`, so faster wins rank higher.
pub const WIN_SCORE: Score = i32::MAX - 1;

/// Drawn games are coded as one separate value so that a draw is never
/// confused with a heuristic score of zero. Never negated.
pub const DRAW_SCORE: Score = i32::MIN;

#[inline]
pub fn is_draw(score: Score) -> bool {
    score == DRAW_SCORE
}

/// A draw compares as zero against ordinary scores.
#[inline]
pub fn decode_draw(score: Score) -> Score {
    if score == DRAW_SCORE {
        0
    } else {
        score
    }
}

/// A move paired with its negamax value.
#[derive(Clone, Copy, Debug)]
pub struct MoveValued {
    pub mv: Move,
    pub value: Score,
}
