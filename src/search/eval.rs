//! Static evaluation: a per-content sub-board score table precomputed for
//! both players at startup, and the macro-line combiner over it.

use crate::board::subboard::{
    unique_threats, ways_to_win, win, winnable, Owner, Ttt, LINES, NUM_TTT,
};
use crate::board::Board;
use crate::search::{Score, DRAW_SCORE, WIN_SCORE};

/// Score of a won sub-board; everything below ranks under it.
pub const VICTORY_POINTS: Score = 50;

/// Immutable lookup tables for position evaluation, built once and shared by
/// the board scorer and the move-ordering lookahead.
pub struct Scoring {
    table: Box<[Score]>,
}

impl Scoring {
    pub fn new() -> Scoring {
        let mut table = vec![0 as Score; 2 * NUM_TTT].into_boxed_slice();
        for ttt in 0..NUM_TTT as Ttt {
            table[2 * ttt as usize] = compute_score(ttt, Owner::Player0);
            table[2 * ttt as usize + 1] = compute_score(ttt, Owner::Player1);
        }
        Scoring { table }
    }

    /// Precomputed score of one sub-board content for `player`.
    #[inline]
    pub fn score(&self, ttt: Ttt, player: Owner) -> Score {
        debug_assert!(player == Owner::Player0 || player == Owner::Player1);
        self.table[2 * ttt as usize + (player as usize - 1)]
    }

    /// Whole-game score from Player0's perspective: the decided-game values,
    /// or the macro-line heuristic at open positions.
    pub fn board_score(&self, board: &Board) -> Score {
        match board.winner_or_draw() {
            Owner::Player0 => WIN_SCORE - board.plies() as Score,
            Owner::Player1 => -(WIN_SCORE - board.plies() as Score),
            Owner::Draw => DRAW_SCORE,
            Owner::Empty => {
                self.side_score(board.boards(), Owner::Player0)
                    - self.side_score(board.boards(), Owner::Player1)
            }
        }
    }

    /// Sum over the 8 macro-lines of `min(s0, s1, s2) * (s0 + s1 + s2)`:
    /// a line contributes nothing unless all three of its sub-boards are
    /// still contestable for `player`.
    fn side_score(&self, boards: &[Ttt; 9], player: Owner) -> Score {
        let mut sum = 0;
        for &(a, b, c) in &LINES {
            let s0 = self.score(boards[a], player);
            let s1 = self.score(boards[b], player);
            let s2 = self.score(boards[c], player);
            sum += s0.min(s1).min(s2) * (s0 + s1 + s2);
        }
        sum
    }
}

impl Default for Scoring {
    fn default() -> Self {
        Scoring::new()
    }
}

fn compute_score(ttt: Ttt, player: Owner) -> Score {
    // double victory cannot arise in play; score it symmetrically anyway
    if win(ttt, player) && win(ttt, player.other()) {
        return 0;
    }

    // victory
    if win(ttt, player) {
        return VICTORY_POINTS;
    }
    if win(ttt, player.other()) {
        return 0;
    }

    // draw (not winnable)
    if !winnable(ttt, player) {
        return 0;
    }

    // score based on the number of possible ways to win
    match ways_to_win(ttt, player) {
        5 => return VICTORY_POINTS - 1,
        4 => return VICTORY_POINTS - 2,
        3 => return VICTORY_POINTS - 3,
        2 => return 40,
        1 => return 35,
        _ => {}
    }

    // other metrics
    5 * unique_threats(ttt, player) as Score + 1
}
