//! The move-picking interface shared by the search engine and the simple
//! uniform-random player.

use std::time::Duration;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::board::moves::Move;
use crate::board::subboard::Owner;
use crate::board::Board;
use crate::search::alphabeta::Searcher;

pub trait Agent {
    /// Picks a move for `player` under the constraint carried by
    /// `generator`, within `budget`. Returns [`Move::END`] when there is no
    /// legal move. The board must come back unchanged.
    fn play(&mut self, board: &mut Board, player: Owner, generator: Move, budget: Duration)
        -> Move;
}

impl Agent for Searcher {
    fn play(
        &mut self,
        board: &mut Board,
        player: Owner,
        generator: Move,
        budget: Duration,
    ) -> Move {
        self.search(board, player, generator, budget).mv
    }
}

/// Picks uniformly among the legal moves. Useful as a protocol smoke test
/// and as an arena baseline.
pub struct RandomAgent {
    rng: SmallRng,
    moves: Vec<Move>,
}

impl RandomAgent {
    pub fn new() -> RandomAgent {
        RandomAgent {
            rng: SmallRng::from_entropy(),
            moves: Vec::with_capacity(81),
        }
    }

    pub fn seeded(seed: u64) -> RandomAgent {
        RandomAgent {
            rng: SmallRng::seed_from_u64(seed),
            moves: Vec::with_capacity(81),
        }
    }
}

impl Default for RandomAgent {
    fn default() -> Self {
        RandomAgent::new()
    }
}

impl Agent for RandomAgent {
    fn play(
        &mut self,
        board: &mut Board,
        _player: Owner,
        generator: Move,
        _budget: Duration,
    ) -> Move {
        self.moves.clear();
        let moves = &mut self.moves;
        board.possible_moves(generator, |mv| moves.push(mv));
        if self.moves.is_empty() {
            Move::END
        } else {
            self.moves[self.rng.gen_range(0..self.moves.len())]
        }
    }
}
