//! Two independent 32-bit signature families over full positions.
//!
//! Each family holds one random key per (sub-board content, sub-board index)
//! pair plus keys for side-to-move, the wildcard flag and the concrete
//! forced sub-board; a signature is the XOR of the nine content keys with
//! the three feature keys. Decided contents (won by either player, or full
//! without a winner) share one key per (family, index), so move orders that
//! reach an equivalent decided sub-board hash identically.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::board::moves::Move;
use crate::board::subboard::{nones, win, Owner, Ttt, NUM_TTT};

pub type Hash = u32;

/// Number of signature families; one indexes the table, the other verifies.
pub const FAMILIES: usize = 2;

const KEY_SEED: u64 = 0xF1E2_D3C4_B5A6_9788;

pub struct Zobrist {
    // [index][content][family]
    cells: Box<[Hash]>,
    my_turn: [[Hash; FAMILIES]; 2],
    wildcard: [[Hash; FAMILIES]; 2],
    forced: [[Hash; FAMILIES]; 9],
}

impl Zobrist {
    pub fn new() -> Zobrist {
        let mut rng = SmallRng::seed_from_u64(KEY_SEED);

        let mut my_turn = [[0; FAMILIES]; 2];
        let mut wildcard = [[0; FAMILIES]; 2];
        let mut forced = [[0; FAMILIES]; 9];
        for keys in my_turn.iter_mut().chain(wildcard.iter_mut()) {
            for k in keys.iter_mut() {
                *k = rng.gen();
            }
        }
        for keys in forced.iter_mut() {
            for k in keys.iter_mut() {
                *k = rng.gen();
            }
        }

        let mut cells = vec![0 as Hash; FAMILIES * 9 * NUM_TTT].into_boxed_slice();
        for index in 0..9 {
            let won0: [Hash; FAMILIES] = [rng.gen(), rng.gen()];
            let won1: [Hash; FAMILIES] = [rng.gen(), rng.gen()];
            let drawn: [Hash; FAMILIES] = [rng.gen(), rng.gen()];

            for content in 0..NUM_TTT as Ttt {
                for family in 0..FAMILIES {
                    let key = if win(content, Owner::Player0) {
                        won0[family]
                    } else if win(content, Owner::Player1) {
                        won1[family]
                    } else if nones(content) == 0 {
                        drawn[family]
                    } else {
                        rng.gen()
                    };
                    cells[key_pos(index, content, family)] = key;
                }
            }
        }

        Zobrist {
            cells,
            my_turn,
            wildcard,
            forced,
        }
    }

    /// Signature of a full position under the constraint carried by
    /// `generator` (`Move::ANY` or a concrete prior move).
    #[inline]
    pub fn signature(
        &self,
        family: usize,
        boards: &[Ttt; 9],
        my_turn: bool,
        generator: Move,
    ) -> Hash {
        let wildcard = generator == Move::ANY;
        let forced = if wildcard { 0 } else { generator.micro_index() };
        self.signature_raw(family, boards, my_turn, wildcard, forced)
    }

    #[inline]
    pub fn signature_raw(
        &self,
        family: usize,
        boards: &[Ttt; 9],
        my_turn: bool,
        wildcard: bool,
        forced: usize,
    ) -> Hash {
        let mut h = 0;
        for (index, &content) in boards.iter().enumerate() {
            h ^= self.cells[key_pos(index, content, family)];
        }
        h ^ self.my_turn[my_turn as usize][family]
            ^ self.wildcard[wildcard as usize][family]
            ^ self.forced[forced][family]
    }
}

impl Default for Zobrist {
    fn default() -> Self {
        Zobrist::new()
    }
}

#[inline]
fn key_pos(index: usize, content: Ttt, family: usize) -> usize {
    (index * NUM_TTT + content as usize) * FAMILIES + family
}
