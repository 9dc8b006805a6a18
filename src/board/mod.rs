//! Full game state: nine packed sub-boards, the derived macro-board, the
//! winner flag and a snapshot-based undo stack.

pub mod moves;
pub mod subboard;

use std::fmt;

use thiserror::Error;

use self::moves::Move;
use self::subboard::{
    cell, nones, normalize, set_cell, set_cell_at, win, Owner, Ttt, EMPTY_TTT,
};

/// A game can never exceed 81 plies.
pub const MAX_PLIES: usize = 81;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct State {
    boards: [Ttt; 9],
    macro_board: Ttt,
    nones_sum: u8,
    winner: Owner,
}

impl State {
    fn empty() -> State {
        State {
            boards: [EMPTY_TTT; 9],
            macro_board: EMPTY_TTT,
            nones_sum: MAX_PLIES as u8,
            winner: Owner::Empty,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unexpected character {0:?} in field string")]
    BadCell(char),
    #[error("field string ended after {0} cells, expected 81")]
    Truncated(usize),
}

/// Mutable game state. Search mutates it in place through
/// [`Board::action`] / [`Board::cancel`] instead of copying.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Board {
    state: State,
    undo: Vec<State>,
}

impl Board {
    pub fn new() -> Board {
        Board {
            state: State::empty(),
            undo: Vec::with_capacity(MAX_PLIES),
        }
    }

    /// Parses the game-server field string: 81 cells over `.01X` in global
    /// row-major order, commas between cells skipped. Decided sub-boards are
    /// canonicalized and their remaining empties written off.
    pub fn parse(input: &str) -> Result<Board, ParseError> {
        let mut board = Board::new();
        let mut chars = input.chars();
        let mut seen = 0usize;

        for macro_row in 0..3 {
            for micro_row in 0..3 {
                for macro_col in 0..3 {
                    for micro_col in 0..3 {
                        let mut c = chars.next().ok_or(ParseError::Truncated(seen))?;
                        if c == ',' {
                            c = chars.next().ok_or(ParseError::Truncated(seen))?;
                        }
                        let owner = Owner::from_char(c).ok_or(ParseError::BadCell(c))?;
                        set_cell_at(
                            &mut board.state.boards[macro_row * 3 + macro_col],
                            micro_row,
                            micro_col,
                            owner,
                        );
                        if owner != Owner::Empty {
                            board.state.nones_sum -= 1;
                        }
                        seen += 1;
                    }
                }
            }
        }

        for i in 0..9 {
            let ttt = board.state.boards[i];
            if win(ttt, Owner::Player0) || win(ttt, Owner::Player1) {
                board.state.nones_sum -= nones(ttt) as u8;
            }
            board.state.boards[i] = normalize(ttt);
        }

        board.state.macro_board = board.derive_macro_board();
        if win(board.state.macro_board, Owner::Player0) {
            board.state.winner = Owner::Player0;
        } else if win(board.state.macro_board, Owner::Player1) {
            board.state.winner = Owner::Player1;
        }
        Ok(board)
    }

    /// Inverse of [`Board::parse`]: the comma-separated field format.
    pub fn to_field_string(&self) -> String {
        let mut out = String::with_capacity(2 * 81);
        for macro_row in 0..3 {
            for micro_row in 0..3 {
                for macro_col in 0..3 {
                    for micro_col in 0..3 {
                        if !out.is_empty() {
                            out.push(',');
                        }
                        out.push(
                            subboard::cell_at(
                                self.state.boards[macro_row * 3 + macro_col],
                                micro_row,
                                micro_col,
                            )
                            .to_char(),
                        );
                    }
                }
            }
        }
        out
    }

    #[inline]
    pub fn boards(&self) -> &[Ttt; 9] {
        &self.state.boards
    }

    #[inline]
    pub fn subboard(&self, macro_index: usize) -> Ttt {
        self.state.boards[macro_index]
    }

    #[inline]
    pub fn macro_board(&self) -> Ttt {
        self.state.macro_board
    }

    #[inline]
    pub fn cell(&self, mv: Move) -> Owner {
        cell(self.state.boards[mv.macro_index()], mv.micro_index())
    }

    /// Moves applied (and not cancelled) since construction.
    #[inline]
    pub fn plies(&self) -> usize {
        self.undo.len()
    }

    /// Empty cells still reachable by play.
    #[inline]
    pub fn empties(&self) -> u32 {
        self.state.nones_sum as u32
    }

    #[inline]
    pub fn winner(&self) -> Owner {
        self.state.winner
    }

    /// The winner, `Draw` once no playable cell remains, `Empty` while the
    /// game is still open.
    #[inline]
    pub fn winner_or_draw(&self) -> Owner {
        if self.state.winner != Owner::Empty {
            self.state.winner
        } else if self.state.nones_sum == 0 {
            Owner::Draw
        } else {
            Owner::Empty
        }
    }

    /// Whether sub-board `macro_index` is won or full.
    #[inline]
    pub fn is_decided(&self, macro_index: usize) -> bool {
        let ttt = self.state.boards[macro_index];
        win(ttt, Owner::Player0) || win(ttt, Owner::Player1) || nones(ttt) == 0
    }

    /// Yields every legal move under `generator`: the empties of the forced
    /// sub-board, or the empties of every non-decided sub-board under
    /// [`Move::ANY`].
    pub fn possible_moves(&self, generator: Move, mut f: impl FnMut(Move)) {
        debug_assert!(generator != Move::END && generator != Move::SKIP);

        if generator != Move::ANY {
            let m = generator.micro_index();
            for c in 0..9 {
                if cell(self.state.boards[m], c) == Owner::Empty {
                    f(Move::from_index((m * 9 + c) as u8));
                }
            }
        } else {
            for m in 0..9 {
                if self.is_decided(m) {
                    continue;
                }
                for c in 0..9 {
                    if cell(self.state.boards[m], c) == Owner::Empty {
                        f(Move::from_index((m * 9 + c) as u8));
                    }
                }
            }
        }
    }

    /// Constraint match, target sub-board not decided, target cell empty.
    pub fn is_valid_move(&self, generator: Move, mv: Move) -> bool {
        if !mv.is_playable() {
            return false;
        }
        (generator == Move::ANY
            || (generator.micro_row() == mv.macro_row()
                && generator.micro_col() == mv.macro_col()))
            && !self.is_decided(mv.macro_index())
            && self.cell(mv) == Owner::Empty
    }

    /// Applies `mv` for `player`: snapshot, write the mark, and when the
    /// sub-board is thereby decided, write off its dead empties, canonicalize
    /// it, update the macro cell and re-derive the game winner.
    pub fn action(&mut self, mv: Move, player: Owner) {
        self.undo.push(self.state);

        let mi = mv.macro_index();
        set_cell(&mut self.state.boards[mi], mv.micro_index(), player);
        self.state.nones_sum -= 1;

        let ttt = self.state.boards[mi];
        let outcome = if win(ttt, Owner::Player0) {
            Owner::Player0
        } else if win(ttt, Owner::Player1) {
            Owner::Player1
        } else if nones(ttt) == 0 {
            Owner::Draw
        } else {
            return; // no macro update needed
        };

        self.state.nones_sum -= nones(ttt) as u8;
        self.state.boards[mi] = normalize(ttt);
        set_cell(&mut self.state.macro_board, mi, outcome);

        if win(self.state.macro_board, Owner::Player0) {
            self.state.winner = Owner::Player0;
        } else if win(self.state.macro_board, Owner::Player1) {
            self.state.winner = Owner::Player1;
        } else if self.state.nones_sum == 0 {
            self.state.winner = Owner::Draw;
        }
    }

    /// Restores the state saved by the matching [`Board::action`].
    pub fn cancel(&mut self) {
        self.state = self
            .undo
            .pop()
            .expect("cancel() without a matching action()");
    }

    fn derive_macro_board(&self) -> Ttt {
        let mut macro_board = EMPTY_TTT;
        for i in 0..9 {
            let ttt = self.state.boards[i];
            if win(ttt, Owner::Player0) {
                set_cell(&mut macro_board, i, Owner::Player0);
            } else if win(ttt, Owner::Player1) {
                set_cell(&mut macro_board, i, Owner::Player1);
            } else if nones(ttt) == 0 {
                set_cell(&mut macro_board, i, Owner::Draw);
            }
        }
        macro_board
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for macro_row in 0..3 {
            for micro_row in 0..3 {
                for macro_col in 0..3 {
                    for micro_col in 0..3 {
                        let owner = subboard::cell_at(
                            self.state.boards[macro_row * 3 + macro_col],
                            micro_row,
                            micro_col,
                        );
                        write!(f, "{} ", owner.to_char())?;
                    }
                }
                writeln!(f)?;
            }
        }
        writeln!(f, "winner: {:?}, empties: {}", self.winner_or_draw(), self.empties())
    }
}
