//! 7-bit packed move: `(macro_row, macro_col, micro_row, micro_col)`, each
//! in `0..3`, packed as `j = (macro_row*3 + macro_col)*9 + micro_row*3 +
//! micro_col`. Values 81..=83 are reserved sentinels.

use std::fmt;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Move {
    j: u8,
}

impl Move {
    /// No-move marker; also what a search returns on a terminal position.
    pub const END: Move = Move { j: 81 };
    /// Present in a move list but pruned from consideration.
    pub const SKIP: Move = Move { j: 82 };
    /// Wildcard constraint: the next move may target any non-decided
    /// sub-board.
    pub const ANY: Move = Move { j: 83 };

    #[inline]
    pub fn new(macro_row: usize, macro_col: usize, micro_row: usize, micro_col: usize) -> Move {
        debug_assert!(macro_row < 3 && macro_col < 3 && micro_row < 3 && micro_col < 3);
        Move {
            j: (macro_row * 27 + macro_col * 9 + micro_row * 3 + micro_col) as u8,
        }
    }

    #[inline]
    pub fn from_index(j: u8) -> Move {
        debug_assert!(j <= 83);
        Move { j }
    }

    #[inline]
    pub fn index(self) -> u8 {
        self.j
    }

    #[inline]
    pub fn is_playable(self) -> bool {
        self.j < 81
    }

    #[inline]
    pub fn macro_row(self) -> usize {
        (self.j / 27) as usize
    }

    #[inline]
    pub fn macro_col(self) -> usize {
        ((self.j % 27) / 9) as usize
    }

    #[inline]
    pub fn micro_row(self) -> usize {
        ((self.j % 9) / 3) as usize
    }

    #[inline]
    pub fn micro_col(self) -> usize {
        (self.j % 3) as usize
    }

    /// Index of the targeted sub-board on the macro board.
    #[inline]
    pub fn macro_index(self) -> usize {
        (self.j / 9) as usize
    }

    /// Cell index within the targeted sub-board. For a constraint move this
    /// doubles as the index of the sub-board the reply is forced into.
    #[inline]
    pub fn micro_index(self) -> usize {
        (self.j % 9) as usize
    }

    /// Column on the 9x9 board, as the game server counts.
    #[inline]
    pub fn global_col(self) -> usize {
        self.macro_col() * 3 + self.micro_col()
    }

    /// Row on the 9x9 board.
    #[inline]
    pub fn global_row(self) -> usize {
        self.macro_row() * 3 + self.micro_row()
    }
}

impl Default for Move {
    fn default() -> Self {
        Move::END
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Move::END => write!(f, "end"),
            Move::SKIP => write!(f, "skip"),
            Move::ANY => write!(f, "any"),
            mv => write!(
                f,
                "({} {} {} {})",
                mv.macro_row(),
                mv.macro_col(),
                mv.micro_row(),
                mv.micro_col()
            ),
        }
    }
}
