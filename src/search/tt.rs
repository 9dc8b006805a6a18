//! Transposition table: a fixed-capacity open-addressed cache keyed by the
//! two signature families. Either signature indexes the table; the entry
//! stores the other one as its verification word (hence `other_hash`).

use crate::board::moves::Move;
use crate::board::subboard::Ttt;
use crate::search::zobrist::{Hash, Zobrist};
use crate::search::Score;

pub const DEFAULT_CAPACITY: usize = 1 << 24;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Bound {
    Unknown = 0,
    Lower = 1,
    Upper = 2,
    Exact = 3,
}

impl Bound {
    #[inline]
    fn from_bits(bits: u8) -> Bound {
        match bits & 3 {
            0 => Bound::Unknown,
            1 => Bound::Lower,
            2 => Bound::Upper,
            _ => Bound::Exact,
        }
    }
}

const BOUND_MASK: u8 = 0b0011;
const WILDCARD_FLAG: u8 = 0b0100;
const MY_TURN_FLAG: u8 = 0b1000;

/// One stored search result.
///
/// `flags` layout is a contract: bits 0-1 the bound type, bit 2 set when the
/// node was searched under the wildcard constraint, bit 3 set when Player0
/// was to move.
#[derive(Clone, Copy, Default, Debug)]
pub struct Entry {
    pub other_hash: Hash,
    pub value: Score,
    pub best_move: Move,
    pub depth_below: u8,
    flags: u8,
}

impl Entry {
    pub fn new(
        value: Score,
        best_move: Move,
        depth_below: u8,
        bound: Bound,
        wildcard: bool,
        my_turn: bool,
    ) -> Entry {
        let mut flags = bound as u8 & BOUND_MASK;
        if wildcard {
            flags |= WILDCARD_FLAG;
        }
        if my_turn {
            flags |= MY_TURN_FLAG;
        }
        Entry {
            other_hash: 0,
            value,
            best_move,
            depth_below,
            flags,
        }
    }

    #[inline]
    pub fn bound(&self) -> Bound {
        Bound::from_bits(self.flags)
    }

    #[inline]
    pub fn is_wildcard(&self) -> bool {
        self.flags & WILDCARD_FLAG != 0
    }

    #[inline]
    pub fn my_turn(&self) -> bool {
        self.flags & MY_TURN_FLAG != 0
    }
}

/// Diagnostics only; no correctness obligation.
#[derive(Clone, Copy, Default, Debug)]
pub struct Counters {
    pub capacity: u64,
    pub count: u64,
    pub get: u64,
    pub hit: u64,
    pub miss: u64,
    pub put: u64,
    pub collisions: u64,
}

pub struct Table {
    slots: Vec<Entry>,
    zobrist: Zobrist,
    counters: Counters,
}

impl Table {
    pub fn new(capacity: usize) -> Table {
        assert!(capacity > 0, "table capacity must be non-zero");
        Table {
            slots: vec![Entry::default(); capacity],
            zobrist: Zobrist::new(),
            counters: Counters {
                capacity: capacity as u64,
                ..Counters::default()
            },
        }
    }

    pub fn counters(&self) -> &Counters {
        &self.counters
    }

    /// Looks the position up under both signatures. A slot hits when its
    /// verification hash is the position's other signature and the
    /// side-to-move and constraint shape agree (for concrete constraints the
    /// stored best move's sub-board names the constraint).
    pub fn get(&mut self, boards: &[Ttt; 9], my_turn: bool, generator: Move) -> Option<Entry> {
        self.counters.get += 1;

        let wildcard = generator == Move::ANY;
        let forced = if wildcard { 0 } else { generator.micro_index() };

        let h0 = self.zobrist.signature_raw(0, boards, my_turn, wildcard, forced);
        let h1 = self.zobrist.signature_raw(1, boards, my_turn, wildcard, forced);

        let e0 = self.slots[h0 as usize % self.slots.len()];
        if self.matches(&e0, h1, my_turn, wildcard, forced) {
            self.counters.hit += 1;
            return Some(e0);
        }

        let e1 = self.slots[h1 as usize % self.slots.len()];
        if self.matches(&e1, h0, my_turn, wildcard, forced) {
            self.counters.hit += 1;
            return Some(e1);
        }

        self.counters.miss += 1;
        None
    }

    /// Inserts a record. A slot already holding the same position is only
    /// overwritten by a deeper search; otherwise an empty slot is taken;
    /// otherwise the shallower of the two unrelated occupants is evicted
    /// (the smaller subtree is the cheaper one to recompute later).
    pub fn put(&mut self, boards: &[Ttt; 9], mut entry: Entry) {
        self.counters.put += 1;

        let wildcard = entry.is_wildcard();
        let forced = if wildcard {
            0
        } else {
            entry.best_move.macro_index()
        };

        let h0 = self
            .zobrist
            .signature_raw(0, boards, entry.my_turn(), wildcard, forced);
        let h1 = self
            .zobrist
            .signature_raw(1, boards, entry.my_turn(), wildcard, forced);

        let i0 = h0 as usize % self.slots.len();
        let i1 = h1 as usize % self.slots.len();
        let e0 = self.slots[i0];
        let e1 = self.slots[i1];

        let equals0 = self.same_position(&e0, &entry, h1);
        let equals1 = self.same_position(&e1, &entry, h0);

        // keep best or overwrite
        let target = if equals0 {
            if e0.depth_below > entry.depth_below {
                None
            } else {
                Some(i0)
            }
        } else if equals1 {
            if e1.depth_below >= entry.depth_below {
                None
            } else {
                Some(i1)
            }
        }
        // free space
        else if e0.bound() == Bound::Unknown {
            self.counters.count += 1;
            Some(i0)
        } else if e1.bound() == Bound::Unknown {
            self.counters.count += 1;
            Some(i1)
        }
        // both occupied by unrelated positions: evict the smaller tree
        else {
            self.counters.collisions += 1;
            Some(if e0.depth_below <= e1.depth_below { i0 } else { i1 })
        };

        if let Some(i) = target {
            entry.other_hash = if i == i0 { h1 } else { h0 };
            self.slots[i] = entry;
        }
    }

    fn matches(
        &self,
        entry: &Entry,
        other: Hash,
        my_turn: bool,
        wildcard: bool,
        forced: usize,
    ) -> bool {
        entry.bound() != Bound::Unknown
            && entry.other_hash == other
            && entry.my_turn() == my_turn
            && entry.is_wildcard() == wildcard
            && (wildcard || entry.best_move.macro_index() == forced)
    }

    fn same_position(&self, stored: &Entry, new: &Entry, other: Hash) -> bool {
        stored.bound() != Bound::Unknown
            && stored.other_hash == other
            && stored.my_turn() == new.my_turn()
            && stored.is_wildcard() == new.is_wildcard()
            && (new.is_wildcard() || stored.best_move == new.best_move)
    }
}
