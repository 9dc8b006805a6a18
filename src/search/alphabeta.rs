//! Iterative-deepening negamax with alpha-beta pruning, hash-move and
//! history-heuristic move ordering, and a cooperative time budget.
//!
//! The board is mutated and restored around every recursion instead of being
//! copied. Time exhaustion surfaces as an `Err` that every active frame
//! undoes its own move for before propagating, so the board comes back
//! value-identical no matter how deep the abort originated.

use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, info, warn};

use crate::board::moves::Move;
use crate::board::subboard::{set_cell, Owner};
use crate::board::{Board, MAX_PLIES};
use crate::search::eval::Scoring;
use crate::search::tt::{Bound, Counters, Entry, Table};
use crate::search::{decode_draw, is_draw, MoveValued, Score, SCORE_INF, WIN_SCORE};

pub const MIN_DEPTH: usize = 1;

/// Budget polling cadence; checking the clock on every node would cost more
/// than it saves.
const TIME_CHECK_INTERVAL: u64 = 30_000;

/// Below this many remaining plies a table probe is not worth its overhead.
const TABLE_CUTOFF: usize = 2;

/// Cooperative abort marker raised when the time budget runs out.
struct Aborted;

#[derive(Clone, Copy)]
struct RankedMove {
    mv: Move,
    weight: f64,
}

pub struct Searcher {
    table: Table,
    scoring: Arc<Scoring>,
    // Cut statistics per (global cell, side to move), cleared per search.
    history: [[f64; 2]; 81],
    // Constraint per recursion depth; index 0 is the root constraint.
    generators: [Move; MAX_PLIES + 1],
    // Preallocated per-depth move lists, no allocation in the hot path.
    move_bufs: Vec<Vec<RankedMove>>,
    budget: Duration,
    start: Instant,
    nodes: u64,
    prev_nodes: u64,
}

impl Searcher {
    pub fn new(scoring: Arc<Scoring>, table_capacity: usize) -> Searcher {
        Searcher {
            table: Table::new(table_capacity),
            scoring,
            history: [[0.0; 2]; 81],
            generators: [Move::END; MAX_PLIES + 1],
            move_bufs: (0..=MAX_PLIES).map(|_| Vec::with_capacity(81)).collect(),
            budget: Duration::ZERO,
            start: Instant::now(),
            nodes: 0,
            prev_nodes: 0,
        }
    }

    /// Nodes visited by the most recent search.
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    pub fn table_counters(&self) -> &Counters {
        self.table.counters()
    }

    /// Picks a move for `player` within `budget`, deepening one ply at a
    /// time. The most recently completed depth's best move is returned; a
    /// depth cancelled mid-iteration is discarded. On a terminal position
    /// the result carries [`Move::END`].
    pub fn search(
        &mut self,
        board: &mut Board,
        player: Owner,
        generator: Move,
        budget: Duration,
    ) -> MoveValued {
        self.start = Instant::now();
        self.budget = budget;
        self.clear_history();
        self.nodes = 0;

        let mut best = MoveValued {
            mv: Move::END,
            value: -1,
        };
        let mut max_depth = MIN_DEPTH;
        loop {
            // stop once the outcome is proven within the horizon
            if is_draw(best.value) || best.value.abs() >= WIN_SCORE - MAX_PLIES as Score {
                break;
            }
            self.prev_nodes = self.nodes;
            self.generators[0] = generator;
            match self.minmax(board, 0, max_depth, player, -SCORE_INF, SCORE_INF) {
                Ok(result) => {
                    best = result;
                    self.log_depth(max_depth);
                    max_depth += 1;
                    if max_depth > MAX_PLIES || self.start.elapsed() >= self.budget {
                        break;
                    }
                }
                Err(Aborted) => {
                    max_depth -= 1;
                    debug!("aborting next deepening");
                    break;
                }
            }
        }

        let elapsed = self.start.elapsed();
        info!(
            "choice D{} {}: value {}, {} nodes in {:.1} ms",
            max_depth,
            best.mv,
            decode_draw(best.value),
            self.nodes,
            elapsed.as_secs_f64() * 1e3,
        );
        best
    }

    /// One fixed-depth search with no clock; the deepening loop and the
    /// tests are built on this.
    pub fn search_to_depth(
        &mut self,
        board: &mut Board,
        player: Owner,
        generator: Move,
        max_depth: usize,
    ) -> MoveValued {
        self.start = Instant::now();
        self.budget = Duration::MAX;
        self.nodes = 0;
        self.generators[0] = generator;
        match self.minmax(board, 0, max_depth.min(MAX_PLIES), player, -SCORE_INF, SCORE_INF) {
            Ok(result) => result,
            // unreachable under an unlimited budget
            Err(Aborted) => MoveValued {
                mv: Move::END,
                value: -1,
            },
        }
    }

    fn minmax(
        &mut self,
        board: &mut Board,
        depth: usize,
        max_depth: usize,
        player: Owner,
        mut alpha: Score,
        beta: Score,
    ) -> Result<MoveValued, Aborted> {
        self.nodes += 1;
        if self.nodes % TIME_CHECK_INTERVAL == 0 && self.start.elapsed() >= self.budget {
            return Err(Aborted);
        }

        if board.winner_or_draw() != Owner::Empty || depth == max_depth {
            let score = self.scoring.board_score(board);
            let value = if is_draw(score) || player == Owner::Player0 {
                score
            } else {
                -score
            };
            // no need to save this position
            return Ok(MoveValued {
                mv: Move::END,
                value,
            });
        }

        let my_turn = player == Owner::Player0;
        let generator = self.generators[depth];
        let remaining = max_depth - depth;

        let mut bound = Bound::Upper;
        let mut best = MoveValued {
            mv: Move::END,
            value: -SCORE_INF,
        };

        let mut probe = if remaining >= TABLE_CUTOFF {
            self.table.get(board.boards(), my_turn, generator)
        } else {
            None
        };

        let mut hash_move = Move::END;
        let mut hash_trusted = false;

        'node: {
            if let Some(entry) = probe {
                hash_move = entry.best_move;
                if board.is_valid_move(generator, hash_move) {
                    // the stored result is only usable when it looked at
                    // least as deep as we still have to
                    if remaining <= entry.depth_below as usize {
                        hash_trusted = entry.bound() != Bound::Upper;
                        match entry.bound() {
                            Bound::Exact => {
                                return Ok(MoveValued {
                                    mv: hash_move,
                                    value: entry.value,
                                });
                            }
                            Bound::Lower => {
                                if decode_draw(entry.value) > decode_draw(best.value) {
                                    best = MoveValued {
                                        mv: hash_move,
                                        value: entry.value,
                                    };
                                    if decode_draw(best.value) > decode_draw(alpha) {
                                        bound = Bound::Exact;
                                        alpha = best.value;
                                        if decode_draw(alpha) >= decode_draw(beta) {
                                            bound = Bound::Lower;
                                            self.bump_history(best.mv, my_turn, remaining);
                                            break 'node;
                                        }
                                    }
                                }
                            }
                            _ => {}
                        }
                    }
                } else {
                    warn!("transposition table collision returned the impossible move {hash_move}; ignoring the entry");
                    probe = None;
                }
            }

            // generate moves
            let mut moves = std::mem::take(&mut self.move_bufs[depth]);
            moves.clear();
            board.possible_moves(generator, |mv| moves.push(RankedMove { mv, weight: 0.0 }));

            // order moves: history cuts while the subtree is deep enough for
            // them to be meaningful, one-ply lookahead otherwise
            let mut hash_at = None;
            for i in 0..moves.len() {
                let mv = moves[i].mv;
                if probe.is_some() && mv == hash_move {
                    hash_at = Some(i);
                    continue;
                }
                moves[i].weight = if remaining >= 3 {
                    self.history[history_index(mv)][my_turn as usize]
                } else {
                    let mut ttt = board.subboard(mv.macro_index());
                    set_cell(&mut ttt, mv.micro_index(), player);
                    let sign = if my_turn { 1.0 } else { -1.0 };
                    sign * self.scoring.score(ttt, player) as f64
                };
            }
            let mut sort_from = 0;
            if let Some(i) = hash_at {
                if hash_trusted {
                    // its value is already folded in; don't expand it again
                    moves[i] = RankedMove {
                        mv: Move::SKIP,
                        weight: f64::NEG_INFINITY,
                    };
                } else {
                    moves.swap(0, i);
                    sort_from = 1;
                }
            }
            moves[sort_from..].sort_unstable_by(|a, b| b.weight.total_cmp(&a.weight));

            // for every possible move
            let mut aborted = false;
            for i in 0..moves.len() {
                let mv = moves[i].mv;
                if mv == Move::SKIP {
                    continue;
                }

                board.action(mv, player);
                self.generators[depth + 1] = if board.is_decided(mv.micro_index()) {
                    Move::ANY
                } else {
                    mv
                };

                let child = self.minmax(
                    board,
                    depth + 1,
                    max_depth,
                    player.other(),
                    -decode_draw(beta),
                    -decode_draw(alpha),
                );
                // undo before the abort can propagate
                board.cancel();
                let current = match child {
                    Ok(result) => result,
                    Err(Aborted) => {
                        aborted = true;
                        break;
                    }
                };

                let mut value = current.value;
                if !is_draw(value) {
                    value = -value; // negamax
                }

                if decode_draw(value) > decode_draw(best.value) {
                    best = MoveValued { mv, value };

                    if decode_draw(best.value) > decode_draw(alpha) {
                        bound = Bound::Exact;
                        alpha = best.value;

                        if decode_draw(alpha) >= decode_draw(beta) {
                            // alpha-beta cutoff; deep cuts weigh heavier
                            bound = Bound::Lower;
                            self.bump_history(best.mv, my_turn, remaining);
                            break;
                        }
                    }
                }
            }
            self.move_bufs[depth] = moves;
            if aborted {
                return Err(Aborted);
            }
        }

        // save the node unless it never improved on the upper-bound
        // assumption or sits too close to the leaves
        if bound != Bound::Upper && remaining >= TABLE_CUTOFF {
            let entry = Entry::new(
                alpha,
                best.mv,
                remaining as u8,
                bound,
                generator == Move::ANY,
                my_turn,
            );
            self.table.put(board.boards(), entry);
        }

        Ok(best)
    }

    fn clear_history(&mut self) {
        self.history = [[0.0; 2]; 81];
    }

    fn bump_history(&mut self, mv: Move, my_turn: bool, remaining: usize) {
        self.history[history_index(mv)][my_turn as usize] += 4f64.powi(remaining as i32);
    }

    fn log_depth(&self, max_depth: usize) {
        let c = self.table.counters();
        let hit_pct = if c.get != 0 { 100.0 * c.hit as f64 / c.get as f64 } else { 100.0 };
        let miss_pct = if c.get != 0 { 100.0 * c.miss as f64 / c.get as f64 } else { 100.0 };
        let coll_pct = if c.get != 0 { 100.0 * c.collisions as f64 / c.get as f64 } else { 0.0 };
        let use_pct = if c.capacity != 0 { 100.0 * c.count as f64 / c.capacity as f64 } else { 100.0 };
        debug!(
            "D{} cost: {}, hit%: {:.3}, miss%: {:.3}, collisions%: {:.3}, use%: {:.3}",
            max_depth,
            self.nodes - self.prev_nodes,
            hit_pct,
            miss_pct,
            coll_pct,
            use_pct,
        );
    }
}

#[inline]
fn history_index(mv: Move) -> usize {
    mv.global_row() * 9 + mv.global_col()
}
