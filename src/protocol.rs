//! Line protocol of the game server: `settings` / `update` configure the
//! session, `action move` requests a move. Replies are `place_move X Y`
//! (global column, global row) or `no_moves`. Everything diagnostic goes to
//! the logger, never to the reply stream.

use std::io::{BufRead, Write};
use std::time::Duration;

use anyhow::Result;
use log::{debug, warn};

use crate::agent::Agent;
use crate::board::moves::Move;
use crate::board::subboard::Owner;
use crate::board::Board;

/// Nominal per-move budget.
const MOVE_BUDGET: Duration = Duration::from_millis(450);
/// Budget once the time bank runs low.
const FAILSAFE_BUDGET: Duration = Duration::from_millis(100);
/// Bank level under which the failsafe budget kicks in.
const LOW_BANK: Duration = Duration::from_millis(900);

pub struct GameDriver<A: Agent> {
    board: Board,
    my_bot: Owner,
    forced: Move,
    agent: A,
}

impl<A: Agent> GameDriver<A> {
    pub fn new(agent: A) -> GameDriver<A> {
        GameDriver {
            board: Board::new(),
            my_bot: Owner::Player0,
            forced: Move::ANY,
            agent,
        }
    }

    pub fn run_loop(&mut self, input: impl BufRead, output: &mut impl Write) -> Result<()> {
        for line in input.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if !self.handle_line(line, output)? {
                break;
            }
        }
        Ok(())
    }

    /// Handles one protocol line; returns `false` once the session is over.
    pub fn handle_line(&mut self, line: &str, output: &mut impl Write) -> Result<bool> {
        let mut tokens = line.split_whitespace();
        match tokens.next() {
            Some("settings") => self.cmd_settings(tokens.next(), tokens.next()),
            Some("update") => self.cmd_update(tokens.next(), tokens.next(), tokens.next()),
            Some("action") => self.cmd_action(tokens.next(), tokens.next(), output)?,
            Some("quit") | Some("end") => return Ok(false),
            Some(other) => warn!("ignoring unknown command {other:?}"),
            None => {}
        }
        Ok(true)
    }

    fn cmd_settings(&mut self, key: Option<&str>, value: Option<&str>) {
        match (key, value) {
            (Some("your_botid"), Some(id)) => {
                match id.chars().next().and_then(Owner::from_char) {
                    Some(owner @ (Owner::Player0 | Owner::Player1)) => self.my_bot = owner,
                    _ => warn!("unusable your_botid {id:?}"),
                }
            }
            (Some(key), value) => debug!("ignoring setting {key} {value:?}"),
            _ => {}
        }
    }

    fn cmd_update(&mut self, game: Option<&str>, what: Option<&str>, payload: Option<&str>) {
        if game != Some("game") {
            return;
        }
        match (what, payload) {
            (Some("field"), Some(field)) => match Board::parse(field) {
                Ok(board) => self.board = board,
                Err(err) => warn!("dropping malformed field update: {err}"),
            },
            (Some("macroboard"), Some(macroboard)) => {
                self.forced = parse_macroboard(macroboard);
            }
            (Some(other), _) => debug!("ignoring update game {other}"),
            _ => {}
        }
    }

    fn cmd_action(
        &mut self,
        what: Option<&str>,
        time_bank: Option<&str>,
        output: &mut impl Write,
    ) -> Result<()> {
        if what != Some("move") {
            return Ok(());
        }
        let bank_ms: u64 = time_bank.and_then(|t| t.parse().ok()).unwrap_or(0);
        let budget = if Duration::from_millis(bank_ms) > LOW_BANK {
            MOVE_BUDGET
        } else {
            FAILSAFE_BUDGET
        };

        let mv = self
            .agent
            .play(&mut self.board, self.my_bot, self.forced, budget);

        if mv.is_playable() {
            writeln!(output, "place_move {} {}", mv.global_col(), mv.global_row())?;
        } else {
            writeln!(output, "no_moves")?;
        }
        output.flush()?;
        Ok(())
    }
}

/// The macroboard update names the playable sub-boards with `-1` entries:
/// exactly one means a forced sub-board, anything else means the wildcard.
fn parse_macroboard(payload: &str) -> Move {
    let mut forced = Move::ANY;
    for (i, entry) in payload.split(',').enumerate() {
        if i >= 9 {
            break;
        }
        if entry.trim() == "-1" {
            if forced == Move::ANY {
                forced = Move::new(0, 0, i / 3, i % 3);
            } else {
                return Move::ANY;
            }
        }
    }
    forced
}
