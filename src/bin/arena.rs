use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use indicatif::ProgressBar;

use ninebot::agent::{Agent, RandomAgent};
use ninebot::board::moves::Move;
use ninebot::board::subboard::Owner;
use ninebot::board::Board;
use ninebot::search::alphabeta::Searcher;
use ninebot::search::eval::Scoring;

#[derive(Parser, Debug)]
#[command(name = "arena", about = "Play head-to-head games between two agents")]
struct Args {
    /// Number of games to play
    #[arg(long, default_value_t = 20)]
    games: usize,

    /// Movetime per move in milliseconds
    #[arg(long, default_value_t = 100)]
    movetime: u64,

    /// Agent A: 'minmax' or 'random'
    #[arg(long, default_value = "minmax")]
    agent_a: String,

    /// Agent B: 'minmax' or 'random'
    #[arg(long, default_value = "random")]
    agent_b: String,

    /// Transposition table capacity in entries, per minmax agent
    #[arg(long, default_value_t = 1 << 20)]
    table_entries: usize,

    /// Random seed
    #[arg(long, default_value_t = 1u64)]
    seed: u64,
}

fn build_agent(
    name: &str,
    seed: u64,
    table_entries: usize,
    scoring: &Arc<Scoring>,
) -> Result<Box<dyn Agent>> {
    match name {
        "minmax" => Ok(Box::new(Searcher::new(scoring.clone(), table_entries))),
        "random" => Ok(Box::new(RandomAgent::seeded(seed))),
        other => anyhow::bail!("unknown agent {other:?} (expected 'minmax' or 'random')"),
    }
}

/// Plays one game out; returns the winner, `Draw`, or `Empty` when a side
/// had to resign for lack of a move.
fn play_game<'a>(
    first: &'a mut dyn Agent,
    second: &'a mut dyn Agent,
    budget: Duration,
) -> Owner {
    let mut board = Board::new();
    let mut forced = Move::ANY;
    let mut player = Owner::Player0;

    while board.winner_or_draw() == Owner::Empty {
        let agent = if player == Owner::Player0 {
            &mut *first
        } else {
            &mut *second
        };
        let mv = agent.play(&mut board, player, forced, budget);
        if !mv.is_playable() {
            return Owner::Empty;
        }
        board.action(mv, player);
        forced = if board.is_decided(mv.micro_index()) {
            Move::ANY
        } else {
            mv
        };
        player = player.other();
    }
    board.winner_or_draw()
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let budget = Duration::from_millis(args.movetime);

    let scoring = Arc::new(Scoring::new());
    let mut agent_a = build_agent(&args.agent_a, args.seed, args.table_entries, &scoring)?;
    let mut agent_b = build_agent(&args.agent_b, args.seed + 1, args.table_entries, &scoring)?;

    let mut wins_a = 0usize;
    let mut wins_b = 0usize;
    let mut draws = 0usize;

    let bar = ProgressBar::new(args.games as u64);
    for game in 0..args.games {
        // alternate colors for fairness
        let a_is_first = game % 2 == 0;
        let outcome = if a_is_first {
            play_game(agent_a.as_mut(), agent_b.as_mut(), budget)
        } else {
            play_game(agent_b.as_mut(), agent_a.as_mut(), budget)
        };

        match outcome {
            Owner::Player0 => {
                if a_is_first {
                    wins_a += 1
                } else {
                    wins_b += 1
                }
            }
            Owner::Player1 => {
                if a_is_first {
                    wins_b += 1
                } else {
                    wins_a += 1
                }
            }
            _ => draws += 1,
        }
        bar.inc(1);
    }
    bar.finish_and_clear();

    println!(
        "{} vs {}: +{} ={} -{} over {} games",
        args.agent_a, args.agent_b, wins_a, draws, wins_b, args.games
    );
    Ok(())
}
