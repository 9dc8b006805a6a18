use std::io;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use log::debug;

use ninebot::agent::RandomAgent;
use ninebot::protocol::GameDriver;
use ninebot::search::alphabeta::Searcher;
use ninebot::search::eval::Scoring;
use ninebot::search::tt::DEFAULT_CAPACITY;

#[derive(Parser, Debug)]
#[command(author, version, about = "Ultimate Tic-Tac-Toe bot speaking the game-server line protocol", long_about = None)]
struct Args {
    /// Agent to run: 'minmax' or 'random'
    #[arg(long, default_value = "minmax")]
    agent: String,

    /// Transposition table capacity in entries
    #[arg(long, default_value_t = DEFAULT_CAPACITY)]
    table_entries: usize,

    /// Seed for the random agent
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    match args.agent.as_str() {
        "minmax" => {
            let started = Instant::now();
            let scoring = Arc::new(Scoring::new());
            let searcher = Searcher::new(scoring, args.table_entries);
            debug!("tables ready in {:?}", started.elapsed());
            GameDriver::new(searcher).run_loop(stdin.lock(), &mut stdout)
        }
        "random" => {
            let agent = match args.seed {
                Some(seed) => RandomAgent::seeded(seed),
                None => RandomAgent::new(),
            };
            GameDriver::new(agent).run_loop(stdin.lock(), &mut stdout)
        }
        other => anyhow::bail!("unknown agent {other:?} (expected 'minmax' or 'random')"),
    }
}
