use std::io::Cursor;
use std::sync::Arc;

use ninebot::agent::RandomAgent;
use ninebot::protocol::GameDriver;
use ninebot::search::alphabeta::Searcher;
use ninebot::search::eval::Scoring;

fn empty_field() -> String {
    let cells: Vec<String> = std::iter::repeat(".".to_string()).take(81).collect();
    cells.join(",")
}

fn field(rows: [&str; 9]) -> String {
    let cells: Vec<String> = rows.concat().chars().map(|c| c.to_string()).collect();
    assert_eq!(cells.len(), 81);
    cells.join(",")
}

fn run_session(script: &str) -> Vec<String> {
    let mut driver = GameDriver::new(RandomAgent::seeded(5));
    let mut out = Vec::new();
    driver
        .run_loop(Cursor::new(script.as_bytes()), &mut out)
        .expect("session runs");
    String::from_utf8(out)
        .expect("utf8 replies")
        .lines()
        .map(|l| l.to_string())
        .collect()
}

fn parse_place_move(line: &str) -> (usize, usize) {
    let mut tokens = line.split_whitespace();
    assert_eq!(tokens.next(), Some("place_move"), "unexpected reply {line:?}");
    let col = tokens.next().unwrap().parse().unwrap();
    let row = tokens.next().unwrap().parse().unwrap();
    (col, row)
}

#[test]
fn first_move_with_wildcard_macroboard() {
    let script = format!(
        "settings your_botid 0\n\
         update game field {}\n\
         update game macroboard -1,-1,-1,-1,-1,-1,-1,-1,-1\n\
         action move 10000\n",
        empty_field()
    );
    let replies = run_session(&script);
    assert_eq!(replies.len(), 1);
    let (col, row) = parse_place_move(&replies[0]);
    assert!(col < 9 && row < 9, "coordinates off the board: {col} {row}");
}

#[test]
fn single_playable_macro_cell_forces_the_reply() {
    // only macro cell (0, 1) is open, so the reply must land there
    let script = format!(
        "settings your_botid 1\n\
         update game field {}\n\
         update game macroboard 0,-1,0,0,0,0,0,0,0\n\
         action move 10000\n",
        empty_field()
    );
    let replies = run_session(&script);
    let (col, row) = parse_place_move(&replies[0]);
    assert!((3..6).contains(&col), "wrong sub-board column: {col}");
    assert!(row < 3, "wrong sub-board row: {row}");
}

#[test]
fn several_playable_macro_cells_mean_wildcard() {
    let script = format!(
        "settings your_botid 0\n\
         update game field {}\n\
         update game macroboard -1,0,0,0,-1,0,0,0,0\n\
         action move 10000\n",
        empty_field()
    );
    let replies = run_session(&script);
    let (col, row) = parse_place_move(&replies[0]);
    // any legal cell of any open sub-board qualifies under the wildcard
    assert!(col < 9 && row < 9);
}

#[test]
fn repeated_actions_keep_replying() {
    let script = format!(
        "settings your_botid 0\n\
         update game field {}\n\
         update game macroboard -1,-1,-1,-1,-1,-1,-1,-1,-1\n\
         action move 10000\n\
         action move 9000\n",
        empty_field()
    );
    let replies = run_session(&script);
    assert_eq!(replies.len(), 2);
    parse_place_move(&replies[0]);
    parse_place_move(&replies[1]);
}

#[test]
fn decided_game_answers_no_moves() {
    let won_field = field([
        "000000000",
        ".........",
        ".........",
        ".........",
        ".........",
        ".........",
        ".........",
        ".........",
        ".........",
    ]);
    let script = format!(
        "settings your_botid 1\n\
         update game field {won_field}\n\
         update game macroboard 0,0,0,-1,-1,-1,-1,-1,-1\n\
         action move 500\n"
    );

    let scoring = Arc::new(Scoring::new());
    let mut driver = GameDriver::new(Searcher::new(scoring, 1 << 14));
    let mut out = Vec::new();
    driver
        .run_loop(Cursor::new(script.as_bytes()), &mut out)
        .expect("session runs");
    let reply = String::from_utf8(out).unwrap();
    assert_eq!(reply.trim(), "no_moves");
}

#[test]
fn malformed_field_updates_are_dropped() {
    // the bad update is ignored and the previous (empty) board stays in play
    let script = "settings your_botid 0\n\
         update game field garbage\n\
         update game macroboard -1,-1,-1,-1,-1,-1,-1,-1,-1\n\
         action move 10000\n";
    let replies = run_session(script);
    parse_place_move(&replies[0]);
}
