use std::time::Duration;

use ninebot::agent::{Agent, RandomAgent};
use ninebot::board::moves::Move;
use ninebot::board::subboard::Owner;
use ninebot::board::{Board, MAX_PLIES};

#[test]
fn random_agent_plays_only_legal_moves_to_the_end() {
    let mut agent = RandomAgent::seeded(7);
    let mut board = Board::new();
    let mut forced = Move::ANY;
    let mut player = Owner::Player0;
    let budget = Duration::from_millis(1);

    let mut plies = 0;
    while board.winner_or_draw() == Owner::Empty {
        let mv = agent.play(&mut board, player, forced, budget);
        assert!(
            board.is_valid_move(forced, mv),
            "illegal move {mv} under constraint {forced} at ply {plies}"
        );
        board.action(mv, player);
        forced = if board.is_decided(mv.micro_index()) {
            Move::ANY
        } else {
            mv
        };
        player = player.other();
        plies += 1;
        assert!(plies <= MAX_PLIES, "game exceeded {MAX_PLIES} plies");
    }
}

#[test]
fn random_agent_reports_no_move_on_a_full_subboard_constraint() {
    // fill sub-board 0 by hand, then force the reply into it
    let mut board = Board::new();
    let marks = [
        (0, Owner::Player0),
        (1, Owner::Player1),
        (2, Owner::Player0),
        (3, Owner::Player0),
        (4, Owner::Player1),
        (5, Owner::Player1),
        (6, Owner::Player1),
        (7, Owner::Player0),
        (8, Owner::Player0),
    ];
    for (cell, owner) in marks {
        board.action(Move::from_index(cell), owner);
    }

    let mut agent = RandomAgent::seeded(11);
    let mv = agent.play(
        &mut board,
        Owner::Player0,
        Move::new(2, 2, 0, 0), // forces sub-board 0
        Duration::from_millis(1),
    );
    assert_eq!(mv, Move::END);
}

#[test]
fn seeded_agents_are_reproducible() {
    let mut board = Board::new();
    let budget = Duration::from_millis(1);
    let a = RandomAgent::seeded(3).play(&mut board, Owner::Player0, Move::ANY, budget);
    let b = RandomAgent::seeded(3).play(&mut board, Owner::Player0, Move::ANY, budget);
    assert_eq!(a, b);
}
