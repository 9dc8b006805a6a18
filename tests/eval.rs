use ninebot::board::subboard::{ttt_from_str, win, Owner, Ttt, DRAWN_TTT, EMPTY_TTT, NUM_TTT};
use ninebot::board::Board;
use ninebot::search::eval::{Scoring, VICTORY_POINTS};
use ninebot::search::{DRAW_SCORE, WIN_SCORE};

fn field(rows: [&str; 9]) -> String {
    let cells: Vec<String> = rows.concat().chars().map(|c| c.to_string()).collect();
    assert_eq!(cells.len(), 81);
    cells.join(",")
}

const EMPTY_ROW: &str = ".........";

#[test]
fn won_subboards_score_victory_points() {
    let scoring = Scoring::new();
    let won = ttt_from_str("000......").unwrap();
    assert_eq!(scoring.score(won, Owner::Player0), VICTORY_POINTS);
    assert_eq!(scoring.score(won, Owner::Player1), 0);
}

#[test]
fn losing_subboards_never_score() {
    // the evaluator never scores a lost sub-board positively, for any content
    let scoring = Scoring::new();
    for ttt in 0..NUM_TTT as Ttt {
        if win(ttt, Owner::Player1) {
            assert_eq!(scoring.score(ttt, Owner::Player0), 0, "content {ttt:#b}");
        }
        if win(ttt, Owner::Player0) {
            assert_eq!(scoring.score(ttt, Owner::Player1), 0, "content {ttt:#b}");
        }
    }
}

#[test]
fn unwinnable_draw_scores_zero() {
    let scoring = Scoring::new();
    assert_eq!(scoring.score(DRAWN_TTT, Owner::Player0), 0);
    assert_eq!(scoring.score(DRAWN_TTT, Owner::Player1), 0);
}

#[test]
fn ways_to_win_ladder() {
    let scoring = Scoring::new();
    // five completing cells
    assert_eq!(
        scoring.score(ttt_from_str("00.00....").unwrap(), Owner::Player0),
        VICTORY_POINTS - 1
    );
    // one completing cell
    assert_eq!(
        scoring.score(ttt_from_str("00.......").unwrap(), Owner::Player0),
        35
    );
}

#[test]
fn threat_scores_below_the_ladder() {
    let scoring = Scoring::new();
    // no immediate completion: 5 * unique_threats + 1
    assert_eq!(scoring.score(EMPTY_TTT, Owner::Player0), 1);
    assert_eq!(scoring.score(ttt_from_str("....0....").unwrap(), Owner::Player0), 21);
    assert_eq!(scoring.score(ttt_from_str("0........").unwrap(), Owner::Player0), 16);
}

#[test]
fn empty_board_is_balanced() {
    let scoring = Scoring::new();
    assert_eq!(scoring.board_score(&Board::new()), 0);
}

#[test]
fn heuristic_favors_the_stronger_side() {
    let scoring = Scoring::new();
    // Player0 holds a sub-board center, the rest is empty
    let board = Board::parse(&field([
        EMPTY_ROW,
        ".0.......",
        EMPTY_ROW,
        EMPTY_ROW,
        EMPTY_ROW,
        EMPTY_ROW,
        EMPTY_ROW,
        EMPTY_ROW,
        EMPTY_ROW,
    ]))
    .unwrap();
    assert!(scoring.board_score(&board) > 0);
}

#[test]
fn decided_games_use_the_terminal_scores() {
    let scoring = Scoring::new();

    let won = Board::parse(&field([
        "000000000",
        EMPTY_ROW,
        EMPTY_ROW,
        EMPTY_ROW,
        EMPTY_ROW,
        EMPTY_ROW,
        EMPTY_ROW,
        EMPTY_ROW,
        EMPTY_ROW,
    ]))
    .unwrap();
    assert_eq!(scoring.board_score(&won), WIN_SCORE);

    let lost = Board::parse(&field([
        "111111111",
        EMPTY_ROW,
        EMPTY_ROW,
        EMPTY_ROW,
        EMPTY_ROW,
        EMPTY_ROW,
        EMPTY_ROW,
        EMPTY_ROW,
        EMPTY_ROW,
    ]))
    .unwrap();
    assert_eq!(scoring.board_score(&lost), -WIN_SCORE);

    // all nine sub-boards full without a macro winner
    let drawn = Board::parse(&field([
        "010010010",
        "011011011",
        "100100100",
        "010010010",
        "011011011",
        "100100100",
        "010010010",
        "011011011",
        "100100100",
    ]))
    .unwrap();
    assert_eq!(drawn.winner_or_draw(), Owner::Draw);
    assert_eq!(scoring.board_score(&drawn), DRAW_SCORE);
}
