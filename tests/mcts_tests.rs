//! MCTS liveness: for any non-terminal position and any positive budget, the
//! search must return a legal `(placement, selection)` pair.

use quarto::position::Position;
use quarto::search::mcts::search;
use std::time::Duration;

fn decode(code: u16) -> (u8, u8) {
    ((code >> 4) as u8, (code & 0xF) as u8)
}

#[test]
fn liveness_on_empty_board() {
    let mut pos = Position::new();
    let _ = pos.do_select(0);
    let (square, piece) = decode(search(&pos, Duration::from_millis(50)));
    assert!(square < 16);
    assert!(piece < 16);
    assert!(pos.boards[4] & (0x8000u16 >> square) == 0, "square must be empty");
    assert!(
        pos.selection_state & (0x8000u16 >> piece) != 0,
        "piece must still be available"
    );
}

#[test]
fn liveness_on_a_partially_filled_board() {
    let mut pos = Position::new();
    let _ = pos.do_select(0);
    let _ = pos.do_move(0);
    let _ = pos.do_select(5);
    let _ = pos.do_move(7);
    let _ = pos.do_select(9);

    let (square, piece) = decode(search(&pos, Duration::from_millis(50)));
    assert!(pos.boards[4] & (0x8000u16 >> square) == 0);
    assert!(pos.selection_state & (0x8000u16 >> piece) != 0);
}

#[test]
fn liveness_holds_with_a_very_small_budget() {
    let mut pos = Position::new();
    let _ = pos.do_select(3);
    let code = search(&pos, Duration::from_millis(1));
    let (square, piece) = decode(code);
    assert!(square < 16);
    assert!(piece < 16);
}
