//! End-to-end alpha-beta scenarios: the two forced-win-in-one fixtures from
//! the testable-properties list, and a determinism check against a shared
//! transposition table.

use quarto::position::Position;
use quarto::search::dispatcher::search_dfs;
use quarto::search::tt::table;

/// Pieces, in order, placed onto squares 0..14 (14 placements, leaving
/// squares 13 and 15 empty before the final selection).
const FIXTURE_PIECES: [u8; 14] = [0, 1, 14, 10, 15, 4, 12, 9, 5, 11, 2, 6, 8, 3];

fn play_fixture_then_select(selected: u8) -> Position {
    let mut pos = Position::new();
    for (square, &piece) in FIXTURE_PIECES.iter().enumerate() {
        let _ = pos.do_select(piece);
        let _ = pos.do_move(square as u8);
    }
    let _ = pos.do_select(selected);
    pos
}

#[test]
fn forced_win_in_one_lands_on_square_13_or_15() {
    table().clear();
    let pos = play_fixture_then_select(7);
    assert!(!pos.is_quarto());

    let code = search_dfs(&pos);
    let placement = code >> 4;
    assert!(
        placement == 15 || placement == 13,
        "expected winning placement 13 or 15, got {placement}"
    );
}

#[test]
fn longer_setup_forced_win_lands_on_square_15() {
    table().clear();
    let mut pos = Position::new();

    // (piece, square) pairs replaying the fourteen-move setup, then select
    // piece 7 for the opponent.
    let moves: [(u8, u8); 14] = [
        (0b0000, 0),
        (0b0001, 1),
        (0b1110, 2),
        (0b1010, 3),
        (0b1111, 4),
        (0b0100, 5),
        (0b1100, 6),
        (0b1001, 7),
        (0b0101, 12),
        (0b1011, 9),
        (0b0010, 10),
        (0b0110, 11),
        (0b1000, 8),
        (0b0011, 14),
    ];

    for (piece, square) in moves {
        let _ = pos.do_select(piece);
        let _ = pos.do_move(square);
    }
    let _ = pos.do_select(0b0111);

    assert!(!pos.is_quarto());
    let code = search_dfs(&pos);
    assert_eq!(code >> 4, 15, "winning placement must be square 15");
}

#[test]
fn alpha_beta_is_deterministic_from_an_empty_table() {
    table().clear();
    let pos = play_fixture_then_select(7);

    let first = search_dfs(&pos);
    table().clear();
    let second = search_dfs(&pos);
    assert_eq!(first, second);
}
