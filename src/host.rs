//! The external host-call boundary: thin marshalling only, no search logic.

use crate::position::Position;
use crate::search::dispatcher;

/// Safe entry point matching the host-call signature: a position plus a
/// wall-clock budget in, one move code out. `boards` is `[B0, B1, B2, B3,
/// B4]`. Never returns "no move"; calling this on a terminal position is
/// undefined behavior, per the engine's precondition contract.
pub fn compute_move(
    boards: [u16; 5],
    selection_state: u16,
    selected_piece: u32,
    time_remaining_ms: u32,
) -> u16 {
    let pos = Position::construct(boards, selection_state, selected_piece as u8);
    dispatcher::compute_move(&pos, time_remaining_ms)
}

/// C-callable mirror of [`compute_move`] for linking this engine into a
/// non-Rust host, with integer widths matching a plain C ABI.
///
/// # Safety
/// `boards` must point to at least 5 readable `u16`s.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn quarto_compute_move(
    boards: *const u16,
    selection_state: u16,
    selected_piece: u32,
    time_remaining_ms: u32,
) -> u16 {
    let boards: [u16; 5] = unsafe { std::slice::from_raw_parts(boards, 5) }
        .try_into()
        .expect("caller guarantees a 5-element board array");
    compute_move(boards, selection_state, selected_piece, time_remaining_ms)
}
