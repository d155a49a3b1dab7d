//! Chooses which search algorithm runs, and drives the alpha-beta top level.

use crate::position::Position;
use crate::search::alpha_beta::{DEPTH_BOUND, max_search};
use crate::search::mcts;
use crate::search::tt::table;
use std::sync::Mutex;
use std::time::Duration;

/// Occupancy threshold at which alpha-beta replaces MCTS.
const ALPHA_BETA_OCCUPANCY_THRESHOLD: u32 = 7;

/// Chooses alpha-beta or MCTS by board occupancy and returns the move code
/// `(placement << 4) | selection`.
pub fn compute_move(pos: &Position, time_budget_ms: u32) -> u16 {
    let occupied = pos.boards[4].count_ones();
    if occupied >= ALPHA_BETA_OCCUPANCY_THRESHOLD {
        tracing::debug!(occupied, "dispatching to alpha-beta");
        search_dfs(pos)
    } else {
        tracing::debug!(occupied, time_budget_ms, "dispatching to mcts");
        mcts::search(pos, Duration::from_millis(time_budget_ms as u64))
    }
}

/// Alpha-beta top level: first a cheap pre-scan for an immediate winning
/// placement, then one worker thread per candidate placement, each scoring
/// every legal selection by calling into `max_search` and negating to
/// express the result from the placer's own perspective.
pub fn search_dfs(pos: &Position) -> u16 {
    for sq in pos.empty_squares() {
        if pos.would_quarto_at(sq) {
            return (sq as u16) << 4;
        }
    }

    let squares: Vec<u8> = pos.empty_squares().collect();
    let results: Mutex<Vec<(u16, i32)>> = Mutex::new(Vec::new());

    std::thread::scope(|scope| {
        for &sq in &squares {
            let mut clone = pos.clone();
            let results = &results;
            scope.spawn(move || {
                let move_undo = clone.do_move(sq);
                let pieces: Vec<u8> = clone.available_pieces().collect();
                let mut local = Vec::with_capacity(pieces.len());

                for p in pieces {
                    let sel_undo = clone.do_select(p);
                    let score = -max_search(&mut clone, DEPTH_BOUND, -2, 2);
                    clone.undo(sel_undo);
                    local.push((((sq as u16) << 4) | (p as u16), score));
                }

                clone.undo(move_undo);
                results.lock().unwrap().extend(local);
            });
        }
    });

    let results = results.into_inner().unwrap();
    let mut best: Option<(u16, i32)> = None;
    for (code, score) in results {
        best = match best {
            None => Some((code, score)),
            Some((best_code, best_score)) => {
                if score > best_score || (score == best_score && code < best_code) {
                    Some((code, score))
                } else {
                    Some((best_code, best_score))
                }
            }
        };
    }

    table().purge_zero();
    let code = best.expect("search_dfs requires at least one empty square").0;
    tracing::debug!(depth_bound = DEPTH_BOUND, code, "alpha-beta completed");
    code
}
