//! Search and evaluation: alpha-beta for the endgame, MCTS for the midgame,
//! dispatched by board occupancy, sharing a process-wide transposition table.

pub mod alpha_beta;
pub mod dispatcher;
pub mod mcts;
pub mod tt;
