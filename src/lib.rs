pub mod bitboard;
pub mod canon;
pub mod error;
pub mod host;
#[cfg(feature = "cli")]
pub mod logger;
pub mod position;
pub mod search;
