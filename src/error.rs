//! Error types for transposition-table persistence. Programmer preconditions
//! elsewhere in the crate remain debug-assertion failures, not `Result`s.

use std::fmt;

/// Why a persisted table file failed to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TtLoadError {
    /// The file ended in the middle of a record.
    Truncated,
    /// A piece index byte was outside 0..16.
    PieceIndexOutOfRange(u8),
    /// A stored eval byte was zero, which the format never writes.
    ZeroEvalOnDisk,
}

impl fmt::Display for TtLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TtLoadError::Truncated => write!(f, "transposition table file truncated"),
            TtLoadError::PieceIndexOutOfRange(p) => {
                write!(f, "piece index {p} out of range in persisted table")
            }
            TtLoadError::ZeroEvalOnDisk => {
                write!(f, "persisted eval was zero, which is never written on disk")
            }
        }
    }
}

impl std::error::Error for TtLoadError {}
