//! Crate error type.
//!
//! Only contract violations and malformed inputs are errors. Expected
//! outcomes of continuous frame sampling (no move this frame, a rejected
//! candidate board) are reported as `Option`/`bool` by the APIs that
//! produce them.

use crate::core::{Color, Position};

/// Errors raised by the rule engine, classifier and snapshot codec.
#[derive(Debug, thiserror::Error)]
pub enum KifuError {
    #[error("no stone at {0}: groups are only defined for occupied points")]
    EmptyPosition(Position),

    #[error("point {0} is already occupied")]
    OccupiedPosition(Position),

    #[error("{color} at {position} would have no liberties")]
    SuicideMove { position: Position, color: Color },

    #[error("point {position} is outside a {dimension}x{dimension} board")]
    OutOfBounds { position: Position, dimension: usize },

    #[error("unsupported board dimension {0} (expected 9, 13 or 19)")]
    UnsupportedBoardSize(usize),

    #[error("invalid board diagram: {0}")]
    InvalidDiagram(String),

    #[error("invalid board image: {0}")]
    InvalidImage(String),

    #[error("invalid snapshot: {0}")]
    Snapshot(String),

    #[error("snapshot codec error: {0}")]
    Codec(#[from] bincode::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, KifuError>;
