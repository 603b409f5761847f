//! # kifu-recorder
//!
//! Records Go games from a live, top-down view of the board.
//!
//! ## Pipeline
//!
//! 1. An external capture step rectifies each camera frame into a square
//!    board image.
//! 2. The [`StoneClassifier`] compares the image against the last known
//!    board and proposes at most one new stone.
//! 3. [`GameRecord`] validates the candidate board (alternation, suicide,
//!    captures, positional superko) and appends it to the history.
//! 4. The record is exported as SGF or parked as a binary snapshot.
//!
//! Rejected candidates are not errors: most frames show no new stable move.
//!
//! ## Design Principles
//!
//! 1. **Values, not objects**: boards, moves and groups are immutable and
//!    compared by content. The history uses `im` vectors so cloning a
//!    record is cheap.
//!
//! 2. **Deterministic detection**: the classifier is a pure function of the
//!    image and the last board. All thresholds are fixed constants.
//!
//! 3. **Explicit diagnostics**: logging goes through `tracing`; the extra
//!    work for detailed diagnostics is switched per instance with
//!    [`Diagnostics`], never through global flags.
//!
//! ## Modules
//!
//! - `core`: positions, stones, moves, boards, groups
//! - `record`: game record, SGF export, snapshots
//! - `detect`: image sampling and the stone classifier
//! - `error`: crate error type

pub mod core;
pub mod record;
pub mod detect;
pub mod error;

#[cfg(feature = "python")]
pub mod python;

// Re-export commonly used types
pub use crate::core::{
    BoardSize, BoardState, Color, Diagnostics, Group, Move, Position, Rotation, Stone,
};

pub use crate::record::{Application, GameRecord, Rejection};

pub use crate::detect::{
    BoardImage, ClassifierConfig, Detection, DetectionReport, MoveHypothesis, StoneClassifier,
};

pub use crate::error::{KifuError, Result};
