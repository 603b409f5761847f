//! Core board types: positions, stones, moves, boards and groups.
//!
//! Everything here is an immutable value. Boards are compared cell by cell,
//! which is what the superko check in `record` relies on.

pub mod position;
pub mod stone;
pub mod group;
pub mod board;
pub mod diagnostics;

pub use position::{BoardSize, Position, Rotation};
pub use stone::{Color, Move, Stone};
pub use group::{captured_groups_after, group_at, Group};
pub use board::BoardState;
pub use diagnostics::Diagnostics;
