//! Game record: move validation, history, SGF export and snapshots.
//!
//! `GameRecord` is the only stateful type in the crate. Mutations (add,
//! undo, rotate) assume a single writer; callers that classify frames on
//! one thread and edit the record from another must serialise access.

pub mod game;
pub mod sgf;
pub mod snapshot;

pub use game::{Application, GameRecord, Rejection};
pub use snapshot::{decode, encode, read_snapshot, write_snapshot};
