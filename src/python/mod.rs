//! Python bindings for the kifu recorder.
//!
//! Frame capture and rectification usually live in Python (OpenCV); these
//! bindings let that pipeline feed rectified frames to the classifier and
//! keep the game record in Rust.
//!
//! # Quick Start
//!
//! ```python
//! import kifu_recorder as kr
//!
//! game = kr.GameRecord(19, "Alice", "Bob", "6.5")
//! classifier = kr.StoneClassifier()
//!
//! # frame: 500x500x4 uint8 numpy array, already rectified
//! board = classifier.classify(game.last_board(), frame,
//!                             game.can_play("black"), game.can_play("white"))
//! if game.add_move_if_valid(board):
//!     print(game.to_sgf())
//! ```
//!
//! Boards cross the boundary as lists of diagram rows (`.`, `X`, `O`).

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::core::{BoardSize, BoardState, Color};
use crate::error::KifuError;

mod py_detect;
mod py_record;

pub use py_detect::*;
pub use py_record::*;

impl From<KifuError> for PyErr {
    fn from(err: KifuError) -> Self {
        PyErr::new::<PyValueError, _>(err.to_string())
    }
}

/// Parse a board given as diagram rows.
pub(crate) fn board_from_rows(size: BoardSize, rows: &[String]) -> PyResult<BoardState> {
    let rows: Vec<&str> = rows.iter().map(String::as_str).collect();
    Ok(BoardState::from_diagram(size, &rows)?)
}

/// Render a board as diagram rows.
pub(crate) fn board_to_rows(board: &BoardState) -> Vec<String> {
    board.to_string().lines().map(str::to_string).collect()
}

/// Parse `"black"`/`"white"` (or `"B"`/`"W"`).
pub(crate) fn parse_color(color: &str) -> PyResult<Color> {
    match color.to_ascii_lowercase().as_str() {
        "black" | "b" => Ok(Color::Black),
        "white" | "w" => Ok(Color::White),
        other => Err(PyErr::new::<PyValueError, _>(format!(
            "unknown colour {other:?} (expected \"black\" or \"white\")"
        ))),
    }
}

/// kifu_recorder: record Go games from rectified board images.
#[pymodule]
fn kifu_recorder(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyGameRecord>()?;
    m.add_class::<PyStoneClassifier>()?;
    m.add_class::<PyMoveHypothesis>()?;
    Ok(())
}
