//! Game record bindings.

use pyo3::prelude::*;
use pyo3::types::PyBytes;

use super::{board_from_rows, board_to_rows, parse_color};
use crate::core::{BoardSize, Rotation};
use crate::record::{snapshot, GameRecord};

/// Python wrapper for GameRecord.
#[pyclass(name = "GameRecord")]
#[derive(Clone, Debug)]
pub struct PyGameRecord(pub GameRecord);

#[pymethods]
impl PyGameRecord {
    /// Create a record for a new game.
    #[new]
    fn new(
        dimension: usize,
        black_player: String,
        white_player: String,
        komi: String,
    ) -> PyResult<Self> {
        let size = BoardSize::new(dimension)?;
        Ok(Self(GameRecord::new(size, black_player, white_player, komi)))
    }

    /// Append the board if it is a legal next position.
    fn add_move_if_valid(&mut self, board: Vec<String>) -> PyResult<bool> {
        let candidate = board_from_rows(self.0.size(), &board)?;
        Ok(self.0.add_move_if_valid(&candidate))
    }

    /// Append a hand-entered board and count it.
    fn add_move_manually(&mut self, board: Vec<String>) -> PyResult<bool> {
        let candidate = board_from_rows(self.0.size(), &board)?;
        Ok(self.0.add_move_manually(&candidate))
    }

    fn note_manual_addition(&mut self) {
        self.0.note_manual_addition();
    }

    /// Undo the last move; returns `(row, col, color)` or None.
    fn undo_last_move(&mut self) -> Option<(u8, u8, String)> {
        self.0
            .undo_last_move()
            .map(|mv| (mv.position.row, mv.position.col, mv.color.to_string()))
    }

    /// Rotate the history: 1 clockwise, -1 counter-clockwise. Other values
    /// are ignored.
    fn rotate(&mut self, direction: i32) {
        if let Some(rotation) = Rotation::from_direction(direction) {
            self.0.rotate(rotation);
        }
    }

    fn can_play(&self, color: &str) -> PyResult<bool> {
        Ok(self.0.can_play(parse_color(color)?))
    }

    fn last_board(&self) -> Vec<String> {
        board_to_rows(self.0.last_board())
    }

    /// Moves as `(row, col, color)` tuples in play order.
    fn moves(&self) -> Vec<(u8, u8, String)> {
        self.0
            .moves()
            .iter()
            .map(|mv| (mv.position.row, mv.position.col, mv.color.to_string()))
            .collect()
    }

    fn to_sgf(&self) -> String {
        self.0.to_sgf()
    }

    /// Binary snapshot of the record.
    fn to_bytes<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyBytes>> {
        let bytes = snapshot::encode(&self.0)?;
        Ok(PyBytes::new_bound(py, &bytes))
    }

    /// Restore a record from `to_bytes` output.
    #[staticmethod]
    fn from_bytes(data: &[u8]) -> PyResult<Self> {
        Ok(Self(snapshot::decode(data)?))
    }

    #[getter]
    fn dimension(&self) -> usize {
        self.0.dimension()
    }

    #[getter]
    fn black_player(&self) -> String {
        self.0.black_player().to_string()
    }

    #[getter]
    fn white_player(&self) -> String {
        self.0.white_player().to_string()
    }

    #[getter]
    fn komi(&self) -> String {
        self.0.komi().to_string()
    }

    #[getter]
    fn move_count(&self) -> usize {
        self.0.move_count()
    }

    #[getter]
    fn undo_count(&self) -> u32 {
        self.0.undo_count()
    }

    #[getter]
    fn manual_add_count(&self) -> u32 {
        self.0.manual_add_count()
    }

    fn __len__(&self) -> usize {
        self.0.move_count()
    }

    fn __repr__(&self) -> String {
        format!(
            "GameRecord({}, black={:?}, white={:?}, moves={})",
            self.0.size(),
            self.0.black_player(),
            self.0.white_player(),
            self.0.move_count()
        )
    }
}
