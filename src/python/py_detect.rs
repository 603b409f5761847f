//! Classifier bindings.

use numpy::{PyReadonlyArray3, PyUntypedArrayMethods};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use super::{board_from_rows, board_to_rows};
use crate::core::{BoardSize, Diagnostics};
use crate::detect::{BoardImage, ClassifierConfig, MoveHypothesis, StoneClassifier};

/// Convert an `H×W×4` uint8 array into a board image.
fn image_from_array(frame: &PyReadonlyArray3<'_, u8>) -> PyResult<BoardImage> {
    let shape = frame.shape();
    if shape[2] != 4 {
        return Err(PyErr::new::<PyValueError, _>(format!(
            "expected an HxWx4 RGBA array, got {shape:?}"
        )));
    }
    let data: Vec<u8> = frame.as_array().iter().copied().collect();
    Ok(BoardImage::from_raw(shape[1] as u32, shape[0] as u32, data)?)
}

/// Python wrapper for MoveHypothesis.
#[pyclass(name = "MoveHypothesis")]
#[derive(Clone, Debug)]
pub struct PyMoveHypothesis(pub MoveHypothesis);

#[pymethods]
impl PyMoveHypothesis {
    #[getter]
    fn row(&self) -> u8 {
        self.0.position.row
    }

    #[getter]
    fn col(&self) -> u8 {
        self.0.position.col
    }

    #[getter]
    fn color(&self) -> String {
        self.0.color.to_string()
    }

    #[getter]
    fn confidence(&self) -> f64 {
        self.0.confidence
    }

    fn __repr__(&self) -> String {
        format!("MoveHypothesis({})", self.0)
    }
}

/// Python wrapper for StoneClassifier.
#[pyclass(name = "StoneClassifier")]
#[derive(Clone, Debug)]
pub struct PyStoneClassifier(pub StoneClassifier);

#[pymethods]
impl PyStoneClassifier {
    /// Create a classifier. `diagnostics=True` logs a full report per frame.
    #[new]
    #[pyo3(signature = (diagnostics = false))]
    fn new(diagnostics: bool) -> Self {
        let config = ClassifierConfig::default()
            .with_diagnostics(Diagnostics::none().with_stone_detection(diagnostics));
        Self(StoneClassifier::new(config))
    }

    /// Read a board without history.
    fn classify_fresh(
        &self,
        frame: PyReadonlyArray3<'_, u8>,
        dimension: usize,
    ) -> PyResult<Vec<String>> {
        let image = image_from_array(&frame)?;
        let board = self.0.classify_fresh(&image, BoardSize::new(dimension)?)?;
        Ok(board_to_rows(&board))
    }

    /// Last board plus the detected stone, or the last board unchanged.
    fn classify(
        &self,
        last_board: Vec<String>,
        frame: PyReadonlyArray3<'_, u8>,
        can_be_black: bool,
        can_be_white: bool,
    ) -> PyResult<Vec<String>> {
        let size = BoardSize::new(last_board.len())?;
        let last = board_from_rows(size, &last_board)?;
        let image = image_from_array(&frame)?;

        let detection = self.0.detect(&last, &image, can_be_black, can_be_white)?;
        if let Some(report) = &detection.report {
            tracing::debug!(report = %report, "detection report");
        }
        Ok(board_to_rows(&detection.board))
    }

    /// The detected stone only, or None.
    fn best_move(
        &self,
        last_board: Vec<String>,
        frame: PyReadonlyArray3<'_, u8>,
        can_be_black: bool,
        can_be_white: bool,
    ) -> PyResult<Option<PyMoveHypothesis>> {
        let size = BoardSize::new(last_board.len())?;
        let last = board_from_rows(size, &last_board)?;
        let image = image_from_array(&frame)?;
        Ok(self
            .0
            .best_move(&last, &image, can_be_black, can_be_white)
            .map(PyMoveHypothesis))
    }

    fn __repr__(&self) -> String {
        format!(
            "StoneClassifier(diagnostics={})",
            self.0.config().diagnostics.stone_detection
        )
    }
}
