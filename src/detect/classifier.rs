//! Stone classifier.
//!
//! ## State-free detection
//!
//! `classify_fresh` reads a board with no history: every intersection is
//! compared against pure black and against the mean colour of the image.
//! It is only meant for the first frame of a session.
//!
//! ## Differential detection
//!
//! `detect` looks for the one stone added since the last known board:
//!
//! 1. Sample every intersection once.
//! 2. Build class references (empty, black, white) from the last board.
//! 3. Run the decision cascade on every point that was empty.
//! 4. Keep the hypothesis with the highest confidence (first in row-major
//!    order on ties).
//! 5. Drop it if its colour may not play now.
//!
//! The classifier never resolves captures; the candidate board contains the
//! new stone only and `GameRecord` validation takes it from there.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, trace};

use super::color::{ColorSample, FrameStatistics};
use super::image::{window_radius, BoardImage, REFERENCE_IMAGE_SIZE};
use super::report::{CellReport, DetectionReport};
use super::rules::{decide, fresh_verdict, luminance_delta, CellFeatures, Phase};
use crate::core::{BoardSize, BoardState, Color, Diagnostics, Move, Position, Stone};
use crate::error::Result;

/// Classifier settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Diagnostics produced per frame.
    pub diagnostics: Diagnostics,

    /// Image side the sampling windows are tuned for. Windows scale with
    /// the actual image side relative to this.
    pub reference_image_size: u32,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            diagnostics: Diagnostics::default(),
            reference_image_size: REFERENCE_IMAGE_SIZE,
        }
    }
}

impl ClassifierConfig {
    /// Create a new config with custom diagnostics.
    #[must_use]
    pub fn with_diagnostics(mut self, diagnostics: Diagnostics) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Create a new config with a custom reference image size.
    #[must_use]
    pub fn with_reference_image_size(mut self, side: u32) -> Self {
        self.reference_image_size = side.max(1);
        self
    }
}

/// A stone the classifier believes was just placed.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MoveHypothesis {
    pub position: Position,
    pub color: Color,
    pub confidence: f64,
}

impl MoveHypothesis {
    #[must_use]
    pub fn to_move(&self) -> Move {
        Move::new(self.position, self.color)
    }
}

impl std::fmt::Display for MoveHypothesis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} ({:.2})", self.color, self.position, self.confidence)
    }
}

/// Result of a differential classification.
#[derive(Clone, Debug)]
pub struct Detection {
    /// The last board plus the chosen stone, or the last board unchanged.
    pub board: BoardState,

    /// The accepted hypothesis, if any.
    pub chosen: Option<MoveHypothesis>,

    /// Present when stone-detection diagnostics are on.
    pub report: Option<DetectionReport>,
}

/// Per-frame working data.
struct Analysis {
    phase: Phase,
    statistics: FrameStatistics,
    hypotheses: Vec<MoveHypothesis>,
    cells: Vec<CellReport>,
}

/// Turns rectified board images into boards.
#[derive(Clone, Debug, Default)]
pub struct StoneClassifier {
    config: ClassifierConfig,
}

impl StoneClassifier {
    #[must_use]
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Sampling window radius for this image and board size.
    #[must_use]
    pub fn window_radius(&self, image: &BoardImage, size: BoardSize) -> u32 {
        let reference = self.config.reference_image_size.max(1);
        let scaled = (window_radius(size) * image.side() + reference / 2) / reference;
        scaled.max(1)
    }

    /// Read a board without any history.
    pub fn classify_fresh(&self, image: &BoardImage, size: BoardSize) -> Result<BoardState> {
        let mean = image.mean_color();
        let cells: Vec<Stone> = image
            .sample_all(size, self.window_radius(image, size))
            .iter()
            .map(|sample| fresh_verdict(sample, &mean))
            .collect();

        let board = BoardState::from_cells(size, cells)?;
        debug!(
            size = %size,
            black = board.count(Stone::Black),
            white = board.count(Stone::White),
            "state-free detection"
        );
        Ok(board)
    }

    /// Every stone hypothesis for the points that were empty on `last`,
    /// in row-major order.
    #[must_use]
    pub fn hypotheses(&self, last: &BoardState, image: &BoardImage) -> Vec<MoveHypothesis> {
        self.analyse(last, image, false).hypotheses
    }

    /// The single most likely new stone whose colour may play now.
    #[must_use]
    pub fn best_move(
        &self,
        last: &BoardState,
        image: &BoardImage,
        can_be_black: bool,
        can_be_white: bool,
    ) -> Option<MoveHypothesis> {
        let hypotheses = self.hypotheses(last, image);
        select_best(&hypotheses).filter(|h| is_permitted(h.color, can_be_black, can_be_white))
    }

    /// Differential detection with the full result.
    pub fn detect(
        &self,
        last: &BoardState,
        image: &BoardImage,
        can_be_black: bool,
        can_be_white: bool,
    ) -> Result<Detection> {
        let diagnostics = self.config.diagnostics.stone_detection;
        let analysis = self.analyse(last, image, diagnostics);

        let best = select_best(&analysis.hypotheses);
        let chosen = best.filter(|h| is_permitted(h.color, can_be_black, can_be_white));

        let board = match chosen {
            Some(h) => last.with_stone(h.position, h.color)?,
            None => last.clone(),
        };

        match (best, chosen) {
            (_, Some(h)) => debug!(hypothesis = %h, "detected move"),
            (Some(h), None) => debug!(hypothesis = %h, "best hypothesis cannot play now"),
            (None, None) => trace!("no move detected"),
        }

        let report = diagnostics.then(|| DetectionReport {
            phase: analysis.phase,
            statistics: analysis.statistics,
            cells: analysis.cells,
            best,
            chosen,
        });

        Ok(Detection {
            board,
            chosen,
            report,
        })
    }

    /// Differential detection: the last board plus the detected stone, or
    /// the last board unchanged when nothing allowed was found.
    pub fn classify(
        &self,
        last: &BoardState,
        image: &BoardImage,
        can_be_black: bool,
        can_be_white: bool,
    ) -> Result<BoardState> {
        Ok(self.detect(last, image, can_be_black, can_be_white)?.board)
    }

    fn analyse(&self, last: &BoardState, image: &BoardImage, keep_cells: bool) -> Analysis {
        let size = last.size();
        let samples = image.sample_all(size, self.window_radius(image, size));
        let statistics = FrameStatistics::collect(last, &samples);
        let phase = Phase::from_counts(
            statistics.count(Stone::Black),
            statistics.count(Stone::White),
        );

        trace!(
            ?phase,
            empty = statistics.count(Stone::Empty),
            black = statistics.count(Stone::Black),
            white = statistics.count(Stone::White),
            "class statistics"
        );

        let mut hypotheses = Vec::new();
        let mut cells = Vec::new();

        for (position, stone) in last.iter() {
            if !stone.is_empty() {
                continue;
            }

            let sample = samples[size.index(position)];
            let neighbors: SmallVec<[ColorSample; 4]> = size
                .neighbors(position)
                .into_iter()
                .filter(|&n| last.stone_at(n).is_empty())
                .map(|n| samples[size.index(n)])
                .collect();

            let features = CellFeatures {
                black_reference_distance: sample.distance(&ColorSample::STONE_BLACK),
                neighbor_luminance_delta: luminance_delta(&sample, &neighbors),
                empty: statistics.distances(Stone::Empty, &sample),
                black: statistics.distances(Stone::Black, &sample),
                white: statistics.distances(Stone::White, &sample),
            };
            let verdict = decide(phase, &features);

            if let Some(color) = verdict.stone.color() {
                hypotheses.push(MoveHypothesis {
                    position,
                    color,
                    confidence: verdict.confidence,
                });
            }
            if keep_cells {
                cells.push(CellReport {
                    position,
                    sample,
                    features,
                    verdict,
                });
            }
        }

        Analysis {
            phase,
            statistics,
            hypotheses,
            cells,
        }
    }
}

/// Highest positive confidence; the earliest wins ties.
fn select_best(hypotheses: &[MoveHypothesis]) -> Option<MoveHypothesis> {
    let mut best: Option<MoveHypothesis> = None;
    let mut highest = 0.0;
    for hypothesis in hypotheses {
        if hypothesis.confidence > highest {
            highest = hypothesis.confidence;
            best = Some(*hypothesis);
        }
    }
    best
}

fn is_permitted(color: Color, can_be_black: bool, can_be_white: bool) -> bool {
    match color {
        Color::Black => can_be_black,
        Color::White => can_be_white,
    }
}
