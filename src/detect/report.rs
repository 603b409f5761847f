//! Per-frame detection reports.
//!
//! Built only when `Diagnostics::stone_detection` is on. The report keeps
//! every number the cascade looked at so a misdetection can be replayed
//! from a single frame.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::classifier::MoveHypothesis;
use super::color::{ColorSample, FrameStatistics};
use super::rules::{CellFeatures, Phase, Verdict};
use crate::core::{Position, Stone};

/// What the classifier saw at one empty intersection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CellReport {
    pub position: Position,
    pub sample: ColorSample,
    pub features: CellFeatures,
    pub verdict: Verdict,
}

/// Everything computed for one differential classification.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetectionReport {
    pub phase: Phase,
    pub statistics: FrameStatistics,

    /// One entry per empty intersection of the last board, row-major.
    pub cells: Vec<CellReport>,

    /// Highest-confidence hypothesis before the colour filter.
    pub best: Option<MoveHypothesis>,

    /// The hypothesis that was returned, if it passed the colour filter.
    pub chosen: Option<MoveHypothesis>,
}

impl DetectionReport {
    /// The report for one intersection, if it was empty on the last board.
    #[must_use]
    pub fn cell(&self, position: Position) -> Option<&CellReport> {
        self.cells.iter().find(|cell| cell.position == position)
    }

    /// Cells that produced a stone hypothesis.
    pub fn stone_cells(&self) -> impl Iterator<Item = &CellReport> {
        self.cells
            .iter()
            .filter(|cell| cell.verdict.stone != Stone::Empty)
    }
}

impl fmt::Display for DetectionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "phase: {:?}", self.phase)?;
        for (name, stone) in [
            ("empty", Stone::Empty),
            ("black", Stone::Black),
            ("white", Stone::White),
        ] {
            if let Some(stats) = self.statistics.class(stone) {
                writeln!(
                    f,
                    "{name}: {} cells, mean {:.1?}, luminance {:.1}, variance {:.1}",
                    stats.count, stats.mean.0, stats.luminance, stats.variance
                )?;
            }
        }

        for cell in &self.cells {
            let features = &cell.features;
            writeln!(
                f,
                "{}: {:?} ({:.2}) mean {:.1?} lum {:.1} var {:.1} \
                 black-ref {:.1} delta {:.1} empty {:.1} black {:.1} white {:.1}",
                cell.position,
                cell.verdict.stone,
                cell.verdict.confidence,
                cell.sample.0,
                cell.sample.luminance(),
                cell.sample.variance(),
                features.black_reference_distance,
                features.neighbor_luminance_delta,
                features.empty.total(),
                features.black.total(),
                features.white.total(),
            )?;
        }

        match (&self.best, &self.chosen) {
            (_, Some(chosen)) => writeln!(f, "chosen: {chosen}"),
            (Some(best), None) => writeln!(f, "no move: {best} is not allowed now"),
            (None, None) => writeln!(f, "no move detected"),
        }
    }
}
