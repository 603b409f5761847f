//! Colour features of sampled windows.
//!
//! ## Samples
//!
//! A `ColorSample` is the mean RGBA value of a window of the rectified
//! image, kept in `f64` so the window means are not rounded.
//!
//! ## Class statistics
//!
//! Before classifying a frame, every intersection is sampled and grouped by
//! its stone on the last known board. Each group's mean colour becomes a
//! reference for "looks like an empty point", "looks like a black stone"
//! and "looks like a white stone". A class with no cells on the board has
//! no reference; distances to it are reported as a large sentinel so the
//! class never wins a comparison it has no evidence for.

use serde::{Deserialize, Serialize};

use super::rules::Thresholds;
use crate::core::{BoardState, Stone};

/// Mean RGBA colour of an image window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ColorSample(pub [f64; 4]);

impl ColorSample {
    /// Reference for pure black, used by state-free detection.
    pub const PURE_BLACK: Self = Self([0.0, 0.0, 0.0, 255.0]);

    /// Reference for a black stone under typical lighting, used by
    /// differential detection.
    pub const STONE_BLACK: Self = Self([10.0, 10.0, 10.0, 255.0]);

    #[must_use]
    pub const fn new(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self([red, green, blue, alpha])
    }

    #[must_use]
    pub const fn red(&self) -> f64 {
        self.0[0]
    }

    #[must_use]
    pub const fn green(&self) -> f64 {
        self.0[1]
    }

    #[must_use]
    pub const fn blue(&self) -> f64 {
        self.0[2]
    }

    #[must_use]
    pub const fn alpha(&self) -> f64 {
        self.0[3]
    }

    /// Perceived brightness (ITU-R BT.601 weights).
    #[must_use]
    pub fn luminance(&self) -> f64 {
        0.299 * self.red() + 0.587 * self.green() + 0.114 * self.blue()
    }

    /// Mean squared deviation of R, G and B from their average.
    ///
    /// Close to zero for greys (black and white stones), large for the
    /// saturated wood of the board.
    #[must_use]
    pub fn variance(&self) -> f64 {
        let mean = (self.red() + self.green() + self.blue()) / 3.0;
        let dr = self.red() - mean;
        let dg = self.green() - mean;
        let db = self.blue() - mean;
        (dr * dr + dg * dg + db * db) / 3.0
    }

    /// Sum of absolute per-channel differences over all four channels.
    #[must_use]
    pub fn distance(&self, other: &ColorSample) -> f64 {
        self.0
            .iter()
            .zip(other.0.iter())
            .map(|(a, b)| (a - b).abs())
            .sum()
    }
}

/// Distances from one sample to a class reference.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClassDistances {
    pub color: f64,
    pub luminance: f64,
    pub variance: f64,
}

impl ClassDistances {
    /// Distances to a class that has no cells on the board.
    pub const MISSING: Self = Self {
        color: Thresholds::MISSING_CLASS_DISTANCE,
        luminance: Thresholds::MISSING_CLASS_DISTANCE,
        variance: Thresholds::MISSING_CLASS_DISTANCE,
    };

    /// Aggregate distance with equal weights.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.color + self.luminance + self.variance
    }
}

/// Reference values of one class (empty, black or white) in a frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClassStats {
    pub count: usize,
    pub mean: ColorSample,
    pub luminance: f64,
    pub variance: f64,
}

impl ClassStats {
    fn from_sum(count: usize, sum: [f64; 4]) -> Option<Self> {
        if count == 0 {
            return None;
        }
        let n = count as f64;
        let mean = ColorSample([sum[0] / n, sum[1] / n, sum[2] / n, sum[3] / n]);
        Some(Self {
            count,
            mean,
            luminance: mean.luminance(),
            variance: mean.variance(),
        })
    }

    /// Distances from `sample` to this class.
    #[must_use]
    pub fn distances(&self, sample: &ColorSample) -> ClassDistances {
        ClassDistances {
            color: sample.distance(&self.mean),
            luminance: (sample.luminance() - self.luminance).abs(),
            variance: (sample.variance() - self.variance).abs(),
        }
    }
}

/// Class references for one frame, built from the last known board.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameStatistics {
    pub empty: Option<ClassStats>,
    pub black: Option<ClassStats>,
    pub white: Option<ClassStats>,
}

impl FrameStatistics {
    /// Group `samples` (row-major, one per cell) by the stones of `board`.
    #[must_use]
    pub fn collect(board: &BoardState, samples: &[ColorSample]) -> Self {
        let mut counts = [0usize; 3];
        let mut sums = [[0.0f64; 4]; 3];

        for ((_, stone), sample) in board.iter().zip(samples) {
            let class = class_index(stone);
            counts[class] += 1;
            for (acc, value) in sums[class].iter_mut().zip(sample.0) {
                *acc += value;
            }
        }

        Self {
            empty: ClassStats::from_sum(counts[0], sums[0]),
            black: ClassStats::from_sum(counts[1], sums[1]),
            white: ClassStats::from_sum(counts[2], sums[2]),
        }
    }

    /// Statistics for one class, if it has cells.
    #[must_use]
    pub fn class(&self, stone: Stone) -> Option<&ClassStats> {
        match stone {
            Stone::Empty => self.empty.as_ref(),
            Stone::Black => self.black.as_ref(),
            Stone::White => self.white.as_ref(),
        }
    }

    /// Number of cells in a class.
    #[must_use]
    pub fn count(&self, stone: Stone) -> usize {
        self.class(stone).map_or(0, |stats| stats.count)
    }

    /// Distances from `sample` to a class, or the sentinel if it is absent.
    #[must_use]
    pub fn distances(&self, stone: Stone, sample: &ColorSample) -> ClassDistances {
        self.class(stone)
            .map_or(ClassDistances::MISSING, |stats| stats.distances(sample))
    }
}

fn class_index(stone: Stone) -> usize {
    match stone {
        Stone::Empty => 0,
        Stone::Black => 1,
        Stone::White => 2,
    }
}
