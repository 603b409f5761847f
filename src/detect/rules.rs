//! Decision rules for a single intersection.
//!
//! ## Phases
//!
//! The rules depend on which stone colours are already on the last known
//! board, because class references only exist for colours that were seen:
//!
//! - `Opening`: no stones at all. Only black can be recognised, from
//!   absolute darkness and contrast with the neighbouring points.
//! - `BlackOnly`: handicap stones or the first black move are down.
//!   White is recognised from contrast alone.
//! - `Mixed`: white stones are on the board, so all three class references
//!   are available.
//!
//! ## Cascade
//!
//! Each phase is an ordered list of rules; the first rule that matches
//! decides the verdict. All limits are the constants in [`Thresholds`].

use serde::{Deserialize, Serialize};

use super::color::{ClassDistances, ColorSample};
use crate::core::Stone;

/// Fixed limits of the decision cascade.
pub struct Thresholds;

impl Thresholds {
    /// Mean luminance drop against the empty neighbours that marks a black
    /// stone on its own.
    pub const STRONG_LUMINANCE_DROP: f64 = -30.0;

    /// Distance to the black reference under which a point is black
    /// (boards without white stones).
    pub const BLACK_DISTANCE: f64 = 50.0;

    /// Luminance rise that marks a white stone with full confidence.
    pub const STRONG_LUMINANCE_RISE: f64 = 30.0;

    /// Luminance rise that suggests a white stone.
    pub const LUMINANCE_RISE: f64 = 15.0;

    /// Colour distance to the mean empty point under which a point is empty,
    /// checked before any stone rule once white stones exist.
    pub const EMPTY_MEAN_DISTANCE: f64 = 20.0;

    /// Distance to the black reference under which a point may be black
    /// (boards with white stones).
    pub const MIXED_BLACK_DISTANCE: f64 = 30.0;

    /// How much closer a stone class must be than the empty class.
    pub const CLASS_MARGIN: f64 = 100.0;

    /// Minimum score gap between the winning stone class and the empty
    /// class in the fallback scoring.
    pub const AMBIGUITY_MARGIN: f64 = 100.0;

    /// Distance reported for a class that has no cells on the board.
    pub const MISSING_CLASS_DISTANCE: f64 = 999.0;

    /// Distance to pure black under which state-free detection says black.
    pub const FRESH_BLACK_DISTANCE: f64 = 80.0;

    /// Blue channel ratio to the image mean at which state-free detection
    /// says white.
    pub const FRESH_WHITE_BLUE_RATIO: f64 = 1.35;
}

/// Which stone colours the last known board contains.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Opening,
    BlackOnly,
    Mixed,
}

impl Phase {
    /// Phase for a board with the given stone counts.
    #[must_use]
    pub const fn from_counts(black: usize, white: usize) -> Self {
        if white > 0 {
            Self::Mixed
        } else if black > 0 {
            Self::BlackOnly
        } else {
            Self::Opening
        }
    }
}

/// Everything the cascade looks at for one empty intersection.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CellFeatures {
    /// Colour distance to [`ColorSample::STONE_BLACK`].
    pub black_reference_distance: f64,

    /// Mean of (this luminance − neighbour luminance) over the empty
    /// orthogonal neighbours; 0 without any.
    pub neighbor_luminance_delta: f64,

    pub empty: ClassDistances,
    pub black: ClassDistances,
    pub white: ClassDistances,
}

/// Outcome for one intersection.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub stone: Stone,
    pub confidence: f64,
}

impl Verdict {
    #[must_use]
    pub const fn new(stone: Stone, confidence: f64) -> Self {
        Self { stone, confidence }
    }

    #[must_use]
    pub const fn empty() -> Self {
        Self::new(Stone::Empty, 1.0)
    }
}

/// Mean luminance difference between a point and its empty neighbours.
#[must_use]
pub fn luminance_delta(center: &ColorSample, neighbors: &[ColorSample]) -> f64 {
    if neighbors.is_empty() {
        return 0.0;
    }
    let own = center.luminance();
    let total: f64 = neighbors.iter().map(|n| own - n.luminance()).sum();
    total / neighbors.len() as f64
}

/// Run the cascade for one empty intersection.
#[must_use]
pub fn decide(phase: Phase, features: &CellFeatures) -> Verdict {
    match phase {
        Phase::Opening => black_rules(features).unwrap_or_else(Verdict::empty),
        Phase::BlackOnly => black_rules(features)
            .or_else(|| white_contrast_rules(features))
            .unwrap_or_else(Verdict::empty),
        Phase::Mixed => mixed_rules(features),
    }
}

fn black_rules(f: &CellFeatures) -> Option<Verdict> {
    if f.neighbor_luminance_delta < Thresholds::STRONG_LUMINANCE_DROP {
        return Some(Verdict::new(Stone::Black, 1.0));
    }
    if f.black_reference_distance < Thresholds::BLACK_DISTANCE {
        return Some(Verdict::new(Stone::Black, 0.9));
    }
    if f.black_reference_distance < f.empty.color {
        return Some(Verdict::new(Stone::Black, 0.7));
    }
    None
}

fn white_contrast_rules(f: &CellFeatures) -> Option<Verdict> {
    if f.neighbor_luminance_delta > Thresholds::STRONG_LUMINANCE_RISE {
        return Some(Verdict::new(Stone::White, 1.0));
    }
    if f.neighbor_luminance_delta > Thresholds::LUMINANCE_RISE {
        return Some(Verdict::new(Stone::White, 0.9));
    }
    None
}

fn mixed_rules(f: &CellFeatures) -> Verdict {
    // Points next to a misplaced black stone gain contrast and would
    // otherwise read as white.
    if f.empty.color < Thresholds::EMPTY_MEAN_DISTANCE {
        return Verdict::empty();
    }

    let empty_total = f.empty.total();
    let black_total = f.black.total();
    let white_total = f.white.total();

    let looks_black = f.black_reference_distance < Thresholds::MIXED_BLACK_DISTANCE
        || f.neighbor_luminance_delta < Thresholds::STRONG_LUMINANCE_DROP;
    if looks_black && empty_total - black_total > Thresholds::CLASS_MARGIN {
        return Verdict::new(Stone::Black, 1.0);
    }

    if f.neighbor_luminance_delta > Thresholds::LUMINANCE_RISE
        && empty_total - white_total > Thresholds::CLASS_MARGIN
    {
        return Verdict::new(Stone::White, 0.99);
    }

    score_classes(black_total, white_total, empty_total)
}

/// Fallback scoring: each class scores `1 − distance`.
///
/// A stone class only wins if it beats both other classes and clears the
/// empty class by [`Thresholds::AMBIGUITY_MARGIN`]; its confidence is the
/// average of its two margins.
fn score_classes(black_total: f64, white_total: f64, empty_total: f64) -> Verdict {
    let black = 1.0 - black_total;
    let white = 1.0 - white_total;
    let empty = 1.0 - empty_total;

    let (stone, winner, runner_up) = if black > white && black > empty {
        (Stone::Black, black, white)
    } else if white > black && white > empty {
        (Stone::White, white, black)
    } else {
        return Verdict::empty();
    };

    if (winner - empty).abs() < Thresholds::AMBIGUITY_MARGIN {
        return Verdict::new(Stone::Empty, 0.5);
    }

    let margins = (winner - runner_up) + (winner - empty);
    Verdict::new(stone, margins / 2.0)
}

/// State-free classification of one intersection against the image mean.
#[must_use]
pub fn fresh_verdict(sample: &ColorSample, image_mean: &ColorSample) -> Stone {
    let to_black = sample.distance(&ColorSample::PURE_BLACK);
    if to_black < Thresholds::FRESH_BLACK_DISTANCE || to_black < sample.distance(image_mean) {
        Stone::Black
    } else if sample.blue() >= image_mean.blue() * Thresholds::FRESH_WHITE_BLUE_RATIO {
        Stone::White
    } else {
        Stone::Empty
    }
}
