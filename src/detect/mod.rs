//! Stone detection from rectified board images.
//!
//! - `image`: square RGBA frames and per-intersection window sampling
//! - `color`: luminance, variance, colour distances, class references
//! - `rules`: threshold table and the per-point decision cascade
//! - `classifier`: state-free and differential detection
//! - `report`: per-frame diagnostics
//! - `synthetic`: deterministic rendered frames for tests and benchmarks
//!
//! Capturing frames and warping them to a top-down square happens outside
//! this crate.

pub mod image;
pub mod color;
pub mod rules;
pub mod classifier;
pub mod report;
pub mod synthetic;

pub use self::image::{window_radius, BoardImage, REFERENCE_IMAGE_SIZE};
pub use color::{ClassDistances, ClassStats, ColorSample, FrameStatistics};
pub use rules::{decide, fresh_verdict, CellFeatures, Phase, Thresholds, Verdict};
pub use classifier::{ClassifierConfig, Detection, MoveHypothesis, StoneClassifier};
pub use report::{CellReport, DetectionReport};
pub use synthetic::BoardRenderer;
