//! Per-instance diagnostics switches.
//!
//! Events always go through `tracing`; these flags only control the extra
//! work done to produce detailed diagnostics (per-cell detection reports,
//! per-candidate validation events). Each classifier and game record
//! carries its own `Diagnostics`, so two recorders in one process can be
//! traced independently.

use serde::{Deserialize, Serialize};

/// Which diagnostics a component should produce.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Diagnostics {
    /// Build a `DetectionReport` for every differential classification.
    pub stone_detection: bool,

    /// Emit a `debug` event for every candidate board, accepted or not.
    pub move_validation: bool,
}

impl Diagnostics {
    /// Everything off.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            stone_detection: false,
            move_validation: false,
        }
    }

    /// Everything on.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            stone_detection: true,
            move_validation: true,
        }
    }

    /// Enable or disable detection reports.
    #[must_use]
    pub const fn with_stone_detection(mut self, enabled: bool) -> Self {
        self.stone_detection = enabled;
        self
    }

    /// Enable or disable candidate validation events.
    #[must_use]
    pub const fn with_move_validation(mut self, enabled: bool) -> Self {
        self.move_validation = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_off() {
        assert_eq!(Diagnostics::default(), Diagnostics::none());
    }

    #[test]
    fn test_builder_pattern() {
        let diagnostics = Diagnostics::none().with_stone_detection(true);
        assert!(diagnostics.stone_detection);
        assert!(!diagnostics.move_validation);
        assert_eq!(
            diagnostics.with_move_validation(true),
            Diagnostics::all()
        );
    }
}
