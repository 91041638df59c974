//! Contest setup errors
//!
//! The tick path itself never fails; only starting a contest and loading
//! configuration can be rejected.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContestError {
    /// Fewer than two entrants: there is nobody to fight
    #[error("a contest needs at least 2 entrants, got {got}")]
    TooFewEntrants { got: usize },

    /// Viewport cannot hold an arena larger than one combatant
    #[error("viewport {width}x{height} is too small for an arena")]
    ViewportTooSmall { width: f32, height: f32 },

    /// Tuning value outside its usable range
    #[error("invalid tuning `{field}`: {reason}")]
    InvalidTuning {
        field: &'static str,
        reason: &'static str,
    },

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}
