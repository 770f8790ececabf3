//! Error type shared by every crate in the workspace.
//!
//! Out-of-range physical inputs are clamped, not rejected. Only inputs that
//! cannot be clamped (NaN, infinities) and unusable solver settings surface
//! as errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BattedBallError {
    #[error("{field} must be a finite number, got {value}")]
    NonFinite { field: &'static str, value: f64 },

    #[error("integration time step must be positive and finite, got {0} s")]
    InvalidTimeStep(f64),

    #[error("maximum simulation time must be positive and finite, got {0} s")]
    InvalidMaxTime(f64),

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BattedBallError>;

/// Pass `value` through, or fail with [`BattedBallError::NonFinite`].
pub fn ensure_finite(field: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(BattedBallError::NonFinite { field, value })
    }
}
