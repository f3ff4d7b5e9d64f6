//! Error types shared across the workspace.
//!
//! The controller itself is total; errors only arise where settings are
//! validated or where an adapter fails to provide a port.

/// Top-level error for minihub-pwm.
#[derive(Debug, thiserror::Error)]
pub enum PwmError {
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// A scheduler adapter could not be set up.
    #[error("scheduler error")]
    Scheduler(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Rejected controller settings.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("period must be positive, got {0} ms")]
    NonPositivePeriod(i64),

    #[error("minimum duty cycle {0} is outside 0..=100")]
    MinOutOfRange(f64),

    #[error("maximum duty cycle {0} is outside 0..=100")]
    MaxOutOfRange(f64),

    #[error("minimum duty cycle {min} exceeds maximum {max}")]
    MinAboveMax { min: f64, max: f64 },

    #[error("dead-man switch timeout must be positive, got {0} ms")]
    NonPositiveDeadManTimeout(i64),
}
