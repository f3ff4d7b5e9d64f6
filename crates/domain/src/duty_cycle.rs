//! Duty-cycle arithmetic.
//!
//! A duty cycle is a percentage, nominally `0.0..=100.0`. Nothing in this
//! module clamps it: out-of-range values flow through the rounding and
//! threshold helpers as-is. Callers that need a bounded value
//! apply [`DutyCycleLimits`] first.

use serde::Deserialize;

use crate::error::ValidationError;

/// Length of the ON phase for `duty_cycle` within a period of `period_ms`.
///
/// The period is divided by 100 with integer division *before* the
/// multiplication, so the result moves in steps of `period_ms / 100`
/// milliseconds: a 999 ms period at 50 % yields 450 ms, not 499 ms.
/// The product is truncated toward zero.
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
pub fn on_time_ms(period_ms: i64, duty_cycle: f64) -> i64 {
    ((period_ms / 100) as f64 * duty_cycle) as i64
}

/// Round half-up to the nearest integer (`2.5 → 3`, `-0.5 → 0`).
///
/// NaN rounds to `0`, so an undefined duty cycle is classified as 0 %.
#[must_use]
pub fn round_half_up(duty_cycle: f64) -> f64 {
    if duty_cycle.is_nan() {
        return 0.0;
    }
    (duty_cycle + 0.5).floor()
}

/// Whether the duty cycle counts as 0 % (or below) once rounded.
#[must_use]
pub fn rounds_to_zero(duty_cycle: f64) -> bool {
    round_half_up(duty_cycle) <= 0.0
}

/// Whether the duty cycle counts as 100 % (or above) once rounded.
#[must_use]
pub fn rounds_to_hundred(duty_cycle: f64) -> bool {
    round_half_up(duty_cycle) >= 100.0
}

/// Bounds applied to incoming duty cycles by the owning rule.
///
/// A value below `min` becomes `0` when `equate_min_to_zero` is set and
/// `min` otherwise; a value above `max` becomes `100` when
/// `equate_max_to_hundred` is set and `max` otherwise. Unset bounds let
/// values through untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DutyCycleLimits {
    pub min: Option<f64>,
    pub equate_min_to_zero: bool,
    pub max: Option<f64>,
    pub equate_max_to_hundred: bool,
}

impl DutyCycleLimits {
    /// Map a raw duty cycle onto the configured bounds.
    #[must_use]
    pub fn apply(&self, value: f64) -> f64 {
        let mut result = value;
        if let Some(min) = self.min
            && result < min
        {
            result = if self.equate_min_to_zero { 0.0 } else { min };
        }
        if let Some(max) = self.max
            && result > max
        {
            result = if self.equate_max_to_hundred { 100.0 } else { max };
        }
        result
    }

    /// Check that both bounds lie in `0..=100` and are ordered.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(min) = self.min
            && !(0.0..=100.0).contains(&min)
        {
            return Err(ValidationError::MinOutOfRange(min));
        }
        if let Some(max) = self.max
            && !(0.0..=100.0).contains(&max)
        {
            return Err(ValidationError::MaxOutOfRange(max));
        }
        if let (Some(min), Some(max)) = (self.min, self.max)
            && min > max
        {
            return Err(ValidationError::MinAboveMax { min, max });
        }
        Ok(())
    }
}
