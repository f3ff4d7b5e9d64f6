//! Settings for one PWM rule instance.

use serde::Deserialize;

use crate::duty_cycle::DutyCycleLimits;
use crate::error::ValidationError;

/// How a PWM rule drives its controller.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct PwmSettings {
    /// Fixed cycle length in milliseconds.
    pub period_ms: i64,
    /// Bounds applied to every incoming duty cycle.
    pub limits: DutyCycleLimits,
    /// Stop the controller when no duty cycle arrives for this long.
    /// `None` disables the watchdog.
    pub dead_man_switch_ms: Option<i64>,
}

impl Default for PwmSettings {
    fn default() -> Self {
        Self {
            period_ms: 60_000,
            limits: DutyCycleLimits::default(),
            dead_man_switch_ms: None,
        }
    }
}

impl PwmSettings {
    /// Create settings for `period_ms` with no limits and no watchdog.
    #[must_use]
    pub fn with_period(period_ms: i64) -> Self {
        Self {
            period_ms,
            ..Self::default()
        }
    }

    /// Validate the period, the limits and the watchdog timeout.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.period_ms <= 0 {
            return Err(ValidationError::NonPositivePeriod(self.period_ms));
        }
        self.limits.validate()?;
        if let Some(timeout) = self.dead_man_switch_ms
            && timeout <= 0
        {
            return Err(ValidationError::NonPositiveDeadManTimeout(timeout));
        }
        Ok(())
    }
}
