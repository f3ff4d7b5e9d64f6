//! Records of what a controller did.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::ControllerId;
use crate::state::PwmState;

/// UTC wall-clock time attached to events.
pub type Timestamp = DateTime<Utc>;

/// Published whenever a controller replaces its active state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub controller_id: ControllerId,
    pub from: PwmState,
    pub to: PwmState,
    /// Generation of the newly installed state.
    pub generation: u64,
    /// Duty cycle at the moment of the transition.
    pub duty_cycle: f64,
    pub at: Timestamp,
}

impl Transition {
    /// Build a transition stamped with the current time.
    #[must_use]
    pub fn now(
        controller_id: ControllerId,
        from: PwmState,
        to: PwmState,
        generation: u64,
        duty_cycle: f64,
    ) -> Self {
        Self {
            controller_id,
            from,
            to,
            generation,
            duty_cycle,
            at: Utc::now(),
        }
    }
}

/// A level change observed on an output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputChange {
    pub on: bool,
    pub at: Timestamp,
}
