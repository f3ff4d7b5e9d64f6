//! Controller states.
//!
//! ```text
//!  AlwaysOff ──changed──► On ◄──────────► Off ──period, 0 %──► DutycycleZero
//!                          │                                        │
//!                          └─on phase, 100 %──► DutycycleHundred    │
//!                                                    │              │
//!                     AlwaysOn ◄──period, still 100 %┘  AlwaysOff ◄─┘
//! ```
//!
//! `On` / `Off` alternate for duty cycles strictly between the extremes.
//! `DutycycleZero` / `DutycycleHundred` hold an extreme for one full
//! period before the controller settles into `AlwaysOff` / `AlwaysOn`.

use serde::{Deserialize, Serialize};

/// The phase a controller is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PwmState {
    AlwaysOff,
    AlwaysOn,
    DutycycleZero,
    DutycycleHundred,
    Off,
    On,
}

impl PwmState {
    /// Output level driven on entry to this state.
    #[must_use]
    pub fn output_on_entry(self) -> bool {
        matches!(self, Self::AlwaysOn | Self::DutycycleHundred | Self::On)
    }
}

impl std::fmt::Display for PwmState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::AlwaysOff => "always_off",
            Self::AlwaysOn => "always_on",
            Self::DutycycleZero => "dutycycle_zero",
            Self::DutycycleHundred => "dutycycle_hundred",
            Self::Off => "off",
            Self::On => "on",
        })
    }
}
