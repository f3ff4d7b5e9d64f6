//! # minihub-pwm-adapter-virtual
//!
//! Virtual output for demonstration and testing: a [`VirtualRelay`] stands
//! in for the physical actuator a PWM controller would switch.
//!
//! | Observation | Accessor |
//! |-------------|----------|
//! | Current level | [`VirtualRelay::is_on`] |
//! | Number of OFF→ON / ON→OFF edges | [`VirtualRelay::switch_count`] |
//! | Recent edges with timestamps | [`VirtualRelay::history`] |
//!
//! ## Dependency rule
//!
//! Depends on `minihub-pwm-app` (port traits) and `minihub-pwm-domain` only.

mod relay;

pub use relay::VirtualRelay;
