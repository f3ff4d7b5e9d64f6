//! # minihub-pwm-domain
//!
//! Pure domain model for the software PWM controller.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions
//! - Duty-cycle arithmetic: on-time computation and half-up rounding
//!   against the 0 % / 100 % extremes
//! - Duty-cycle **limits** applied by the owning rule before a value
//!   reaches the controller
//! - The set of controller **states** and the **transition events**
//!   published when one replaces another
//! - Controller **settings** and their validation
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or runtime crates.
//! Scheduling and output are expressed as traits in the `app` crate (ports).

pub mod duty_cycle;
pub mod error;
pub mod event;
pub mod id;
pub mod settings;
pub mod state;
