//! # minihub-pwm-app
//!
//! Application layer — the PWM controller and its **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `Scheduler` — one-shot delayed callbacks plus a monotonic clock
//!   - `OutputSink` — the binary actuator being time-proportioned
//! - Provide the **controller**: a timer-driven state machine that turns a
//!   duty cycle into ON/OFF phases within a fixed period
//! - Provide the **duty-cycle service** used by the owning rule: limits and
//!   the dead-man watchdog
//! - Provide **in-process infrastructure** (transition bus) that doesn't need IO
//!
//! ## Dependency rule
//! Depends on `minihub-pwm-domain` only (plus `tokio::sync` / `tokio::time`).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod controller;
pub mod event_bus;
pub mod ports;
pub mod services;

#[cfg(test)]
pub(crate) mod testing;
