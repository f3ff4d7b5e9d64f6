//! Port definitions — traits that adapters implement.
//!
//! The controller never sleeps, spawns or touches hardware itself: time and
//! output both come through these traits so that tests can drive a virtual
//! clock and record every output edge.

pub mod output;
pub mod scheduler;

pub use output::OutputSink;
pub use scheduler::{Scheduler, Task, TimerHandle};
