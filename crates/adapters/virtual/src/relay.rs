//! Virtual relay — an [`OutputSink`] remembering what it was told.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use tracing::{info, trace};

use minihub_pwm_app::ports::OutputSink;
use minihub_pwm_domain::event::OutputChange;

const DEFAULT_HISTORY: usize = 256;

/// A simulated relay.
///
/// Repeated writes of the current level are accepted but are not edges:
/// they neither bump [`switch_count`](Self::switch_count) nor enter the
/// history.
pub struct VirtualRelay {
    name: String,
    history_limit: usize,
    inner: Mutex<RelayState>,
}

#[derive(Default)]
struct RelayState {
    on: bool,
    writes: u64,
    switches: u64,
    history: VecDeque<OutputChange>,
}

impl VirtualRelay {
    /// Create an OFF relay keeping the last 256 edges.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_history_limit(name, DEFAULT_HISTORY)
    }

    #[must_use]
    pub fn with_history_limit(name: impl Into<String>, history_limit: usize) -> Self {
        Self {
            name: name.into(),
            history_limit,
            inner: Mutex::new(RelayState::default()),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn is_on(&self) -> bool {
        self.lock().on
    }

    /// Number of level changes since creation.
    #[must_use]
    pub fn switch_count(&self) -> u64 {
        self.lock().switches
    }

    /// Number of `set_output` calls, edges or not.
    #[must_use]
    pub fn write_count(&self) -> u64 {
        self.lock().writes
    }

    /// Most recent edges, oldest first.
    #[must_use]
    pub fn history(&self) -> Vec<OutputChange> {
        self.lock().history.iter().copied().collect()
    }

    fn lock(&self) -> MutexGuard<'_, RelayState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl OutputSink for VirtualRelay {
    fn set_output(&self, on: bool) {
        let mut state = self.lock();
        state.writes += 1;
        if state.on == on {
            trace!(relay = %self.name, on, "relay level unchanged");
            return;
        }
        state.on = on;
        state.switches += 1;
        if self.history_limit > 0 {
            if state.history.len() == self.history_limit {
                state.history.pop_front();
            }
            state.history.push_back(OutputChange { on, at: Utc::now() });
        }
        info!(relay = %self.name, on, "relay switched");
    }
}
