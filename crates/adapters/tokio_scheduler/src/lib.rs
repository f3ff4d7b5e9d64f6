//! # minihub-pwm-adapter-tokio
//!
//! [`Scheduler`] implementation on top of the tokio runtime.
//!
//! Each scheduled task becomes a spawned tokio task that sleeps for the
//! requested delay and then runs the callback synchronously. Cancelling
//! aborts the task: a task still sleeping never runs, a task already
//! running its callback has no await point left and completes normally.
//!
//! The clock is [`tokio::time::Instant`], so tests using a paused runtime
//! (`#[tokio::test(start_paused = true)]`) drive PWM timing without real
//! waiting.
//!
//! ## Dependency rule
//!
//! Same as other adapters: depends on `minihub-pwm-app` and `minihub-pwm-domain`.

mod error;

pub use error::SchedulerError;

use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::AbortHandle;
use tokio::time::Instant;

use minihub_pwm_app::ports::{Scheduler, Task, TimerHandle};

/// Scheduler spawning one tokio task per timer on a captured runtime.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    handle: Handle,
}

impl TokioScheduler {
    /// Bind to the runtime the caller is running in.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::NoRuntime`] when called outside a tokio runtime.
    pub fn try_current() -> Result<Self, SchedulerError> {
        Ok(Self::from_handle(Handle::try_current()?))
    }

    /// Bind to an explicit runtime, e.g. one owned by a host application.
    #[must_use]
    pub fn from_handle(handle: Handle) -> Self {
        Self { handle }
    }
}

/// Pending task spawned by [`TokioScheduler`].
#[derive(Debug)]
pub struct TokioTimer {
    abort: AbortHandle,
}

impl TimerHandle for TokioTimer {
    fn cancel(&self) {
        self.abort.abort();
    }
}

impl Scheduler for TokioScheduler {
    type Handle = TokioTimer;

    fn now(&self) -> Instant {
        Instant::now()
    }

    fn schedule_once(&self, delay: Duration, task: Task) -> TokioTimer {
        let join = self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            task();
        });
        tracing::trace!(delay_ms = delay.as_millis(), "timer task spawned");
        TokioTimer {
            abort: join.abort_handle(),
        }
    }
}
