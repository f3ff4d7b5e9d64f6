//! Scheduler port — one-shot timers and the clock they run on.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

/// Work run once a scheduled delay has elapsed.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Handle to a pending [`Task`].
pub trait TimerHandle: Send {
    /// Prevent the task from running if it has not started yet.
    ///
    /// A task that is already running is left to complete.
    fn cancel(&self);
}

/// Shared timer queue for every state of a controller.
pub trait Scheduler: Send + Sync {
    type Handle: TimerHandle;

    /// Current instant on the clock the timers run against.
    fn now(&self) -> Instant;

    /// Run `task` once after `delay`.
    ///
    /// Implementations must never run `task` before returning: controllers
    /// schedule while holding their lock, and the task acquires it again.
    fn schedule_once(&self, delay: Duration, task: Task) -> Self::Handle;
}

impl<T: Scheduler> Scheduler for Arc<T> {
    type Handle = T::Handle;

    fn now(&self) -> Instant {
        (**self).now()
    }

    fn schedule_once(&self, delay: Duration, task: Task) -> Self::Handle {
        (**self).schedule_once(delay, task)
    }
}
