//! Deterministic test doubles for the ports.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::time::Instant;

use crate::ports::{OutputSink, Scheduler, Task, TimerHandle};

/// Scheduler driven by [`ManualScheduler::advance`] instead of a real clock.
#[derive(Clone)]
pub struct ManualScheduler {
    inner: Arc<Mutex<Queue>>,
}

struct Queue {
    origin: Instant,
    elapsed: Duration,
    next_seq: u64,
    pending: Vec<Pending>,
    ignore_cancellation: bool,
}

struct Pending {
    due: Duration,
    seq: u64,
    task: Task,
    cancelled: Arc<AtomicBool>,
}

pub struct ManualTimer {
    cancelled: Arc<AtomicBool>,
}

impl TimerHandle for ManualTimer {
    fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }
}

impl Default for ManualScheduler {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Queue {
                origin: Instant::from_std(std::time::Instant::now()),
                elapsed: Duration::ZERO,
                next_seq: 0,
                pending: Vec::new(),
                ignore_cancellation: false,
            })),
        }
    }
}

impl ManualScheduler {
    fn lock(&self) -> std::sync::MutexGuard<'_, Queue> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Move the clock forward by `ms`, running every task that falls due
    /// on the way, in due order.
    pub fn advance(&self, ms: u64) {
        let target = self.lock().elapsed + Duration::from_millis(ms);
        loop {
            let next = {
                let mut queue = self.lock();
                if !queue.ignore_cancellation {
                    queue.pending.retain(|p| !p.cancelled.load(Ordering::SeqCst));
                }
                let idx = queue
                    .pending
                    .iter()
                    .enumerate()
                    .filter(|(_, p)| p.due <= target)
                    .min_by_key(|(_, p)| (p.due, p.seq))
                    .map(|(idx, _)| idx);
                idx.map(|idx| {
                    let pending = queue.pending.swap_remove(idx);
                    queue.elapsed = pending.due;
                    pending.task
                })
            };
            match next {
                Some(task) => task(),
                None => break,
            }
        }
        self.lock().elapsed = target;
    }

    /// Remaining delays of the timers that were not cancelled, shortest first.
    pub fn pending(&self) -> Vec<Duration> {
        let queue = self.lock();
        let mut delays: Vec<_> = queue
            .pending
            .iter()
            .filter(|p| !p.cancelled.load(Ordering::SeqCst))
            .map(|p| p.due - queue.elapsed)
            .collect();
        delays.sort();
        delays
    }

    /// A scheduler whose `cancel` has no effect, as if every timer had
    /// already started running when its owner was disposed.
    pub fn ignoring_cancellation() -> Self {
        let scheduler = Self::default();
        scheduler.lock().ignore_cancellation = true;
        scheduler
    }
}

impl Scheduler for ManualScheduler {
    type Handle = ManualTimer;

    fn now(&self) -> Instant {
        let queue = self.lock();
        queue.origin + queue.elapsed
    }

    fn schedule_once(&self, delay: Duration, task: Task) -> ManualTimer {
        let cancelled = Arc::new(AtomicBool::new(false));
        let mut queue = self.lock();
        let due = queue.elapsed + delay;
        let seq = queue.next_seq;
        queue.next_seq += 1;
        queue.pending.push(Pending {
            due,
            seq,
            task,
            cancelled: Arc::clone(&cancelled),
        });
        ManualTimer { cancelled }
    }
}

/// Output sink remembering every level it was asked to drive.
#[derive(Clone, Default)]
pub struct RecordingOutput {
    levels: Arc<Mutex<Vec<bool>>>,
}

impl RecordingOutput {
    pub fn levels(&self) -> Vec<bool> {
        self.levels
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn last(&self) -> Option<bool> {
        self.levels().last().copied()
    }
}

impl OutputSink for RecordingOutput {
    fn set_output(&self, on: bool) {
        self.levels
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(on);
    }
}
