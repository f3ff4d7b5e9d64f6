//! PWM service — what an automation rule calls to drive one controller.
//!
//! Wraps a [`PwmController`] with the rule-side policies: incoming duty
//! cycles are mapped onto [`DutyCycleLimits`], and an optional dead-man
//! watchdog stops the controller when updates dry up.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tracing::{debug, warn};

use minihub_pwm_domain::duty_cycle::DutyCycleLimits;
use minihub_pwm_domain::error::ValidationError;
use minihub_pwm_domain::settings::PwmSettings;

use crate::controller::PwmController;
use crate::ports::{OutputSink, Scheduler, TimerHandle};

/// Application service owning one controller and its watchdog.
pub struct PwmService<S: Scheduler, O> {
    controller: PwmController<S, O>,
    limits: DutyCycleLimits,
    watchdog: Option<Watchdog<S>>,
}

/// Stops the controller when not re-armed within `timeout`.
///
/// Lock order is watchdog, then controller. Updates hold the watchdog lock
/// while they reach the controller, and a firing callback holds it across
/// its epoch check and the stop, so an update can never slip in between.
struct Watchdog<S: Scheduler> {
    scheduler: S,
    timeout: Duration,
    armed: Arc<Mutex<Armed<S::Handle>>>,
}

struct Armed<H> {
    /// Bumped on every arm/disarm; a firing callback compares it with the
    /// value it was armed with.
    epoch: u64,
    pending: Option<H>,
}

impl<S, O> PwmService<S, O>
where
    S: Scheduler + Clone + 'static,
    O: OutputSink + 'static,
{
    /// Validate `settings` and create a stopped controller.
    ///
    /// The watchdog, when configured, is armed by the first
    /// [`update`](Self::update).
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if the settings are invalid.
    pub fn new(scheduler: S, output: O, settings: PwmSettings) -> Result<Self, ValidationError> {
        settings.validate()?;
        let watchdog = settings
            .dead_man_switch_ms
            .and_then(|ms| u64::try_from(ms).ok())
            .map(|ms| Watchdog {
                scheduler: scheduler.clone(),
                timeout: Duration::from_millis(ms),
                armed: Arc::new(Mutex::new(Armed {
                    epoch: 0,
                    pending: None,
                })),
            });
        let controller = PwmController::new(scheduler, output, settings.period_ms);
        debug!(
            controller = %controller.id(),
            period_ms = settings.period_ms,
            dead_man_switch_ms = ?settings.dead_man_switch_ms,
            "pwm service created"
        );
        Ok(Self {
            controller,
            limits: settings.limits,
            watchdog,
        })
    }

    /// Apply the limits to `value`, forward it to the controller and re-arm
    /// the watchdog. Returns the duty cycle actually applied.
    pub fn update(&self, value: f64) -> f64 {
        let applied = self.limits.apply(value);
        #[allow(clippy::float_cmp)]
        let limited = applied != value;
        if limited {
            debug!(
                controller = %self.controller.id(),
                requested = value,
                applied,
                "duty cycle limited"
            );
        }
        match &self.watchdog {
            Some(watchdog) => {
                let mut armed = watchdog.lock();
                self.controller.set_duty_cycle(applied);
                watchdog.arm(&mut armed, &self.controller);
            }
            None => self.controller.set_duty_cycle(applied),
        }
        applied
    }

    /// Restart the cycle with a fresh ON phase.
    pub fn reset(&self) {
        self.controller.reset();
    }

    /// Disarm the watchdog and drive the output OFF.
    pub fn stop(&self) {
        match &self.watchdog {
            Some(watchdog) => {
                let mut armed = watchdog.lock();
                Watchdog::<S>::disarm(&mut armed);
                self.controller.stop();
            }
            None => self.controller.stop(),
        }
    }

    #[must_use]
    pub fn controller(&self) -> &PwmController<S, O> {
        &self.controller
    }

    #[must_use]
    pub fn limits(&self) -> &DutyCycleLimits {
        &self.limits
    }
}

impl<S: Scheduler, O> Drop for PwmService<S, O> {
    fn drop(&mut self) {
        if let Some(watchdog) = &self.watchdog {
            Watchdog::<S>::disarm(&mut watchdog.lock());
        }
    }
}

impl<S: Scheduler> Watchdog<S> {
    fn lock(&self) -> MutexGuard<'_, Armed<S::Handle>> {
        self.armed.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn arm<O>(&self, armed: &mut Armed<S::Handle>, controller: &PwmController<S, O>)
    where
        S: 'static,
        O: OutputSink + 'static,
    {
        if let Some(timer) = armed.pending.take() {
            timer.cancel();
        }
        armed.epoch = armed.epoch.wrapping_add(1);
        let epoch = armed.epoch;
        let shared = Arc::clone(&self.armed);
        let controller = controller.clone();
        let timeout = self.timeout;
        armed.pending = Some(self.scheduler.schedule_once(
            timeout,
            Box::new(move || {
                let mut armed = shared.lock().unwrap_or_else(PoisonError::into_inner);
                if armed.epoch != epoch {
                    return;
                }
                armed.pending = None;
                warn!(
                    controller = %controller.id(),
                    timeout_ms = timeout.as_millis(),
                    "no duty cycle received in time, dead-man switch stops output"
                );
                controller.stop();
            }),
        ));
    }

    fn disarm(armed: &mut Armed<S::Handle>) {
        armed.epoch = armed.epoch.wrapping_add(1);
        if let Some(timer) = armed.pending.take() {
            timer.cancel();
        }
    }
}
