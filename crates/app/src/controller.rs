//! PWM controller — time-proportions a binary output within a fixed period.
//!
//! The controller owns exactly one active state. Duty-cycle updates and
//! timer callbacks both run under a single per-controller mutex, so state
//! replacement is serialised. Every installed state gets a fresh
//! *generation*; timer callbacks carry the generation of the state that
//! scheduled them and are ignored once that state has been replaced. Within
//! one state, each timer also carries a ticket, so an off timer that was
//! rescheduled cannot fire late.
//!
//! # Preconditions
//!
//! - `period_ms` must be positive.
//! - Duty cycles are not clamped: values outside `0..=100` go through the
//!   rounding and threshold logic unchanged. Apply
//!   [`DutyCycleLimits`](minihub_pwm_domain::duty_cycle::DutyCycleLimits)
//!   upstream when that matters. NaN rounds to 0 and counts as unchanged
//!   when repeated.

mod states;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::Instant;
use tracing::{debug, trace};

use minihub_pwm_domain::event::Transition;
use minihub_pwm_domain::id::ControllerId;
use minihub_pwm_domain::state::PwmState;

use crate::event_bus::TransitionBus;
use crate::ports::{OutputSink, Scheduler};

use states::{ActiveState, StateContext, Timer, TimerEvent};

/// Software PWM controller driving an [`OutputSink`] through a [`Scheduler`].
///
/// Cloning is cheap and yields another handle to the same controller.
pub struct PwmController<S: Scheduler, O> {
    shared: Arc<Shared<S, O>>,
}

impl<S: Scheduler, O> Clone for PwmController<S, O> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

struct Shared<S: Scheduler, O> {
    id: ControllerId,
    period_ms: i64,
    /// `f64` bit pattern; written under `machine`, readable without it.
    duty_cycle: AtomicU64,
    scheduler: S,
    output: O,
    bus: TransitionBus,
    next_ticket: AtomicU64,
    machine: Mutex<Machine<S::Handle>>,
    this: Weak<Self>,
}

struct Machine<H> {
    generation: u64,
    state: ActiveState<H>,
}

/// View handed to a state: the controller plus the generation the state
/// runs as.
struct Context<'a, S: Scheduler, O> {
    shared: &'a Shared<S, O>,
    generation: u64,
}

impl<S, O> PwmController<S, O>
where
    S: Scheduler + 'static,
    O: OutputSink + 'static,
{
    /// Create a controller in [`PwmState::AlwaysOff`], driving the output OFF.
    ///
    /// The stored duty cycle starts at `0`.
    #[must_use]
    pub fn new(scheduler: S, output: O, period_ms: i64) -> Self {
        Self::with_id(ControllerId::new(), scheduler, output, period_ms)
    }

    /// Same as [`new`](Self::new) with a caller-chosen identifier.
    #[must_use]
    pub fn with_id(id: ControllerId, scheduler: S, output: O, period_ms: i64) -> Self {
        let shared = Arc::new_cyclic(|this| Shared {
            id,
            period_ms,
            duty_cycle: AtomicU64::new(0f64.to_bits()),
            scheduler,
            output,
            bus: TransitionBus::default(),
            next_ticket: AtomicU64::new(0),
            machine: Mutex::new(Machine {
                generation: 0,
                state: ActiveState::AlwaysOff,
            }),
            this: this.clone(),
        });
        {
            let cx = shared.context(0);
            shared.lock().state = ActiveState::enter(PwmState::AlwaysOff, &cx);
        }
        debug!(controller = %id, period_ms, "controller created");
        Self { shared }
    }

    /// Feed a new target duty cycle, in percent.
    ///
    /// When the value differs from the stored one it is stored and the
    /// active state reacts to the change. In every case the (possibly new)
    /// active state then gets a chance to re-evaluate itself, so repeating
    /// an unchanged value can still move the controller.
    pub fn set_duty_cycle(&self, value: f64) {
        let shared = &*self.shared;
        let mut machine = shared.lock();

        let stored = shared.duty_cycle();
        // NaN never equals itself; a repeated NaN is still the same value.
        #[allow(clippy::float_cmp)]
        let changed = stored != value && !(stored.is_nan() && value.is_nan());
        if changed {
            shared.duty_cycle.store(value.to_bits(), Ordering::Release);
            trace!(controller = %shared.id, duty_cycle = value, "duty cycle changed");
            let cx = shared.context(machine.generation);
            if let Some(target) = machine.state.on_duty_cycle_changed(&cx) {
                shared.transition(&mut machine, target);
            }
        }

        let cx = shared.context(machine.generation);
        if let Some(target) = machine.state.on_duty_cycle_updated(&cx) {
            shared.transition(&mut machine, target);
        }
    }

    /// Restart the cycle with a fresh ON phase, whatever the current state.
    pub fn reset(&self) {
        let mut machine = self.shared.lock();
        self.shared.transition(&mut machine, PwmState::On);
    }

    /// Drive the output OFF and stay there until the next duty-cycle update.
    pub fn stop(&self) {
        let mut machine = self.shared.lock();
        self.shared.transition(&mut machine, PwmState::AlwaysOff);
    }

    /// Last stored duty cycle.
    #[must_use]
    pub fn duty_cycle(&self) -> f64 {
        self.shared.duty_cycle()
    }

    /// Fixed cycle length in milliseconds.
    #[must_use]
    pub fn period_ms(&self) -> i64 {
        self.shared.period_ms
    }

    /// The currently active state.
    #[must_use]
    pub fn state(&self) -> PwmState {
        self.shared.lock().state.kind()
    }

    /// Identifier carried in logs and transition events.
    #[must_use]
    pub fn id(&self) -> ControllerId {
        self.shared.id
    }

    /// Receive every [`Transition`] made after this call.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Transition> {
        self.shared.bus.subscribe()
    }
}

impl<S, O> Shared<S, O>
where
    S: Scheduler + 'static,
    O: OutputSink + 'static,
{
    fn lock(&self) -> MutexGuard<'_, Machine<S::Handle>> {
        self.machine.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn duty_cycle(&self) -> f64 {
        f64::from_bits(self.duty_cycle.load(Ordering::Acquire))
    }

    fn context(&self, generation: u64) -> Context<'_, S, O> {
        Context {
            shared: self,
            generation,
        }
    }

    /// Replace the active state: dispose it, then construct and install
    /// `target` under the next generation.
    fn transition(&self, machine: &mut Machine<S::Handle>, target: PwmState) {
        let from = machine.state.kind();
        machine.state.dispose();
        machine.generation = machine.generation.wrapping_add(1);
        let generation = machine.generation;
        machine.state = ActiveState::enter(target, &self.context(generation));

        let duty_cycle = self.duty_cycle();
        debug!(
            controller = %self.id,
            %from,
            to = %target,
            generation,
            duty_cycle,
            "state transition"
        );
        self.bus
            .publish(Transition::now(self.id, from, target, generation, duty_cycle));
    }

    fn timer_fired(&self, generation: u64, ticket: u64, event: TimerEvent) {
        let mut machine = self.lock();
        if machine.generation != generation {
            trace!(
                controller = %self.id,
                ?event,
                generation,
                current = machine.generation,
                "ignoring timer of superseded state"
            );
            return;
        }
        let cx = self.context(generation);
        if let Some(target) = machine.state.on_timer(event, ticket, &cx) {
            self.transition(&mut machine, target);
        }
    }
}

impl<S: Scheduler, O> Drop for Shared<S, O> {
    fn drop(&mut self) {
        self.machine
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .state
            .dispose();
    }
}

impl<S, O> StateContext for Context<'_, S, O>
where
    S: Scheduler + 'static,
    O: OutputSink + 'static,
{
    type Handle = S::Handle;

    fn duty_cycle(&self) -> f64 {
        self.shared.duty_cycle()
    }

    fn period_ms(&self) -> i64 {
        self.shared.period_ms
    }

    fn now(&self) -> Instant {
        self.shared.scheduler.now()
    }

    fn set_output(&self, on: bool) {
        self.shared.output.set_output(on);
    }

    fn schedule(&self, delay_ms: i64, event: TimerEvent) -> Timer<S::Handle> {
        let delay = Duration::from_millis(u64::try_from(delay_ms).unwrap_or(0));
        let generation = self.generation;
        let ticket = self.shared.next_ticket.fetch_add(1, Ordering::Relaxed);
        let this = self.shared.this.clone();
        trace!(
            controller = %self.shared.id,
            ?event,
            delay_ms,
            generation,
            ticket,
            "timer scheduled"
        );
        let handle = self.shared.scheduler.schedule_once(
            delay,
            Box::new(move || {
                if let Some(shared) = this.upgrade() {
                    shared.timer_fired(generation, ticket, event);
                }
            }),
        );
        Timer::new(handle, ticket)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::testing::{ManualScheduler, RecordingOutput};

    type TestController = PwmController<ManualScheduler, RecordingOutput>;

    fn controller(period_ms: i64) -> (TestController, ManualScheduler, RecordingOutput) {
        let scheduler = ManualScheduler::default();
        let output = RecordingOutput::default();
        let controller = PwmController::new(scheduler.clone(), output.clone(), period_ms);
        (controller, scheduler, output)
    }

    fn drain(rx: &mut broadcast::Receiver<Transition>) -> Vec<(PwmState, PwmState)> {
        let mut seen = Vec::new();
        while let Ok(t) = rx.try_recv() {
            seen.push((t.from, t.to));
        }
        seen
    }

    // ── Construction & accessors ───────────────────────────────────

    #[test]
    fn should_start_always_off_with_output_off() {
        let (controller, scheduler, output) = controller(1000);
        assert_eq!(controller.state(), PwmState::AlwaysOff);
        assert_eq!(output.levels(), vec![false]);
        assert!(scheduler.pending().is_empty());
    }

    #[test]
    fn should_expose_period_and_stored_duty_cycle() {
        let (controller, _, _) = controller(1000);
        assert_eq!(controller.period_ms(), 1000);
        assert!(controller.duty_cycle().abs() < f64::EPSILON);

        controller.set_duty_cycle(42.5);
        assert!((controller.duty_cycle() - 42.5).abs() < f64::EPSILON);
    }

    // ── Regular ON/OFF cycling ─────────────────────────────────────

    #[test]
    fn should_enter_on_with_on_time_timer_when_duty_cycle_set() {
        let (controller, scheduler, output) = controller(1000);
        controller.set_duty_cycle(50.0);

        assert_eq!(controller.state(), PwmState::On);
        assert_eq!(output.last(), Some(true));
        assert_eq!(scheduler.pending(), vec![Duration::from_millis(500)]);
    }

    #[test]
    fn should_alternate_on_and_off_phases_within_period() {
        let (controller, scheduler, output) = controller(1000);
        controller.set_duty_cycle(30.0);

        scheduler.advance(300);
        assert_eq!(controller.state(), PwmState::Off);
        assert_eq!(scheduler.pending(), vec![Duration::from_millis(700)]);

        scheduler.advance(700);
        assert_eq!(controller.state(), PwmState::On);
        assert_eq!(output.levels(), vec![false, true, false, true]);
    }

    #[test]
    fn should_keep_off_phase_length_when_duty_cycle_changes_while_off() {
        let (controller, scheduler, _) = controller(1000);
        controller.set_duty_cycle(30.0);
        scheduler.advance(400);
        assert_eq!(controller.state(), PwmState::Off);

        controller.set_duty_cycle(90.0);
        assert_eq!(controller.state(), PwmState::Off);

        scheduler.advance(599);
        assert_eq!(controller.state(), PwmState::Off);
        scheduler.advance(1);
        assert_eq!(controller.state(), PwmState::On);
        assert_eq!(scheduler.pending(), vec![Duration::from_millis(900)]);
    }

    #[test]
    fn should_switch_off_immediately_when_new_on_time_already_elapsed() {
        let (controller, scheduler, output) = controller(1000);
        controller.set_duty_cycle(80.0);
        scheduler.advance(600);

        controller.set_duty_cycle(50.0);

        assert_eq!(controller.state(), PwmState::Off);
        assert_eq!(output.last(), Some(false));
        assert_eq!(scheduler.pending(), vec![Duration::from_millis(500)]);
    }

    #[test]
    fn should_switch_off_immediately_when_duty_cycle_drops_to_zero_while_on() {
        let (controller, scheduler, _) = controller(1000);
        controller.set_duty_cycle(80.0);
        scheduler.advance(600);

        controller.set_duty_cycle(0.0);

        assert_eq!(controller.state(), PwmState::Off);
        assert_eq!(scheduler.pending(), vec![Duration::from_millis(1000)]);
    }

    #[test]
    fn should_reschedule_off_timer_for_remaining_on_time() {
        let (controller, scheduler, _) = controller(1000);
        controller.set_duty_cycle(50.0);
        scheduler.advance(200);

        controller.set_duty_cycle(80.0);

        assert_eq!(controller.state(), PwmState::On);
        assert_eq!(scheduler.pending(), vec![Duration::from_millis(600)]);

        scheduler.advance(599);
        assert_eq!(controller.state(), PwmState::On);
        scheduler.advance(1);
        assert_eq!(controller.state(), PwmState::Off);
    }

    // ── Extremes ───────────────────────────────────────────────────

    #[test]
    fn should_enter_dutycycle_hundred_directly_from_always_off() {
        let (controller, scheduler, output) = controller(1000);
        controller.set_duty_cycle(100.0);

        assert_eq!(controller.state(), PwmState::DutycycleHundred);
        assert_eq!(output.last(), Some(true));
        assert_eq!(scheduler.pending(), vec![Duration::from_millis(1000)]);
    }

    #[test]
    fn should_settle_always_on_after_sustained_hundred_percent() {
        let (controller, scheduler, output) = controller(1000);
        let mut rx = controller.subscribe();
        controller.set_duty_cycle(50.0);
        scheduler.advance(100);
        controller.set_duty_cycle(100.0);

        scheduler.advance(900);
        assert_eq!(controller.state(), PwmState::DutycycleHundred);
        scheduler.advance(1000);
        assert_eq!(controller.state(), PwmState::AlwaysOn);
        assert!(scheduler.pending().is_empty());

        assert_eq!(
            drain(&mut rx),
            vec![
                (PwmState::AlwaysOff, PwmState::On),
                (PwmState::On, PwmState::DutycycleHundred),
                (PwmState::DutycycleHundred, PwmState::AlwaysOn),
            ]
        );
        assert_eq!(output.last(), Some(true));
    }

    #[test]
    fn should_settle_always_off_after_sustained_zero_percent() {
        let (controller, scheduler, output) = controller(1000);
        let mut rx = controller.subscribe();
        controller.set_duty_cycle(50.0);
        scheduler.advance(500);
        controller.set_duty_cycle(0.0);

        scheduler.advance(500);
        assert_eq!(controller.state(), PwmState::DutycycleZero);
        scheduler.advance(1000);
        assert_eq!(controller.state(), PwmState::AlwaysOff);

        assert_eq!(
            drain(&mut rx),
            vec![
                (PwmState::AlwaysOff, PwmState::On),
                (PwmState::On, PwmState::Off),
                (PwmState::Off, PwmState::DutycycleZero),
                (PwmState::DutycycleZero, PwmState::AlwaysOff),
            ]
        );
        assert_eq!(output.last(), Some(false));
    }

    #[test]
    fn should_resume_cycling_when_zero_probation_ends_with_partial_duty_cycle() {
        let (controller, scheduler, _) = controller(1000);
        controller.set_duty_cycle(50.0);
        scheduler.advance(500);
        controller.set_duty_cycle(0.0);
        scheduler.advance(500);
        assert_eq!(controller.state(), PwmState::DutycycleZero);

        controller.set_duty_cycle(40.0);
        assert_eq!(controller.state(), PwmState::DutycycleZero);

        scheduler.advance(1000);
        assert_eq!(controller.state(), PwmState::On);
    }

    #[test]
    fn should_enter_hundred_probation_when_zero_probation_ends_at_full_duty_cycle() {
        let (controller, scheduler, output) = controller(1000);
        controller.set_duty_cycle(50.0);
        scheduler.advance(500);
        controller.set_duty_cycle(0.0);
        scheduler.advance(500);
        assert_eq!(controller.state(), PwmState::DutycycleZero);

        controller.set_duty_cycle(100.0);
        assert_eq!(controller.state(), PwmState::DutycycleZero);

        scheduler.advance(1000);
        assert_eq!(controller.state(), PwmState::DutycycleHundred);
        assert_eq!(output.levels(), vec![false, true, false, false, true]);
    }

    #[test]
    fn should_enter_hundred_probation_when_off_phase_ends_at_full_duty_cycle() {
        let (controller, scheduler, output) = controller(1000);
        controller.set_duty_cycle(30.0);
        scheduler.advance(400);
        assert_eq!(controller.state(), PwmState::Off);

        controller.set_duty_cycle(100.0);
        assert_eq!(controller.state(), PwmState::Off);

        scheduler.advance(600);
        assert_eq!(controller.state(), PwmState::DutycycleHundred);
        assert_eq!(output.levels(), vec![false, true, false, true]);
        assert_eq!(scheduler.pending(), vec![Duration::from_millis(1000)]);
    }

    #[test]
    fn should_treat_repeated_nan_as_unchanged() {
        let (controller, _, _) = controller(1000);
        controller.set_duty_cycle(f64::NAN);
        controller.stop();
        let mut rx = controller.subscribe();

        controller.set_duty_cycle(f64::NAN);

        assert_eq!(controller.state(), PwmState::AlwaysOff);
        assert!(controller.duty_cycle().is_nan());
        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn should_treat_values_rounding_to_hundred_as_full_on() {
        let (controller, _, _) = controller(1000);
        controller.set_duty_cycle(99.5);
        assert_eq!(controller.state(), PwmState::DutycycleHundred);
    }

    #[test]
    fn should_cut_on_phase_short_when_duty_cycle_drops_during_hundred_probation() {
        let (controller, scheduler, output) = controller(1000);
        controller.set_duty_cycle(100.0);
        scheduler.advance(200);

        controller.set_duty_cycle(30.0);
        assert_eq!(controller.state(), PwmState::DutycycleHundred);
        assert_eq!(output.last(), Some(true));
        assert_eq!(
            scheduler.pending(),
            vec![Duration::from_millis(100), Duration::from_millis(800)]
        );

        scheduler.advance(100);
        assert_eq!(controller.state(), PwmState::DutycycleHundred);
        assert_eq!(output.last(), Some(false));

        scheduler.advance(700);
        assert_eq!(controller.state(), PwmState::On);
    }

    #[test]
    fn should_switch_output_off_in_place_when_hundred_probation_on_time_elapsed() {
        let (controller, scheduler, output) = controller(1000);
        controller.set_duty_cycle(100.0);
        scheduler.advance(400);

        controller.set_duty_cycle(30.0);

        assert_eq!(controller.state(), PwmState::DutycycleHundred);
        assert_eq!(output.levels(), vec![false, true, false]);
        assert_eq!(scheduler.pending(), vec![Duration::from_millis(600)]);
    }

    #[test]
    fn should_not_settle_always_on_when_duty_cycle_changed_back_to_hundred() {
        let (controller, scheduler, _) = controller(1000);
        controller.set_duty_cycle(100.0);
        scheduler.advance(200);
        controller.set_duty_cycle(60.0);
        controller.set_duty_cycle(100.0);

        scheduler.advance(800);
        assert_eq!(controller.state(), PwmState::On);
    }

    #[test]
    fn should_leave_always_on_through_off_for_any_change() {
        let (controller, scheduler, output) = controller(1000);
        controller.set_duty_cycle(100.0);
        scheduler.advance(1000);
        assert_eq!(controller.state(), PwmState::AlwaysOn);

        controller.set_duty_cycle(120.0);

        assert_eq!(controller.state(), PwmState::Off);
        assert_eq!(output.last(), Some(false));
    }

    #[test]
    fn should_ignore_repeated_value_while_always_on() {
        let (controller, scheduler, _) = controller(1000);
        controller.set_duty_cycle(100.0);
        scheduler.advance(1000);

        controller.set_duty_cycle(100.0);
        assert_eq!(controller.state(), PwmState::AlwaysOn);
    }

    // ── Dead-man switch ────────────────────────────────────────────

    #[test]
    fn should_leave_always_off_when_unchanged_positive_value_repeats() {
        let (controller, _, output) = controller(1000);
        controller.set_duty_cycle(100.0);
        controller.stop();
        assert_eq!(controller.state(), PwmState::AlwaysOff);

        controller.set_duty_cycle(100.0);

        assert_eq!(controller.state(), PwmState::On);
        assert_eq!(output.last(), Some(true));
    }

    #[test]
    fn should_stay_always_off_when_zero_repeats() {
        let (controller, scheduler, output) = controller(1000);
        let mut rx = controller.subscribe();

        controller.set_duty_cycle(0.0);
        controller.set_duty_cycle(0.0);

        assert_eq!(controller.state(), PwmState::AlwaysOff);
        assert!(scheduler.pending().is_empty());
        assert_eq!(output.levels(), vec![false]);
        assert!(drain(&mut rx).is_empty());
    }

    // ── Reset & stop ───────────────────────────────────────────────

    #[test]
    fn should_restart_with_full_on_phase_on_reset() {
        let (controller, scheduler, _) = controller(1000);
        let mut rx = controller.subscribe();
        controller.set_duty_cycle(50.0);
        scheduler.advance(300);

        controller.reset();

        assert_eq!(controller.state(), PwmState::On);
        assert_eq!(scheduler.pending(), vec![Duration::from_millis(500)]);
        assert_eq!(
            drain(&mut rx),
            vec![
                (PwmState::AlwaysOff, PwmState::On),
                (PwmState::On, PwmState::On),
            ]
        );
    }

    #[test]
    fn should_enter_on_on_reset_from_always_off() {
        let (controller, _, output) = controller(1000);
        controller.reset();
        assert_eq!(controller.state(), PwmState::On);
        assert_eq!(output.levels(), vec![false, true]);
    }

    #[test]
    fn should_cancel_timers_and_switch_off_on_stop() {
        let (controller, scheduler, output) = controller(1000);
        controller.set_duty_cycle(100.0);
        scheduler.advance(200);
        controller.set_duty_cycle(30.0);
        assert_eq!(scheduler.pending().len(), 2);

        controller.stop();

        assert_eq!(controller.state(), PwmState::AlwaysOff);
        assert_eq!(output.last(), Some(false));
        assert!(scheduler.pending().is_empty());
    }

    // ── Stale timers ───────────────────────────────────────────────

    #[test]
    fn should_ignore_timer_of_superseded_state() {
        let scheduler = ManualScheduler::ignoring_cancellation();
        let output = RecordingOutput::default();
        let controller = PwmController::new(scheduler.clone(), output.clone(), 1000);
        let mut rx = controller.subscribe();

        controller.set_duty_cycle(50.0);
        scheduler.advance(100);
        controller.reset();

        // First ON phase's timer still fires at 500 ms.
        scheduler.advance(400);
        assert_eq!(controller.state(), PwmState::On);
        assert_eq!(output.levels(), vec![false, true, true]);

        scheduler.advance(100);
        assert_eq!(controller.state(), PwmState::Off);
        assert_eq!(output.levels(), vec![false, true, true, false]);
        assert_eq!(
            drain(&mut rx),
            vec![
                (PwmState::AlwaysOff, PwmState::On),
                (PwmState::On, PwmState::On),
                (PwmState::On, PwmState::Off),
            ]
        );
    }

    #[test]
    fn should_ignore_replaced_off_timer_within_same_state() {
        let scheduler = ManualScheduler::ignoring_cancellation();
        let output = RecordingOutput::default();
        let controller = PwmController::new(scheduler.clone(), output.clone(), 1000);

        controller.set_duty_cycle(50.0);
        scheduler.advance(200);
        controller.set_duty_cycle(80.0);

        // The off timer scheduled for 500 ms was replaced by one at 800 ms.
        scheduler.advance(301);
        assert_eq!(controller.state(), PwmState::On);
        assert_eq!(output.last(), Some(true));

        scheduler.advance(300);
        assert_eq!(controller.state(), PwmState::Off);
    }

    #[test]
    fn should_ignore_timers_once_controller_dropped() {
        let scheduler = ManualScheduler::ignoring_cancellation();
        let output = RecordingOutput::default();
        let controller = PwmController::new(scheduler.clone(), output.clone(), 1000);
        controller.set_duty_cycle(50.0);

        drop(controller);
        scheduler.advance(2000);

        assert_eq!(output.levels(), vec![false, true]);
    }

    #[test]
    fn should_share_state_between_clones() {
        let (controller, _, _) = controller(1000);
        let other = controller.clone();
        other.set_duty_cycle(20.0);
        assert_eq!(controller.state(), PwmState::On);
        assert_eq!(controller.id(), other.id());
    }
}
