//! The six controller states.
//!
//! Each variant performs its entry action in `enter` and owns the timers it
//! scheduled; [`ActiveState::dispose`] cancels them. Hooks return the state
//! to transition to, if any, and leave the transition itself to the
//! controller.
//!
//! A state only reacts to a timer whose ticket matches one it still holds.
//! Cancellation cannot stop a callback that is already waiting for the
//! controller lock, so a rescheduled off timer would otherwise let the old
//! callback through.

use tokio::time::Instant;

use minihub_pwm_domain::duty_cycle::{on_time_ms, rounds_to_hundred, rounds_to_zero};
use minihub_pwm_domain::state::PwmState;

use crate::ports::TimerHandle;

/// Which timer of a state fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum TimerEvent {
    PeriodEnded,
    OnPhaseEnded,
}

/// A scheduled timer together with the ticket its callback reports.
pub(super) struct Timer<H> {
    handle: H,
    ticket: u64,
}

impl<H: TimerHandle> Timer<H> {
    pub(super) fn new(handle: H, ticket: u64) -> Self {
        Self { handle, ticket }
    }

    fn cancel(&self) {
        self.handle.cancel();
    }

    fn is(&self, ticket: u64) -> bool {
        self.ticket == ticket
    }
}

/// What a state can see of, and do to, its controller.
pub(super) trait StateContext {
    type Handle: TimerHandle;

    fn duty_cycle(&self) -> f64;
    fn period_ms(&self) -> i64;
    fn now(&self) -> Instant;
    fn set_output(&self, on: bool);
    /// Schedule `event` for the state this context was created for.
    /// Negative delays fire immediately.
    fn schedule(&self, delay_ms: i64, event: TimerEvent) -> Timer<Self::Handle>;

    fn on_time_ms(&self) -> i64 {
        on_time_ms(self.period_ms(), self.duty_cycle())
    }

    fn elapsed_ms(&self, since: Instant) -> i64 {
        let elapsed = self.now().saturating_duration_since(since).as_millis();
        i64::try_from(elapsed).unwrap_or(i64::MAX)
    }
}

pub(super) enum ActiveState<H> {
    AlwaysOff,
    AlwaysOn,
    DutycycleZero(DutycycleZero<H>),
    DutycycleHundred(DutycycleHundred<H>),
    Off(Off<H>),
    On(On<H>),
}

impl<H: TimerHandle> ActiveState<H> {
    /// Construct `target`, running its entry action: drive the output to the
    /// state's entry level, then schedule the state's timers.
    pub(super) fn enter<C: StateContext<Handle = H>>(target: PwmState, cx: &C) -> Self {
        cx.set_output(target.output_on_entry());
        match target {
            PwmState::AlwaysOff => Self::AlwaysOff,
            PwmState::AlwaysOn => Self::AlwaysOn,
            PwmState::DutycycleZero => Self::DutycycleZero(DutycycleZero::enter(cx)),
            PwmState::DutycycleHundred => Self::DutycycleHundred(DutycycleHundred::enter(cx)),
            PwmState::Off => Self::Off(Off::enter(cx)),
            PwmState::On => Self::On(On::enter(cx)),
        }
    }

    pub(super) fn kind(&self) -> PwmState {
        match self {
            Self::AlwaysOff => PwmState::AlwaysOff,
            Self::AlwaysOn => PwmState::AlwaysOn,
            Self::DutycycleZero(_) => PwmState::DutycycleZero,
            Self::DutycycleHundred(_) => PwmState::DutycycleHundred,
            Self::Off(_) => PwmState::Off,
            Self::On(_) => PwmState::On,
        }
    }

    /// The stored duty cycle just took a new value.
    pub(super) fn on_duty_cycle_changed<C: StateContext<Handle = H>>(
        &mut self,
        cx: &C,
    ) -> Option<PwmState> {
        match self {
            Self::AlwaysOff => Some(if rounds_to_hundred(cx.duty_cycle()) {
                PwmState::DutycycleHundred
            } else {
                PwmState::On
            }),
            // Any deviation from a settled 100 % goes through a full OFF phase,
            // even when the new value still rounds to 100.
            Self::AlwaysOn => Some(PwmState::Off),
            Self::DutycycleHundred(state) => {
                state.duty_cycle_changed(cx);
                None
            }
            Self::On(state) => state.duty_cycle_changed(cx),
            Self::DutycycleZero(_) | Self::Off(_) => None,
        }
    }

    /// A duty cycle arrived, whether or not it differs from the stored one.
    ///
    /// This is the dead-man switch: a controller left in `AlwaysOff` while
    /// the stored duty cycle is positive recovers as soon as the driver
    /// repeats its value.
    pub(super) fn on_duty_cycle_updated<C: StateContext<Handle = H>>(
        &self,
        cx: &C,
    ) -> Option<PwmState> {
        match self {
            Self::AlwaysOff if !rounds_to_zero(cx.duty_cycle()) => Some(PwmState::On),
            _ => None,
        }
    }

    /// Timer `ticket` fired with `event`. Tickets of timers this state no
    /// longer holds are ignored.
    pub(super) fn on_timer<C: StateContext<Handle = H>>(
        &mut self,
        event: TimerEvent,
        ticket: u64,
        cx: &C,
    ) -> Option<PwmState> {
        match (self, event) {
            (Self::DutycycleZero(state), TimerEvent::PeriodEnded)
                if state.period_timer.is(ticket) =>
            {
                Some(DutycycleZero::<H>::period_ended(cx))
            }
            (Self::DutycycleHundred(state), TimerEvent::PeriodEnded)
                if state.period_timer.is(ticket) =>
            {
                Some(state.period_ended(cx))
            }
            (Self::DutycycleHundred(state), TimerEvent::OnPhaseEnded)
                if holds(state.off_timer.as_ref(), ticket) =>
            {
                state.on_phase_ended(cx);
                None
            }
            (Self::Off(state), TimerEvent::PeriodEnded) if state.period_timer.is(ticket) => {
                Some(Off::<H>::period_ended(cx))
            }
            (Self::On(state), TimerEvent::OnPhaseEnded)
                if holds(state.off_timer.as_ref(), ticket) =>
            {
                Some(state.on_phase_ended(cx))
            }
            _ => None,
        }
    }

    /// Cancel every timer this state still owns.
    pub(super) fn dispose(&mut self) {
        match self {
            Self::AlwaysOff | Self::AlwaysOn => {}
            Self::DutycycleZero(state) => state.period_timer.cancel(),
            Self::DutycycleHundred(state) => {
                state.period_timer.cancel();
                if let Some(timer) = state.off_timer.take() {
                    timer.cancel();
                }
            }
            Self::Off(state) => state.period_timer.cancel(),
            Self::On(state) => {
                if let Some(timer) = state.off_timer.take() {
                    timer.cancel();
                }
            }
        }
    }
}

fn holds<H: TimerHandle>(timer: Option<&Timer<H>>, ticket: u64) -> bool {
    timer.is_some_and(|timer| timer.is(ticket))
}

/// Output held OFF for one period to confirm a 0 % duty cycle.
pub(super) struct DutycycleZero<H> {
    period_timer: Timer<H>,
}

impl<H: TimerHandle> DutycycleZero<H> {
    fn enter<C: StateContext<Handle = H>>(cx: &C) -> Self {
        Self {
            period_timer: cx.schedule(cx.period_ms(), TimerEvent::PeriodEnded),
        }
    }

    fn period_ended<C: StateContext<Handle = H>>(cx: &C) -> PwmState {
        let duty_cycle = cx.duty_cycle();
        if rounds_to_zero(duty_cycle) {
            PwmState::AlwaysOff
        } else if rounds_to_hundred(duty_cycle) {
            PwmState::DutycycleHundred
        } else {
            PwmState::On
        }
    }
}

/// Output held ON for one period to confirm a 100 % duty cycle.
///
/// A change during the period shortens the ON phase in place instead of
/// transitioning, and prevents settling into `AlwaysOn` at period end.
pub(super) struct DutycycleHundred<H> {
    enabled_at: Instant,
    period_timer: Timer<H>,
    off_timer: Option<Timer<H>>,
    changed: bool,
}

impl<H: TimerHandle> DutycycleHundred<H> {
    fn enter<C: StateContext<Handle = H>>(cx: &C) -> Self {
        Self {
            enabled_at: cx.now(),
            period_timer: cx.schedule(cx.period_ms(), TimerEvent::PeriodEnded),
            off_timer: None,
            changed: false,
        }
    }

    fn duty_cycle_changed<C: StateContext<Handle = H>>(&mut self, cx: &C) {
        let on_time = cx.on_time_ms();
        let elapsed = cx.elapsed_ms(self.enabled_at);
        if let Some(timer) = self.off_timer.take() {
            timer.cancel();
        }
        if elapsed >= on_time {
            cx.set_output(false);
        } else {
            self.off_timer = Some(cx.schedule(on_time - elapsed, TimerEvent::OnPhaseEnded));
        }
        self.changed = true;
    }

    fn on_phase_ended<C: StateContext<Handle = H>>(&mut self, cx: &C) {
        self.off_timer = None;
        cx.set_output(false);
    }

    fn period_ended<C: StateContext<Handle = H>>(&self, cx: &C) -> PwmState {
        let duty_cycle = cx.duty_cycle();
        if !self.changed && rounds_to_zero(duty_cycle) {
            PwmState::AlwaysOff
        } else if !self.changed && rounds_to_hundred(duty_cycle) {
            PwmState::AlwaysOn
        } else {
            PwmState::On
        }
    }
}

/// OFF phase of a regular period; lasts until the period ends.
pub(super) struct Off<H> {
    period_timer: Timer<H>,
}

impl<H: TimerHandle> Off<H> {
    fn enter<C: StateContext<Handle = H>>(cx: &C) -> Self {
        let off_time = cx.period_ms() - cx.on_time_ms();
        Self {
            period_timer: cx.schedule(off_time, TimerEvent::PeriodEnded),
        }
    }

    fn period_ended<C: StateContext<Handle = H>>(cx: &C) -> PwmState {
        let duty_cycle = cx.duty_cycle();
        if rounds_to_zero(duty_cycle) {
            PwmState::DutycycleZero
        } else if rounds_to_hundred(duty_cycle) {
            PwmState::DutycycleHundred
        } else {
            PwmState::On
        }
    }
}

/// ON phase of a regular period; starts every period.
pub(super) struct On<H> {
    enabled_at: Instant,
    off_timer: Option<Timer<H>>,
}

impl<H: TimerHandle> On<H> {
    fn enter<C: StateContext<Handle = H>>(cx: &C) -> Self {
        Self {
            enabled_at: cx.now(),
            off_timer: Some(cx.schedule(cx.on_time_ms(), TimerEvent::OnPhaseEnded)),
        }
    }

    fn duty_cycle_changed<C: StateContext<Handle = H>>(&mut self, cx: &C) -> Option<PwmState> {
        if let Some(timer) = self.off_timer.take() {
            timer.cancel();
        }
        let on_time = cx.on_time_ms();
        let elapsed = cx.elapsed_ms(self.enabled_at);
        if elapsed >= on_time {
            return Some(PwmState::Off);
        }
        self.off_timer = Some(cx.schedule(on_time - elapsed, TimerEvent::OnPhaseEnded));
        None
    }

    fn on_phase_ended<C: StateContext<Handle = H>>(&mut self, cx: &C) -> PwmState {
        self.off_timer = None;
        if rounds_to_hundred(cx.duty_cycle()) {
            PwmState::DutycycleHundred
        } else {
            PwmState::Off
        }
    }
}
