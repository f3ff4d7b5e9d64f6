//! In-process transition bus backed by a tokio broadcast channel.

use tokio::sync::broadcast;

use minihub_pwm_domain::event::Transition;

/// Fan-out of [`Transition`] events to any number of subscribers.
///
/// Publishing is synchronous and never fails: with no subscriber the
/// event is simply dropped, and slow subscribers observe
/// [`broadcast::error::RecvError::Lagged`] rather than blocking the
/// controller.
#[derive(Clone)]
pub struct TransitionBus {
    sender: broadcast::Sender<Transition>,
}

impl TransitionBus {
    /// Create a bus retaining up to `capacity` undelivered events per subscriber.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Receive every transition published *after* this call.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Transition> {
        self.sender.subscribe()
    }

    pub fn publish(&self, transition: Transition) {
        // Only fails without receivers.
        let _ = self.sender.send(transition);
    }
}

impl Default for TransitionBus {
    fn default() -> Self {
        Self::new(64)
    }
}
