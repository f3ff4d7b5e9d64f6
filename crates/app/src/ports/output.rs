//! Output port — the binary actuator driven by a controller.

use std::sync::Arc;

/// Receives the ON/OFF level chosen by a controller.
///
/// Called while the controller holds its internal lock: implementations
/// must return promptly and must not call back into the controller.
pub trait OutputSink: Send + Sync {
    fn set_output(&self, on: bool);
}

impl<T: OutputSink> OutputSink for Arc<T> {
    fn set_output(&self, on: bool) {
        (**self).set_output(on);
    }
}
