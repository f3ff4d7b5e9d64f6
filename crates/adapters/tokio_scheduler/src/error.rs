//! Tokio adapter error types.

use minihub_pwm_domain::error::PwmError;

/// Errors specific to the tokio scheduler adapter.
#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    /// The scheduler was created outside of a tokio runtime.
    #[error("no tokio runtime available")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),
}

impl From<SchedulerError> for PwmError {
    fn from(err: SchedulerError) -> Self {
        PwmError::Scheduler(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_runtime() -> SchedulerError {
        tokio::runtime::Handle::try_current()
            .map(|_| ())
            .expect_err("tests in this module run without a runtime")
            .into()
    }

    #[test]
    fn should_display_no_runtime_error() {
        assert_eq!(no_runtime().to_string(), "no tokio runtime available");
    }

    #[test]
    fn should_convert_into_scheduler_pwm_error() {
        let err: PwmError = no_runtime().into();
        assert!(matches!(err, PwmError::Scheduler(_)));
    }
}
