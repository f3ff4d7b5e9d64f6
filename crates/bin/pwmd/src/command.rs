//! Line commands read from stdin.

use std::ops::ControlFlow;
use std::str::FromStr;

use minihub_pwm_app::ports::{OutputSink, Scheduler};
use minihub_pwm_app::services::pwm_service::PwmService;

/// A single operator command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Feed a new duty-cycle value (percent).
    DutyCycle(f64),
    /// Restart the cycle with an ON phase.
    Reset,
    /// Force the output off until the next update.
    Stop,
    /// Print the current state.
    Status,
    /// Stop the controller and exit.
    Quit,
}

/// Errors produced while parsing a command line.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command: {0}")]
    Unknown(String),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        if line.is_empty() {
            return Err(CommandError::Empty);
        }
        match line.to_ascii_lowercase().as_str() {
            "reset" => Ok(Self::Reset),
            "stop" => Ok(Self::Stop),
            "status" => Ok(Self::Status),
            "quit" | "exit" => Ok(Self::Quit),
            other => other
                .trim_end_matches('%')
                .parse::<f64>()
                .map(Self::DutyCycle)
                .map_err(|_| CommandError::Unknown(line.to_string())),
        }
    }
}

impl Command {
    /// Apply the command to the service. `Break` asks the caller to shut down.
    pub fn apply<S, O>(self, service: &PwmService<S, O>) -> ControlFlow<()>
    where
        S: Scheduler + Clone + 'static,
        O: OutputSink + 'static,
    {
        match self {
            Self::DutyCycle(value) => {
                let applied = service.update(value);
                tracing::info!(requested = value, applied, "duty cycle updated");
            }
            Self::Reset => service.reset(),
            Self::Stop => service.stop(),
            Self::Status => {
                let controller = service.controller();
                tracing::info!(
                    controller = %controller.id(),
                    state = %controller.state(),
                    duty_cycle = controller.duty_cycle(),
                    period_ms = controller.period_ms(),
                    "status"
                );
            }
            Self::Quit => return ControlFlow::Break(()),
        }
        ControlFlow::Continue(())
    }
}
