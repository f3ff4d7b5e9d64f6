//! # pwmd — software PWM daemon
//!
//! Composition root that wires a PWM controller to the tokio scheduler and a
//! virtual relay, then drives it from stdin.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars)
//! - Install the tracing subscriber
//! - Construct the scheduler and output adapters
//! - Construct the PWM service, injecting adapters via port traits
//! - Log every state transition
//! - Read line commands until `quit`, EOF or Ctrl-C, then stop the output
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no PWM logic belongs here.

mod command;
mod config;

use std::ops::ControlFlow;
use std::sync::Arc;

use anyhow::Context as _;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;
use tracing_subscriber::EnvFilter;

use minihub_pwm_adapter_tokio::TokioScheduler;
use minihub_pwm_adapter_virtual::VirtualRelay;
use minihub_pwm_app::services::pwm_service::PwmService;
use minihub_pwm_domain::error::PwmError;
use minihub_pwm_domain::event::Transition;
use minihub_pwm_domain::settings::PwmSettings;

use crate::command::Command;
use crate::config::Config;

type Service = PwmService<TokioScheduler, Arc<VirtualRelay>>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("loading configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    let relay = Arc::new(VirtualRelay::with_history_limit(
        config.relay.name.clone(),
        config.relay.history,
    ));
    let service = build(Arc::clone(&relay), config.pwm).context("building PWM service")?;
    let controller = service.controller();
    tracing::info!(
        controller = %controller.id(),
        period_ms = controller.period_ms(),
        relay = relay.name(),
        "pwmd started"
    );

    let logger = tokio::spawn(log_transitions(controller.subscribe()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("reading stdin")? else {
                    break;
                };
                match line.parse::<Command>() {
                    Ok(command) => {
                        if let ControlFlow::Break(()) = command.apply(&service) {
                            break;
                        }
                    }
                    Err(command::CommandError::Empty) => {}
                    Err(err) => tracing::warn!(error = %err, "ignoring input"),
                }
            }
            signal = tokio::signal::ctrl_c() => {
                signal.context("listening for ctrl-c")?;
                tracing::info!("interrupted");
                break;
            }
        }
    }

    service.stop();
    tracing::info!(
        switches = relay.switch_count(),
        writes = relay.write_count(),
        "pwmd stopped"
    );
    logger.abort();
    Ok(())
}

/// Bind the scheduler to the running runtime and validate `settings` into
/// a service driving `relay`.
fn build(relay: Arc<VirtualRelay>, settings: PwmSettings) -> Result<Service, PwmError> {
    let scheduler = TokioScheduler::try_current()?;
    Ok(PwmService::new(scheduler, relay, settings)?)
}

async fn log_transitions(mut rx: broadcast::Receiver<Transition>) {
    loop {
        match rx.recv().await {
            Ok(transition) => tracing::info!(
                from = %transition.from,
                to = %transition.to,
                duty_cycle = transition.duty_cycle,
                at = %transition.at,
                "transition"
            ),
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "transition log lagged");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
