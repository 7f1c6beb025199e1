use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::app::{AppCommand, TaskOutcome};
use crate::docker::RuntimeGateway;
use crate::model::ContainerRecord;

/// Runs `command` on a background task that reports exactly one outcome.
pub fn spawn_command<G: RuntimeGateway>(
    gateway: Arc<G>,
    command: AppCommand,
    tx: mpsc::UnboundedSender<TaskOutcome>,
) -> Option<JoinHandle<()>> {
    command.operation()?;
    debug!("spawning command={command:?}");

    Some(tokio::spawn(async move {
        let Some(outcome) = run_command(gateway.as_ref(), command).await else {
            return;
        };
        // the loop has exited when the receiver is gone
        let _ = tx.send(outcome);
    }))
}

pub async fn run_command<G: RuntimeGateway>(
    gateway: &G,
    command: AppCommand,
) -> Option<TaskOutcome> {
    let operation = command.operation()?;
    let result = match command {
        AppCommand::None => return None,
        AppCommand::Enumerate => gateway.enumerate().await,
        AppCommand::Start { id } => start_then_enumerate(gateway, &id).await,
        AppCommand::Stop { id } => stop_then_enumerate(gateway, &id).await,
    };

    Some(match result {
        Ok(records) => {
            info!("{operation} finished, {} containers listed", records.len());
            TaskOutcome::Enumerated(records)
        }
        Err(error) => {
            warn!("{operation} failed: {error:#}");
            TaskOutcome::Failed {
                operation,
                error: format!("{error:#}"),
            }
        }
    })
}

async fn start_then_enumerate<G: RuntimeGateway>(
    gateway: &G,
    id: &str,
) -> Result<Vec<ContainerRecord>> {
    gateway.start(id).await?;
    gateway.enumerate().await
}

async fn stop_then_enumerate<G: RuntimeGateway>(
    gateway: &G,
    id: &str,
) -> Result<Vec<ContainerRecord>> {
    gateway.stop(id).await?;
    gateway.enumerate().await
}
