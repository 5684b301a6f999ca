//! Subcommands. Each one starts a worker, hands it a single submission and
//! renders what comes back.

pub mod csv;
pub mod primes;
pub mod send;

use anyhow::{bail, Result};
use worker_lab_core::Notification;
use worker_lab_workflow::{Worker, WorkerHandle};

use crate::context::Context;

/// Start a worker configured from the CLI context.
pub fn spawn_worker(ctx: &Context) -> WorkerHandle {
    Worker::spawn(ctx.config.runner.clone())
}

/// Close `worker`, render every notification it emits and return the
/// terminal one, if any.
pub async fn drive(ctx: &Context, mut worker: WorkerHandle, label: &str) -> Result<Option<Notification>> {
    worker.close();

    let bar = ctx.output.progress_bar(label);
    let mut terminal = None;

    while let Some(notification) = worker.recv().await {
        match notification {
            Notification::Progress { value } => ctx.output.progress(bar.as_ref(), value),
            other => {
                if let Some(bar) = &bar {
                    bar.finish_and_clear();
                }
                ctx.output.terminal(&other)?;
                terminal = Some(other);
            }
        }
    }

    if let Some(bar) = bar {
        bar.finish_and_clear();
    }
    worker.shutdown().await?;

    Ok(terminal)
}

/// Fail the command when the worker reported an error.
pub fn ensure_success(terminal: Option<Notification>) -> Result<()> {
    match terminal {
        Some(Notification::Error { message }) => bail!("task failed: {}", message),
        _ => Ok(()),
    }
}
