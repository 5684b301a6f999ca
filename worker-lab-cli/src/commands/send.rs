//! `send` command: post a raw JSON message, exactly as a page would.

use anyhow::{Context as _, Result};
use clap::Args;

use super::{drive, ensure_success, spawn_worker};
use crate::context::Context;

#[derive(Debug, Args)]
pub struct SendArgs {
    /// Message such as '{"command": "calculate", "max": 100}'
    pub message: String,
}

pub async fn execute(ctx: &Context, args: SendArgs) -> Result<()> {
    let message: serde_json::Value =
        serde_json::from_str(&args.message).context("Message is not valid JSON")?;

    let worker = spawn_worker(ctx);
    worker.post_message(message)?;

    let terminal = drive(ctx, worker, "Running").await?;
    if terminal.is_none() {
        tracing::info!("worker ignored the message");
    }
    ensure_success(terminal)
}
