//! `primes` command

use anyhow::Result;
use clap::Args;
use worker_lab_core::TaskRequest;

use super::{drive, ensure_success, spawn_worker};
use crate::context::Context;

#[derive(Debug, Args)]
pub struct PrimesArgs {
    /// Exclusive upper bound; every prime below it is reported
    #[arg(short, long, allow_negative_numbers = true)]
    pub max: i64,
}

pub async fn execute(ctx: &Context, args: PrimesArgs) -> Result<()> {
    tracing::debug!(max = args.max, "submitting prime calculation");

    let worker = spawn_worker(ctx);
    worker.submit(TaskRequest::calculate(args.max))?;

    let terminal = drive(ctx, worker, "Calculating primes").await?;
    ensure_success(terminal)
}
