//! `csv` command

use anyhow::{Context as _, Result};
use clap::Args;
use std::io::Read;
use std::path::PathBuf;
use worker_lab_core::TaskRequest;

use super::{drive, ensure_success, spawn_worker};
use crate::context::Context;

#[derive(Debug, Args)]
pub struct CsvArgs {
    /// CSV file to summarise; reads stdin when omitted or `-`
    pub file: Option<PathBuf>,
}

impl CsvArgs {
    fn read_input(&self) -> Result<String> {
        match &self.file {
            Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read CSV from {:?}", path)),
            _ => {
                let mut data = String::new();
                std::io::stdin()
                    .read_to_string(&mut data)
                    .context("Failed to read CSV from stdin")?;
                Ok(data)
            }
        }
    }
}

pub async fn execute(ctx: &Context, args: CsvArgs) -> Result<()> {
    let data = args.read_input()?;
    tracing::debug!(bytes = data.len(), "submitting csv processing");

    let worker = spawn_worker(ctx);
    worker.submit(TaskRequest::process(data))?;

    let terminal = drive(ctx, worker, "Processing CSV").await?;
    ensure_success(terminal)
}
