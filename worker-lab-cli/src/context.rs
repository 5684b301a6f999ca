//! CLI execution context

use anyhow::Result;

use crate::config::AppConfig;
use crate::output::OutputWriter;
use crate::Cli;

/// Execution context for CLI commands
pub struct Context {
    /// Loaded configuration
    pub config: AppConfig,

    /// Output writer
    pub output: OutputWriter,

    /// Verbose mode
    pub verbose: bool,
}

impl Context {
    /// Create a new context from CLI arguments
    pub fn new(cli: &Cli) -> Result<Self> {
        let config = AppConfig::load(cli.config.as_deref())?;
        let output = OutputWriter::new(cli.output, cli.no_color);

        Ok(Self {
            config,
            output,
            verbose: cli.verbose,
        })
    }
}
