//! Output formatting for CLI

use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Cell, Color, Table};
use indicatif::{ProgressBar, ProgressStyle};
use worker_lab_core::{CsvSummary, Notification, PrimeReport, TaskOutput};

/// Number of primes listed in full before the table switches to a preview
const PRIME_LIST_LIMIT: usize = 20;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    /// Progress bar and summary table (default)
    #[default]
    Table,
    /// One JSON notification per line
    Json,
    /// Single summary line
    Compact,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Table => write!(f, "table"),
            Self::Json => write!(f, "json"),
            Self::Compact => write!(f, "compact"),
        }
    }
}

/// Output writer that handles different formats
pub struct OutputWriter {
    format: OutputFormat,
}

impl OutputWriter {
    pub fn new(format: OutputFormat, no_color: bool) -> Self {
        if no_color {
            colored::control::set_override(false);
        }
        Self { format }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Create a percentage progress bar (table format only)
    pub fn progress_bar(&self, message: &str) -> Option<ProgressBar> {
        if self.format != OutputFormat::Table {
            return None;
        }

        let pb = ProgressBar::new(100);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos:>3}% {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▉▊▋▌▍▎▏ "),
        );
        pb.set_message(message.to_string());
        Some(pb)
    }

    /// Render one progress notification
    pub fn progress(&self, bar: Option<&ProgressBar>, value: u8) {
        match self.format {
            OutputFormat::Table => {
                if let Some(bar) = bar {
                    bar.set_position(u64::from(value));
                }
            }
            OutputFormat::Json => {
                if let Err(e) = self.json_line(&Notification::progress(value)) {
                    tracing::warn!(error = %e, "failed to write progress");
                }
            }
            OutputFormat::Compact => {}
        }
    }

    /// Render the terminal notification of a task
    pub fn terminal(&self, notification: &Notification) -> Result<()> {
        match notification {
            Notification::Result(output) => self.result(output),
            Notification::Error { message } => self.error(message),
            Notification::Progress { value } => {
                self.progress(None, *value);
                Ok(())
            }
        }
    }

    fn json_line(&self, notification: &Notification) -> Result<()> {
        println!("{}", notification.to_json()?);
        Ok(())
    }

    fn result(&self, output: &TaskOutput) -> Result<()> {
        match self.format {
            OutputFormat::Json => self.json_line(&Notification::Result(output.clone())),
            OutputFormat::Compact => {
                println!("{}", compact_line(output));
                Ok(())
            }
            OutputFormat::Table => {
                let table = match output {
                    TaskOutput::Primes(report) => primes_table(report),
                    TaskOutput::Statistics(summary) => statistics_table(summary),
                };
                println!("{} {}", "✓".green(), "Task completed".bold());
                println!("{table}");
                Ok(())
            }
        }
    }

    fn error(&self, message: &str) -> Result<()> {
        match self.format {
            OutputFormat::Json => self.json_line(&Notification::error(message)),
            OutputFormat::Compact => {
                println!("error: {}", message);
                Ok(())
            }
            OutputFormat::Table => {
                println!("{} {}", "✗".red(), message);
                Ok(())
            }
        }
    }
}

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![
            Cell::new("Field").fg(Color::Cyan),
            Cell::new("Value").fg(Color::Cyan),
        ]);
    table
}

fn primes_table(report: &PrimeReport) -> Table {
    let mut table = new_table();
    table.add_row(vec![
        Cell::new("Primes found"),
        Cell::new(report.primes.len()),
    ]);
    table.add_row(vec![
        Cell::new("Largest"),
        Cell::new(
            report
                .primes
                .last()
                .map_or_else(|| "-".to_string(), |p| p.to_string()),
        ),
    ]);
    table.add_row(vec![Cell::new("Primes"), Cell::new(prime_preview(&report.primes))]);
    table.add_row(vec![
        Cell::new("Elapsed"),
        Cell::new(format!("{} ms", report.elapsed_ms)),
    ]);
    table
}

fn statistics_table(summary: &CsvSummary) -> Table {
    let mut table = new_table();
    table.add_row(vec![Cell::new("Count"), Cell::new(summary.count)]);
    table.add_row(vec![Cell::new("Sum"), Cell::new(summary.sum)]);
    table.add_row(vec![Cell::new("Average"), Cell::new(summary.mean)]);
    table.add_row(vec![Cell::new("Minimum"), Cell::new(summary.min)]);
    table.add_row(vec![Cell::new("Maximum"), Cell::new(summary.max)]);
    table.add_row(vec![
        Cell::new("Elapsed"),
        Cell::new(format!("{:.2} ms", summary.elapsed_ms)),
    ]);
    table
}

/// List short prime sequences in full; elide the middle of long ones.
pub fn prime_preview(primes: &[u64]) -> String {
    let join = |slice: &[u64]| {
        slice
            .iter()
            .map(|p| p.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    };

    if primes.len() <= PRIME_LIST_LIMIT {
        join(primes)
    } else {
        let head = &primes[..10];
        let tail = &primes[primes.len() - 5..];
        format!("{}, …, {}", join(head), join(tail))
    }
}

pub fn compact_line(output: &TaskOutput) -> String {
    match output {
        TaskOutput::Primes(report) => format!(
            "primes={} largest={} time={}ms",
            report.primes.len(),
            report
                .primes
                .last()
                .map_or_else(|| "-".to_string(), |p| p.to_string()),
            report.elapsed_ms
        ),
        TaskOutput::Statistics(summary) => format!(
            "count={} sum={} avg={} min={} max={} time={:.2}ms",
            summary.count, summary.sum, summary.mean, summary.min, summary.max, summary.elapsed_ms
        ),
    }
}
