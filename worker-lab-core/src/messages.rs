//! Messages exchanged between a caller and a worker.
//!
//! Requests travel into the worker tagged by `command`; notifications travel
//! back out tagged by `type`. Every value is owned and crosses the boundary
//! by move, so neither side ever holds a reference into the other's memory.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Command names understood by the worker.
pub const COMMAND_CALCULATE: &str = "calculate";
pub const COMMAND_PROCESS: &str = "process";

/// A single unit of work submitted to a worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum TaskRequest {
    /// Enumerate every prime strictly below `max`.
    Calculate { max: i64 },
    /// Summarise the numeric fields of a CSV document.
    Process { data: String },
}

impl TaskRequest {
    pub fn calculate(max: i64) -> Self {
        Self::Calculate { max }
    }

    pub fn process(data: impl Into<String>) -> Self {
        Self::Process { data: data.into() }
    }

    pub fn command(&self) -> &'static str {
        match self {
            Self::Calculate { .. } => COMMAND_CALCULATE,
            Self::Process { .. } => COMMAND_PROCESS,
        }
    }

    /// Returns true if `command` names a request this crate knows how to decode.
    pub fn is_known_command(command: &str) -> bool {
        matches!(command, COMMAND_CALCULATE | COMMAND_PROCESS)
    }

    /// Decode a raw inbound message.
    ///
    /// Messages without a recognised `command` decode to `Ok(None)` and are
    /// meant to be dropped without a reply. A recognised command whose payload
    /// has the wrong shape is an error.
    pub fn from_message(message: &serde_json::Value) -> Result<Option<Self>> {
        let command = match message.get("command").and_then(|c| c.as_str()) {
            Some(command) if Self::is_known_command(command) => command.to_string(),
            _ => return Ok(None),
        };

        serde_json::from_value(message.clone())
            .map(Some)
            .map_err(|e| CoreError::InvalidPayload {
                command,
                reason: e.to_string(),
            })
    }
}

/// Output of the prime enumeration task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrimeReport {
    pub primes: Vec<u64>,
    /// Elapsed wall time in whole milliseconds
    #[serde(rename = "time")]
    pub elapsed_ms: u64,
}

/// Output of the CSV statistics task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsvSummary {
    pub count: usize,
    pub sum: f64,
    #[serde(rename = "avg")]
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    /// Elapsed wall time in milliseconds, two decimal places
    #[serde(rename = "time")]
    pub elapsed_ms: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaskOutput {
    Primes(PrimeReport),
    Statistics(CsvSummary),
}

impl TaskOutput {
    pub fn elapsed_ms(&self) -> f64 {
        match self {
            Self::Primes(report) => report.elapsed_ms as f64,
            Self::Statistics(summary) => summary.elapsed_ms,
        }
    }
}

impl From<PrimeReport> for TaskOutput {
    fn from(report: PrimeReport) -> Self {
        Self::Primes(report)
    }
}

impl From<CsvSummary> for TaskOutput {
    fn from(summary: CsvSummary) -> Self {
        Self::Statistics(summary)
    }
}

/// A message emitted by a worker while it handles one request.
///
/// Zero or more `Progress` messages are followed by exactly one terminal
/// message, either `Result` or `Error`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Notification {
    Progress { value: u8 },
    Result(TaskOutput),
    Error { message: String },
}

impl Notification {
    pub fn progress(value: u8) -> Self {
        Self::Progress { value }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Progress { .. })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl From<CoreError> for Notification {
    fn from(err: CoreError) -> Self {
        Self::error(err.to_string())
    }
}
