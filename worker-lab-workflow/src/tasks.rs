pub mod csv_stats;
pub mod primes;

pub use csv_stats::*;
pub use primes::*;

use std::time::Duration;

use worker_lab_core::{Result, TaskOutput};

use crate::progress::ProgressReporter;

/// A bounded, synchronous computation run inside a worker.
///
/// Implementations report progress through the reporter and return their
/// output; the executor turns that into the terminal notification.
pub trait Task: Send + Sync {
    fn execute(&self, progress: &mut ProgressReporter<'_>) -> Result<TaskOutput>;
    fn name(&self) -> &str;
}

pub(crate) fn millis(elapsed: Duration) -> f64 {
    elapsed.as_secs_f64() * 1000.0
}
