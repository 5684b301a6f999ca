use std::time::Instant;

use worker_lab_core::{PrimeReport, Result, TaskOutput};

use super::{millis, Task};
use crate::config::DEFAULT_PRIME_PROGRESS_INTERVAL;
use crate::progress::ProgressReporter;

/// Trial division, skipping multiples of 2 and 3.
pub fn is_prime(n: u64) -> bool {
    if n <= 1 {
        return false;
    }
    if n <= 3 {
        return true;
    }
    if n % 2 == 0 || n % 3 == 0 {
        return false;
    }

    let mut k = 5;
    while k <= n / k {
        if n % k == 0 || n % (k + 2) == 0 {
            return false;
        }
        k += 6;
    }
    true
}

/// Finds every prime strictly below `max`.
pub struct PrimeTask {
    max: i64,
    progress_interval: u64,
}

impl PrimeTask {
    pub fn new(max: i64) -> Self {
        Self {
            max,
            progress_interval: DEFAULT_PRIME_PROGRESS_INTERVAL,
        }
    }

    pub fn with_progress_interval(mut self, interval: u64) -> Self {
        self.progress_interval = interval.max(1);
        self
    }

    fn percent(current: u64, max: u64) -> u8 {
        ((current as f64 / max as f64) * 100.0).round() as u8
    }
}

impl Task for PrimeTask {
    fn execute(&self, progress: &mut ProgressReporter<'_>) -> Result<TaskOutput> {
        tracing::debug!(max = self.max, "calculating primes");

        let start = Instant::now();
        let mut primes = Vec::new();

        if self.max > 2 {
            let max = self.max as u64;
            for i in 2..max {
                if is_prime(i) {
                    primes.push(i);
                }
                if i % self.progress_interval == 0 {
                    progress.report(Self::percent(i, max));
                }
            }
        }

        let elapsed_ms = millis(start.elapsed()).round() as u64;
        tracing::debug!(found = primes.len(), elapsed_ms, "prime calculation finished");

        Ok(PrimeReport { primes, elapsed_ms }.into())
    }

    fn name(&self) -> &str {
        "calculate_primes"
    }
}
