use statrs::statistics::Statistics;
use worker_lab_core::{CoreError, Result};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryStatistics {
    pub count: usize,
    pub sum: f64,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

pub struct MetricAggregator;

impl MetricAggregator {
    /// Summarise a sequence of values.
    ///
    /// An empty sequence has no mean, minimum or maximum and is rejected, as is
    /// any input whose statistics are not finite (infinite inputs, or a sum
    /// that overflows `f64`).
    pub fn summarize(values: &[f64]) -> Result<SummaryStatistics> {
        if values.is_empty() {
            return Err(CoreError::Validation(
                "no numeric values to summarize".to_string(),
            ));
        }

        let count = values.len();
        let sum: f64 = values.iter().sum();
        let mean = sum / count as f64;
        let min = Statistics::min(values);
        let max = Statistics::max(values);

        tracing::trace!(count, sum, mean, min, max, "summarized values");

        if ![sum, mean, min, max].iter().all(|v| v.is_finite()) {
            return Err(CoreError::Validation(format!(
                "summary statistics are not finite (sum={sum}, min={min}, max={max})"
            )));
        }

        Ok(SummaryStatistics {
            count,
            sum,
            mean,
            min,
            max,
        })
    }
}
