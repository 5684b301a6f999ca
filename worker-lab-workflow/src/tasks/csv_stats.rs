use std::time::Instant;

use worker_lab_core::{CoreError, CsvSummary, Result, TaskOutput};
use worker_lab_metrics::MetricAggregator;

use super::{millis, Task};
use crate::config::DEFAULT_CSV_PROGRESS_INTERVAL;
use crate::progress::ProgressReporter;

/// Read the leading number of `field`, ignoring whatever text follows it.
///
/// Leading whitespace is skipped. The number is an optional sign followed by
/// either the literal `Infinity` or digits with an optional fraction and
/// exponent. An exponent marker without digits ends the number, so `"1e"`
/// reads as 1. `"inf"`, `"nan"` and fields without a leading digit yield
/// `None`.
pub fn parse_number_prefix(field: &str) -> Option<f64> {
    let s = field.trim_start();
    let bytes = s.as_bytes();
    let digits_from = |from: usize| {
        bytes[from..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count()
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    if s[end..].starts_with("Infinity") {
        return Some(if bytes[0] == b'-' {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }

    let mut mantissa_digits = digits_from(end);
    end += mantissa_digits;
    if bytes.get(end) == Some(&b'.') {
        let fraction = digits_from(end + 1);
        mantissa_digits += fraction;
        end += 1 + fraction;
    }
    if mantissa_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exponent = end + 1;
        if matches!(bytes.get(exponent), Some(b'+' | b'-')) {
            exponent += 1;
        }
        let exponent_digits = digits_from(exponent);
        if exponent_digits > 0 {
            end = exponent + exponent_digits;
        }
    }

    s[..end].parse().ok()
}

/// Parse every comma-separated field of `line` that starts with a number.
pub fn numeric_fields(line: &str) -> impl Iterator<Item = f64> + '_ {
    line.split(',').filter_map(parse_number_prefix)
}

/// Computes count, sum, average, minimum and maximum over the numeric
/// fields of a CSV document. The first line is a header and is skipped.
pub struct CsvStatsTask {
    data: String,
    progress_interval: usize,
}

impl CsvStatsTask {
    pub fn new(data: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            progress_interval: DEFAULT_CSV_PROGRESS_INTERVAL,
        }
    }

    pub fn with_progress_interval(mut self, interval: usize) -> Self {
        self.progress_interval = interval.max(1);
        self
    }

    /// Collect numeric values in document order, reporting progress as lines are consumed.
    pub fn collect_values(&self, progress: &mut ProgressReporter<'_>) -> Vec<f64> {
        let lines: Vec<&str> = self.data.split('\n').collect();
        let total = lines.len();
        let mut values = Vec::new();

        for (i, line) in lines.iter().enumerate().skip(1) {
            if line.trim().is_empty() {
                continue;
            }

            values.extend(numeric_fields(line));

            if i % self.progress_interval == 0 {
                progress.report((i * 100 / total) as u8);
            }
        }

        values
    }
}

impl Task for CsvStatsTask {
    fn execute(&self, progress: &mut ProgressReporter<'_>) -> Result<TaskOutput> {
        tracing::debug!(bytes = self.data.len(), "processing csv");

        let start = Instant::now();
        let values = self.collect_values(progress);

        if values.is_empty() {
            return Err(CoreError::Validation(
                "no numeric values found in CSV data".to_string(),
            ));
        }

        let stats = MetricAggregator::summarize(&values)?;
        let elapsed_ms = (millis(start.elapsed()) * 100.0).round() / 100.0;

        tracing::debug!(count = stats.count, elapsed_ms, "csv processing finished");

        Ok(CsvSummary {
            count: stats.count,
            sum: stats.sum,
            mean: stats.mean,
            min: stats.min,
            max: stats.max,
            elapsed_ms,
        }
        .into())
    }

    fn name(&self) -> &str {
        "process_csv"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_numeric_fields_skip_text() {
        let values: Vec<f64> = numeric_fields("3,x, 4.5 ,,-2").collect();
        assert_eq!(values, vec![3.0, 4.5, -2.0]);
    }

    #[test]
    fn test_numeric_fields_handle_carriage_return() {
        let values: Vec<f64> = numeric_fields("1,2\r").collect();
        assert_eq!(values, vec![1.0, 2.0]);
    }

    #[test]
    fn test_numeric_fields_drop_nan() {
        let values: Vec<f64> = numeric_fields("NaN,nan,1e3").collect();
        assert_eq!(values, vec![1000.0]);
    }

    #[test]
    fn test_numeric_fields_keep_unit_suffixed_values() {
        let values: Vec<f64> = numeric_fields("10%,3abc,2.5kg").collect();
        assert_eq!(values, vec![10.0, 3.0, 2.5]);
    }

    #[rstest]
    #[case("10%", Some(10.0))]
    #[case("3abc", Some(3.0))]
    #[case("2.5kg", Some(2.5))]
    #[case("1e", Some(1.0))]
    #[case("1e+", Some(1.0))]
    #[case("1.5e3x", Some(1500.0))]
    #[case("2E-2", Some(0.02))]
    #[case(".5x", Some(0.5))]
    #[case("-.25", Some(-0.25))]
    #[case("+7", Some(7.0))]
    #[case("4.", Some(4.0))]
    #[case("  12 ", Some(12.0))]
    #[case("0x10", Some(0.0))]
    #[case("Infinity", Some(f64::INFINITY))]
    #[case("-Infinity", Some(f64::NEG_INFINITY))]
    #[case("+Infinityish", Some(f64::INFINITY))]
    #[case("inf", None)]
    #[case("infinity", None)]
    #[case("-inf", None)]
    #[case("NaN", None)]
    #[case(".", None)]
    #[case("-", None)]
    #[case("e5", None)]
    #[case("abc3", None)]
    #[case("", None)]
    fn test_parse_number_prefix(#[case] field: &str, #[case] expected: Option<f64>) {
        assert_eq!(parse_number_prefix(field), expected);
    }
}
