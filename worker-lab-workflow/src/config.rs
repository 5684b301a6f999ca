use serde::{Deserialize, Serialize};
use worker_lab_core::{CoreError, Result};

pub const DEFAULT_PRIME_PROGRESS_INTERVAL: u64 = 1000;
pub const DEFAULT_CSV_PROGRESS_INTERVAL: usize = 100;

/// Tuning knobs for the tasks a worker runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Emit a progress notification every this many candidate integers
    pub prime_progress_interval: u64,
    /// Emit a progress notification every this many CSV lines
    pub csv_progress_interval: usize,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            prime_progress_interval: DEFAULT_PRIME_PROGRESS_INTERVAL,
            csv_progress_interval: DEFAULT_CSV_PROGRESS_INTERVAL,
        }
    }
}

impl RunnerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.prime_progress_interval == 0 {
            return Err(CoreError::Validation(
                "prime_progress_interval must be greater than zero".to_string(),
            ));
        }
        if self.csv_progress_interval == 0 {
            return Err(CoreError::Validation(
                "csv_progress_interval must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_intervals() {
        let config = RunnerConfig::default();
        assert_eq!(config.prime_progress_interval, 1000);
        assert_eq!(config.csv_progress_interval, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_interval_rejected() {
        let config = RunnerConfig {
            csv_progress_interval: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_deserialization_uses_defaults() {
        let config: RunnerConfig =
            serde_json::from_str(r#"{"prime_progress_interval": 10}"#).unwrap();
        assert_eq!(config.prime_progress_interval, 10);
        assert_eq!(config.csv_progress_interval, DEFAULT_CSV_PROGRESS_INTERVAL);
    }
}
