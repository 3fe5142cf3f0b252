//! Config fields definitions for the workload generator.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::core::errors::WorkloadError;
use crate::metrics::printer::MetricsPrinterConfig;

/// Environment variable holding the path of an optional YAML config file.
pub const CONFIG_PATH_ENV: &str = "PRMON_WORKLOAD_CONFIG";

#[derive(Debug, Deserialize, PartialEq, Clone)]
#[serde(default)]
pub struct WorkloadConfig {
    pub seed: u64,
    /// Length of every anomaly interval, in ticks.
    pub anomaly_duration: u64,
    /// Minimum distance between start ticks of any two anomalies.
    pub min_spacing: u64,
    /// If not set the bound is derived from anomaly count and placement window size.
    pub max_placement_attempts: Option<u64>,
    pub tick_interval: f64, // in seconds
    pub anomalies_filepath: PathBuf,
    /// Directory with `burner` and `mem-burner`, relative to the working directory.
    pub generators_dir: PathBuf,
    pub burner_name: String,
    pub mem_burner_name: String,
    /// If not set default output of logs is stderr
    pub logs_filepath: Option<PathBuf>,
    pub metrics_printer: Option<MetricsPrinterConfig>,
    /// If set every dispatched tick is appended to this CSV file.
    pub tick_trace_filepath: Option<PathBuf>,
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            anomaly_duration: 10,
            min_spacing: 60,
            max_placement_attempts: None,
            tick_interval: 1.0,
            anomalies_filepath: PathBuf::from("anomalies_start.csv"),
            generators_dir: PathBuf::from("build/package/tests"),
            burner_name: "burner".to_string(),
            mem_burner_name: "mem-burner".to_string(),
            logs_filepath: None,
            metrics_printer: None,
            tick_trace_filepath: None,
        }
    }
}

impl WorkloadConfig {
    pub fn from_yaml_str(config_yaml: &str) -> Result<Self, WorkloadError> {
        let config = serde_yaml::from_str::<WorkloadConfig>(config_yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, WorkloadError> {
        let config_yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&config_yaml)
    }

    /// Reads the file named by `PRMON_WORKLOAD_CONFIG`, or returns defaults when it is unset.
    pub fn from_env() -> Result<Self, WorkloadError> {
        match std::env::var_os(CONFIG_PATH_ENV) {
            Some(path) => Self::from_file(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), WorkloadError> {
        if !self.tick_interval.is_finite() || self.tick_interval < 0.0 {
            return Err(WorkloadError::InvalidArgument(format!(
                "tick interval must be a non-negative number of seconds, got {}",
                self.tick_interval
            )));
        }
        Ok(())
    }
}
