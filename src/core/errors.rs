//! Error taxonomy shared by the scheduler, the sampler and the dispatch loop.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkloadError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error(
        "cannot place {requested} anomalies in ticks [{first_anomaly}, {last_anomaly}] with min \
         spacing {min_spacing}: placed {placed} after {attempts} attempts"
    )]
    SchedulingInfeasible {
        requested: usize,
        placed: usize,
        attempts: u64,
        first_anomaly: u64,
        last_anomaly: u64,
        min_spacing: u64,
    },

    #[error("failed to launch {program:?}: {source}")]
    ExternalProcessLaunchFailure {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("workload interrupted at tick {tick}")]
    Interrupted { tick: u64 },

    #[error("config error: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
