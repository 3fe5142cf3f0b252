//! Labeled workload generator for exercising prmon: schedules ground-truth anomaly windows and
//! drives external CPU and memory load generators tick by tick.

pub mod config;
pub mod core;
pub mod launcher;
pub mod metrics;
pub mod simulation_callbacks;
pub mod simulator;
pub mod test_util;
pub mod trace;
