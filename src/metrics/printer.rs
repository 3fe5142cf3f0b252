use prettytable::{row, Table};
use serde::{Deserialize, Serialize};
use std::{fs::File, io::Write};

use crate::core::errors::WorkloadError;
use crate::metrics::collector::{EstimatorWrapper, MetricsCollector};

#[derive(Debug, Default, Deserialize, PartialEq, Clone)]
pub enum OutputFormat {
    #[default]
    JSON,
    PrettyTable,
}

#[derive(Debug, Default, Deserialize, PartialEq, Clone)]
pub struct MetricsPrinterConfig {
    #[serde(default)]
    pub format: OutputFormat,
    pub output_file: std::path::PathBuf,
}

pub fn print_metrics(
    collector: &MetricsCollector,
    config: &MetricsPrinterConfig,
) -> Result<(), WorkloadError> {
    let mut metrics_file = File::create(&config.output_file)?;
    match config.format {
        OutputFormat::PrettyTable => print_metrics_as_pretty_table(collector, &mut metrics_file),
        OutputFormat::JSON => print_metrics_as_json(collector, &mut metrics_file),
    }
}

pub fn print_metrics_as_pretty_table<W: Write>(
    metrics: &MetricsCollector,
    out: &mut W,
) -> Result<(), WorkloadError> {
    let mut aggregated_table = Table::new();
    aggregated_table.add_row(row!["Metric", "Count"]);
    aggregated_table.add_row(row!["Scheduled anomalies", metrics.scheduled_anomalies]);
    aggregated_table.add_row(row!["Total ticks", metrics.total_ticks]);
    aggregated_table.add_row(row!["Baseline ticks", metrics.baseline_ticks]);
    aggregated_table.add_row(row!["Memory anomaly ticks", metrics.memory_anomaly_ticks]);
    aggregated_table.add_row(row!["Process anomaly ticks", metrics.process_anomaly_ticks]);
    aggregated_table.add_row(row!["Thread anomaly ticks", metrics.thread_anomaly_ticks]);
    aggregated_table.add_row(row!["Launches", metrics.launches]);

    let mut stats_table = Table::new();
    stats_table.add_row(row!["Metric", "Min", "Max", "Mean", "Variance"]);
    for (name, stats) in [
        ("Memory, MB", &metrics.memory_mb_stats),
        ("Process count", &metrics.process_count_stats),
        ("Thread count", &metrics.thread_count_stats),
    ] {
        stats_table.add_row(row![
            name,
            stats.min(),
            stats.max(),
            stats.mean(),
            stats.population_variance()
        ]);
    }

    aggregated_table.print(out)?;
    stats_table.print(out)?;
    Ok(())
}

#[derive(Serialize)]
struct MetricsJSON {
    counters: Counters,
    demand: Demand,
}

#[derive(Serialize)]
struct Counters {
    scheduled_anomalies: u64,
    total_ticks: u64,
    baseline_ticks: u64,
    memory_anomaly_ticks: u64,
    process_anomaly_ticks: u64,
    thread_anomaly_ticks: u64,
    launches: u64,
}

#[derive(Serialize)]
struct Demand {
    memory_mb: DemandStats,
    process_count: DemandStats,
    thread_count: DemandStats,
}

#[derive(Serialize)]
struct DemandStats {
    min: f64,
    max: f64,
    mean: f64,
    variance: f64,
}

impl From<&EstimatorWrapper> for DemandStats {
    fn from(stats: &EstimatorWrapper) -> Self {
        Self {
            min: stats.min(),
            max: stats.max(),
            mean: stats.mean(),
            variance: stats.population_variance(),
        }
    }
}

pub fn print_metrics_as_json<W: Write>(
    metrics: &MetricsCollector,
    out: &mut W,
) -> Result<(), WorkloadError> {
    let metrics = MetricsJSON {
        counters: Counters {
            scheduled_anomalies: metrics.scheduled_anomalies,
            total_ticks: metrics.total_ticks,
            baseline_ticks: metrics.baseline_ticks,
            memory_anomaly_ticks: metrics.memory_anomaly_ticks,
            process_anomaly_ticks: metrics.process_anomaly_ticks,
            thread_anomaly_ticks: metrics.thread_anomaly_ticks,
            launches: metrics.launches,
        },
        demand: Demand {
            memory_mb: (&metrics.memory_mb_stats).into(),
            process_count: (&metrics.process_count_stats).into(),
            thread_count: (&metrics.thread_count_stats).into(),
        },
    };

    let serialized_json = serde_json::to_string_pretty(&metrics)
        .map_err(|e| WorkloadError::Io(e.into()))?;
    out.write_all(serialized_json.as_bytes())?;
    Ok(())
}
