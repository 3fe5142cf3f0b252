//! Implements centralized storage for run metrics. The dispatch loop reports every tick sample
//! and launch here.

use average::{concatenate, Estimate, Max, Mean, Min, Variance};

use crate::core::category::Category;
use crate::core::sampler::TickSample;

concatenate!(
    Estimator,
    [Min, min],
    [Max, max],
    [Mean, mean],
    [Variance, population_variance]
);

pub struct EstimatorWrapper {
    estimator: Estimator,
}

impl std::fmt::Debug for EstimatorWrapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Estimator")
            .field("min", &self.min())
            .field("max", &self.max())
            .field("mean", &self.mean())
            .field("population_variance", &self.population_variance())
            .finish()
    }
}

impl Default for EstimatorWrapper {
    fn default() -> Self {
        Self::new()
    }
}

impl EstimatorWrapper {
    pub fn new() -> Self {
        Self {
            estimator: Estimator::new(),
        }
    }

    pub fn add(&mut self, value: f64) {
        self.estimator.add(value);
    }

    pub fn min(&self) -> f64 {
        self.estimator.min()
    }

    pub fn max(&self) -> f64 {
        self.estimator.max()
    }

    pub fn mean(&self) -> f64 {
        self.estimator.mean()
    }

    pub fn population_variance(&self) -> f64 {
        self.estimator.population_variance()
    }
}

impl PartialEq for EstimatorWrapper {
    fn eq(&self, other: &Self) -> bool {
        self.min() == other.min()
            && self.max() == other.max()
            && self.mean() == other.mean()
            && self.population_variance() == other.population_variance()
    }
}

#[derive(Debug, Default, PartialEq)]
pub struct MetricsCollector {
    /// The number of intervals in the anomaly schedule. Set before the loop starts.
    pub scheduled_anomalies: u64,
    /// The number of ticks dispatched so far.
    pub total_ticks: u64,

    pub baseline_ticks: u64,
    pub memory_anomaly_ticks: u64,
    pub process_anomaly_ticks: u64,
    pub thread_anomaly_ticks: u64,

    /// Per-tick load generator launches, the background process not included.
    pub launches: u64,

    pub memory_mb_stats: EstimatorWrapper,
    pub process_count_stats: EstimatorWrapper,
    pub thread_count_stats: EstimatorWrapper,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn record_tick(&mut self, sample: &TickSample) {
        self.total_ticks += 1;
        match sample.category {
            Category::Baseline => self.baseline_ticks += 1,
            Category::MemoryAnomaly => self.memory_anomaly_ticks += 1,
            Category::ProcessAnomaly => self.process_anomaly_ticks += 1,
            Category::ThreadAnomaly => self.thread_anomaly_ticks += 1,
        }
        self.memory_mb_stats.add(sample.memory_mb as f64);
        self.process_count_stats.add(sample.process_count as f64);
        self.thread_count_stats.add(sample.thread_count as f64);
    }

    pub fn increment_launches(&mut self, count: u64) {
        self.launches += count;
    }

    pub fn ticks_in(&self, category: Category) -> u64 {
        match category {
            Category::Baseline => self.baseline_ticks,
            Category::MemoryAnomaly => self.memory_anomaly_ticks,
            Category::ProcessAnomaly => self.process_anomaly_ticks,
            Category::ThreadAnomaly => self.thread_anomaly_ticks,
        }
    }

    pub fn anomalous_ticks(&self) -> u64 {
        self.total_ticks - self.baseline_ticks
    }
}
