//! Tick categories and the resource-demand ranges each of them draws from.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Baseline,
    MemoryAnomaly,
    ProcessAnomaly,
    ThreadAnomaly,
}

impl Category {
    /// Categories an anomalous tick is drawn from, in draw-index order.
    pub const ANOMALIES: [Category; 3] = [
        Category::MemoryAnomaly,
        Category::ProcessAnomaly,
        Category::ThreadAnomaly,
    ];

    pub const ALL: [Category; 4] = [
        Category::Baseline,
        Category::MemoryAnomaly,
        Category::ProcessAnomaly,
        Category::ThreadAnomaly,
    ];

    pub fn is_anomaly(&self) -> bool {
        *self != Category::Baseline
    }

    pub fn profile(&self) -> &'static DemandProfile {
        match self {
            Category::Baseline => &BASELINE_PROFILE,
            Category::MemoryAnomaly => &MEMORY_ANOMALY_PROFILE,
            Category::ProcessAnomaly => &PROCESS_ANOMALY_PROFILE,
            Category::ThreadAnomaly => &THREAD_ANOMALY_PROFILE,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Baseline => "baseline",
            Category::MemoryAnomaly => "memory_anomaly",
            Category::ProcessAnomaly => "process_anomaly",
            Category::ThreadAnomaly => "thread_anomaly",
        };
        f.write_str(name)
    }
}

/// Soft target range `[low, high]` of one resource dimension. Samples are centered on the
/// middle of the range and may land outside of it.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq)]
pub struct ResourceRange {
    pub low: f64,
    pub high: f64,
}

impl ResourceRange {
    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    pub fn mean(&self) -> f64 {
        (self.low + self.high) / 2.0
    }

    // ~95% of draws fall inside [low, high] with this sigma.
    pub fn sigma(&self) -> f64 {
        (self.high - self.low) / 4.0
    }
}

/// Ranges for memory in megabytes, process count and thread count.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct DemandProfile {
    pub memory_mb: ResourceRange,
    pub process_count: ResourceRange,
    pub thread_count: ResourceRange,
}

pub static BASELINE_PROFILE: DemandProfile = DemandProfile {
    memory_mb: ResourceRange::new(290.0, 310.0),
    process_count: ResourceRange::new(2.0, 4.0),
    thread_count: ResourceRange::new(2.0, 4.0),
};

pub static MEMORY_ANOMALY_PROFILE: DemandProfile = DemandProfile {
    memory_mb: ResourceRange::new(600.0, 700.0),
    process_count: ResourceRange::new(2.0, 5.0),
    thread_count: ResourceRange::new(3.0, 6.0),
};

pub static PROCESS_ANOMALY_PROFILE: DemandProfile = DemandProfile {
    memory_mb: ResourceRange::new(420.0, 550.0),
    process_count: ResourceRange::new(6.0, 10.0),
    thread_count: ResourceRange::new(4.0, 7.0),
};

pub static THREAD_ANOMALY_PROFILE: DemandProfile = DemandProfile {
    memory_mb: ResourceRange::new(380.0, 420.0),
    process_count: ResourceRange::new(4.0, 8.0),
    thread_count: ResourceRange::new(5.0, 10.0),
};
