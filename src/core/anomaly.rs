//! Type definitions for anomaly intervals and the schedule that holds them.

use serde::{Deserialize, Serialize};

/// Contiguous run of anomalous ticks `[start_tick, start_tick + duration)`.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct AnomalyInterval {
    #[serde(rename = "start_time")]
    pub start_tick: u64,
    pub duration: u64,
}

impl AnomalyInterval {
    pub fn new(start_tick: u64, duration: u64) -> Self {
        Self {
            start_tick,
            duration,
        }
    }

    pub fn end_tick(&self) -> u64 {
        self.start_tick.saturating_add(self.duration)
    }

    pub fn contains(&self, tick: u64) -> bool {
        self.start_tick <= tick && tick < self.end_tick()
    }
}

/// Anomaly intervals in the order they were discovered by the scheduler.
/// Never mutated after the scheduler hands it out.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Schedule {
    intervals: Vec<AnomalyInterval>,
}

impl Schedule {
    pub fn new(intervals: Vec<AnomalyInterval>) -> Self {
        Self { intervals }
    }

    pub fn intervals(&self) -> &[AnomalyInterval] {
        &self.intervals
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn start_ticks(&self) -> Vec<u64> {
        self.intervals.iter().map(|i| i.start_tick).collect()
    }

    /// First interval covering `tick`. With starts spaced by at least the duration there is at
    /// most one such interval.
    pub fn find_interval(&self, tick: u64) -> Option<&AnomalyInterval> {
        self.intervals.iter().find(|interval| interval.contains(tick))
    }

    /// Number of ticks in `1..=total_samples` covered by some interval.
    pub fn anomalous_ticks(&self, total_samples: u64) -> u64 {
        (1..=total_samples)
            .filter(|&tick| self.find_interval(tick).is_some())
            .count() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::{AnomalyInterval, Schedule};

    #[test]
    fn test_interval_is_half_open() {
        let interval = AnomalyInterval::new(100, 10);
        assert!(!interval.contains(99));
        assert!(interval.contains(100));
        assert!(interval.contains(109));
        assert!(!interval.contains(110));
    }

    #[test]
    fn test_find_interval() {
        let schedule = Schedule::new(vec![
            AnomalyInterval::new(300, 10),
            AnomalyInterval::new(120, 10),
        ]);
        assert_eq!(None, schedule.find_interval(119));
        assert_eq!(Some(&AnomalyInterval::new(120, 10)), schedule.find_interval(125));
        assert_eq!(Some(&AnomalyInterval::new(300, 10)), schedule.find_interval(300));
        assert_eq!(None, schedule.find_interval(310));
        assert_eq!(vec![300, 120], schedule.start_ticks());
    }

    #[test]
    fn test_anomalous_ticks_clipped_by_total_samples() {
        let schedule = Schedule::new(vec![AnomalyInterval::new(95, 10)]);
        assert_eq!(6, schedule.anomalous_ticks(100));
        assert_eq!(10, schedule.anomalous_ticks(1000));
        assert_eq!(0, Schedule::default().anomalous_ticks(1000));
    }
}
