//! Per-tick sampler: classifies a tick against the anomaly schedule and draws its resource
//! demand from the category's distribution.

use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::core::anomaly::Schedule;
use crate::core::category::{Category, ResourceRange};
use crate::core::errors::WorkloadError;

/// Resource demand of one tick, handed to the load generators.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct TickSample {
    pub tick: u64,
    pub category: Category,
    pub memory_mb: i64,
    pub process_count: i64,
    pub thread_count: i64,
}

/// Draws one value from N((low + high) / 2, ((high - low) / 4)^2) and rounds it to the nearest
/// integer, ties away from zero. The result is not clamped, so about 5% of draws fall outside
/// `[low, high]`.
pub fn sample_bounded<R: Rng + ?Sized>(
    rng: &mut R,
    low: f64,
    high: f64,
) -> Result<i64, WorkloadError> {
    if !low.is_finite() || !high.is_finite() || high < low {
        return Err(WorkloadError::InvalidArgument(format!(
            "bad sampling range [{}, {}]",
            low, high
        )));
    }
    let range = ResourceRange::new(low, high);
    let normal = Normal::new(range.mean(), range.sigma())
        .map_err(|e| WorkloadError::InvalidArgument(format!("{}", e)))?;
    Ok(normal.sample(rng).round() as i64)
}

fn sample_range<R: Rng + ?Sized>(rng: &mut R, range: &ResourceRange) -> Result<i64, WorkloadError> {
    sample_bounded(rng, range.low, range.high)
}

/// Picks the tick's category. Anomalous ticks redraw the category every tick, so a single
/// interval may mix categories.
pub fn classify<R: Rng + ?Sized>(tick: u64, schedule: &Schedule, rng: &mut R) -> Category {
    match schedule.find_interval(tick) {
        Some(_) => Category::ANOMALIES[rng.gen_range(0..Category::ANOMALIES.len())],
        None => Category::Baseline,
    }
}

pub fn classify_and_sample<R: Rng + ?Sized>(
    tick: u64,
    schedule: &Schedule,
    rng: &mut R,
) -> Result<TickSample, WorkloadError> {
    let category = classify(tick, schedule, rng);
    let profile = category.profile();

    // Draw order is memory, processes, threads.
    let memory_mb = sample_range(rng, &profile.memory_mb)?;
    let process_count = sample_range(rng, &profile.process_count)?;
    let thread_count = sample_range(rng, &profile.thread_count)?;

    Ok(TickSample {
        tick,
        category,
        memory_mb,
        process_count,
        thread_count,
    })
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::core::anomaly::{AnomalyInterval, Schedule};
    use crate::core::category::Category;
    use crate::core::errors::WorkloadError;

    use super::{classify_and_sample, sample_bounded};

    #[test]
    fn test_sample_bounded_statistics() {
        let mut rng = StdRng::seed_from_u64(42);
        let draws: Vec<i64> = (0..10000)
            .map(|_| sample_bounded(&mut rng, 290.0, 310.0).unwrap())
            .collect();

        let mean = draws.iter().sum::<i64>() as f64 / draws.len() as f64;
        assert!((mean - 300.0).abs() < 0.5, "mean {}", mean);

        // Rounding widens the band slightly, so the share is a bit above 95%.
        let inside = draws.iter().filter(|&&v| (290..=310).contains(&v)).count() as f64
            / draws.len() as f64;
        assert!(inside > 0.93 && inside < 0.98, "inside share {}", inside);

        // No clamping: some draws leave the nominal range.
        assert!(draws.iter().any(|&v| !(290..=310).contains(&v)));
    }

    #[test]
    fn test_sample_bounded_degenerate_range() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..100 {
            assert_eq!(7, sample_bounded(&mut rng, 7.0, 7.0).unwrap());
        }
    }

    #[test]
    fn test_sample_bounded_rejects_bad_range() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            sample_bounded(&mut rng, 10.0, 2.0),
            Err(WorkloadError::InvalidArgument(_))
        ));
        assert!(matches!(
            sample_bounded(&mut rng, f64::NEG_INFINITY, 2.0),
            Err(WorkloadError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_baseline_outside_intervals() {
        let schedule = Schedule::new(vec![AnomalyInterval::new(100, 10)]);
        let mut rng = StdRng::seed_from_u64(7);
        for tick in (1..100).chain(110..200) {
            let sample = classify_and_sample(tick, &schedule, &mut rng).unwrap();
            assert_eq!(tick, sample.tick);
            assert_eq!(Category::Baseline, sample.category);
        }
    }

    #[test]
    fn test_anomalous_ticks_draw_every_anomaly_category() {
        let schedule = Schedule::new(vec![AnomalyInterval::new(100, 10)]);
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen = vec![];
        for _ in 0..50 {
            for tick in 100..110 {
                let sample = classify_and_sample(tick, &schedule, &mut rng).unwrap();
                assert!(sample.category.is_anomaly());
                if !seen.contains(&sample.category) {
                    seen.push(sample.category);
                }
            }
        }
        assert_eq!(3, seen.len());
    }

    #[test]
    fn test_memory_anomaly_demands_more_memory_than_baseline() {
        let schedule = Schedule::new(vec![AnomalyInterval::new(1, 1000)]);
        let mut rng = StdRng::seed_from_u64(3);
        for tick in 1..1000 {
            let sample = classify_and_sample(tick, &schedule, &mut rng).unwrap();
            if sample.category == Category::MemoryAnomaly {
                // 500 is six sigma below the memory anomaly mean.
                assert!(sample.memory_mb > 500);
            }
        }
    }
}
