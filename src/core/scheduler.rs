//! Anomaly scheduler: places fixed-duration anomaly intervals inside the interior of the
//! timeline so that no two of them start closer than the minimum spacing.

use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::core::anomaly::{AnomalyInterval, Schedule};
use crate::core::errors::WorkloadError;

/// Default bound on placement attempts is this factor times anomaly count times window size.
pub const PLACEMENT_ATTEMPTS_FACTOR: u64 = 100;

/// Checks the two user-facing knobs: sample count and contamination rate.
pub fn validate_workload_args(
    total_samples: u64,
    contamination_rate: f64,
) -> Result<(), WorkloadError> {
    if total_samples == 0 {
        return Err(WorkloadError::InvalidArgument(
            "total sample count must be positive".to_string(),
        ));
    }
    if !(0.0..=1.0).contains(&contamination_rate) {
        return Err(WorkloadError::InvalidArgument(format!(
            "contamination rate must be in [0, 1], got {}",
            contamination_rate
        )));
    }
    Ok(())
}

/// Number of anomaly intervals needed so that roughly `contamination_rate` of all ticks are
/// anomalous: floor(total_samples * contamination_rate / anomaly_duration).
pub fn anomaly_count(total_samples: u64, contamination_rate: f64, anomaly_duration: u64) -> usize {
    (total_samples as f64 * contamination_rate / anomaly_duration as f64).floor() as usize
}

/// Inclusive range of admissible start ticks: the first and the last 10% of the timeline are
/// kept free of anomalies. Integer arithmetic gives exact floors; ticks start at 1 so the lower
/// bound never goes below it.
pub fn placement_window(total_samples: u64) -> (u64, u64) {
    let first_anomaly = (total_samples / 10).max(1);
    // floor(9N/10) split so that it does not overflow for large N.
    let last_anomaly = total_samples / 10 * 9 + total_samples % 10 * 9 / 10;
    (first_anomaly, last_anomaly)
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnomalyScheduler {
    anomaly_duration: u64,
    min_spacing: u64,
    /// If not set the bound is derived from anomaly count and window size.
    max_placement_attempts: Option<u64>,
}

impl AnomalyScheduler {
    pub fn new(
        anomaly_duration: u64,
        min_spacing: u64,
        max_placement_attempts: Option<u64>,
    ) -> Result<Self, WorkloadError> {
        if anomaly_duration == 0 {
            return Err(WorkloadError::InvalidArgument(
                "anomaly duration must be positive".to_string(),
            ));
        }
        if min_spacing == 0 {
            return Err(WorkloadError::InvalidArgument(
                "min spacing must be positive".to_string(),
            ));
        }
        Ok(Self {
            anomaly_duration,
            min_spacing,
            max_placement_attempts,
        })
    }

    pub fn anomaly_duration(&self) -> u64 {
        self.anomaly_duration
    }

    pub fn min_spacing(&self) -> u64 {
        self.min_spacing
    }

    fn attempts_bound(&self, count: usize, window_size: u64) -> u64 {
        self.max_placement_attempts.unwrap_or_else(|| {
            PLACEMENT_ATTEMPTS_FACTOR
                .saturating_mul(count as u64)
                .saturating_mul(window_size)
        })
    }

    /// Draws candidate starts uniformly from the placement window and keeps those at least
    /// `min_spacing` away from every start accepted so far. The result keeps discovery order,
    /// so the same `rng` state always yields the same schedule.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        total_samples: u64,
        contamination_rate: f64,
        rng: &mut R,
    ) -> Result<Schedule, WorkloadError> {
        validate_workload_args(total_samples, contamination_rate)?;

        let count = anomaly_count(total_samples, contamination_rate, self.anomaly_duration);
        let (first_anomaly, last_anomaly) = placement_window(total_samples);
        info!(
            "Scheduling {} anomalies of duration {} in ticks [{}, {}] with min spacing {}",
            count, self.anomaly_duration, first_anomaly, last_anomaly, self.min_spacing
        );

        if count == 0 {
            return Ok(Schedule::default());
        }

        let infeasible = |placed: usize, attempts: u64| WorkloadError::SchedulingInfeasible {
            requested: count,
            placed,
            attempts,
            first_anomaly,
            last_anomaly,
            min_spacing: self.min_spacing,
        };

        if first_anomaly > last_anomaly {
            return Err(infeasible(0, 0));
        }
        // Densest packing puts a start every `min_spacing` ticks from the window's left edge.
        let max_fitting = (last_anomaly - first_anomaly) / self.min_spacing + 1;
        if count as u64 > max_fitting {
            return Err(infeasible(0, 0));
        }

        let window_size = last_anomaly - first_anomaly + 1;
        let max_attempts = self.attempts_bound(count, window_size);

        let mut intervals: Vec<AnomalyInterval> = Vec::with_capacity(count);
        let mut attempts: u64 = 0;
        while intervals.len() < count {
            if attempts >= max_attempts {
                return Err(infeasible(intervals.len(), attempts));
            }
            attempts += 1;

            let candidate = rng.gen_range(first_anomaly..=last_anomaly);
            if intervals
                .iter()
                .all(|accepted| accepted.start_tick.abs_diff(candidate) >= self.min_spacing)
            {
                intervals.push(AnomalyInterval::new(candidate, self.anomaly_duration));
            } else {
                debug!("Rejected anomaly start candidate {}", candidate);
            }
        }
        debug!("Placed {} anomalies in {} attempts", count, attempts);

        Ok(Schedule::new(intervals))
    }
}

/// Seeded entry point: builds its own random source from `seed`. Nothing is written to disk,
/// callers persist the result with `trace::anomalies::write_schedule_to_file`.
pub fn generate_schedule(
    total_samples: u64,
    contamination_rate: f64,
    anomaly_duration: u64,
    min_spacing: u64,
    seed: u64,
) -> Result<Schedule, WorkloadError> {
    let scheduler = AnomalyScheduler::new(anomaly_duration, min_spacing, None)?;
    let mut rng = StdRng::seed_from_u64(seed);
    scheduler.generate(total_samples, contamination_rate, &mut rng)
}
