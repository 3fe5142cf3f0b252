//! Represents entry point for the workload run: schedules anomalies once, then walks ticks
//! `1..=total_samples` driving the load generators.

use std::future::Future;
use std::time::{Duration, Instant};

use log::{debug, error, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::WorkloadConfig;
use crate::core::anomaly::Schedule;
use crate::core::errors::WorkloadError;
use crate::core::sampler::{classify_and_sample, TickSample};
use crate::core::scheduler::{validate_workload_args, AnomalyScheduler};
use crate::launcher::guard::BackgroundGuard;
use crate::launcher::interface::{LoadGenerators, ProcessLauncher};
use crate::metrics::collector::MetricsCollector;
use crate::simulation_callbacks::{NoCallbacks, SimulationCallbacks};
use crate::trace::anomalies::write_schedule_to_file;

pub struct WorkloadSimulation {
    config: WorkloadConfig,
    total_samples: u64,
    contamination_rate: f64,

    // Single random source for placement, categories and demand draws.
    rng: StdRng,
    scheduler: AnomalyScheduler,
    schedule: Schedule,
    initialized: bool,

    generators: LoadGenerators,
    launcher: Box<dyn ProcessLauncher>,

    pub metrics_collector: MetricsCollector,
}

impl WorkloadSimulation {
    pub fn new(
        config: WorkloadConfig,
        total_samples: u64,
        contamination_rate: f64,
        launcher: Box<dyn ProcessLauncher>,
    ) -> Result<Self, WorkloadError> {
        validate_workload_args(total_samples, contamination_rate)?;
        config.validate()?;
        info!(
            "Creating workload simulation for {} samples at rate {} with config: {:?}",
            total_samples, contamination_rate, config
        );

        let scheduler = AnomalyScheduler::new(
            config.anomaly_duration,
            config.min_spacing,
            config.max_placement_attempts,
        )?;
        let generators = LoadGenerators::new(
            &config.generators_dir,
            &config.burner_name,
            &config.mem_burner_name,
        );

        Ok(Self {
            rng: StdRng::seed_from_u64(config.seed),
            config,
            total_samples,
            contamination_rate,
            scheduler,
            schedule: Schedule::default(),
            initialized: false,
            generators,
            launcher,
            metrics_collector: MetricsCollector::new(),
        })
    }

    pub fn config(&self) -> &WorkloadConfig {
        &self.config
    }

    pub fn total_samples(&self) -> u64 {
        self.total_samples
    }

    pub fn generators(&self) -> &LoadGenerators {
        &self.generators
    }

    /// Empty until `initialize` is called.
    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// Generates the anomaly schedule and persists it to the anomalies file. Only the first call
    /// does any work.
    pub fn initialize(&mut self) -> Result<&Schedule, WorkloadError> {
        if !self.initialized {
            let schedule =
                self.scheduler
                    .generate(self.total_samples, self.contamination_rate, &mut self.rng)?;
            info!("Anomaly start times: {:?}", schedule.start_ticks());
            write_schedule_to_file(&self.config.anomalies_filepath, &schedule)?;
            self.metrics_collector.scheduled_anomalies = schedule.len() as u64;
            self.schedule = schedule;
            self.initialized = true;
        }
        Ok(&self.schedule)
    }

    pub async fn run_until<F: Future<Output = ()>>(
        &mut self,
        shutdown: F,
    ) -> Result<(), WorkloadError> {
        self.run_with_callbacks(&mut NoCallbacks {}, shutdown).await
    }

    /// Runs the dispatch loop until all ticks are dispatched, a tick fails, or `shutdown`
    /// completes. The background load is terminated on every one of these paths before
    /// `on_simulation_finish` runs. The loop's own error wins over a callback's finish error.
    pub async fn run_with_callbacks<F: Future<Output = ()>>(
        &mut self,
        callbacks: &mut dyn SimulationCallbacks,
        shutdown: F,
    ) -> Result<(), WorkloadError> {
        self.initialize()?;

        let background_request = self.generators.cpu_background(self.total_samples);
        let mut background =
            BackgroundGuard::new(self.launcher.start_background(&background_request)?);

        let t = Instant::now();
        let result = match callbacks.on_simulation_start(self) {
            Ok(()) => self.dispatch_ticks(callbacks, shutdown).await,
            Err(e) => Err(e),
        };
        background.release();

        let duration = t.elapsed().as_secs_f64();
        match &result {
            Ok(()) => info!(
                "Dispatched {} ticks with {} launches in {:.2?}s",
                self.metrics_collector.total_ticks, self.metrics_collector.launches, duration
            ),
            Err(e) => error!(
                "Workload stopped after {} ticks in {:.2?}s: {}",
                self.metrics_collector.total_ticks, duration, e
            ),
        }

        let finish = callbacks.on_simulation_finish(self);
        result.and(finish)
    }

    async fn dispatch_ticks<F: Future<Output = ()>>(
        &mut self,
        callbacks: &mut dyn SimulationCallbacks,
        shutdown: F,
    ) -> Result<(), WorkloadError> {
        tokio::pin!(shutdown);
        let tick_interval = Duration::from_secs_f64(self.config.tick_interval);

        for tick in 1..=self.total_samples {
            let sample = self.dispatch_tick(tick)?;
            callbacks.on_tick(self, &sample)?;

            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    info!("Shutdown requested at tick {}", tick);
                    return Err(WorkloadError::Interrupted { tick });
                }
                _ = tokio::time::sleep(tick_interval) => {}
            }
        }
        Ok(())
    }

    /// Samples one tick and launches both load generators for it.
    fn dispatch_tick(&mut self, tick: u64) -> Result<TickSample, WorkloadError> {
        let sample = classify_and_sample(tick, &self.schedule, &mut self.rng)?;
        debug!("{:?}", sample);

        self.launcher.launch(&self.generators.memory_load(
            sample.memory_mb,
            sample.process_count,
            1,
        ))?;
        self.metrics_collector.increment_launches(1);
        self.launcher.launch(&self.generators.cpu_load(
            sample.thread_count,
            sample.process_count,
            1,
        ))?;
        self.metrics_collector.increment_launches(1);

        self.metrics_collector.record_tick(&sample);
        Ok(sample)
    }
}
