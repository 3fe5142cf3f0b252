//! Simulation callbacks interface and implementations to observe a workload run on start, on
//! every dispatched tick and on finish.

use std::fs::File;
use std::path::Path;

use log::info;

use crate::core::errors::WorkloadError;
use crate::core::sampler::TickSample;
use crate::metrics::printer::{print_metrics, MetricsPrinterConfig};
use crate::simulator::WorkloadSimulation;
use crate::trace::ticks::TickTraceWriter;

pub trait SimulationCallbacks {
    /// Runs after the background load is started and before the first tick.
    fn on_simulation_start(&mut self, _sim: &WorkloadSimulation) -> Result<(), WorkloadError> {
        Ok(())
    }

    /// Runs after both load generators of a tick were launched.
    fn on_tick(
        &mut self,
        _sim: &WorkloadSimulation,
        _sample: &TickSample,
    ) -> Result<(), WorkloadError> {
        Ok(())
    }

    /// Runs once the loop is over and the background load is terminated, whether the loop
    /// succeeded or not.
    fn on_simulation_finish(&mut self, _sim: &WorkloadSimulation) -> Result<(), WorkloadError> {
        Ok(())
    }
}

pub struct NoCallbacks {}

impl SimulationCallbacks for NoCallbacks {}

/// Appends every tick to a CSV label trace.
pub struct TickTraceCallbacks {
    writer: TickTraceWriter<File>,
}

impl TickTraceCallbacks {
    pub fn create(path: &Path) -> Result<Self, WorkloadError> {
        info!("Writing tick trace to {:?}", path);
        Ok(Self {
            writer: TickTraceWriter::create(path)?,
        })
    }
}

impl SimulationCallbacks for TickTraceCallbacks {
    fn on_tick(
        &mut self,
        _sim: &WorkloadSimulation,
        sample: &TickSample,
    ) -> Result<(), WorkloadError> {
        self.writer.append(sample)
    }

    fn on_simulation_finish(&mut self, _sim: &WorkloadSimulation) -> Result<(), WorkloadError> {
        self.writer.flush()
    }
}

/// Dumps the metrics collector when the run is over.
pub struct MetricsPrinterCallbacks {
    config: MetricsPrinterConfig,
}

impl MetricsPrinterCallbacks {
    pub fn new(config: MetricsPrinterConfig) -> Self {
        Self { config }
    }
}

impl SimulationCallbacks for MetricsPrinterCallbacks {
    fn on_simulation_finish(&mut self, sim: &WorkloadSimulation) -> Result<(), WorkloadError> {
        print_metrics(&sim.metrics_collector, &self.config)?;
        info!("Metrics written to {:?}", self.config.output_file);
        Ok(())
    }
}

/// Forwards every hook to each callback in order. A failing hook stops the forwarding.
#[derive(Default)]
pub struct CallbacksChain {
    callbacks: Vec<Box<dyn SimulationCallbacks>>,
}

impl CallbacksChain {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn push(&mut self, callbacks: Box<dyn SimulationCallbacks>) {
        self.callbacks.push(callbacks);
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }
}

impl SimulationCallbacks for CallbacksChain {
    fn on_simulation_start(&mut self, sim: &WorkloadSimulation) -> Result<(), WorkloadError> {
        for callbacks in self.callbacks.iter_mut() {
            callbacks.on_simulation_start(sim)?;
        }
        Ok(())
    }

    fn on_tick(
        &mut self,
        sim: &WorkloadSimulation,
        sample: &TickSample,
    ) -> Result<(), WorkloadError> {
        for callbacks in self.callbacks.iter_mut() {
            callbacks.on_tick(sim, sample)?;
        }
        Ok(())
    }

    fn on_simulation_finish(&mut self, sim: &WorkloadSimulation) -> Result<(), WorkloadError> {
        for callbacks in self.callbacks.iter_mut() {
            callbacks.on_simulation_finish(sim)?;
        }
        Ok(())
    }
}
