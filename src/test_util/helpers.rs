use std::cell::{Cell, RefCell};
use std::io;
use std::path::Path;
use std::rc::Rc;

use crate::config::WorkloadConfig;
use crate::core::errors::WorkloadError;
use crate::launcher::interface::{BackgroundProcess, LaunchRequest, ProcessLauncher};

/// What a `RecordingLauncher` saw. Shared with the test through `Rc` since the launcher itself
/// is moved into the simulation.
#[derive(Default)]
pub struct LaunchLog {
    pub launches: RefCell<Vec<LaunchRequest>>,
    pub background: RefCell<Option<LaunchRequest>>,
    pub background_terminations: Cell<u32>,
}

/// Launcher which records requests instead of spawning processes. Can be told to fail the n-th
/// per-tick launch (0-based) or the background start.
pub struct RecordingLauncher {
    log: Rc<LaunchLog>,
    fail_launch_at: Option<usize>,
    fail_background: bool,
}

impl RecordingLauncher {
    pub fn new(log: Rc<LaunchLog>) -> Self {
        Self {
            log,
            fail_launch_at: None,
            fail_background: false,
        }
    }

    pub fn failing_launch_at(mut self, index: usize) -> Self {
        self.fail_launch_at = Some(index);
        self
    }

    pub fn failing_background(mut self) -> Self {
        self.fail_background = true;
        self
    }
}

fn not_found(request: &LaunchRequest) -> WorkloadError {
    WorkloadError::ExternalProcessLaunchFailure {
        program: request.program.clone(),
        source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
    }
}

impl ProcessLauncher for RecordingLauncher {
    fn launch(&mut self, request: &LaunchRequest) -> Result<(), WorkloadError> {
        let mut launches = self.log.launches.borrow_mut();
        if self.fail_launch_at == Some(launches.len()) {
            return Err(not_found(request));
        }
        launches.push(request.clone());
        Ok(())
    }

    fn start_background(
        &mut self,
        request: &LaunchRequest,
    ) -> Result<Box<dyn BackgroundProcess>, WorkloadError> {
        if self.fail_background {
            return Err(not_found(request));
        }
        *self.log.background.borrow_mut() = Some(request.clone());
        Ok(Box::new(RecordedBackgroundProcess {
            log: self.log.clone(),
        }))
    }
}

struct RecordedBackgroundProcess {
    log: Rc<LaunchLog>,
}

impl BackgroundProcess for RecordedBackgroundProcess {
    fn terminate(&mut self) {
        self.log
            .background_terminations
            .set(self.log.background_terminations.get() + 1);
    }
}

/// Config with no pause between ticks, writing the anomalies file into `output_dir`.
/// `with_suffix` is appended as extra top-level YAML lines.
pub fn default_test_workload_config(
    output_dir: &Path,
    with_suffix: Option<&str>,
) -> WorkloadConfig {
    let mut default = format!(
        "anomaly_duration: 10\n\
         min_spacing: 60\n\
         tick_interval: 0.0\n\
         anomalies_filepath: {:?}\n\
         generators_dir: build/package/tests\n",
        output_dir.join("anomalies_start.csv")
    );

    if let Some(suffix) = with_suffix {
        default.push_str(suffix);
    }

    WorkloadConfig::from_yaml_str(&default).unwrap()
}
