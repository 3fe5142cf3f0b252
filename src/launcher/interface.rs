// Interface between the dispatch loop and the external load generators.
//
// Per-tick load is a fire-and-forget launch: nothing is returned, the generator is expected to
// exit on its own after its short repeat count. The CPU baseline is the only long-lived process
// and comes back as a `BackgroundProcess` which the caller must terminate.

use std::path::{Path, PathBuf};

use crate::core::errors::WorkloadError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl LaunchRequest {
    pub fn new(program: PathBuf, args: Vec<String>) -> Self {
        Self { program, args }
    }
}

/// Locations of the two load generator executables and the flags they understand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadGenerators {
    burner: PathBuf,
    mem_burner: PathBuf,
}

impl LoadGenerators {
    pub fn new(generators_dir: &Path, burner_name: &str, mem_burner_name: &str) -> Self {
        Self {
            burner: generators_dir.join(burner_name),
            mem_burner: generators_dir.join(mem_burner_name),
        }
    }

    pub fn burner(&self) -> &Path {
        &self.burner
    }

    pub fn mem_burner(&self) -> &Path {
        &self.mem_burner
    }

    /// `burner -t <threads> -p <procs> -r <repeat>`
    pub fn cpu_load(&self, threads: i64, procs: i64, repeat: u64) -> LaunchRequest {
        LaunchRequest::new(
            self.burner.clone(),
            vec![
                "-t".to_string(),
                threads.to_string(),
                "-p".to_string(),
                procs.to_string(),
                "-r".to_string(),
                repeat.to_string(),
            ],
        )
    }

    /// `mem-burner -m <mem_mb> -p <procs> -s <repeat>`
    pub fn memory_load(&self, memory_mb: i64, procs: i64, repeat: u64) -> LaunchRequest {
        LaunchRequest::new(
            self.mem_burner.clone(),
            vec![
                "-m".to_string(),
                memory_mb.to_string(),
                "-p".to_string(),
                procs.to_string(),
                "-s".to_string(),
                repeat.to_string(),
            ],
        )
    }

    /// Single-thread single-process CPU noise lasting the whole run, like an OS taking its share.
    pub fn cpu_background(&self, total_samples: u64) -> LaunchRequest {
        self.cpu_load(1, 1, total_samples)
    }
}

pub trait BackgroundProcess {
    /// Stops the process. Must be safe to call on an already exited process.
    fn terminate(&mut self);
}

pub trait ProcessLauncher {
    /// Starts the process and forgets about it.
    fn launch(&mut self, request: &LaunchRequest) -> Result<(), WorkloadError>;

    fn start_background(
        &mut self,
        request: &LaunchRequest,
    ) -> Result<Box<dyn BackgroundProcess>, WorkloadError>;
}
