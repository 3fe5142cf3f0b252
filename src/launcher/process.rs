//! Launcher backed by real child processes.

use log::{info, trace, warn};
use tokio::process::{Child, Command};

use crate::core::errors::WorkloadError;
use crate::launcher::interface::{BackgroundProcess, LaunchRequest, ProcessLauncher};

/// Spawns children on the current tokio runtime, so it must be used from inside one.
#[derive(Debug, Default)]
pub struct ChildProcessLauncher {}

impl ChildProcessLauncher {
    pub fn new() -> Self {
        Self {}
    }

    fn spawn(request: &LaunchRequest, kill_on_drop: bool) -> Result<Child, WorkloadError> {
        Command::new(&request.program)
            .args(&request.args)
            .kill_on_drop(kill_on_drop)
            .spawn()
            .map_err(|source| WorkloadError::ExternalProcessLaunchFailure {
                program: request.program.clone(),
                source,
            })
    }
}

impl ProcessLauncher for ChildProcessLauncher {
    fn launch(&mut self, request: &LaunchRequest) -> Result<(), WorkloadError> {
        let child = Self::spawn(request, false)?;
        trace!(
            "Launched {:?} {:?} pid={:?}",
            request.program,
            request.args,
            child.id()
        );
        // Dropping the handle leaves the child running; the runtime reaps it once it exits.
        Ok(())
    }

    fn start_background(
        &mut self,
        request: &LaunchRequest,
    ) -> Result<Box<dyn BackgroundProcess>, WorkloadError> {
        let child = Self::spawn(request, true)?;
        info!(
            "Started background {:?} {:?} pid={:?}",
            request.program,
            request.args,
            child.id()
        );
        Ok(Box::new(ChildBackgroundProcess { child }))
    }
}

pub struct ChildBackgroundProcess {
    child: Child,
}

impl BackgroundProcess for ChildBackgroundProcess {
    fn terminate(&mut self) {
        match self.child.try_wait() {
            Ok(Some(status)) => info!("Background process already exited with {}", status),
            _ => {
                if let Err(e) = self.child.start_kill() {
                    warn!("Failed to kill background process: {}", e);
                }
            }
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use std::io;
    use std::path::PathBuf;
    use std::time::Duration;

    use crate::core::errors::WorkloadError;
    use crate::launcher::interface::{BackgroundProcess, LaunchRequest, ProcessLauncher};

    use super::{ChildBackgroundProcess, ChildProcessLauncher};

    fn request(program: &str, args: &[&str]) -> LaunchRequest {
        LaunchRequest {
            program: PathBuf::from(program),
            args: args.iter().map(|arg| arg.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn test_missing_program_is_launch_failure() {
        let mut launcher = ChildProcessLauncher::new();
        let missing = request("/nonexistent/build/package/tests/burner", &["-t", "1"]);

        match launcher.launch(&missing) {
            Err(WorkloadError::ExternalProcessLaunchFailure { program, source }) => {
                assert_eq!(missing.program, program);
                assert_eq!(io::ErrorKind::NotFound, source.kind());
            }
            other => panic!("expected launch failure, got {:?}", other),
        }
        assert!(matches!(
            launcher.start_background(&missing),
            Err(WorkloadError::ExternalProcessLaunchFailure { .. })
        ));
    }

    #[tokio::test]
    async fn test_launch_spawns_program() {
        let mut launcher = ChildProcessLauncher::new();
        launcher.launch(&request("true", &[])).unwrap();
    }

    #[tokio::test]
    async fn test_terminate_kills_background_process() {
        let child = ChildProcessLauncher::spawn(&request("sleep", &["30"]), true).unwrap();
        let mut background = ChildBackgroundProcess { child };

        background.terminate();
        let status = tokio::time::timeout(Duration::from_secs(5), background.child.wait())
            .await
            .expect("background process should exit after terminate")
            .unwrap();
        // Killed by a signal, so there is no exit code.
        assert_eq!(None, status.code());

        // Already exited: nothing left to kill.
        background.terminate();
        assert!(background.child.try_wait().unwrap().is_some());
    }
}
