use std::env;
use std::io;
use std::path::Path;

use anyhow::Context;
use clap::Parser;
use file_rotate::{compression::Compression, suffix::AppendCount, ContentLimit, FileRotate};
use log::info;
#[cfg(unix)]
use tokio::signal::unix::{signal, Signal, SignalKind};

use prmon_workload::config::{WorkloadConfig, CONFIG_PATH_ENV};
use prmon_workload::launcher::process::ChildProcessLauncher;
use prmon_workload::simulation_callbacks::{
    CallbacksChain, MetricsPrinterCallbacks, TickTraceCallbacks,
};
use prmon_workload::simulator::WorkloadSimulation;

const LOG_FILE_MAX_BYTES: usize = 10 * 1024 * 1024;
const LOG_FILES_KEPT: usize = 5;

/// prmon workload generator
#[derive(Parser)]
struct Args {
    /// Total number of time samples
    #[clap(long, default_value_t = 1000)]
    samples: u64,
    /// Fraction of anomaly samples
    #[clap(long, default_value_t = 0.05)]
    rate: f64,
}

fn init_logger(logs_filepath: Option<&Path>) {
    // log level INFO by default
    let mut env_logger_builder = env_logger::builder();
    if env::var("RUST_LOG").is_err() {
        env_logger_builder.filter_level(log::LevelFilter::Info);
    }
    if let Some(path) = logs_filepath {
        let log_file = FileRotate::new(
            path,
            AppendCount::new(LOG_FILES_KEPT),
            ContentLimit::Bytes(LOG_FILE_MAX_BYTES),
            Compression::None,
            #[cfg(unix)]
            None,
        );
        env_logger_builder.target(env_logger::Target::Pipe(Box::new(log_file)));
    }
    env_logger_builder.init();
}

/// SIGINT and SIGTERM listeners. Handlers are installed in `register`, so a signal delivered
/// any time after that is buffered until `recv` is polled instead of killing the process.
#[cfg(unix)]
struct ShutdownSignals {
    interrupt: Signal,
    terminate: Signal,
}

#[cfg(unix)]
impl ShutdownSignals {
    fn register() -> io::Result<Self> {
        Ok(Self {
            interrupt: signal(SignalKind::interrupt())?,
            terminate: signal(SignalKind::terminate())?,
        })
    }

    /// Completes on the first SIGINT or SIGTERM.
    async fn recv(mut self) {
        tokio::select! {
            _ = self.interrupt.recv() => info!("Received SIGINT"),
            _ = self.terminate.recv() => info!("Received SIGTERM"),
        }
    }
}

#[cfg(windows)]
struct ShutdownSignals {
    ctrl_c: tokio::signal::windows::CtrlC,
}

#[cfg(windows)]
impl ShutdownSignals {
    fn register() -> io::Result<Self> {
        Ok(Self {
            ctrl_c: tokio::signal::windows::ctrl_c()?,
        })
    }

    async fn recv(mut self) {
        self.ctrl_c.recv().await;
        info!("Received ctrl_c");
    }
}

async fn run(args: Args, config: WorkloadConfig) -> anyhow::Result<()> {
    // Before any child is spawned, so an early signal still reaches the background cleanup.
    let shutdown = ShutdownSignals::register().context("could not register signal handlers")?;

    let mut callbacks = CallbacksChain::new();
    if let Some(path) = &config.tick_trace_filepath {
        callbacks.push(Box::new(TickTraceCallbacks::create(path)?));
    }
    if let Some(printer_config) = &config.metrics_printer {
        callbacks.push(Box::new(MetricsPrinterCallbacks::new(printer_config.clone())));
    }

    let mut simulation = WorkloadSimulation::new(
        config,
        args.samples,
        args.rate,
        Box::new(ChildProcessLauncher::new()),
    )?;

    let schedule = simulation.initialize()?;
    println!("{}", schedule.len());
    println!("Anomaly start times: {:?}", schedule.start_ticks());

    simulation
        .run_with_callbacks(&mut callbacks, shutdown.recv())
        .await?;

    println!("Workload finished.");
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = WorkloadConfig::from_env().context("could not load workload config")?;
    init_logger(config.logs_filepath.as_deref());
    if let Some(path) = env::var_os(CONFIG_PATH_ENV) {
        info!("Path to config file: {:?}", path);
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("could not build tokio runtime")?;
    runtime.block_on(run(args, config))
}

#[cfg(all(test, unix))]
mod tests {
    use std::process::Command;
    use std::time::Duration;

    use super::ShutdownSignals;

    #[tokio::test]
    async fn test_signal_before_first_poll_is_not_lost() {
        let shutdown = ShutdownSignals::register().unwrap();

        // Delivered while nothing awaits `recv` yet, like a signal during the first tick.
        let pid = std::process::id().to_string();
        let status = Command::new("kill")
            .arg("-TERM")
            .arg(&pid)
            .status()
            .unwrap();
        assert!(status.success());

        tokio::time::timeout(Duration::from_secs(5), shutdown.recv())
            .await
            .expect("buffered SIGTERM should complete shutdown");
    }
}
