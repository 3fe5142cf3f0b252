//! Scoped ownership of the background load process.

use log::info;

use crate::launcher::interface::BackgroundProcess;

/// Terminates the held process on `release()` or, failing that, when dropped. Either way the
/// process is terminated exactly once.
pub struct BackgroundGuard {
    process: Option<Box<dyn BackgroundProcess>>,
}

impl BackgroundGuard {
    pub fn new(process: Box<dyn BackgroundProcess>) -> Self {
        Self {
            process: Some(process),
        }
    }

    pub fn is_released(&self) -> bool {
        self.process.is_none()
    }

    pub fn release(&mut self) {
        if let Some(mut process) = self.process.take() {
            process.terminate();
            info!("Background load terminated");
        }
    }
}

impl Drop for BackgroundGuard {
    fn drop(&mut self) {
        self.release();
    }
}
