//! External queue CLI invocation.
//!
//! The `QueueSource` trait is the seam between the monitor loop and the
//! real subprocess calls, so tests can drive the loop with canned output.

use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;
use tracing::debug;

/// Binary the queue system is reached through.
pub const QUEUE_BIN: &str = "dvc";

#[derive(Debug, Error)]
pub enum QueueError {
    /// The status query itself failed. Fatal: without it there is nothing
    /// to monitor.
    #[error("queue status query failed: {0}")]
    Status(String),

    /// A per-job log fetch failed. Recoverable: the job's row is skipped
    /// for this cycle only.
    #[error("log query for '{name}' failed: {reason}")]
    Logs { name: String, reason: String },
}

pub trait QueueSource {
    /// Raw output of the queue status query.
    fn status(&self) -> Result<String, QueueError>;

    /// Raw log output for a single job, possibly empty.
    fn logs(&self, job_name: &str) -> Result<String, QueueError>;
}

/// Real queue source backed by the `dvc queue` subcommands, run from the
/// repository root.
pub struct DvcQueue {
    repo_root: PathBuf,
}

impl DvcQueue {
    pub fn new(repo_root: &Path) -> Self {
        Self {
            repo_root: repo_root.to_path_buf(),
        }
    }

    fn run(&self, args: &[&str]) -> Result<String, String> {
        debug!(?args, "invoking {QUEUE_BIN}");

        let output = Command::new(QUEUE_BIN)
            .args(args)
            .current_dir(&self.repo_root)
            .output()
            .map_err(|e| format!("failed to spawn {QUEUE_BIN}: {e}"))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(format!(
                "{QUEUE_BIN} exited with {}: {}",
                output.status,
                stderr.trim()
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl QueueSource for DvcQueue {
    fn status(&self) -> Result<String, QueueError> {
        self.run(&["queue", "status"]).map_err(QueueError::Status)
    }

    fn logs(&self, job_name: &str) -> Result<String, QueueError> {
        self.run(&["queue", "logs", job_name])
            .map_err(|reason| QueueError::Logs {
                name: job_name.to_string(),
                reason,
            })
    }
}
