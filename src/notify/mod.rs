//! Push notification delivery and the one-shot notification lock.
//!
//! Notifications are best-effort: delivery failures are reported but never
//! propagated, and the response is not inspected. The lock file guarantees
//! at most one notification per contiguous drained period.

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

const NTFY_HOST: &str = "https://ntfy.sh";

const HTTP_CONNECT_TIMEOUT_SECS: u64 = 10;
const HTTP_REQUEST_TIMEOUT_SECS: u64 = 30;

pub trait Notifier {
    /// Deliver a notification. Fire-and-forget: implementations must not
    /// fail the monitor loop.
    fn send(&self, topic: &str, title: &str, body: &str);
}

/// Notifier posting to `https://ntfy.sh/<topic>` with a title header and a
/// plain-text body.
pub struct NtfyNotifier {
    client: Client,
}

impl NtfyNotifier {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(HTTP_CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(HTTP_REQUEST_TIMEOUT_SECS))
            .user_agent("vigil")
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }
}

impl Notifier for NtfyNotifier {
    fn send(&self, topic: &str, title: &str, body: &str) {
        let url = format!("{NTFY_HOST}/{topic}");
        debug!(%url, "sending notification");

        let result = self
            .client
            .post(&url)
            .header("Title", title)
            .body(body.to_string())
            .send();

        if let Err(e) = result {
            warn!("notification delivery failed: {e}");
            eprintln!("Notification to '{topic}' failed: {e}");
        }
    }
}

/// On-disk flag meaning "a completion notification has already been sent
/// for the current drained state".
pub struct NotificationLock {
    path: PathBuf,
}

impl NotificationLock {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_set(&self) -> bool {
        self.path.exists()
    }

    pub fn set(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create lock directory: {}", parent.display())
            })?;
        }

        fs::write(&self.path, b"")
            .with_context(|| format!("Failed to create lock file: {}", self.path.display()))
    }

    /// Remove the lock. Missing file is not an error.
    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| {
                format!("Failed to remove lock file: {}", self.path.display())
            }),
        }
    }
}
