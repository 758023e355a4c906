//! The poll/render/notify loop.
//!
//! One `cycle` queries the queue, renders a summary, and updates the
//! notification state; `run` repeats that forever with a blocking sleep.
//! The queue source and notification sink are injected so tests can drive
//! full cycles without subprocesses or network calls.

pub mod render;

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;
use tracing::debug;

use crate::notify::{NotificationLock, Notifier};
use crate::queue::source::QueueSource;
use crate::queue::{self, QueueSnapshot};

pub const DEFAULT_INTERVAL_SECS: u64 = 30;
pub const DEFAULT_DISPLAY_WIDTH: usize = 100;

/// Everything the loop needs, built once at startup. No ambient globals.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    pub repo_root: PathBuf,
    pub lock_path: PathBuf,
    /// Notification topic; `None` disables notifications entirely.
    pub topic: Option<String>,
    pub interval: Duration,
    pub display_width: usize,
}

impl MonitorConfig {
    pub fn new(repo_root: PathBuf, topic: Option<String>, interval: Duration) -> Self {
        let lock_path = crate::fs::lock_path(&repo_root);
        Self {
            repo_root,
            lock_path,
            topic,
            interval,
            display_width: DEFAULT_DISPLAY_WIDTH,
        }
    }
}

/// What one poll cycle observed. `snapshot` is `None` when the queue was
/// empty (sentinel phrase or zero parsed records).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub snapshot: Option<QueueSnapshot>,
    pub notified: bool,
}

pub struct Monitor<S: QueueSource, N: Notifier> {
    config: MonitorConfig,
    source: S,
    notifier: N,
    lock: NotificationLock,
}

impl<S: QueueSource, N: Notifier> Monitor<S, N> {
    pub fn new(config: MonitorConfig, source: S, notifier: N) -> Self {
        let lock = NotificationLock::new(&config.lock_path);
        Self {
            config,
            source,
            notifier,
            lock,
        }
    }

    /// Poll forever. Only a fatal status-query failure (or process kill)
    /// ends the loop.
    pub fn run(&self) -> Result<()> {
        // A lock left over from a previous run must not swallow the first
        // notification of this one.
        if self.config.topic.is_some() {
            self.lock.clear()?;
        }

        loop {
            self.cycle()?;
            thread::sleep(self.config.interval);
        }
    }

    /// Execute one poll cycle: query, render, update notification state.
    pub fn cycle(&self) -> Result<CycleReport> {
        let raw = self.source.status().context("Queue status query failed")?;

        let snapshot = QueueSnapshot::parse(&raw);
        if queue::contains_empty_sentinel(&raw) || snapshot.is_empty() {
            self.lock.clear()?;
            render::render_empty();
            return Ok(CycleReport {
                snapshot: None,
                notified: false,
            });
        }

        render::render_header(&snapshot.counts);
        render::render_settled_jobs(&snapshot);

        for job in snapshot.running_jobs() {
            match self.source.logs(&job.name) {
                Ok(logs) => render::render_log_tail(&job.name, &logs, self.config.display_width),
                Err(e) => render::render_log_error(&job.name, &e),
            }
        }

        let notified = self.update_notification_state(&snapshot)?;

        Ok(CycleReport {
            snapshot: Some(snapshot),
            notified,
        })
    }

    /// Fire the drained notification once per contiguous drained period.
    fn update_notification_state(&self, snapshot: &QueueSnapshot) -> Result<bool> {
        let Some(topic) = &self.config.topic else {
            return Ok(false);
        };

        let counts = &snapshot.counts;
        if snapshot.is_drained() && counts.completed() > 0 {
            if self.lock.is_set() {
                debug!("queue drained, notification already sent");
                return Ok(false);
            }

            let body = format!("Success: {}\nFailed: {}", counts.success, counts.failed);
            self.notifier.send(topic, "Experiment queue drained", &body);
            self.lock.set()?;
            return Ok(true);
        }

        // Queue moved again; allow the next drain to notify.
        self.lock.clear()?;
        Ok(false)
    }
}
