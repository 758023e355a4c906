//! Queue data model and status-output parsing.
//!
//! Parsing is a pure function over the raw status text so it can be tested
//! without spawning the external tool. The line grammar: a record line is
//! whitespace-delimited and ends in one of the four literal state tokens;
//! the job name is the second field (or the first, when the line has only
//! a name and a state). Everything else (headers, blank lines, decoration)
//! is ignored.

pub mod source;

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// Phrase the queue CLI prints when nothing is queued, running, or done.
pub const EMPTY_QUEUE_SENTINEL: &str = "No experiment tasks in the queue";

static RECORD_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\S+)(?:\s+(\S+))?(?:\s+\S+)*\s+(Queued|Running|Success|Failed)$")
        .expect("Invalid record regex")
});

/// The four states the queue CLI reports for a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobState {
    Queued,
    Running,
    Success,
    Failed,
}

impl JobState {
    fn from_token(token: &str) -> Option<Self> {
        match token {
            "Queued" => Some(JobState::Queued),
            "Running" => Some(JobState::Running),
            "Success" => Some(JobState::Success),
            "Failed" => Some(JobState::Failed),
            _ => None,
        }
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            JobState::Queued => "Queued",
            JobState::Running => "Running",
            JobState::Success => "Success",
            JobState::Failed => "Failed",
        };
        write!(f, "{label}")
    }
}

/// A single tracked experiment, recomputed from scratch every poll cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub name: String,
    pub state: JobState,
}

/// Per-state job counts for one snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StateCounts {
    pub queued: usize,
    pub running: usize,
    pub success: usize,
    pub failed: usize,
}

impl StateCounts {
    pub fn total(&self) -> usize {
        self.queued + self.running + self.success + self.failed
    }

    pub fn completed(&self) -> usize {
        self.success + self.failed
    }
}

/// Everything one poll observed: the jobs in output order plus derived counts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueueSnapshot {
    pub jobs: Vec<Job>,
    pub counts: StateCounts,
}

impl QueueSnapshot {
    /// Parse raw status output into a snapshot.
    ///
    /// Lines matching no state token are skipped, so headers and separator
    /// rows from the CLI fall out naturally.
    pub fn parse(raw: &str) -> Self {
        let mut snapshot = QueueSnapshot::default();

        for line in raw.lines() {
            if let Some(job) = parse_record(line.trim()) {
                match job.state {
                    JobState::Queued => snapshot.counts.queued += 1,
                    JobState::Running => snapshot.counts.running += 1,
                    JobState::Success => snapshot.counts.success += 1,
                    JobState::Failed => snapshot.counts.failed += 1,
                }
                snapshot.jobs.push(job);
            }
        }

        snapshot
    }

    /// No recognized records at all. Together with the sentinel phrase this
    /// is how an empty queue is detected.
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Nothing left Queued or Running.
    pub fn is_drained(&self) -> bool {
        self.counts.queued == 0 && self.counts.running == 0
    }

    pub fn running_jobs(&self) -> impl Iterator<Item = &Job> {
        self.jobs.iter().filter(|j| j.state == JobState::Running)
    }

    pub fn settled_jobs(&self) -> impl Iterator<Item = &Job> {
        self.jobs.iter().filter(|j| j.state != JobState::Running)
    }
}

/// Whether the raw output carries the CLI's empty-queue phrase.
pub fn contains_empty_sentinel(raw: &str) -> bool {
    raw.contains(EMPTY_QUEUE_SENTINEL)
}

fn parse_record(line: &str) -> Option<Job> {
    let captures = RECORD_PATTERN.captures(line)?;
    let state = JobState::from_token(captures.get(3)?.as_str())?;

    // Full records read `<task-id> <name> <created...> <state>`; a minimal
    // record is just `<name> <state>`.
    let name = captures
        .get(2)
        .or_else(|| captures.get(1))?
        .as_str()
        .to_string();

    Some(Job { name, state })
}
