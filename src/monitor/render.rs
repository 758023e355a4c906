//! Terminal rendering for the status summary and log tails.

use colored::Colorize;

use crate::queue::source::QueueError;
use crate::queue::{JobState, QueueSnapshot, StateCounts};
use crate::utils::truncate;

/// Substring marking a log line as progress output (iteration-rate style).
pub const PROGRESS_INDICATOR: &str = "it/s";

fn timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

pub fn render_empty() {
    println!("{}  {}", timestamp().bold(), "Queue is empty.".dimmed());
}

pub fn render_header(counts: &StateCounts) {
    println!(
        "\n{}  {}",
        timestamp().bold(),
        format!("{} job(s)", counts.total()).dimmed()
    );
    println!(
        "  {}  {}  {}  {}",
        format!("✓ Success {}", counts.success).green(),
        format!("✗ Failed {}", counts.failed).red(),
        format!("▶ Running {}", counts.running).blue(),
        format!("○ Queued {}", counts.queued).cyan(),
    );
}

/// Print every non-running job, grouped by state.
pub fn render_settled_jobs(snapshot: &QueueSnapshot) {
    let groups = [
        (JobState::Success, "✓"),
        (JobState::Failed, "✗"),
        (JobState::Queued, "○"),
    ];

    let max_name_len = snapshot
        .jobs
        .iter()
        .map(|j| j.name.len())
        .max()
        .unwrap_or(0);

    for (state, icon) in groups {
        for job in snapshot.settled_jobs().filter(|j| j.state == state) {
            let padded = format!("{:width$}", job.name, width = max_name_len);
            let label = format!("{icon} {state}");
            let colored_label = match state {
                JobState::Success => label.green(),
                JobState::Failed => label.red(),
                JobState::Queued => label.cyan(),
                JobState::Running => label.blue(),
            };
            println!("  {}  {colored_label}", padded.dimmed());
        }
    }
}

/// Pick the line to display for a running job: the last progress line if
/// any, else the last non-empty line.
pub fn select_tail_line(logs: &str) -> Option<&str> {
    let lines: Vec<&str> = logs.lines().filter(|l| !l.trim().is_empty()).collect();

    lines
        .iter()
        .rev()
        .find(|l| l.contains(PROGRESS_INDICATOR))
        .or_else(|| lines.last())
        .copied()
}

pub fn render_log_tail(job_name: &str, logs: &str, display_width: usize) {
    match select_tail_line(logs) {
        Some(line) => println!(
            "  {}  {}",
            format!("▶ {job_name}").blue(),
            truncate(line.trim(), display_width).dimmed()
        ),
        None => println!(
            "  {}  {}",
            format!("▶ {job_name}").blue(),
            "(no log output yet)".dimmed()
        ),
    }
}

pub fn render_log_error(job_name: &str, err: &QueueError) {
    println!(
        "  {}  {}",
        format!("▶ {job_name}").blue(),
        format!("(logs unavailable: {err})").yellow()
    );
}
