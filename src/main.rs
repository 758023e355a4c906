use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use std::process::exit;
use std::time::Duration;

use vigil::fs::{check_queue_cli, detect_repo_root};
use vigil::monitor::{Monitor, MonitorConfig, DEFAULT_INTERVAL_SECS};
use vigil::notify::NtfyNotifier;
use vigil::queue::source::DvcQueue;

#[derive(Parser)]
#[command(name = "vigil")]
#[command(about = "Live terminal monitor for the experiment queue", long_about = None)]
struct Cli {
    /// Poll interval in seconds
    #[arg(short = 'n', long, default_value_t = DEFAULT_INTERVAL_SECS)]
    interval: u64,

    /// ntfy.sh topic for the queue-drained notification (disabled when unset)
    #[arg(short, long)]
    topic: Option<String>,
}

fn main() {
    // Every exit path other than the (endless) loop is an error, including
    // help and unknown flags.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            exit(1);
        }
    };

    if let Err(err) = run(cli) {
        eprintln!("{} {err:#}", "Error:".red().bold());
        exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    check_queue_cli()?;
    let repo_root = detect_repo_root()?;

    let config = MonitorConfig::new(
        repo_root.clone(),
        cli.topic,
        Duration::from_secs(cli.interval),
    );
    let source = DvcQueue::new(&repo_root);
    let notifier = NtfyNotifier::new()?;

    Monitor::new(config, source, notifier).run()
}
