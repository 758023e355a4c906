//! Workspace discovery and startup environment checks.

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

use crate::queue::source::QUEUE_BIN;

/// Directory whose presence marks a workspace initialized for the queue
/// system, and anchors the repository root.
pub const MARKER_DIR: &str = ".dvc";

const LOCK_SUBDIR: &str = "tmp";
const LOCK_FILE: &str = "vigil.notified";

/// Walk up from `start` looking for the marker directory.
pub fn find_repo_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(MARKER_DIR).is_dir())
        .map(|dir| dir.to_path_buf())
}

/// Resolve the repository root from the current working directory.
pub fn detect_repo_root() -> Result<PathBuf> {
    let cwd = std::env::current_dir().context("Failed to read current directory")?;

    match find_repo_root(&cwd) {
        Some(root) => Ok(root),
        None => bail!(
            "No {MARKER_DIR} directory found here or in any parent. \
             Run vigil inside an initialized repository."
        ),
    }
}

/// Verify the queue CLI is reachable before entering the loop.
pub fn check_queue_cli() -> Result<()> {
    if which::which(QUEUE_BIN).is_err() {
        bail!("'{QUEUE_BIN}' not found on PATH. Install it before running vigil.");
    }
    Ok(())
}

/// Path of the notification lock file inside the marker directory.
pub fn lock_path(repo_root: &Path) -> PathBuf {
    repo_root.join(MARKER_DIR).join(LOCK_SUBDIR).join(LOCK_FILE)
}
