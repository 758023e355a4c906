//! vigil: live terminal monitor for a DVC-style experiment queue.
//!
//! Polls the external queue CLI, renders a summary of job states, tails
//! running-job logs, and fires a one-shot push notification when a batch
//! of queued work drains to completion.

pub mod fs;
pub mod monitor;
pub mod notify;
pub mod queue;
pub mod utils;
