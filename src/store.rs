//! Loading the run snapshot written by the collector.
//!
//! A missing or unreadable file is not an error: the run continues with an
//! empty snapshot and produces a header-and-footer-only newsletter. Only a
//! file whose top-level shape is wrong fails the load.

use crate::models::RunSnapshot;
use crate::utils::{looks_truncated, truncate_for_log};
use std::error::Error;
use tokio::fs;
use tracing::{error, info, instrument, warn};

/// Parse snapshot JSON in either accepted shape.
pub fn parse_snapshot(raw: &str) -> Result<RunSnapshot, serde_json::Error> {
    serde_json::from_str(raw)
}

/// Read and parse the snapshot at `path`.
///
/// # Errors
///
/// Returns an error only when the file exists but is not a snapshot (neither
/// an article array nor an object with `articles`).
#[instrument(level = "info", skip_all, fields(%path))]
pub async fn load_snapshot(path: &str) -> Result<RunSnapshot, Box<dyn Error>> {
    let raw = match fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) => {
            warn!(error = %e, "Snapshot unavailable; continuing with no articles");
            return Ok(RunSnapshot::default());
        }
    };

    match parse_snapshot(&raw) {
        Ok(snapshot) => {
            info!(
                articles = snapshot.articles.len(),
                has_digest = !snapshot.daily_summary.trim().is_empty(),
                "Loaded snapshot"
            );
            Ok(snapshot)
        }
        Err(e) => {
            if looks_truncated(&e) {
                error!(error = %e, "Snapshot JSON ends early; was the collector interrupted?");
            } else {
                error!(
                    error = %e,
                    preview = %truncate_for_log(&raw, 200),
                    "Snapshot has an unexpected shape"
                );
            }
            Err(e.into())
        }
    }
}
