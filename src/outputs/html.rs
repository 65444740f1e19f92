//! Writing the rendered newsletter to disk.

use crate::utils::ensure_parent_writable;
use std::error::Error;
use tokio::fs;
use tracing::{error, info, instrument};

/// Write the HTML document to `output_path` as UTF-8.
///
/// The parent directory is created and probed for writability first.
///
/// # Errors
///
/// Fails if the directory cannot be created or the file cannot be written.
#[instrument(level = "info", skip_all, fields(%output_path, bytes = html.len()))]
pub async fn write_newsletter(html: &str, output_path: &str) -> Result<(), Box<dyn Error>> {
    if let Err(e) = ensure_parent_writable(output_path).await {
        error!(error = %e, "Output directory is not writable (fix perms or choose a different path)");
        return Err(e);
    }

    info!("Writing HTML newsletter");
    fs::write(output_path, html).await?;
    info!("Wrote HTML newsletter");
    Ok(())
}
