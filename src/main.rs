//! # Daily Game Digest
//!
//! Turns a snapshot of collected, translated and scored game-industry
//! articles into a single email-client compatible HTML newsletter.
//!
//! ## Features
//!
//! - Selects newsletter-worthy articles by relevance and importance scores
//! - Ranks the most-commented articles into a HOT TREND section
//! - Groups the rest into six fixed category sections
//! - Renders every section twice: table markup for Word-based Outlook and
//!   flexbox markup for modern clients
//! - Optionally delivers the result to a webhook
//!
//! ## Usage
//!
//! ```sh
//! daily_game_digest -i collected_articles.json -o daily_newsletter.html
//! ```
//!
//! ## Architecture
//!
//! The application is a single linear pass:
//! 1. **Load**: read the collector's snapshot (missing file = no articles)
//! 2. **Curate**: filter, rank hot trends, partition by category
//! 3. **Render**: assemble the HTML document for today's edition
//! 4. **Output**: write the file, then optionally POST it to a webhook

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod curation;
mod delivery;
mod models;
mod outputs;
mod store;
mod text;
mod utils;

use cli::Cli;
use models::Edition;
use outputs::document::{RenderOptions, assemble};
use outputs::html::write_newsletter;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("daily_game_digest starting up");

    // Parse CLI
    let args = Cli::parse();
    debug!(?args.input, ?args.output, ?args.config, ?args.date, "Parsed CLI arguments");

    let config = config::load(&args).await?;
    info!(
        input = %config.input,
        output = %config.output,
        webhook = config.webhook_url.is_some(),
        "Resolved configuration"
    );

    // ---- Load snapshot ----
    let snapshot = store::load_snapshot(&config.input).await?;

    // ---- Edition clock ----
    let edition = match args.date {
        Some(date) => Edition::for_date(date),
        None => Edition::today(),
    };
    info!(date = %edition.date, weekday = %edition.weekday, "Edition initialized");

    // ---- Render ----
    let options = RenderOptions::from(&config);
    let html = assemble(&snapshot, &edition, &options);

    // ---- Output ----
    write_newsletter(&html, &config.output).await?;

    // ---- Delivery ----
    if let Some(url) = &config.webhook_url {
        if let Err(e) = delivery::deliver_with_backoff(url, &html).await {
            error!(error = %e, "Webhook delivery failed; newsletter is still on disk");
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        articles = snapshot.articles.len(),
        bytes = html.len(),
        "Execution complete"
    );

    Ok(())
}
