//! Command-line interface definitions for Daily Game Digest.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Every flag is optional; unset flags fall back to the YAML config file and
//! then to built-in defaults (see [`crate::config`]).

use chrono::NaiveDate;
use clap::Parser;

/// Command-line arguments for the newsletter renderer.
///
/// # Examples
///
/// ```sh
/// # Render collected_articles.json into daily_newsletter.html
/// daily_game_digest
///
/// # Explicit paths and a frozen edition date
/// daily_game_digest -i ./data/articles.json -o ./out/news.html --date 2025-12-05
///
/// # Deliver the result to a webhook
/// daily_game_digest --webhook-url https://hooks.example.com/newsletter
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Path to the collected article snapshot (JSON)
    #[arg(short, long)]
    pub input: Option<String>,

    /// Path of the HTML newsletter to write
    #[arg(short, long)]
    pub output: Option<String>,

    /// Optional path to a config.yaml file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Edition date (YYYY-MM-DD); defaults to today in Korea Standard Time
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Webhook that receives the rendered HTML as JSON
    #[arg(long, env = "WEBHOOK_URL")]
    pub webhook_url: Option<String>,

    /// Truncate hot-trend summaries to this many characters
    #[arg(long)]
    pub hot_summary_max_chars: Option<usize>,
}
