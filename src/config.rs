//! Runtime configuration.
//!
//! Settings are layered, highest priority first:
//!
//! 1. Command-line flags and their environment variables ([`crate::cli::Cli`])
//! 2. An optional YAML file given with `--config`
//! 3. Built-in defaults
//!
//! # Example
//!
//! ```yaml
//! input: ./collected_articles.json
//! output: ./out/daily_newsletter.html
//! webhook_url: https://hooks.example.com/newsletter
//! masthead:
//!   title: Daily Game
//!   sources: "Sources: IGN, GameSpot, Gamelook"
//! ```

use crate::cli::Cli;
use serde::Deserialize;
use std::error::Error;
use tokio::fs;
use tracing::{info, instrument};

/// Snapshot written by the collector when no path is given.
pub const DEFAULT_INPUT: &str = "collected_articles.json";
/// Newsletter written when no path is given.
pub const DEFAULT_OUTPUT: &str = "daily_newsletter.html";

/// Effective settings for one run.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Path of the collected article snapshot.
    pub input: String,
    /// Path of the rendered HTML document.
    pub output: String,
    /// Endpoint that receives the finished document, if any.
    pub webhook_url: Option<String>,
    /// Cap for hot-trend summaries. Unset keeps the full summary.
    pub hot_summary_max_chars: Option<usize>,
    /// Fixed header and footer text.
    pub masthead: Masthead,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            input: DEFAULT_INPUT.to_string(),
            output: DEFAULT_OUTPUT.to_string(),
            webhook_url: None,
            hot_summary_max_chars: None,
            masthead: Masthead::default(),
        }
    }
}

/// Branding shown in the document header and footer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Masthead {
    /// Large header title.
    pub title: String,
    /// Italic line under the edition date.
    pub tagline: String,
    /// Footer line crediting the sources.
    pub sources: String,
    /// Name after the copyright sign.
    pub publisher: String,
}

impl Default for Masthead {
    fn default() -> Self {
        Masthead {
            title: "Daily Game".to_string(),
            tagline: "새 아웃룩 또는 모바일 보기에 최적화 되어 있습니다.".to_string(),
            sources: "Sources: IGN, GameSpot, Gamelook".to_string(),
            publisher: "Daily Game Report".to_string(),
        }
    }
}

impl Config {
    /// Parse a YAML document; missing keys keep their defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Overlay the flags that were given on the command line.
    pub fn with_cli(mut self, cli: &Cli) -> Self {
        if let Some(input) = &cli.input {
            self.input = input.clone();
        }
        if let Some(output) = &cli.output {
            self.output = output.clone();
        }
        if let Some(url) = &cli.webhook_url {
            self.webhook_url = Some(url.clone());
        }
        if let Some(max) = cli.hot_summary_max_chars {
            self.hot_summary_max_chars = Some(max);
        }
        self
    }
}

/// Resolve the effective configuration for this run.
///
/// # Errors
///
/// Fails if `--config` names a file that cannot be read or parsed. Without
/// `--config` this never fails.
#[instrument(level = "info", skip_all, fields(config = ?cli.config))]
pub async fn load(cli: &Cli) -> Result<Config, Box<dyn Error>> {
    let base = match &cli.config {
        Some(path) => {
            let yaml = fs::read_to_string(path).await?;
            let config = Config::from_yaml(&yaml)?;
            info!(%path, "Loaded configuration file");
            config
        }
        None => Config::default(),
    };
    Ok(base.with_cli(cli))
}
