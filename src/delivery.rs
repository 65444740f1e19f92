//! Webhook delivery of the rendered newsletter with exponential backoff.
//!
//! The finished document is POSTed as `{"html": "<document>"}` to a
//! configured endpoint, typically an automation hook that forwards it as an
//! email.
//!
//! # Architecture
//!
//! - [`Deliver`]: core trait for sending a document somewhere
//! - [`WebhookClient`]: `reqwest`-backed JSON POST
//! - [`RetryDeliver`]: decorator that adds retries to any [`Deliver`]
//!
//! # Retry Strategy
//!
//! - Maximum 3 retry attempts
//! - Exponential backoff starting at 1 second
//! - Maximum delay capped at 30 seconds
//! - Random jitter (0-250ms) added to each delay

use crate::utils::truncate_for_log;
use rand::{Rng, rng};
use serde::Serialize;
use std::error::Error;
use std::fmt;
use std::time::{Duration as StdDuration, Instant};
use tokio::time::sleep;
use tracing::{error, info, instrument, warn};
use url::Url;

/// Per-request timeout for the webhook POST.
pub const REQUEST_TIMEOUT: StdDuration = StdDuration::from_secs(30);
const MAX_RETRIES: usize = 3;

/// Something that accepts a finished newsletter.
pub trait Deliver {
    /// Send the document.
    async fn deliver(&self, html: &str) -> Result<(), Box<dyn Error>>;
}

#[derive(Serialize)]
struct WebhookPayload<'a> {
    html: &'a str,
}

/// Error for a webhook that answered with a non-success status.
#[derive(Debug)]
pub struct RejectedDelivery {
    pub status: reqwest::StatusCode,
    pub body_preview: String,
}

impl fmt::Display for RejectedDelivery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "webhook answered {}: {}", self.status, self.body_preview)
    }
}

impl Error for RejectedDelivery {}

/// POSTs the document as JSON to a fixed URL.
#[derive(Debug)]
pub struct WebhookClient {
    client: reqwest::Client,
    url: Url,
}

impl WebhookClient {
    /// Build a client for `url`.
    ///
    /// # Errors
    ///
    /// Fails if `url` is not an absolute http(s) URL or the HTTP client
    /// cannot be constructed.
    pub fn new(url: &str) -> Result<Self, Box<dyn Error>> {
        let url = Url::parse(url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(format!("unsupported webhook scheme: {}", url.scheme()).into());
        }
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { client, url })
    }
}

impl Deliver for WebhookClient {
    #[instrument(level = "info", skip_all, fields(url = %self.url.host_str().unwrap_or_default()))]
    async fn deliver(&self, html: &str) -> Result<(), Box<dyn Error>> {
        let t0 = Instant::now();
        let response = self
            .client
            .post(self.url.clone())
            .json(&WebhookPayload { html })
            .send()
            .await?;
        let status = response.status();
        let dt = t0.elapsed();

        if status.is_success() {
            info!(%status, elapsed_ms = dt.as_millis() as u128, "Webhook accepted newsletter");
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        warn!(%status, elapsed_ms = dt.as_millis() as u128, "Webhook rejected newsletter");
        Err(Box::new(RejectedDelivery {
            status,
            body_preview: truncate_for_log(&body, 200),
        }))
    }
}

/// Wrapper that adds exponential backoff retry logic to any [`Deliver`].
///
/// ```text
/// delay = min(base_delay * 2^(attempt-1), max_delay) + random_jitter(0..250ms)
/// ```
pub struct RetryDeliver<T> {
    inner: T,
    max_retries: usize,
    base_delay: StdDuration,
    max_delay: StdDuration,
}

impl<T> RetryDeliver<T>
where
    T: Deliver,
{
    /// Wrap `inner`, retrying up to `max_retries` times after the first try.
    pub fn new(inner: T, max_retries: usize, base_delay: StdDuration) -> Self {
        Self {
            inner,
            max_retries,
            base_delay,
            max_delay: StdDuration::from_secs(30),
        }
    }
}

impl<T> fmt::Debug for RetryDeliver<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryDeliver")
            .field("max_retries", &self.max_retries)
            .field("base_delay", &self.base_delay)
            .field("max_delay", &self.max_delay)
            .finish()
    }
}

impl<T> Deliver for RetryDeliver<T>
where
    T: Deliver,
{
    #[instrument(level = "info", skip_all)]
    async fn deliver(&self, html: &str) -> Result<(), Box<dyn Error>> {
        let total_t0 = Instant::now();
        let mut attempt = 0usize;

        loop {
            match self.inner.deliver(html).await {
                Ok(()) => return Ok(()),
                Err(e) => {
                    attempt += 1;
                    let total_dt = total_t0.elapsed();

                    if attempt > self.max_retries {
                        error!(
                            attempt,
                            max = self.max_retries,
                            elapsed_ms_total = total_dt.as_millis() as u128,
                            error = %e,
                            "deliver() exhausted retries"
                        );
                        return Err(e);
                    }

                    let mut delay = self.base_delay.saturating_mul(1 << (attempt - 1));
                    if delay > self.max_delay {
                        delay = self.max_delay;
                    }
                    let jitter_ms: u64 = rng().random_range(0..=250);
                    let delay = delay + StdDuration::from_millis(jitter_ms);

                    warn!(
                        attempt,
                        max = self.max_retries,
                        elapsed_ms_total = total_dt.as_millis() as u128,
                        ?delay,
                        error = %e,
                        "deliver() attempt failed; backing off"
                    );
                    sleep(delay).await;
                }
            }
        }
    }
}

/// Deliver `html` to `webhook_url` with retries.
///
/// This is the entry point used by the binary.
#[instrument(level = "info", skip_all)]
pub async fn deliver_with_backoff(webhook_url: &str, html: &str) -> Result<(), Box<dyn Error>> {
    let t0 = Instant::now();
    let client = WebhookClient::new(webhook_url)?;
    let api = RetryDeliver::new(client, MAX_RETRIES, StdDuration::from_secs(1));
    let res = api.deliver(html).await;
    let dt = t0.elapsed();

    match &res {
        Ok(()) => info!(
            elapsed_ms_total = dt.as_millis() as u128,
            "deliver_with_backoff succeeded"
        ),
        Err(e) => {
            error!(elapsed_ms_total = dt.as_millis() as u128, error = %e, "deliver_with_backoff failed")
        }
    }
    res
}
