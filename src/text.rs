//! Text-safety helpers shared by every renderer.
//!
//! All functions here are pure and never fail: malformed input degrades to
//! a safe default (empty string, or the original text unchanged) so that a
//! single bad article cannot abort a run.
//!
//! - [`escape`]: HTML entity escaping in a fixed replacement order
//! - [`format_date`]: `YYYY-MM-DD HH:MM` to `MM.DD`
//! - [`truncate`]: character-bounded summary truncation
//! - [`first_sentence`]: first-sentence extraction for list layouts
//! - [`parse_digest_bullets`]: bullet-line extraction for the daily digest

use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::Regex;

/// Marker appended whenever text is shortened.
pub const ELLIPSIS: &str = "...";

/// Length of the fallback excerpt when no sentence delimiter is found.
const FIRST_SENTENCE_FALLBACK_CHARS: usize = 100;

/// Sentence delimiters, checked in priority order (not by position).
const SENTENCE_DELIMITERS: [&str; 6] = [". ", "! ", "? ", "。", "！", "？"];

/// Leading bullet marker plus any separators that follow it.
static BULLET_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[•\-*\s]+").unwrap());

/// Escape the five HTML-significant characters.
///
/// Replacements run in a fixed order with `&` first, so entities produced by
/// later replacements are not escaped again. Consequently escaping is not
/// idempotent for text containing `&`: `escape("&")` is `&amp;` but
/// `escape("&amp;")` is `&amp;amp;`.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(escape("<b>\"Tom\" & 'Jerry'</b>"),
///     "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;");
/// ```
pub fn escape(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Reformat a `YYYY-MM-DD HH:MM` timestamp as `MM.DD`.
///
/// Anything that does not parse is returned unchanged.
pub fn format_date(date: &str) -> String {
    match NaiveDateTime::parse_from_str(date, "%Y-%m-%d %H:%M") {
        Ok(dt) => dt.format("%m.%d").to_string(),
        Err(_) => date.to_string(),
    }
}

/// Shorten `text` to at most `max_chars` characters plus [`ELLIPSIS`].
///
/// Summaries conventionally use a limit of 200.
///
/// Length is counted in characters, not bytes, so multi-byte text is never
/// split inside a code point.
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars).collect();
    out.push_str(ELLIPSIS);
    out
}

/// Extract the first sentence of a summary.
///
/// Delimiters are tried in priority order: `". "`, `"! "`, `"? "`, then the
/// full-width `。`, `！`, `？`. The first delimiter present wins even if a
/// lower-priority one occurs earlier. The result keeps the delimiter minus
/// its trailing space. Without any delimiter the first 100 characters are
/// returned, with [`ELLIPSIS`] only when something was cut.
pub fn first_sentence(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    for delimiter in SENTENCE_DELIMITERS {
        if let Some(pos) = text.find(delimiter) {
            return format!("{}{}", &text[..pos], delimiter.trim_end());
        }
    }
    let mut head: String = text.chars().take(FIRST_SENTENCE_FALLBACK_CHARS).collect();
    if text.chars().count() > FIRST_SENTENCE_FALLBACK_CHARS {
        head.push_str(ELLIPSIS);
    }
    head
}

/// Extract bullet lines from the free-text daily digest.
///
/// A line is a bullet when, after trimming, it starts with `•`, `-` or `*`.
/// The marker and any separators right after it are removed. Other lines are
/// dropped, as are bullets with nothing left after the marker.
pub fn parse_digest_bullets(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| line.starts_with(['•', '-', '*']))
        .map(|line| BULLET_PREFIX.replace(line, "").trim().to_string())
        .filter(|bullet| !bullet.is_empty())
        .collect()
}
