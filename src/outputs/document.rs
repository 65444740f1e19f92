//! Document assembly: header, digest, hot trend, categories, footer.
//!
//! [`assemble`] is a pure function of `(snapshot, edition, options)`. The
//! only clock-dependent value, the [`Edition`], is computed by the caller.

use crate::config::{Config, Masthead};
use crate::curation::{Curation, curate};
use crate::models::{Edition, RunSnapshot};
use crate::outputs::layout::MODERN_FONT;
use crate::outputs::sections::{
    SummaryPolicy, category_section, digest_section, divider, hot_trend_section,
};
use crate::text::escape;
use tracing::{info, instrument};

/// Knobs that change rendering but not curation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Summary length for hot-trend cards.
    pub hot_summary: SummaryPolicy,
    pub masthead: Masthead,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            hot_summary: SummaryPolicy::Full,
            masthead: Masthead::default(),
        }
    }
}

impl From<&Config> for RenderOptions {
    fn from(config: &Config) -> Self {
        RenderOptions {
            hot_summary: config
                .hot_summary_max_chars
                .map_or(SummaryPolicy::Full, SummaryPolicy::Truncated),
            masthead: config.masthead.clone(),
        }
    }
}

/// Curate `snapshot` and render the complete newsletter.
#[instrument(level = "info", skip_all, fields(date = %edition.date))]
pub fn assemble(snapshot: &RunSnapshot, edition: &Edition, options: &RenderOptions) -> String {
    let curation = curate(snapshot);
    info!(
        total = snapshot.articles.len(),
        eligible = curation.eligible,
        hot_candidates = curation.hot_candidates,
        hot = curation.hot.len(),
        placed = curation.categories.placed(),
        unrecognized = curation.categories.unrecognized().len(),
        "Curated articles"
    );
    render(&curation, &snapshot.daily_summary, edition, options)
}

/// Render an already curated edition.
pub fn render(
    curation: &Curation<'_>,
    daily_summary: &str,
    edition: &Edition,
    options: &RenderOptions,
) -> String {
    let mut body = header(edition, &options.masthead);
    body.push_str("\n<!-- Thick Divider -->");
    body.push_str(&divider(4, "#000000"));
    body.push_str(&digest_section(daily_summary));
    body.push_str(&hot_trend_section(&curation.hot, options.hot_summary));
    for (category, articles) in curation.categories.iter() {
        body.push_str(&category_section(category, articles));
    }
    body.push_str(&footer(edition, &options.masthead));
    page(&options.masthead, &body)
}

fn header(edition: &Edition, masthead: &Masthead) -> String {
    format!(
        r#"
<!-- Header -->
<tr>
<td class="mobile-padding" style="padding: 60px 50px 20px 50px;">
<table width="100%" cellpadding="0" cellspacing="0" border="0">
<tr>
<td align="left" style="padding-bottom: 8px;">
<font face="{MODERN_FONT}" style="font-size: 48px; font-weight: 900; color: #000000; letter-spacing: -2px; line-height: 1;">{title}</font>
</td>
</tr>
<tr>
<td align="left" style="padding-bottom: 12px;">
<font face="{MODERN_FONT}" style="font-size: 14px; font-weight: 400; color: #999999;">{date} — {weekday} Edition</font>
</td>
</tr>
<tr>
<td align="left">
<font face="{MODERN_FONT}" style="font-size: 12px; font-weight: 400; color: #666666; font-style: italic;">{tagline}</font>
</td>
</tr>
</table>
</td>
</tr>
"#,
        title = escape(&masthead.title),
        date = escape(&edition.date),
        weekday = escape(&edition.weekday),
        tagline = escape(&masthead.tagline),
    )
}

fn footer(edition: &Edition, masthead: &Masthead) -> String {
    format!(
        r#"
<!-- Footer -->
<tr>
<td class="mobile-padding" style="padding: 40px 50px 60px 50px; border-top: 4px solid #000000;">
<table width="100%" cellpadding="0" cellspacing="0" border="0">
<tr>
<td align="center" style="padding-bottom: 10px;">
<font face="{MODERN_FONT}" style="font-size: 11px; font-weight: 400; color: #999999; line-height: 1.6;">{sources}</font>
</td>
</tr>
<tr>
<td align="center">
<font face="{MODERN_FONT}" style="font-size: 10px; font-weight: 400; color: #cccccc;">© {year} {publisher}</font>
</td>
</tr>
</table>
</td>
</tr>
"#,
        sources = escape(&masthead.sources),
        year = edition.year,
        publisher = escape(&masthead.publisher),
    )
}

fn page(masthead: &Masthead, body: &str) -> String {
    format!(
        r##"<!DOCTYPE html>
<html lang="ko">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{title}</title>
<!--[if mso]>
<style type="text/css">
body, table, td, a {{ font-family: 'Malgun Gothic', Arial, sans-serif !important; }}
</style>
<![endif]-->
<style>
@media only screen and (max-width: 1000px) {{
.container {{ width: 100% !important; }}
.mobile-padding {{ padding-left: 20px !important; padding-right: 20px !important; }}
.two-col-left, .two-col-right {{ width: 100% !important; display: block !important; padding: 0 !important; margin-bottom: 20px !important; }}
.news-thumbnail {{ width: 120px !important; }}
div[style*="display: flex"] {{ display: block !important; }}
div[style*="flex: 1"] {{ width: 100% !important; margin-bottom: 20px !important; }}
}}
</style>
</head>
<body style="margin: 0; padding: 0; font-family: 'Malgun Gothic', '맑은 고딕', 'Apple SD Gothic Neo', Arial, sans-serif; background-color: #ffffff;">
<table width="100%" cellpadding="0" cellspacing="0" border="0" bgcolor="#ffffff">
<tr>
<td align="center" style="padding: 0;">
<!-- Main Container -->
<table class="container" width="1000" cellpadding="0" cellspacing="0" border="0" style="max-width: 1000px;">
{body}
</table>
</td>
</tr>
</table>
</body>
</html>
"##,
        title = escape(&masthead.title),
    )
}
