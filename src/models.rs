//! Data models for annotated articles and the run snapshot.
//!
//! This module defines the core data structures used throughout the application:
//! - [`ArticleRecord`]: one collected and annotated article
//! - [`RunSnapshot`]: the whole input of a run (digest text plus articles)
//! - [`Category`] / [`CategoryLabel`]: the closed section taxonomy
//! - [`Edition`]: run-scoped display metadata (date, weekday)
//!
//! The wire names follow the collector's JSON (`title_kr`, `comments`,
//! `game_relevance`, ...). Every article field is lenient: missing, `null` or
//! mistyped values fall back to an empty string or zero instead of failing
//! the whole snapshot.

use chrono::{Datelike, NaiveDate, Utc};
use chrono_tz::Asia::Seoul;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// One collected article, already translated, summarized and scored.
///
/// `url` is the identity of an article within a run; two records with the
/// same `url` are the same article.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ArticleRecord {
    /// Canonical article URL.
    #[serde(default, deserialize_with = "lenient_string")]
    pub url: String,
    /// Original (source-language) headline.
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    /// Translated headline.
    #[serde(rename = "title_kr", default, deserialize_with = "lenient_string")]
    pub title_localized: String,
    /// Translated summary.
    #[serde(rename = "content_summary_kr", default, deserialize_with = "lenient_string")]
    pub summary_localized: String,
    /// Raw category label as assigned upstream.
    #[serde(default, deserialize_with = "lenient_string")]
    pub category: String,
    /// Source outlet name, e.g. `IGN`.
    #[serde(default, deserialize_with = "lenient_string")]
    pub media: String,
    /// Publication timestamp, `YYYY-MM-DD HH:MM`.
    #[serde(rename = "date", default, deserialize_with = "lenient_string")]
    pub published_at: String,
    /// Number of reader comments; 0 when the source has none.
    #[serde(rename = "comments", default, deserialize_with = "lenient_count")]
    pub comment_count: u64,
    /// Thumbnail image URL, possibly empty.
    #[serde(rename = "thumbnail", default, deserialize_with = "lenient_string")]
    pub thumbnail_url: String,
    /// How related the article is to games, in `[0, 1]`.
    #[serde(rename = "game_relevance", default, deserialize_with = "lenient_score")]
    pub relevance_score: f64,
    /// Editorial importance, in `[0, 1]`.
    #[serde(rename = "importance", default, deserialize_with = "lenient_score")]
    pub importance_score: f64,
}

impl ArticleRecord {
    /// Headline to display: the translated title, or the original when the
    /// translation is empty.
    pub fn display_title(&self) -> &str {
        if self.title_localized.is_empty() {
            &self.title
        } else {
            &self.title_localized
        }
    }

    /// Link target; `#` when the record has no URL.
    pub fn href(&self) -> &str {
        if self.url.is_empty() { "#" } else { &self.url }
    }

    /// Classify the raw category label.
    pub fn category_label(&self) -> CategoryLabel {
        CategoryLabel::classify(&self.category)
    }
}

/// The input of one run: optional digest text plus the article list.
///
/// Two input shapes are accepted: the object form
/// `{"daily_summary": "...", "articles": [...]}` and a bare article array,
/// which is read as an empty digest. Array elements that are not objects
/// are skipped with a warning; only a wrong top-level shape fails the load.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "SnapshotShape")]
pub struct RunSnapshot {
    /// Free-text digest with bullet-style lines; may be empty.
    pub daily_summary: String,
    /// Articles in collector order.
    pub articles: Vec<ArticleRecord>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SnapshotShape {
    WithDigest {
        #[serde(default, alias = "dailyDigest", deserialize_with = "lenient_string")]
        daily_summary: String,
        articles: Vec<Value>,
    },
    Bare(Vec<Value>),
}

impl From<SnapshotShape> for RunSnapshot {
    fn from(shape: SnapshotShape) -> Self {
        match shape {
            SnapshotShape::WithDigest {
                daily_summary,
                articles,
            } => RunSnapshot {
                daily_summary,
                articles: lenient_articles(articles),
            },
            SnapshotShape::Bare(articles) => RunSnapshot {
                daily_summary: String::new(),
                articles: lenient_articles(articles),
            },
        }
    }
}

/// Keep every element that reads as an article, in input order.
fn lenient_articles(values: Vec<Value>) -> Vec<ArticleRecord> {
    values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| {
            if !value.is_object() {
                tracing::warn!(index, kind = json_kind(&value), "Skipping non-object article entry");
                return None;
            }
            match serde_json::from_value::<ArticleRecord>(value) {
                Ok(article) => Some(article),
                Err(e) => {
                    tracing::warn!(index, error = %e, "Skipping unreadable article entry");
                    None
                }
            }
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Which list layout a category section uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionLayout {
    /// Image-left cards with the first sentence of the summary.
    Thumbnail,
    /// Text-only rows separated by thin rules.
    Compact,
}

/// The six rendered newsletter categories, declared in render order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    RegulationIssues,
    NewReleases,
    RevenuePerformance,
    UpdatesPatches,
    IpCollaborations,
    CommunityEvents,
}

impl Category {
    /// All categories in the order their sections appear in the document.
    pub const ALL: [Category; 6] = [
        Category::RegulationIssues,
        Category::NewReleases,
        Category::RevenuePerformance,
        Category::UpdatesPatches,
        Category::IpCollaborations,
        Category::CommunityEvents,
    ];

    /// Label used by the annotation service (source locale).
    pub fn label(self) -> &'static str {
        match self {
            Category::RegulationIssues => "규제 & 이슈",
            Category::NewReleases => "게임 출시 & 발표",
            Category::RevenuePerformance => "매출 & 성과",
            Category::UpdatesPatches => "업데이트 & 패치",
            Category::IpCollaborations => "IP & 콜라보",
            Category::CommunityEvents => "커뮤니티 & 이벤트",
        }
    }

    /// English section heading.
    pub fn heading(self) -> &'static str {
        match self {
            Category::RegulationIssues => "REGULATION & ISSUES",
            Category::NewReleases => "NEW RELEASES",
            Category::RevenuePerformance => "REVENUE & PERFORMANCE",
            Category::UpdatesPatches => "UPDATES & PATCHES",
            Category::IpCollaborations => "IP & COLLABORATIONS",
            Category::CommunityEvents => "COMMUNITY & EVENTS",
        }
    }

    /// SVG path content for the 24x24 section icon.
    pub fn icon(self) -> &'static str {
        match self {
            Category::RegulationIssues => {
                r##"<path d="M12 2L2 7v10c0 5.55 3.84 10.74 9 12 5.16-1.26 9-6.45 9-12V7l-10-5z" fill="#000000"/>"##
            }
            Category::NewReleases => {
                r##"<path d="M12 2C6.48 2 2 6.48 2 12s4.48 10 10 10 10-4.48 10-10S17.52 2 12 2zm-2 15l-5-5 1.41-1.41L10 14.17l7.59-7.59L19 8l-9 9z" fill="#000000"/>"##
            }
            Category::RevenuePerformance => {
                r##"<path d="M16 6l2.29 2.29-4.88 4.88-4-4L2 16.59 3.41 18l6-6 4 4 6.3-6.29L22 12V6z" fill="#000000"/>"##
            }
            Category::UpdatesPatches => {
                r##"<path d="M17.65 6.35C16.2 4.9 14.21 4 12 4c-4.42 0-7.99 3.58-7.99 8s3.57 8 7.99 8c3.73 0 6.84-2.55 7.73-6h-2.08c-.82 2.33-3.04 4-5.65 4-3.31 0-6-2.69-6-6s2.69-6 6-6c1.66 0 3.14.69 4.22 1.78L13 11h7V4l-2.35 2.35z" fill="#000000"/>"##
            }
            Category::IpCollaborations => {
                r##"<path d="M16 11c1.66 0 2.99-1.34 2.99-3S17.66 5 16 5c-1.66 0-3 1.34-3 3s1.34 3 3 3zm-8 0c1.66 0 2.99-1.34 2.99-3S9.66 5 8 5C6.34 5 5 6.34 5 8s1.34 3 3 3zm0 2c-2.33 0-7 1.17-7 3.5V19h14v-2.5c0-2.33-4.67-3.5-7-3.5zm8 0c-.29 0-.62.02-.97.05 1.16.84 1.97 1.97 1.97 3.45V19h6v-2.5c0-2.33-4.67-3.5-7-3.5z" fill="#000000"/>"##
            }
            Category::CommunityEvents => {
                r##"<path d="M12 12c2.21 0 4-1.79 4-4s-1.79-4-4-4-4 1.79-4 4 1.79 4 4 4zm0 2c-2.67 0-8 1.34-8 4v2h16v-2c0-2.66-5.33-4-8-4z" fill="#000000"/>"##
            }
        }
    }

    /// List layout used for this category's section.
    pub fn layout(self) -> SectionLayout {
        match self {
            Category::RegulationIssues | Category::NewReleases => SectionLayout::Thumbnail,
            _ => SectionLayout::Compact,
        }
    }
}

/// Generic icon for labels outside the taxonomy.
pub const GENERIC_ICON: &str = r##"<circle cx="12" cy="12" r="8" fill="#000000"/>"##;

/// Outcome of classifying a raw category label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryLabel {
    Known(Category),
    /// Any other label, kept verbatim. Never rendered in a section.
    Unrecognized(String),
}

impl CategoryLabel {
    /// Match a raw label against the taxonomy.
    ///
    /// Surrounding whitespace is ignored. The English heading is accepted as
    /// an alias, case-insensitively.
    pub fn classify(raw: &str) -> Self {
        let trimmed = raw.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.label() == trimmed || c.heading().eq_ignore_ascii_case(trimmed))
            .map(CategoryLabel::Known)
            .unwrap_or_else(|| CategoryLabel::Unrecognized(trimmed.to_string()))
    }

    pub fn icon(&self) -> &'static str {
        match self {
            CategoryLabel::Known(category) => category.icon(),
            CategoryLabel::Unrecognized(_) => GENERIC_ICON,
        }
    }
}

/// Display metadata for one edition of the newsletter.
///
/// This is the only wall-clock dependent input of the renderer. It is built
/// once per run and passed in, so rendering stays a pure function of
/// `(snapshot, edition)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edition {
    /// Edition date as `YYYY.MM.DD`.
    pub date: String,
    /// English weekday name, e.g. `Friday`.
    pub weekday: String,
    /// Calendar year, used by the footer.
    pub year: i32,
}

impl Edition {
    /// Edition metadata for a fixed calendar date.
    pub fn for_date(date: NaiveDate) -> Self {
        Edition {
            date: date.format("%Y.%m.%d").to_string(),
            weekday: date.format("%A").to_string(),
            year: date.year(),
        }
    }

    /// Edition metadata for the current date in Korea Standard Time.
    pub fn today() -> Self {
        let now = Utc::now().with_timezone(&Seoul);
        tracing::debug!(%now, "Computed edition clock");
        Self::for_date(now.date_naive())
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    })
}

fn lenient_score<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let score = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    Ok(if score.is_finite() { score } else { 0.0 })
}

fn lenient_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f > 0.0).map(|f| f as u64))
            .unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse::<u64>().unwrap_or(0),
        _ => 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_json() -> &'static str {
        r#"{
            "url": "https://www.ign.com/articles/example",
            "title": "Example launches",
            "title_kr": "예시 게임 출시",
            "content_summary_kr": "예시 게임이 출시됨. 반응이 좋음.",
            "category": "게임 출시 & 발표",
            "media": "IGN",
            "date": "2025-12-05 14:30",
            "comments": 42,
            "thumbnail": "https://img.example/1.jpg",
            "game_relevance": 0.9,
            "importance": 0.7,
            "body": "ignored"
        }"#
    }

    #[test]
    fn test_article_deserialization() {
        let article: ArticleRecord = serde_json::from_str(record_json()).unwrap();
        assert_eq!(article.url, "https://www.ign.com/articles/example");
        assert_eq!(article.title_localized, "예시 게임 출시");
        assert_eq!(article.comment_count, 42);
        assert_eq!(article.relevance_score, 0.9);
        assert_eq!(article.importance_score, 0.7);
        assert_eq!(
            article.category_label(),
            CategoryLabel::Known(Category::NewReleases)
        );
    }

    #[test]
    fn test_article_missing_fields_default() {
        let article: ArticleRecord = serde_json::from_str(r#"{"url": "u"}"#).unwrap();
        assert_eq!(article.relevance_score, 0.0);
        assert_eq!(article.importance_score, 0.0);
        assert_eq!(article.comment_count, 0);
        assert_eq!(article.summary_localized, "");
        assert_eq!(article.published_at, "");
    }

    #[test]
    fn test_article_malformed_fields_degrade() {
        let article: ArticleRecord = serde_json::from_str(
            r#"{
                "url": "u",
                "title": null,
                "comments": "17",
                "game_relevance": "0.8",
                "importance": "high",
                "date": null,
                "thumbnail": 5
            }"#,
        )
        .unwrap();
        assert_eq!(article.title, "");
        assert_eq!(article.comment_count, 17);
        assert_eq!(article.relevance_score, 0.8);
        assert_eq!(article.importance_score, 0.0);
        assert_eq!(article.published_at, "");
        assert_eq!(article.thumbnail_url, "5");
    }

    #[test]
    fn test_negative_comment_count_is_zero() {
        let article: ArticleRecord =
            serde_json::from_str(r#"{"url": "u", "comments": -3}"#).unwrap();
        assert_eq!(article.comment_count, 0);
    }

    #[test]
    fn test_display_title_fallback() {
        let mut article = ArticleRecord {
            title: "Original".to_string(),
            ..Default::default()
        };
        assert_eq!(article.display_title(), "Original");
        article.title_localized = "번역".to_string();
        assert_eq!(article.display_title(), "번역");
    }

    #[test]
    fn test_href_fallback() {
        let article = ArticleRecord::default();
        assert_eq!(article.href(), "#");
    }

    #[test]
    fn test_snapshot_object_shape() {
        let json = format!(
            r#"{{"daily_summary": "• one\n• two", "articles": [{}]}}"#,
            record_json()
        );
        let snapshot: RunSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(snapshot.daily_summary, "• one\n• two");
        assert_eq!(snapshot.articles.len(), 1);
    }

    #[test]
    fn test_snapshot_camel_case_digest_alias() {
        let snapshot: RunSnapshot =
            serde_json::from_str(r#"{"dailyDigest": "- a", "articles": []}"#).unwrap();
        assert_eq!(snapshot.daily_summary, "- a");
    }

    #[test]
    fn test_snapshot_bare_array_shape() {
        let json = format!("[{}, {}]", record_json(), record_json());
        let snapshot: RunSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(snapshot.daily_summary, "");
        assert_eq!(snapshot.articles.len(), 2);
    }

    #[test]
    fn test_snapshot_skips_non_object_articles() {
        let json = format!("[{}, null, 7]", record_json());
        let snapshot: RunSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(snapshot.articles.len(), 1);
        assert_eq!(snapshot.articles[0].comment_count, 42);

        let snapshot: RunSnapshot = serde_json::from_str(
            r#"{"daily_summary": "", "articles": [{"url": "a"}, "oops", [], {"url": "b"}]}"#,
        )
        .unwrap();
        let urls: Vec<&str> = snapshot.articles.iter().map(|a| a.url.as_str()).collect();
        assert_eq!(urls, vec!["a", "b"]);
    }

    #[test]
    fn test_snapshot_malformed_shape() {
        assert!(serde_json::from_str::<RunSnapshot>("42").is_err());
        assert!(serde_json::from_str::<RunSnapshot>(r#"{"daily_summary": "x"}"#).is_err());
        assert!(serde_json::from_str::<RunSnapshot>(r#"{"articles": "none"}"#).is_err());
    }

    #[test]
    fn test_category_classification() {
        for category in Category::ALL {
            assert_eq!(
                CategoryLabel::classify(category.label()),
                CategoryLabel::Known(category)
            );
        }
        assert_eq!(
            CategoryLabel::classify("  매출 & 성과 "),
            CategoryLabel::Known(Category::RevenuePerformance)
        );
        assert_eq!(
            CategoryLabel::classify("new releases"),
            CategoryLabel::Known(Category::NewReleases)
        );
        assert_eq!(
            CategoryLabel::classify("기타"),
            CategoryLabel::Unrecognized("기타".to_string())
        );
        assert_eq!(CategoryLabel::classify("기타").icon(), GENERIC_ICON);
    }

    #[test]
    fn test_category_order_and_layouts() {
        let sorted = {
            let mut all = Category::ALL.to_vec();
            all.sort();
            all
        };
        assert_eq!(sorted, Category::ALL.to_vec());

        let thumbnails: Vec<_> = Category::ALL
            .into_iter()
            .filter(|c| c.layout() == SectionLayout::Thumbnail)
            .collect();
        assert_eq!(
            thumbnails,
            vec![Category::RegulationIssues, Category::NewReleases]
        );
    }

    #[test]
    fn test_edition_for_date() {
        let edition = Edition::for_date(NaiveDate::from_ymd_opt(2025, 12, 5).unwrap());
        assert_eq!(edition.date, "2025.12.05");
        assert_eq!(edition.weekday, "Friday");
        assert_eq!(edition.year, 2025);
    }
}
