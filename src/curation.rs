//! Article selection, hot-trend ranking and category partitioning.
//!
//! The pipeline is a single linear pass over borrowed records:
//!
//! 1. [`filter_eligible`]: relevance/importance gate
//! 2. [`rank_hot_trend`]: engagement ranking with a comment floor
//! 3. [`exclude_by_url`]: drop the rendered hot picks from the pool
//! 4. [`partition`]: bucket the rest into the six categories
//!
//! [`curate`] runs all four steps and keeps the intermediate counts for
//! logging.

use crate::models::{ArticleRecord, Category, CategoryLabel, RunSnapshot};
use itertools::Itertools;
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, instrument};

/// Minimum `relevance_score` for an article to be eligible.
pub const MIN_RELEVANCE: f64 = 0.5;
/// Minimum `importance_score` for an article to be eligible.
pub const MIN_IMPORTANCE: f64 = 0.4;
/// Minimum comment count to qualify as a hot trend.
pub const HOT_MIN_COMMENTS: u64 = 10;
/// Number of hot-trend articles rendered.
pub const HOT_LIMIT: usize = 5;

/// Keep articles passing both score thresholds, in input order.
pub fn filter_eligible(articles: &[ArticleRecord]) -> Vec<&ArticleRecord> {
    articles
        .iter()
        .filter(|a| a.relevance_score >= MIN_RELEVANCE && a.importance_score >= MIN_IMPORTANCE)
        .collect()
}

/// Hot-trend candidates: articles with at least [`HOT_MIN_COMMENTS`]
/// comments, most-commented first.
///
/// The sort is stable, so ties keep their input order.
pub fn rank_hot_trend<'a>(eligible: &[&'a ArticleRecord]) -> Vec<&'a ArticleRecord> {
    eligible
        .iter()
        .copied()
        .filter(|a| a.comment_count >= HOT_MIN_COMMENTS)
        .sorted_by(|a, b| b.comment_count.cmp(&a.comment_count))
        .collect()
}

/// Remove every article whose `url` appears in `picked`.
pub fn exclude_by_url<'a>(
    pool: &[&'a ArticleRecord],
    picked: &[&ArticleRecord],
) -> Vec<&'a ArticleRecord> {
    let picked_urls: HashSet<&str> = picked.iter().map(|a| a.url.as_str()).collect();
    pool.iter()
        .copied()
        .filter(|a| !picked_urls.contains(a.url.as_str()))
        .collect()
}

/// Articles grouped by category, in input order within each bucket.
#[derive(Debug, Default)]
pub struct CategoryBuckets<'a> {
    buckets: BTreeMap<Category, Vec<&'a ArticleRecord>>,
    unrecognized: Vec<&'a ArticleRecord>,
}

impl<'a> CategoryBuckets<'a> {
    /// Articles for `category`; empty when none were assigned.
    pub fn get(&self, category: Category) -> &[&'a ArticleRecord] {
        self.buckets.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Buckets in render order, including empty ones.
    pub fn iter(&self) -> impl Iterator<Item = (Category, &[&'a ArticleRecord])> + '_ {
        Category::ALL.into_iter().map(move |c| (c, self.get(c)))
    }

    /// Number of articles placed in some bucket.
    pub fn placed(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    /// Articles whose label is outside the taxonomy.
    pub fn unrecognized(&self) -> &[&'a ArticleRecord] {
        &self.unrecognized
    }
}

/// Assign each article to the bucket of its category.
///
/// All six buckets exist even when empty. Articles with an unrecognized
/// label are set aside and never rendered.
pub fn partition<'a>(remaining: &[&'a ArticleRecord]) -> CategoryBuckets<'a> {
    let mut out = CategoryBuckets {
        buckets: Category::ALL.into_iter().map(|c| (c, Vec::new())).collect(),
        unrecognized: Vec::new(),
    };
    for &article in remaining {
        let label = article.category_label();
        match &label {
            CategoryLabel::Known(category) => {
                out.buckets.entry(*category).or_default().push(article);
            }
            CategoryLabel::Unrecognized(raw) => {
                debug!(
                    url = %article.url,
                    label = %raw,
                    icon = label.icon(),
                    "Unrecognized category; not rendered"
                );
                out.unrecognized.push(article);
            }
        }
    }
    out
}

/// Result of curating one snapshot.
#[derive(Debug)]
pub struct Curation<'a> {
    /// Number of articles that passed the score gate.
    pub eligible: usize,
    /// Number of articles that met the hot-trend floor (before the cap).
    pub hot_candidates: usize,
    /// The hot-trend articles actually rendered, at most [`HOT_LIMIT`].
    pub hot: Vec<&'a ArticleRecord>,
    /// Every other eligible article, by category.
    pub categories: CategoryBuckets<'a>,
}

/// Run filter, ranking, exclusion and partitioning over a snapshot.
#[instrument(level = "info", skip_all, fields(total = snapshot.articles.len()))]
pub fn curate(snapshot: &RunSnapshot) -> Curation<'_> {
    let eligible = filter_eligible(&snapshot.articles);
    let mut hot = rank_hot_trend(&eligible);
    let hot_candidates = hot.len();
    hot.truncate(HOT_LIMIT);
    let remaining = exclude_by_url(&eligible, &hot);
    let categories = partition(&remaining);

    debug!(
        eligible = eligible.len(),
        hot_candidates,
        hot = hot.len(),
        remaining = remaining.len(),
        "Curated snapshot"
    );

    Curation {
        eligible: eligible.len(),
        hot_candidates,
        hot,
        categories,
    }
}
