//! Section renderers: hero pair, thumbnail list, compact list, plus the
//! digest and the section chrome (headings and dividers).
//!
//! Each article is turned into a [`Card`] exactly once. A card holds only
//! escaped text, and the list templates read from it on both markup paths.

use crate::models::{ArticleRecord, Category, SectionLayout};
use crate::outputs::layout::{
    BYLINE_STYLE, COMPACT_BYLINE_STYLE, ImageFrame, Layout, MediaFrame, MODERN_FONT, Picture,
    SMALL_SUMMARY_STYLE, SUMMARY_STYLE, TITLE_STYLE, TextRow, dual_path,
};
use crate::text::{escape, first_sentence, format_date, parse_digest_bullets, truncate};

/// Icon shown next to the hot-trend heading.
pub const HOT_TREND_ICON: &str = r##"<path d="M13 10V3L4 14h7v7l9-11h-7z" fill="#000000"/>"##;
/// Icon shown next to the digest heading.
pub const DIGEST_ICON: &str = r##"<path d="M9 21c0 .55.45 1 1 1h4c.55 0 1-.45 1-1v-1H9v1zm3-19C8.14 2 5 5.14 5 9c0 2.38 1.19 4.47 3 5.74V17c0 .55.45 1 1 1h6c.55 0 1-.45 1-1v-2.26c1.81-1.27 3-3.36 3-5.74 0-3.86-3.14-7-7-7zm2.85 11.1l-.85.6V16h-4v-2.3l-.85-.6C7.8 12.16 7 10.63 7 9c0-2.76 2.24-5 5-5s5 2.24 5 5c0 1.63-.8 3.16-2.15 4.1z" fill="#000000"/>"##;

const HOT_TREND_HEADING: &str = "HOT TREND";
const DIGEST_HEADING: &str = "AI SUMMARY";
const BYLINE_SEPARATOR: &str = " · ";
const COMMENT_GLYPH: &str = "💬";

/// How much of the summary a card shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryPolicy {
    Full,
    /// At most this many characters plus an ellipsis.
    Truncated(usize),
    FirstSentence,
}

impl SummaryPolicy {
    fn apply(self, summary: &str) -> String {
        match self {
            SummaryPolicy::Full => summary.to_string(),
            SummaryPolicy::Truncated(max) => truncate(summary, max),
            SummaryPolicy::FirstSentence => first_sentence(summary),
        }
    }
}

/// Escaped, layout-independent content of one article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub href: String,
    pub image_src: String,
    pub image_alt: String,
    pub title: String,
    pub summary: String,
    pub byline: String,
}

impl Card {
    /// Card for the hot-trend layouts: byline ends with the comment count.
    pub fn hot(article: &ArticleRecord, summary: SummaryPolicy) -> Self {
        let comments = format!("{COMMENT_GLYPH} {}", article.comment_count);
        Self::build(article, summary, byline(article, &comments))
    }

    /// Card for category thumbnails: first sentence, `media · date` byline.
    pub fn category(article: &ArticleRecord) -> Self {
        Self::build(article, SummaryPolicy::FirstSentence, byline(article, ""))
    }

    /// Card for compact rows: the first sentence leads the byline.
    pub fn compact(article: &ArticleRecord) -> Self {
        let lead = first_sentence(&article.summary_localized);
        let line = [
            escape(&lead),
            escape(&article.media),
            escape(&format_date(&article.published_at)),
        ]
        .join(BYLINE_SEPARATOR);
        Self::build(article, SummaryPolicy::FirstSentence, line)
    }

    fn build(article: &ArticleRecord, summary: SummaryPolicy, byline: String) -> Self {
        Card {
            href: escape(article.href()),
            image_src: escape(&article.thumbnail_url),
            image_alt: escape(&article.media),
            title: escape(article.display_title()),
            summary: escape(&summary.apply(&article.summary_localized)),
            byline,
        }
    }

    fn picture(&self) -> Picture<'_> {
        Picture {
            href: &self.href,
            src: &self.image_src,
            alt: &self.image_alt,
        }
    }
}

/// `media · MM.DD`, with an optional escaped tail such as the comment count.
fn byline(article: &ArticleRecord, tail: &str) -> String {
    let mut parts = vec![
        escape(&article.media),
        escape(&format_date(&article.published_at)),
    ];
    if !tail.is_empty() {
        parts.push(escape(tail));
    }
    parts.join(BYLINE_SEPARATOR)
}

/// Geometry and spacing of a thumbnail list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThumbnailStyle {
    pub image: ImageFrame,
    pub frame: MediaFrame,
    pub title_gap: u8,
    pub summary_gap: u8,
    pub summary_style: &'static str,
    /// Bottom spacing between items.
    pub item_spacing: u32,
    /// Bottom spacing after the last item.
    pub closing_spacing: u32,
}

/// Hot-trend ranks 3 to 5: boxed, wide image.
pub const HOT_THUMBNAILS: ThumbnailStyle = ThumbnailStyle {
    image: ImageFrame::Stretch {
        width: 250,
        min_height: 200,
    },
    frame: MediaFrame {
        image_width: 250,
        panel: true,
    },
    title_gap: 8,
    summary_gap: 10,
    summary_style: SUMMARY_STYLE,
    item_spacing: 20,
    closing_spacing: 40,
};

/// Category sections: small fixed thumbnail, no box.
pub const CATEGORY_THUMBNAILS: ThumbnailStyle = ThumbnailStyle {
    image: ImageFrame::Fixed {
        width: 120,
        height: 80,
    },
    frame: MediaFrame {
        image_width: 120,
        panel: false,
    },
    title_gap: 6,
    summary_gap: 8,
    summary_style: SMALL_SUMMARY_STYLE,
    item_spacing: 25,
    closing_spacing: 40,
};

const COMPACT_ITEM_SPACING: u32 = 10;
const COMPACT_CLOSING_SPACING: u32 = 40;

/// Bottom spacing for item `idx` of `len`; the last item closes the section.
fn spacing(idx: usize, len: usize, item: u32, closing: u32) -> u32 {
    if idx + 1 < len { item } else { closing }
}

fn item_row(bottom: u32, inner: &str) -> String {
    format!(
        r#"
<tr>
<td class="mobile-padding" style="padding: 0 50px {bottom}px 50px;">
{inner}
</td>
</tr>
"#
    )
}

/// Full-width divider row.
pub fn divider(height: u32, color: &str) -> String {
    format!(
        r#"
<tr>
<td class="mobile-padding" style="padding: 0 50px;">
<table width="100%" cellpadding="0" cellspacing="0" border="0">
<tr>
<td style="height: {height}px; background-color: {color};"></td>
</tr>
</table>
</td>
</tr>
"#
    )
}

/// Icon plus letter-spaced heading row.
pub fn section_heading(icon: &str, heading: &str, bottom: u32) -> String {
    format!(
        r#"
<tr>
<td class="mobile-padding" style="padding: 40px 50px {bottom}px 50px;">
<table cellpadding="0" cellspacing="0" border="0">
<tr>
<td valign="middle" style="padding-right: 8px;">
<svg width="18" height="18" viewBox="0 0 24 24" fill="none" xmlns="http://www.w3.org/2000/svg">
{icon}
</svg>
</td>
<td valign="middle">
<font face="{MODERN_FONT}" style="font-size: 13px; font-weight: 700; color: #000000; letter-spacing: 2px;">{heading}</font>
</td>
</tr>
</table>
</td>
</tr>
"#,
        heading = escape(heading)
    )
}

/// One hero card: image on top, title, summary and byline below.
pub fn hero_card(layout: &dyn Layout, card: &Card) -> String {
    let rows = [
        TextRow { gap: 10, style: TITLE_STYLE, text: &card.title },
        TextRow { gap: 12, style: SUMMARY_STYLE, text: &card.summary },
        TextRow { gap: 0, style: BYLINE_STYLE, text: &card.byline },
    ];
    let image = layout.image(card.picture(), ImageFrame::Fill { height: 200 });
    let body = layout.link(&card.href, &layout.text_stack(&rows));
    layout.card(&image, &body)
}

/// Hot-trend ranks 1 and 2, side by side.
pub fn hero_pair(first: &ArticleRecord, second: &ArticleRecord, summary: SummaryPolicy) -> String {
    let left = Card::hot(first, summary);
    let right = Card::hot(second, summary);
    let markup = dual_path(|l| l.columns(&hero_card(l, &left), &hero_card(l, &right)));
    format!(
        r#"
<!-- 2 Column HOT Items -->
<tr>
<td class="mobile-padding" style="padding: 20px 50px;">
{markup}
</td>
</tr>
"#
    )
}

/// One thumbnail item: image left, text right.
pub fn thumbnail_item(layout: &dyn Layout, card: &Card, style: &ThumbnailStyle) -> String {
    let rows = [
        TextRow { gap: style.title_gap, style: TITLE_STYLE, text: &card.title },
        TextRow { gap: style.summary_gap, style: style.summary_style, text: &card.summary },
        TextRow { gap: 0, style: BYLINE_STYLE, text: &card.byline },
    ];
    let image = layout.image(card.picture(), style.image);
    let body = layout.link(&card.href, &layout.text_stack(&rows));
    layout.media_object(&image, &body, style.frame)
}

/// A list of thumbnail items, each rendered on both paths.
pub fn thumbnail_list(cards: &[Card], style: &ThumbnailStyle) -> String {
    cards
        .iter()
        .enumerate()
        .map(|(idx, card)| {
            let bottom = spacing(idx, cards.len(), style.item_spacing, style.closing_spacing);
            item_row(bottom, &dual_path(|l| thumbnail_item(l, card, style)))
        })
        .collect()
}

/// One compact row: title over a single byline line.
pub fn compact_item(layout: &dyn Layout, card: &Card, rule: bool) -> String {
    let rows = [
        TextRow { gap: 6, style: TITLE_STYLE, text: &card.title },
        TextRow { gap: 0, style: COMPACT_BYLINE_STYLE, text: &card.byline },
    ];
    layout.ruled(&layout.link(&card.href, &layout.text_stack(&rows)), rule)
}

/// A list of compact rows, ruled between items but not after the last.
pub fn compact_list(cards: &[Card]) -> String {
    cards
        .iter()
        .enumerate()
        .map(|(idx, card)| {
            let last = idx + 1 == cards.len();
            let bottom = spacing(idx, cards.len(), COMPACT_ITEM_SPACING, COMPACT_CLOSING_SPACING);
            item_row(bottom, &dual_path(|l| compact_item(l, card, !last)))
        })
        .collect()
}

/// The hot-trend section; empty when nothing qualified.
///
/// With two or more picks the first two form the hero pair and the rest are
/// thumbnails. A single pick is shown as a thumbnail.
pub fn hot_trend_section(hot: &[&ArticleRecord], summary: SummaryPolicy) -> String {
    if hot.is_empty() {
        return String::new();
    }
    let mut html = String::from("\n<!-- HOT TREND Section -->");
    html.push_str(&section_heading(HOT_TREND_ICON, HOT_TREND_HEADING, 10));

    let rest = if let [first, second, rest @ ..] = hot {
        html.push_str(&hero_pair(first, second, summary));
        rest
    } else {
        hot
    };
    let cards: Vec<Card> = rest.iter().map(|a| Card::hot(a, summary)).collect();
    html.push_str(&thumbnail_list(&cards, &HOT_THUMBNAILS));
    html
}

/// A category section; empty when the bucket is empty.
pub fn category_section(category: Category, articles: &[&ArticleRecord]) -> String {
    if articles.is_empty() {
        return String::new();
    }
    let (heading_bottom, list) = match category.layout() {
        SectionLayout::Thumbnail => {
            let cards: Vec<Card> = articles.iter().map(|a| Card::category(a)).collect();
            (25, thumbnail_list(&cards, &CATEGORY_THUMBNAILS))
        }
        SectionLayout::Compact => {
            let cards: Vec<Card> = articles.iter().map(|a| Card::compact(a)).collect();
            (20, compact_list(&cards))
        }
    };

    let mut html = divider(2, "#e0e0e0");
    html.push_str(&format!("\n<!-- Category: {} -->", category.label()));
    html.push_str(&section_heading(category.icon(), category.heading(), heading_bottom));
    html.push_str(&list);
    html
}

/// The daily digest as a bullet panel; empty when no bullets parse.
pub fn digest_section(daily_summary: &str) -> String {
    let bullets = parse_digest_bullets(daily_summary);
    if bullets.is_empty() {
        return String::new();
    }

    let rows: String = bullets
        .iter()
        .map(|bullet| {
            format!(
                r#"
<tr>
<td style="padding: 8px 0;">
<table cellpadding="0" cellspacing="0" border="0">
<tr>
<td valign="top" style="padding-right: 12px;">
<font face="{MODERN_FONT}" style="font-size: 16px; font-weight: 700; color: #667eea;">•</font>
</td>
<td valign="top">
<font face="{MODERN_FONT}" style="font-size: 14px; font-weight: 400; color: #333333; line-height: 1.6;">{}</font>
</td>
</tr>
</table>
</td>
</tr>"#,
                escape(bullet)
            )
        })
        .collect();

    let mut html = String::from("\n<!-- AI Summary Section -->");
    html.push_str(&section_heading(DIGEST_ICON, DIGEST_HEADING, 10));
    html.push_str(&format!(
        r#"
<tr>
<td class="mobile-padding" style="padding: 20px 50px 40px 50px;">
<table width="100%" cellpadding="0" cellspacing="0" border="0" style="background-color: #f8f9fa; border-left: 4px solid #667eea; border-radius: 4px;">
<tr>
<td style="padding: 25px 30px;">
<table width="100%" cellpadding="0" cellspacing="0" border="0">{rows}
</table>
</td>
</tr>
</table>
</td>
</tr>
"#
    ));
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outputs::layout::{LegacyTables, ModernFlex};
    use once_cell::sync::Lazy;
    use regex::Regex;

    static FONT_TEXT: Lazy<Regex> = Lazy::new(|| Regex::new(r"<font[^>]*>([^<]*)</font>").unwrap());
    static ATTRS: Lazy<Regex> = Lazy::new(|| Regex::new(r#"\b(href|src|alt)="([^"]*)""#).unwrap());

    /// Text runs and link/image attributes, in document order.
    fn content(markup: &str) -> (Vec<String>, Vec<String>) {
        let texts = FONT_TEXT
            .captures_iter(markup)
            .map(|c| c[1].to_string())
            .collect();
        let attrs = ATTRS
            .captures_iter(markup)
            .map(|c| format!("{}={}", &c[1], &c[2]))
            .collect();
        (texts, attrs)
    }

    fn article(url: &str, comments: u64, summary: &str) -> ArticleRecord {
        ArticleRecord {
            url: url.to_string(),
            title: "Original <title>".to_string(),
            title_localized: format!("제목 \"{url}\" & more"),
            summary_localized: summary.to_string(),
            category: "규제 & 이슈".to_string(),
            media: "IGN".to_string(),
            published_at: "2025-12-05 14:30".to_string(),
            comment_count: comments,
            thumbnail_url: format!("https://img.example/{url}.jpg?a=1&b=2"),
            relevance_score: 1.0,
            importance_score: 1.0,
        }
    }

    fn assert_parity(legacy: String, modern: String) {
        let (legacy_text, legacy_attrs) = content(&legacy);
        let (modern_text, modern_attrs) = content(&modern);
        assert!(!legacy_text.is_empty());
        assert_eq!(legacy_text, modern_text);
        assert_eq!(legacy_attrs, modern_attrs);
    }

    #[test]
    fn test_hero_paths_carry_identical_content() {
        let a = Card::hot(&article("a", 30, "First <b>summary</b>. Second."), SummaryPolicy::Full);
        let b = Card::hot(&article("b", 20, "Other summary"), SummaryPolicy::Full);
        assert_parity(
            LegacyTables.columns(&hero_card(&LegacyTables, &a), &hero_card(&LegacyTables, &b)),
            ModernFlex.columns(&hero_card(&ModernFlex, &a), &hero_card(&ModernFlex, &b)),
        );
    }

    #[test]
    fn test_thumbnail_paths_carry_identical_content() {
        let card = Card::category(&article("t", 0, "It's here. More later."));
        assert_parity(
            thumbnail_item(&LegacyTables, &card, &CATEGORY_THUMBNAILS),
            thumbnail_item(&ModernFlex, &card, &CATEGORY_THUMBNAILS),
        );
    }

    #[test]
    fn test_hot_thumbnail_paths_carry_identical_content() {
        let summary = "Full <hot> summary. It keeps going & going.";
        let card = Card::hot(&article("h", 42, summary), SummaryPolicy::Full);
        let legacy = thumbnail_item(&LegacyTables, &card, &HOT_THUMBNAILS);
        let modern = thumbnail_item(&ModernFlex, &card, &HOT_THUMBNAILS);

        let (texts, _) = content(&legacy);
        assert!(texts.contains(&escape(summary)));
        assert!(texts.iter().any(|t| t.ends_with("💬 42")));
        assert_parity(legacy, modern);
    }

    #[test]
    fn test_compact_paths_carry_identical_content() {
        let card = Card::compact(&article("c", 0, "Short & sweet! Then more."));
        assert_parity(
            compact_item(&LegacyTables, &card, true),
            compact_item(&ModernFlex, &card, true),
        );
    }

    #[test]
    fn test_card_escapes_everything() {
        let card = Card::hot(&article("x", 12, "<script>"), SummaryPolicy::Full);
        assert_eq!(card.title, "제목 &quot;x&quot; &amp; more");
        assert_eq!(card.summary, "&lt;script&gt;");
        assert_eq!(card.image_src, "https://img.example/x.jpg?a=1&amp;b=2");
        assert_eq!(card.byline, "IGN · 12.05 · 💬 12");
    }

    #[test]
    fn test_card_bylines() {
        let record = article("y", 3, "First. Second.");
        assert_eq!(Card::category(&record).byline, "IGN · 12.05");
        assert_eq!(Card::category(&record).summary, "First.");
        assert_eq!(Card::compact(&record).byline, "First. · IGN · 12.05");
    }

    #[test]
    fn test_card_unparsable_date_is_kept() {
        let mut record = article("z", 0, "");
        record.published_at = "yesterday".to_string();
        assert_eq!(Card::category(&record).byline, "IGN · yesterday");
    }

    #[test]
    fn test_summary_policies() {
        let long = "가".repeat(300);
        assert_eq!(SummaryPolicy::Full.apply(&long), long);
        assert_eq!(SummaryPolicy::Truncated(200).apply(&long).chars().count(), 203);
        assert_eq!(SummaryPolicy::FirstSentence.apply("A. B."), "A.");
    }

    #[test]
    fn test_thumbnail_list_closing_spacing() {
        let cards: Vec<Card> = ["a", "b", "c"]
            .iter()
            .map(|u| Card::category(&article(u, 0, "s")))
            .collect();
        let html = thumbnail_list(&cards, &CATEGORY_THUMBNAILS);
        assert_eq!(html.matches("padding: 0 50px 25px 50px;").count(), 2);
        assert_eq!(html.matches("padding: 0 50px 40px 50px;").count(), 1);
        let last = html.rfind("padding: 0 50px 40px 50px;").unwrap();
        assert!(last > html.rfind("padding: 0 50px 25px 50px;").unwrap());

        let single = thumbnail_list(&cards[..1], &CATEGORY_THUMBNAILS);
        assert!(single.contains("padding: 0 50px 40px 50px;"));
        assert!(!single.contains("padding: 0 50px 25px 50px;"));
    }

    #[test]
    fn test_compact_list_rules_between_items_only() {
        let cards: Vec<Card> = ["a", "b", "c"]
            .iter()
            .map(|u| Card::compact(&article(u, 0, "s")))
            .collect();
        let html = compact_list(&cards);
        // Two ruled items, each on both paths.
        assert_eq!(html.matches("border-bottom: 1px solid #e0e0e0;").count(), 4);
        let last_item = html.rfind("<!--[if mso]>").unwrap();
        assert!(!html[last_item..].contains("border-bottom"));
        assert_eq!(html.matches("padding: 0 50px 10px 50px;").count(), 2);
        assert_eq!(html.matches("padding: 0 50px 40px 50px;").count(), 1);
    }

    #[test]
    fn test_hot_section_layouts() {
        let records: Vec<ArticleRecord> =
            (0..5).map(|i| article(&format!("h{i}"), 50 - i, "s")).collect();
        let refs: Vec<&ArticleRecord> = records.iter().collect();

        assert_eq!(hot_trend_section(&[], SummaryPolicy::Full), "");

        let five = hot_trend_section(&refs, SummaryPolicy::Full);
        assert!(five.contains("2 Column HOT Items"));
        assert!(five.contains("HOT TREND"));
        assert_eq!(five.matches("padding: 0 50px 20px 50px;").count(), 2);
        assert_eq!(five.matches("padding: 0 50px 40px 50px;").count(), 1);

        let one = hot_trend_section(&refs[..1], SummaryPolicy::Full);
        assert!(!one.contains("2 Column HOT Items"));
        assert!(one.contains("h0.jpg"));

        let two = hot_trend_section(&refs[..2], SummaryPolicy::Full);
        assert!(two.contains("2 Column HOT Items"));
        assert!(!two.contains("min-height: 200px"));
    }

    #[test]
    fn test_category_section_empty() {
        assert_eq!(category_section(Category::NewReleases, &[]), "");
    }

    #[test]
    fn test_category_section_layouts() {
        let record = article("k", 0, "Summary. More.");
        let thumb = category_section(Category::RegulationIssues, &[&record]);
        assert!(thumb.contains("<!-- Category: 규제 & 이슈 -->"));
        assert!(thumb.contains("REGULATION &amp; ISSUES"));
        assert!(thumb.contains("news-thumbnail"));

        let compact = category_section(Category::CommunityEvents, &[&record]);
        assert!(compact.contains("COMMUNITY &amp; EVENTS"));
        assert!(!compact.contains("<img"));
    }

    #[test]
    fn test_digest_section() {
        assert_eq!(digest_section(""), "");
        assert_eq!(digest_section("no bullets here"), "");

        let html = digest_section("• 신작 <발표>\nnoise\n- 매출 성장");
        assert!(html.contains("AI SUMMARY"));
        assert!(html.contains("신작 &lt;발표&gt;"));
        assert!(html.contains("매출 성장"));
        assert!(!html.contains("noise"));
        assert!(html.find("신작").unwrap() < html.find("매출 성장").unwrap());
    }
}
