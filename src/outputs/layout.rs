//! Layout primitives for the two email markup paths.
//!
//! Every section template is written once against the [`Layout`] trait and
//! evaluated twice by [`dual_path`]:
//!
//! - [`LegacyTables`]: nested tables and divs with fixed image sizes, wrapped
//!   in an `<!--[if mso]>` block for Word-based Outlook engines
//! - [`ModernFlex`]: flexbox columns and `object-fit` images, wrapped in a
//!   `<!--[if !mso]><!-->` block for every other client
//!
//! The backends receive already-escaped text and only decide structure and
//! styling, so both paths always carry the same content in the same order.

/// Font stack understood by Word-based engines.
pub const LEGACY_FONT: &str = "Malgun Gothic, Arial, sans-serif";
/// Font stack for modern engines, including the Korean face name.
pub const MODERN_FONT: &str = "'Malgun Gothic', '맑은 고딕', Arial, sans-serif";

pub const TITLE_STYLE: &str = "font-size: 14px; font-weight: 700; color: #000000; line-height: 1.4;";
pub const SUMMARY_STYLE: &str = "font-size: 13px; font-weight: 400; color: #666666; line-height: 1.5;";
pub const SMALL_SUMMARY_STYLE: &str =
    "font-size: 12px; font-weight: 400; color: #666666; line-height: 1.5;";
pub const BYLINE_STYLE: &str = "font-size: 11px; font-weight: 500; color: #999999;";
pub const COMPACT_BYLINE_STYLE: &str = "font-size: 12px; font-weight: 400; color: #999999;";

const TABLE: &str = r#"<table width="100%" cellpadding="0" cellspacing="0" border="0""#;
const PANEL_STYLE: &str = "background-color: #f8f8f8; border: 1px solid #e0e0e0;";
const RULE_STYLE: &str = "border-bottom: 1px solid #e0e0e0;";

/// One line of text in a vertical stack.
#[derive(Debug, Clone, Copy)]
pub struct TextRow<'t> {
    /// Bottom padding in pixels; 0 for none.
    pub gap: u8,
    /// Inline CSS for the `<font>` element.
    pub style: &'static str,
    /// Escaped content.
    pub text: &'t str,
}

/// How an image is sized inside its cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFrame {
    /// Full cell width, fixed height.
    Fill { height: u32 },
    /// Fixed width and height.
    Fixed { width: u32, height: u32 },
    /// Fixed width, stretches to the row height.
    Stretch { width: u32, min_height: u32 },
}

/// Image-left row geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaFrame {
    pub image_width: u32,
    /// Gray bordered box around the whole row.
    pub panel: bool,
}

/// Escaped image attributes.
#[derive(Debug, Clone, Copy)]
pub struct Picture<'t> {
    pub href: &'t str,
    pub src: &'t str,
    pub alt: &'t str,
}

/// Structural primitives a markup path must provide.
pub trait Layout {
    fn font_face(&self) -> &'static str;

    /// A styled text run.
    fn text(&self, style: &str, text: &str) -> String {
        format!(
            r#"<font face="{}" style="{}">{}</font>"#,
            self.font_face(),
            style,
            text
        )
    }

    /// Rows of text stacked vertically.
    fn text_stack(&self, rows: &[TextRow<'_>]) -> String;

    /// Block link around `inner`.
    fn link(&self, href: &str, inner: &str) -> String;

    /// Linked image.
    fn image(&self, picture: Picture<'_>, frame: ImageFrame) -> String;

    /// Two equal columns side by side.
    fn columns(&self, left: &str, right: &str) -> String;

    /// Boxed card with an image on top and a body below.
    fn card(&self, image: &str, body: &str) -> String;

    /// Image on the left, body on the right.
    fn media_object(&self, image: &str, body: &str, frame: MediaFrame) -> String;

    /// Padded row with an optional bottom rule.
    fn ruled(&self, body: &str, rule: bool) -> String;
}

/// Table-only markup for Word-based Outlook.
#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyTables;

impl Layout for LegacyTables {
    fn font_face(&self) -> &'static str {
        LEGACY_FONT
    }

    fn text_stack(&self, rows: &[TextRow<'_>]) -> String {
        rows.iter()
            .map(|row| {
                let text = self.text(row.style, row.text);
                if row.gap == 0 {
                    format!("<div>{text}</div>")
                } else {
                    format!(r#"<div style="padding-bottom: {}px;">{text}</div>"#, row.gap)
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn link(&self, href: &str, inner: &str) -> String {
        format!(
            "<a href=\"{href}\" style=\"text-decoration: none; color: #000000;\">\n{inner}\n</a>"
        )
    }

    fn image(&self, picture: Picture<'_>, frame: ImageFrame) -> String {
        let Picture { href, src, alt } = picture;
        let img = match frame {
            ImageFrame::Fill { height } => format!(
                r#"<img src="{src}" width="100%" height="{height}" style="display: block;" alt="{alt}">"#
            ),
            ImageFrame::Fixed { width, height } => format!(
                r#"<img src="{src}" width="{width}" height="{height}" style="display: block; width: {width}px; height: {height}px;" alt="{alt}">"#
            ),
            ImageFrame::Stretch { width, min_height } => format!(
                r#"<img src="{src}" width="{width}" height="{min_height}" style="display: block; width: {width}px; height: {min_height}px;" alt="{alt}">"#
            ),
        };
        format!("<a href=\"{href}\" style=\"text-decoration: none;\">\n{img}\n</a>")
    }

    fn columns(&self, left: &str, right: &str) -> String {
        format!(
            r#"{TABLE}>
<tr>
<td width="48%" valign="top" style="padding-right: 2%;">
{left}
</td>
<td width="48%" valign="top" style="padding-left: 2%;">
{right}
</td>
</tr>
</table>"#
        )
    }

    fn card(&self, image: &str, body: &str) -> String {
        format!(
            r#"{TABLE} style="{PANEL_STYLE}">
<tr>
<td style="padding: 0;">
{image}
</td>
</tr>
<tr>
<td style="padding: 25px;">
{body}
</td>
</tr>
</table>"#
        )
    }

    fn media_object(&self, image: &str, body: &str, frame: MediaFrame) -> String {
        let width = frame.image_width;
        let (table_style, image_pad, body_pad) = if frame.panel {
            (
                format!(r#" style="{PANEL_STYLE}""#),
                "padding: 0;",
                r#" style="padding: 25px;""#,
            )
        } else {
            (String::new(), "padding-right: 15px;", "")
        };
        format!(
            r#"{TABLE}{table_style}>
<tr>
<td width="{width}" valign="top" style="{image_pad}">
{image}
</td>
<td valign="top"{body_pad}>
{body}
</td>
</tr>
</table>"#
        )
    }

    fn ruled(&self, body: &str, rule: bool) -> String {
        let table_style = if rule {
            format!(r#" style="{RULE_STYLE}""#)
        } else {
            String::new()
        };
        format!(
            r#"{TABLE}{table_style}>
<tr>
<td style="padding: 12px 0;">
{body}
</td>
</tr>
</table>"#
        )
    }
}

/// Flexbox and CSS-sized markup for modern engines.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModernFlex;

impl Layout for ModernFlex {
    fn font_face(&self) -> &'static str {
        MODERN_FONT
    }

    fn text_stack(&self, rows: &[TextRow<'_>]) -> String {
        let cells = rows
            .iter()
            .map(|row| {
                let text = self.text(row.style, row.text);
                if row.gap == 0 {
                    format!("<tr>\n<td>\n{text}\n</td>\n</tr>")
                } else {
                    format!(
                        "<tr>\n<td style=\"padding-bottom: {}px;\">\n{text}\n</td>\n</tr>",
                        row.gap
                    )
                }
            })
            .collect::<Vec<_>>()
            .join("\n");
        format!("{TABLE}>\n{cells}\n</table>")
    }

    fn link(&self, href: &str, inner: &str) -> String {
        format!(
            "<a href=\"{href}\" style=\"text-decoration: none; color: inherit; display: block;\">\n{inner}\n</a>"
        )
    }

    fn image(&self, picture: Picture<'_>, frame: ImageFrame) -> String {
        let Picture { href, src, alt } = picture;
        let img = match frame {
            ImageFrame::Fill { height } => format!(
                r#"<img src="{src}" width="100%" style="display: block; width: 100%; height: {height}px; object-fit: cover;" alt="{alt}">"#
            ),
            ImageFrame::Fixed { width, height } => format!(
                r#"<img src="{src}" width="{width}" style="display: block; width: {width}px; height: {height}px; object-fit: cover; background-color: #f0f0f0;" alt="{alt}">"#
            ),
            ImageFrame::Stretch { width, min_height } => format!(
                r#"<img src="{src}" width="{width}" style="display: block; width: {width}px; height: 100%; object-fit: cover; min-height: {min_height}px;" alt="{alt}">"#
            ),
        };
        format!("<a href=\"{href}\" style=\"text-decoration: none; display: block;\">\n{img}\n</a>")
    }

    fn columns(&self, left: &str, right: &str) -> String {
        format!(
            r#"<div style="display: flex; gap: 20px; width: 100%;">
<div class="two-col-left" style="flex: 1; min-width: 0;">
{left}
</div>
<div class="two-col-right" style="flex: 1; min-width: 0;">
{right}
</div>
</div>"#
        )
    }

    fn card(&self, image: &str, body: &str) -> String {
        format!(
            r#"{TABLE} style="{PANEL_STYLE} height: 100%;">
<tr>
<td style="padding: 0;">
{image}
</td>
</tr>
<tr>
<td style="padding: 25px;">
{body}
</td>
</tr>
</table>"#
        )
    }

    fn media_object(&self, image: &str, body: &str, frame: MediaFrame) -> String {
        let width = frame.image_width;
        if frame.panel {
            format!(
                r#"{TABLE} style="{PANEL_STYLE}">
<tr>
<td width="{width}" style="padding: 0; vertical-align: top;">
{image}
</td>
<td style="padding: 25px; vertical-align: top;">
{body}
</td>
</tr>
</table>"#
            )
        } else {
            format!(
                r#"{TABLE}>
<tr>
<td class="news-thumbnail" width="{width}" style="padding-right: 15px; vertical-align: top;">
{image}
</td>
<td style="vertical-align: top;">
{body}
</td>
</tr>
</table>"#
            )
        }
    }

    fn ruled(&self, body: &str, rule: bool) -> String {
        let rule_style = if rule { format!(" {RULE_STYLE}") } else { String::new() };
        format!(
            r#"{TABLE}>
<tr>
<td style="padding: 12px 0;{rule_style}">
{body}
</td>
</tr>
</table>"#
        )
    }
}

/// Evaluate `template` once per backend and wrap each result in the matching
/// conditional comment.
pub fn dual_path<F>(template: F) -> String
where
    F: Fn(&dyn Layout) -> String,
{
    format!(
        "<!--[if mso]>\n{}\n<![endif]-->\n<!--[if !mso]><!-->\n{}\n<!--<![endif]-->",
        template(&LegacyTables),
        template(&ModernFlex)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dual_path_wraps_both_backends() {
        let out = dual_path(|l| l.font_face().to_string());
        let legacy = out.find(LEGACY_FONT).unwrap();
        let modern = out.find(MODERN_FONT).unwrap();
        assert!(out.starts_with("<!--[if mso]>"));
        assert!(out.ends_with("<!--<![endif]-->"));
        assert!(legacy < out.find("<![endif]-->").unwrap());
        assert!(modern > out.find("<!--[if !mso]><!-->").unwrap());
    }

    #[test]
    fn test_text_stack_gaps() {
        let rows = [
            TextRow { gap: 6, style: TITLE_STYLE, text: "Title" },
            TextRow { gap: 0, style: BYLINE_STYLE, text: "Byline" },
        ];
        let legacy = LegacyTables.text_stack(&rows);
        assert!(legacy.contains(r#"<div style="padding-bottom: 6px;">"#));
        assert!(legacy.contains("<div><font"));

        let modern = ModernFlex.text_stack(&rows);
        assert!(modern.contains(r#"<td style="padding-bottom: 6px;">"#));
        assert!(modern.starts_with("<table"));
    }

    #[test]
    fn test_ruled_border_placement() {
        let legacy = LegacyTables.ruled("x", true);
        assert!(legacy.starts_with(&format!(r#"{TABLE} style="{RULE_STYLE}">"#)));
        assert!(!LegacyTables.ruled("x", false).contains(RULE_STYLE));

        let modern = ModernFlex.ruled("x", true);
        assert!(modern.contains(&format!(r#"<td style="padding: 12px 0; {RULE_STYLE}">"#)));
        assert!(!ModernFlex.ruled("x", false).contains(RULE_STYLE));
    }

    #[test]
    fn test_image_frames() {
        let picture = Picture { href: "h", src: "s", alt: "a" };
        let fixed = ImageFrame::Fixed { width: 120, height: 80 };
        assert!(LegacyTables.image(picture, fixed).contains(r#"width="120" height="80""#));
        assert!(ModernFlex.image(picture, fixed).contains("object-fit: cover"));

        let stretch = ImageFrame::Stretch { width: 250, min_height: 200 };
        assert!(ModernFlex.image(picture, stretch).contains("min-height: 200px"));
    }
}
