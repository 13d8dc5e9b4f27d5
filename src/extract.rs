//! Read-only derivations from lesson text and rendered fragments.
//!
//! - [`extract_title`] works on the raw Markdown.
//! - [`strip_leading_heading`] and [`extract_preview`] work on rendered HTML.
//!
//! None of these mutate their input; each returns a new value.

use regex::Regex;
use std::sync::LazyLock;

/// A leading `<h1>`/`<h2>` element (optionally preceded by whitespace).
static LEADING_HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)\A\s*<h([12])\b[^>]*>.*?</h[12]>\s*").unwrap());

/// The first `<p>` element; captures its inner HTML.
static FIRST_PARAGRAPH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<p>(.*?)</p>").unwrap());

/// A footnote reference marker, number included.
static FOOTNOTE_REF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?s)<sup class="footnote-reference">.*?</sup>"#).unwrap());

/// Any HTML tag.
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

/// Title of a lesson: the first `# ` heading, else the first `## ` heading,
/// else `fallback`.
///
/// Lines inside fenced code blocks are skipped, so a Python `# comment`
/// inside a ```` ``` ```` fence never becomes a title.
pub fn extract_title(markdown: &str, fallback: &str) -> String {
    let mut first_h2: Option<&str> = None;
    let mut fence: Option<&str> = None;

    for line in markdown.lines() {
        let trimmed = line.trim_start();
        if let Some(marker) = fence {
            if trimmed.starts_with(marker) {
                fence = None;
            }
            continue;
        }
        if trimmed.starts_with("```") {
            fence = Some("```");
            continue;
        }
        if trimmed.starts_with("~~~") {
            fence = Some("~~~");
            continue;
        }

        if let Some(text) = line.strip_prefix("# ") {
            return text.trim().to_string();
        }
        if first_h2.is_none()
            && let Some(text) = line.strip_prefix("## ")
        {
            first_h2 = Some(text.trim());
        }
    }

    first_h2
        .map(str::to_string)
        .unwrap_or_else(|| fallback.to_string())
}

/// Remove the fragment's leading `<h1>` or `<h2>` element, if it starts with one.
///
/// The module index already shows the lesson title in its section header, so
/// the lesson's own first heading would otherwise appear twice.
pub fn strip_leading_heading(html: &str) -> &str {
    match LEADING_HEADING_RE.find(html) {
        Some(m) => &html[m.end()..],
        None => html,
    }
}

/// Plain-text preview of the first paragraph in a rendered fragment.
///
/// Footnote markers are dropped, tags stripped, entities decoded and
/// whitespace collapsed. Text longer
/// than `max_chars` is cut to exactly `max_chars` characters and `marker` is
/// appended; shorter text is returned as is. No paragraph → empty string.
pub fn extract_preview(html: &str, max_chars: usize, marker: &str) -> String {
    let Some(caps) = FIRST_PARAGRAPH_RE.captures(html) else {
        return String::new();
    };
    let inner = caps.get(1).map_or("", |m| m.as_str());
    let without_notes = FOOTNOTE_REF_RE.replace_all(inner, "");
    let stripped = TAG_RE.replace_all(&without_notes, "");
    let decoded = html_escape::decode_html_entities(&stripped);
    let text = decoded.split_whitespace().collect::<Vec<_>>().join(" ");
    truncate_chars(&text, max_chars, marker)
}

/// Truncate to `max` characters (not bytes), appending `marker` when cut.
pub fn truncate_chars(text: &str, max: usize, marker: &str) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}{}", &text[..cut], marker),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // extract_title
    // =========================================================================

    #[test]
    fn title_from_h1() {
        assert_eq!(extract_title("# Title\nbody", "fb"), "Title");
    }

    #[test]
    fn title_from_h2() {
        assert_eq!(extract_title("## Title\nbody", "fb"), "Title");
    }

    #[test]
    fn title_fallback_without_headings() {
        assert_eq!(extract_title("just text\n\nmore", "tipos de dados"), "tipos de dados");
        assert_eq!(extract_title("", "fb"), "fb");
    }

    #[test]
    fn title_prefers_h1_over_earlier_h2() {
        assert_eq!(extract_title("## Sub\n\n# Main\n", "fb"), "Main");
    }

    #[test]
    fn title_trims_whitespace() {
        assert_eq!(extract_title("#    Spaced out   \n", "fb"), "Spaced out");
    }

    #[test]
    fn title_ignores_deeper_headings_and_hashtags() {
        assert_eq!(extract_title("### Three\n#hashtag\n", "fb"), "fb");
    }

    #[test]
    fn title_skips_fenced_code() {
        let md = "Intro\n\n```python\n# not a title\n```\n\n## Real Title\n";
        assert_eq!(extract_title(md, "fb"), "Real Title");
    }

    #[test]
    fn title_skips_tilde_fences() {
        let md = "~~~\n# nope\n~~~\n# Yes\n";
        assert_eq!(extract_title(md, "fb"), "Yes");
    }

    // =========================================================================
    // strip_leading_heading
    // =========================================================================

    #[test]
    fn strips_leading_h1() {
        let html = "<h1 id=\"alpha\">Alpha</h1>\n<p>Body</p>\n";
        assert_eq!(strip_leading_heading(html), "<p>Body</p>\n");
    }

    #[test]
    fn strips_leading_h2_after_whitespace() {
        let html = "\n  <h2 id=\"x\">X</h2><p>Body</p>";
        assert_eq!(strip_leading_heading(html), "<p>Body</p>");
    }

    #[test]
    fn keeps_heading_that_is_not_first() {
        let html = "<p>Intro</p>\n<h1>Late</h1>";
        assert_eq!(strip_leading_heading(html), html);
    }

    #[test]
    fn keeps_leading_h3() {
        let html = "<h3>Deep</h3><p>x</p>";
        assert_eq!(strip_leading_heading(html), html);
    }

    #[test]
    fn strips_only_one_heading() {
        let html = "<h1>A</h1>\n<h2>B</h2>\n";
        assert_eq!(strip_leading_heading(html), "<h2>B</h2>\n");
    }

    // =========================================================================
    // extract_preview
    // =========================================================================

    #[test]
    fn preview_of_short_paragraph_is_unchanged() {
        let html = "<h2>T</h2><p>Short <strong>text</strong>.</p>";
        assert_eq!(extract_preview(html, 150, "..."), "Short text.");
    }

    #[test]
    fn preview_truncates_long_paragraph() {
        let long = "a".repeat(200);
        let html = format!("<p>{long}</p>");
        let preview = extract_preview(&html, 150, "...");
        assert_eq!(preview, format!("{}...", "a".repeat(150)));
    }

    #[test]
    fn preview_at_exact_budget_has_no_marker() {
        let html = format!("<p>{}</p>", "b".repeat(150));
        assert_eq!(extract_preview(&html, 150, "..."), "b".repeat(150));
    }

    #[test]
    fn preview_counts_characters_not_bytes() {
        let html = format!("<p>{}</p>", "ç".repeat(10));
        assert_eq!(extract_preview(&html, 4, "…"), "çççç…");
    }

    #[test]
    fn preview_decodes_entities() {
        let html = "<p>Tom &amp; Jerry &lt;3</p>";
        assert_eq!(extract_preview(html, 150, "..."), "Tom & Jerry <3");
    }

    #[test]
    fn preview_collapses_whitespace() {
        let html = "<p>line one\nline   two</p>";
        assert_eq!(extract_preview(html, 150, "..."), "line one line two");
    }

    #[test]
    fn preview_drops_footnote_markers() {
        let html = r##"<p>Texto<sup class="footnote-reference"><a href="#fn-1">1</a></sup>.</p>"##;
        assert_eq!(extract_preview(html, 150, "..."), "Texto.");
    }

    #[test]
    fn preview_empty_without_paragraph() {
        assert_eq!(extract_preview("<ul><li>x</li></ul>", 150, "..."), "");
    }

    #[test]
    fn preview_does_not_mutate_input() {
        let html = String::from("<p>Keep <em>me</em></p>");
        let before = html.clone();
        let _ = extract_preview(&html, 3, "...");
        assert_eq!(html, before);
    }

    #[test]
    fn truncate_chars_respects_marker() {
        assert_eq!(truncate_chars("abcdef", 3, "~"), "abc~");
        assert_eq!(truncate_chars("abc", 3, "~"), "abc");
    }
}
