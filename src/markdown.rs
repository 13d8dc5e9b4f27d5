//! Markdown to HTML rendering.
//!
//! Wraps [pulldown-cmark](https://docs.rs/pulldown-cmark) with the fixed
//! extension set lessons are written against:
//!
//! - **Fenced code**: emitted as `<div class="codehilite"><pre><code class="language-py">`,
//!   the hooks the stylesheet colors.
//! - **Tables**, strikethrough, task lists and footnotes (GFM flavour).
//!   Footnote ids are claimed from the [`AnchorRegistry`] as `fn-<label>`,
//!   so two lessons numbering their notes `[^1]` can share a page.
//! - **Heading anchors**: every heading gets an `id`. Explicit ids written
//!   with attribute lists (`## Setup {#setup .wide}`) are kept; the rest are
//!   slugged from the heading text. Ids are unique per [`AnchorRegistry`].
//! - **`[TOC]` marker**: a paragraph holding only `[TOC]` becomes a nested
//!   list of links to the document's headings.
//!
//! Rendering never fails. Malformed input (unclosed fences, stray brackets,
//! broken tables) renders as literally as pulldown-cmark allows.

use crate::naming::{AnchorRegistry, DEFAULT_ANCHOR};
use pulldown_cmark::{
    CodeBlockKind, CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd, TextMergeStream,
    html as md_html,
};
use std::collections::HashMap;

/// Literal paragraph content replaced by a table of contents.
pub const TOC_MARKER: &str = "[TOC]";

/// A heading discovered while rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct Heading {
    /// 1 for `#`, 6 for `######`.
    pub level: u8,
    /// The `id` attribute written to the output.
    pub id: String,
    /// Plain heading text (inline code included, markup dropped).
    pub text: String,
}

/// Result of rendering one Markdown document.
#[derive(Debug, Clone)]
pub struct RenderedMarkdown {
    pub html: String,
    pub headings: Vec<Heading>,
}

/// The extension set every lesson is rendered with.
pub fn markdown_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_HEADING_ATTRIBUTES
}

/// Render a standalone document; heading ids are unique within it.
pub fn render(markdown: &str) -> RenderedMarkdown {
    let mut anchors = AnchorRegistry::new();
    render_with_anchors(markdown, &mut anchors)
}

/// Render a document whose heading and footnote ids must not clash with
/// `anchors`.
pub fn render_with_anchors(markdown: &str, anchors: &mut AnchorRegistry) -> RenderedMarkdown {
    render_events(markdown, anchors, false)
}

/// Render a lesson shown as a section of a module page.
///
/// A leading h1/h2 is left out of the `[TOC]` list: the section drops that
/// heading from its body and shows its own header instead.
pub fn render_section(markdown: &str, anchors: &mut AnchorRegistry) -> RenderedMarkdown {
    render_events(markdown, anchors, true)
}

fn render_events(
    markdown: &str,
    anchors: &mut AnchorRegistry,
    skip_leading_title: bool,
) -> RenderedMarkdown {
    let mut parser = TextMergeStream::new(Parser::new_ext(markdown, markdown_options()));
    let mut events: Vec<Event<'_>> = Vec::new();
    let mut headings = Vec::new();

    while let Some(event) = parser.next() {
        match event {
            Event::Start(Tag::Heading {
                level,
                id,
                classes,
                attrs,
            }) => {
                let mut inner = Vec::new();
                let mut text = String::new();
                for ev in parser.by_ref() {
                    match ev {
                        Event::End(TagEnd::Heading(_)) => break,
                        Event::Text(ref t) | Event::Code(ref t) => {
                            text.push_str(t);
                            inner.push(ev);
                        }
                        other => inner.push(other),
                    }
                }
                let text = text.trim().to_string();
                let id = match id {
                    Some(explicit) => anchors.claim(explicit.to_string()),
                    None => anchors.anchor_for(&text, DEFAULT_ANCHOR),
                };
                headings.push(Heading {
                    level: heading_level_to_num(level),
                    id: id.clone(),
                    text,
                });

                events.push(Event::Start(Tag::Heading {
                    level,
                    id: Some(CowStr::from(id)),
                    classes,
                    attrs,
                }));
                events.extend(inner);
                events.push(Event::End(TagEnd::Heading(level)));
            }
            Event::Start(Tag::CodeBlock(kind)) => {
                events.push(Event::Html(CowStr::from(code_block_open(&kind))));
            }
            Event::End(TagEnd::CodeBlock) => {
                events.push(Event::Html(CowStr::Borrowed("</code></pre></div>\n")));
            }
            other => events.push(other),
        }
    }

    let leading_title = skip_leading_title
        && matches!(
            events.first(),
            Some(Event::Start(Tag::Heading {
                level: HeadingLevel::H1 | HeadingLevel::H2,
                ..
            }))
        );
    let toc = if leading_title {
        toc_html(&headings[1..])
    } else {
        toc_html(&headings)
    };
    let events = rewrite_footnotes(events, anchors);
    let events = replace_toc_markers(events, &toc);

    let mut html = String::with_capacity(markdown.len() * 3 / 2);
    md_html::push_html(&mut html, events.into_iter());

    RenderedMarkdown { html, headings }
}

fn heading_level_to_num(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Opening markup for a code block: wrapper div, `pre`, and a `language-*` class.
fn code_block_open(kind: &CodeBlockKind<'_>) -> String {
    let lang = match kind {
        CodeBlockKind::Fenced(info) => info
            .split(|c: char| c.is_whitespace() || c == ',' || c == '{')
            .next()
            .unwrap_or(""),
        CodeBlockKind::Indented => "",
    };
    if lang.is_empty() {
        "<div class=\"codehilite\"><pre><code>".to_string()
    } else {
        format!(
            "<div class=\"codehilite\"><pre><code class=\"language-{}\">",
            html_escape::encode_double_quoted_attribute(lang)
        )
    }
}

/// Replace footnote references and definitions with markup whose ids come
/// from `anchors`. Notes are numbered by first appearance, per document.
fn rewrite_footnotes<'a>(events: Vec<Event<'a>>, anchors: &mut AnchorRegistry) -> Vec<Event<'a>> {
    let mut notes: HashMap<String, (String, usize)> = HashMap::new();
    let mut note = |label: &str, anchors: &mut AnchorRegistry| {
        let number = notes.len() + 1;
        notes
            .entry(label.to_string())
            .or_insert_with(|| (anchors.anchor_for(&format!("fn-{label}"), "fn"), number))
            .clone()
    };

    events
        .into_iter()
        .map(|event| match event {
            Event::FootnoteReference(label) => {
                let (id, number) = note(&*label, anchors);
                Event::InlineHtml(CowStr::from(format!(
                    "<sup class=\"footnote-reference\"><a href=\"#{id}\">{number}</a></sup>"
                )))
            }
            Event::Start(Tag::FootnoteDefinition(label)) => {
                let (id, number) = note(&*label, anchors);
                Event::Html(CowStr::from(format!(
                    "<div class=\"footnote-definition\" id=\"{id}\">\
                     <sup class=\"footnote-definition-label\">{number}</sup>\n"
                )))
            }
            Event::End(TagEnd::FootnoteDefinition) => Event::Html(CowStr::Borrowed("</div>\n")),
            other => other,
        })
        .collect()
}

/// Swap every `<p>[TOC]</p>` for the rendered table of contents.
fn replace_toc_markers<'a>(events: Vec<Event<'a>>, toc: &str) -> Vec<Event<'a>> {
    let mut out = Vec::with_capacity(events.len());
    let mut i = 0;
    while i < events.len() {
        let is_marker = matches!(
            (&events[i], events.get(i + 1), events.get(i + 2)),
            (
                Event::Start(Tag::Paragraph),
                Some(Event::Text(t)),
                Some(Event::End(TagEnd::Paragraph)),
            ) if t.trim() == TOC_MARKER
        );
        if is_marker {
            out.push(Event::Html(CowStr::from(toc.to_string())));
            i += 3;
        } else {
            out.push(events[i].clone());
            i += 1;
        }
    }
    out
}

/// Nested `<ul>` of links mirroring the heading hierarchy.
fn toc_html(headings: &[Heading]) -> String {
    let mut html = String::from("<div class=\"toc\">\n");
    let mut open: Vec<u8> = Vec::new();

    for heading in headings {
        while open.last().is_some_and(|&top| top > heading.level) {
            html.push_str("</li>\n</ul>\n");
            open.pop();
        }
        if open.last() == Some(&heading.level) {
            html.push_str("</li>\n");
        } else {
            html.push_str("<ul>\n");
            open.push(heading.level);
        }
        html.push_str(&format!(
            "<li><a href=\"#{}\">{}</a>",
            html_escape::encode_double_quoted_attribute(&heading.id),
            html_escape::encode_text(&heading.text)
        ));
    }
    while open.pop().is_some() {
        html.push_str("</li>\n</ul>\n");
    }

    html.push_str("</div>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_enable_lesson_extensions() {
        let options = markdown_options();
        assert!(options.contains(Options::ENABLE_TABLES));
        assert!(options.contains(Options::ENABLE_HEADING_ATTRIBUTES));
        assert!(options.contains(Options::ENABLE_FOOTNOTES));
    }

    #[test]
    fn renders_inline_markup() {
        let out = render("This is **bold** and *italic*.");
        assert!(out.html.contains("<strong>bold</strong>"));
        assert!(out.html.contains("<em>italic</em>"));
    }

    #[test]
    fn fenced_code_gets_language_class() {
        let out = render("```python\nprint('oi')\n```\n");
        assert!(
            out.html
                .contains(r#"<div class="codehilite"><pre><code class="language-python">"#)
        );
        assert!(out.html.contains("print(&#39;oi&#39;)") || out.html.contains("print('oi')"));
        assert!(out.html.contains("</code></pre></div>"));
    }

    #[test]
    fn fenced_code_without_language() {
        let out = render("```\nplain\n```\n");
        assert!(out.html.contains(r#"<div class="codehilite"><pre><code>plain"#));
    }

    #[test]
    fn code_block_escapes_html() {
        let out = render("```html\n<div>x</div>\n```\n");
        assert!(out.html.contains("&lt;div&gt;x&lt;/div&gt;"));
    }

    #[test]
    fn hash_comments_in_code_are_not_headings() {
        let out = render("```python\n# comentario\nx = 1\n```\n");
        assert!(out.headings.is_empty());
        assert!(out.html.contains("# comentario"));
    }

    #[test]
    fn renders_tables() {
        let out = render("| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(out.html.contains("<table>"));
        assert!(out.html.contains("<th>a</th>"));
        assert!(out.html.contains("<td>2</td>"));
    }

    #[test]
    fn headings_get_slug_ids() {
        let out = render("# Introdução\n\n## Tipos de Dados\n");
        assert!(out.html.contains(r#"<h1 id="introducao">Introdução</h1>"#));
        assert!(out.html.contains(r#"<h2 id="tipos-de-dados">"#));
        assert_eq!(out.headings.len(), 2);
        assert_eq!(out.headings[1].level, 2);
        assert_eq!(out.headings[1].text, "Tipos de Dados");
    }

    #[test]
    fn duplicate_headings_get_suffixes() {
        let out = render("## Exemplo\n\n## Exemplo\n");
        assert!(out.html.contains(r#"id="exemplo""#));
        assert!(out.html.contains(r#"id="exemplo-2""#));
    }

    #[test]
    fn attribute_list_sets_id_and_class() {
        let out = render("## Setup {#config .destaque}\n");
        assert!(out.html.contains(r#"id="config""#));
        assert!(out.html.contains("destaque"));
        assert_eq!(out.headings[0].id, "config");
        assert_eq!(out.headings[0].text, "Setup");
    }

    #[test]
    fn heading_text_includes_inline_code() {
        let out = render("## Usando `pandas`\n");
        assert_eq!(out.headings[0].text, "Usando pandas");
        assert_eq!(out.headings[0].id, "usando-pandas");
    }

    #[test]
    fn shared_registry_spans_documents() {
        let mut anchors = AnchorRegistry::new();
        let a = render_with_anchors("## Resumo\n", &mut anchors);
        let b = render_with_anchors("## Resumo\n", &mut anchors);
        assert_eq!(a.headings[0].id, "resumo");
        assert_eq!(b.headings[0].id, "resumo-2");
    }

    #[test]
    fn toc_marker_is_replaced() {
        let out = render("[TOC]\n\n# Um\n\n## Dois\n\n# Tres\n");
        assert!(!out.html.contains("[TOC]"));
        assert!(out.html.contains(r#"<div class="toc">"#));
        assert!(out.html.contains(r##"<a href="#um">Um</a>"##));
        assert!(out.html.contains(r##"<a href="#dois">Dois</a>"##));
        assert!(out.html.contains(r##"<a href="#tres">Tres</a>"##));
    }

    #[test]
    fn toc_nesting_is_balanced() {
        let headings = vec![
            Heading { level: 1, id: "a".into(), text: "A".into() },
            Heading { level: 3, id: "b".into(), text: "B".into() },
            Heading { level: 2, id: "c".into(), text: "C".into() },
            Heading { level: 1, id: "d".into(), text: "D".into() },
        ];
        let html = toc_html(&headings);
        assert_eq!(html.matches("<ul>").count(), html.matches("</ul>").count());
        assert_eq!(html.matches("<li>").count(), html.matches("</li>").count());
    }

    #[test]
    fn toc_marker_inside_text_is_kept() {
        let out = render("See [TOC] below.\n");
        assert!(out.html.contains("[TOC]"));
        assert!(!out.html.contains(r#"class="toc""#));
    }

    #[test]
    fn footnotes_use_registry_ids() {
        let out = render("Texto[^nota].\n\n[^nota]: Uma nota.\n");
        assert!(out.html.contains(
            r##"<sup class="footnote-reference"><a href="#fn-nota">1</a></sup>"##
        ));
        assert!(out.html.contains(r#"<div class="footnote-definition" id="fn-nota">"#));
        assert!(out.html.contains("Uma nota."));
    }

    #[test]
    fn footnotes_are_numbered_by_first_use() {
        let out = render("A[^b] e B[^a].\n\n[^a]: primeira\n\n[^b]: segunda\n");
        assert!(out.html.contains(r##"<a href="#fn-b">1</a>"##));
        assert!(out.html.contains(r##"<a href="#fn-a">2</a>"##));
    }

    #[test]
    fn shared_registry_keeps_footnotes_apart() {
        let mut anchors = AnchorRegistry::new();
        anchors.claim("beta".to_string());
        let a = render_with_anchors("Um[^1].\n\n[^1]: nota a\n", &mut anchors);
        let b = render_with_anchors("Dois[^1].\n\n[^1]: nota b\n", &mut anchors);

        assert!(a.html.contains(r##"href="#fn-1""##));
        assert!(a.html.contains(r#"id="fn-1""#));
        assert!(b.html.contains(r##"href="#fn-1-2""##));
        assert!(b.html.contains(r#"id="fn-1-2""#));
        assert!(!b.html.contains(r#"id="fn-1""#));
    }

    #[test]
    fn section_toc_skips_leading_title() {
        let mut anchors = AnchorRegistry::new();
        let out = render_section("# Listas\n\n[TOC]\n\n## Criando\n", &mut anchors);
        assert!(!out.html.contains(r##"href="#listas""##));
        assert!(out.html.contains(r##"<a href="#criando">Criando</a>"##));
        assert_eq!(out.headings.len(), 2);
    }

    #[test]
    fn section_toc_keeps_title_after_marker() {
        let mut anchors = AnchorRegistry::new();
        let out = render_section("[TOC]\n\n# Listas\n\n## Criando\n", &mut anchors);
        assert!(out.html.contains(r##"<a href="#listas">Listas</a>"##));
    }

    #[test]
    fn malformed_markdown_degrades() {
        let out = render("# Title\n\n```python\nnever closed\n\n| broken | table\n[link](");
        assert!(out.html.contains("never closed"));
        assert_eq!(out.headings.len(), 1);
    }

    #[test]
    fn raw_html_passes_through() {
        let out = render("<div id=\"quizContainer\"></div>\n");
        assert!(out.html.contains(r#"<div id="quizContainer"></div>"#));
    }
}
