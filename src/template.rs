//! The HTML shell shared by every generated page.
//!
//! A [`PageTemplate`] is built once per run from the configuration: the
//! embedded stylesheet is combined with the generated color variables, and
//! the footer, language and script list are fixed. Each page then fills the
//! per-page slots ([`PageSlots`]) and gets a complete document back.
//!
//! Page layout:
//!
//! ```text
//! header.site-header   h1 title + dark-mode toggle
//! main#conteudo        article.md-content (rendered lesson or module page)
//! footer.site-footer   "Gerado automaticamente em {date}. ..."
//! <script src>         shared assets, relative to the page
//! <script>             copy buttons, tabs, dark mode
//! ```

use crate::config::{self, SiteConfig};
use maud::{DOCTYPE, Markup, PreEscaped, html};

const CSS_STATIC: &str = include_str!("../static/style.css");
const PAGE_JS: &str = include_str!("../static/page.js");

/// Per-page values substituted into the shell.
#[derive(Debug, Clone, Copy)]
pub struct PageSlots<'a> {
    /// Plain text; escaped on output.
    pub title: &'a str,
    pub body_class: &'a str,
    /// Trusted HTML fragment, inserted as is.
    pub content: &'a str,
    /// Relative URL of the shared asset directory, without trailing slash.
    pub asset_path: &'a str,
    /// Formatted generation timestamp.
    pub generated_at: &'a str,
}

/// Immutable page shell, shared by all builders of a run.
#[derive(Debug, Clone)]
pub struct PageTemplate {
    css: String,
    lang: String,
    footer: String,
    scripts: Vec<String>,
}

impl PageTemplate {
    pub fn new(config: &SiteConfig) -> Self {
        let color_css = config::generate_color_css(&config.colors);
        Self {
            css: format!("{color_css}\n\n{CSS_STATIC}"),
            lang: config.page.lang.clone(),
            footer: config.page.footer.clone(),
            scripts: config.page.scripts.clone(),
        }
    }

    /// Fill the slots and return the finished document.
    pub fn render(&self, slots: &PageSlots<'_>) -> String {
        self.document(slots).into_string()
    }

    fn document(&self, slots: &PageSlots<'_>) -> Markup {
        let footer = self.footer.replace("{date}", slots.generated_at);
        html! {
            (DOCTYPE)
            html lang=(self.lang) {
                head {
                    meta charset="UTF-8";
                    meta name="viewport" content="width=device-width, initial-scale=1.0";
                    title { (slots.title) }
                    style { (PreEscaped(&self.css)) }
                }
                body class=(slots.body_class) {
                    header.site-header {
                        h1 { (slots.title) }
                        button.dark-mode-toggle type="button" aria-pressed="false"
                            aria-label="Alternar modo escuro" onclick="toggleDarkMode()" { "🌙" }
                    }
                    main #conteudo role="main" {
                        article.md-content aria-label="Conteúdo" {
                            (PreEscaped(slots.content))
                        }
                    }
                    footer.site-footer {
                        p { (footer) }
                    }
                    @for script in &self.scripts {
                        script src={ (slots.asset_path) "/" (script) } {}
                    }
                    script { (PreEscaped(PAGE_JS)) }
                }
            }
        }
    }
}
