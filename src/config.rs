//! Site configuration module.
//!
//! Handles loading, validating and merging `site.toml`. The file lives at the
//! project root and is optional: stock defaults reproduce the course layout
//! (seven numbered modules, output in `docs/html`, assets in `docs/assets`).
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! modules = ["0-Fundamentos", "1-Python-Essencial", ...]
//! output_dir = "docs/html"   # Generated pages (relative to the project root)
//! assets_dir = "docs/assets" # Shared front-end scripts referenced by pages
//! index_file = "index.html"  # Consolidated module page name
//!
//! [page]
//! lang = "pt-BR"
//! body_class = "presentation"
//! date_format = "%d/%m/%Y %H:%M"
//! footer = "Gerado automaticamente em {date}. Paleta: ColorBrewer BuGn."
//! scripts = ["progress.js", "search.js", "quiz.js", "site.js"]
//!
//! [module_index]
//! title_suffix = " — Módulo completo"
//! toc_heading = "📚 Neste módulo"
//! preview_length = 150
//! truncation_marker = "..."
//! default_anchor = "sec"
//!
//! [colors.light]  # and [colors.dark], used for the dark-mode toggle
//! background = "#e5f5f9"
//! ...
//!
//! [processing]
//! max_processes = 1          # Modules built in parallel (capped at CPU cores)
//!
//! [intros]
//! "0-Fundamentos" = "<section class=\"hero\">...</section>"
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse: override just the values you want. Tables are
//! merged key by key over the stock defaults; arrays and scalars replace.
//! Unknown keys are rejected to catch typos early.

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Name of the configuration file looked up in the project root.
pub const CONFIG_FILE: &str = "site.toml";

const FUNDAMENTOS_INTRO: &str = include_str!("../static/intro-fundamentos.html");

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `site.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Module directories, in build order. Not auto-discovered.
    pub modules: Vec<String>,
    /// Root of the generated HTML tree.
    pub output_dir: String,
    /// Directory holding the shared front-end scripts.
    pub assets_dir: String,
    /// File name of each module's consolidated page.
    pub index_file: String,
    /// Page shell settings.
    pub page: PageConfig,
    /// Consolidated module page settings.
    pub module_index: ModuleIndexConfig,
    /// Light and dark color schemes.
    pub colors: ColorConfig,
    /// Parallel build settings.
    pub processing: ProcessingConfig,
    /// Introductory HTML panel per module name.
    pub intros: BTreeMap<String, String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            modules: [
                "0-Fundamentos",
                "1-Python-Essencial",
                "2-Analise-Geoespacial",
                "3-Visualizacao-Web",
                "4-Casos-Praticos",
                "5-Estatistica-Aplicada",
                "6-Machine-Learning",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            output_dir: "docs/html".to_string(),
            assets_dir: "docs/assets".to_string(),
            index_file: "index.html".to_string(),
            page: PageConfig::default(),
            module_index: ModuleIndexConfig::default(),
            colors: ColorConfig::default(),
            processing: ProcessingConfig::default(),
            intros: BTreeMap::from([(
                "0-Fundamentos".to_string(),
                FUNDAMENTOS_INTRO.trim().to_string(),
            )]),
        }
    }
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.modules.iter().any(|m| m.trim().is_empty()) {
            return Err(ConfigError::Validation(
                "modules entries must not be empty".into(),
            ));
        }
        if !self.index_file.ends_with(".html") || self.index_file.contains(['/', '\\']) {
            return Err(ConfigError::Validation(
                "index_file must be a plain file name ending in .html".into(),
            ));
        }
        if self.module_index.preview_length == 0 {
            return Err(ConfigError::Validation(
                "module_index.preview_length must be greater than 0".into(),
            ));
        }
        let anchor = &self.module_index.default_anchor;
        if anchor.is_empty() || crate::naming::slugify(anchor) != *anchor {
            return Err(ConfigError::Validation(format!(
                "module_index.default_anchor must be a non-empty slug, got {anchor:?}"
            )));
        }
        if StrftimeItems::new(&self.page.date_format).any(|item| matches!(item, Item::Error)) {
            return Err(ConfigError::Validation(format!(
                "page.date_format is not a valid strftime format: {:?}",
                self.page.date_format
            )));
        }
        if self.page.scripts.iter().any(|s| s.trim().is_empty()) {
            return Err(ConfigError::Validation(
                "page.scripts entries must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Introductory panel for a module, if one is configured.
    pub fn intro_for(&self, module_name: &str) -> Option<&str> {
        self.intros
            .get(module_name)
            .map(String::as_str)
            .filter(|html| !html.trim().is_empty())
    }
}

/// Settings for the HTML shell shared by every generated page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PageConfig {
    /// `lang` attribute of the `<html>` element.
    pub lang: String,
    /// CSS class on `<body>`.
    pub body_class: String,
    /// `strftime` format of the generation timestamp.
    pub date_format: String,
    /// Footer text; `{date}` is replaced with the generation timestamp.
    pub footer: String,
    /// Scripts (relative to `assets_dir`) referenced at the end of every page.
    pub scripts: Vec<String>,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            lang: "pt-BR".to_string(),
            body_class: "presentation".to_string(),
            date_format: "%d/%m/%Y %H:%M".to_string(),
            footer: "Gerado automaticamente em {date}. Paleta: ColorBrewer BuGn.".to_string(),
            scripts: ["progress.js", "search.js", "quiz.js", "site.js"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

/// Settings for the consolidated per-module page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModuleIndexConfig {
    /// Appended to the module name to form the page title.
    pub title_suffix: String,
    /// Heading of the navigation block.
    pub toc_heading: String,
    /// Maximum preview length in characters.
    pub preview_length: usize,
    /// Appended to previews that were cut.
    pub truncation_marker: String,
    /// Anchor used when a title slugs to nothing.
    pub default_anchor: String,
}

impl Default for ModuleIndexConfig {
    fn default() -> Self {
        Self {
            title_suffix: " — Módulo completo".to_string(),
            toc_heading: "📚 Neste módulo".to_string(),
            preview_length: 150,
            truncation_marker: "...".to_string(),
            default_anchor: crate::naming::DEFAULT_ANCHOR.to_string(),
        }
    }
}

/// Parallel build settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of modules built at once.
    /// When absent, modules are built one after another.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective worker count from config.
///
/// - `None` → 1 (sequential)
/// - `Some(n)` → `clamp(n, 1, cores)`
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.unwrap_or(1).clamp(1, cores)
}

/// Color configuration for light and dark modes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    /// Light mode color scheme.
    pub light: ColorScheme,
    /// Dark mode color scheme (`body.dark-mode`).
    pub dark: ColorScheme,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            light: ColorScheme::default_light(),
            dark: ColorScheme::default_dark(),
        }
    }
}

/// Individual color scheme (light or dark).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorScheme {
    /// Page background.
    pub background: String,
    /// Section/card background.
    pub surface: String,
    /// Primary text color.
    pub text: String,
    /// Muted text (previews, footer).
    pub text_muted: String,
    /// Accent color (headings, borders, buttons).
    pub accent: String,
    /// Darker accent (header gradient end, hover states).
    pub accent_strong: String,
    /// Soft border color.
    pub border: String,
    /// Inline code background.
    pub code_background: String,
}

impl ColorScheme {
    /// ColorBrewer BuGn palette.
    pub fn default_light() -> Self {
        Self {
            background: "#e5f5f9".to_string(),
            surface: "#ffffff".to_string(),
            text: "#062b1e".to_string(),
            text_muted: "#555555".to_string(),
            accent: "#2ca25f".to_string(),
            accent_strong: "#1e7d5a".to_string(),
            border: "#99d8c9".to_string(),
            code_background: "#e5f5f9".to_string(),
        }
    }

    pub fn default_dark() -> Self {
        Self {
            background: "#0d1b16".to_string(),
            surface: "#16251f".to_string(),
            text: "#e0f2ea".to_string(),
            text_muted: "#9bb5aa".to_string(),
            accent: "#4ec98a".to_string(),
            accent_strong: "#2ca25f".to_string(),
            border: "#2f4a3f".to_string(),
            code_background: "#1e2d27".to_string(),
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_light()
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged onto.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `site.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(root: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = root.join(CONFIG_FILE);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `site.toml` in the project root.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `site.toml`.
///
/// Used by the `gen-config` CLI command. The `[intros]` table is left out:
/// the stock `0-Fundamentos` panel still applies unless overridden.
pub fn stock_config_toml() -> &'static str {
    r##"# lesson-site configuration
# =========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys cause an error.

# Module directories, in build order (relative to the project root).
modules = [
    "0-Fundamentos",
    "1-Python-Essencial",
    "2-Analise-Geoespacial",
    "3-Visualizacao-Web",
    "4-Casos-Praticos",
    "5-Estatistica-Aplicada",
    "6-Machine-Learning",
]

# Where generated pages go, and where the shared scripts live.
output_dir = "docs/html"
assets_dir = "docs/assets"

# File name of each module's consolidated page.
index_file = "index.html"

# ---------------------------------------------------------------------------
# Page shell
# ---------------------------------------------------------------------------
[page]
lang = "pt-BR"
body_class = "presentation"

# strftime format of the generation timestamp shown in the footer.
date_format = "%d/%m/%Y %H:%M"

# {date} is replaced with the generation timestamp.
footer = "Gerado automaticamente em {date}. Paleta: ColorBrewer BuGn."

# Scripts referenced from every page, relative to assets_dir.
scripts = ["progress.js", "search.js", "quiz.js", "site.js"]

# ---------------------------------------------------------------------------
# Consolidated module page
# ---------------------------------------------------------------------------
[module_index]
title_suffix = " — Módulo completo"
toc_heading = "📚 Neste módulo"

# Lesson previews in the navigation block: character budget and marker.
preview_length = 150
truncation_marker = "..."

# Anchor used when a lesson title has no letters or digits.
default_anchor = "sec"

# ---------------------------------------------------------------------------
# Colors - light mode (default)
# ---------------------------------------------------------------------------
[colors.light]
background = "#e5f5f9"
surface = "#ffffff"
text = "#062b1e"
text_muted = "#555555"
accent = "#2ca25f"
accent_strong = "#1e7d5a"
border = "#99d8c9"
code_background = "#e5f5f9"

# ---------------------------------------------------------------------------
# Colors - dark mode (toggle button / saved preference)
# ---------------------------------------------------------------------------
[colors.dark]
background = "#0d1b16"
surface = "#16251f"
text = "#e0f2ea"
text_muted = "#9bb5aa"
accent = "#4ec98a"
accent_strong = "#2ca25f"
border = "#2f4a3f"
code_background = "#1e2d27"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Modules built at once. Omit for sequential builds.
# max_processes = 4

# ---------------------------------------------------------------------------
# Introductory panels, keyed by module directory name (raw HTML)
# ---------------------------------------------------------------------------
# [intros]
# "1-Python-Essencial" = "<section class=\"hero\"><h2>Python</h2></section>"
"##
}

/// Generate CSS custom properties from color config.
///
/// Light colors apply to `:root`; dark colors apply when `body` carries the
/// `dark-mode` class set by the page's toggle script.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    format!(
        r#":root {{
{light}
}}

body.dark-mode {{
{dark}
}}"#,
        light = scheme_variables(&colors.light),
        dark = scheme_variables(&colors.dark),
    )
}

fn scheme_variables(scheme: &ColorScheme) -> String {
    [
        ("--color-bg", &scheme.background),
        ("--color-surface", &scheme.surface),
        ("--color-text", &scheme.text),
        ("--color-text-muted", &scheme.text_muted),
        ("--color-accent", &scheme.accent),
        ("--color-accent-strong", &scheme.accent_strong),
        ("--color-border", &scheme.border),
        ("--color-code-bg", &scheme.code_background),
    ]
    .iter()
    .map(|(name, value)| format!("    {name}: {value};"))
    .collect::<Vec<_>>()
    .join("\n")
}
