//! Page builders.
//!
//! Two kinds of output are produced, both wrapped in the shared
//! [`PageTemplate`]:
//!
//! - **Lesson pages**: one per Markdown file, at the mirrored path with the
//!   extension swapped to `.html` ([`build_page`]).
//! - **Module pages**: one consolidated `index.html` per module, holding the
//!   intro panel, a navigation block and one section per top-level lesson
//!   ([`build_module_index`]).
//!
//! ## Module Page Structure
//!
//! ```text
//! div.module-content
//! ├── section.hero                      (intro panel, if configured)
//! ├── nav.module-toc-summary
//! │   ├── h2 "📚 Neste módulo"
//! │   └── ul.toc-list
//! │       └── li.toc-item > a.toc-link[href=#anchor]
//! │                         ├── strong  (lesson title)
//! │                         └── span.toc-preview
//! └── section.module-section#anchor     (one per lesson, in path order)
//!     ├── h2  (lesson title)
//!     └── rendered body, leading h1/h2 removed
//! ```
//!
//! Section anchors and every heading and footnote id inside the sections come
//! from one [`AnchorRegistry`], so fragment links on the consolidated page are
//! unique.
//! Section anchors are claimed first, which keeps them stable when a lesson
//! body repeats another lesson's title.

use crate::config::SiteConfig;
use crate::extract::{extract_preview, extract_title, strip_leading_heading};
use crate::markdown;
use crate::naming::{AnchorRegistry, fallback_title};
use crate::paths;
use crate::scan::ScanError;
use crate::template::{PageSlots, PageTemplate};
use crate::types::TocEntry;
use chrono::Local;
use maud::{Markup, PreEscaped, html};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to list {}: {source}", path.display())]
    Scan {
        path: PathBuf,
        #[source]
        source: ScanError,
    },
}

impl BuildError {
    /// The file the failed operation was about.
    pub fn path(&self) -> &Path {
        match self {
            BuildError::Read { path, .. }
            | BuildError::Write { path, .. }
            | BuildError::Scan { path, .. } => path,
        }
    }
}

/// Everything that stays fixed for one build run.
///
/// Built once and shared by reference; builders never mutate it.
#[derive(Debug, Clone)]
pub struct BuildContext {
    pub config: SiteConfig,
    pub template: PageTemplate,
    /// Absolute project root.
    pub root: PathBuf,
    /// Absolute output root.
    pub output_dir: PathBuf,
    /// Absolute directory of the shared front-end assets.
    pub assets_dir: PathBuf,
    /// Timestamp printed in every footer of this run.
    pub generated_at: String,
}

impl BuildContext {
    /// Resolve directories against `root` and stamp the run with the current
    /// local time.
    ///
    /// `output_override` replaces the configured output directory; a relative
    /// override is taken relative to the working directory.
    pub fn new(
        root: &Path,
        config: SiteConfig,
        output_override: Option<&Path>,
    ) -> std::io::Result<Self> {
        let root = paths::normalize(&std::path::absolute(root)?);
        let output_dir = match output_override {
            Some(dir) => paths::normalize(&std::path::absolute(dir)?),
            None => paths::normalize(&root.join(&config.output_dir)),
        };
        let assets_dir = paths::normalize(&root.join(&config.assets_dir));
        let generated_at = Local::now().format(&config.page.date_format).to_string();
        let template = PageTemplate::new(&config);

        Ok(Self {
            config,
            template,
            root,
            output_dir,
            assets_dir,
            generated_at,
        })
    }

    /// Replace the run timestamp. Two runs with the same timestamp produce
    /// byte-identical output.
    pub fn with_generated_at(mut self, generated_at: impl Into<String>) -> Self {
        self.generated_at = generated_at.into();
        self
    }

    /// Output directory of a module.
    pub fn module_output_dir(&self, module_name: &str) -> PathBuf {
        self.output_dir.join(module_name)
    }

    /// Consolidated page path of a module.
    pub fn module_index_path(&self, module_name: &str) -> PathBuf {
        self.module_output_dir(module_name)
            .join(&self.config.index_file)
    }

    /// Relative URL from the page at `dest` to the asset directory.
    pub fn asset_path_for(&self, dest: &Path) -> String {
        let page_dir = dest.parent().unwrap_or(Path::new(""));
        paths::relative_dir(page_dir, &self.assets_dir)
    }

    /// Wrap an HTML fragment in the page shell for `dest`.
    pub fn render_page(&self, title: &str, content: &str, dest: &Path) -> String {
        let asset_path = self.asset_path_for(dest);
        self.template.render(&PageSlots {
            title,
            body_class: &self.config.page.body_class,
            content,
            asset_path: &asset_path,
            generated_at: &self.generated_at,
        })
    }
}

// ============================================================================
// Lesson pages
// ============================================================================

/// Convert one Markdown file into a complete page at `dest`.
///
/// Parent directories are created and an existing file is overwritten.
pub fn build_page(ctx: &BuildContext, source: &Path, dest: &Path) -> Result<(), BuildError> {
    let text = read_source(source)?;
    let title = extract_title(&text, &fallback_title(&file_stem(source)));
    let rendered = markdown::render(&text);
    let page = ctx.render_page(&title, &rendered.html, dest);
    write_output(dest, &page)?;
    info!(source = %source.display(), dest = %dest.display(), "wrote page");
    Ok(())
}

// ============================================================================
// Module pages
// ============================================================================

/// One lesson as it appears on the consolidated page.
#[derive(Debug, Clone, PartialEq)]
pub struct LessonSection {
    pub entry: TocEntry,
    /// Rendered body without its leading h1/h2.
    pub body: String,
}

/// Build the consolidated page of a module from its top-level lessons.
///
/// `lessons` must already be in display order. An empty list writes nothing
/// and returns `Ok(false)`.
pub fn build_module_index(
    ctx: &BuildContext,
    module_name: &str,
    lessons: &[PathBuf],
    dest: &Path,
) -> Result<bool, BuildError> {
    if lessons.is_empty() {
        debug!(module = %module_name, "no top-level lessons, skipping module page");
        return Ok(false);
    }

    let sections = load_sections(ctx, lessons)?;
    let content = assemble_module_content(
        ctx.config.intro_for(module_name),
        &ctx.config.module_index.toc_heading,
        &sections,
    );
    let title = module_title(module_name, &ctx.config.module_index.title_suffix);
    let page = ctx.render_page(&title, &content.into_string(), dest);
    write_output(dest, &page)?;
    info!(module = %module_name, sections = sections.len(), dest = %dest.display(), "wrote module page");
    Ok(true)
}

/// Read, title and render every lesson of a module page.
pub fn load_sections(ctx: &BuildContext, lessons: &[PathBuf]) -> Result<Vec<LessonSection>, BuildError> {
    let settings = &ctx.config.module_index;

    let mut sources = Vec::with_capacity(lessons.len());
    for path in lessons {
        let text = read_source(path)?;
        let title = extract_title(&text, &fallback_title(&file_stem(path)));
        sources.push((title, text));
    }

    let mut anchors = AnchorRegistry::new();
    let section_anchors: Vec<String> = sources
        .iter()
        .map(|(title, _)| anchors.anchor_for(title, &settings.default_anchor))
        .collect();

    let sections = sources
        .into_iter()
        .zip(section_anchors)
        .map(|((title, text), anchor)| {
            let rendered = markdown::render_section(&text, &mut anchors);
            let body = strip_leading_heading(&rendered.html).to_string();
            let preview = extract_preview(&body, settings.preview_length, &settings.truncation_marker);
            LessonSection {
                entry: TocEntry {
                    title,
                    anchor,
                    preview,
                },
                body,
            }
        })
        .collect();

    Ok(sections)
}

/// The inner HTML of a module page: intro, navigation block, sections.
pub fn assemble_module_content(
    intro: Option<&str>,
    toc_heading: &str,
    sections: &[LessonSection],
) -> Markup {
    html! {
        div.module-content {
            @if let Some(intro) = intro {
                (PreEscaped(intro))
            }
            (render_module_toc(toc_heading, sections))
            @for section in sections {
                section.module-section id=(section.entry.anchor) {
                    h2 { (section.entry.title) }
                    (PreEscaped(&section.body))
                }
            }
        }
    }
}

fn render_module_toc(heading: &str, sections: &[LessonSection]) -> Markup {
    html! {
        nav.module-toc-summary {
            h2 { (heading) }
            ul.toc-list {
                @for section in sections {
                    li.toc-item {
                        a.toc-link href={ "#" (section.entry.anchor) } {
                            strong { (section.entry.title) }
                            span.toc-preview { (section.entry.preview) }
                        }
                    }
                }
            }
        }
    }
}

/// Page title of a module: directory name with `-` turned into spaces, plus
/// the configured suffix.
pub fn module_title(module_name: &str, suffix: &str) -> String {
    let base = Path::new(module_name)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| module_name.to_string());
    format!("{}{}", base.replace('-', " "), suffix)
}

// ============================================================================
// File helpers
// ============================================================================

fn read_source(path: &Path) -> Result<String, BuildError> {
    fs::read_to_string(path).map_err(|source| BuildError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn write_output(dest: &Path, contents: &str) -> Result<(), BuildError> {
    let write = || -> std::io::Result<()> {
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(dest, contents)
    };
    write().map_err(|source| BuildError::Write {
        path: dest.to_path_buf(),
        source,
    })
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
