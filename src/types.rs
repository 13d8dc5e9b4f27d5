//! Shared types passed between discovery, builders and the CLI.
//!
//! The manifest types are `Serialize` so `lesson-site scan --json` can print
//! exactly what a build would consume.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A module directory found on disk, with its lessons listed in build order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleSource {
    /// Name as configured (directory name relative to the project root).
    pub name: String,
    /// Absolute module directory.
    pub dir: PathBuf,
    /// Every Markdown file in the module tree, sorted by path.
    pub lessons: Vec<PathBuf>,
    /// Markdown files directly inside the module directory, sorted by path.
    /// These become the sections of the consolidated page.
    pub index_lessons: Vec<PathBuf>,
}

impl ModuleSource {
    /// Whether the consolidated page will be written.
    pub fn has_index(&self) -> bool {
        !self.index_lessons.is_empty()
    }
}

/// Everything a full build would touch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    /// Absolute project root.
    pub root: PathBuf,
    /// Configured modules that exist, in configured order.
    pub modules: Vec<ModuleSource>,
    /// Configured modules with no directory on disk.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing: Vec<String>,
}

impl Manifest {
    pub fn lesson_count(&self) -> usize {
        self.modules.iter().map(|m| m.lessons.len()).sum()
    }
}

/// One entry of a consolidated page's navigation block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TocEntry {
    pub title: String,
    /// Fragment id of the lesson's section (without `#`).
    pub anchor: String,
    /// Plain-text preview; may be empty.
    pub preview: String,
}
