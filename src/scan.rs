//! Module discovery.
//!
//! Turns the configured module list into a [`Manifest`]: which module
//! directories exist, and which Markdown files each one holds.
//!
//! ## Directory Structure
//!
//! ```text
//! project/
//! ├── site.toml                     # Optional configuration
//! ├── 0-Fundamentos/                # Module (listed in `modules`)
//! │   ├── 01-boas-vindas.md         # Lesson: own page + section of index.html
//! │   └── 02-ambiente.md
//! ├── 1-Python-Essencial/
//! │   ├── 01-tipos-de-dados.md
//! │   ├── exemplos/
//! │   │   └── 01-listas.md          # Nested lesson: own page only
//! │   └── .rascunho.md              # Hidden: ignored
//! └── docs/
//!     ├── assets/                   # progress.js, search.js, quiz.js, site.js
//!     └── html/                     # Generated output
//! ```
//!
//! ## Rules
//!
//! - Modules come from configuration, never from directory listing. A
//!   configured module without a directory is recorded as missing.
//! - Every `*.md` file anywhere under the module becomes a page.
//! - Only `*.md` files directly inside the module become index sections.
//! - Names starting with `.` are skipped, directories included.
//! - Lists are sorted by path; filesystem order is never trusted.

use crate::config::SiteConfig;
use crate::types::{Manifest, ModuleSource};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

/// A configured module whose directory exists, not listed yet.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleDir {
    pub name: String,
    /// Absolute module directory.
    pub dir: PathBuf,
}

/// Configured modules split into those on disk and those missing.
#[derive(Debug, Clone)]
pub struct LocatedModules {
    /// Absolute project root.
    pub root: PathBuf,
    pub found: Vec<ModuleDir>,
    pub missing: Vec<String>,
}

/// Resolve the configured module names against `root` without reading them.
///
/// Listing is left to the caller, one module at a time ([`scan_module`]).
pub fn locate_modules(root: &Path, config: &SiteConfig) -> Result<LocatedModules, ScanError> {
    let root = std::path::absolute(root)?;
    let mut found = Vec::new();
    let mut missing = Vec::new();

    for name in &config.modules {
        let dir = root.join(name);
        if !dir.is_dir() {
            warn!(module = %name, "module directory not found, skipping");
            missing.push(name.clone());
            continue;
        }
        found.push(ModuleDir {
            name: name.clone(),
            dir,
        });
    }

    Ok(LocatedModules {
        root,
        found,
        missing,
    })
}

/// Build the manifest for every configured module under `root`.
pub fn scan(root: &Path, config: &SiteConfig) -> Result<Manifest, ScanError> {
    let located = locate_modules(root, config)?;
    let modules = located
        .found
        .iter()
        .map(|m| scan_module(&m.name, &m.dir))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Manifest {
        root: located.root,
        modules,
        missing: located.missing,
    })
}

/// List the lessons of one module directory.
pub fn scan_module(name: &str, dir: &Path) -> Result<ModuleSource, ScanError> {
    let lessons = find_all_lessons(dir)?;
    let index_lessons = find_index_lessons(dir)?;
    debug!(
        module = %name,
        lessons = lessons.len(),
        sections = index_lessons.len(),
        "scanned module"
    );
    Ok(ModuleSource {
        name: name.to_string(),
        dir: dir.to_path_buf(),
        lessons,
        index_lessons,
    })
}

/// Markdown files directly inside `dir`, sorted by path.
pub fn find_index_lessons(dir: &Path) -> Result<Vec<PathBuf>, ScanError> {
    let mut found = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_file() && !is_hidden_name(&entry.file_name()) && is_markdown(&path)
        {
            found.push(path);
        }
    }
    found.sort();
    Ok(found)
}

/// Markdown files anywhere under `dir`, sorted by path.
pub fn find_all_lessons(dir: &Path) -> Result<Vec<PathBuf>, ScanError> {
    let mut found = Vec::new();
    let walker = WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden_name(e.file_name()));

    for entry in walker {
        let entry = entry?;
        if entry.file_type().is_file() && is_markdown(entry.path()) {
            debug!(path = %entry.path().display(), "found lesson");
            found.push(entry.into_path());
        }
    }
    found.sort();
    Ok(found)
}

fn is_markdown(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "md")
}

fn is_hidden_name(name: &std::ffi::OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}
