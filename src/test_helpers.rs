//! Shared test utilities for the lesson-site test suite.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let config = fixture_config(tmp.path());
//! let manifest = scan(tmp.path(), &config).unwrap();
//!
//! let module = find_module(&manifest, "1-Python-Essencial");
//! assert_eq!(module.index_lessons.len(), 2);
//! ```

use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;
use tempfile::TempDir;

use crate::config::{self, SiteConfig};
use crate::types::{Manifest, ModuleSource};

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/content/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/content");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// The fixture tree's `site.toml`, loaded and validated.
pub fn fixture_config(root: &Path) -> SiteConfig {
    config::load_config(root).unwrap()
}

// =========================================================================
// Manifest lookups (panic with a clear message on miss)
// =========================================================================

/// Find a module by name. Panics if not found.
pub fn find_module<'a>(manifest: &'a Manifest, name: &str) -> &'a ModuleSource {
    manifest
        .modules
        .iter()
        .find(|m| m.name == name)
        .unwrap_or_else(|| {
            let names: Vec<&str> = manifest.modules.iter().map(|m| m.name.as_str()).collect();
            panic!("module '{name}' not found. Available: {names:?}")
        })
}

// =========================================================================
// Generated HTML inspection
// =========================================================================

static SECTION_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<section class="module-section" id="([^"]*)">"#).unwrap());

static TOC_HREF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r##"<a class="toc-link" href="#([^"]*)">"##).unwrap());

/// Section anchors of a module page, in document order.
pub fn section_ids(html: &str) -> Vec<String> {
    SECTION_ID_RE
        .captures_iter(html)
        .map(|c| c[1].to_string())
        .collect()
}

/// Navigation link targets of a module page, in document order.
pub fn toc_targets(html: &str) -> Vec<String> {
    TOC_HREF_RE
        .captures_iter(html)
        .map(|c| c[1].to_string())
        .collect()
}
