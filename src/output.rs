//! CLI output formatting.
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects. Paths are shown relative to
//! the project root whenever they live under it.
//!
//! # Output Format
//!
//! ## Scan
//!
//! ```text
//! Modules
//! 001 0-Fundamentos (2 lessons, 2 sections)
//!     01-boas-vindas.md
//!     02-ambiente.md
//! 002 1-Python-Essencial (3 lessons, 2 sections)
//!     01-tipos-de-dados.md
//!     02-listas.md
//!     exemplos/01-exemplo-listas.md (page only)
//!
//! Missing
//!     9-Ausente
//!
//! Found 5 lessons in 2 modules
//! ```
//!
//! ## Build
//!
//! ```text
//! 001 0-Fundamentos → docs/html/0-Fundamentos/index.html
//!     docs/html/0-Fundamentos/01-boas-vindas.html
//!     docs/html/0-Fundamentos/02-ambiente.html
//! 002 2-Vazio (no module page)
//!
//! Skipped (no directory): 9-Ausente
//! Generated 2 pages, 1 module page, 0 failures
//! ```

use crate::driver::{BuildReport, ModuleReport};
use crate::paths::display_relative;
use crate::types::Manifest;
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, singular: &str, plural: &str) -> String {
    if n == 1 {
        format!("{n} {singular}")
    } else {
        format!("{n} {plural}")
    }
}

// ============================================================================
// Scan
// ============================================================================

/// Discovered modules and lessons, one lesson per line.
pub fn format_scan_output(manifest: &Manifest) -> Vec<String> {
    let mut lines = vec!["Modules".to_string()];

    for (i, module) in manifest.modules.iter().enumerate() {
        lines.push(format!(
            "{} {} ({}, {})",
            format_index(i + 1),
            module.name,
            plural(module.lessons.len(), "lesson", "lessons"),
            plural(module.index_lessons.len(), "section", "sections"),
        ));
        for lesson in &module.lessons {
            let shown = display_relative(lesson, &module.dir);
            if module.index_lessons.contains(lesson) {
                lines.push(format!("{}{}", indent(1), shown));
            } else {
                lines.push(format!("{}{} (page only)", indent(1), shown));
            }
        }
    }

    if !manifest.missing.is_empty() {
        lines.push(String::new());
        lines.push("Missing".to_string());
        for name in &manifest.missing {
            lines.push(format!("{}{}", indent(1), name));
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "Found {} in {}",
        plural(manifest.lesson_count(), "lesson", "lessons"),
        plural(manifest.modules.len(), "module", "modules"),
    ));
    lines
}

pub fn print_scan_output(manifest: &Manifest) {
    for line in format_scan_output(manifest) {
        println!("{}", line);
    }
}

/// Manifest as pretty-printed JSON.
pub fn format_scan_json(manifest: &Manifest) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(manifest)
}

// ============================================================================
// Build
// ============================================================================

/// Pages written per module, failures, skipped modules and a summary line.
pub fn format_build_report(report: &BuildReport, root: &Path) -> Vec<String> {
    let mut lines = Vec::new();

    for (i, module) in report.modules.iter().enumerate() {
        lines.extend(format_module_report(i + 1, module, root));
    }

    if !report.skipped.is_empty() {
        lines.push(String::new());
        lines.push(format!("Skipped (no directory): {}", report.skipped.join(", ")));
    }

    lines.push(format_summary(report));
    lines
}

/// Lines for one module: header with the module page, then each page.
pub fn format_module_report(pos: usize, module: &ModuleReport, root: &Path) -> Vec<String> {
    let mut lines = Vec::new();
    let header = match &module.index {
        Some(index) => format!(
            "{} {} → {}",
            format_index(pos),
            module.name,
            display_relative(index, root)
        ),
        None => format!("{} {} (no module page)", format_index(pos), module.name),
    };
    lines.push(header);

    for page in &module.pages {
        lines.push(format!("{}{}", indent(1), display_relative(page, root)));
    }
    for page in &module.shadowed {
        lines.push(format!(
            "{}{} (replaced by module page)",
            indent(1),
            display_relative(page, root)
        ));
    }
    for failure in &module.failures {
        lines.push(format!("{}FAILED: {}", indent(1), failure));
    }
    lines
}

fn format_summary(report: &BuildReport) -> String {
    format!(
        "Generated {}, {}, {}",
        plural(report.page_count(), "page", "pages"),
        plural(report.index_count(), "module page", "module pages"),
        plural(report.failure_count(), "failure", "failures"),
    )
}

pub fn print_build_report(report: &BuildReport, root: &Path) {
    for line in format_build_report(report, root) {
        println!("{}", line);
    }
}
