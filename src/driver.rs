//! Build orchestration.
//!
//! Two entry points:
//!
//! - [`build_all`]: every configured module, in configured order. Each
//!   lesson becomes a page at its mirrored path, then the module page is
//!   written.
//! - [`build_module_only`]: one module's consolidated page, nothing else.
//!
//! Every page and module page is its own unit of failure, and so is listing
//! a module's directory. A unit that fails is recorded in the [`BuildReport`] and the run carries on; callers decide
//! what a non-empty failure list means (the CLI exits non-zero).
//!
//! With `processing.max_processes` above 1, modules are built in parallel on
//! the global rayon pool. Lessons within a module are always built in order,
//! and the report lists modules in configured order either way.

use crate::config::{self, ConfigError};
use crate::generate::{self, BuildContext, BuildError};
use crate::paths;
use crate::scan::{self, ModuleDir, ScanError};
use crate::types::ModuleSource;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{error, info, warn};

#[derive(Error, Debug)]
pub enum DriverError {
    #[error("module directory not found: {}", .0.display())]
    ModuleNotFound(PathBuf),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Outcome of one module.
#[derive(Debug, Default)]
pub struct ModuleReport {
    pub name: String,
    /// Lesson pages written, in build order.
    pub pages: Vec<PathBuf>,
    /// The module page, when one was written.
    pub index: Option<PathBuf>,
    /// Lesson pages not written because the module page takes their path.
    pub shadowed: Vec<PathBuf>,
    pub failures: Vec<BuildError>,
}

/// Outcome of a run.
#[derive(Debug, Default)]
pub struct BuildReport {
    pub modules: Vec<ModuleReport>,
    /// Configured modules with no directory on disk.
    pub skipped: Vec<String>,
}

impl BuildReport {
    pub fn page_count(&self) -> usize {
        self.modules.iter().map(|m| m.pages.len()).sum()
    }

    pub fn index_count(&self) -> usize {
        self.modules.iter().filter(|m| m.index.is_some()).count()
    }

    pub fn failure_count(&self) -> usize {
        self.modules.iter().map(|m| m.failures.len()).sum()
    }

    pub fn is_success(&self) -> bool {
        self.failure_count() == 0
    }
}

/// Load `site.toml` from `root` and prepare the run.
pub fn load_context(root: &Path, output_override: Option<&Path>) -> Result<BuildContext, DriverError> {
    let config = config::load_config(root)?;
    Ok(BuildContext::new(root, config, output_override)?)
}

/// Build every configured module.
///
/// Each module is listed inside its own unit, so a directory that cannot be
/// read fails that module alone.
pub fn build_all(ctx: &BuildContext) -> Result<BuildReport, DriverError> {
    let located = scan::locate_modules(&ctx.root, &ctx.config)?;
    let threads = config::effective_threads(&ctx.config.processing);

    let modules: Vec<ModuleReport> = if threads > 1 {
        located
            .found
            .par_iter()
            .map(|module| scan_and_build(ctx, module))
            .collect()
    } else {
        located
            .found
            .iter()
            .map(|module| scan_and_build(ctx, module))
            .collect()
    };

    Ok(BuildReport {
        modules,
        skipped: located.missing,
    })
}

fn scan_and_build(ctx: &BuildContext, module: &ModuleDir) -> ModuleReport {
    match scan::scan_module(&module.name, &module.dir) {
        Ok(source) => build_module(ctx, &source),
        Err(source) => {
            error!(module = %module.name, "{source}");
            ModuleReport {
                name: module.name.clone(),
                failures: vec![BuildError::Scan {
                    path: module.dir.clone(),
                    source,
                }],
                ..Default::default()
            }
        }
    }
}

/// Build one module: every lesson page, then the module page.
pub fn build_module(ctx: &BuildContext, module: &ModuleSource) -> ModuleReport {
    info!(module = %module.name, lessons = module.lessons.len(), "building module");
    let out_dir = ctx.module_output_dir(&module.name);
    let index_path = ctx.module_index_path(&module.name);
    let mut report = ModuleReport {
        name: module.name.clone(),
        ..Default::default()
    };

    for lesson in &module.lessons {
        let Some(dest) = paths::mirrored_output(lesson, &module.dir, &out_dir) else {
            continue;
        };
        if dest == index_path && module.has_index() {
            warn!(
                lesson = %lesson.display(),
                "lesson page has the module page's path; keeping the module page"
            );
            report.shadowed.push(dest);
            continue;
        }
        match generate::build_page(ctx, lesson, &dest) {
            Ok(()) => report.pages.push(dest),
            Err(e) => {
                error!(lesson = %lesson.display(), "{e}");
                report.failures.push(e);
            }
        }
    }

    write_module_index(ctx, module, &index_path, &mut report);
    report
}

/// Restricted mode: build only the consolidated page of one module.
///
/// `module` is tried relative to the project root first, then as given.
/// The output lands under the module directory's own name.
pub fn build_module_only(ctx: &BuildContext, module: &Path) -> Result<ModuleReport, DriverError> {
    let dir = resolve_module_dir(&ctx.root, module)
        .ok_or_else(|| DriverError::ModuleNotFound(module.to_path_buf()))?;
    let name = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| DriverError::ModuleNotFound(module.to_path_buf()))?;

    let mut report = ModuleReport {
        name: name.clone(),
        ..Default::default()
    };
    let index_lessons = match scan::find_index_lessons(&dir) {
        Ok(found) => found,
        Err(source) => {
            error!(module = %name, "{source}");
            report.failures.push(BuildError::Scan { path: dir, source });
            return Ok(report);
        }
    };

    let source = ModuleSource {
        name: name.clone(),
        index_lessons,
        lessons: Vec::new(),
        dir,
    };
    let index_path = ctx.module_index_path(&name);
    write_module_index(ctx, &source, &index_path, &mut report);
    Ok(report)
}

fn write_module_index(
    ctx: &BuildContext,
    module: &ModuleSource,
    index_path: &Path,
    report: &mut ModuleReport,
) {
    match generate::build_module_index(ctx, &module.name, &module.index_lessons, index_path) {
        Ok(true) => report.index = Some(index_path.to_path_buf()),
        Ok(false) => {}
        Err(e) => {
            error!(module = %module.name, "{e}");
            report.failures.push(e);
        }
    }
}

fn resolve_module_dir(root: &Path, module: &Path) -> Option<PathBuf> {
    let under_root = paths::normalize(&root.join(module));
    if under_root.is_dir() {
        return Some(under_root);
    }
    let as_given = paths::normalize(&std::path::absolute(module).ok()?);
    as_given.is_dir().then_some(as_given)
}
