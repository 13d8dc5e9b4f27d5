//! Path arithmetic for the output tree.
//!
//! All functions here are lexical: nothing touches the filesystem, so they
//! work for output directories that do not exist yet.

use std::path::{Component, Path, PathBuf};

/// Resolve `.` and `..` components without consulting the filesystem.
///
/// A `..` that would climb above the first component is kept as is.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }
    out.iter().collect()
}

/// Relative URL from directory `from` to directory `to`, `/`-separated.
///
/// Both paths should be absolute (or both relative to the same base).
/// Identical directories yield `"."`.
///
/// ```
/// use lesson_site::paths::relative_dir;
/// use std::path::Path;
///
/// assert_eq!(
///     relative_dir(Path::new("/p/docs/html/mod"), Path::new("/p/docs/assets")),
///     "../../assets"
/// );
/// ```
pub fn relative_dir(from: &Path, to: &Path) -> String {
    let from = normalize(from);
    let to = normalize(to);
    let from_parts: Vec<_> = from.components().collect();
    let to_parts: Vec<_> = to.components().collect();

    let common = from_parts
        .iter()
        .zip(&to_parts)
        .take_while(|(a, b)| a == b)
        .count();

    let mut segments: Vec<String> = vec!["..".to_string(); from_parts.len() - common];
    segments.extend(
        to_parts[common..]
            .iter()
            .map(|c| c.as_os_str().to_string_lossy().into_owned()),
    );

    if segments.is_empty() {
        ".".to_string()
    } else {
        segments.join("/")
    }
}

/// Destination of a lesson's page: `source` relative to `module_dir`,
/// re-rooted under `output_module_dir`, with the extension set to `.html`.
///
/// Returns `None` if `source` is not inside `module_dir`.
pub fn mirrored_output(source: &Path, module_dir: &Path, output_module_dir: &Path) -> Option<PathBuf> {
    let relative = source.strip_prefix(module_dir).ok()?;
    Some(output_module_dir.join(relative).with_extension("html"))
}

/// Display form of `path` relative to `base`, `/`-separated.
///
/// Falls back to the full path when `path` is not under `base`.
pub fn display_relative(path: &Path, base: &Path) -> String {
    let Ok(shown) = path.strip_prefix(base) else {
        return path.to_string_lossy().into_owned();
    };
    shown
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
