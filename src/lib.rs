//! # Lesson Site
//!
//! A small static site generator for Markdown course material. A course is a
//! list of module directories; every Markdown file in a module becomes a
//! styled HTML page, and every module also gets one consolidated page that
//! strings its top-level lessons together behind a navigation block.
//!
//! # Pipeline
//!
//! ```text
//! site.toml ─┐
//!            ├─ scan      modules/*.md      →  Manifest      (what exists)
//!            ├─ generate  lesson.md         →  lesson.html   (one per lesson)
//!            └─ generate  module/*.md       →  index.html    (one per module)
//! ```
//!
//! Data flows one way: source tree → HTML fragments → pages → output tree.
//! Sources are never modified.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `site.toml` loading, merging over stock defaults, validation, color CSS |
//! | [`scan`] | Module and lesson discovery, producing the [`types::Manifest`] |
//! | [`markdown`] | Markdown → HTML fragment with code classes, heading ids and `[TOC]` |
//! | [`extract`] | Titles from Markdown; previews and heading stripping on fragments |
//! | [`naming`] | Fallback titles, slugs, and per-page unique anchors |
//! | [`template`] | The shared HTML shell ([`template::PageTemplate`]) |
//! | [`generate`] | Lesson page and module page builders |
//! | [`driver`] | Runs builders over modules, collects a [`driver::BuildReport`] |
//! | [`paths`] | Lexical path arithmetic for mirrored output and asset links |
//! | [`types`] | Shared serializable types |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Maud for the Page Shell
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/). Titles and
//! previews are escaped automatically; only rendered Markdown and configured
//! intro panels are inserted as trusted HTML.
//!
//! ## Explicit Module List
//!
//! Modules are listed in `site.toml`, not discovered. Directories that are
//! not part of the course (scripts, data, the output itself) are never
//! mistaken for lessons, and a listed module that is missing is skipped with
//! a warning rather than failing the build.
//!
//! ## One Timestamp per Run
//!
//! The footer timestamp is formatted once when the run starts and shared by
//! every page. Fixing it (see [`generate::BuildContext::with_generated_at`])
//! makes two builds byte-identical.
//!
//! ## Failure Isolation
//!
//! Each page and each module page succeeds or fails on its own. A broken
//! lesson shows up in the report and the exit code; it does not stop the
//! rest of the course from being built.

pub mod config;
pub mod driver;
pub mod extract;
pub mod generate;
pub mod markdown;
pub mod naming;
pub mod output;
pub mod paths;
pub mod scan;
pub mod template;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
