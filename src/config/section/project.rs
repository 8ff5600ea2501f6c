//! `[project]` section configuration.
//!
//! Locates the documentation and component sources.
//!
//! # Example
//!
//! ```toml
//! [project]
//! root = "."                          # Repository root (relative to config file, `~` allowed)
//! docs = "docs"                       # Docs root (relative to `root`)
//! component_docs = "en-US/component"  # Component pages (relative to `docs`)
//! components = "packages/components"  # Component sources (relative to `root`)
//! ```
//!
//! A page under `component_docs` gets a source footer. The contributors
//! section is only added when `components/<page stem>` exists.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::utils::path::to_url_path;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Repository root. Absolute after config finalization.
    pub root: PathBuf,

    /// Documentation root, relative to `root`.
    pub docs: PathBuf,

    /// Component documentation pages, relative to `docs`.
    pub component_docs: PathBuf,

    /// Component source directories, relative to `root`.
    pub components: PathBuf,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            docs: PathBuf::from("docs"),
            component_docs: PathBuf::from("en-US/component"),
            components: PathBuf::from("packages/components"),
        }
    }
}

impl ProjectConfig {
    pub const DOCS: FieldPath = FieldPath::new("project.docs");
    pub const COMPONENT_DOCS: FieldPath = FieldPath::new("project.component_docs");
    pub const COMPONENTS: FieldPath = FieldPath::new("project.components");

    /// Check that nested directories stay relative.
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        let relative = [
            (Self::DOCS, &self.docs),
            (Self::COMPONENT_DOCS, &self.component_docs),
            (Self::COMPONENTS, &self.components),
        ];
        for (field, path) in relative {
            if path.is_absolute() {
                diag.error_with_hint(
                    field,
                    format!("must be a relative path, got `{}`", path.display()),
                    "paths are resolved against [project].root",
                );
            }
        }
    }

    /// Component docs directory as a repository URL path, e.g.
    /// `docs/en-US/component`.
    pub fn component_docs_repo_path(&self) -> String {
        join_url_paths(&self.docs, &self.component_docs)
    }
}

fn join_url_paths(a: &Path, b: &Path) -> String {
    let (a, b) = (to_url_path(a), to_url_path(b));
    match (a.is_empty(), b.is_empty()) {
        (true, _) => b,
        (_, true) => a,
        _ => format!("{a}/{b}"),
    }
}
