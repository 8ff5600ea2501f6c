//! Markdown source transform.
//!
//! Rewrites one markdown page before the site generator sees it:
//!
//! ```text
//! source ─► extract <vp-script setup> ─► component footer? ─► splice ─► output
//!                 │                            │                 ▲
//!                 └──── script_setups ─────────┴── footers ──────┘
//! ```
//!
//! - [`script`] - `<vp-script setup>` extraction, `<script setup>` wrapping
//! - [`splice`] - insertion point detection, header/footer splicing
//! - [`footer`] - source links and contributors for component pages

pub mod footer;
pub mod script;
pub mod splice;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use url::Url;

use crate::config::SiteConfig;
use crate::utils::path::{clean_path, to_url_path};
use footer::{ComponentFooter, RepoLinks};
use script::{combine_script_setup, extract_script_setup};
use splice::combine_markdown;

/// Placeholder replaced by the component id in the demo import template.
pub const ID_PLACEHOLDER: &str = "{id}";

/// Fragments collected while transforming a single page.
///
/// Every list keeps insertion order; the splice joins them as-is.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Append {
    pub headers: Vec<String>,
    pub footers: Vec<String>,
    pub script_setups: Vec<String>,
}

/// Outcome of transforming one markdown page.
#[derive(Debug, Clone)]
pub struct TransformedPage {
    /// Rewritten markdown.
    pub code: String,
    /// File stem of the page.
    pub component_id: String,
    /// Page lives under the component docs directory.
    pub component_page: bool,
    /// A source directory exists for the component (contributors emitted).
    pub contributors: bool,
}

/// The markdown transform hook.
#[derive(Debug, Clone)]
pub struct MarkdownTransform {
    /// Absolute component docs directory; pages below it get a footer.
    component_docs: PathBuf,
    /// Demo import template containing [`ID_PLACEHOLDER`].
    demo_glob: String,
    footer: ComponentFooter,
}

impl MarkdownTransform {
    /// Build the transform from a finalized configuration.
    pub fn new(config: &SiteConfig) -> Result<Self> {
        let host = Url::parse(&config.repo.host)
            .with_context(|| format!("invalid repo host `{}`", config.repo.host))?;

        let links = RepoLinks::new(
            host,
            config.repo.name.as_str(),
            config.repo.branch_or_default(),
            config.project.component_docs_repo_path(),
            to_url_path(&config.project.components),
        );
        let footer = ComponentFooter::new(
            links,
            config.components_root(),
            &config.script.locale_composable,
            &config.script.footer_locale,
        );

        Ok(Self {
            component_docs: config.component_docs_root(),
            demo_glob: config.script.demo_glob.clone(),
            footer,
        })
    }

    /// Transform `code` loaded from `id`.
    ///
    /// Returns `None` for non-markdown ids; callers keep the input as-is.
    pub fn transform(&self, code: &str, id: &Path) -> Option<String> {
        self.transform_page(code, id).map(|page| page.code)
    }

    /// Like [`transform`](Self::transform) but always yields text.
    pub fn transform_or_passthrough(&self, code: &str, id: &Path) -> String {
        self.transform(code, id).unwrap_or_else(|| code.to_string())
    }

    /// Transform and report what was injected.
    pub fn transform_page(&self, code: &str, id: &Path) -> Option<TransformedPage> {
        if !is_markdown(id) {
            return None;
        }

        let component_id = id
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut append = Append {
            script_setups: vec![self.demo_import(&component_id)],
            ..Append::default()
        };

        let code = extract_script_setup(code.to_string(), &mut append);

        let component_page = self.is_component_page(id);
        let contributors = component_page && self.footer.apply(&component_id, &mut append);

        let mut headers = Vec::with_capacity(append.headers.len() + 1);
        headers.push(combine_script_setup(&append.script_setups));
        headers.extend(append.headers);

        crate::debug!("transform"; "{} ({} script fragments, {} footers)",
            id.display(), append.script_setups.len(), append.footers.len());

        Some(TransformedPage {
            code: combine_markdown(&code, &headers, &append.footers),
            component_id,
            component_page,
            contributors,
        })
    }

    /// Whether `id` is below the component docs directory.
    ///
    /// `.` and `..` in `id` are folded first; symlinks must already be
    /// resolved by the caller.
    pub fn is_component_page(&self, id: &Path) -> bool {
        clean_path(id).starts_with(&self.component_docs)
    }

    pub fn component_docs(&self) -> &Path {
        &self.component_docs
    }

    fn demo_import(&self, component_id: &str) -> String {
        format!(
            "const demos = import.meta.globEager('{}')",
            self.demo_glob.replace(ID_PLACEHOLDER, component_id)
        )
    }
}

/// Whether `id` names a markdown file.
pub fn is_markdown(id: &Path) -> bool {
    id.extension().is_some_and(|ext| ext == "md")
}
