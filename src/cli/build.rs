//! `docsplice build` - transform the docs tree into the output directory.
//!
//! ```text
//! docs/                         .docsplice/
//! ├── index.md        ──►       ├── index.md          (transformed)
//! ├── en-US/component/          ├── en-US/component/
//! │   └── button.md   ──►       │   └── button.md     (transformed + footer)
//! └── public/logo.svg ──►       └── public/logo.svg   (copied)
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use rayon::prelude::*;
use serde::Serialize;

use super::common::{collect_source_files, output_path_for, write_if_changed};
use crate::cli::BuildArgs;
use crate::config::SiteConfig;
use crate::logger::ProgressLine;
use crate::transform::{MarkdownTransform, is_markdown};
use crate::utils::plural_count;
use crate::{debug, log};

/// Result of processing one source file.
#[derive(Debug, Clone, Serialize)]
pub struct FileRecord {
    pub source: PathBuf,
    pub output: PathBuf,
    /// Component id, for pages under the component docs directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
    pub contributors: bool,
    /// `false` when the output already had identical content.
    pub written: bool,
    #[serde(skip)]
    pub markdown: bool,
}

/// Summary of a build run.
#[derive(Debug, Default, Serialize)]
pub struct BuildReport {
    pub files: Vec<FileRecord>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failed: Vec<FailedFile>,
}

#[derive(Debug, Serialize)]
pub struct FailedFile {
    pub source: PathBuf,
    pub error: String,
}

impl BuildReport {
    fn pages(&self) -> impl Iterator<Item = &FileRecord> {
        self.files.iter().filter(|f| f.markdown)
    }

    fn summary(&self) -> String {
        let pages = self.pages().count();
        let components = self.pages().filter(|f| f.component.is_some()).count();
        let contributors = self.pages().filter(|f| f.contributors).count();
        let assets = self.files.len() - pages;
        let unchanged = self.files.iter().filter(|f| !f.written).count();

        format!(
            "{}, {} ({} with contributors), {} copied, {} unchanged",
            plural_count(pages, "page"),
            plural_count(components, "component"),
            contributors,
            plural_count(assets, "asset"),
            unchanged
        )
    }
}

/// Transform and copy state shared by `build` and watch mode.
pub struct Builder<'a> {
    config: &'a SiteConfig,
    transform: MarkdownTransform,
    docs_root: PathBuf,
}

impl<'a> Builder<'a> {
    pub fn new(config: &'a SiteConfig) -> Result<Self> {
        Ok(Self {
            config,
            transform: MarkdownTransform::new(config)?,
            docs_root: config.docs_root(),
        })
    }

    pub fn config(&self) -> &SiteConfig {
        self.config
    }

    pub fn transform(&self) -> &MarkdownTransform {
        &self.transform
    }

    pub fn docs_root(&self) -> &Path {
        &self.docs_root
    }

    /// Whether `source` is handled at all (markdown, or assets when copying).
    pub fn accepts(&self, source: &Path) -> bool {
        is_markdown(source) || self.config.build.copy_assets
    }

    /// Transform a markdown page or copy an asset into the output directory.
    pub fn process(&self, source: &Path) -> Result<FileRecord> {
        let output = output_path_for(source, &self.docs_root, self.config.output_dir())?;
        let bytes =
            fs::read(source).with_context(|| format!("failed to read {}", source.display()))?;

        if !is_markdown(source) {
            let written = write_if_changed(&output, &bytes)?;
            return Ok(FileRecord {
                source: source.to_path_buf(),
                output,
                component: None,
                contributors: false,
                written,
                markdown: false,
            });
        }

        let code = String::from_utf8(bytes)
            .with_context(|| format!("{} is not valid UTF-8", source.display()))?;
        // is_markdown was checked above
        let Some(page) = self.transform.transform_page(&code, source) else {
            bail!("{} is not a markdown file", source.display());
        };

        let written = write_if_changed(&output, page.code.as_bytes())?;
        debug!("build"; "{} {}", if written { "wrote" } else { "unchanged" },
            self.config.project_relative(&output).display());

        Ok(FileRecord {
            source: source.to_path_buf(),
            output,
            component: page.component_page.then_some(page.component_id),
            contributors: page.contributors,
            written,
            markdown: true,
        })
    }

    /// Delete the output of a removed source. Returns whether a file was removed.
    pub fn remove(&self, source: &Path) -> Result<bool> {
        let output = output_path_for(source, &self.docs_root, self.config.output_dir())?;
        if !output.is_file() {
            return Ok(false);
        }
        fs::remove_file(&output)
            .with_context(|| format!("failed to remove {}", output.display()))?;
        Ok(true)
    }

    /// Process `files` in parallel, showing progress.
    pub fn process_all(&self, files: &[PathBuf]) -> BuildReport {
        let (pages, assets): (Vec<&PathBuf>, Vec<&PathBuf>) = files
            .iter()
            .filter(|f| self.accepts(f))
            .partition(|f| is_markdown(f));

        let progress = ProgressLine::new(&[("markdown", pages.len()), ("assets", assets.len())]);

        let results: Vec<_> = pages
            .par_iter()
            .map(|f| (f, "markdown"))
            .chain(assets.par_iter().map(|f| (f, "assets")))
            .map(|(source, counter)| {
                let result = self.process(source);
                progress.inc(counter);
                (*source, result)
            })
            .collect();

        progress.finish();

        let mut report = BuildReport::default();
        for (source, result) in results {
            match result {
                Ok(record) => report.files.push(record),
                Err(e) => report.failed.push(FailedFile {
                    source: source.clone(),
                    error: format!("{e:#}"),
                }),
            }
        }
        report
    }
}

/// Entry point for `docsplice build`.
pub fn build_docs(config: &SiteConfig, args: &BuildArgs) -> Result<()> {
    let output_dir = config.output_dir();
    let docs_root = config.docs_root();
    if docs_root.starts_with(output_dir) {
        bail!(
            "output directory {} contains the docs root {}",
            output_dir.display(),
            docs_root.display()
        );
    }

    if config.build.clean && output_dir.exists() {
        debug!("build"; "removing {}", output_dir.display());
        fs::remove_dir_all(output_dir)
            .with_context(|| format!("failed to clean {}", output_dir.display()))?;
    }

    let builder = Builder::new(config)?;
    let files = collect_source_files(&args.paths, builder.docs_root(), output_dir)?;
    let report = builder.process_all(&files);

    log!("build"; "{}", report.summary());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    for failed in &report.failed {
        log!("error"; "{}: {}", config.project_relative(&failed.source).display(), failed.error);
    }

    if args.watch {
        return super::watch::watch_docs(&builder);
    }

    if !report.failed.is_empty() {
        bail!("{} failed", plural_count(report.failed.len(), "file"));
    }
    Ok(())
}
