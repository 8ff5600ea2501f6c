//! `docsplice transform` - run the transform on one file.
//!
//! Non-markdown files pass through unchanged, the same as in a dev server.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use super::common::write_if_changed;
use crate::config::SiteConfig;
use crate::transform::MarkdownTransform;
use crate::utils::path::resolve_path;
use crate::{debug, log};

/// Transform `file` and print it, or write it to `output`.
pub fn run_transform(config: &SiteConfig, file: &Path, output: Option<&Path>) -> Result<()> {
    let transformed = transform_file(config, file)?;

    match output {
        Some(output) => {
            let written = write_if_changed(output, transformed.as_bytes())?;
            if written {
                log!("transform"; "wrote {}", output.display());
            } else {
                debug!("transform"; "{} unchanged", output.display());
            }
        }
        None => {
            let mut out = std::io::stdout().lock();
            out.write_all(transformed.as_bytes())?;
            out.flush()?;
        }
    }
    Ok(())
}

/// Read `file` (relative to cwd or the docs root) and transform it.
pub fn transform_file(config: &SiteConfig, file: &Path) -> Result<String> {
    let source = resolve_source(config, file)?;
    let code = fs::read_to_string(&source)
        .with_context(|| format!("failed to read {}", source.display()))?;

    let transform = MarkdownTransform::new(config)?;
    Ok(transform.transform_or_passthrough(&code, &source))
}

fn resolve_source(config: &SiteConfig, file: &Path) -> Result<PathBuf> {
    let source = resolve_path(file, &config.docs_root());
    if !source.is_file() {
        bail!("file not found: {}", file.display());
    }
    Ok(source)
}
