//! Shared helpers for the `build` and `transform` commands.

use std::fs;
use std::io::{self, BufRead};
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result, bail};
use jwalk::WalkDir;

use crate::utils::path::resolve_path;

/// File names never processed or copied.
const IGNORED_FILES: &[&str] = &[".DS_Store", "Thumbs.db"];

/// Collect files to process.
///
/// - no paths: everything under `docs_root`
/// - `-`: paths read from stdin, one per line
/// - otherwise: each path (file or directory), relative to cwd or `docs_root`
///
/// Files under `exclude` (the output directory) are skipped.
pub fn collect_source_files(
    paths: &[PathBuf],
    docs_root: &Path,
    exclude: &Path,
) -> Result<Vec<PathBuf>> {
    let paths: Vec<PathBuf> = if paths.len() == 1 && paths[0].as_os_str() == "-" {
        read_paths_from_stdin()?
    } else {
        paths.to_vec()
    };

    let mut files = Vec::new();
    if paths.is_empty() {
        files = collect_all_files(docs_root);
    } else {
        for path in &paths {
            let resolved = resolve_path(path, docs_root);
            if resolved.is_file() {
                files.push(resolved);
            } else if resolved.is_dir() {
                files.extend(collect_all_files(&resolved));
            } else {
                bail!(
                    "Path not found: {}\n  Tried:\n    - {}\n    - {}",
                    path.display(),
                    path.display(),
                    docs_root.join(path).display()
                );
            }
        }
    }

    files.retain(|f| !f.starts_with(exclude));
    files.sort();
    files.dedup();
    Ok(files)
}

/// Read file paths from stdin, one per line
pub fn read_paths_from_stdin() -> Result<Vec<PathBuf>> {
    read_paths(io::stdin().lock())
}

fn read_paths(reader: impl BufRead) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            paths.push(PathBuf::from(trimmed));
        }
    }
    Ok(paths)
}

/// Collect all files from a directory recursively
pub fn collect_all_files(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .skip_hidden(false)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            let name = e.file_name().to_str().unwrap_or_default();
            !IGNORED_FILES.contains(&name)
        })
        .map(|e| e.path())
        .collect()
}

/// Mirror `source` (under `docs_root`) into `output_dir`.
///
/// The part below `docs_root` must be plain names; a `..` could point the
/// output back at the sources.
pub fn output_path_for(source: &Path, docs_root: &Path, output_dir: &Path) -> Result<PathBuf> {
    let rel = source.strip_prefix(docs_root).with_context(|| {
        format!(
            "{} is outside the docs root {}",
            source.display(),
            docs_root.display()
        )
    })?;
    let plain = rel.components().all(|c| matches!(c, Component::Normal(_)));
    if rel.as_os_str().is_empty() || !plain {
        bail!(
            "{} is not a file path below {}",
            source.display(),
            docs_root.display()
        );
    }
    Ok(output_dir.join(rel))
}

/// Write `content` unless the file already holds exactly that.
///
/// Returns whether the file was written.
pub fn write_if_changed(path: &Path, content: &[u8]) -> Result<bool> {
    if let Ok(existing) = fs::read(path)
        && existing == content
    {
        return Ok(false);
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(true)
}
