//! Path normalization utilities.
//!
//! - `normalize_path` - absolute file system path (canonicalize + fallback)
//! - `resolve_path` - relative path against cwd, then a fallback directory
//! - `clean_path` - lexical `.`/`..` folding
//! - `to_url_path` - relative path as a `/`-separated URL path

use std::path::{Component, Path, PathBuf};

/// Normalize a file system path to absolute form.
///
/// Tries `canonicalize()` first (resolves symlinks, `.`, `..`).
/// For paths that do not exist yet, joins relative paths with the current
/// directory and folds `.` and `..` lexically.
#[inline]
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            clean_path(path)
        } else {
            std::env::current_dir()
                .map_or_else(|_| path.to_path_buf(), |cwd| clean_path(&cwd.join(path)))
        }
    })
}

/// Fold `.` and `..` without touching the file system.
pub fn clean_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                // `..` at the root stays at the root
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            _ => out.push(component),
        }
    }
    out
}

/// Resolve a path that may be relative to cwd or a fallback directory.
///
/// Tries in order:
/// 1. If absolute, normalize
/// 2. If exists relative to cwd, normalize to absolute
/// 3. Otherwise, resolve relative to `fallback_dir`
///
/// Absolute results never contain `.` or `..`.
///
/// ```ignore
/// // `docsplice build en-US/component` from the repository root
/// let dir = resolve_path(Path::new("en-US/component"), &docs_root);
/// ```
#[inline]
pub fn resolve_path(path: &Path, fallback_dir: &Path) -> PathBuf {
    if path.is_absolute() || path.exists() {
        return normalize_path(path);
    }

    normalize_path(&fallback_dir.join(path))
}

/// Join the normal components of `path` with `/`.
///
/// `.` components are dropped, so `"."` yields an empty string.
pub fn to_url_path(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
