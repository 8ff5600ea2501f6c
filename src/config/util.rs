//! Configuration utility functions.

use std::path::{Path, PathBuf};

/// Find config file by searching upward from current directory
///
/// Returns the absolute path to the config file if found
///
/// # Example
/// ```text
/// /home/user/lib/docs/en-US/   ← cwd
/// /home/user/lib/docsplice.toml ← found!
/// ```
pub fn find_config_file(config_name: &Path) -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    find_config_file_from(&cwd, config_name)
}

/// Walk up from `start` looking for `config_name`.
pub fn find_config_file_from(start: &Path, config_name: &Path) -> Option<PathBuf> {
    if config_name.is_absolute() {
        return config_name.exists().then(|| config_name.to_path_buf());
    }

    let mut current = start;
    loop {
        let candidate = current.join(config_name);
        if candidate.is_file() {
            return Some(candidate);
        }

        match current.parent() {
            Some(parent) => current = parent,
            None => return None, // Reached filesystem root
        }
    }
}

/// Current branch of the git repository containing `root`.
///
/// `None` outside a repository or with a detached HEAD.
pub fn detect_branch(root: &Path) -> Option<String> {
    let repo = gix::discover(root).ok()?;
    let head = repo.head_name().ok()??;
    Some(head.shorten().to_string())
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_find_config_in_start_dir() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("docsplice.toml"), "").unwrap();

        let found = find_config_file_from(dir.path(), Path::new("docsplice.toml"));
        assert_eq!(found, Some(dir.path().join("docsplice.toml")));
    }

    #[test]
    fn test_find_config_walks_up() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("docsplice.toml"), "").unwrap();
        let nested = dir.path().join("docs").join("en-US");
        fs::create_dir_all(&nested).unwrap();

        let found = find_config_file_from(&nested, Path::new("docsplice.toml"));
        assert_eq!(found, Some(dir.path().join("docsplice.toml")));
    }

    #[test]
    fn test_find_config_ignores_directories() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("a-config-name-nobody-uses.toml")).unwrap();

        let found = find_config_file_from(dir.path(), Path::new("a-config-name-nobody-uses.toml"));
        assert_eq!(found, None);
    }

    #[test]
    fn test_find_config_absolute() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        assert_eq!(find_config_file_from(dir.path(), &path), None);

        fs::write(&path, "").unwrap();
        assert_eq!(find_config_file_from(Path::new("/"), &path), Some(path));
    }

    #[test]
    fn test_detect_branch() {
        let dir = TempDir::new().unwrap();
        gix::init(dir.path()).unwrap();
        fs::write(
            dir.path().join(".git").join("HEAD"),
            "ref: refs/heads/feature/docs\n",
        )
        .unwrap();

        assert_eq!(detect_branch(dir.path()).as_deref(), Some("feature/docs"));
    }
}
