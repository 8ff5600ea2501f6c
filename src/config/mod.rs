//! Project configuration management for `docsplice.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── build      # [build]
//! │   ├── project    # [project]
//! │   ├── repo       # [repo]
//! │   └── script     # [script]
//! ├── types/         # Utility types
//! │   ├── error      # ConfigError, ConfigDiagnostics
//! │   └── field      # FieldPath
//! └── mod.rs         # SiteConfig (this file)
//! ```
//!
//! # Sections
//!
//! | Section     | Purpose                                          |
//! |-------------|--------------------------------------------------|
//! | `[project]` | Repository root, docs root, component dirs       |
//! | `[repo]`    | Repository name, branch and host for footer links|
//! | `[script]`  | Demo glob and locale imports for `<script setup>`|
//! | `[build]`   | Output directory for the `build` command         |

pub mod section;
pub mod types;
mod util;

use util::{detect_branch, find_config_file};

pub use section::{BuildConfig, DEFAULT_BRANCH, ProjectConfig, RepoConfig, ScriptConfig};
pub use types::{ConfigDiagnostic, ConfigDiagnostics, ConfigError, FieldPath};

use crate::{
    cli::{Cli, Commands},
    debug, log,
    utils::path::normalize_path,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Default config file name.
pub const CONFIG_FILE: &str = "docsplice.toml";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing docsplice.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Directory containing the config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Project layout
    #[serde(default)]
    pub project: ProjectConfig,

    /// Repository used for source links
    #[serde(default)]
    pub repo: RepoConfig,

    /// `<script setup>` templates
    #[serde(default)]
    pub script: ScriptConfig,

    /// Build settings
    #[serde(default)]
    pub build: BuildConfig,
}

impl SiteConfig {
    /// Load configuration for the given CLI invocation.
    ///
    /// Searches upward from cwd for the config file. Without one, defaults
    /// rooted at cwd are used.
    pub fn load(cli: &Cli) -> Result<Self> {
        let (config_path, exists) = Self::resolve_config_path(cli)?;
        let is_init = matches!(cli.command, Commands::Init { .. });

        let mut config = if exists && !is_init {
            Self::from_path(&config_path)?
        } else {
            if !is_init {
                debug!("config"; "{} not found, using defaults", cli.config.display());
            }
            Self::default()
        };

        config.config_path = config_path;
        config.finalize(cli);

        if !is_init {
            config.validate()?;
        }

        Ok(config)
    }

    /// Resolve config file path based on command.
    fn resolve_config_path(cli: &Cli) -> Result<(PathBuf, bool)> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        if matches!(cli.command, Commands::Init { .. }) {
            let path = cwd.join(&cli.config);
            let exists = path.exists();
            return Ok((path, exists));
        }

        match find_config_file(&cli.config) {
            Some(path) => Ok((path, true)),
            None => Ok((cwd.join(&cli.config), false)),
        }
    }

    /// Finalize configuration after loading.
    fn finalize(&mut self, cli: &Cli) {
        let root = self
            .config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        self.config_path = normalize_path(&self.config_path);
        self.normalize_paths(&root);
        self.apply_command_options(cli);
        self.resolve_branch();
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::Toml)?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Serialized default configuration, written by `docsplice init`.
    pub fn default_toml() -> Result<String> {
        Ok(toml::to_string_pretty(&Self::default())?)
    }

    // ========================================================================
    // resolved paths
    // ========================================================================

    /// Absolute documentation root.
    pub fn docs_root(&self) -> PathBuf {
        self.project.root.join(&self.project.docs)
    }

    /// Absolute component docs directory.
    pub fn component_docs_root(&self) -> PathBuf {
        self.docs_root().join(&self.project.component_docs)
    }

    /// Absolute component sources directory.
    pub fn components_root(&self) -> PathBuf {
        self.project.root.join(&self.project.components)
    }

    /// Absolute build output directory.
    pub fn output_dir(&self) -> &Path {
        &self.build.output
    }

    /// Path relative to the project root, for display.
    pub fn project_relative(&self, path: impl AsRef<Path>) -> PathBuf {
        path.as_ref()
            .strip_prefix(&self.project.root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.as_ref().to_path_buf())
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    /// Apply command-specific configuration options.
    fn apply_command_options(&mut self, cli: &Cli) {
        crate::logger::set_verbose(cli.verbose);

        if let Some(branch) = &cli.branch {
            self.repo.branch = Some(branch.clone());
        }

        if let Commands::Build { args } = &cli.command {
            if let Some(output) = &args.output {
                self.build.output = normalize_path(output);
            }
            self.build.clean = args.clean;
        }
    }

    /// Fill in `repo.branch` from git when not configured.
    fn resolve_branch(&mut self) {
        if self.repo.branch.is_some() {
            return;
        }
        match detect_branch(&self.project.root) {
            Some(branch) => {
                debug!("config"; "using git branch `{}`", branch);
                self.repo.branch = Some(branch);
            }
            None => {
                debug!("config"; "no git branch found, using `{}`", DEFAULT_BRANCH);
            }
        }
    }

    // ========================================================================
    // path normalization
    // ========================================================================

    /// Normalize root-level paths relative to the config directory.
    fn normalize_paths(&mut self, root: &Path) {
        let root = normalize_path(root);

        self.project.root = Self::normalize_project_root(&self.project.root, &root);
        self.build.output = normalize_path(&root.join(&self.build.output));
        self.root = root;
    }

    /// Normalize the project root with tilde expansion.
    fn normalize_project_root(path: &Path, root: &Path) -> PathBuf {
        let expanded = shellexpand::tilde(&path.to_string_lossy()).into_owned();
        let path = PathBuf::from(expanded);
        let full_path = if path.is_relative() {
            root.join(&path)
        } else {
            path
        };
        normalize_path(&full_path)
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate configuration.
    ///
    /// Collects all validation errors and returns them at once.
    pub fn validate(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        self.project.validate(&mut diag);
        self.repo.validate(&mut diag);
        self.script.validate(&mut diag);

        if !self.docs_root().is_dir() {
            diag.warn(
                ProjectConfig::DOCS,
                format!("directory `{}` not found", self.docs_root().display()),
            );
        }

        diag.print_warnings();

        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config text. Panics if there are unknown fields.
#[cfg(test)]
pub fn test_parse_config(content: &str) -> SiteConfig {
    let (parsed, ignored) = SiteConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

/// Default config rooted at `root` with a fixed branch.
#[cfg(test)]
pub fn test_config(root: &Path) -> SiteConfig {
    let mut config = SiteConfig::default();
    config.config_path = root.join(CONFIG_FILE);
    config.root = root.to_path_buf();
    config.project.root = root.to_path_buf();
    config.build.output = root.join(".docsplice");
    config.repo.branch = Some("dev".to_string());
    config
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_from_str_invalid_toml() {
        assert!(SiteConfig::from_str("[project\ndocs = \"docs\"").is_err());
    }

    #[test]
    fn test_from_str_wrong_type() {
        assert!(SiteConfig::from_str("[build]\ncopy_assets = \"yes\"").is_err());
    }

    #[test]
    fn test_site_config_default() {
        let config = SiteConfig::default();
        assert_eq!(config.config_path, PathBuf::new());
        assert_eq!(config.project.docs, PathBuf::from("docs"));
        assert_eq!(config.repo.host, "https://github.com");
        assert!(config.build.copy_assets);
    }

    #[test]
    fn test_unknown_fields_detected() {
        let content = "[repo]\nname = \"a/b\"\n[unknown_section]\nfield = \"value\"";
        let (config, ignored) = SiteConfig::parse_with_ignored(content).unwrap();

        assert_eq!(config.repo.name, "a/b");
        assert!(ignored.iter().any(|f| f.contains("unknown_section")));
    }

    #[test]
    fn test_no_unknown_fields() {
        let (_, ignored) = SiteConfig::parse_with_ignored("[repo]\nname = \"a/b\"").unwrap();
        assert!(ignored.is_empty());
    }

    #[test]
    fn test_default_toml_roundtrips() {
        let text = SiteConfig::default_toml().unwrap();
        assert!(text.contains("[project]"));
        assert!(text.contains("demo_glob"));
        assert!(!text.contains("branch"));
        assert!(!text.contains("clean"));

        let parsed = test_parse_config(&text);
        assert_eq!(parsed.project.components, PathBuf::from("packages/components"));
    }

    #[test]
    fn test_resolved_paths() {
        let config = test_config(Path::new("/repo"));
        assert_eq!(config.docs_root(), PathBuf::from("/repo/docs"));
        assert_eq!(
            config.component_docs_root(),
            PathBuf::from("/repo/docs/en-US/component")
        );
        assert_eq!(
            config.components_root(),
            PathBuf::from("/repo/packages/components")
        );
        assert_eq!(
            config.project_relative("/repo/docs/index.md"),
            PathBuf::from("docs/index.md")
        );
    }

    #[test]
    fn test_normalize_paths_relative_to_config_dir() {
        let dir = TempDir::new().unwrap();
        let mut config = test_parse_config("[project]\nroot = \"lib\"\n[build]\noutput = \"out\"");
        config.normalize_paths(dir.path());

        let root = normalize_path(dir.path());
        assert_eq!(config.root, root);
        assert_eq!(config.project.root, root.join("lib"));
        assert_eq!(config.build.output, root.join("out"));
    }

    #[test]
    fn test_validate_collects_all_errors() {
        let dir = TempDir::new().unwrap();
        let mut config = test_config(dir.path());
        config.repo.name = "nope".to_string();
        config.repo.host = "not a url".to_string();

        let err = config.validate().unwrap_err();
        match err.downcast_ref::<ConfigError>() {
            Some(ConfigError::Diagnostics(diag)) => assert_eq!(diag.len(), 2),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
