//! `[repo]` section configuration.
//!
//! Used only to build the source links in component footers.
//!
//! # Example
//!
//! ```toml
//! [repo]
//! name = "element-plus/element-plus"  # owner/name on the host
//! branch = "dev"                      # Omit to read the current git branch
//! host = "https://github.com"         # Repository host
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

/// Branch used when none is configured and git detection fails.
pub const DEFAULT_BRANCH: &str = "main";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RepoConfig {
    /// Repository in `owner/name` form.
    pub name: String,

    /// Branch for `blob`/`tree` links.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,

    /// Host base URL.
    pub host: String,
}

impl Default for RepoConfig {
    fn default() -> Self {
        Self {
            name: "element-plus/element-plus".to_string(),
            branch: None,
            host: "https://github.com".to_string(),
        }
    }
}

impl RepoConfig {
    pub const NAME: FieldPath = FieldPath::new("repo.name");
    pub const BRANCH: FieldPath = FieldPath::new("repo.branch");
    pub const HOST: FieldPath = FieldPath::new("repo.host");

    /// Configured (or detected) branch, falling back to [`DEFAULT_BRANCH`].
    pub fn branch_or_default(&self) -> &str {
        self.branch.as_deref().unwrap_or(DEFAULT_BRANCH)
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        let mut parts = self.name.split('/');
        let well_formed = matches!(
            (parts.next(), parts.next(), parts.next()),
            (Some(owner), Some(repo), None) if !owner.is_empty() && !repo.is_empty()
        );
        if !well_formed {
            diag.error_with_hint(
                Self::NAME,
                format!("expected `owner/name`, got `{}`", self.name),
                "e.g. name = \"element-plus/element-plus\"",
            );
        }

        if let Some(branch) = &self.branch
            && (branch.is_empty() || branch.chars().any(char::is_whitespace))
        {
            diag.error(Self::BRANCH, format!("invalid branch name `{branch}`"));
        }

        match url::Url::parse(&self.host) {
            Ok(url) if url.cannot_be_a_base() => {
                diag.error(Self::HOST, format!("`{}` cannot be used as a base URL", self.host));
            }
            Ok(_) => {}
            Err(e) => diag.error_with_hint(
                Self::HOST,
                format!("invalid URL `{}`: {e}", self.host),
                "e.g. host = \"https://github.com\"",
            ),
        }
    }
}
