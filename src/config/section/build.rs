//! `[build]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [build]
//! output = ".docsplice"   # Transformed docs tree (relative to config file)
//! copy_assets = true      # Copy non-markdown files unchanged
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Output directory mirroring the docs tree.
    pub output: PathBuf,

    /// Copy non-markdown files next to the transformed pages.
    pub copy_assets: bool,

    /// Remove the output directory before building (CLI only).
    #[serde(skip)]
    pub clean: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from(".docsplice"),
            copy_assets: true,
            clean: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.build.output, PathBuf::from(".docsplice"));
        assert!(config.build.copy_assets);
        assert!(!config.build.clean);
    }

    #[test]
    fn test_custom_values() {
        let config = test_parse_config("[build]\noutput = \"dist/docs\"\ncopy_assets = false");
        assert_eq!(config.build.output, PathBuf::from("dist/docs"));
        assert!(!config.build.copy_assets);
    }
}
