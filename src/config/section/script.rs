//! `[script]` section configuration.
//!
//! Templates for the `<script setup>` block injected into every page.
//!
//! # Example
//!
//! ```toml
//! [script]
//! demo_glob = "../../examples/{id}/*.vue"
//! locale_composable = "../../.vitepress/vitepress/composables/locale"
//! footer_locale = "../../.vitepress/i18n/component/footer.json"
//! ```
//!
//! `{id}` is replaced by the page's file stem. The import paths are emitted
//! verbatim and resolved later by the site generator.

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::transform::ID_PLACEHOLDER;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptConfig {
    /// Glob passed to `import.meta.globEager` for the page's demos.
    pub demo_glob: String,

    /// Module exporting `useLocale`.
    pub locale_composable: String,

    /// JSON file with footer translations.
    pub footer_locale: String,
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            demo_glob: "../../examples/{id}/*.vue".to_string(),
            locale_composable: "../../.vitepress/vitepress/composables/locale".to_string(),
            footer_locale: "../../.vitepress/i18n/component/footer.json".to_string(),
        }
    }
}

impl ScriptConfig {
    pub const DEMO_GLOB: FieldPath = FieldPath::new("script.demo_glob");
    pub const LOCALE_COMPOSABLE: FieldPath = FieldPath::new("script.locale_composable");
    pub const FOOTER_LOCALE: FieldPath = FieldPath::new("script.footer_locale");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if !self.demo_glob.contains(ID_PLACEHOLDER) {
            diag.warn(
                Self::DEMO_GLOB,
                format!("no `{ID_PLACEHOLDER}` placeholder, every page imports the same demos"),
            );
        }

        // Emitted inside single-quoted JS strings.
        let quoted = [
            (Self::DEMO_GLOB, &self.demo_glob),
            (Self::LOCALE_COMPOSABLE, &self.locale_composable),
            (Self::FOOTER_LOCALE, &self.footer_locale),
        ];
        for (field, value) in quoted {
            if value.contains('\'') || value.contains('\n') {
                diag.error(field, "must not contain quotes or newlines");
            } else if value.is_empty() {
                diag.error(field, "must not be empty");
            }
        }
    }
}
