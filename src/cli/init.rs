//! `docsplice init` - write a default `docsplice.toml`.

use anyhow::{Context, Result, bail};
use std::fs;

use crate::config::SiteConfig;
use crate::log;

/// Config file text with a version header.
pub fn generate_config_template() -> Result<String> {
    Ok(format!(
        "# docsplice configuration file (v{})\n\n{}",
        env!("CARGO_PKG_VERSION"),
        SiteConfig::default_toml()?
    ))
}

/// Write the default config to `config.config_path`, or print it with `dry_run`.
pub fn init_config(config: &SiteConfig, dry_run: bool) -> Result<()> {
    let template = generate_config_template()?;
    if dry_run {
        print!("{template}");
        return Ok(());
    }

    let path = &config.config_path;
    if path.exists() {
        bail!("{} already exists", path.display());
    }

    fs::write(path, template).with_context(|| format!("failed to write {}", path.display()))?;
    log!("init"; "wrote {}", path.display());
    Ok(())
}
