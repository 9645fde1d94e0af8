pub mod build;
pub mod init;
pub mod preview;
pub mod routes;
pub mod validate;

use anyhow::{Context, Result};
use glasspage_core::{Site, parse_site_toml};
use std::path::Path;

pub const SITE_TOML: &str = "site.toml";
pub const PUBLIC_DIR: &str = "public";

/// Load `site.toml` from a site directory, with a hint when it is missing.
pub fn load_site(path: &Path) -> Result<Site> {
    if !path.exists() {
        anyhow::bail!("Site directory does not exist: {}", path.display());
    }
    let config_path = path.join(SITE_TOML);
    if !config_path.exists() {
        anyhow::bail!(
            "{} not found in {}\nRun 'glasspage init {}' first",
            SITE_TOML,
            path.display(),
            path.display()
        );
    }
    parse_site_toml(&config_path)
        .with_context(|| format!("Failed to parse {}", config_path.display()))
}
