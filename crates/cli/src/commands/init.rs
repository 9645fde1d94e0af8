use super::{PUBLIC_DIR, SITE_TOML};
use anyhow::{Context, Result};
use glasspage_core::{STARTER_SITE_TOML, parse_site_toml_str};
use std::fs;
use std::path::{Path, PathBuf};

/// Create a site directory holding the starter catalog and an empty `public/`.
pub async fn run(path: PathBuf) -> Result<()> {
    println!("🪟 Creating site at: {}", path.display());

    create_site(&path)?;
    let site = parse_site_toml_str(STARTER_SITE_TOML).context("Starter catalog is invalid")?;

    println!("   ✓ Wrote {}", SITE_TOML);
    println!("   ✓ Created {}/", PUBLIC_DIR);
    println!();
    println!("Starter catalog for {}:", site.site.business_name);
    println!("   Services:  {}", site.catalog.services.len());
    println!("   Locations: {}", site.catalog.locations.len());
    println!("   Posts:     {}", site.catalog.posts.len());
    println!();
    println!("Next steps:");
    println!("   1. Edit {}", path.join(SITE_TOML).display());
    println!("   2. glasspage validate {}", path.display());
    println!("   3. glasspage preview {}", path.display());

    Ok(())
}

fn create_site(base: &Path) -> Result<()> {
    let config_path = base.join(SITE_TOML);
    if config_path.exists() {
        anyhow::bail!(
            "{} already exists; refusing to overwrite",
            config_path.display()
        );
    }

    fs::create_dir_all(base.join(PUBLIC_DIR))
        .with_context(|| format!("Failed to create {}", base.display()))?;
    fs::write(&config_path, STARTER_SITE_TOML)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    tracing::debug!(path = %config_path.display(), "Wrote starter catalog");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glasspage_core::parse_site_toml;
    use tempfile::TempDir;

    #[test]
    fn test_create_site() {
        let dir = TempDir::new().unwrap();
        let base = dir.path().join("clearview");
        create_site(&base).unwrap();

        assert!(base.join(PUBLIC_DIR).is_dir());
        let site = parse_site_toml(base.join(SITE_TOML)).unwrap();
        assert_eq!(site.catalog.services.len(), 7);
    }

    #[test]
    fn test_create_site_into_existing_empty_dir() {
        let dir = TempDir::new().unwrap();
        create_site(dir.path()).unwrap();
        assert!(dir.path().join(SITE_TOML).exists());
    }

    #[test]
    fn test_create_site_refuses_overwrite() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(SITE_TOML), "[site]\n").unwrap();

        let err = create_site(dir.path()).unwrap_err();
        assert!(err.to_string().contains("refusing to overwrite"));
        assert_eq!(fs::read_to_string(dir.path().join(SITE_TOML)).unwrap(), "[site]\n");
    }
}
