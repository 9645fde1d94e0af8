use super::{PUBLIC_DIR, load_site};
use anyhow::{Context, Result};
use chrono::Local;
use glasspage_generator::{BasicRenderer, generate_site};
use glasspage_validator::validate_site;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Build static site for deployment
pub async fn run(path: PathBuf, output: PathBuf) -> Result<()> {
    println!("🔨 Building static site...");
    println!("   Source: {}", path.display());
    println!("   Output: {}", output.display());
    println!();

    let site = load_site(&path)?;
    println!("✓ Loaded: {}", site.site.business_name);
    println!("  Services:  {}", site.catalog.services.len());
    println!("  Locations: {}", site.catalog.locations.len());
    println!("  Posts:     {}", site.catalog.posts.len());
    println!();

    let report = validate_site(&site);
    for warning in &report.warnings {
        println!("   ⚠ {}", warning);
    }
    if !report.is_ok() {
        for error in &report.errors {
            eprintln!("   ✗ {}", error);
        }
        anyhow::bail!(
            "site.toml has {} error(s); run 'glasspage validate {}' for details",
            report.errors.len(),
            path.display()
        );
    }

    println!("📄 Generating pages...");
    let build_date = Local::now().date_naive();
    let generated = generate_site(&site, &BasicRenderer::default(), build_date)
        .context("Failed to generate site")?;
    println!("   ✓ {} pages", generated.pages.len());
    println!("   ✓ {} alias redirects", generated.redirects.len());

    println!("📁 Writing output...");
    let written = generated
        .write_to(&output)
        .with_context(|| format!("Failed to write site to {}", output.display()))?;
    println!("   ✓ Wrote {} files", written);

    println!("🖼  Copying static assets...");
    let copied = copy_public(&path.join(PUBLIC_DIR), &output)?;
    println!("   ✓ Copied {} files from {}/", copied, PUBLIC_DIR);

    println!();
    println!("✅ Build complete!");
    println!("   Output: {}", output.display());
    println!();
    println!("To test locally:");
    println!("   cd {} && python3 -m http.server 8000", output.display());
    println!();

    Ok(())
}

/// Mirror `public/` into the output root. A missing `public/` copies nothing.
fn copy_public(public: &Path, output: &Path) -> Result<usize> {
    if !public.exists() {
        tracing::debug!(path = %public.display(), "No public directory");
        return Ok(0);
    }

    let mut copied = 0;
    for entry in WalkDir::new(public) {
        let entry = entry.context("Failed to read public directory")?;
        let relative = entry
            .path()
            .strip_prefix(public)
            .context("Invalid public path")?;
        let target = output.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)
                .with_context(|| format!("Failed to create {}", target.display()))?;
        } else if entry.file_type().is_file() {
            fs::copy(entry.path(), &target)
                .with_context(|| format!("Failed to copy {}", entry.path().display()))?;
            copied += 1;
        }
    }

    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_copy_public_nested() {
        let src = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        fs::create_dir_all(src.path().join("images/services")).unwrap();
        fs::write(src.path().join("favicon.ico"), b"ico").unwrap();
        fs::write(src.path().join("images/services/mirror.jpg"), b"jpg").unwrap();

        let copied = copy_public(src.path(), out.path()).unwrap();
        assert_eq!(copied, 2);
        assert!(out.path().join("images/services/mirror.jpg").exists());
        assert_eq!(fs::read(out.path().join("favicon.ico")).unwrap(), b"ico");
    }

    #[test]
    fn test_copy_public_missing_dir() {
        let out = TempDir::new().unwrap();
        let missing = out.path().join("nope");
        assert_eq!(copy_public(&missing, out.path()).unwrap(), 0);
    }

    #[tokio::test]
    async fn test_build_starter_site() {
        let src = TempDir::new().unwrap();
        fs::write(
            src.path().join(super::super::SITE_TOML),
            glasspage_core::STARTER_SITE_TOML,
        )
        .unwrap();
        let out = TempDir::new().unwrap();

        run(src.path().to_path_buf(), out.path().join("dist")).await.unwrap();

        let dist = out.path().join("dist");
        assert!(dist.join("sitemap.xml").exists());
        assert!(dist.join("robots.txt").exists());
        assert!(dist.join("en/services/mirror-installation/in/doral/index.html").exists());
        assert!(dist.join("es/ubicaciones/hialeah/index.html").exists());
    }

    #[tokio::test]
    async fn test_build_missing_site_toml() {
        let src = TempDir::new().unwrap();
        let err = run(src.path().to_path_buf(), src.path().join("dist"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("glasspage init"));
    }
}
