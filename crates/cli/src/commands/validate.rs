use super::load_site;
use glasspage_validator::validate_site;
use std::path::PathBuf;

pub async fn run(path: PathBuf) -> anyhow::Result<()> {
    println!("Validating site at: {}", path.display());

    let site = load_site(&path)?;
    println!("✓ site.toml parsed");
    println!("  Business: {}", site.site.business_name);

    let report = validate_site(&site);

    for line in &report.info {
        println!("  {}", line);
    }
    for warning in &report.warnings {
        println!("⚠ {}", warning);
    }
    for error in &report.errors {
        println!("✗ {}", error);
    }

    if !report.is_ok() {
        anyhow::bail!(
            "Validation failed with {} error(s), {} warning(s)",
            report.errors.len(),
            report.warnings.len()
        );
    }

    println!("\n✅ Site is valid ({} warning(s))", report.warnings.len());
    Ok(())
}
