use super::load_site;
use glasspage_core::Language;
use glasspage_generator::paths::enumerate_pages;
use std::path::PathBuf;

/// Print every page path, optionally for one language.
pub async fn run(path: PathBuf, lang: Option<Language>) -> anyhow::Result<()> {
    let site = load_site(&path)?;
    let pages = enumerate_pages(&site.catalog);

    let mut listed = 0;
    for page in pages.iter().filter(|p| lang.is_none_or(|l| p.lang == l)) {
        println!("{}", page.path());
        listed += 1;
    }
    tracing::info!(listed, total = pages.len(), "Listed routes");

    Ok(())
}
