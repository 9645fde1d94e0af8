// Static site generation: page enumeration, routing, sitemap, structured data

pub mod paths;
pub mod redirects;
pub mod render;
pub mod routing;
pub mod sitemap;
pub mod structured_data;

use chrono::NaiveDate;
use glasspage_core::{Language, Location, Result, Service, Site};
use paths::{Page, PageKind, enumerate_pages};
use redirects::{REDIRECTS_FILE, redirect_rules, redirecting_slugs, render_redirects};
use render::{PageRenderer, redirect_page};
use sitemap::{SITEMAP_FILE, build_sitemap, render_sitemap, robots_txt};
use std::fs;
use std::path::{Path, PathBuf};

pub use paths::{PageSet, PathParams};
pub use render::BasicRenderer;
pub use routing::{RouteOutcome, route};

/// Everything a build writes, keyed by site-relative path.
pub struct GeneratedSite {
    pub pages: Vec<(String, String)>,     // (path, html)
    pub redirects: Vec<(String, String)>, // (alias path, stub html)
    pub files: Vec<(String, String)>,     // (file name, contents)
}

impl GeneratedSite {
    /// Write into `output`, creating directories as needed. Returns the
    /// number of files written.
    pub fn write_to(&self, output: &Path) -> Result<usize> {
        fs::create_dir_all(output)?;
        let mut written = 0;

        for (path, html) in self.pages.iter().chain(&self.redirects) {
            let target = page_file(output, path);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&target, html)?;
            tracing::trace!(file = %target.display(), "Wrote page");
            written += 1;
        }

        for (name, contents) in &self.files {
            fs::write(output.join(name), contents)?;
            written += 1;
        }

        tracing::debug!(written, output = %output.display(), "Wrote site");
        Ok(written)
    }
}

/// `/en/services` -> `{output}/en/services/index.html`
pub fn page_file(output: &Path, path: &str) -> PathBuf {
    let mut file = output.to_path_buf();
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        file.push(segment);
    }
    file.join("index.html")
}

/// Render the whole site in memory.
pub fn generate_site(
    site: &Site,
    renderer: &dyn PageRenderer,
    build_date: NaiveDate,
) -> Result<GeneratedSite> {
    let pages = enumerate_pages(&site.catalog);

    let rendered: Vec<(String, String)> = pages
        .iter()
        .map(|page| (page.path(), renderer.render(site, page)))
        .collect();

    let catalog = &site.catalog;
    let mut redirects = Vec::new();
    for lang in Language::ALL {
        for service in &catalog.services {
            let slugs = redirecting_slugs(service, lang);
            push_redirect_stubs(&mut redirects, site, lang, PageKind::Service(service), &slugs);
            for location in &catalog.locations {
                let pair = (service, location);
                push_nested_stubs(&mut redirects, site, lang, pair, &slugs, &[]);
            }
        }
        for location in &catalog.locations {
            let slugs = redirecting_slugs(location, lang);
            push_redirect_stubs(&mut redirects, site, lang, PageKind::Location(location), &slugs);
            for service in &catalog.services {
                let pair = (service, location);
                push_nested_stubs(&mut redirects, site, lang, pair, &[], &slugs);
            }
        }
        for post in &catalog.posts {
            let slugs = redirecting_slugs(post, lang);
            push_redirect_stubs(&mut redirects, site, lang, PageKind::BlogPost(post), &slugs);
        }
    }

    let default_home = Page::new(site.site.default_language, PageKind::Home);
    redirects.push((
        "/".to_string(),
        redirect_page(&default_home.path(), site.site.default_language),
    ));

    let entries = build_sitemap(site, &pages, build_date);
    let files = vec![
        (SITEMAP_FILE.to_string(), render_sitemap(&entries)?),
        ("robots.txt".to_string(), robots_txt(site)),
        (REDIRECTS_FILE.to_string(), render_redirects(&redirect_rules(site))),
    ];

    Ok(GeneratedSite {
        pages: rendered,
        redirects,
        files,
    })
}

/// One stub per non-canonical slug, placed where the page would live under it.
fn push_redirect_stubs(
    out: &mut Vec<(String, String)>,
    site: &Site,
    lang: Language,
    kind: PageKind<'_>,
    slugs: &[&str],
) {
    let page = Page::new(lang, kind);
    let canonical_path = page.path();
    let target = site.site.absolute_url(&canonical_path);
    let Some((parent, _)) = canonical_path.rsplit_once('/') else {
        return;
    };
    for slug in slugs {
        out.push((format!("{}/{}", parent, slug), redirect_page(&target, lang)));
    }
}

/// Stubs for a service×location page reached through a non-canonical service
/// slug or a non-canonical location slug. Pass an empty list for the side
/// that stays canonical.
fn push_nested_stubs(
    out: &mut Vec<(String, String)>,
    site: &Site,
    lang: Language,
    (service, location): (&Service, &Location),
    service_slugs: &[&str],
    location_slugs: &[&str],
) {
    let page = Page::new(lang, PageKind::ServiceLocation(service, location));
    let target = site.site.absolute_url(&page.path());
    let nested = |service_slug: &str, location_slug: &str| {
        format!(
            "/{}/{}/{}/{}/{}",
            lang,
            lang.services_segment(),
            service_slug,
            lang.location_preposition(),
            location_slug
        )
    };
    for &slug in service_slugs {
        let path = nested(slug, location.slug.get(lang).as_str());
        out.push((path, redirect_page(&target, lang)));
    }
    for &slug in location_slugs {
        let path = nested(service.slug.get(lang).as_str(), slug);
        out.push((path, redirect_page(&target, lang)));
    }
}
