//! Every page in the sitemap, and nothing else.

use chrono::NaiveDate;
use glasspage_core::{STARTER_SITE_TOML, parse_site_toml_str};
use glasspage_generator::paths::enumerate_pages;
use glasspage_generator::sitemap::{build_sitemap, parse_sitemap, render_sitemap};
use glasspage_generator::{RouteOutcome, route};
use std::collections::{HashMap, HashSet};

fn build_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 14).unwrap()
}

#[test]
fn sitemap_locs_match_enumerated_paths_exactly_once() {
    let site = parse_site_toml_str(STARTER_SITE_TOML).unwrap();
    let pages = enumerate_pages(&site.catalog);
    let xml = render_sitemap(&build_sitemap(&site, &pages, build_date())).unwrap();
    let parsed = parse_sitemap(&xml).unwrap();

    assert_eq!(parsed.len(), pages.len());

    let base = &site.site.base_url;
    let enumerated: HashSet<String> = pages.paths().into_iter().collect();
    let mut seen: HashMap<String, usize> = HashMap::new();

    for entry in &parsed {
        let path = entry
            .loc
            .strip_prefix(base.as_str())
            .unwrap_or_else(|| panic!("{} is outside {}", entry.loc, base))
            .to_string();
        assert!(enumerated.contains(&path), "{} is not an enumerated path", path);
        *seen.entry(path).or_default() += 1;
    }

    assert_eq!(seen.len(), enumerated.len());
    assert!(seen.values().all(|&count| count == 1));
}

#[test]
fn every_alternate_points_at_the_sibling_page() {
    let site = parse_site_toml_str(STARTER_SITE_TOML).unwrap();
    let pages = enumerate_pages(&site.catalog);
    let xml = render_sitemap(&build_sitemap(&site, &pages, build_date())).unwrap();
    let parsed = parse_sitemap(&xml).unwrap();

    let by_loc: HashMap<&str, &str> = parsed
        .iter()
        .map(|e| (e.loc.as_str(), e.alternates[0].hreflang.as_str()))
        .collect();

    for entry in &parsed {
        assert_eq!(entry.alternates.len(), 1, "{}", entry.loc);
        let alternate = &entry.alternates[0];

        // The sibling is itself in the sitemap and points straight back.
        let sibling = parsed
            .iter()
            .find(|e| e.loc == alternate.href)
            .unwrap_or_else(|| panic!("{} has no sitemap entry", alternate.href));
        assert_eq!(sibling.alternates[0].href, entry.loc);
        assert_ne!(by_loc[entry.loc.as_str()], by_loc[sibling.loc.as_str()]);
    }
}

#[test]
fn sitemap_paths_route_to_themselves() {
    let site = parse_site_toml_str(STARTER_SITE_TOML).unwrap();
    let pages = enumerate_pages(&site.catalog);
    let xml = render_sitemap(&build_sitemap(&site, &pages, build_date())).unwrap();

    for entry in parse_sitemap(&xml).unwrap() {
        let path = entry.loc.strip_prefix(site.site.base_url.as_str()).unwrap();
        match route(&site, path) {
            RouteOutcome::Render(page) => assert_eq!(page.path(), path),
            other => panic!("{} routed to {:?}", path, other),
        }
    }
}
