// Catalog validation beyond what site.toml parsing enforces

use glasspage_core::{Language, Site, Sluggable, normalize_slug};
use std::collections::HashMap;

/// Home, services index, locations index, contact and blog index.
const FIXED_PAGES: usize = 5;

#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub info: Vec<String>,
}

impl ValidationReport {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

pub fn validate_site(site: &Site) -> ValidationReport {
    let mut report = ValidationReport::default();
    let catalog = &site.catalog;

    check_base_url(&site.site.base_url, &mut report);

    let service_ids: Vec<&str> = catalog.services.iter().map(|s| s.id.as_str()).collect();
    let location_ids: Vec<&str> = catalog.locations.iter().map(|l| l.id.as_str()).collect();
    let post_ids: Vec<&str> = catalog.posts.iter().map(|p| p.id.as_str()).collect();
    check_slug_table("service", &catalog.services, &service_ids, &mut report);
    check_slug_table("location", &catalog.locations, &location_ids, &mut report);
    check_slug_table("post", &catalog.posts, &post_ids, &mut report);

    for id in &site.sitemap.boosted_locations {
        if catalog.location(id).is_none() {
            report.errors.push(format!(
                "sitemap.boosted_locations references unknown location '{}'",
                id
            ));
        }
    }

    for service in &catalog.services {
        if service.faq.as_ref().is_none_or(|faq| faq.is_empty()) {
            report
                .warnings
                .push(format!("service '{}' has no FAQ entries", service.id));
        }
        for (lang, features) in service.features.iter() {
            if features.is_empty() {
                report.warnings.push(format!(
                    "service '{}' has no features in '{}'",
                    service.id, lang
                ));
            }
        }
    }

    if catalog.services.is_empty() {
        report.warnings.push("catalog has no services".to_string());
    }
    if catalog.locations.is_empty() {
        report.warnings.push("catalog has no locations".to_string());
    }

    report.info.push(format!(
        "{} services, {} locations, {} posts",
        catalog.services.len(),
        catalog.locations.len(),
        catalog.posts.len()
    ));
    let per_language = FIXED_PAGES
        + catalog.services.len()
        + catalog.locations.len()
        + catalog.services.len() * catalog.locations.len()
        + catalog.posts.len();
    report.info.push(format!(
        "{} pages across {} languages",
        per_language * Language::ALL.len(),
        Language::ALL.len()
    ));
    report.info.push(format!(
        "{} high-value locations",
        site.sitemap.boosted_locations.len()
    ));

    report
}

fn check_base_url(base_url: &str, report: &mut ValidationReport) {
    match url::Url::parse(base_url) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {
            if url.path() != "/" {
                report.warnings.push(format!(
                    "site.base_url '{}' has a path; pages are generated at the site root",
                    base_url
                ));
            }
            if url.scheme() == "http" {
                report
                    .warnings
                    .push(format!("site.base_url '{}' is not https", base_url));
            }
        }
        Ok(url) => report.errors.push(format!(
            "site.base_url must be http or https, got '{}'",
            url.scheme()
        )),
        Err(e) => report
            .errors
            .push(format!("site.base_url '{}' is invalid: {}", base_url, e)),
    }
}

/// Canonical slugs must be normalized and unique per language. Every other
/// slug that redirects to an entity (aliases and the sibling language's
/// canonical slug) must not point at a second entity.
fn check_slug_table<T: Sluggable>(
    kind: &str,
    entities: &[T],
    ids: &[&str],
    report: &mut ValidationReport,
) {
    for lang in Language::ALL {
        // normalized slug -> owning entity id
        let mut owners: HashMap<String, &str> = HashMap::new();

        for (entity, id) in entities.iter().zip(ids) {
            let slug = entity.slug(lang);
            let normalized = normalize_slug(slug);
            if normalized != slug {
                report.errors.push(format!(
                    "{} '{}' slug '{}' in '{}' is not normalized (expected '{}')",
                    kind, id, slug, lang, normalized
                ));
            }
            if let Some(other) = owners.insert(normalized, *id) {
                report.errors.push(format!(
                    "{} '{}' and '{}' share the slug '{}' in '{}'",
                    kind, other, id, slug, lang
                ));
            }
        }

        for (entity, id) in entities.iter().zip(ids) {
            let canonical = normalize_slug(entity.slug(lang));
            let sibling = normalize_slug(entity.slug(lang.sibling()));
            if sibling == canonical {
                continue;
            }
            match owners.get(&sibling) {
                Some(other) if *other != *id => report.errors.push(format!(
                    "{} '{}' slug '{}' in '{}' collides with '{}' in '{}'",
                    kind,
                    id,
                    sibling,
                    lang.sibling(),
                    other,
                    lang
                )),
                _ => {
                    owners.insert(sibling, *id);
                }
            }
        }

        for (entity, id) in entities.iter().zip(ids) {
            let canonical = normalize_slug(entity.slug(lang));
            for alias in entity.aliases(lang) {
                let normalized = normalize_slug(alias);
                if normalized.is_empty() {
                    report
                        .errors
                        .push(format!("{} '{}' has an empty alias in '{}'", kind, id, lang));
                    continue;
                }
                if normalized == canonical {
                    report.warnings.push(format!(
                        "{} '{}' alias '{}' in '{}' equals its canonical slug",
                        kind, id, alias, lang
                    ));
                    continue;
                }
                match owners.get(&normalized) {
                    Some(other) if *other != *id => report.errors.push(format!(
                        "{} '{}' alias '{}' in '{}' collides with '{}'",
                        kind, id, alias, lang, other
                    )),
                    Some(_) => report.warnings.push(format!(
                        "{} '{}' alias '{}' in '{}' repeats one of its own slugs",
                        kind, id, alias, lang
                    )),
                    None => {
                        owners.insert(normalized, *id);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glasspage_core::{STARTER_SITE_TOML, parse_site_toml_str};

    fn starter() -> Site {
        parse_site_toml_str(STARTER_SITE_TOML).unwrap()
    }

    #[test]
    fn test_starter_catalog_is_valid() {
        let report = validate_site(&starter());
        assert!(report.is_ok(), "errors: {:?}", report.errors);
        assert!(report.info[0].contains("7 services, 10 locations, 2 posts"));
        assert_eq!(report.info[1], "188 pages across 2 languages");
        // Three starter services ship without a FAQ.
        assert_eq!(
            report
                .warnings
                .iter()
                .filter(|w| w.contains("no FAQ"))
                .count(),
            3
        );
    }

    #[test]
    fn test_unnormalized_slug() {
        let mut site = starter();
        site.catalog.services[0].slug.en = "Window Glass".to_string();
        let report = validate_site(&site);
        assert!(report.errors.iter().any(|e| e.contains("expected 'window-glass'")));
    }

    #[test]
    fn test_duplicate_canonical_slug() {
        let mut site = starter();
        site.catalog.locations[1].slug.es = "miami".to_string();
        let report = validate_site(&site);
        assert!(
            report
                .errors
                .iter()
                .any(|e| e.contains("'miami' and 'miami-beach' share the slug"))
        );
    }

    #[test]
    fn test_alias_collision() {
        let mut site = starter();
        site.catalog.services[1].aliases.en.push("window-replacement".to_string());
        let report = validate_site(&site);
        assert!(
            report
                .errors
                .iter()
                .any(|e| e.contains("alias 'window-replacement'") && e.contains("collides"))
        );
    }

    #[test]
    fn test_alias_matching_other_language_slug_of_another_service() {
        let mut site = starter();
        site.catalog.services[1]
            .aliases
            .en
            .push("reemplazo-vidrios-ventanas".to_string());
        let report = validate_site(&site);
        assert!(
            report.errors.iter().any(|e| e.contains(
                "'mirror-installation' alias 'reemplazo-vidrios-ventanas' in 'en' collides with 'window-glass-replacement'"
            )),
            "errors: {:?}",
            report.errors
        );
    }

    #[test]
    fn test_other_language_slug_matching_canonical_slug() {
        let mut site = starter();
        // mirrors' es slug now equals the windows service's en slug.
        site.catalog.services[1].slug.es = "window-glass-replacement".to_string();
        let report = validate_site(&site);
        assert!(
            report.errors.iter().any(|e| e.contains(
                "'mirror-installation' slug 'window-glass-replacement' in 'es' collides with 'window-glass-replacement' in 'en'"
            )),
            "errors: {:?}",
            report.errors
        );
    }

    #[test]
    fn test_alias_repeating_own_sibling_slug_is_warning() {
        let mut site = starter();
        site.catalog.services[1]
            .aliases
            .en
            .push("instalacion-espejos".to_string());
        let report = validate_site(&site);
        assert!(report.is_ok(), "errors: {:?}", report.errors);
        assert!(report.warnings.iter().any(|w| w.contains("repeats one of its own slugs")));
    }

    #[test]
    fn test_alias_equal_to_canonical_is_warning() {
        let mut site = starter();
        site.catalog.locations[0].aliases.en.push("miami".to_string());
        let report = validate_site(&site);
        assert!(report.is_ok());
        assert!(report.warnings.iter().any(|w| w.contains("equals its canonical slug")));
    }

    #[test]
    fn test_unknown_boosted_location() {
        let mut site = starter();
        site.sitemap.boosted_locations.push("orlando".to_string());
        let report = validate_site(&site);
        assert!(report.errors.iter().any(|e| e.contains("'orlando'")));
    }

    #[test]
    fn test_base_url() {
        let mut site = starter();
        site.site.base_url = "ftp://clearviewglass.example".to_string();
        assert!(!validate_site(&site).is_ok());

        site.site.base_url = "not a url".to_string();
        assert!(!validate_site(&site).is_ok());

        site.site.base_url = "http://clearviewglass.example".to_string();
        let report = validate_site(&site);
        assert!(report.is_ok());
        assert!(report.warnings.iter().any(|w| w.contains("not https")));
    }
}
