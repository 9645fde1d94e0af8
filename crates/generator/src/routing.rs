//! Request path resolution for the page routing surface.
//!
//! A path either names a page exactly, names one through an alias or a
//! non-canonical spelling (redirect to the canonical path), or names nothing.

use crate::paths::{Page, PageKind};
use glasspage_core::{Language, Site, normalize_slug, resolve_slug};

#[derive(Debug, Clone)]
pub enum RouteOutcome<'a> {
    Render(Page<'a>),
    /// Permanent redirect to this canonical path.
    Redirect(String),
    NotFound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Services,
    Locations,
    Contact,
    Blog,
}

/// Match a section word in either language.
fn section(segment: &str) -> Option<Section> {
    let word = normalize_slug(segment);
    Language::ALL.into_iter().find_map(|lang| {
        if word == lang.services_segment() {
            Some(Section::Services)
        } else if word == lang.locations_segment() {
            Some(Section::Locations)
        } else if word == lang.contact_segment() {
            Some(Section::Contact)
        } else if word == lang.blog_segment() {
            Some(Section::Blog)
        } else {
            None
        }
    })
}

fn is_preposition(segment: &str) -> bool {
    let word = normalize_slug(segment);
    Language::ALL
        .into_iter()
        .any(|lang| word == lang.location_preposition())
}

/// Resolve a site-relative request path.
pub fn route<'a>(site: &'a Site, path: &str) -> RouteOutcome<'a> {
    let requested = path.trim_end_matches('/');
    let segments: Vec<&str> = requested.split('/').filter(|s| !s.is_empty()).collect();

    let Some((first, rest)) = segments.split_first() else {
        return RouteOutcome::Redirect(format!("/{}", site.site.default_language));
    };

    let Ok(lang) = Language::from_code(first) else {
        return RouteOutcome::NotFound;
    };

    let Some(page) = resolve_page(site, lang, rest) else {
        tracing::debug!(path, "No page for path");
        return RouteOutcome::NotFound;
    };

    let canonical = page.path();
    if canonical == requested {
        RouteOutcome::Render(page)
    } else {
        tracing::debug!(path, canonical = %canonical, "Redirecting to canonical path");
        RouteOutcome::Redirect(canonical)
    }
}

fn resolve_page<'a>(site: &'a Site, lang: Language, rest: &[&str]) -> Option<Page<'a>> {
    let catalog = &site.catalog;

    let kind = match rest {
        [] => PageKind::Home,
        [sec] => match section(sec)? {
            Section::Services => PageKind::ServiceIndex,
            Section::Locations => PageKind::LocationIndex,
            Section::Contact => PageKind::Contact,
            Section::Blog => PageKind::BlogIndex,
        },
        [sec, slug] => match section(sec)? {
            Section::Services => {
                PageKind::Service(resolve_slug(slug, lang, &catalog.services)?.entity)
            }
            Section::Locations => {
                PageKind::Location(resolve_slug(slug, lang, &catalog.locations)?.entity)
            }
            Section::Blog => PageKind::BlogPost(resolve_slug(slug, lang, &catalog.posts)?.entity),
            Section::Contact => return None,
        },
        [sec, service, prep, location] => {
            if section(sec)? != Section::Services || !is_preposition(prep) {
                return None;
            }
            let service = resolve_slug(service, lang, &catalog.services)?.entity;
            let location = resolve_slug(location, lang, &catalog.locations)?.entity;
            PageKind::ServiceLocation(service, location)
        }
        _ => return None,
    };

    Some(Page::new(lang, kind))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::enumerate_pages;
    use glasspage_core::{STARTER_SITE_TOML, parse_site_toml_str};

    fn starter() -> Site {
        parse_site_toml_str(STARTER_SITE_TOML).unwrap()
    }

    fn redirect_target(outcome: RouteOutcome<'_>) -> String {
        match outcome {
            RouteOutcome::Redirect(to) => to,
            other => panic!("expected redirect, got {:?}", other),
        }
    }

    #[test]
    fn test_every_enumerated_path_renders() {
        let site = starter();
        for page in enumerate_pages(&site.catalog).iter() {
            let path = page.path();
            match route(&site, &path) {
                RouteOutcome::Render(found) => assert_eq!(found.path(), path),
                other => panic!("{} did not render: {:?}", path, other),
            }
        }
    }

    #[test]
    fn test_root_redirects_to_default_language() {
        let site = starter();
        assert_eq!(redirect_target(route(&site, "/")), "/en");
        assert_eq!(redirect_target(route(&site, "")), "/en");
    }

    #[test]
    fn test_trailing_slash_is_ignored() {
        let site = starter();
        assert!(matches!(
            route(&site, "/es/servicios/"),
            RouteOutcome::Render(_)
        ));
    }

    #[test]
    fn test_service_alias_redirects() {
        let site = starter();
        assert_eq!(
            redirect_target(route(&site, "/en/services/window-replacement")),
            "/en/services/window-glass-replacement"
        );
        assert_eq!(
            redirect_target(route(&site, "/es/servicios/puertas-de-ducha/en/doral")),
            "/es/servicios/instalacion-puertas-ducha/en/doral"
        );
    }

    #[test]
    fn test_location_alias_redirects() {
        let site = starter();
        assert_eq!(
            redirect_target(route(
                &site,
                "/en/services/mirror-installation/in/ft-lauderdale"
            )),
            "/en/services/mirror-installation/in/fort-lauderdale"
        );
        assert_eq!(
            redirect_target(route(&site, "/en/locations/the-gables")),
            "/en/locations/coral-gables"
        );
    }

    #[test]
    fn test_sibling_language_words_redirect() {
        let site = starter();
        assert_eq!(
            redirect_target(route(
                &site,
                "/es/services/window-glass-replacement/in/miami"
            )),
            "/es/servicios/reemplazo-vidrios-ventanas/en/miami"
        );
        assert_eq!(redirect_target(route(&site, "/en/contacto")), "/en/contact");
    }

    #[test]
    fn test_accented_slug_redirects() {
        let site = starter();
        assert_eq!(
            redirect_target(route(&site, "/es/servicios/Instalación-Espejos")),
            "/es/servicios/instalacion-espejos"
        );
    }

    #[test]
    fn test_blog_alias_redirects() {
        let site = starter();
        assert_eq!(
            redirect_target(route(&site, "/en/blog/hurricane-checklist")),
            "/en/blog/hurricane-season-glass-checklist"
        );
    }

    #[test]
    fn test_not_found() {
        let site = starter();
        for path in [
            "/fr",
            "/en/pricing",
            "/en/services/car-wash",
            "/en/services/mirror-installation/in/orlando",
            "/en/services/mirror-installation/near/miami",
            "/en/locations/miami/in/doral",
            "/en/contact/extra",
            "/en/services/a/b/c/d/e",
        ] {
            assert!(
                matches!(route(&site, path), RouteOutcome::NotFound),
                "{} should be not found",
                path
            );
        }
    }
}
