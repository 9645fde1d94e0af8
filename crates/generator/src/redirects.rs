//! Redirect rules for alias and cross-language slugs.
//!
//! Emitted as a `_redirects` file (Cloudflare Pages / Netlify syntax). Nested
//! service×location paths use `:service` / `:location` placeholders so one rule
//! covers every combination an alias appears in.

use crate::paths::{Page, PageKind};
use glasspage_core::{Language, Site, Sluggable};
use std::fmt;

pub const REDIRECTS_FILE: &str = "_redirects";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectRule {
    pub from: String,
    pub to: String,
    pub status: u16,
}

impl RedirectRule {
    fn permanent(from: String, to: String) -> Self {
        Self {
            from,
            to,
            status: 301,
        }
    }
}

impl fmt::Display for RedirectRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.from, self.to, self.status)
    }
}

/// Every slug of `entity` in `lang` that is not its canonical slug: aliases,
/// then the sibling language's canonical slug.
pub fn redirecting_slugs<T: Sluggable>(entity: &T, lang: Language) -> Vec<&str> {
    let canonical = entity.slug(lang);
    let mut slugs: Vec<&str> = Vec::new();
    let candidates = entity
        .aliases(lang)
        .iter()
        .map(String::as_str)
        .chain(std::iter::once(entity.slug(lang.sibling())));
    for slug in candidates {
        if slug != canonical && !slugs.contains(&slug) {
            slugs.push(slug);
        }
    }
    slugs
}

/// All redirect rules for the site, root redirect first.
pub fn redirect_rules(site: &Site) -> Vec<RedirectRule> {
    let catalog = &site.catalog;
    let mut rules = vec![RedirectRule {
        from: "/".to_string(),
        to: format!("/{}", site.site.default_language),
        status: 302,
    }];

    for lang in Language::ALL {
        let services = lang.services_segment();
        let prep = lang.location_preposition();
        let sibling = lang.sibling();

        // Section words of the sibling language.
        for (foreign, own) in [
            (sibling.services_segment(), services),
            (sibling.locations_segment(), lang.locations_segment()),
            (sibling.contact_segment(), lang.contact_segment()),
        ] {
            if foreign != own {
                rules.push(RedirectRule::permanent(
                    format!("/{}/{}", lang, foreign),
                    format!("/{}/{}", lang, own),
                ));
                rules.push(RedirectRule::permanent(
                    format!("/{}/{}/*", lang, foreign),
                    format!("/{}/{}/:splat", lang, own),
                ));
            }
        }

        for service in &catalog.services {
            let canonical = Page::new(lang, PageKind::Service(service)).path();
            for slug in redirecting_slugs(service, lang) {
                rules.push(RedirectRule::permanent(
                    format!("/{}/{}/{}", lang, services, slug),
                    canonical.clone(),
                ));
                rules.push(RedirectRule::permanent(
                    format!("/{}/{}/{}/{}/:location", lang, services, slug, prep),
                    format!("{}/{}/:location", canonical, prep),
                ));
            }
        }

        for location in &catalog.locations {
            let canonical_slug = location.slug.get(lang);
            let canonical = Page::new(lang, PageKind::Location(location)).path();
            for slug in redirecting_slugs(location, lang) {
                rules.push(RedirectRule::permanent(
                    format!("/{}/{}/{}", lang, lang.locations_segment(), slug),
                    canonical.clone(),
                ));
                rules.push(RedirectRule::permanent(
                    format!("/{}/{}/:service/{}/{}", lang, services, prep, slug),
                    format!("/{}/{}/:service/{}/{}", lang, services, prep, canonical_slug),
                ));
            }
        }

        for post in &catalog.posts {
            let canonical = Page::new(lang, PageKind::BlogPost(post)).path();
            for slug in redirecting_slugs(post, lang) {
                rules.push(RedirectRule::permanent(
                    format!("/{}/{}/{}", lang, lang.blog_segment(), slug),
                    canonical.clone(),
                ));
            }
        }
    }

    tracing::debug!(rules = rules.len(), "Built redirect rules");
    rules
}

pub fn render_redirects(rules: &[RedirectRule]) -> String {
    let mut out = String::new();
    for rule in rules {
        out.push_str(&rule.to_string());
        out.push('\n');
    }
    out
}
