//! schema.org JSON-LD descriptions.

use crate::paths::{Page, PageKind};
use glasspage_core::{BlogPost, Language, Location, Service, Site, t};
use serde_json::{Value, json};

/// Stable `@id` of the business node, referenced by services and posts.
fn business_id(site: &Site) -> String {
    format!("{}/#business", site.site.base_url)
}

fn city(location: &Location) -> Value {
    json!({
        "@type": "City",
        "name": location.name,
        "containedInPlace": { "@type": "State", "name": location.state },
    })
}

pub fn local_business(site: &Site, lang: Language) -> Value {
    let s = &site.site;
    let area_served: Vec<Value> = site.catalog.locations.iter().map(city).collect();
    json!({
        "@context": "https://schema.org",
        "@type": "HomeAndConstructionBusiness",
        "@id": business_id(site),
        "name": s.business_name,
        "url": s.absolute_url(&format!("/{}", lang)),
        "telephone": s.telephone,
        "email": s.email,
        "inLanguage": lang.code(),
        "address": {
            "@type": "PostalAddress",
            "streetAddress": s.street_address,
            "addressLocality": s.city,
            "addressRegion": s.state,
            "postalCode": s.postal_code,
            "addressCountry": "US",
        },
        "areaServed": area_served,
    })
}

/// A `Service` node, scoped to one city when `location` is given.
pub fn service(
    site: &Site,
    service: &Service,
    location: Option<&Location>,
    lang: Language,
) -> Value {
    let name = service.name.get(lang);
    let (name, area_served) = match location {
        Some(loc) => (format!("{} {} {}", name, t("in", lang), loc.name), city(loc)),
        None => (
            name.clone(),
            Value::Array(site.catalog.locations.iter().map(city).collect()),
        ),
    };
    let mut node = json!({
        "@context": "https://schema.org",
        "@type": "Service",
        "name": name,
        "serviceType": service.name.get(lang),
        "description": service.description.get(lang),
        "provider": { "@id": business_id(site) },
        "areaServed": area_served,
        "image": site.site.absolute_url(&service.image),
        "inLanguage": lang.code(),
    });
    if let Some(keywords) = &service.long_tail_keywords {
        node["keywords"] = json!(keywords.get(lang).join(", "));
    }
    node
}

/// `FAQPage` for services that have questions; `None` otherwise.
pub fn faq_page(service: &Service, lang: Language) -> Option<Value> {
    let faq = service.faq.as_ref().filter(|faq| !faq.is_empty())?;
    let questions: Vec<Value> = faq
        .iter()
        .map(|item| {
            json!({
                "@type": "Question",
                "name": item.question.get(lang),
                "acceptedAnswer": { "@type": "Answer", "text": item.answer.get(lang) },
            })
        })
        .collect();
    Some(json!({
        "@context": "https://schema.org",
        "@type": "FAQPage",
        "inLanguage": lang.code(),
        "mainEntity": questions,
    }))
}

pub fn blog_posting(site: &Site, post: &BlogPost, lang: Language) -> Value {
    let date = post.date.format("%Y-%m-%d").to_string();
    json!({
        "@context": "https://schema.org",
        "@type": "BlogPosting",
        "headline": post.title.get(lang),
        "description": post.summary.get(lang),
        "datePublished": date,
        "dateModified": date,
        "inLanguage": lang.code(),
        "publisher": { "@id": business_id(site) },
    })
}

/// Trail of `(label, path)` from the home page down to `page`.
pub fn breadcrumb_trail(page: &Page<'_>) -> Vec<(String, String)> {
    let lang = page.lang;
    let crumb = |kind| {
        let p = Page::new(lang, kind);
        p.path()
    };
    let mut trail = vec![(t("home", lang).to_string(), crumb(PageKind::Home))];

    match page.kind {
        PageKind::Home => {}
        PageKind::ServiceIndex => {
            trail.push((t("services", lang).to_string(), page.path()));
        }
        PageKind::LocationIndex => {
            trail.push((t("locations", lang).to_string(), page.path()));
        }
        PageKind::Contact => {
            trail.push((t("contact", lang).to_string(), page.path()));
        }
        PageKind::BlogIndex => {
            trail.push((t("blog", lang).to_string(), page.path()));
        }
        PageKind::Service(s) => {
            trail.push((t("services", lang).to_string(), crumb(PageKind::ServiceIndex)));
            trail.push((s.name.get(lang).clone(), page.path()));
        }
        PageKind::Location(l) => {
            trail.push((t("locations", lang).to_string(), crumb(PageKind::LocationIndex)));
            trail.push((l.name.clone(), page.path()));
        }
        PageKind::ServiceLocation(s, l) => {
            trail.push((t("services", lang).to_string(), crumb(PageKind::ServiceIndex)));
            trail.push((s.name.get(lang).clone(), crumb(PageKind::Service(s))));
            trail.push((l.name.clone(), page.path()));
        }
        PageKind::BlogPost(p) => {
            trail.push((t("blog", lang).to_string(), crumb(PageKind::BlogIndex)));
            trail.push((p.title.get(lang).clone(), page.path()));
        }
    }

    trail
}

pub fn breadcrumbs(site: &Site, page: &Page<'_>) -> Value {
    let items: Vec<Value> = breadcrumb_trail(page)
        .into_iter()
        .enumerate()
        .map(|(i, (name, path))| {
            json!({
                "@type": "ListItem",
                "position": i + 1,
                "name": name,
                "item": site.site.absolute_url(&path),
            })
        })
        .collect();
    json!({
        "@context": "https://schema.org",
        "@type": "BreadcrumbList",
        "itemListElement": items,
    })
}

/// All structured-data nodes a page embeds.
pub fn structured_data_for(site: &Site, page: &Page<'_>) -> Vec<Value> {
    let lang = page.lang;
    let mut nodes = Vec::new();

    match page.kind {
        PageKind::Home | PageKind::Contact => nodes.push(local_business(site, lang)),
        PageKind::Service(s) => {
            nodes.push(service(site, s, None, lang));
            nodes.extend(faq_page(s, lang));
        }
        PageKind::ServiceLocation(s, l) => {
            nodes.push(service(site, s, Some(l), lang));
            nodes.extend(faq_page(s, lang));
        }
        PageKind::BlogPost(p) => nodes.push(blog_posting(site, p, lang)),
        PageKind::ServiceIndex
        | PageKind::LocationIndex
        | PageKind::Location(_)
        | PageKind::BlogIndex => {}
    }

    if !matches!(page.kind, PageKind::Home) {
        nodes.push(breadcrumbs(site, page));
    }

    nodes
}
