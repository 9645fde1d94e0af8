use crate::error::{Error, Result};
use crate::i18n::Language;
use crate::types::*;
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// The Clear View Glass catalog, written by `glasspage init`.
pub const STARTER_SITE_TOML: &str = include_str!("../catalog/site.toml");

/// Raw TOML configuration structure
/// This matches the site.toml file structure exactly
#[derive(Debug, Deserialize)]
struct RawConfig {
    site: RawSiteConfig,
    #[serde(default)]
    sitemap: SitemapConfig,
    #[serde(default)]
    service: Vec<Service>,
    #[serde(default)]
    location: Vec<Location>,
    #[serde(default)]
    post: Vec<RawPost>,
}

#[derive(Debug, Deserialize)]
struct RawSiteConfig {
    base_url: String,
    business_name: String,
    telephone: String,
    email: String,
    street_address: String,
    city: String,
    state: String,
    postal_code: String,
    #[serde(default = "default_language")]
    default_language: Language,
    lastmod: Option<String>, // Parse as NaiveDate
}

#[derive(Debug, Deserialize)]
struct RawPost {
    id: String,
    date: String, // Parse as NaiveDate
    title: Localized<String>,
    slug: Localized<String>,
    #[serde(default)]
    aliases: Localized<Vec<String>>,
    summary: Localized<String>,
    body: Localized<String>,
}

fn default_language() -> Language {
    Language::En
}

/// Parse site.toml from a file path
pub fn parse_site_toml<P: AsRef<Path>>(path: P) -> Result<Site> {
    let content = fs::read_to_string(path)?;
    parse_site_toml_str(&content)
}

/// Parse site.toml from a string (useful for testing)
pub fn parse_site_toml_str(content: &str) -> Result<Site> {
    let raw: RawConfig = toml::from_str(content)?;

    let lastmod = raw
        .site
        .lastmod
        .as_deref()
        .map(|s| parse_date(s, "site.lastmod"))
        .transpose()?;

    let site = SiteConfig {
        base_url: raw.site.base_url.trim_end_matches('/').to_string(),
        business_name: raw.site.business_name,
        telephone: raw.site.telephone,
        email: raw.site.email,
        street_address: raw.site.street_address,
        city: raw.site.city,
        state: raw.site.state,
        postal_code: raw.site.postal_code,
        default_language: raw.site.default_language,
        lastmod,
    };

    let posts: Result<Vec<BlogPost>> = raw
        .post
        .into_iter()
        .map(|p| {
            Ok(BlogPost {
                date: parse_date(&p.date, &format!("post '{}' date", p.id))?,
                id: p.id,
                title: p.title,
                slug: p.slug,
                aliases: p.aliases,
                summary: p.summary,
                body: p.body,
            })
        })
        .collect();

    let catalog = Catalog {
        services: raw.service,
        locations: raw.location,
        posts: posts?,
    };

    check_ids("service", catalog.services.iter().map(|s| s.id.as_str()))?;
    check_ids("location", catalog.locations.iter().map(|l| l.id.as_str()))?;
    check_ids("post", catalog.posts.iter().map(|p| p.id.as_str()))?;

    for service in &catalog.services {
        check_slugs("service", &service.id, &service.slug)?;
    }
    for location in &catalog.locations {
        check_slugs("location", &location.id, &location.slug)?;
    }
    for post in &catalog.posts {
        check_slugs("post", &post.id, &post.slug)?;
    }

    tracing::debug!(
        services = catalog.services.len(),
        locations = catalog.locations.len(),
        posts = catalog.posts.len(),
        "Loaded site catalog"
    );

    Ok(Site {
        site,
        sitemap: raw.sitemap,
        catalog,
    })
}

fn parse_date(s: &str, field_name: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| Error::ConfigParse(format!("Invalid {}: '{}' ({})", field_name, s, e)))
}

/// Ids must be non-empty and unique within their table.
fn check_ids<'a>(kind: &str, ids: impl Iterator<Item = &'a str>) -> Result<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if id.trim().is_empty() {
            return Err(Error::ConfigParse(format!("Empty {} id", kind)));
        }
        if !seen.insert(id) {
            return Err(Error::ConfigParse(format!("Duplicate {} id '{}'", kind, id)));
        }
    }
    Ok(())
}

/// Every entity needs a usable slug in both languages.
fn check_slugs(kind: &str, id: &str, slug: &Localized<String>) -> Result<()> {
    for (lang, value) in slug.iter() {
        if value.trim().is_empty() {
            return Err(Error::ConfigParse(format!(
                "Empty {} slug for '{}' in language '{}'",
                kind, id, lang
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r##"
[site]
base_url = "https://glass.example.com/"
business_name = "Test Glass"
telephone = "+1-555-0100"
email = "hello@glass.example.com"
street_address = "1 Main St"
city = "Miami"
state = "FL"
postal_code = "33101"

[[service]]
id = "mirrors"
name = { en = "Mirror Installation", es = "Instalación de Espejos" }
slug = { en = "mirror-installation", es = "instalacion-espejos" }
description = { en = "Mirrors.", es = "Espejos." }
features = { en = ["Cut to size"], es = ["Corte a medida"] }
image = "/images/mirrors.jpg"

[[location]]
id = "miami"
name = "Miami"
state = "FL"
slug = { en = "miami", es = "miami" }
"##;

    #[test]
    fn test_parse_minimal_config() {
        let site = parse_site_toml_str(MINIMAL).unwrap();
        assert_eq!(site.site.business_name, "Test Glass");
        assert_eq!(site.site.base_url, "https://glass.example.com");
        assert_eq!(site.site.default_language, Language::En);
        assert!(site.site.lastmod.is_none());
        assert_eq!(site.catalog.services.len(), 1);
        assert_eq!(site.catalog.locations.len(), 1);
        assert!(site.catalog.posts.is_empty());
        assert!(site.catalog.services[0].faq.is_none());
        assert!(site.catalog.services[0].aliases.en.is_empty());
        assert!(site.sitemap.boosted_locations.is_empty());
    }

    #[test]
    fn test_parse_starter_catalog() {
        let site = parse_site_toml_str(STARTER_SITE_TOML).unwrap();
        assert_eq!(site.catalog.services.len(), 7);
        assert_eq!(site.catalog.locations.len(), 10);
        assert_eq!(site.catalog.posts.len(), 2);
        let windows = site.catalog.service("window-glass-replacement").unwrap();
        assert_eq!(windows.name.en, "Window Glass Replacement");
        assert_eq!(windows.slug.es, "reemplazo-vidrios-ventanas");
    }

    #[test]
    fn test_rejects_missing_language_key() {
        let toml = MINIMAL.replace(
            r#"slug = { en = "mirror-installation", es = "instalacion-espejos" }"#,
            r#"slug = { en = "mirror-installation" }"#,
        );
        let err = parse_site_toml_str(&toml).unwrap_err();
        assert!(matches!(err, Error::ConfigParse(_)));
    }

    #[test]
    fn test_rejects_unsupported_language_key() {
        let toml = MINIMAL.replace(
            r#"slug = { en = "miami", es = "miami" }"#,
            r#"slug = { en = "miami", es = "miami", fr = "miami" }"#,
        );
        assert!(parse_site_toml_str(&toml).is_err());
    }

    #[test]
    fn test_rejects_flat_slug_string() {
        let toml = MINIMAL.replace(
            r#"slug = { en = "miami", es = "miami" }"#,
            r#"slug = "miami""#,
        );
        assert!(parse_site_toml_str(&toml).is_err());
    }

    #[test]
    fn test_rejects_empty_slug() {
        let toml = MINIMAL.replace(
            r#"slug = { en = "miami", es = "miami" }"#,
            r#"slug = { en = "miami", es = "  " }"#,
        );
        let err = parse_site_toml_str(&toml).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Empty location slug"));
        assert!(msg.contains("'es'"));
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let toml = format!(
            "{}\n[[location]]\nid = \"miami\"\nname = \"Miami\"\nstate = \"FL\"\nslug = {{ en = \"miami-2\", es = \"miami-2\" }}\n",
            MINIMAL
        );
        let err = parse_site_toml_str(&toml).unwrap_err();
        assert!(err.to_string().contains("Duplicate location id 'miami'"));
    }

    #[test]
    fn test_parse_dates() {
        let toml = MINIMAL.replace(
            "postal_code = \"33101\"",
            "postal_code = \"33101\"\nlastmod = \"2026-01-15\"",
        );
        let site = parse_site_toml_str(&toml).unwrap();
        assert_eq!(
            site.site.lastmod,
            Some(NaiveDate::from_ymd_opt(2026, 1, 15).unwrap())
        );

        let bad = MINIMAL.replace(
            "postal_code = \"33101\"",
            "postal_code = \"33101\"\nlastmod = \"15/01/2026\"",
        );
        let err = parse_site_toml_str(&bad).unwrap_err();
        assert!(err.to_string().contains("site.lastmod"));
    }

    #[test]
    fn test_absolute_url() {
        let site = parse_site_toml_str(MINIMAL).unwrap();
        assert_eq!(
            site.site.absolute_url("/en/services"),
            "https://glass.example.com/en/services"
        );
    }
}
