use crate::i18n::Language;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A value that must exist in every supported language.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Localized<T> {
    pub en: T,
    pub es: T,
}

impl<T> Localized<T> {
    pub fn new(en: T, es: T) -> Self {
        Self { en, es }
    }

    pub fn get(&self, lang: Language) -> &T {
        match lang {
            Language::En => &self.en,
            Language::Es => &self.es,
        }
    }

    /// Iterate `(language, value)` pairs in `Language::ALL` order.
    pub fn iter(&self) -> impl Iterator<Item = (Language, &T)> {
        Language::ALL.into_iter().map(move |lang| (lang, self.get(lang)))
    }
}

/// Complete site definition loaded from `site.toml`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Site {
    pub site: SiteConfig,
    pub sitemap: SitemapConfig,
    pub catalog: Catalog,
}

/// Business and publishing settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Absolute origin without trailing slash, e.g. `https://clearviewglass.example`
    pub base_url: String,
    pub business_name: String,
    pub telephone: String,
    pub email: String,
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub default_language: Language,
    /// Fixed `lastmod` for reproducible builds; the build date is used otherwise.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lastmod: Option<NaiveDate>,
}

impl SiteConfig {
    /// Join a site-relative path onto the base URL.
    pub fn absolute_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

/// Sitemap weighting settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SitemapConfig {
    /// Location ids whose service×location pages get a priority boost.
    #[serde(default)]
    pub boosted_locations: Vec<String>,
}

impl SitemapConfig {
    pub fn is_boosted(&self, location_id: &str) -> bool {
        self.boosted_locations.iter().any(|id| id == location_id)
    }
}

/// The static service, location and blog tables
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    pub services: Vec<Service>,
    pub locations: Vec<Location>,
    pub posts: Vec<BlogPost>,
}

impl Catalog {
    pub fn service(&self, id: &str) -> Option<&Service> {
        self.services.iter().find(|s| s.id == id)
    }

    pub fn location(&self, id: &str) -> Option<&Location> {
        self.locations.iter().find(|l| l.id == id)
    }

    pub fn post(&self, id: &str) -> Option<&BlogPost> {
        self.posts.iter().find(|p| p.id == id)
    }
}

/// A service the business offers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub id: String,
    pub name: Localized<String>,
    pub slug: Localized<String>,
    /// Legacy or alternate slugs that redirect to `slug`.
    #[serde(default)]
    pub aliases: Localized<Vec<String>>,
    pub description: Localized<String>,
    pub features: Localized<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub faq: Option<Vec<Faq>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_tail_keywords: Option<Localized<Vec<String>>>,
    /// Image reference under `public/`, passed through untouched.
    pub image: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Faq {
    pub question: Localized<String>,
    pub answer: Localized<String>,
}

/// A city or neighborhood in the service area
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub id: String,
    pub name: String,
    pub state: String,
    pub slug: Localized<String>,
    #[serde(default)]
    pub aliases: Localized<Vec<String>>,
}

/// A blog article, body in markdown
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: String,
    pub date: NaiveDate,
    pub title: Localized<String>,
    pub slug: Localized<String>,
    #[serde(default)]
    pub aliases: Localized<Vec<String>>,
    pub summary: Localized<String>,
    pub body: Localized<String>,
}
