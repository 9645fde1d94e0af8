//! Supported languages and the display-string table.
//!
//! The site is published in exactly two languages. Besides its code, each
//! language owns the words that appear in its URLs (`/en/services/...` vs
//! `/es/servicios/...`), so every path segment that is not a catalog slug is
//! looked up here.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A site language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Es,
}

impl Language {
    /// Every supported language, in enumeration order.
    pub const ALL: [Language; 2] = [Language::En, Language::Es];

    /// ISO 639-1 code, also used as the first path segment and as `hreflang`.
    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Es => "es",
        }
    }

    /// The other language of the pair.
    pub fn sibling(self) -> Language {
        match self {
            Language::En => Language::Es,
            Language::Es => Language::En,
        }
    }

    pub fn from_code(code: &str) -> Result<Language> {
        match code {
            "en" => Ok(Language::En),
            "es" => Ok(Language::Es),
            other => Err(Error::InvalidData(format!(
                "Unknown language code: '{}'",
                other
            ))),
        }
    }

    pub fn services_segment(self) -> &'static str {
        match self {
            Language::En => "services",
            Language::Es => "servicios",
        }
    }

    pub fn locations_segment(self) -> &'static str {
        match self {
            Language::En => "locations",
            Language::Es => "ubicaciones",
        }
    }

    pub fn contact_segment(self) -> &'static str {
        match self {
            Language::En => "contact",
            Language::Es => "contacto",
        }
    }

    pub fn blog_segment(self) -> &'static str {
        "blog"
    }

    /// Joins a service slug to a location slug: `/services/x/in/y`.
    pub fn location_preposition(self) -> &'static str {
        match self {
            Language::En => "in",
            Language::Es => "en",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Language::from_code(s)
    }
}

/// (key, English, Spanish)
const STRINGS: &[(&str, &str, &str)] = &[
    ("home", "Home", "Inicio"),
    ("services", "Services", "Servicios"),
    ("locations", "Service Areas", "Áreas de Servicio"),
    ("contact", "Contact Us", "Contáctenos"),
    ("blog", "Blog", "Blog"),
    ("features", "What's Included", "Qué Incluye"),
    ("faq", "Frequently Asked Questions", "Preguntas Frecuentes"),
    ("in", "in", "en"),
    ("call_now", "Call now", "Llame ahora"),
    ("free_estimate", "Free estimate", "Presupuesto gratis"),
    ("services_in", "Glass services in", "Servicios de vidrio en"),
    ("read_more", "Read more", "Leer más"),
    ("published", "Published", "Publicado"),
    ("not_found", "Page not found", "Página no encontrada"),
    ("redirecting", "Redirecting", "Redirigiendo"),
];

/// Look up a display string. Unknown keys fall back to the key itself so a
/// missing entry shows up on the page instead of failing the build.
pub fn t(key: &str, lang: Language) -> &str {
    STRINGS
        .iter()
        .find(|(k, _, _)| *k == key)
        .map(|(_, en, es)| match lang {
            Language::En => *en,
            Language::Es => *es,
        })
        .unwrap_or(key)
}
