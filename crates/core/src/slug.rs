//! Slug normalization and canonical-slug resolution.
//!
//! Every catalog entity has one canonical slug per language. Incoming path
//! segments are folded with [`normalize_slug`] before comparison, so
//! `Instalación-Espejos` and `instalacion-espejos` name the same page.
//! Anything that resolves but is not byte-identical to the canonical slug must
//! be answered with a redirect.

use crate::i18n::Language;
use crate::types::{BlogPost, Location, Service};
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

/// An entity addressable by a per-language slug.
pub trait Sluggable {
    fn slug(&self, lang: Language) -> &str;
    fn aliases(&self, lang: Language) -> &[String];
}

impl Sluggable for Service {
    fn slug(&self, lang: Language) -> &str {
        self.slug.get(lang)
    }

    fn aliases(&self, lang: Language) -> &[String] {
        self.aliases.get(lang)
    }
}

impl Sluggable for Location {
    fn slug(&self, lang: Language) -> &str {
        self.slug.get(lang)
    }

    fn aliases(&self, lang: Language) -> &[String] {
        self.aliases.get(lang)
    }
}

impl Sluggable for BlogPost {
    fn slug(&self, lang: Language) -> &str {
        self.slug.get(lang)
    }

    fn aliases(&self, lang: Language) -> &[String] {
        self.aliases.get(lang)
    }
}

/// Result of a successful lookup.
#[derive(Debug)]
pub struct SlugMatch<'a, T> {
    pub entity: &'a T,
    pub canonical_slug: &'a str,
    /// The input was not the canonical slug verbatim.
    pub should_redirect: bool,
}

// Manual impls: derives would require `T: Clone`.
impl<T> Clone for SlugMatch<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for SlugMatch<'_, T> {}

/// Fold a raw path segment into slug form.
///
/// Accents are stripped, letters lower-cased, and runs of whitespace,
/// underscores and hyphens collapse to one `-`. Remaining punctuation is
/// dropped. The result never starts or ends with `-`.
pub fn normalize_slug(raw: &str) -> String {
    let mut slug = String::with_capacity(raw.len());
    let mut pending_hyphen = false;

    for ch in raw.nfkd() {
        if is_combining_mark(ch) {
            continue;
        }

        for lower in ch.to_lowercase() {
            if lower.is_alphanumeric() {
                if pending_hyphen && !slug.is_empty() {
                    slug.push('-');
                }
                pending_hyphen = false;
                slug.push(lower);
            } else if lower.is_whitespace() || lower == '-' || lower == '_' {
                pending_hyphen = true;
            }
        }
    }

    slug
}

/// Resolve `input` against `catalog` in `lang`.
///
/// Lookup order is canonical slugs, then aliases, then the sibling language's
/// canonical slugs; the first entity in catalog order wins within each stage.
/// `None` means the caller should answer with a not-found page.
pub fn resolve_slug<'a, T: Sluggable>(
    input: &str,
    lang: Language,
    catalog: &'a [T],
) -> Option<SlugMatch<'a, T>> {
    let wanted = normalize_slug(input);
    if wanted.is_empty() {
        return None;
    }

    let entity = catalog
        .iter()
        .find(|e| normalize_slug(e.slug(lang)) == wanted)
        .or_else(|| {
            catalog.iter().find(|e| {
                e.aliases(lang)
                    .iter()
                    .any(|alias| normalize_slug(alias) == wanted)
            })
        })
        .or_else(|| {
            catalog
                .iter()
                .find(|e| normalize_slug(e.slug(lang.sibling())) == wanted)
        })?;

    let canonical_slug = entity.slug(lang);
    let should_redirect = input != canonical_slug;

    tracing::trace!(input, canonical_slug, should_redirect, "Resolved slug");

    Some(SlugMatch {
        entity,
        canonical_slug,
        should_redirect,
    })
}
