//! Static path enumeration.
//!
//! The page set is the cross product of the catalog with [`Language::ALL`],
//! plus five fixed pages per language. Nothing outside this set is ever
//! rendered; the router and sitemap both work from it.

use glasspage_core::{BlogPost, Catalog, Language, Location, Service};

/// What a page shows, borrowing the catalog entries it is built from.
#[derive(Debug, Clone, Copy)]
pub enum PageKind<'a> {
    Home,
    ServiceIndex,
    LocationIndex,
    Contact,
    BlogIndex,
    Service(&'a Service),
    Location(&'a Location),
    ServiceLocation(&'a Service, &'a Location),
    BlogPost(&'a BlogPost),
}

/// One renderable page in one language.
#[derive(Debug, Clone, Copy)]
pub struct Page<'a> {
    pub lang: Language,
    pub kind: PageKind<'a>,
}

/// The slug parameters a page path is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PathParams<'a> {
    pub lang: Language,
    pub service: Option<&'a str>,
    pub location: Option<&'a str>,
}

impl<'a> Page<'a> {
    pub fn new(lang: Language, kind: PageKind<'a>) -> Self {
        Self { lang, kind }
    }

    /// Canonical site-relative path, no trailing slash.
    pub fn path(&self) -> String {
        let lang = self.lang;
        match self.kind {
            PageKind::Home => format!("/{}", lang),
            PageKind::ServiceIndex => format!("/{}/{}", lang, lang.services_segment()),
            PageKind::LocationIndex => format!("/{}/{}", lang, lang.locations_segment()),
            PageKind::Contact => format!("/{}/{}", lang, lang.contact_segment()),
            PageKind::BlogIndex => format!("/{}/{}", lang, lang.blog_segment()),
            PageKind::Service(service) => format!(
                "/{}/{}/{}",
                lang,
                lang.services_segment(),
                service.slug.get(lang)
            ),
            PageKind::Location(location) => format!(
                "/{}/{}/{}",
                lang,
                lang.locations_segment(),
                location.slug.get(lang)
            ),
            PageKind::ServiceLocation(service, location) => format!(
                "/{}/{}/{}/{}/{}",
                lang,
                lang.services_segment(),
                service.slug.get(lang),
                lang.location_preposition(),
                location.slug.get(lang)
            ),
            PageKind::BlogPost(post) => format!(
                "/{}/{}/{}",
                lang,
                lang.blog_segment(),
                post.slug.get(lang)
            ),
        }
    }

    /// The same page in the other language.
    pub fn sibling(&self) -> Page<'a> {
        Page::new(self.lang.sibling(), self.kind)
    }

    pub fn params(&self) -> PathParams<'a> {
        let lang = self.lang;
        let (service, location) = match self.kind {
            PageKind::Service(s) => (Some(s.slug.get(lang).as_str()), None),
            PageKind::Location(l) => (None, Some(l.slug.get(lang).as_str())),
            PageKind::ServiceLocation(s, l) => (
                Some(s.slug.get(lang).as_str()),
                Some(l.slug.get(lang).as_str()),
            ),
            _ => (None, None),
        };
        PathParams {
            lang,
            service,
            location,
        }
    }
}

/// Every page the site pre-renders, grouped by shape.
#[derive(Debug, Clone, Default)]
pub struct PageSet<'a> {
    pub fixed: Vec<Page<'a>>,
    pub services: Vec<Page<'a>>,
    pub locations: Vec<Page<'a>>,
    pub service_locations: Vec<Page<'a>>,
    pub posts: Vec<Page<'a>>,
}

impl<'a> PageSet<'a> {
    pub fn iter(&self) -> impl Iterator<Item = &Page<'a>> {
        self.fixed
            .iter()
            .chain(&self.services)
            .chain(&self.locations)
            .chain(&self.service_locations)
            .chain(&self.posts)
    }

    pub fn len(&self) -> usize {
        self.fixed.len()
            + self.services.len()
            + self.locations.len()
            + self.service_locations.len()
            + self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn paths(&self) -> Vec<String> {
        self.iter().map(Page::path).collect()
    }

    pub fn find_by_path(&self, path: &str) -> Option<&Page<'a>> {
        self.iter().find(|page| page.path() == path)
    }

    /// `(language, service slug, location slug)` for every combination page.
    pub fn service_location_params(&self) -> Vec<PathParams<'a>> {
        self.service_locations.iter().map(Page::params).collect()
    }
}

/// Enumerate the full page set, language-major, in catalog order.
pub fn enumerate_pages(catalog: &Catalog) -> PageSet<'_> {
    let mut set = PageSet::default();

    for lang in Language::ALL {
        for kind in [
            PageKind::Home,
            PageKind::ServiceIndex,
            PageKind::LocationIndex,
            PageKind::Contact,
            PageKind::BlogIndex,
        ] {
            set.fixed.push(Page::new(lang, kind));
        }

        for service in &catalog.services {
            set.services.push(Page::new(lang, PageKind::Service(service)));
        }

        for location in &catalog.locations {
            set.locations.push(Page::new(lang, PageKind::Location(location)));
        }

        for service in &catalog.services {
            for location in &catalog.locations {
                set.service_locations
                    .push(Page::new(lang, PageKind::ServiceLocation(service, location)));
            }
        }

        for post in &catalog.posts {
            set.posts.push(Page::new(lang, PageKind::BlogPost(post)));
        }
    }

    tracing::debug!(
        fixed = set.fixed.len(),
        services = set.services.len(),
        locations = set.locations.len(),
        service_locations = set.service_locations.len(),
        posts = set.posts.len(),
        "Enumerated static pages"
    );

    set
}
