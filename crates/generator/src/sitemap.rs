//! Sitemap generation.
//!
//! Builds one [`SitemapEntry`] per enumerated page and serializes them to a
//! sitemaps.org 0.9 document with `xhtml:link` language alternates and
//! `image:image` references. [`parse_sitemap`] reads the same format back so
//! builds can be checked against the page set.
//!
//! Priority tiers, highest first:
//!
//! | page | priority |
//! |---|---|
//! | home | 1.0 |
//! | services index, contact | 0.9 |
//! | service, location, locations index | 0.8 |
//! | blog index, boosted service×location | 0.7 |
//! | service×location, blog post | 0.6 |

use crate::paths::{Page, PageKind, PageSet};
use chrono::NaiveDate;
use glasspage_core::{Error, Result, Site};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";
const XHTML_NS: &str = "http://www.w3.org/1999/xhtml";
const IMAGE_NS: &str = "http://www.google.com/schemas/sitemap-image/1.1";

/// Output file name at the site root.
pub const SITEMAP_FILE: &str = "sitemap.xml";

/// Change frequency hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFrequency {
    Always,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl ChangeFrequency {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Always => "always",
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
            Self::Never => "never",
        }
    }
}

impl fmt::Display for ChangeFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChangeFrequency {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "always" => Ok(Self::Always),
            "hourly" => Ok(Self::Hourly),
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            "never" => Ok(Self::Never),
            _ => Err(Error::InvalidData(format!("Invalid changefreq value: {s}"))),
        }
    }
}

/// `xhtml:link rel="alternate"` annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alternate {
    pub hreflang: String,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SitemapEntry {
    pub loc: String,
    pub lastmod: NaiveDate,
    pub changefreq: ChangeFrequency,
    pub priority: f32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternates: Vec<Alternate>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
}

/// Priority weight for a page.
pub fn priority_for(site: &Site, page: &Page<'_>) -> f32 {
    match page.kind {
        PageKind::Home => 1.0,
        PageKind::ServiceIndex | PageKind::Contact => 0.9,
        PageKind::Service(_) | PageKind::Location(_) | PageKind::LocationIndex => 0.8,
        PageKind::BlogIndex => 0.7,
        PageKind::ServiceLocation(_, location) if site.sitemap.is_boosted(&location.id) => 0.7,
        PageKind::ServiceLocation(..) | PageKind::BlogPost(_) => 0.6,
    }
}

pub fn changefreq_for(page: &Page<'_>) -> ChangeFrequency {
    match page.kind {
        PageKind::Home | PageKind::BlogIndex => ChangeFrequency::Weekly,
        PageKind::BlogPost(_) => ChangeFrequency::Yearly,
        _ => ChangeFrequency::Monthly,
    }
}

/// One entry per page, in page-set order.
///
/// `build_date` is used as `lastmod` unless the site pins one; posts always
/// use their publication date.
pub fn build_sitemap(site: &Site, pages: &PageSet<'_>, build_date: NaiveDate) -> Vec<SitemapEntry> {
    let default_lastmod = site.site.lastmod.unwrap_or(build_date);

    let entries: Vec<SitemapEntry> = pages
        .iter()
        .map(|page| {
            let sibling = page.sibling();
            let lastmod = match page.kind {
                PageKind::BlogPost(post) => post.date,
                _ => default_lastmod,
            };
            let images = match page.kind {
                PageKind::Service(service) | PageKind::ServiceLocation(service, _) => {
                    vec![site.site.absolute_url(&service.image)]
                }
                _ => Vec::new(),
            };

            SitemapEntry {
                loc: site.site.absolute_url(&page.path()),
                lastmod,
                changefreq: changefreq_for(page),
                priority: priority_for(site, page),
                alternates: vec![Alternate {
                    hreflang: sibling.lang.code().to_string(),
                    href: site.site.absolute_url(&sibling.path()),
                }],
                images,
            }
        })
        .collect();

    tracing::debug!(entries = entries.len(), "Built sitemap entries");
    entries
}

fn xml_error(err: impl fmt::Display) -> Error {
    Error::Render(format!("sitemap XML: {}", err))
}

fn write_text_element(writer: &mut Writer<Vec<u8>>, name: &str, text: &str) -> Result<()> {
    writer
        .write_event(Event::Start(BytesStart::new(name)))
        .map_err(xml_error)?;
    writer
        .write_event(Event::Text(BytesText::new(text)))
        .map_err(xml_error)?;
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .map_err(xml_error)?;
    Ok(())
}

/// Serialize entries to sitemap XML.
pub fn render_sitemap(entries: &[SitemapEntry]) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(xml_error)?;

    let urlset = BytesStart::new("urlset").with_attributes([
        ("xmlns", SITEMAP_NS),
        ("xmlns:xhtml", XHTML_NS),
        ("xmlns:image", IMAGE_NS),
    ]);
    writer.write_event(Event::Start(urlset)).map_err(xml_error)?;

    for entry in entries {
        writer
            .write_event(Event::Start(BytesStart::new("url")))
            .map_err(xml_error)?;

        write_text_element(&mut writer, "loc", &entry.loc)?;
        write_text_element(
            &mut writer,
            "lastmod",
            &entry.lastmod.format("%Y-%m-%d").to_string(),
        )?;
        write_text_element(&mut writer, "changefreq", entry.changefreq.as_str())?;
        write_text_element(&mut writer, "priority", &format!("{:.1}", entry.priority))?;

        for alternate in &entry.alternates {
            let link = BytesStart::new("xhtml:link").with_attributes([
                ("rel", "alternate"),
                ("hreflang", alternate.hreflang.as_str()),
                ("href", alternate.href.as_str()),
            ]);
            writer.write_event(Event::Empty(link)).map_err(xml_error)?;
        }

        for image in &entry.images {
            writer
                .write_event(Event::Start(BytesStart::new("image:image")))
                .map_err(xml_error)?;
            write_text_element(&mut writer, "image:loc", image)?;
            writer
                .write_event(Event::End(BytesEnd::new("image:image")))
                .map_err(xml_error)?;
        }

        writer
            .write_event(Event::End(BytesEnd::new("url")))
            .map_err(xml_error)?;
    }

    writer
        .write_event(Event::End(BytesEnd::new("urlset")))
        .map_err(xml_error)?;

    String::from_utf8(writer.into_inner()).map_err(xml_error)
}

#[derive(Default)]
struct PartialEntry {
    loc: Option<String>,
    lastmod: Option<NaiveDate>,
    changefreq: Option<ChangeFrequency>,
    priority: Option<f32>,
    alternates: Vec<Alternate>,
    images: Vec<String>,
}

/// Parse a sitemap produced by [`render_sitemap`].
///
/// Entries missing `loc` are dropped; missing `changefreq`/`priority`/`lastmod`
/// are errors since the generator always writes them.
pub fn parse_sitemap(xml: &str) -> Result<Vec<SitemapEntry>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut entries = Vec::new();
    let mut buf = Vec::new();
    let mut current: Option<PartialEntry> = None;
    let mut current_element: Option<String> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                match name.as_str() {
                    "url" => current = Some(PartialEntry::default()),
                    "loc" | "lastmod" | "changefreq" | "priority" | "image:loc"
                        if current.is_some() =>
                    {
                        current_element = Some(name);
                    }
                    _ => {}
                }
            }
            Ok(Event::Empty(e)) => {
                if e.name().as_ref() == b"xhtml:link" {
                    if let Some(entry) = current.as_mut() {
                        let mut hreflang = None;
                        let mut href = None;
                        for attr in e.attributes() {
                            let attr = attr.map_err(xml_error)?;
                            let value = attr.unescape_value().map_err(xml_error)?.to_string();
                            match attr.key.as_ref() {
                                b"hreflang" => hreflang = Some(value),
                                b"href" => href = Some(value),
                                _ => {}
                            }
                        }
                        if let (Some(hreflang), Some(href)) = (hreflang, href) {
                            entry.alternates.push(Alternate { hreflang, href });
                        }
                    }
                }
            }
            Ok(Event::End(e)) => {
                if e.name().as_ref() == b"url" {
                    if let Some(partial) = current.take() {
                        if let Some(entry) = finish_entry(partial)? {
                            entries.push(entry);
                        }
                    }
                }
                current_element = None;
            }
            Ok(Event::Text(e)) => {
                if let (Some(element), Some(entry)) = (current_element.as_deref(), current.as_mut())
                {
                    let text = e.unescape().map_err(xml_error)?;
                    let text = text.trim();
                    match element {
                        "loc" => entry.loc = Some(text.to_string()),
                        "lastmod" => {
                            entry.lastmod = Some(
                                NaiveDate::parse_from_str(text, "%Y-%m-%d").map_err(xml_error)?,
                            )
                        }
                        "changefreq" => entry.changefreq = Some(text.parse()?),
                        "priority" => entry.priority = Some(text.parse().map_err(xml_error)?),
                        "image:loc" => entry.images.push(text.to_string()),
                        _ => {}
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(entries)
}

fn finish_entry(partial: PartialEntry) -> Result<Option<SitemapEntry>> {
    let Some(loc) = partial.loc else {
        return Ok(None);
    };
    let missing =
        |field: &str| Error::InvalidData(format!("sitemap entry {} has no {}", loc, field));
    Ok(Some(SitemapEntry {
        lastmod: partial.lastmod.ok_or_else(|| missing("lastmod"))?,
        changefreq: partial.changefreq.ok_or_else(|| missing("changefreq"))?,
        priority: partial.priority.ok_or_else(|| missing("priority"))?,
        alternates: partial.alternates,
        images: partial.images,
        loc,
    }))
}

/// robots.txt allowing everything and pointing crawlers at the sitemap.
pub fn robots_txt(site: &Site) -> String {
    format!(
        "User-agent: *\nAllow: /\n\nSitemap: {}\n",
        site.site.absolute_url(&format!("/{}", SITEMAP_FILE))
    )
}
