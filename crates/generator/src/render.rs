use crate::paths::{Page, PageKind};
use crate::structured_data::structured_data_for;
use glasspage_core::{Language, Site, t};
use pulldown_cmark::{Options, Parser, html};

/// Turns a page into a complete HTML document.
pub trait PageRenderer {
    fn render(&self, site: &Site, page: &Page<'_>) -> String;
}

/// HTML-escape a string to prevent XSS attacks
///
/// Escapes: & < > " '
pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render catalog markdown to HTML.
pub fn markdown_to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    let parser = Parser::new_ext(markdown, options);
    let mut out = String::new();
    html::push_html(&mut out, parser);
    out
}

/// Page title, without the business-name suffix.
pub fn page_title(site: &Site, page: &Page<'_>) -> String {
    let lang = page.lang;
    match page.kind {
        PageKind::Home => site.site.business_name.clone(),
        PageKind::ServiceIndex => t("services", lang).to_string(),
        PageKind::LocationIndex => t("locations", lang).to_string(),
        PageKind::Contact => t("contact", lang).to_string(),
        PageKind::BlogIndex => t("blog", lang).to_string(),
        PageKind::Service(s) => s.name.get(lang).clone(),
        PageKind::Location(l) => format!("{} {}", t("services_in", lang), l.name),
        PageKind::ServiceLocation(s, l) => {
            format!("{} {} {}", s.name.get(lang), t("in", lang), l.name)
        }
        PageKind::BlogPost(p) => p.title.get(lang).clone(),
    }
}

/// Minimal server-rendered markup: headline, catalog copy and links.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicRenderer {
    /// Adds the live-reload script used by `glasspage preview`.
    pub preview: bool,
}

impl BasicRenderer {
    pub fn preview() -> Self {
        Self { preview: true }
    }

    fn head(&self, site: &Site, page: &Page<'_>, title: &str) -> String {
        let full_title = if matches!(page.kind, PageKind::Home) {
            title.to_string()
        } else {
            format!("{} | {}", title, site.site.business_name)
        };

        let mut head = String::new();
        head.push_str("    <meta charset=\"UTF-8\">\n");
        head.push_str(
            "    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
        );
        head.push_str(&format!("    <title>{}</title>\n", html_escape(&full_title)));
        head.push_str(&format!(
            "    <link rel=\"canonical\" href=\"{}\">\n",
            html_escape(&site.site.absolute_url(&page.path()))
        ));
        for lang in Language::ALL {
            let alt = Page::new(lang, page.kind);
            head.push_str(&format!(
                "    <link rel=\"alternate\" hreflang=\"{}\" href=\"{}\">\n",
                lang,
                html_escape(&site.site.absolute_url(&alt.path()))
            ));
        }
        for node in structured_data_for(site, page) {
            // `</` cannot appear inside a script element.
            let json = node.to_string().replace("</", "<\\/");
            head.push_str(&format!(
                "    <script type=\"application/ld+json\">{}</script>\n",
                json
            ));
        }
        head
    }

    fn body(&self, site: &Site, page: &Page<'_>) -> String {
        let lang = page.lang;
        let catalog = &site.catalog;
        let mut body = String::new();

        match page.kind {
            PageKind::Home => {
                let phone = html_escape(&site.site.telephone);
                body.push_str(&format!(
                    "<p><a href=\"tel:{}\">{} {}</a></p>\n",
                    phone,
                    t("call_now", lang),
                    phone
                ));
                body.push_str(&format!("<h2>{}</h2>\n<ul>\n", t("services", lang)));
                for s in &catalog.services {
                    let page = Page::new(lang, PageKind::Service(s));
                    body.push_str(&format!("<li>{}</li>\n", link(page, s.name.get(lang))));
                }
                body.push_str(&format!("</ul>\n<h2>{}</h2>\n<ul>\n", t("locations", lang)));
                for l in &catalog.locations {
                    let page = Page::new(lang, PageKind::Location(l));
                    body.push_str(&format!("<li>{}</li>\n", link(page, &l.name)));
                }
                body.push_str("</ul>\n");
            }
            PageKind::ServiceIndex => {
                body.push_str("<ul>\n");
                for s in &catalog.services {
                    let page = Page::new(lang, PageKind::Service(s));
                    body.push_str(&format!(
                        "<li>{}<p>{}</p></li>\n",
                        link(page, s.name.get(lang)),
                        html_escape(s.description.get(lang))
                    ));
                }
                body.push_str("</ul>\n");
            }
            PageKind::LocationIndex => {
                body.push_str("<ul>\n");
                for l in &catalog.locations {
                    let page = Page::new(lang, PageKind::Location(l));
                    let label = format!("{}, {}", l.name, l.state);
                    body.push_str(&format!("<li>{}</li>\n", link(page, &label)));
                }
                body.push_str("</ul>\n");
            }
            PageKind::Contact => {
                let s = &site.site;
                let phone = html_escape(&s.telephone);
                let email = html_escape(&s.email);
                body.push_str(&format!(
                    concat!(
                        "<address>{}<br>{}, {} {}<br>",
                        "<a href=\"tel:{phone}\">{phone}</a><br>",
                        "<a href=\"mailto:{email}\">{email}</a></address>\n"
                    ),
                    html_escape(&s.street_address),
                    html_escape(&s.city),
                    html_escape(&s.state),
                    html_escape(&s.postal_code),
                    phone = phone,
                    email = email,
                ));
            }
            PageKind::BlogIndex => {
                body.push_str("<ul>\n");
                for p in &catalog.posts {
                    let page = Page::new(lang, PageKind::BlogPost(p));
                    body.push_str(&format!(
                        "<li>{}<p>{}</p></li>\n",
                        link(page, p.title.get(lang)),
                        html_escape(p.summary.get(lang))
                    ));
                }
                body.push_str("</ul>\n");
            }
            PageKind::Service(s) | PageKind::ServiceLocation(s, _) => {
                body.push_str(&format!("<p>{}</p>\n", html_escape(s.description.get(lang))));
                body.push_str(&format!("<h2>{}</h2>\n<ul>\n", t("features", lang)));
                for feature in s.features.get(lang) {
                    body.push_str(&format!("<li>{}</li>\n", html_escape(feature)));
                }
                body.push_str("</ul>\n");
                if let Some(faq) = s.faq.as_ref().filter(|faq| !faq.is_empty()) {
                    body.push_str(&format!("<h2>{}</h2>\n", t("faq", lang)));
                    for item in faq {
                        body.push_str(&format!(
                            "<details><summary>{}</summary><p>{}</p></details>\n",
                            html_escape(item.question.get(lang)),
                            html_escape(item.answer.get(lang))
                        ));
                    }
                }
                if let PageKind::Service(s) = page.kind {
                    body.push_str(&format!("<h2>{}</h2>\n<ul>\n", t("locations", lang)));
                    for l in &catalog.locations {
                        let page = Page::new(lang, PageKind::ServiceLocation(s, l));
                        body.push_str(&format!("<li>{}</li>\n", link(page, &l.name)));
                    }
                    body.push_str("</ul>\n");
                }
            }
            PageKind::Location(l) => {
                body.push_str("<ul>\n");
                for s in &catalog.services {
                    let page = Page::new(lang, PageKind::ServiceLocation(s, l));
                    let label = format!("{} {} {}", s.name.get(lang), t("in", lang), l.name);
                    body.push_str(&format!("<li>{}</li>\n", link(page, &label)));
                }
                body.push_str("</ul>\n");
            }
            PageKind::BlogPost(p) => {
                body.push_str(&format!(
                    "<p><time datetime=\"{0}\">{1} {0}</time></p>\n",
                    p.date.format("%Y-%m-%d"),
                    t("published", lang)
                ));
                body.push_str(&markdown_to_html(p.body.get(lang)));
            }
        }

        body
    }
}

fn link(page: Page<'_>, label: &str) -> String {
    format!(
        "<a href=\"{}\">{}</a>",
        html_escape(&page.path()),
        html_escape(label)
    )
}

const RELOAD_SCRIPT: &str = r#"<script>
        // Hot reload via Server-Sent Events
        const eventSource = new EventSource('/_reload');
        eventSource.onmessage = () => location.reload();
        eventSource.onerror = () => eventSource.close();
    </script>"#;

impl PageRenderer for BasicRenderer {
    fn render(&self, site: &Site, page: &Page<'_>) -> String {
        let title = page_title(site, page);
        let sibling = page.sibling();
        let reload_script = if self.preview { RELOAD_SCRIPT } else { "" };

        format!(
            r#"<!DOCTYPE html>
<html lang="{lang}">
<head>
{head}</head>
<body>
<nav><a href="/{lang}">{home}</a> <a href="{sibling_path}" hreflang="{sibling_lang}">{sibling_lang}</a></nav>
<main>
<h1>{title}</h1>
{body}</main>
{reload}
</body>
</html>
"#,
            lang = page.lang,
            head = self.head(site, page, &title),
            home = t("home", page.lang),
            sibling_path = html_escape(&sibling.path()),
            sibling_lang = sibling.lang,
            title = html_escape(&title),
            body = self.body(site, page),
            reload = reload_script,
        )
    }
}

/// Stub document placed at an alias path for hosts that ignore `_redirects`.
pub fn redirect_page(target_url: &str, lang: Language) -> String {
    let target = html_escape(target_url);
    format!(
        r#"<!DOCTYPE html>
<html lang="{lang}">
<head>
    <meta charset="UTF-8">
    <title>{title}</title>
    <link rel="canonical" href="{target}">
    <meta name="robots" content="noindex">
    <meta http-equiv="refresh" content="0; url={target}">
</head>
<body><a href="{target}">{target}</a></body>
</html>
"#,
        title = t("redirecting", lang),
    )
}
