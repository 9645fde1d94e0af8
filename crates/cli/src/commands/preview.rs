use super::{PUBLIC_DIR, load_site};
use anyhow::{Context, Result};
use axum::{
    Router,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{
        Html, IntoResponse, Redirect, Response,
        sse::{Event, KeepAlive, Sse},
    },
    routing::get,
};
use chrono::Local;
use glasspage_core::{Language, Site, t};
use glasspage_generator::paths::enumerate_pages;
use glasspage_generator::render::{PageRenderer, html_escape};
use glasspage_generator::sitemap::{build_sitemap, render_sitemap, robots_txt};
use glasspage_generator::{BasicRenderer, RouteOutcome, route};
use notify::{Event as NotifyEvent, EventKind, RecursiveMode, Watcher};
use std::{net::SocketAddr, path::PathBuf};
use tokio::sync::broadcast;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
struct AppState {
    site_path: PathBuf,
    reload_tx: broadcast::Sender<()>,
}

/// Start preview server with hot reload for local development.
///
/// `site.toml` is re-read on every request, so edits show up on the next
/// reload without restarting. Every page path goes through the same router
/// the build uses: aliases answer with a permanent redirect and unknown paths
/// with a 404. Files under `public/` are served as-is.
pub async fn run(path: PathBuf, port: u16) -> Result<()> {
    println!("🪟 Starting preview server...");
    println!("   Site: {}", path.display());

    let site = load_site(&path)?;
    let pages = enumerate_pages(&site.catalog);
    println!("   ✓ Loaded: {}", site.site.business_name);
    println!("   ✓ Pages: {}", pages.len());

    // Create broadcast channel for reload events
    let (reload_tx, _) = broadcast::channel::<()>(100);

    let state = AppState {
        site_path: path.clone(),
        reload_tx: reload_tx.clone(),
    };

    // Start file watcher
    let watcher_path = path.clone();
    let watcher_tx = reload_tx.clone();
    tokio::spawn(async move {
        if let Err(e) = watch_files(watcher_path, watcher_tx).await {
            tracing::error!("File watcher error: {}", e);
        }
    });

    // Start server
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    println!(
        "\n🚀 Preview ready at: http://localhost:{}/{}",
        port, site.site.default_language
    );
    println!("   Press Ctrl+C to stop\n");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to port")?;

    axum::serve(listener, app(state)).await.context("Server error")?;

    Ok(())
}

fn app(state: AppState) -> Router {
    let public = ServeDir::new(state.site_path.join(PUBLIC_DIR));

    let mut router = Router::new()
        .route("/", get(root_handler))
        .route("/_reload", get(sse_handler))
        .route("/sitemap.xml", get(sitemap_handler))
        .route("/robots.txt", get(robots_handler));

    for lang in Language::ALL {
        router = router
            .route(
                &format!("/{}", lang),
                get(move |State(state): State<AppState>| async move {
                    page_response(&state, &format!("/{}", lang))
                }),
            )
            .route(
                &format!("/{}/{{*rest}}", lang),
                get(
                    move |State(state): State<AppState>, Path(rest): Path<String>| async move {
                        page_response(&state, &format!("/{}/{}", lang, rest))
                    },
                ),
            );
    }

    router
        .fallback_service(public)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Watch for file changes and trigger reload
async fn watch_files(path: PathBuf, reload_tx: broadcast::Sender<()>) -> Result<()> {
    let (tx, mut rx) = tokio::sync::mpsc::channel(100);

    let mut watcher =
        notify::recommended_watcher(move |res: Result<NotifyEvent, notify::Error>| {
            if let Ok(event) = res {
                let _ = tx.blocking_send(event);
            }
        })?;

    watcher.watch(&path, RecursiveMode::Recursive)?;

    while let Some(event) = rx.recv().await {
        match event.kind {
            EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_) => {
                // Filter out temporary files and hidden files
                if event.paths.iter().any(|p| {
                    let filename = p.file_name().unwrap_or_default().to_string_lossy();
                    !filename.starts_with('.') && !filename.ends_with('~')
                }) {
                    println!("   📝 File changed, reloading...");
                    let _ = reload_tx.send(());
                }
            }
            _ => {}
        }
    }

    Ok(())
}

/// SSE endpoint for hot reload
async fn sse_handler(
    State(state): State<AppState>,
) -> Sse<impl futures::Stream<Item = Result<Event, std::convert::Infallible>>> {
    let mut rx = state.reload_tx.subscribe();

    let stream = async_stream::stream! {
        loop {
            if rx.recv().await.is_ok() {
                yield Ok(Event::default().data("reload"));
            }
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}

async fn root_handler(State(state): State<AppState>) -> Response {
    page_response(&state, "/")
}

async fn sitemap_handler(State(state): State<AppState>) -> Response {
    with_site(&state, |site| {
        let pages = enumerate_pages(&site.catalog);
        let entries = build_sitemap(site, &pages, Local::now().date_naive());
        match render_sitemap(&entries) {
            Ok(xml) => ([(header::CONTENT_TYPE, "application/xml")], xml).into_response(),
            Err(e) => error_page(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()),
        }
    })
}

async fn robots_handler(State(state): State<AppState>) -> Response {
    with_site(&state, |site| robots_txt(site).into_response())
}

fn with_site(state: &AppState, respond: impl FnOnce(&Site) -> Response) -> Response {
    match load_site(&state.site_path) {
        Ok(site) => respond(&site),
        Err(e) => error_page(StatusCode::INTERNAL_SERVER_ERROR, &format!("{:#}", e)),
    }
}

fn page_response(state: &AppState, path: &str) -> Response {
    with_site(state, |site| match route(site, path) {
        RouteOutcome::Render(page) => {
            Html(BasicRenderer::preview().render(site, &page)).into_response()
        }
        RouteOutcome::Redirect(target) => {
            tracing::debug!(from = path, to = %target, "Redirecting");
            Redirect::permanent(&target).into_response()
        }
        RouteOutcome::NotFound => {
            let lang = path
                .split('/')
                .nth(1)
                .and_then(|code| Language::from_code(code).ok())
                .unwrap_or(site.site.default_language);
            not_found(lang)
        }
    })
}

fn not_found(lang: Language) -> Response {
    let html = format!(
        r#"<!DOCTYPE html>
<html lang="{lang}">
<head><meta charset="UTF-8"><title>{title}</title></head>
<body><h1>{title}</h1><p><a href="/{lang}">{home}</a></p></body>
</html>"#,
        title = t("not_found", lang),
        home = t("home", lang),
    );
    (StatusCode::NOT_FOUND, Html(html)).into_response()
}

fn error_page(status: StatusCode, message: &str) -> Response {
    let html = format!(
        r#"<!DOCTYPE html>
<html><head><title>Error</title></head><body>
<h1>Configuration Error</h1>
<pre>{}</pre>
</body></html>"#,
        html_escape(message)
    );
    (status, Html(html)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use std::fs;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn site_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(super::super::SITE_TOML),
            glasspage_core::STARTER_SITE_TOML,
        )
        .unwrap();
        fs::create_dir_all(dir.path().join(PUBLIC_DIR)).unwrap();
        fs::write(dir.path().join(PUBLIC_DIR).join("favicon.ico"), b"ico").unwrap();
        dir
    }

    async fn get_path(dir: &TempDir, uri: &str) -> Response {
        let (reload_tx, _) = broadcast::channel(1);
        let state = AppState {
            site_path: dir.path().to_path_buf(),
            reload_tx,
        };
        app(state)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    fn location(response: &Response) -> &str {
        response.headers()[header::LOCATION].to_str().unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_canonical_page_renders() {
        let dir = site_dir();
        let response = get_path(&dir, "/es/servicios/instalacion-espejos/en/doral").await;
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("/_reload"));
        assert!(html.contains("Doral"));
    }

    #[tokio::test]
    async fn test_root_redirects_to_default_language() {
        let dir = site_dir();
        let response = get_path(&dir, "/").await;
        assert_eq!(response.status(), StatusCode::PERMANENT_REDIRECT);
        assert_eq!(location(&response), "/en");
    }

    #[tokio::test]
    async fn test_alias_redirects() {
        let dir = site_dir();
        let response = get_path(&dir, "/en/services/window-replacement/in/ft-lauderdale").await;
        assert_eq!(response.status(), StatusCode::PERMANENT_REDIRECT);
        assert_eq!(
            location(&response),
            "/en/services/window-glass-replacement/in/fort-lauderdale"
        );
    }

    #[tokio::test]
    async fn test_percent_encoded_accent_redirects() {
        let dir = site_dir();
        let response = get_path(&dir, "/es/servicios/instalaci%C3%B3n-espejos").await;
        assert_eq!(response.status(), StatusCode::PERMANENT_REDIRECT);
        assert_eq!(location(&response), "/es/servicios/instalacion-espejos");
    }

    #[tokio::test]
    async fn test_unknown_page_is_404() {
        let dir = site_dir();
        let response = get_path(&dir, "/es/servicios/no-existe").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_text(response).await.contains("Página no encontrada"));
    }

    #[tokio::test]
    async fn test_public_files_and_sitemap() {
        let dir = site_dir();
        let favicon = get_path(&dir, "/favicon.ico").await;
        assert_eq!(favicon.status(), StatusCode::OK);

        let sitemap = get_path(&dir, "/sitemap.xml").await;
        assert_eq!(sitemap.status(), StatusCode::OK);
        assert!(body_text(sitemap).await.contains("<urlset"));

        let robots = body_text(get_path(&dir, "/robots.txt").await).await;
        assert!(robots.contains("Sitemap: https://clearviewglass.example/sitemap.xml"));
    }

    #[tokio::test]
    async fn test_broken_config_reports_error() {
        let dir = site_dir();
        fs::write(dir.path().join(super::super::SITE_TOML), "[site\n").unwrap();
        let response = get_path(&dir, "/en").await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body_text(response).await.contains("Configuration Error"));
    }
}
