//! Development server rendering pages on every request

use anyhow::Result;
use axum::{
    body::Body,
    extract::{Query, State},
    http::{Request, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    Router,
};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::content::{ContentError, Limit};
use crate::generator::{Generator, Rendered};
use crate::Folio;

/// Server state
struct ServerState {
    generator: Generator,
    root: String,
    static_dir: PathBuf,
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    limit: Option<String>,
}

/// Start the development server
pub async fn start(folio: &Folio, ip: &str, port: u16) -> Result<()> {
    let state = Arc::new(ServerState {
        generator: Generator::new(folio)?,
        root: folio.config.root.clone(),
        static_dir: folio.static_dir.clone(),
    });

    let app = Router::new()
        .fallback(fallback_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}{}", ip, port, folio.config.root);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Render site routes, falling back to static files
async fn fallback_handler(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<ListQuery>,
    mut request: Request<Body>,
) -> Response {
    let path = request.uri().path().to_string();

    let Some(route) = site_route(&state.root, &path) else {
        return not_found(&state, &path);
    };

    let limit = if takes_limit(route) {
        match parse_limit(query.limit.as_deref()) {
            Ok(limit) => limit,
            Err(e) => return (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
        }
    } else {
        None
    };

    let page = match state.generator.render_route(route, limit).await {
        Ok(Rendered::Page(html)) => return Html(html).into_response(),
        Ok(Rendered::Unavailable { page, .. }) => {
            return (StatusCode::SERVICE_UNAVAILABLE, Html(page)).into_response()
        }
        Ok(Rendered::NotFound(html)) => html,
        Err(e) => {
            tracing::error!("Failed to render {}: {:#}", path, e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response();
        }
    };

    // Static files are served relative to the site root
    if let Ok(uri) = route.parse::<Uri>() {
        *request.uri_mut() = uri;
    }
    let mut service = ServeDir::new(&state.static_dir);
    match service.try_call(request).await {
        Ok(response) if response.status() != StatusCode::NOT_FOUND => response.into_response(),
        Ok(_) => (StatusCode::NOT_FOUND, Html(page)).into_response(),
        Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response(),
    }
}

fn not_found(state: &ServerState, path: &str) -> Response {
    match state.generator.render_not_found(path) {
        Ok(html) => (StatusCode::NOT_FOUND, Html(html)).into_response(),
        Err(_) => (StatusCode::NOT_FOUND, "Not found").into_response(),
    }
}

/// `?limit=` value; absent means no limit
fn parse_limit(raw: Option<&str>) -> Result<Option<Limit>, ContentError> {
    raw.map(str::parse::<Limit>).transpose()
}

/// Listing routes accept `?limit=`
fn takes_limit(route: &str) -> bool {
    matches!(route.trim_matches('/'), "posts" | "projects")
}

/// The part of `path` below the site root, if it lives there
fn site_route<'a>(root: &str, path: &'a str) -> Option<&'a str> {
    let root = root.trim_end_matches('/');
    match path.strip_prefix(root)? {
        "" => Some("/"),
        rest if rest.starts_with('/') => Some(rest),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_limit() {
        assert_eq!(parse_limit(None), Ok(None));
        assert_eq!(parse_limit(Some("3")).unwrap().map(Limit::get), Some(3));
        assert_eq!(
            parse_limit(Some("0")),
            Err(ContentError::invalid_limit("0"))
        );
        assert!(parse_limit(Some("-2")).is_err());
        assert!(parse_limit(Some("many")).is_err());
    }

    #[test]
    fn test_only_listings_take_limit() {
        assert!(takes_limit("/posts"));
        assert!(takes_limit("/projects/"));
        assert!(!takes_limit("/"));
        assert!(!takes_limit("/posts/hello/"));
        assert!(!takes_limit("/images/me.jpg"));
    }

    #[test]
    fn test_site_route() {
        assert_eq!(site_route("/", "/"), Some("/"));
        assert_eq!(site_route("/", "/posts/"), Some("/posts/"));
        assert_eq!(site_route("/blog/", "/blog"), Some("/"));
        assert_eq!(site_route("/blog/", "/blog/posts/x/"), Some("/posts/x/"));
        assert_eq!(site_route("/blog/", "/blogroll"), None);
        assert_eq!(site_route("/blog/", "/posts/"), None);
    }
}
