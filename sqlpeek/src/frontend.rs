//! Static landing page serving
//!
//! The browser UI is a small vanilla-JS page embedded into the binary at
//! compile time, served at `/` with its assets under `/static/`.

use axum::{
    body::Body,
    extract::Path,
    http::{header, StatusCode},
    response::Response,
    routing::get,
    Router,
};
use include_dir::{include_dir, Dir};

// Embed the static directory at compile time
static STATIC_ASSETS: Dir = include_dir!("$CARGO_MANIFEST_DIR/static");

/// Create a router serving the landing page and its assets
pub fn create_frontend_router() -> Router {
    Router::new()
        .route("/", get(serve_index_page))
        .route("/static/{*path}", get(serve_static_asset))
}

/// Serve the landing page at the root path
///
/// Caching: max-age=3600 for index.html
async fn serve_index_page() -> Response {
    match STATIC_ASSETS.get_file("index.html") {
        Some(file) => Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, "text/html; charset=utf-8")
            .header(header::CACHE_CONTROL, "public, max-age=3600")
            .body(Body::from(file.contents()))
            .unwrap(),
        None => Response::builder()
            .status(StatusCode::NOT_FOUND)
            .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(Body::from("landing page not embedded"))
            .unwrap(),
    }
}

/// Serve embedded assets with guessed MIME types
async fn serve_static_asset(Path(path): Path<String>) -> Response {
    match STATIC_ASSETS.get_file(&path) {
        Some(file) => {
            let mime_type = mime_guess::from_path(&path)
                .first_or_octet_stream()
                .to_string();
            Response::builder()
                .status(StatusCode::OK)
                .header(header::CONTENT_TYPE, mime_type)
                .header(header::CACHE_CONTROL, "public, max-age=3600")
                .body(Body::from(file.contents()))
                .unwrap()
        }
        None => Response::builder()
            .status(StatusCode::NOT_FOUND)
            .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(Body::from(format!("asset not found: {}", path)))
            .unwrap(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;
    use tower::ServiceExt;

    #[tokio::test]
    async fn index_page_is_served_at_root() {
        let app = create_frontend_router();
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/html; charset=utf-8"
        );
    }

    #[tokio::test]
    async fn assets_get_guessed_mime_types() {
        let app = create_frontend_router();
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/static/main.js")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/javascript"
        );
    }

    #[tokio::test]
    async fn missing_asset_is_not_found() {
        let app = create_frontend_router();
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/static/nope.css")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
