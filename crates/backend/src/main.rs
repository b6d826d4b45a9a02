mod config;
mod upload;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, State};
use axum::http::HeaderValue;
use axum::{response::Html, routing::get, routing::post, Router};
use geopal_shared::upload::UPLOAD_PATH;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tracing_subscriber::EnvFilter;

use config::Config;

/// Build a cache-controlled static file router.
///
/// Separated so tests can exercise the caching layer with arbitrary directories.
fn cached_static_router(dir: &Path, cache_header: &'static str) -> Router {
    let layer = SetResponseHeaderLayer::overriding(
        axum::http::header::CACHE_CONTROL,
        HeaderValue::from_static(cache_header),
    );
    Router::new()
        .fallback_service(ServeDir::new(dir))
        .layer(layer)
}

const CACHE_1DAY: &str = "public, max-age=86400, must-revalidate";
const CACHE_IMMUTABLE: &str = "public, max-age=31536000, immutable";

/// Build the full application router.
fn build_app(config: &Config) -> Router {
    let static_files = Router::new()
        .nest(
            "/static",
            cached_static_router(&config.assets_dir, CACHE_1DAY),
        )
        .nest(
            "/dist",
            cached_static_router(&config.dist_dir, CACHE_IMMUTABLE),
        )
        .nest(
            "/assets",
            cached_static_router(&config.dist_dir.join("assets"), CACHE_IMMUTABLE),
        );

    Router::new()
        .route(
            UPLOAD_PATH,
            post(upload::upload).layer(DefaultBodyLimit::max(config.upload_limit)),
        )
        .route("/", get(serve_index))
        .with_state(Arc::new(config.index_path()))
        .merge(static_files)
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env().map_err(std::io::Error::other)?;
    let app = build_app(&config);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!(
        port = config.port,
        dist = %config.dist_dir.display(),
        upload_limit = config.upload_limit,
        "Server running at http://localhost:{}",
        config.port
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await
}

async fn serve_index(State(index_path): State<Arc<PathBuf>>) -> Html<String> {
    // Try to serve the built frontend, fall back to a simple message
    match tokio::fs::read_to_string(index_path.as_path()).await {
        Ok(html) => Html(html),
        Err(_) => Html(
            r#"<!DOCTYPE html>
<html>
<head><title>Geopal</title></head>
<body>
<h1>Geopal</h1>
<p>Frontend not built yet. GeoJSON uploads are accepted at <code>POST /upload</code>.</p>
</body>
</html>"#
                .to_string(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    /// An app rooted in a temp dir laid out like a deployment.
    struct Deployment {
        root: tempfile::TempDir,
    }

    impl Deployment {
        fn new() -> Self {
            let root = tempfile::tempdir().unwrap();
            std::fs::create_dir_all(root.path().join("assets")).unwrap();
            std::fs::create_dir_all(root.path().join("dist/assets")).unwrap();
            Deployment { root }
        }

        fn write(&self, rel: &str, content: &str) -> &Self {
            std::fs::write(self.root.path().join(rel), content).unwrap();
            self
        }

        fn config(&self) -> Config {
            Config {
                port: 0,
                assets_dir: self.root.path().join("assets"),
                dist_dir: self.root.path().join("dist"),
                upload_limit: 1024,
            }
        }

        fn app(&self) -> Router {
            build_app(&self.config())
        }
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_string(resp: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_static_assets_have_1day_cache() {
        let deployment = Deployment::new();
        deployment.write("assets/sample.geojson", "{}");

        let resp = deployment
            .app()
            .oneshot(get_req("/static/sample.geojson"))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get("cache-control").unwrap(),
            "public, max-age=86400, must-revalidate"
        );
    }

    #[tokio::test]
    async fn test_dist_bundle_and_assets_are_immutable() {
        let deployment = Deployment::new();
        deployment
            .write("dist/geopal-abc123.wasm", "wasm")
            .write("dist/assets/main-xyz.css", "body{}");
        let app = deployment.app();

        for uri in ["/dist/geopal-abc123.wasm", "/assets/main-xyz.css"] {
            let resp = app.clone().oneshot(get_req(uri)).await.unwrap();
            assert_eq!(resp.status(), StatusCode::OK, "{uri}");
            assert_eq!(
                resp.headers().get("cache-control").unwrap(),
                "public, max-age=31536000, immutable"
            );
        }
    }

    #[tokio::test]
    async fn test_missing_static_file_returns_404() {
        let deployment = Deployment::new();
        let resp = deployment
            .app()
            .oneshot(get_req("/static/nonexistent.geojson"))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_index_served_from_dist() {
        let deployment = Deployment::new();
        deployment.write("dist/index.html", "<div id=\"main\"></div>");

        let resp = deployment.app().oneshot(get_req("/")).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_string(resp).await, "<div id=\"main\"></div>");
    }

    #[tokio::test]
    async fn test_index_falls_back_when_not_built() {
        let deployment = Deployment::new();
        let resp = deployment.app().oneshot(get_req("/")).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert!(body_string(resp).await.contains("Frontend not built yet"));
    }

    #[tokio::test]
    async fn test_upload_route_is_mounted() {
        let deployment = Deployment::new();
        let body = "--b\r\nContent-Disposition: form-data; name=\"uploadFile\"\r\n\r\n{\"type\":\"FeatureCollection\",\"features\":[]}\r\n--b--\r\n";
        let resp = deployment
            .app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/upload")
                    .header("content-type", "multipart/form-data; boundary=b")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            body_string(resp).await,
            r#"{"type":"FeatureCollection","features":[]}"#
        );
    }

    #[tokio::test]
    async fn test_upload_requires_post() {
        let deployment = Deployment::new();
        let resp = deployment.app().oneshot(get_req("/upload")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_cors_is_permissive() {
        let deployment = Deployment::new();
        let resp = deployment
            .app()
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header("origin", "http://example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            resp.headers().get("access-control-allow-origin").unwrap(),
            "*"
        );
    }
}
