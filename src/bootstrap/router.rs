use mdimg_api::{routes, AppState};
use mdimg_config::{Config, ServerSettings};
use axum::{
    http::{HeaderValue, StatusCode},
    Router,
};
use std::time::Duration;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
};

/// The `/api` routes wrapped in the request limits of `[server]`
pub fn build(config: &Config, app_state: AppState) -> Router {
    let server = &config.server;

    let api = routes()
        .layer(ConcurrencyLimitLayer::new(server.max_concurrent_requests))
        .layer(RequestBodyLimitLayer::new(server.max_body_size_mb * 1024 * 1024))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(server.timeout_secs),
        ));

    let api = if server.enable_compression {
        api.layer(CompressionLayer::new())
    } else {
        api
    };

    api.layer(cors(server)).with_state(app_state)
}

/// Browser access for the front end. `*` in the list opens every origin;
/// entries that are not valid header values are skipped.
fn cors(server: &ServerSettings) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if server.allowed_origins.iter().any(|origin| origin == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = server
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Skipping unusable CORS origin '{}'", origin);
                None
            }
        })
        .collect();
    layer.allow_origin(origins)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request};
    use mdimg_events::EventBus;
    use mdimg_hosting::CommandHost;
    use mdimg_manager::ImageManager;
    use std::sync::Arc;
    use tower::ServiceExt;

    async fn router_with_origins(dir: &std::path::Path, origins: &[&str]) -> Router {
        let mut config = Config::default();
        config.mapping.file = dir.join("image-mapping.json").display().to_string();
        config.server.allowed_origins = origins.iter().map(|o| o.to_string()).collect();
        let config = Arc::new(config);

        let host = Arc::new(CommandHost::from_settings(&config.upload));
        let manager = ImageManager::new(Arc::clone(&config), EventBus::new(true), host)
            .await
            .unwrap();
        build(&config, AppState::new(Arc::new(manager)))
    }

    async fn allowed_origin(router: Router, origin: &str) -> Option<String> {
        let request = Request::builder()
            .uri("/api/status")
            .header(header::ORIGIN, origin)
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .map(|value| value.to_str().unwrap().to_string())
    }

    #[tokio::test]
    async fn test_listed_origin_is_allowed() {
        let dir = tempfile::tempdir().unwrap();
        let router = router_with_origins(dir.path(), &["http://notes.local", "bad\norigin"]).await;

        assert_eq!(
            allowed_origin(router.clone(), "http://notes.local").await.as_deref(),
            Some("http://notes.local")
        );
        assert_eq!(allowed_origin(router, "http://other.local").await, None);
    }

    #[tokio::test]
    async fn test_wildcard_allows_any_origin() {
        let dir = tempfile::tempdir().unwrap();
        let router = router_with_origins(dir.path(), &["*"]).await;

        assert_eq!(allowed_origin(router, "http://anywhere.local").await.as_deref(), Some("*"));
    }
}
