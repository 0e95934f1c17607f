//! Axum-based API gateway for the spiritual diary. Config-driven via CoreConfig.
//! The deterministic reading is computed here; Claude only writes the prose.

mod claude;
mod error;
mod handlers;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kokoro_core::CoreConfig;

/// Shared handler state. Config is immutable after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<CoreConfig>,
}

fn build_app(state: AppState) -> Router {
    // The UI is a stateless client; the gateway holds the API key and the
    // UI never sees it, so the CORS surface can stay permissive.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/v1/analyze", post(handlers::analyze_post))
        .route("/api/v1/placeholders", post(handlers::placeholders_post))
        .route("/api/v1/health", get(handlers::health))
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() {
    // Load .env first. The LLM key stays in the backend environment only.
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("[kokoro-gateway] .env not loaded: {} (using system environment)", e);
    }
    if std::env::var("ANTHROPIC_API_KEY").is_err() && std::env::var("CLAUDE_API_KEY").is_err() {
        eprintln!(
            "[kokoro-gateway] Hint: Set ANTHROPIC_API_KEY in .env for live analysis; the gateway holds the key, the frontend never sees it."
        );
    }

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match CoreConfig::load() {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!("config load failed: {} (using defaults)", e);
            CoreConfig::default()
        }
    };
    let port = config.port;
    let app_name = config.app_name.clone();
    let state = AppState {
        config: Arc::new(config),
    };
    let app = build_app(state);

    let addr = std::net::SocketAddr::from(([127, 0, 0, 1], port));
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("failed to bind {}: {}", addr, e);
            return;
        }
    };
    tracing::info!("{} listening on {}", app_name, addr);

    let server = axum::serve(listener, app);
    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown initiated (Ctrl+C received)");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn test_app() -> Router {
        build_app(AppState {
            config: Arc::new(CoreConfig::default()),
        })
    }

    #[tokio::test]
    async fn test_health_reports_ok() {
        let res = test_app()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(res.into_body(), 1024).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["app"], "Kokoro Diary");
    }

    #[tokio::test]
    async fn test_analyze_rejects_empty_body_with_validation_error() {
        let res = test_app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/analyze")
                    .header("content-type", "application/json")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(res.into_body(), 1024).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "userProfile.birthDate is required");
    }

    #[tokio::test]
    async fn test_placeholders_serve_defaults_without_api_key() {
        std::env::remove_var("ANTHROPIC_API_KEY");
        std::env::remove_var("CLAUDE_API_KEY");

        let res = test_app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/placeholders")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"timeOfDay":"朝"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(res.into_body(), 4096).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["placeholders"]["mood"], "例: 穏やかで少し眠い");
        assert!(body["placeholders"]["event"]
            .as_str()
            .unwrap()
            .starts_with("例:"));
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let res = test_app()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/nope")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
