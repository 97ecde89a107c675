//! Mock status server for the server-backed evolution cycle.
//!
//! Exposes the status contract the dashboard polls:
//!
//! | Endpoint                 | Method | Response                          |
//! |--------------------------|--------|-----------------------------------|
//! | `/evolution/cycle`       | POST   | `{}` (fire-and-forget start)      |
//! | `/evolution/start`       | POST   | `{}` (alias of the above)         |
//! | `/evolution/status`      | GET    | `{phase, logs, progress, active}` |
//!
//! The router is constructible without binding a socket so tests can drive
//! it through `tower::ServiceExt`.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;

use crate::cycles::EvolutionDomain;
use crate::remote::client::CycleStatus;
use crate::sequencer::Sequencer;

/// Shared application state: the sequencer that owns the cycle.
pub struct AppState {
    pub sequencer: Sequencer<EvolutionDomain>,
}

pub type SharedState = Arc<AppState>;

/// Configuration for the status server.
pub struct ServerConfig {
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 7331 }
    }
}

/// Build the application router. The permissive CORS layer is for the
/// dashboard front-end, which polls from the browser.
pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/evolution/cycle", post(trigger_cycle))
        .route("/evolution/start", post(trigger_cycle))
        .route("/evolution/status", get(cycle_status))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start a new cycle. Starting while one is active is a no-op, matching the
/// sequencer's single-session rule; the response is `{}` either way.
async fn trigger_cycle(State(state): State<SharedState>) -> Json<serde_json::Value> {
    if state.sequencer.start() {
        tracing::info!("evolution cycle started");
    } else {
        tracing::debug!("start request ignored: cycle already active");
    }
    Json(serde_json::json!({}))
}

async fn cycle_status(State(state): State<SharedState>) -> Json<CycleStatus> {
    Json(CycleStatus::from(&state.sequencer.snapshot()))
}

/// Bind and serve until ctrl-c.
pub async fn start_server(config: ServerConfig, state: SharedState) -> Result<()> {
    let addr = format!("127.0.0.1:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind status server to {addr}"))?;

    tracing::info!("status server listening on http://{addr}");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
        .context("Status server failed")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CycleConfig;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::util::ServiceExt;

    fn test_state() -> SharedState {
        Arc::new(AppState {
            sequencer: Sequencer::new(EvolutionDomain, CycleConfig::default()),
        })
    }

    async fn get_status(app: Router) -> CycleStatus {
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/evolution/status")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_status_reports_idle_before_start() {
        let state = test_state();
        let status = get_status(build_router(state)).await;

        assert_eq!(status.phase, "IDLE");
        assert!(!status.active);
        assert_eq!(status.progress, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_trigger_starts_cycle() {
        let state = test_state();
        let app = build_router(Arc::clone(&state));

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/evolution/cycle")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let status = get_status(app).await;
        assert_eq!(status.phase, "SAMPLING");
        assert!(status.active);
        assert!(!status.logs.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_alias_behaves_like_cycle() {
        let state = test_state();
        let app = build_router(Arc::clone(&state));

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/evolution/start")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(state.sequencer.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn test_double_trigger_is_idempotent() {
        let state = test_state();
        let app = build_router(Arc::clone(&state));

        for _ in 0..2 {
            let response = app
                .clone()
                .oneshot(
                    Request::builder()
                        .method("POST")
                        .uri("/evolution/cycle")
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let status = get_status(app).await;
        assert_eq!(status.phase, "SAMPLING", "second trigger must not advance");
    }
}
