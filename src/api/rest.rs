// =============================================================================
// REST API Endpoints - Axum 0.7
// =============================================================================
//
// Read-only dashboard feed under `/api/v1/`.  Nothing here touches the
// engine; handlers only read what the poller has published on `AppState`.
//
// CORS is configured permissively so a static dashboard page can poll it.
// =============================================================================

use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};

use crate::api::view::DashboardView;
use crate::app_state::AppState;

// =============================================================================
// Router construction
// =============================================================================

/// Build the REST API router with CORS middleware and shared state.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/signal", get(signal))
        .route("/api/v1/history", get(history))
        .route("/api/v1/news", get(news))
        .layer(cors)
        .with_state(state)
}

// =============================================================================
// Health
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    state_version: u64,
    uptime_secs: u64,
    server_time: i64,
    last_fetch_error: Option<String>,
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        state_version: state.current_state_version(),
        uptime_secs: state.uptime_secs(),
        server_time: chrono::Utc::now().timestamp_millis(),
        last_fetch_error: state.last_fetch_error.read().clone(),
    })
}

// =============================================================================
// Signal, history, news
// =============================================================================

async fn signal(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(DashboardView::new(
        state.runtime_config.pair(),
        state.latest_result(),
    ))
}

async fn history(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.history_snapshot())
}

async fn news(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.news.read().clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use chrono::DateTime;
    use tower::ServiceExt;

    use crate::runtime_config::RuntimeConfig;
    use crate::types::PriceTick;

    async fn get_json(state: Arc<AppState>, uri: &str) -> serde_json::Value {
        let resp = router(state)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn tick(secs: i64, price: f64) -> PriceTick {
        PriceTick::new(DateTime::from_timestamp(1_700_000_000 + secs, 0).unwrap(), price)
    }

    #[tokio::test]
    async fn health_reports_version() {
        let state = Arc::new(AppState::new(RuntimeConfig::default()));
        state.ingest(tick(0, 2400.0)).unwrap();
        let body = get_json(state, "/api/v1/health").await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["state_version"], 1);
        assert!(body["last_fetch_error"].is_null());
    }

    #[tokio::test]
    async fn signal_before_first_tick_is_placeholder() {
        let state = Arc::new(AppState::new(RuntimeConfig::default()));
        let body = get_json(state, "/api/v1/signal").await;
        assert_eq!(body["pair"], "XAU/USD");
        assert!(body["latest"].is_null());
        assert_eq!(body["display"]["price"], "--");
        assert_eq!(body["display"]["change_label"], "1m: --");
    }

    #[tokio::test]
    async fn signal_and_history_reflect_ingested_ticks() {
        let state = Arc::new(AppState::new(RuntimeConfig::default()));
        state.ingest(tick(0, 2400.0)).unwrap();
        state.ingest(tick(5, 2402.0)).unwrap();

        let body = get_json(state.clone(), "/api/v1/signal").await;
        assert_eq!(body["latest"]["signal"], "WAIT");
        assert_eq!(body["latest"]["price"], 2402.0);
        assert_eq!(body["display"]["price"], "2402.00");
        assert_eq!(body["display"]["change_tone"], "up");

        let history = get_json(state, "/api/v1/history").await;
        let rows = history.as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["price"], 2402.0);
        assert_eq!(rows[0]["signal"], "WAIT");
    }

    #[tokio::test]
    async fn news_lists_current_items() {
        let state = Arc::new(AppState::new(RuntimeConfig::default()));
        let body = get_json(state.clone(), "/api/v1/news").await;
        assert_eq!(body, serde_json::json!([]));

        state.set_news(crate::market_data::news_feed::parse_articles(
            &serde_json::json!({ "articles": [{ "title": "Gold rallies" }] }),
            10,
        ));
        let body = get_json(state, "/api/v1/news").await;
        assert_eq!(body[0]["title"], "Gold rallies");
        assert_eq!(body[0]["source"], "Source");
    }
}
