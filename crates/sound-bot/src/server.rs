//! Webhook and status HTTP server.

use crate::dispatch::Dispatcher;
use crate::metrics::{self, Metrics};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use std::sync::Arc;
use telegram_client::Update;
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;
use tracing::warn;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub metrics: Arc<RwLock<Metrics>>,
    pub webhook_token: String,
    pub webhook_url: String,
}

impl AppState {
    pub fn new(
        dispatcher: Arc<Dispatcher>,
        metrics: Arc<RwLock<Metrics>>,
        webhook_token: impl Into<String>,
        webhook_url: impl Into<String>,
    ) -> Self {
        Self {
            dispatcher,
            metrics,
            webhook_token: webhook_token.into(),
            webhook_url: webhook_url.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct StatusResponse {
    status: &'static str,
    webhook_url: String,
}

#[derive(Debug, Serialize)]
struct MetricsResponse {
    startup_count: u64,
    command_metrics: std::collections::HashMap<String, u64>,
    total_commands: u64,
    most_frequent_command: Option<String>,
    uptime_seconds: u64,
    started_at: String,
}

#[derive(Debug, Serialize)]
struct WebhookAck {
    status: &'static str,
}

#[derive(Debug, Serialize)]
struct WebhookRejection {
    status: &'static str,
    error: String,
}

/// Create the router. The webhook path is the bot's secret token, so
/// only the platform can find it; tokens contain a colon, which axum's
/// route syntax reserves, so the path is matched as a parameter and
/// compared against the configured token.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(status))
        .route("/metrics", get(metrics_snapshot))
        .route("/:token", post(webhook))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness probe.
async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "running",
        webhook_url: state.webhook_url.clone(),
    })
}

/// Operational metrics snapshot.
async fn metrics_snapshot(State(state): State<AppState>) -> Json<MetricsResponse> {
    let metrics = state.metrics.read().await;
    let snapshot = metrics.snapshot();

    Json(MetricsResponse {
        startup_count: snapshot.startup_count,
        total_commands: metrics.total_commands(),
        most_frequent_command: metrics.most_frequent().map(|(c, _)| c.to_string()),
        uptime_seconds: metrics.uptime().as_secs(),
        started_at: metrics.started_at_utc().to_rfc3339(),
        command_metrics: snapshot.command_metrics,
    })
}

/// Webhook sink for inbound updates.
///
/// Malformed payloads get a 400; everything parseable is acknowledged
/// with 200 regardless of what the handler did, so the platform does not
/// redeliver updates whose handling failed.
async fn webhook(
    State(state): State<AppState>,
    Path(token): Path<String>,
    body: String,
) -> impl IntoResponse {
    if token != state.webhook_token {
        return StatusCode::NOT_FOUND.into_response();
    }

    let update: Update = match serde_json::from_str(&body) {
        Ok(update) => update,
        Err(e) => {
            warn!("Rejecting malformed update payload: {}", e);
            return (
                StatusCode::BAD_REQUEST,
                Json(WebhookRejection {
                    status: "error",
                    error: e.to_string(),
                }),
            )
                .into_response();
        }
    };

    // Command metrics are counted at the transport boundary, on the raw
    // token, independent of the durable usage store.
    if let Some(command) = update
        .message
        .as_ref()
        .and_then(|m| m.text.as_deref())
        .and_then(metrics::raw_command)
    {
        state.metrics.write().await.record(command);
    }

    state.dispatcher.handle_update(&update).await;

    (StatusCode::OK, Json(WebhookAck { status: "ok" })).into_response()
}
