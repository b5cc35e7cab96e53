//! REST endpoints for classification, auto-detect, and history.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::history::ClassificationHistory;
use crate::pipeline::{Classification, SpamClassifier};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub classifier: Arc<SpamClassifier>,
    pub history: Arc<ClassificationHistory>,
    /// Auto-detect sample messages, fixed at startup.
    pub samples: Arc<Vec<String>>,
    /// Flat log rewritten after each classification.
    pub log_path: Arc<PathBuf>,
}

/// Build the Axum router with all API routes.
pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/classify", post(classify))
        .route("/api/auto", post(auto_detect))
        .route("/api/samples", get(list_samples))
        .route("/api/history", get(history).delete(clear_history))
        .route("/api/stats", get(stats))
        .layer(ServiceBuilder::new().layer(CorsLayer::permissive()))
        .with_state(state)
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClassifyResponse {
    pub id: Uuid,
    pub message: String,
    #[serde(flatten)]
    pub classification: Classification,
}

// ── Health ──────────────────────────────────────────────────────────────

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "spam-sift"
    }))
}

// ── Classification ──────────────────────────────────────────────────────

#[derive(Deserialize)]
struct ClassifyRequest {
    text: String,
}

async fn classify(
    State(state): State<AppState>,
    payload: Result<Json<ClassifyRequest>, JsonRejection>,
) -> Response {
    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => {
            debug!(error = %rejection, "Rejected classify request body");
            return (
                rejection.status(),
                Json(serde_json::json!({"error": rejection.body_text()})),
            )
                .into_response();
        }
    };

    if body.text.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "Message text is empty"})),
        )
            .into_response();
    }

    classify_and_record(&state, body.text).await
}

async fn auto_detect(State(state): State<AppState>) -> Response {
    match state.history.next_sample(&state.samples).await {
        Some(message) => classify_and_record(&state, message).await,
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": "No sample messages available"})),
        )
            .into_response(),
    }
}

/// Classify, record in history, and rewrite the flat log.
async fn classify_and_record(state: &AppState, message: String) -> Response {
    let classification = match state.classifier.classify(&message) {
        Ok(c) => c,
        Err(e) => {
            error!(error = %e, "Classification failed");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": e.to_string()})),
            )
                .into_response();
        }
    };

    let entry = state.history.record(message.clone(), &classification).await;
    info!(
        id = %entry.id,
        label = %classification.label,
        confidence = classification.confidence,
        "Message classified"
    );

    if let Err(e) = state.history.save_log(&state.log_path).await {
        warn!(error = %e, "Failed to rewrite classification log");
    }

    (
        StatusCode::OK,
        Json(ClassifyResponse {
            id: entry.id,
            message,
            classification,
        }),
    )
        .into_response()
}

// ── Samples & History ───────────────────────────────────────────────────

async fn list_samples(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.samples.as_ref().clone())
}

async fn history(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.history.snapshot().await)
}

async fn stats(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.history.counts().await)
}

async fn clear_history(State(state): State<AppState>) -> impl IntoResponse {
    state.history.clear().await;
    if let Err(e) = state.history.save_log(&state.log_path).await {
        warn!(error = %e, "Failed to rewrite classification log");
    }
    Json(serde_json::json!({"status": "cleared"}))
}
