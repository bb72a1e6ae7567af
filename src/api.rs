//! Read-only HTTP view of the session for display collaborators.

use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

use crate::data::history::HistoryEntry;
use crate::services::enrichment::{lock, SharedContext};
use crate::services::status_log::signal_age;
use crate::signal::EnrichedSignal;

pub struct AppState {
    pub context: SharedContext,
}

#[derive(Serialize)]
pub struct SignalView {
    #[serde(flatten)]
    pub signal: EnrichedSignal,
    pub age: String,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/signals", get(get_signals))
        .route("/messages", get(get_messages))
        .route("/history", get(get_history))
        .route("/instruments", get(get_instruments))
        .with_state(state)
}

pub async fn run_server(state: Arc<AppState>, bind: &str) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("API Server listening on {}", bind);
    axum::serve(listener, router(state)).await
}

async fn health() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

async fn get_signals(State(state): State<Arc<AppState>>) -> Json<Vec<SignalView>> {
    let now = Utc::now();
    let views = lock(&state.context)
        .signals()
        .iter()
        .map(|signal| SignalView {
            age: signal_age(signal.enriched_at, now),
            signal: signal.clone(),
        })
        .collect();
    Json(views)
}

async fn get_messages(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    Json(lock(&state.context).messages())
}

async fn get_history(State(state): State<Arc<AppState>>) -> Json<Vec<HistoryEntry>> {
    Json(lock(&state.context).history().all_entries())
}

async fn get_instruments(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    Json(lock(&state.context).directory().available().to_vec())
}
