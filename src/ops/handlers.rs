use std::sync::atomic::Ordering;

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::{info, instrument};

use crate::{error::ApiError, state::AppState};

pub fn ops_routes() -> Router<AppState> {
    Router::new()
        .route("/api/healthz", get(health))
        .route("/admin/metrics", get(metrics))
        .route("/admin/reset", post(reset))
}

pub async fn health() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], "OK")
}

/// Counts every request that reaches the static file server.
pub async fn count_hits(State(state): State<AppState>, req: Request, next: Next) -> Response {
    state.hits.fetch_add(1, Ordering::Relaxed);
    next.run(req).await
}

pub async fn metrics(State(state): State<AppState>) -> Html<String> {
    Html(format!(
        "<html><body><h1>Welcome, Chirpy Admin</h1><p>Chirpy has been visited {} times!</p></body></html>",
        state.hits.load(Ordering::Relaxed)
    ))
}

#[instrument(skip(state))]
pub async fn reset(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    if !state.config.is_dev() {
        return Err(ApiError::Forbidden(format!(
            "Operation not allowed on platform: '{}'",
            state.config.platform
        )));
    }
    state.hits.store(0, Ordering::Relaxed);
    state.users.delete_users().await?;
    info!("hits and database reset");
    Ok(Json(json!({
        "message": "Hits reset to 0 and database reset to initial state"
    })))
}
