use axum::{middleware, Router};
use tower_http::services::ServeDir;

use crate::state::AppState;

pub mod handlers;

pub fn router() -> Router<AppState> {
    handlers::ops_routes()
}

/// Static files under `/app`, counted by the metrics page.
pub fn file_server(state: &AppState) -> Router<AppState> {
    Router::new()
        .nest_service("/app", ServeDir::new(&state.config.file_path_root))
        .layer(middleware::from_fn_with_state(state.clone(), handlers::count_hits))
}
