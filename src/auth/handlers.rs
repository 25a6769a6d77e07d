use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::{
        credentials::authorization,
        dto::{LoginRequest, LoginResponse, RefreshResponse},
        services::Sessions,
    },
    error::ApiError,
    state::AppState,
    users::services::require_credentials,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/api/login", post(login))
        .route("/api/refresh", post(refresh))
        .route("/api/revoke", post(revoke))
}

#[instrument(skip_all)]
pub async fn login(
    State(sessions): State<Sessions>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(payload) = payload?;
    require_credentials(&payload.email, &payload.password)?;

    let session = sessions.login(&payload.email, &payload.password).await?;
    Ok(Json(LoginResponse {
        user: session.user.into(),
        token: session.token,
        refresh_token: session.refresh_token,
    }))
}

#[instrument(skip_all)]
pub async fn refresh(
    State(sessions): State<Sessions>,
    headers: HeaderMap,
) -> Result<Json<RefreshResponse>, ApiError> {
    let header = authorization(&headers).map_err(|_| ApiError::Unauthorized)?;
    let token = sessions.refresh(header).await?;
    Ok(Json(RefreshResponse { token }))
}

#[instrument(skip_all)]
pub async fn revoke(
    State(sessions): State<Sessions>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    let header = authorization(&headers).map_err(|_| ApiError::Unauthorized)?;
    sessions.revoke(header).await?;
    Ok(StatusCode::NO_CONTENT)
}
