use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::extractors::AuthUser,
    chirps::{
        dto::{ChirpResponse, CreateChirpRequest, ListQuery},
        services,
    },
    error::ApiError,
    state::AppState,
};

pub fn chirp_routes() -> Router<AppState> {
    Router::new()
        .route("/api/chirps", get(list_chirps).post(create_chirp))
        .route("/api/chirps/:chirp_id", get(get_chirp).delete(delete_chirp))
}

#[instrument(skip(state, payload))]
pub async fn create_chirp(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    payload: Result<Json<CreateChirpRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ChirpResponse>), ApiError> {
    let Json(payload) = payload?;
    let chirp = services::create(state.chirps.as_ref(), user_id, &payload.body).await?;
    info!(chirp_id = %chirp.id, "chirp created");
    Ok((StatusCode::CREATED, Json(chirp.into())))
}

#[instrument(skip(state))]
pub async fn list_chirps(
    State(state): State<AppState>,
    Query(q): Query<ListQuery>,
) -> Result<Json<Vec<ChirpResponse>>, ApiError> {
    let author = match q.author_id.as_deref().filter(|s| !s.is_empty()) {
        Some(raw) => Some(parse_id(raw)?),
        None => None,
    };
    let descending = q
        .sort
        .as_deref()
        .is_some_and(|s| s.eq_ignore_ascii_case("desc"));

    let chirps = services::list(state.chirps.as_ref(), author, descending).await?;
    Ok(Json(chirps.into_iter().map(Into::into).collect()))
}

#[instrument(skip(state))]
pub async fn get_chirp(
    State(state): State<AppState>,
    Path(chirp_id): Path<String>,
) -> Result<Json<ChirpResponse>, ApiError> {
    let id = parse_id(&chirp_id)?;
    let chirp = services::get(state.chirps.as_ref(), id).await?;
    Ok(Json(chirp.into()))
}

#[instrument(skip(state))]
pub async fn delete_chirp(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(chirp_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&chirp_id)?;
    services::delete(state.chirps.as_ref(), user_id, id).await?;
    info!(chirp_id = %id, "chirp deleted");
    Ok(StatusCode::NO_CONTENT)
}

fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|e| ApiError::BadRequest(format!("Error parsing UUID: {e}")))
}
