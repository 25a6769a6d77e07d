use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use subtle::ConstantTimeEq;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::{auth::credentials::api_key, db::StoreError, error::ApiError, state::AppState};

const USER_UPGRADED: &str = "user.upgraded";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WebhookData {
    pub user_id: Uuid,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WebhookEvent {
    pub event: String,
    pub data: WebhookData,
}

fn key_matches(presented: &str, expected: &str) -> bool {
    presented.as_bytes().ct_eq(expected.as_bytes()).into()
}

pub fn webhook_routes() -> Router<AppState> {
    Router::new().route("/api/polka/webhooks", post(upgrade_user))
}

#[instrument(skip_all)]
pub async fn upgrade_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<WebhookEvent>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    match api_key(&headers) {
        Ok(key) if key_matches(key, &state.config.polka_key) => {}
        Ok(_) => {
            debug!("webhook api key mismatch");
            return Err(ApiError::Unauthorized);
        }
        Err(e) => {
            debug!(error = %e, "webhook without api key");
            return Err(ApiError::Unauthorized);
        }
    }

    let Json(payload) = payload?;
    if payload.event != USER_UPGRADED {
        debug!(event = %payload.event, "ignoring webhook event");
        return Ok(StatusCode::NO_CONTENT);
    }

    let user_id = payload.data.user_id;
    match state.users.upgrade_user(user_id).await {
        Ok(_) => {
            info!(%user_id, "user upgraded");
            Ok(StatusCode::NO_CONTENT)
        }
        Err(StoreError::NotFound) => Err(ApiError::NotFound(
            "User with given id has not been found".into(),
        )),
        Err(e) => Err(e.into()),
    }
}
