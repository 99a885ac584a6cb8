use axum::{extract::State, routing::post, Json, Router};
use tracing::info;
use validator::Validate;

use super::common::ValidJson;
use crate::dto::staff::LoginRequest;
use crate::entities::personnel;
use crate::errors::ServiceError;
use crate::AppState;

pub fn auth_router() -> Router<AppState> {
    Router::new().route("/login", post(login))
}

/// Login handler. Returns the personnel record; the password hash is never serialized.
pub async fn login(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<LoginRequest>,
) -> Result<Json<personnel::Model>, ServiceError> {
    payload.validate()?;

    let email = payload.email.unwrap_or_default();
    let password = payload.password.unwrap_or_default();
    let member = state.services.auth.login(&email, &password).await?;

    info!(personnel_id = member.id, "Personnel logged in");
    Ok(Json(member))
}
