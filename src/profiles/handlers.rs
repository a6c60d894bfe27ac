use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use super::dto::{ExtractSkillsRequest, ProfileRequest};
use super::repo_types::Profile;
use super::services;
use crate::auth::AuthUser;
use crate::error::{parse_id, AppError};
use crate::extract::ApiJson;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/profile", post(upsert_profile).put(upsert_profile))
        .route("/profile/me", get(my_profile))
        .route("/profile/user/:user_id", get(profile_of))
        .route("/profile/extract-skills", post(extract_skills))
}

#[instrument(skip(state, body), fields(user_id = %user.id))]
pub async fn upsert_profile(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(body): ApiJson<ProfileRequest>,
) -> Result<Json<Profile>, AppError> {
    Ok(Json(services::upsert(&state, &user, body).await?))
}

#[instrument(skip(state), fields(user_id = %user.id))]
pub async fn my_profile(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Profile>, AppError> {
    Ok(Json(services::my_profile(&state, &user).await?))
}

#[instrument(skip(state))]
pub async fn profile_of(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Profile>, AppError> {
    let user_id = parse_id(&user_id, "Profile")?;
    Ok(Json(services::profile_of(&state, user_id).await?))
}

#[instrument(skip(_user, body))]
pub async fn extract_skills(
    _user: AuthUser,
    ApiJson(body): ApiJson<ExtractSkillsRequest>,
) -> Result<Json<Vec<String>>, AppError> {
    Ok(Json(services::extract_skills(body.text)?))
}
