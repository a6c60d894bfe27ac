use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use tracing::instrument;

use super::dto::{ApplicationReceipt, StatusUpdateRequest, SubmitApplicationRequest};
use super::repo_types::{ApplicantEntry, ApplicationWithJob};
use super::services;
use super::status::StatusVocabulary;
use crate::auth::AuthUser;
use crate::error::{parse_id, AppError};
use crate::extract::ApiJson;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/applications", post(submit))
        .route("/applications/my-applications", get(my_applications))
        .route("/applications/job/:job_id", get(list_for_job))
        .route("/applications/:id/status", put(update_status))
}

#[instrument(skip(state, body), fields(user_id = %user.id))]
pub async fn submit(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(body): ApiJson<SubmitApplicationRequest>,
) -> Result<(StatusCode, Json<ApplicationReceipt>), AppError> {
    let application = services::submit(&state, &user, body).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApplicationReceipt {
            msg: "Application submitted successfully",
            application,
        }),
    ))
}

#[instrument(skip(state), fields(user_id = %user.id))]
pub async fn list_for_job(
    State(state): State<AppState>,
    user: AuthUser,
    Path(job_id): Path<String>,
) -> Result<Json<Vec<ApplicantEntry>>, AppError> {
    let job_id = parse_id(&job_id, "Job")?;
    Ok(Json(services::list_for_job(&state, &user, job_id).await?))
}

#[instrument(skip(state, body), fields(user_id = %user.id))]
pub async fn update_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<StatusUpdateRequest>,
) -> Result<Json<ApplicationReceipt>, AppError> {
    let id = parse_id(&id, "Application")?;
    let application =
        services::update_status(&state, &user, id, body.status, StatusVocabulary::Review).await?;
    Ok(Json(ApplicationReceipt {
        msg: "Application status updated successfully",
        application,
    }))
}

#[instrument(skip(state), fields(user_id = %user.id))]
pub async fn my_applications(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<ApplicationWithJob>>, AppError> {
    Ok(Json(services::my_applications(&state, &user).await?))
}
