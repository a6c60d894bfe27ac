use axum::{
    extract::{Path, State},
    routing::{delete, get, post, put},
    Json, Router,
};
use tracing::instrument;

use super::dto::{
    CreateJobRequest, JobEnvelope, JobPage, ListJobsQuery, MatchResponse, MessageResponse,
    PostedJobs,
};
use super::repo_types::Job;
use super::services;
use crate::applications::dto::StatusUpdateRequest;
use crate::applications::repo_types::Application;
use crate::applications::services as applications;
use crate::applications::status::StatusVocabulary;
use crate::auth::AuthUser;
use crate::error::{parse_id, AppError};
use crate::extract::{ApiJson, ApiQuery};
use crate::state::AppState;

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/jobs", get(list_jobs))
        .route("/jobs/my-posted-jobs", get(my_posted_jobs))
        .route("/jobs/match/:job_id/:user_id", get(match_score))
        .route("/jobs/:id", get(get_job))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/jobs", post(create_job))
        .route("/jobs/:id", delete(delete_job))
        .route("/jobs/application/:id/status", put(update_application_status))
}

#[instrument(skip(state))]
pub async fn list_jobs(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListJobsQuery>,
) -> Result<Json<JobPage>, AppError> {
    Ok(Json(services::list_jobs(&state, query).await?))
}

#[instrument(skip(state, body), fields(user_id = %user.id))]
pub async fn create_job(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(body): ApiJson<CreateJobRequest>,
) -> Result<Json<Job>, AppError> {
    Ok(Json(services::create_job(&state, &user, body).await?))
}

#[instrument(skip(state), fields(user_id = %user.id))]
pub async fn my_posted_jobs(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<PostedJobs>, AppError> {
    let jobs = services::my_posted_jobs(&state, &user).await?;
    Ok(Json(PostedJobs { jobs }))
}

/// Public: anyone may look at a job and its applicants.
#[instrument(skip(state))]
pub async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<JobEnvelope>, AppError> {
    let id = parse_id(&id, "Job")?;
    let job = services::get_job(&state, id).await?;
    Ok(Json(JobEnvelope { job }))
}

#[instrument(skip(state), fields(user_id = %user.id))]
pub async fn delete_job(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = parse_id(&id, "Job")?;
    services::delete_job(&state, &user, id).await?;
    Ok(Json(MessageResponse { msg: "Job removed" }))
}

#[instrument(skip(state, _user))]
pub async fn match_score(
    State(state): State<AppState>,
    _user: AuthUser,
    Path((job_id, user_id)): Path<(String, String)>,
) -> Result<Json<MatchResponse>, AppError> {
    let job_id = parse_id(&job_id, "Job")?;
    let user_id = parse_id(&user_id, "Applicant profile")?;
    let score = services::match_score(&state, job_id, user_id).await?;
    Ok(Json(MatchResponse { score }))
}

/// Older spelling of the status update (`pending|scheduled|rejected|hired`).
#[instrument(skip(state, body), fields(user_id = %user.id))]
pub async fn update_application_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<StatusUpdateRequest>,
) -> Result<Json<Application>, AppError> {
    let id = parse_id(&id, "Application")?;
    let application =
        applications::update_status(&state, &user, id, body.status, StatusVocabulary::Legacy)
            .await?;
    Ok(Json(application))
}
