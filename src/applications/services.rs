use tracing::{info, warn};
use uuid::Uuid;

use super::dto::SubmitApplicationRequest;
use super::repo_types::{ApplicantEntry, Application, ApplicationWithJob, NewApplication};
use super::status::StatusVocabulary;
use crate::auth::AuthUser;
use crate::error::{AppError, FieldError};
use crate::jobs::repo_types::Job;
use crate::state::AppState;
use crate::store::{ApplicationRepo, JobRepo, StoreError};
use crate::validate::non_blank;

pub(crate) fn validate_submission(
    applicant_id: Uuid,
    req: SubmitApplicationRequest,
) -> Result<NewApplication, AppError> {
    let mut errors = Vec::new();

    let job_id = match non_blank(req.job_id) {
        Some(raw) => Uuid::parse_str(&raw).ok().or_else(|| {
            errors.push(FieldError::new("jobId", "Job ID is not valid"));
            None
        }),
        None => {
            errors.push(FieldError::new("jobId", "Job ID is required"));
            None
        }
    };
    let cover_letter = non_blank(req.cover_letter);
    if cover_letter.is_none() {
        errors.push(FieldError::new("coverLetter", "Cover Letter is required"));
    }

    match (job_id, cover_letter) {
        (Some(job_id), Some(cover_letter)) => Ok(NewApplication {
            job_id,
            applicant_id,
            cover_letter,
            resume_link: non_blank(req.resume),
        }),
        _ => Err(AppError::Validation(errors)),
    }
}

pub async fn submit(
    state: &AppState,
    user: &AuthUser,
    req: SubmitApplicationRequest,
) -> Result<Application, AppError> {
    let new = validate_submission(user.id, req)?;
    let job_id = new.job_id;

    let application = state.store.insert_application(new).await.map_err(|e| match e {
        StoreError::NotFound => AppError::NotFound("Job not found".into()),
        StoreError::Conflict(_) => {
            warn!(%job_id, user_id = %user.id, "duplicate application");
            AppError::Conflict("You have already applied for this job".into())
        }
        other => other.into(),
    })?;

    info!(application_id = %application.id, %job_id, user_id = %user.id, "application submitted");
    Ok(application)
}

async fn owned_job(state: &AppState, user: &AuthUser, job_id: Uuid, denied: &str) -> Result<Job, AppError> {
    let job = state
        .store
        .find_job(job_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Job not found".into()))?;
    if job.posted_by != user.id {
        warn!(%job_id, user_id = %user.id, "job owner check failed");
        return Err(AppError::Forbidden(denied.into()));
    }
    Ok(job)
}

pub async fn list_for_job(
    state: &AppState,
    user: &AuthUser,
    job_id: Uuid,
) -> Result<Vec<ApplicantEntry>, AppError> {
    owned_job(state, user, job_id, "User not authorized to view applications for this job").await?;
    Ok(state.store.applications_for_job(job_id).await?)
}

/// Moves an application to the status named in `raw`, spelled per `vocab`.
/// Only the job's poster may do this, and terminal statuses stay put.
pub async fn update_status(
    state: &AppState,
    user: &AuthUser,
    application_id: Uuid,
    raw: Option<String>,
    vocab: StatusVocabulary,
) -> Result<Application, AppError> {
    let next = raw
        .as_deref()
        .and_then(|s| vocab.parse(s))
        .ok_or_else(|| {
            AppError::invalid(
                "status",
                format!("Status must be one of {}", vocab.accepted().join(", ")),
            )
        })?;

    let application = state
        .store
        .find_application(application_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Application not found".into()))?;
    owned_job(state, user, application.job_id, "User not authorized to update this application")
        .await?;

    let current = application.status;
    let next = current
        .transition(next)
        .map_err(|e| AppError::Conflict(e.to_string()))?;
    if next == current {
        return Ok(application);
    }

    let updated = state
        .store
        .set_application_status(application_id, current, next)
        .await
        .map_err(|e| match e {
            StoreError::Conflict(_) => {
                AppError::Conflict("Application status changed concurrently, please retry".into())
            }
            StoreError::NotFound => AppError::NotFound("Application not found".into()),
            other => other.into(),
        })?;

    info!(
        %application_id,
        from = current.as_str(),
        to = next.as_str(),
        user_id = %user.id,
        "application status changed"
    );
    Ok(updated)
}

pub async fn my_applications(
    state: &AppState,
    user: &AuthUser,
) -> Result<Vec<ApplicationWithJob>, AppError> {
    Ok(state.store.applications_for_user(user.id).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submission_needs_job_and_cover_letter() {
        let err = validate_submission(Uuid::new_v4(), SubmitApplicationRequest::default()).unwrap_err();
        match err {
            AppError::Validation(errors) => {
                let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
                assert_eq!(fields, vec!["jobId", "coverLetter"]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn malformed_job_id_is_a_field_error() {
        let req = SubmitApplicationRequest {
            job_id: Some("123".into()),
            cover_letter: Some("hi".into()),
            resume: None,
        };
        assert!(matches!(
            validate_submission(Uuid::new_v4(), req),
            Err(AppError::Validation(e)) if e[0].msg == "Job ID is not valid"
        ));
    }

    #[test]
    fn resume_link_is_free_form_and_optional() {
        let job_id = Uuid::new_v4();
        let req = SubmitApplicationRequest {
            job_id: Some(job_id.to_string()),
            cover_letter: Some("  hello ".into()),
            resume: Some("my drive folder".into()),
        };
        let new = validate_submission(Uuid::new_v4(), req).expect("valid");
        assert_eq!(new.job_id, job_id);
        assert_eq!(new.cover_letter, "hello");
        assert_eq!(new.resume_link.as_deref(), Some("my drive folder"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn racing_duplicates_leave_one_application() {
        let state = crate::test_support::state();
        let job = crate::test_support::seed_job(&state, Uuid::new_v4(), "Indexer", |_| {}).await;
        let user = AuthUser {
            id: Uuid::new_v4(),
            name: "Racer".into(),
        };
        let attempt = |state: AppState, user: AuthUser| {
            let req = SubmitApplicationRequest {
                job_id: Some(job.id.to_string()),
                cover_letter: Some("twice".into()),
                resume: None,
            };
            tokio::spawn(async move { submit(&state, &user, req).await })
        };

        let (a, b) = tokio::join!(
            attempt(state.clone(), user.clone()),
            attempt(state.clone(), user.clone())
        );
        let results = [a.expect("join"), b.expect("join")];

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert_eq!(
            results
                .iter()
                .filter(|r| matches!(r, Err(AppError::Conflict(_))))
                .count(),
            1
        );
        let stored = state.store.find_job(job.id).await.expect("find").expect("job");
        assert_eq!(stored.application_ids.len(), 1);
        assert_eq!(state.store.applications_for_user(user.id).await.expect("list").len(), 1);
    }
}
