use tracing::{info, warn};
use uuid::Uuid;

use super::dto::{CreateJobRequest, JobDetails, JobPage, ListJobsQuery};
use super::filter::{JobFilter, Page};
use super::matching::{compute_match_score, MatchScore};
use super::repo_types::{Job, JobType, NewJob, PaymentStatus, SalaryRange};
use crate::auth::AuthUser;
use crate::error::{AppError, FieldError};
use crate::state::AppState;
use crate::store::{ApplicationRepo, JobRepo, ProfileRepo};
use crate::validate::{non_blank, split_csv, ListInput};

fn job_type_error() -> FieldError {
    let allowed: Vec<&str> = JobType::ALL.iter().map(|t| t.as_str()).collect();
    FieldError::new("jobType", format!("Job type must be one of {}", allowed.join(", ")))
}

/// Checks every field of a posting and reports all violations together.
/// The payment status is the client's claim until it has been verified.
pub(crate) fn validate_new_job(posted_by: Uuid, req: CreateJobRequest) -> Result<NewJob, AppError> {
    let mut errors = Vec::new();

    let title = non_blank(req.title);
    if title.is_none() {
        errors.push(FieldError::new("title", "Title is required"));
    }
    let description = non_blank(req.description);
    if description.is_none() {
        errors.push(FieldError::new("description", "Description is required"));
    }
    let skills = req.skills.map(ListInput::into_list).unwrap_or_default();
    if skills.is_empty() {
        errors.push(FieldError::new("skills", "Skills are required"));
    }
    let payment_tx_id = non_blank(req.payment_tx_id);
    if payment_tx_id.is_none() {
        errors.push(FieldError::new("paymentTxId", "Payment transaction ID is required"));
    }

    if req.budget.is_some_and(|b| b < 0.0) {
        errors.push(FieldError::new("budget", "Budget must not be negative"));
    }
    let salary = req
        .salary
        .and_then(|s| SalaryRange::from_bounds(s.min, s.max));
    if let Some(SalaryRange { min, max }) = salary {
        if min.is_some_and(|v| v < 0.0) || max.is_some_and(|v| v < 0.0) {
            errors.push(FieldError::new("salary", "Salary must not be negative"));
        }
        if let (Some(min), Some(max)) = (min, max) {
            if min > max {
                errors.push(FieldError::new("salary", "Salary minimum must not exceed maximum"));
            }
        }
    }

    let job_type = match non_blank(req.job_type) {
        Some(raw) => {
            let parsed = JobType::parse(&raw);
            if parsed.is_none() {
                errors.push(job_type_error());
            }
            parsed
        }
        None => None,
    };
    let payment_status = match non_blank(req.payment_status) {
        Some(raw) => PaymentStatus::parse(&raw).unwrap_or_else(|| {
            errors.push(FieldError::new(
                "paymentStatus",
                "Payment status must be one of pending, confirmed, failed",
            ));
            PaymentStatus::default()
        }),
        None => PaymentStatus::default(),
    };

    match (title, description, payment_tx_id) {
        (Some(title), Some(description), Some(payment_tx_id)) if errors.is_empty() => Ok(NewJob {
            posted_by,
            title,
            description,
            skills,
            budget: req.budget,
            salary,
            location: non_blank(req.location),
            job_type,
            company_name: non_blank(req.company_name),
            company_website: non_blank(req.company_website),
            tags: req.tags.map(ListInput::into_list).unwrap_or_default(),
            payment_tx_id,
            payment_status,
        }),
        _ => Err(AppError::Validation(errors)),
    }
}

pub(crate) fn filter_from_query(query: &ListJobsQuery) -> Result<JobFilter, AppError> {
    let job_type = match non_blank(query.job_type.clone()) {
        Some(raw) => Some(JobType::parse(&raw).ok_or_else(|| AppError::Validation(vec![job_type_error()]))?),
        None => None,
    };
    Ok(JobFilter {
        search: non_blank(query.search.clone()),
        location: non_blank(query.location.clone()),
        job_type,
        skills: query.skills.as_deref().map(split_csv).unwrap_or_default(),
        min_salary: query.min_salary,
        max_salary: query.max_salary,
    })
}

/// Admission control: the posting is stored only once its fee payment has
/// not been reported as failed. A payment that already confirmed another
/// posting is recorded as pending.
pub async fn create_job(state: &AppState, user: &AuthUser, req: CreateJobRequest) -> Result<Job, AppError> {
    let mut new_job = validate_new_job(user.id, req)?;

    let status = state
        .payments
        .verify(&new_job.payment_tx_id, new_job.payment_status)
        .await?;
    if status == PaymentStatus::Failed {
        warn!(user_id = %user.id, tx_id = %new_job.payment_tx_id, "posting fee payment failed");
        return Err(AppError::invalid(
            "paymentTxId",
            "Payment transaction could not be verified",
        ));
    }
    let status = if status == PaymentStatus::Confirmed
        && state.store.payment_claimed(&new_job.payment_tx_id).await?
    {
        warn!(user_id = %user.id, tx_id = %new_job.payment_tx_id, "payment already backs a confirmed posting");
        PaymentStatus::Pending
    } else {
        status
    };
    new_job.payment_status = status;

    let job = state.store.insert_job(new_job).await?;
    info!(job_id = %job.id, user_id = %user.id, payment_status = job.payment_status.as_str(), "job created");
    Ok(job)
}

pub async fn list_jobs(state: &AppState, query: ListJobsQuery) -> Result<JobPage, AppError> {
    let filter = filter_from_query(&query)?;
    let page = Page::new(query.page, query.limit)?;
    let (jobs, total) = state.store.list_jobs(&filter, page).await?;
    Ok(JobPage {
        jobs,
        current_page: page.number,
        limit: page.limit,
        total_pages: page.total_pages(total),
        total_jobs: total,
    })
}

async fn find_job(state: &AppState, id: Uuid) -> Result<Job, AppError> {
    state
        .store
        .find_job(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Job not found".into()))
}

async fn with_applicants(state: &AppState, job: Job) -> Result<JobDetails, AppError> {
    let applicants = state.store.applications_for_job(job.id).await?;
    Ok(JobDetails { job, applicants })
}

pub async fn get_job(state: &AppState, id: Uuid) -> Result<JobDetails, AppError> {
    let job = find_job(state, id).await?;
    with_applicants(state, job).await
}

pub async fn my_posted_jobs(state: &AppState, user: &AuthUser) -> Result<Vec<JobDetails>, AppError> {
    let jobs = state.store.jobs_posted_by(user.id).await?;
    let mut out = Vec::with_capacity(jobs.len());
    for job in jobs {
        out.push(with_applicants(state, job).await?);
    }
    Ok(out)
}

/// Owner only. Applications made against the job are kept.
pub async fn delete_job(state: &AppState, user: &AuthUser, id: Uuid) -> Result<(), AppError> {
    let job = find_job(state, id).await?;
    if job.posted_by != user.id {
        warn!(job_id = %id, user_id = %user.id, "delete by non-owner refused");
        return Err(AppError::Forbidden("User not authorized".into()));
    }
    if !state.store.delete_job(id).await? {
        return Err(AppError::NotFound("Job not found".into()));
    }
    info!(job_id = %id, user_id = %user.id, "job removed");
    Ok(())
}

pub async fn match_score(state: &AppState, job_id: Uuid, user_id: Uuid) -> Result<MatchScore, AppError> {
    let job = find_job(state, job_id).await?;
    let profile = state
        .store
        .profile_for_user(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Applicant profile not found".into()))?;
    Ok(compute_match_score(&job.skills, &profile.skills))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> CreateJobRequest {
        CreateJobRequest {
            title: Some(" Rust Engineer ".into()),
            description: Some("Build it".into()),
            skills: Some(ListInput::List(vec![" Rust ".into(), "".into(), "Tokio".into()])),
            tags: Some(ListInput::Csv("  , web3".into())),
            payment_tx_id: Some("sig".into()),
            ..Default::default()
        }
    }

    fn fields(err: AppError) -> Vec<String> {
        match err {
            AppError::Validation(errors) => errors.into_iter().map(|e| e.field).collect(),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn normalizes_a_complete_posting() {
        let poster = Uuid::new_v4();
        let job = validate_new_job(poster, complete()).expect("valid");
        assert_eq!(job.posted_by, poster);
        assert_eq!(job.title, "Rust Engineer");
        assert_eq!(job.skills, vec!["Rust", "Tokio"]);
        assert_eq!(job.tags, vec!["web3"]);
        assert_eq!(job.payment_status, PaymentStatus::Pending);
    }

    #[test]
    fn reports_every_missing_field() {
        let err = validate_new_job(Uuid::new_v4(), CreateJobRequest::default()).unwrap_err();
        assert_eq!(fields(err), vec!["title", "description", "skills", "paymentTxId"]);
    }

    #[test]
    fn missing_payment_id_is_a_field_error() {
        let req = CreateJobRequest {
            payment_tx_id: Some("   ".into()),
            ..complete()
        };
        assert_eq!(fields(validate_new_job(Uuid::new_v4(), req).unwrap_err()), vec!["paymentTxId"]);
    }

    #[test]
    fn money_and_enums_are_checked() {
        let req = CreateJobRequest {
            budget: Some(-1.0),
            salary: Some(SalaryRange {
                min: Some(200.0),
                max: Some(100.0),
            }),
            job_type: Some("Gig".into()),
            payment_status: Some("refunded".into()),
            ..complete()
        };
        let got = fields(validate_new_job(Uuid::new_v4(), req).unwrap_err());
        assert_eq!(got, vec!["budget", "salary", "jobType", "paymentStatus"]);
    }

    #[test]
    fn empty_salary_object_is_dropped() {
        let req = CreateJobRequest {
            salary: Some(SalaryRange::default()),
            job_type: Some("Full-time".into()),
            ..complete()
        };
        let job = validate_new_job(Uuid::new_v4(), req).expect("valid");
        assert_eq!(job.salary, None);
        assert_eq!(job.job_type, Some(JobType::FullTime));
    }

    #[test]
    fn query_filters_ignore_blanks_and_split_skills() {
        let query = ListJobsQuery {
            search: Some("  ".into()),
            location: Some("remote".into()),
            job_type: Some("Contract".into()),
            skills: Some("rust, go,".into()),
            ..Default::default()
        };
        let filter = filter_from_query(&query).expect("filter");
        assert_eq!(filter.search, None);
        assert_eq!(filter.location.as_deref(), Some("remote"));
        assert_eq!(filter.job_type, Some(JobType::Contract));
        assert_eq!(filter.skills, vec!["rust", "go"]);

        let bad = ListJobsQuery {
            job_type: Some("Gig".into()),
            ..Default::default()
        };
        assert!(matches!(filter_from_query(&bad), Err(AppError::Validation(_))));
    }
}
