use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use super::status::ApplicationStatus;
use crate::jobs::repo_types::{JobSummary, JobType, SalaryRange};
use crate::store::StoreError;

/// A candidate's submission against a job.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: Uuid,
    pub job_id: Uuid,
    pub applicant_id: Uuid,
    pub status: ApplicationStatus,
    pub cover_letter: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume_link: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub applied_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewApplication {
    pub job_id: Uuid,
    pub applicant_id: Uuid,
    pub cover_letter: String,
    pub resume_link: Option<String>,
}

impl NewApplication {
    pub fn into_application(self, id: Uuid, applied_at: OffsetDateTime) -> Application {
        Application {
            id,
            job_id: self.job_id,
            applicant_id: self.applicant_id,
            status: ApplicationStatus::Pending,
            cover_letter: self.cover_letter,
            resume_link: self.resume_link,
            applied_at,
        }
    }
}

/// An application as seen by the job's poster.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantEntry {
    #[serde(flatten)]
    pub application: Application,
    /// From the applicant's profile, when they have one.
    pub applicant_name: Option<String>,
}

/// An application as seen by the applicant; `job` is `null` once the job is gone.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicationWithJob {
    #[serde(flatten)]
    pub application: Application,
    pub job: Option<JobSummary>,
}

#[derive(Debug, FromRow)]
pub struct ApplicationRow {
    pub id: Uuid,
    pub job_id: Uuid,
    pub applicant_id: Uuid,
    pub status: String,
    pub cover_letter: String,
    pub resume_link: Option<String>,
    pub applied_at: OffsetDateTime,
}

impl TryFrom<ApplicationRow> for Application {
    type Error = StoreError;

    fn try_from(r: ApplicationRow) -> Result<Self, Self::Error> {
        let status = ApplicationStatus::parse(&r.status).ok_or_else(|| {
            StoreError::Unavailable(format!("application {} has unknown status {:?}", r.id, r.status))
        })?;
        Ok(Self {
            id: r.id,
            job_id: r.job_id,
            applicant_id: r.applicant_id,
            status,
            cover_letter: r.cover_letter,
            resume_link: r.resume_link,
            applied_at: r.applied_at,
        })
    }
}

/// `ApplicationRow` plus the applicant's profile name.
#[derive(Debug, FromRow)]
pub struct ApplicantRow {
    #[sqlx(flatten)]
    pub application: ApplicationRow,
    pub applicant_name: Option<String>,
}

/// `ApplicationRow` left-joined with the summary columns of its job.
#[derive(Debug, FromRow)]
pub struct ApplicationJobRow {
    #[sqlx(flatten)]
    pub application: ApplicationRow,
    pub job_ref: Option<Uuid>,
    pub job_title: Option<String>,
    pub job_company_name: Option<String>,
    pub job_location: Option<String>,
    pub job_type: Option<String>,
    pub job_salary_min: Option<f64>,
    pub job_salary_max: Option<f64>,
    pub job_description: Option<String>,
}

impl TryFrom<ApplicationJobRow> for ApplicationWithJob {
    type Error = StoreError;

    fn try_from(r: ApplicationJobRow) -> Result<Self, Self::Error> {
        let application = Application::try_from(r.application)?;
        let job = match r.job_ref {
            Some(id) => Some(JobSummary {
                id,
                title: r.job_title.unwrap_or_default(),
                company_name: r.job_company_name,
                location: r.job_location,
                job_type: r.job_type.as_deref().and_then(JobType::parse),
                salary: SalaryRange::from_bounds(r.job_salary_min, r.job_salary_max),
                description: r.job_description.unwrap_or_default(),
            }),
            None => None,
        };
        Ok(Self { application, job })
    }
}
