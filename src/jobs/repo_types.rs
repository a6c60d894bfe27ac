use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::store::StoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobType {
    #[serde(rename = "Full-time")]
    FullTime,
    #[serde(rename = "Part-time")]
    PartTime,
    Contract,
    Internship,
    Freelance,
}

impl JobType {
    pub const ALL: [JobType; 5] = [
        JobType::FullTime,
        JobType::PartTime,
        JobType::Contract,
        JobType::Internship,
        JobType::Freelance,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            JobType::FullTime => "Full-time",
            JobType::PartTime => "Part-time",
            JobType::Contract => "Contract",
            JobType::Internship => "Internship",
            JobType::Freelance => "Freelance",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL.into_iter().find(|t| t.as_str() == raw)
    }
}

/// Settlement state of the posting fee.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Confirmed,
    Failed,
}

impl PaymentStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Confirmed => "confirmed",
            PaymentStatus::Failed => "failed",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "pending" => Some(PaymentStatus::Pending),
            "confirmed" => Some(PaymentStatus::Confirmed),
            "failed" => Some(PaymentStatus::Failed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SalaryRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl SalaryRange {
    /// `None` when neither bound is set.
    pub fn from_bounds(min: Option<f64>, max: Option<f64>) -> Option<Self> {
        (min.is_some() || max.is_some()).then_some(Self { min, max })
    }
}

/// A posted job. `application_ids` is the authoritative, newest-first list of
/// applications made against it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: Uuid,
    pub posted_by: Uuid,
    pub title: String,
    pub description: String,
    pub skills: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary: Option<SalaryRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_type: Option<JobType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_website: Option<String>,
    pub tags: Vec<String>,
    pub payment_tx_id: String,
    pub payment_status: PaymentStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub application_ids: Vec<Uuid>,
}

impl Job {
    pub fn summary(&self) -> JobSummary {
        JobSummary {
            id: self.id,
            title: self.title.clone(),
            company_name: self.company_name.clone(),
            location: self.location.clone(),
            job_type: self.job_type,
            salary: self.salary,
            description: self.description.clone(),
        }
    }
}

/// The slice of a job shown next to an applicant's own applications.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSummary {
    pub id: Uuid,
    pub title: String,
    pub company_name: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<JobType>,
    pub salary: Option<SalaryRange>,
    pub description: String,
}

/// Validated, normalized input for a new job.
#[derive(Debug, Clone, PartialEq)]
pub struct NewJob {
    pub posted_by: Uuid,
    pub title: String,
    pub description: String,
    pub skills: Vec<String>,
    pub budget: Option<f64>,
    pub salary: Option<SalaryRange>,
    pub location: Option<String>,
    pub job_type: Option<JobType>,
    pub company_name: Option<String>,
    pub company_website: Option<String>,
    pub tags: Vec<String>,
    pub payment_tx_id: String,
    pub payment_status: PaymentStatus,
}

impl NewJob {
    pub fn into_job(self, id: Uuid, created_at: OffsetDateTime) -> Job {
        Job {
            id,
            posted_by: self.posted_by,
            title: self.title,
            description: self.description,
            skills: self.skills,
            budget: self.budget,
            salary: self.salary,
            location: self.location,
            job_type: self.job_type,
            company_name: self.company_name,
            company_website: self.company_website,
            tags: self.tags,
            payment_tx_id: self.payment_tx_id,
            payment_status: self.payment_status,
            created_at,
            application_ids: Vec::new(),
        }
    }
}

/// Row shape of the `jobs` table.
#[derive(Debug, FromRow)]
pub struct JobRow {
    pub id: Uuid,
    pub posted_by: Uuid,
    pub title: String,
    pub description: String,
    pub skills: Vec<String>,
    pub budget: Option<f64>,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub location: Option<String>,
    pub job_type: Option<String>,
    pub company_name: Option<String>,
    pub company_website: Option<String>,
    pub tags: Vec<String>,
    pub payment_tx_id: String,
    pub payment_status: String,
    pub application_ids: Vec<Uuid>,
    pub created_at: OffsetDateTime,
}

impl TryFrom<JobRow> for Job {
    type Error = StoreError;

    fn try_from(r: JobRow) -> Result<Self, Self::Error> {
        let job_type = match r.job_type.as_deref() {
            Some(raw) => Some(JobType::parse(raw).ok_or_else(|| {
                StoreError::Unavailable(format!("job {} has unknown job_type {raw:?}", r.id))
            })?),
            None => None,
        };
        let payment_status = PaymentStatus::parse(&r.payment_status).ok_or_else(|| {
            StoreError::Unavailable(format!(
                "job {} has unknown payment_status {:?}",
                r.id, r.payment_status
            ))
        })?;
        Ok(Self {
            id: r.id,
            posted_by: r.posted_by,
            title: r.title,
            description: r.description,
            skills: r.skills,
            budget: r.budget,
            salary: SalaryRange::from_bounds(r.salary_min, r.salary_max),
            location: r.location,
            job_type,
            company_name: r.company_name,
            company_website: r.company_website,
            tags: r.tags,
            payment_tx_id: r.payment_tx_id,
            payment_status,
            created_at: r.created_at,
            application_ids: r.application_ids,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_type_uses_display_spelling() {
        assert_eq!(JobType::parse("Full-time"), Some(JobType::FullTime));
        assert_eq!(JobType::parse(" Contract "), Some(JobType::Contract));
        assert_eq!(JobType::parse("contract"), None);
        assert_eq!(
            serde_json::to_value(JobType::PartTime).expect("serialize"),
            serde_json::json!("Part-time")
        );
    }

    #[test]
    fn row_with_unknown_status_is_rejected() {
        let row = JobRow {
            id: Uuid::new_v4(),
            posted_by: Uuid::new_v4(),
            title: "t".into(),
            description: "d".into(),
            skills: vec!["rust".into()],
            budget: None,
            salary_min: Some(10.0),
            salary_max: None,
            location: None,
            job_type: Some("Freelance".into()),
            company_name: None,
            company_website: None,
            tags: vec![],
            payment_tx_id: "tx".into(),
            payment_status: "refunded".into(),
            application_ids: vec![],
            created_at: OffsetDateTime::now_utc(),
        };
        assert!(matches!(Job::try_from(row), Err(StoreError::Unavailable(_))));
    }

    #[test]
    fn salary_is_absent_without_bounds() {
        assert_eq!(SalaryRange::from_bounds(None, None), None);
        assert_eq!(
            SalaryRange::from_bounds(None, Some(5.0)),
            Some(SalaryRange { min: None, max: Some(5.0) })
        );
    }
}
