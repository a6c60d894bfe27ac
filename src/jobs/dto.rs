use serde::{Deserialize, Serialize};

use super::matching::MatchScore;
use super::repo_types::{Job, SalaryRange};
use crate::applications::repo_types::ApplicantEntry;
use crate::validate::ListInput;

/// Body of `POST /jobs`. Fields stay optional so that every missing one can be
/// reported at once.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    /// Array or comma separated string.
    pub skills: Option<ListInput>,
    pub budget: Option<f64>,
    pub salary: Option<SalaryRange>,
    pub location: Option<String>,
    #[serde(alias = "job_type")]
    pub job_type: Option<String>,
    #[serde(alias = "company_name")]
    pub company_name: Option<String>,
    #[serde(alias = "company_website")]
    pub company_website: Option<String>,
    pub tags: Option<ListInput>,
    pub payment_tx_id: Option<String>,
    pub payment_status: Option<String>,
}

/// `GET /jobs?search=&location=&jobType=&skills=a,b&minSalary=&maxSalary=&page=&limit=`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListJobsQuery {
    pub search: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<String>,
    /// Comma separated.
    pub skills: Option<String>,
    pub min_salary: Option<f64>,
    pub max_salary: Option<f64>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPage {
    pub jobs: Vec<Job>,
    pub current_page: u32,
    /// Page size actually applied, after capping.
    pub limit: u32,
    pub total_pages: u64,
    pub total_jobs: u64,
}

/// A job together with everyone who applied to it.
#[derive(Debug, Serialize)]
pub struct JobDetails {
    #[serde(flatten)]
    pub job: Job,
    pub applicants: Vec<ApplicantEntry>,
}

#[derive(Debug, Serialize)]
pub struct JobEnvelope {
    pub job: JobDetails,
}

#[derive(Debug, Serialize)]
pub struct PostedJobs {
    pub jobs: Vec<JobDetails>,
}

#[derive(Debug, Serialize)]
pub struct MatchResponse {
    pub score: MatchScore,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub msg: &'static str,
}
