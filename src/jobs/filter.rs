use crate::error::{AppError, FieldError};

use super::repo_types::{Job, JobType};

/// AND-combined listing filters. Text filters are case-insensitive substring
/// matches; `skills` matches when any listed skill is a substring of any job
/// skill. The salary bounds test containment (`min >= min_salary`,
/// `max <= max_salary`), so a job without the compared bound never matches.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobFilter {
    pub search: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<JobType>,
    pub skills: Vec<String>,
    pub min_salary: Option<f64>,
    pub max_salary: Option<f64>,
}

impl JobFilter {
    pub fn matches(&self, job: &Job) -> bool {
        if let Some(search) = &self.search {
            let hit = contains_ci(&job.title, search)
                || contains_ci(&job.description, search)
                || job
                    .company_name
                    .as_deref()
                    .is_some_and(|c| contains_ci(c, search));
            if !hit {
                return false;
            }
        }
        if let Some(location) = &self.location {
            if !job.location.as_deref().is_some_and(|l| contains_ci(l, location)) {
                return false;
            }
        }
        if let Some(job_type) = self.job_type {
            if job.job_type != Some(job_type) {
                return false;
            }
        }
        if !self.skills.is_empty() {
            let hit = self
                .skills
                .iter()
                .any(|wanted| job.skills.iter().any(|have| contains_ci(have, wanted)));
            if !hit {
                return false;
            }
        }
        let salary = job.salary.unwrap_or_default();
        if let Some(floor) = self.min_salary {
            if !salary.min.is_some_and(|min| min >= floor) {
                return false;
            }
        }
        if let Some(ceiling) = self.max_salary {
            if !salary.max.is_some_and(|max| max <= ceiling) {
                return false;
            }
        }
        true
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// 1-indexed page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub number: u32,
    pub limit: u32,
}

impl Page {
    pub const DEFAULT_LIMIT: u32 = 10;
    pub const MAX_LIMIT: u32 = 100;

    pub fn new(number: Option<u32>, limit: Option<u32>) -> Result<Self, AppError> {
        let number = number.unwrap_or(1);
        let limit = limit.unwrap_or(Self::DEFAULT_LIMIT);

        let mut errors = Vec::new();
        if number == 0 {
            errors.push(FieldError::new("page", "page must be at least 1"));
        }
        if limit == 0 {
            errors.push(FieldError::new("limit", "limit must be at least 1"));
        }
        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        Ok(Self {
            number,
            limit: limit.min(Self::MAX_LIMIT),
        })
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.number - 1) * u64::from(self.limit)
    }

    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(u64::from(self.limit))
    }
}
