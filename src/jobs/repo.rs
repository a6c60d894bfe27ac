use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use super::filter::{JobFilter, Page};
use super::repo_types::{Job, JobRow, JobType, NewJob, PaymentStatus};
use crate::db::{contains_pattern, PgStore};
use crate::store::StoreError;

#[async_trait]
pub trait JobRepo: Send + Sync {
    async fn insert_job(&self, job: NewJob) -> Result<Job, StoreError>;
    async fn find_job(&self, id: Uuid) -> Result<Option<Job>, StoreError>;
    /// One page of matching jobs, newest first, plus the total match count.
    async fn list_jobs(&self, filter: &JobFilter, page: Page)
        -> Result<(Vec<Job>, u64), StoreError>;
    async fn jobs_posted_by(&self, user_id: Uuid) -> Result<Vec<Job>, StoreError>;
    /// `false` when there was nothing to delete.
    async fn delete_job(&self, id: Uuid) -> Result<bool, StoreError>;
    /// Whether a stored job already holds `tx_id` as a confirmed payment.
    async fn payment_claimed(&self, tx_id: &str) -> Result<bool, StoreError>;
}

const JOB_COLUMNS: &str = "id, posted_by, title, description, skills, budget, salary_min, \
     salary_max, location, job_type, company_name, company_website, tags, payment_tx_id, \
     payment_status, application_ids, created_at";

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filter: &JobFilter) {
    qb.push(" WHERE TRUE");
    if let Some(search) = &filter.search {
        let pattern = contains_pattern(search);
        qb.push(" AND (title ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR description ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR company_name ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(location) = &filter.location {
        qb.push(" AND location ILIKE ")
            .push_bind(contains_pattern(location));
    }
    if let Some(job_type) = filter.job_type {
        qb.push(" AND job_type = ").push_bind(job_type.as_str());
    }
    if !filter.skills.is_empty() {
        let patterns: Vec<String> = filter.skills.iter().map(|s| contains_pattern(s)).collect();
        qb.push(" AND EXISTS (SELECT 1 FROM unnest(skills) AS s WHERE s ILIKE ANY(")
            .push_bind(patterns)
            .push("))");
    }
    if let Some(floor) = filter.min_salary {
        qb.push(" AND salary_min >= ").push_bind(floor);
    }
    if let Some(ceiling) = filter.max_salary {
        qb.push(" AND salary_max <= ").push_bind(ceiling);
    }
}

fn into_jobs(rows: Vec<JobRow>) -> Result<Vec<Job>, StoreError> {
    rows.into_iter().map(Job::try_from).collect()
}

#[async_trait]
impl JobRepo for PgStore {
    async fn insert_job(&self, job: NewJob) -> Result<Job, StoreError> {
        let salary = job.salary.unwrap_or_default();
        let row = sqlx::query_as::<_, JobRow>(&format!(
            r#"
            INSERT INTO jobs (id, posted_by, title, description, skills, budget, salary_min,
                              salary_max, location, job_type, company_name, company_website,
                              tags, payment_tx_id, payment_status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING {JOB_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(job.posted_by)
        .bind(&job.title)
        .bind(&job.description)
        .bind(&job.skills)
        .bind(job.budget)
        .bind(salary.min)
        .bind(salary.max)
        .bind(&job.location)
        .bind(job.job_type.map(JobType::as_str))
        .bind(&job.company_name)
        .bind(&job.company_website)
        .bind(&job.tags)
        .bind(&job.payment_tx_id)
        .bind(job.payment_status.as_str())
        .fetch_one(&self.pool)
        .await?;
        Job::try_from(row)
    }

    async fn find_job(&self, id: Uuid) -> Result<Option<Job>, StoreError> {
        let row = sqlx::query_as::<_, JobRow>(&format!(
            "SELECT {JOB_COLUMNS} FROM jobs WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Job::try_from).transpose()
    }

    async fn list_jobs(
        &self,
        filter: &JobFilter,
        page: Page,
    ) -> Result<(Vec<Job>, u64), StoreError> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM jobs");
        push_filters(&mut count, filter);
        let (total,): (i64,) = count.build_query_as().fetch_one(&self.pool).await?;

        let mut select = QueryBuilder::<Postgres>::new(format!("SELECT {JOB_COLUMNS} FROM jobs"));
        push_filters(&mut select, filter);
        select
            .push(" ORDER BY created_at DESC, id DESC LIMIT ")
            .push_bind(i64::from(page.limit))
            .push(" OFFSET ")
            .push_bind(i64::try_from(page.offset()).unwrap_or(i64::MAX));
        let rows = select
            .build_query_as::<JobRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok((into_jobs(rows)?, u64::try_from(total).unwrap_or_default()))
    }

    async fn jobs_posted_by(&self, user_id: Uuid) -> Result<Vec<Job>, StoreError> {
        let rows = sqlx::query_as::<_, JobRow>(&format!(
            r#"
            SELECT {JOB_COLUMNS}
            FROM jobs
            WHERE posted_by = $1
            ORDER BY created_at DESC, id DESC
            "#
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        into_jobs(rows)
    }

    async fn delete_job(&self, id: Uuid) -> Result<bool, StoreError> {
        let res = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn payment_claimed(&self, tx_id: &str) -> Result<bool, StoreError> {
        let (claimed,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (SELECT 1 FROM jobs WHERE payment_tx_id = $1 AND payment_status = $2)",
        )
        .bind(tx_id)
        .bind(PaymentStatus::Confirmed.as_str())
        .fetch_one(&self.pool)
        .await?;
        Ok(claimed)
    }
}
