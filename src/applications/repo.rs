use async_trait::async_trait;
use uuid::Uuid;

use super::repo_types::{
    ApplicantEntry, ApplicantRow, Application, ApplicationJobRow, ApplicationRow,
    ApplicationWithJob, NewApplication,
};
use super::status::ApplicationStatus;
use crate::db::PgStore;
use crate::store::StoreError;

#[async_trait]
pub trait ApplicationRepo: Send + Sync {
    /// Stores the application and prepends its id to the job's application
    /// list as one unit. `NotFound` when the job does not exist, `Conflict`
    /// when the applicant already applied to it.
    async fn insert_application(&self, new: NewApplication) -> Result<Application, StoreError>;
    async fn find_application(&self, id: Uuid) -> Result<Option<Application>, StoreError>;
    /// Compare-and-set on the status: writes `next` only while the stored
    /// status is still `expected`, otherwise `Conflict`.
    async fn set_application_status(
        &self,
        id: Uuid,
        expected: ApplicationStatus,
        next: ApplicationStatus,
    ) -> Result<Application, StoreError>;
    /// Newest first.
    async fn applications_for_job(&self, job_id: Uuid) -> Result<Vec<ApplicantEntry>, StoreError>;
    /// Newest first, each with a summary of its job when the job still exists.
    async fn applications_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<ApplicationWithJob>, StoreError>;
}

const APPLICATION_COLUMNS: &str =
    "id, job_id, applicant_id, status, cover_letter, resume_link, applied_at";

#[async_trait]
impl ApplicationRepo for PgStore {
    async fn insert_application(&self, new: NewApplication) -> Result<Application, StoreError> {
        let id = Uuid::new_v4();
        let mut tx = self.pool.begin().await?;

        // Locks the job row, so concurrent submissions for one job queue up here.
        let appended = sqlx::query(
            "UPDATE jobs SET application_ids = array_prepend($1, application_ids) WHERE id = $2",
        )
        .bind(id)
        .bind(new.job_id)
        .execute(&mut *tx)
        .await?;
        if appended.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        let row = sqlx::query_as::<_, ApplicationRow>(&format!(
            r#"
            INSERT INTO applications (id, job_id, applicant_id, cover_letter, resume_link)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {APPLICATION_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(new.job_id)
        .bind(new.applicant_id)
        .bind(&new.cover_letter)
        .bind(&new.resume_link)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Application::try_from(row)
    }

    async fn find_application(&self, id: Uuid) -> Result<Option<Application>, StoreError> {
        let row = sqlx::query_as::<_, ApplicationRow>(&format!(
            "SELECT {APPLICATION_COLUMNS} FROM applications WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Application::try_from).transpose()
    }

    async fn set_application_status(
        &self,
        id: Uuid,
        expected: ApplicationStatus,
        next: ApplicationStatus,
    ) -> Result<Application, StoreError> {
        let row = sqlx::query_as::<_, ApplicationRow>(&format!(
            r#"
            UPDATE applications SET status = $3
            WHERE id = $1 AND status = $2
            RETURNING {APPLICATION_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(expected.as_str())
        .bind(next.as_str())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Application::try_from(row),
            None => match self.find_application(id).await? {
                Some(_) => Err(StoreError::Conflict("application status".into())),
                None => Err(StoreError::NotFound),
            },
        }
    }

    async fn applications_for_job(&self, job_id: Uuid) -> Result<Vec<ApplicantEntry>, StoreError> {
        let rows = sqlx::query_as::<_, ApplicantRow>(
            r#"
            SELECT a.id, a.job_id, a.applicant_id, a.status, a.cover_letter, a.resume_link,
                   a.applied_at, p.name AS applicant_name
            FROM applications a
            LEFT JOIN profiles p ON p.user_id = a.applicant_id
            WHERE a.job_id = $1
            ORDER BY a.applied_at DESC, a.id DESC
            "#,
        )
        .bind(job_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|r| {
                Ok(ApplicantEntry {
                    application: Application::try_from(r.application)?,
                    applicant_name: r.applicant_name,
                })
            })
            .collect()
    }

    async fn applications_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<ApplicationWithJob>, StoreError> {
        let rows = sqlx::query_as::<_, ApplicationJobRow>(
            r#"
            SELECT a.id, a.job_id, a.applicant_id, a.status, a.cover_letter, a.resume_link,
                   a.applied_at,
                   j.id AS job_ref, j.title AS job_title, j.company_name AS job_company_name,
                   j.location AS job_location, j.job_type AS job_type,
                   j.salary_min AS job_salary_min, j.salary_max AS job_salary_max,
                   j.description AS job_description
            FROM applications a
            LEFT JOIN jobs j ON j.id = a.job_id
            WHERE a.applicant_id = $1
            ORDER BY a.applied_at DESC, a.id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(ApplicationWithJob::try_from).collect()
    }
}
