use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use super::StoreError;
use crate::applications::repo::ApplicationRepo;
use crate::applications::repo_types::{
    ApplicantEntry, Application, ApplicationWithJob, NewApplication,
};
use crate::applications::status::ApplicationStatus;
use crate::jobs::filter::{JobFilter, Page};
use crate::jobs::repo::JobRepo;
use crate::jobs::repo_types::{Job, NewJob, PaymentStatus};
use crate::profiles::repo::ProfileRepo;
use crate::profiles::repo_types::{Profile, ProfileUpsert};

#[derive(Default)]
struct Tables {
    jobs: HashMap<Uuid, Job>,
    applications: HashMap<Uuid, Application>,
    profiles: HashMap<Uuid, Profile>,
    last_stamp: Option<OffsetDateTime>,
}

impl Tables {
    /// Strictly increasing timestamps so "newest first" is well defined.
    fn stamp(&mut self) -> OffsetDateTime {
        let now = OffsetDateTime::now_utc();
        let next = match self.last_stamp {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_stamp = Some(next);
        next
    }
}

/// Process-local store. Every operation runs under one lock, which makes the
/// application check-then-insert atomic.
#[derive(Default, Clone)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>, StoreError> {
        self.tables
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".into()))
    }
}

fn newest_first<T>(items: &mut [T], key: impl Fn(&T) -> (OffsetDateTime, Uuid)) {
    items.sort_by(|a, b| key(b).cmp(&key(a)));
}

#[async_trait]
impl JobRepo for MemoryStore {
    async fn insert_job(&self, job: NewJob) -> Result<Job, StoreError> {
        let mut t = self.tables()?;
        let created_at = t.stamp();
        let job = job.into_job(Uuid::new_v4(), created_at);
        t.jobs.insert(job.id, job.clone());
        Ok(job)
    }

    async fn find_job(&self, id: Uuid) -> Result<Option<Job>, StoreError> {
        Ok(self.tables()?.jobs.get(&id).cloned())
    }

    async fn list_jobs(
        &self,
        filter: &JobFilter,
        page: Page,
    ) -> Result<(Vec<Job>, u64), StoreError> {
        let t = self.tables()?;
        let mut hits: Vec<Job> = t.jobs.values().filter(|j| filter.matches(j)).cloned().collect();
        newest_first(&mut hits, |j| (j.created_at, j.id));

        let total = hits.len() as u64;
        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let jobs = hits
            .into_iter()
            .skip(offset)
            .take(page.limit as usize)
            .collect();
        Ok((jobs, total))
    }

    async fn jobs_posted_by(&self, user_id: Uuid) -> Result<Vec<Job>, StoreError> {
        let t = self.tables()?;
        let mut jobs: Vec<Job> = t
            .jobs
            .values()
            .filter(|j| j.posted_by == user_id)
            .cloned()
            .collect();
        newest_first(&mut jobs, |j| (j.created_at, j.id));
        Ok(jobs)
    }

    async fn delete_job(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.tables()?.jobs.remove(&id).is_some())
    }

    async fn payment_claimed(&self, tx_id: &str) -> Result<bool, StoreError> {
        Ok(self
            .tables()?
            .jobs
            .values()
            .any(|j| j.payment_tx_id == tx_id && j.payment_status == PaymentStatus::Confirmed))
    }
}

#[async_trait]
impl ApplicationRepo for MemoryStore {
    async fn insert_application(&self, new: NewApplication) -> Result<Application, StoreError> {
        let mut t = self.tables()?;
        if !t.jobs.contains_key(&new.job_id) {
            return Err(StoreError::NotFound);
        }
        let duplicate = t
            .applications
            .values()
            .any(|a| a.job_id == new.job_id && a.applicant_id == new.applicant_id);
        if duplicate {
            return Err(StoreError::Conflict("applications_job_applicant_key".into()));
        }

        let applied_at = t.stamp();
        let application = new.into_application(Uuid::new_v4(), applied_at);
        if let Some(job) = t.jobs.get_mut(&application.job_id) {
            job.application_ids.insert(0, application.id);
        }
        t.applications.insert(application.id, application.clone());
        Ok(application)
    }

    async fn find_application(&self, id: Uuid) -> Result<Option<Application>, StoreError> {
        Ok(self.tables()?.applications.get(&id).cloned())
    }

    async fn set_application_status(
        &self,
        id: Uuid,
        expected: ApplicationStatus,
        next: ApplicationStatus,
    ) -> Result<Application, StoreError> {
        let mut t = self.tables()?;
        let application = t.applications.get_mut(&id).ok_or(StoreError::NotFound)?;
        if application.status != expected {
            return Err(StoreError::Conflict("application status".into()));
        }
        application.status = next;
        Ok(application.clone())
    }

    async fn applications_for_job(&self, job_id: Uuid) -> Result<Vec<ApplicantEntry>, StoreError> {
        let t = self.tables()?;
        let mut entries: Vec<ApplicantEntry> = t
            .applications
            .values()
            .filter(|a| a.job_id == job_id)
            .map(|a| ApplicantEntry {
                application: a.clone(),
                applicant_name: t.profiles.get(&a.applicant_id).map(|p| p.name.clone()),
            })
            .collect();
        newest_first(&mut entries, |e| (e.application.applied_at, e.application.id));
        Ok(entries)
    }

    async fn applications_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<ApplicationWithJob>, StoreError> {
        let t = self.tables()?;
        let mut entries: Vec<ApplicationWithJob> = t
            .applications
            .values()
            .filter(|a| a.applicant_id == user_id)
            .map(|a| ApplicationWithJob {
                application: a.clone(),
                job: t.jobs.get(&a.job_id).map(Job::summary),
            })
            .collect();
        newest_first(&mut entries, |e| (e.application.applied_at, e.application.id));
        Ok(entries)
    }
}

#[async_trait]
impl ProfileRepo for MemoryStore {
    async fn upsert_profile(&self, profile: ProfileUpsert) -> Result<Profile, StoreError> {
        let mut t = self.tables()?;
        if let Some(wallet) = &profile.wallet_address {
            let taken = t.profiles.values().any(|p| {
                p.user_id != profile.user_id && p.wallet_address.as_deref() == Some(wallet.as_str())
            });
            if taken {
                return Err(StoreError::Conflict("profiles_wallet_address_key".into()));
            }
        }

        let now = t.stamp();
        let created_at = t
            .profiles
            .get(&profile.user_id)
            .map_or(now, |existing| existing.created_at);
        let saved = Profile {
            user_id: profile.user_id,
            name: profile.name,
            bio: profile.bio,
            linkedin_url: profile.linkedin_url,
            skills: profile.skills,
            wallet_address: profile.wallet_address,
            created_at,
            updated_at: now,
        };
        t.profiles.insert(saved.user_id, saved.clone());
        Ok(saved)
    }

    async fn profile_for_user(&self, user_id: Uuid) -> Result<Option<Profile>, StoreError> {
        Ok(self.tables()?.profiles.get(&user_id).cloned())
    }
}
