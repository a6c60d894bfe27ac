//! Store handle shared by every request. Postgres in production
//! ([`crate::db::PgStore`]), [`MemoryStore`] for local runs and tests.

pub mod memory;

pub use memory::MemoryStore;

pub use crate::applications::repo::ApplicationRepo;
pub use crate::jobs::repo::JobRepo;
pub use crate::profiles::repo::ProfileRepo;

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A uniqueness rule was violated; carries the constraint name.
    #[error("record conflicts with {0}")]
    Conflict(String),
    #[error("record not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => {
                StoreError::Conflict(db.constraint().unwrap_or("unique constraint").to_string())
            }
            _ => StoreError::Unavailable(err.to_string()),
        }
    }
}

/// Everything the handlers need from persistence.
pub trait Store: JobRepo + ApplicationRepo + ProfileRepo {}

impl<T> Store for T where T: JobRepo + ApplicationRepo + ProfileRepo {}
