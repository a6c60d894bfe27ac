use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// One per user; holds the declared skills used for matching.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub user_id: Uuid,
    pub name: String,
    pub bio: String,
    pub linkedin_url: Option<String>,
    pub skills: Vec<String>,
    pub wallet_address: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Validated create-or-replace input.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileUpsert {
    pub user_id: Uuid,
    pub name: String,
    pub bio: String,
    pub linkedin_url: Option<String>,
    pub skills: Vec<String>,
    pub wallet_address: Option<String>,
}
