use async_trait::async_trait;
use uuid::Uuid;

use super::repo_types::{Profile, ProfileUpsert};
use crate::db::PgStore;
use crate::store::StoreError;

#[async_trait]
pub trait ProfileRepo: Send + Sync {
    /// Create or replace the owner's profile. `Conflict` when the wallet
    /// address belongs to another profile.
    async fn upsert_profile(&self, profile: ProfileUpsert) -> Result<Profile, StoreError>;
    async fn profile_for_user(&self, user_id: Uuid) -> Result<Option<Profile>, StoreError>;
}

#[async_trait]
impl ProfileRepo for PgStore {
    async fn upsert_profile(&self, profile: ProfileUpsert) -> Result<Profile, StoreError> {
        let saved = sqlx::query_as::<_, Profile>(
            r#"
            INSERT INTO profiles (user_id, name, bio, linkedin_url, skills, wallet_address)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (user_id) DO UPDATE
            SET name = EXCLUDED.name,
                bio = EXCLUDED.bio,
                linkedin_url = EXCLUDED.linkedin_url,
                skills = EXCLUDED.skills,
                wallet_address = EXCLUDED.wallet_address,
                updated_at = now()
            RETURNING user_id, name, bio, linkedin_url, skills, wallet_address,
                      created_at, updated_at
            "#,
        )
        .bind(profile.user_id)
        .bind(&profile.name)
        .bind(&profile.bio)
        .bind(&profile.linkedin_url)
        .bind(&profile.skills)
        .bind(&profile.wallet_address)
        .fetch_one(&self.pool)
        .await?;
        Ok(saved)
    }

    async fn profile_for_user(&self, user_id: Uuid) -> Result<Option<Profile>, StoreError> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            SELECT user_id, name, bio, linkedin_url, skills, wallet_address, created_at, updated_at
            FROM profiles
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(profile)
    }
}
