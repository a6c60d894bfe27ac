use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};
use uuid::Uuid;

use super::dto::ProfileRequest;
use super::repo_types::{Profile, ProfileUpsert};
use super::skills;
use crate::auth::AuthUser;
use crate::error::{AppError, FieldError};
use crate::state::AppState;
use crate::store::{ProfileRepo, StoreError};
use crate::validate::non_blank;

pub const MAX_BIO_CHARS: usize = 500;

lazy_static! {
    static ref LINKEDIN_RE: Regex =
        Regex::new(r"(?i)^(https?://)?(www\.)?linkedin\.com/.*$").unwrap();
    // ed25519 public key in base58
    static ref WALLET_RE: Regex = Regex::new(r"^[1-9A-HJ-NP-Za-km-z]{32,44}$").unwrap();
}

/// De-duplicates case-insensitively, keeping the first spelling.
fn dedupe_skills(skills: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    skills
        .into_iter()
        .filter(|s| seen.insert(s.to_lowercase()))
        .collect()
}

pub(crate) fn validate_profile(user_id: Uuid, req: ProfileRequest) -> Result<ProfileUpsert, AppError> {
    let mut errors = Vec::new();

    let name = non_blank(req.name);
    if name.is_none() {
        errors.push(FieldError::new("name", "Name is required"));
    }
    let bio = non_blank(req.bio);
    match &bio {
        None => errors.push(FieldError::new("bio", "Bio is required")),
        Some(bio) if bio.chars().count() > MAX_BIO_CHARS => errors.push(FieldError::new(
            "bio",
            format!("Bio must be at most {MAX_BIO_CHARS} characters"),
        )),
        Some(_) => {}
    }
    let linkedin_url = non_blank(req.linkedin_url);
    if linkedin_url.as_deref().is_some_and(|u| !LINKEDIN_RE.is_match(u)) {
        errors.push(FieldError::new("linkedinUrl", "LinkedIn URL must be a linkedin.com address"));
    }
    let wallet_address = non_blank(req.wallet_address);
    if wallet_address.as_deref().is_some_and(|w| !WALLET_RE.is_match(w)) {
        errors.push(FieldError::new("walletAddress", "Wallet address must be a base58 Solana address"));
    }

    match (name, bio) {
        (Some(name), Some(bio)) if errors.is_empty() => Ok(ProfileUpsert {
            user_id,
            name,
            bio,
            linkedin_url,
            skills: dedupe_skills(req.skills.map(|s| s.into_list()).unwrap_or_default()),
            wallet_address,
        }),
        _ => Err(AppError::Validation(errors)),
    }
}

/// Create-or-replace of the caller's profile.
pub async fn upsert(state: &AppState, user: &AuthUser, req: ProfileRequest) -> Result<Profile, AppError> {
    let upsert = validate_profile(user.id, req)?;
    let profile = state.store.upsert_profile(upsert).await.map_err(|e| match e {
        StoreError::Conflict(_) => {
            warn!(user_id = %user.id, "wallet address already linked");
            AppError::Conflict("Wallet address is already linked to another profile".into())
        }
        other => other.into(),
    })?;
    info!(user_id = %user.id, skills = profile.skills.len(), "profile saved");
    Ok(profile)
}

pub async fn my_profile(state: &AppState, user: &AuthUser) -> Result<Profile, AppError> {
    state
        .store
        .profile_for_user(user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("There is no profile for this user".into()))
}

pub async fn profile_of(state: &AppState, user_id: Uuid) -> Result<Profile, AppError> {
    state
        .store
        .profile_for_user(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found".into()))
}

pub fn extract_skills(text: Option<String>) -> Result<Vec<String>, AppError> {
    let text = non_blank(text)
        .ok_or_else(|| AppError::invalid("text", "Text is required for skill extraction"))?;
    Ok(skills::extract_skills(&text))
}
