//! Fixtures for handler tests: an in-memory `AppState`, locally minted bearer
//! tokens, request builders and a `oneshot` driver.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::Value;
use time::OffsetDateTime;
use tower::ServiceExt;
use uuid::Uuid;

use crate::applications::repo_types::{Application, NewApplication};
use crate::auth::Claims;
use crate::config::{AppConfig, JwtConfig, PaymentConfig, DEFAULT_FEE_LAMPORTS};
use crate::jobs::repo_types::{Job, NewJob, PaymentStatus};
use crate::payments::{ClientAttested, PaymentVerifier};
use crate::profiles::repo_types::{Profile, ProfileUpsert};
use crate::state::AppState;
use crate::store::{ApplicationRepo, JobRepo, MemoryStore, ProfileRepo};

pub const SECRET: &str = "test-secret";
pub const ISSUER: &str = "jobboard-test";
pub const AUDIENCE: &str = "jobboard-test-users";

pub fn test_config() -> AppConfig {
    AppConfig {
        database_url: None,
        max_connections: 1,
        jwt: JwtConfig {
            secret: SECRET.into(),
            issuer: ISSUER.into(),
            audience: AUDIENCE.into(),
        },
        payment: PaymentConfig {
            rpc_url: None,
            treasury_address: None,
            fee_lamports: DEFAULT_FEE_LAMPORTS,
        },
    }
}

pub fn state() -> AppState {
    state_with_payments(ClientAttested)
}

pub fn state_with_payments(payments: impl PaymentVerifier + 'static) -> AppState {
    AppState::from_parts(
        Arc::new(MemoryStore::new()),
        Arc::new(test_config()),
        Arc::new(payments),
    )
}

/// Ledger stand-in that reports every payment as failed.
pub struct Rejecting;

#[async_trait]
impl PaymentVerifier for Rejecting {
    async fn verify(&self, _tx_id: &str, _claimed: PaymentStatus) -> anyhow::Result<PaymentStatus> {
        Ok(PaymentStatus::Failed)
    }
}

/// Token as the identity provider would issue it, valid for an hour.
pub fn mint_token(user_id: Uuid, name: &str) -> String {
    let now = OffsetDateTime::now_utc().unix_timestamp() as usize;
    let claims = Claims {
        sub: user_id,
        name: name.into(),
        iat: now,
        exp: now + 3600,
        iss: ISSUER.into(),
        aud: AUDIENCE.into(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .expect("encode token")
}

pub fn app(state: &AppState) -> Router {
    crate::app::build_app(state.clone())
}

fn request(method: Method, uri: &str, user: Option<Uuid>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(id) = user {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", mint_token(id, "Tester")));
    }
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    }
}

pub fn get(uri: &str, user: Option<Uuid>) -> Request<Body> {
    request(Method::GET, uri, user, None)
}

pub fn delete(uri: &str, user: Option<Uuid>) -> Request<Body> {
    request(Method::DELETE, uri, user, None)
}

pub fn post_json(uri: &str, user: Option<Uuid>, body: Value) -> Request<Body> {
    request(Method::POST, uri, user, Some(body))
}

pub fn put_json(uri: &str, user: Option<Uuid>, body: Value) -> Request<Body> {
    request(Method::PUT, uri, user, Some(body))
}

/// Status plus body; non-JSON bodies come back as a JSON string.
pub async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(req).await.expect("response");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 1 << 20)
        .await
        .expect("body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, body)
}

pub async fn seed_job(
    state: &AppState,
    posted_by: Uuid,
    title: &str,
    customize: impl FnOnce(&mut NewJob),
) -> Job {
    let mut job = NewJob {
        posted_by,
        title: title.into(),
        description: format!("{title} description"),
        skills: vec!["Rust".into()],
        budget: None,
        salary: None,
        location: None,
        job_type: None,
        company_name: None,
        company_website: None,
        tags: vec![],
        payment_tx_id: "seeded-tx".into(),
        payment_status: PaymentStatus::Confirmed,
    };
    customize(&mut job);
    state.store.insert_job(job).await.expect("seed job")
}

pub async fn seed_profile(state: &AppState, user_id: Uuid, skills: &[&str]) -> Profile {
    state
        .store
        .upsert_profile(ProfileUpsert {
            user_id,
            name: "Candidate".into(),
            bio: "Seeded".into(),
            linkedin_url: None,
            skills: skills.iter().map(|s| s.to_string()).collect(),
            wallet_address: None,
        })
        .await
        .expect("seed profile")
}

pub async fn seed_application(state: &AppState, job_id: Uuid, applicant_id: Uuid) -> Application {
    state
        .store
        .insert_application(NewApplication {
            job_id,
            applicant_id,
            cover_letter: "Seeded cover letter".into(),
            resume_link: None,
        })
        .await
        .expect("seed application")
}
