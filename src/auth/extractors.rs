use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;
use uuid::Uuid;

use super::jwt::JwtKeys;
use crate::error::AppError;

/// Caller identity taken from a verified bearer token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub name: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);

        // Read Authorization header
        let auth = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| AppError::Unauthenticated("No token, authorization denied".into()))?;

        // Expect "Bearer <token>"
        let token = auth
            .strip_prefix("Bearer ")
            .or_else(|| auth.strip_prefix("bearer "))
            .ok_or_else(|| AppError::Unauthenticated("Invalid auth scheme".into()))?;

        let claims = keys.verify(token.trim()).map_err(|e| {
            warn!(error = %e, "rejected bearer token");
            AppError::Unauthenticated("Token is not valid".into())
        })?;

        Ok(AuthUser {
            id: claims.sub,
            name: claims.name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{mint_token, state};
    use axum::http::Request;

    async fn extract(header: Option<String>) -> Result<AuthUser, AppError> {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = header {
            builder = builder.header("Authorization", value);
        }
        let (mut parts, _) = builder.body(()).expect("request").into_parts();
        AuthUser::from_request_parts(&mut parts, &state()).await
    }

    #[tokio::test]
    async fn missing_header_is_unauthenticated() {
        assert!(matches!(extract(None).await, Err(AppError::Unauthenticated(_))));
    }

    #[tokio::test]
    async fn non_bearer_scheme_is_unauthenticated() {
        let res = extract(Some("Basic dXNlcjpwYXNz".into())).await;
        assert!(matches!(res, Err(AppError::Unauthenticated(_))));
    }

    #[tokio::test]
    async fn valid_token_yields_identity() {
        let id = Uuid::new_v4();
        let user = extract(Some(format!("Bearer {}", mint_token(id, "Grace"))))
            .await
            .expect("authenticated");
        assert_eq!(user.id, id);
        assert_eq!(user.name, "Grace");
    }
}
