use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;
use tracing::{debug, error};

use crate::store::StoreError;

/// A single violated input rule, reported back as `{field, msg}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub msg: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            msg: msg.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("validation failed")]
    Validation(Vec<FieldError>),
    #[error("{0}")]
    Unauthenticated(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn invalid(field: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Validation(vec![FieldError::new(field, msg)])
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            AppError::Validation(errors) => json!({ "errors": errors }),
            AppError::Internal(err) => {
                error!(error = %err, "internal error");
                json!({ "msg": "Server Error" })
            }
            other => json!({ "msg": other.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound => AppError::NotFound("record not found".into()),
            StoreError::Conflict(constraint) => {
                AppError::Conflict(format!("conflicts with an existing record ({constraint})"))
            }
            StoreError::Unavailable(reason) => {
                AppError::Internal(anyhow::anyhow!("store unavailable: {reason}"))
            }
        }
    }
}

/// Splits axum's `"...target type: <path>: <reason>"` into the offending
/// field and the reason. Root-level errors carry no path.
fn offending_field(text: &str) -> Option<(String, String)> {
    let (_, detail) = text.split_once("target type: ")?;
    let (path, reason) = detail.split_once(": ")?;
    (!path.is_empty() && !path.contains(' ')).then(|| (path.to_string(), reason.to_string()))
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        let text = rejection.body_text();
        let (field, msg) = match &rejection {
            JsonRejection::JsonDataError(_) => offending_field(&text),
            _ => None,
        }
        .unwrap_or_else(|| ("body".to_string(), text));
        debug!(%field, %msg, "rejected request body");
        AppError::Validation(vec![FieldError::new(field, msg)])
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        let msg = rejection.body_text();
        debug!(%msg, "rejected query string");
        AppError::invalid("query", msg)
    }
}

/// Path ids that do not parse are treated like ids that do not exist.
pub fn parse_id(raw: &str, what: &str) -> Result<uuid::Uuid, AppError> {
    uuid::Uuid::parse_str(raw.trim()).map_err(|_| AppError::NotFound(format!("{what} not found")))
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), 4096)
            .await
            .expect("read body");
        (status, serde_json::from_slice(&bytes).expect("json body"))
    }

    #[tokio::test]
    async fn validation_lists_every_field() {
        let (status, body) = body_json(AppError::Validation(vec![
            FieldError::new("title", "Title is required"),
            FieldError::new("paymentTxId", "Payment transaction ID is required"),
        ]))
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"][0]["field"], "title");
        assert_eq!(body["errors"][1]["field"], "paymentTxId");
    }

    #[tokio::test]
    async fn internal_errors_do_not_leak_details() {
        let (status, body) =
            body_json(AppError::Internal(anyhow::anyhow!("password=hunter2"))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["msg"], "Server Error");
    }

    #[test]
    fn taxonomy_maps_to_conventional_codes() {
        assert_eq!(AppError::Forbidden("no".into()).status(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::Conflict("dup".into()).status(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::Unauthenticated("who".into()).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AppError::NotFound("gone".into()).status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn store_errors_translate() {
        assert!(matches!(
            AppError::from(StoreError::Conflict("applications_job_applicant_key".into())),
            AppError::Conflict(_)
        ));
        assert!(matches!(AppError::from(StoreError::NotFound), AppError::NotFound(_)));
        assert!(matches!(
            AppError::from(StoreError::Unavailable("down".into())),
            AppError::Internal(_)
        ));
    }

    #[test]
    fn field_is_read_from_deserializer_message() {
        assert_eq!(
            offending_field(
                "Failed to deserialize the JSON body into the target type: salary.min: \
                 invalid type: string \"a\", expected f64 at line 1 column 20"
            ),
            Some((
                "salary.min".to_string(),
                "invalid type: string \"a\", expected f64 at line 1 column 20".to_string()
            ))
        );
        assert_eq!(
            offending_field(
                "Failed to deserialize the JSON body into the target type: invalid type: \
                 integer `1`, expected struct X at line 1 column 1"
            ),
            None
        );
    }

    #[test]
    fn malformed_ids_are_not_found() {
        assert!(matches!(parse_id("not-a-uuid", "Job"), Err(AppError::NotFound(_))));
        assert!(parse_id(&uuid::Uuid::new_v4().to_string(), "Job").is_ok());
    }
}
