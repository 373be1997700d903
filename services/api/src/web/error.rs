//! services/api/src/web/error.rs
//!
//! The request-level error taxonomy. Every handler returns this type on
//! failure; `IntoResponse` maps each variant to its status code and a JSON
//! body. Authorization denials are always distinct from not-found, and
//! internal details are logged server-side, never sent to the caller.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;
use utoipa::ToSchema;
use welcomebook_core::authz::Forbidden;
use welcomebook_core::ports::PortError;
use welcomebook_core::sections::{FieldError, ValidationError};

/// The JSON error body shape for all failed requests.
#[derive(Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
    /// Field-attributed validation failures, when applicable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldErrorBody>>,
}

#[derive(Serialize, ToSchema)]
pub struct FieldErrorBody {
    pub field: String,
    pub message: String,
}

impl From<FieldError> for FieldErrorBody {
    fn from(e: FieldError) -> Self {
        Self {
            field: e.field,
            message: e.message,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("authentication required")]
    Unauthenticated,
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    BadRequest(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{0}")]
    Conflict(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<PortError> for RequestError {
    fn from(e: PortError) -> Self {
        match e {
            PortError::NotFound(msg) => RequestError::NotFound(msg),
            PortError::Conflict(msg) => RequestError::Conflict(msg),
            PortError::Unexpected(msg) => RequestError::Internal(msg),
        }
    }
}

impl From<Forbidden> for RequestError {
    fn from(e: Forbidden) -> Self {
        RequestError::Forbidden(e.0)
    }
}

impl IntoResponse for RequestError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            RequestError::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    error: "Authentication required".to_string(),
                    details: None,
                },
            ),
            RequestError::Forbidden(msg) => (
                StatusCode::FORBIDDEN,
                ErrorBody {
                    error: msg,
                    details: None,
                },
            ),
            RequestError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    error: msg,
                    details: None,
                },
            ),
            RequestError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error: msg,
                    details: None,
                },
            ),
            RequestError::Validation(err) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error: "Invalid section data".to_string(),
                    details: Some(err.errors.into_iter().map(Into::into).collect()),
                },
            ),
            RequestError::Conflict(msg) => (
                StatusCode::CONFLICT,
                ErrorBody {
                    error: msg,
                    details: None,
                },
            ),
            RequestError::Internal(detail) => {
                error!("internal error: {detail}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        error: "Internal server error".to_string(),
                        details: None,
                    },
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use welcomebook_core::sections::FieldError;

    #[test]
    fn statuses_follow_the_taxonomy() {
        assert_eq!(
            RequestError::Unauthenticated.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            RequestError::Forbidden("no".into()).into_response().status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            RequestError::NotFound("gone".into()).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            RequestError::Conflict("dup".into()).into_response().status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            RequestError::Internal("boom".into()).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn validation_failures_are_bad_requests() {
        let err = RequestError::Validation(ValidationError {
            errors: vec![FieldError {
                field: "networkName".to_string(),
                message: "is required".to_string(),
            }],
        });
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn port_not_found_and_conflict_map_through() {
        let nf: RequestError = PortError::NotFound("x".into()).into();
        assert!(matches!(nf, RequestError::NotFound(_)));
        let conflict: RequestError = PortError::Conflict("x".into()).into();
        assert!(matches!(conflict, RequestError::Conflict(_)));
    }
}
