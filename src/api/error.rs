use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

use crate::api::response::Envelope;
use crate::db::repo::StoreError;

pub const INVALID_PAYLOAD: &str = "Invalid payload";
pub const EMAIL_IN_USE: &str = "Email already in use";
pub const USER_NOT_FOUND: &str = "User does not exist";
pub const INTERNAL_ERROR: &str = "Internal server error";

/// Failures a users handler can answer with. Lookups that miss are reported
/// as `400`, not `404`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid payload")]
    InvalidPayload,
    #[error("email already in use")]
    EmailInUse,
    #[error("user does not exist")]
    UserNotFound,
    #[error("store failure: {0}")]
    Store(#[source] StoreError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidPayload | ApiError::EmailInUse | ApiError::UserNotFound => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> &'static str {
        match self {
            ApiError::InvalidPayload => INVALID_PAYLOAD,
            ApiError::EmailInUse => EMAIL_IN_USE,
            ApiError::UserNotFound => USER_NOT_FOUND,
            ApiError::Store(_) => INTERNAL_ERROR,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            // The insert lost a race against the email pre-check, or hit the
            // username index.
            StoreError::ConstraintViolation(_) => ApiError::InvalidPayload,
            other => ApiError::Store(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Store(err) = &self {
            error!(error = %err, "user store failure");
        }
        (self.status_code(), Json(Envelope::fail(self.message()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraint_violation_becomes_invalid_payload() {
        let err = ApiError::from(StoreError::ConstraintViolation("users.email".into()));
        assert!(matches!(err, ApiError::InvalidPayload));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_database_error_becomes_internal() {
        let err = ApiError::from(StoreError::Database(sqlx::Error::PoolTimedOut));
        assert!(matches!(err, ApiError::Store(_)));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), INTERNAL_ERROR);
    }

    #[test]
    fn test_not_found_is_bad_request() {
        assert_eq!(ApiError::UserNotFound.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::UserNotFound.message(), USER_NOT_FOUND);
    }
}
