use axum::{response::{IntoResponse, Response}, http::StatusCode};
use serde::Serialize;
use tracing::{error, warn};

use crate::repository::repository_error::RepositoryError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HandlerErrorKind {
    RequiredField,
    InvalidEmail,
    InputFormat,
    UniquenessConflict,
    NotFound,
    StoreUnavailable,
    Timeout,
    Internal,
}

impl HandlerErrorKind {
    pub const fn status(self) -> StatusCode {
        match self {
            HandlerErrorKind::RequiredField
            | HandlerErrorKind::InvalidEmail
            | HandlerErrorKind::InputFormat => StatusCode::BAD_REQUEST,
            HandlerErrorKind::UniquenessConflict => StatusCode::CONFLICT,
            HandlerErrorKind::NotFound => StatusCode::NOT_FOUND,
            HandlerErrorKind::StoreUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            HandlerErrorKind::Timeout => StatusCode::REQUEST_TIMEOUT,
            HandlerErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl std::fmt::Display for HandlerErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            HandlerErrorKind::RequiredField => "RequiredField",
            HandlerErrorKind::InvalidEmail => "InvalidEmail",
            HandlerErrorKind::InputFormat => "InputFormat",
            HandlerErrorKind::UniquenessConflict => "UniquenessConflict",
            HandlerErrorKind::NotFound => "NotFound",
            HandlerErrorKind::StoreUnavailable => "StoreUnavailable",
            HandlerErrorKind::Timeout => "Timeout",
            HandlerErrorKind::Internal => "Internal",
        };
        write!(f, "{}", s)
    }
}

/// Error envelope rendered for every failed request.
#[derive(Debug, Serialize)]
pub struct HandlerError {
    pub success: bool,
    pub error: HandlerErrorKind,
    pub message: String,
}

impl HandlerError {
    pub fn new(error: HandlerErrorKind, message: impl Into<String>) -> Self {
        HandlerError {
            success: false,
            error,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for HandlerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for HandlerError {}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        let status = self.error.status();
        if status.is_server_error() {
            error!(kind = %self.error, "{}", self.message);
        } else {
            warn!(kind = %self.error, "{}", self.message);
        }
        let body = axum::Json(self);
        (status, body).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ServiceError {
    #[error("{0} value required")]
    RequiredField(&'static str),

    #[error("email: must be a valid email address")]
    InvalidEmail,

    #[error("Invalid input: {0}")]
    InputFormat(String),

    #[error("A user with this {0} already exists")]
    UniquenessConflict(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Internal Error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn kind(&self) -> HandlerErrorKind {
        match self {
            ServiceError::RequiredField(_) => HandlerErrorKind::RequiredField,
            ServiceError::InvalidEmail => HandlerErrorKind::InvalidEmail,
            ServiceError::InputFormat(_) => HandlerErrorKind::InputFormat,
            ServiceError::UniquenessConflict(_) => HandlerErrorKind::UniquenessConflict,
            ServiceError::NotFound(_) => HandlerErrorKind::NotFound,
            ServiceError::StoreUnavailable(_) => HandlerErrorKind::StoreUnavailable,
            ServiceError::Internal(_) => HandlerErrorKind::Internal,
        }
    }
}

impl From<ServiceError> for HandlerError {
    fn from(err: ServiceError) -> Self {
        HandlerError::new(err.kind(), err.to_string())
    }
}

// Allow conversion from RepositoryError to ServiceError
impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(msg) => ServiceError::NotFound(msg),
            RepositoryError::AlreadyExists(field) => ServiceError::UniquenessConflict(field),
            RepositoryError::ConnectionError(msg) => ServiceError::StoreUnavailable(msg),
            RepositoryError::DatabaseError(msg) => ServiceError::Internal(msg),
            RepositoryError::SerializationError(msg) => ServiceError::Internal(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_table() {
        let cases = [
            (ServiceError::RequiredField("email"), StatusCode::BAD_REQUEST),
            (ServiceError::InvalidEmail, StatusCode::BAD_REQUEST),
            (ServiceError::InputFormat("page".into()), StatusCode::BAD_REQUEST),
            (ServiceError::UniquenessConflict("email".into()), StatusCode::CONFLICT),
            (ServiceError::NotFound("user".into()), StatusCode::NOT_FOUND),
            (ServiceError::StoreUnavailable("down".into()), StatusCode::SERVICE_UNAVAILABLE),
            (ServiceError::Internal("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(err.kind().status(), status, "{err}");
        }
        assert_eq!(HandlerErrorKind::Timeout.status(), StatusCode::REQUEST_TIMEOUT);
    }

    #[test]
    fn test_required_field_message() {
        assert_eq!(
            ServiceError::RequiredField("first_name").to_string(),
            "first_name value required"
        );
    }

    #[test]
    fn test_repository_errors_map_to_taxonomy() {
        assert_eq!(
            ServiceError::from(RepositoryError::already_exists("nickname")),
            ServiceError::UniquenessConflict("nickname".to_string())
        );
        assert!(matches!(
            ServiceError::from(RepositoryError::connection("refused")),
            ServiceError::StoreUnavailable(_)
        ));
        assert!(matches!(
            ServiceError::from(RepositoryError::not_found("gone")),
            ServiceError::NotFound(_)
        ));
    }

    #[test]
    fn test_handler_error_envelope() {
        let err = HandlerError::from(ServiceError::InvalidEmail);
        let body = serde_json::to_value(&err).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "InvalidEmail");
        assert_eq!(body["message"], "email: must be a valid email address");
    }
}
