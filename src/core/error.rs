use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde::Serialize;
use std::fmt;

/// Application-wide Result type
pub type Result<T> = std::result::Result<T, AppError>;

/// A validation failure scoped to one settings field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Main application error type
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// Malformed input from the host or an inbound callback
    #[error("Validation error: {0}")]
    Validation(String),

    /// Gateway settings rejected at save time
    #[error("Invalid gateway settings: {}", join_fields(.0))]
    ConfigInvalid(Vec<FieldError>),

    /// Transport failure or unexpected HTTP status from the processor
    #[error("Verification endpoint unreachable: {0}")]
    VerificationUnreachable(String),

    /// Processor answered, but not with the expected JSON shape
    #[error("Malformed verification response: {0}")]
    VerificationMalformedResponse(String),

    /// Processor returned an explicit error payload
    #[error("Processor declined: {0}")]
    ProcessorDeclined(String),

    /// Operation the processor integration does not offer
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal server errors
    #[error("Internal error: {0}")]
    Internal(String),
}

fn join_fields(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();
        let error_message = self.to_string();

        let body = match self {
            AppError::ConfigInvalid(fields) => serde_json::json!({
                "error": {
                    "message": error_message,
                    "code": status_code.as_u16(),
                    "fields": fields,
                }
            }),
            _ => serde_json::json!({
                "error": {
                    "message": error_message,
                    "code": status_code.as_u16(),
                }
            }),
        };

        HttpResponse::build(status_code).json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::ConfigInvalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::VerificationUnreachable(_) => StatusCode::BAD_GATEWAY,
            AppError::VerificationMalformedResponse(_) => StatusCode::BAD_GATEWAY,
            AppError::ProcessorDeclined(_) => StatusCode::BAD_GATEWAY,
            AppError::UnsupportedOperation(_) => StatusCode::NOT_IMPLEMENTED,
            AppError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// Helper functions for common error scenarios
impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn unreachable(msg: impl Into<String>) -> Self {
        AppError::VerificationUnreachable(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        AppError::VerificationMalformedResponse(msg.into())
    }

    pub fn unsupported(operation: impl Into<String>) -> Self {
        AppError::UnsupportedOperation(operation.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }

    /// True for failures of the processor round trip itself. These are
    /// reported to the host as a declined transaction rather than a fault.
    pub fn is_verification_failure(&self) -> bool {
        matches!(
            self,
            AppError::VerificationUnreachable(_)
                | AppError::VerificationMalformedResponse(_)
                | AppError::ProcessorDeclined(_)
        )
    }
}
