//! # Error Handling
//!
//! [`ApiError`] is what every handler in this crate returns. It maps to an
//! HTTP status code and a sanitized JSON body:
//!
//! - payload missing or unparseable → 400 Bad Request
//! - required field missing → 403 Forbidden (`"cloud.name required"`)
//! - primary key changed by an update → 400 Bad Request
//! - value of the wrong type for a field → 422 Unprocessable Entity
//! - database and other internal failures → 500, details logged only
//!
//! ## Logging
//!
//! Internal errors are logged with `tracing` when the response is built.
//! Nothing is printed unless the application installs a subscriber:
//!
//! ```rust,ignore
//! tracing_subscriber::fmt()
//!     .with_target(false)
//!     .compact()
//!     .init();
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde::Serialize;
use std::fmt;
use utoipa::ToSchema;

use crate::serialization::SerializationError;
use crate::verification::VerificationError;

/// API error type with automatic logging and sanitized responses
#[derive(Debug)]
pub enum ApiError {
    /// 404 Not Found
    NotFound {
        /// Resource type (e.g., "cloud")
        resource: String,
        id: Option<String>,
    },

    /// 400 Bad Request
    BadRequest { message: String },

    /// 403 Forbidden - also used for a missing required field
    Forbidden { message: String },

    /// 422 Unprocessable Entity
    ValidationFailed { errors: Vec<String> },

    /// 500 Internal Server Error - details logged, not exposed
    Database { message: String, internal: DbErr },

    /// 500 Internal Server Error
    Internal {
        message: String,
        internal: Option<String>,
    },

    /// Any other status, e.g. 413 from the body length limit
    Custom {
        status: StatusCode,
        message: String,
        internal: Option<String>,
    },
}

impl ApiError {
    pub fn not_found(resource: impl Into<String>, id: Option<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn validation_failed(errors: Vec<String>) -> Self {
        Self::ValidationFailed { errors }
    }

    /// The database error is logged but never sent to the client.
    ///
    /// ```rust,ignore
    /// let cloud = active.insert(db).await.map_err(ApiError::database)?;
    /// ```
    #[must_use]
    pub fn database(err: DbErr) -> Self {
        Self::Database {
            message: "A database error occurred".to_string(),
            internal: err,
        }
    }

    pub fn internal(message: impl Into<String>, internal: Option<String>) -> Self {
        Self::Internal {
            message: message.into(),
            internal,
        }
    }

    pub fn custom(
        status: StatusCode,
        message: impl Into<String>,
        internal: Option<String>,
    ) -> Self {
        Self::Custom {
            status,
            message: message.into(),
            internal,
        }
    }

    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::ValidationFailed { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Database { .. } | Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Custom { status, .. } => *status,
        }
    }

    /// The user-facing (sanitized) message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound { resource, id } => match id {
                Some(id) => format!("{resource} with ID '{id}' not found"),
                None => format!("{resource} not found"),
            },
            Self::ValidationFailed { errors } => {
                if errors.len() == 1 {
                    errors[0].clone()
                } else {
                    format!("Validation failed: {}", errors.join(", "))
                }
            }
            Self::BadRequest { message }
            | Self::Forbidden { message }
            | Self::Database { message, .. }
            | Self::Internal { message, .. }
            | Self::Custom { message, .. } => message.clone(),
        }
    }

    fn log_internal(&self) {
        match self {
            Self::Database { internal, .. } => {
                tracing::error!(error = ?internal, "Database error occurred");
            }
            Self::Internal {
                internal: Some(details),
                ..
            } => {
                tracing::error!(details = %details, "Internal error occurred");
            }
            Self::Custom {
                internal: Some(details),
                status,
                ..
            } => {
                tracing::error!(status = %status, details = %details, "Custom error occurred");
            }
            _ => {
                tracing::debug!(
                    error = %self.user_message(),
                    status = %self.status_code(),
                    "API error"
                );
            }
        }
    }
}

/// Error body sent to clients
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log_internal();

        let status = self.status_code();
        let body = match &self {
            Self::ValidationFailed { errors } => ErrorResponse {
                error: "Validation failed".to_string(),
                details: Some(errors.clone()),
            },
            _ => ErrorResponse {
                error: self.user_message(),
                details: None,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.user_message())
    }
}

impl std::error::Error for ApiError {}

impl From<VerificationError> for ApiError {
    fn from(err: VerificationError) -> Self {
        match &err {
            VerificationError::NoData | VerificationError::KeyChanged(_) => {
                Self::bad_request(err.to_string())
            }
            VerificationError::MissingField(_) => Self::forbidden(err.to_string()),
        }
    }
}

impl From<SerializationError> for ApiError {
    fn from(err: SerializationError) -> Self {
        match &err {
            SerializationError::UnknownField { .. } => Self::bad_request(err.to_string()),
            SerializationError::InvalidValue { .. } => {
                Self::validation_failed(vec![err.to_string()])
            }
            SerializationError::NotAnObject { .. } => {
                Self::internal("Failed to serialize record", Some(err.to_string()))
            }
        }
    }
}

/// `DbErr::RecordNotFound` becomes 404; everything else is a logged 500.
impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        match &err {
            DbErr::RecordNotFound(msg) => {
                let resource = msg.split_whitespace().next().unwrap_or("Resource");
                Self::NotFound {
                    resource: resource.to_string(),
                    id: None,
                }
            }
            _ => Self::database(err),
        }
    }
}
