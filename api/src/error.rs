use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::IntoResponse,
};
use roster_common::{
    validation::{FieldError, ValidationErrors},
    views::ApiResponse,
};
use roster_db::storage::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Invalid request body: {0}")]
    InvalidBody(#[from] JsonRejection),

    #[error("Invalid path: {0}")]
    InvalidPath(#[from] PathRejection),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Conflict(String),

    #[error("Failed to {action}: {source}")]
    Storage {
        action: &'static str,
        source: StoreError,
    },
}

impl ApiError {
    pub fn not_found(resource: &'static str) -> Self {
        Self::NotFound(resource)
    }

    /// Wrap a store failure that happened while trying to `action`.
    /// `action` ends up in the client-facing message, so keep it short, e.g.
    /// `"fetch users"`.
    pub fn storage(action: &'static str, source: StoreError) -> Self {
        Self::Storage { action, source }
    }

    /// Like [`ApiError::storage`], but a unique constraint failure becomes a
    /// conflict naming the `resource` and the clashing field.
    pub fn from_write(action: &'static str, resource: &'static str, source: StoreError) -> Self {
        match source {
            StoreError::UniqueViolation { field } => {
                Self::Conflict(format!("A {resource} with this {field} already exists"))
            }
            source => Self::storage(action, source),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::InvalidBody(_) | Self::InvalidPath(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The message shown to the client. Store failures never leak their
    /// cause here; it is only logged.
    pub fn client_message(&self) -> String {
        match self {
            Self::Validation(errs) => errs.to_string(),
            Self::InvalidBody(rejection) => {
                format!("Invalid request body: {}", rejection.body_text())
            }
            Self::InvalidPath(rejection) => format!("Invalid path: {}", rejection.body_text()),
            Self::NotFound(resource) => format!("{resource} not found"),
            Self::Conflict(message) => message.clone(),
            Self::Storage { action, .. } => format!("Failed to {action}"),
        }
    }
}

impl From<FieldError> for ApiError {
    fn from(err: FieldError) -> Self {
        Self::Validation(err.into())
    }
}

impl From<ApiError> for ApiResponse<()> {
    fn from(err: ApiError) -> Self {
        ApiResponse::failure(err.client_message())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status_code = self.status_code();

        if status_code.is_server_error() {
            tracing::error!(error = ?self, "Error returned by handler: {self}");
        } else {
            tracing::warn!("Request rejected: {self}");
        }

        (status_code, ApiResponse::<()>::from(self)).into_response()
    }
}
