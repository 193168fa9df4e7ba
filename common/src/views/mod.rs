//! Output views for the various functions within roster.

use serde::{Deserialize, Deserializer, Serialize, de::Error as _};
use utoipa::ToSchema;

mod health;
pub use health::*;

mod user;
pub use user::*;

/// The envelope every API endpoint answers with, successful or not.
///
/// A successful response carries `data` (and possibly a `message`) but never
/// an `error`; a failed one carries an `error` (and possibly a `message`) but
/// never `data`. Fields that are absent are omitted from the JSON entirely.
/// Deserializing a body that breaks either rule fails.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,

    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

#[derive(Deserialize)]
struct ApiResponseWire<T> {
    success: bool,
    data: Option<T>,
    error: Option<String>,
    message: Option<String>,
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for ApiResponse<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = ApiResponseWire::<T>::deserialize(deserializer)?;

        if wire.success && wire.error.is_some() {
            return Err(D::Error::custom("a successful response cannot carry an error"));
        }
        if !wire.success && wire.data.is_some() {
            return Err(D::Error::custom("a failed response cannot carry data"));
        }

        Ok(Self {
            success: wire.success,
            data: wire.data,
            error: wire.error,
            message: wire.message,
        })
    }
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            message: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn into_data(self) -> Option<T> {
        self.data
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

#[cfg(feature = "axum")]
impl<T: Serialize> axum::response::IntoResponse for ApiResponse<T> {
    fn into_response(self) -> axum::response::Response {
        axum::Json(self).into_response()
    }
}
