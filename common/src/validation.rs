//! Field-level validation errors produced by the validators in
//! [`crate::params`].

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// A single rejected field and the human-readable reason for rejecting it.
#[derive(Debug, Clone, PartialEq, Eq, Error, Deserialize, Serialize, ToSchema)]
#[error("{field}: {message}")]
pub struct FieldError {
    /// Name of the offending field, as it appears in the request.
    pub field: String,

    /// What is wrong with the value.
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

/// The non-empty, ordered list of field errors returned when an input record
/// fails validation. Fields are reported in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    /// Returns `Ok(value)` when no errors were collected, otherwise the
    /// collected errors.
    pub(crate) fn check<T>(errors: Vec<FieldError>, value: impl FnOnce() -> T) -> Result<T, Self> {
        if errors.is_empty() {
            Ok(value())
        } else {
            Err(Self(errors))
        }
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<FieldError> {
        self.0
    }
}

impl From<FieldError> for ValidationErrors {
    fn from(value: FieldError) -> Self {
        Self(vec![value])
    }
}

impl std::error::Error for ValidationErrors {}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{err}")?;
        }
        Ok(())
    }
}
