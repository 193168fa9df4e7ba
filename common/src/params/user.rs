use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::ValidateEmail;

use crate::validation::{FieldError, ValidationErrors};

/// Longest accepted user name, in characters.
pub const MAX_NAME_LENGTH: usize = 100;

/// Request body for creating a user.
///
/// Both fields are optional at the wire level so that a missing key is
/// reported as a validation error instead of a body parse failure. Call
/// [`CreateUserParams::validate`] to obtain a [`NewUser`].
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct CreateUserParams {
    /// The user's name. Required, at most 100 characters.
    pub name: Option<String>,

    /// The user's email address. Must be unique across all users.
    pub email: Option<String>,
}

impl CreateUserParams {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            email: Some(email.into()),
        }
    }

    /// Check every field and either produce a typed [`NewUser`] or the list of
    /// every field that was rejected. Values are not normalised.
    pub fn validate(self) -> Result<NewUser, ValidationErrors> {
        let mut errors = Vec::new();

        match self.name.as_deref() {
            None | Some("") => errors.push(FieldError::new("name", "Name is required")),
            Some(name) if name.chars().count() > MAX_NAME_LENGTH => {
                errors.push(FieldError::new("name", "Name too long"))
            }
            Some(_) => {}
        }

        match self.email.as_deref() {
            Some(email) if email.validate_email() => {}
            _ => errors.push(FieldError::new("email", "Invalid email address")),
        }

        ValidationErrors::check(errors, || NewUser {
            name: self.name.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
        })
    }
}

/// A user record that passed validation and is ready to be persisted. The
/// store assigns the id and timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
}

/// Resolves a user id from a path segment.
pub struct UserId;

impl UserId {
    /// Coerce `raw` to a positive integer id.
    ///
    /// Anything that reads as a finite number is accepted as long as it is
    /// integral and greater than zero, so `"7"`, `" 7 "`, `"7.0"` and `"7e0"`
    /// all resolve to `7`. The empty string reads as zero. Only decimal
    /// notation is understood: `"0x10"` and other radix prefixes are rejected
    /// as not a number. Positive values past `i64::MAX` are out of range.
    pub fn parse(raw: &str) -> Result<i64, FieldError> {
        let raw = raw.trim();

        if raw.is_empty() {
            return Err(Self::error("must be positive"));
        }

        if let Ok(id) = raw.parse::<i64>() {
            return Self::positive(id);
        }

        let value = match raw.parse::<f64>() {
            Ok(v) if v.is_finite() => v,
            _ => return Err(Self::error("expected a number")),
        };

        if value.fract() != 0.0 {
            return Err(Self::error("expected an integer"));
        }
        if value <= 0.0 {
            return Err(Self::error("must be positive"));
        }
        if value >= i64::MAX as f64 {
            return Err(Self::error("out of range"));
        }

        Self::positive(value as i64)
    }

    fn positive(id: i64) -> Result<i64, FieldError> {
        if id > 0 {
            Ok(id)
        } else {
            Err(Self::error("must be positive"))
        }
    }

    fn error(reason: &str) -> FieldError {
        FieldError::new("id", format!("Invalid id: {reason}"))
    }
}
