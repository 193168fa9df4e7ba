use async_trait::async_trait;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_async::pooled_connection::PoolError;
use roster_common::params::NewUser;
use thiserror::Error;

use crate::models::DbUser;

pub mod sqlite;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A `UNIQUE` constraint rejected the write. `field` is the offending
    /// column.
    #[error("Unique constraint violated on {field}")]
    UniqueViolation { field: String },

    #[error("Query Error: {0}")]
    Query(DieselError),

    #[error("Connection Error: {0}")]
    Pool(#[from] bb8::RunError<PoolError>),

    #[error("Failed to open database: {0}")]
    Connect(#[from] PoolError),
}

impl From<DieselError> for StoreError {
    fn from(err: DieselError) -> Self {
        if let DieselError::DatabaseError(kind, info) = &err {
            if matches!(kind, DatabaseErrorKind::UniqueViolation)
                || info.message().starts_with("UNIQUE constraint failed")
            {
                let field = info
                    .column_name()
                    .map(str::to_owned)
                    .or_else(|| unique_column(info.message()))
                    .unwrap_or_else(|| "unknown".into());
                return Self::UniqueViolation { field };
            }
        }

        Self::Query(err)
    }
}

/// SQLite reports unique failures as `UNIQUE constraint failed: users.email`.
fn unique_column(message: &str) -> Option<String> {
    let (_, columns) = message.split_once(':')?;
    let first = columns.split(',').next()?.trim();
    let column = first.rsplit('.').next()?;
    (!column.is_empty()).then(|| column.to_owned())
}

#[async_trait]
pub trait Storage: UserStore + Send + Sync + 'static {
    async fn ping(&self) -> Result<(), StoreError>;

    /// Apply every embedded migration not yet recorded in the database and
    /// return how many ran.
    async fn migrate(&self) -> Result<usize, StoreError>;
}

#[async_trait]
pub trait UserStore {
    /// Every user in insertion order.
    async fn list(&self) -> Result<Vec<DbUser>, StoreError>;

    /// The user with the given id. Absence is `Ok(None)`, not an error.
    async fn get(&self, id: i64) -> Result<Option<DbUser>, StoreError>;

    /// Insert a validated user and return the stored row, id and timestamps
    /// included. Fails with [`StoreError::UniqueViolation`] when the email is
    /// already taken.
    async fn create(&self, user: NewUser) -> Result<DbUser, StoreError>;
}
