use std::fmt::Display;

use chrono::NaiveDateTime;
use diesel::prelude::*;
use roster_common::{params::NewUser, views::User};

use crate::schema::users;

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DbUser {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Display for DbUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "DbUser {{ id: {}, name: {}, email: {} }}",
            self.id, self.name, self.email
        )
    }
}

impl From<DbUser> for User {
    fn from(value: DbUser) -> Self {
        Self {
            id: value.id,
            name: value.name,
            email: value.email,
            created_at: value.created_at.and_utc(),
            updated_at: value.updated_at.and_utc(),
        }
    }
}

/// Row inserted by [`crate::storage::UserStore::create`]. Timestamps are
/// stamped by the server, the id is left to the database.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub struct NewDbUser {
    pub name: String,
    pub email: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl NewDbUser {
    pub fn stamped(user: NewUser, now: NaiveDateTime) -> Self {
        Self {
            name: user.name,
            email: user.email,
            created_at: now,
            updated_at: now,
        }
    }
}
