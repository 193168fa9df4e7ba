use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use diesel::{ConnectionError, ExpressionMethods, OptionalExtension, QueryDsl, SelectableHelper};
use diesel::result::Error as DieselError;
use diesel::sqlite::SqliteConnection;
use diesel_async::{
    AsyncConnection, RunQueryDsl, SimpleAsyncConnection,
    pooled_connection::{AsyncDieselConnectionManager, ManagerConfig},
    sync_connection_wrapper::SyncConnectionWrapper,
};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use futures::future::BoxFuture;
use roster_common::params::NewUser;
use tracing::{debug, info};

use crate::{
    models::{DbUser, NewDbUser},
    schema::users,
    storage::{Storage, StoreError, UserStore},
};

pub type SqliteConn = SyncConnectionWrapper<SqliteConnection>;
type SqlitePool = bb8::Pool<AsyncDieselConnectionManager<SqliteConn>>;

/// Schema migrations from `db/migrations`, applied by [`Storage::migrate`].
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

const CONNECTION_SETUP: &str = "PRAGMA busy_timeout = 5000; PRAGMA foreign_keys = ON;";

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLite-backed [`Storage`].
///
/// Every operation checks a connection out of the pool for the duration of a
/// single statement. In-memory databases only exist for as long as their
/// connection does, so they are served from one connection that the pool
/// never retires.
#[derive(Clone)]
pub struct SqliteStorage {
    pool: SqlitePool,
}

impl std::fmt::Debug for SqliteStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStorage")
            .field("pool", &self.pool.state())
            .finish()
    }
}

impl SqliteStorage {
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let mut config = ManagerConfig::default();
        config.custom_setup = Box::new(establish_connection);
        let manager =
            AsyncDieselConnectionManager::<SqliteConn>::new_with_config(database_url, config);

        let builder = SqlitePool::builder().connection_timeout(BUSY_TIMEOUT);
        let builder = if is_in_memory(database_url) {
            builder.max_size(1).idle_timeout(None).max_lifetime(None)
        } else {
            builder.max_size(max_connections.max(1))
        };

        let pool = builder.build(manager).await?;
        debug!(database_url, "Opened SQLite connection pool");

        Ok(Self { pool })
    }

    /// Open an empty, fully migrated in-memory database.
    pub async fn in_memory() -> Result<Self, StoreError> {
        let storage = Self::connect(":memory:", 1).await?;
        storage.migrate().await?;
        Ok(storage)
    }
}

fn establish_connection(url: &str) -> BoxFuture<'_, diesel::ConnectionResult<SqliteConn>> {
    Box::pin(async move {
        let mut conn = SqliteConn::establish(url).await?;
        conn.batch_execute(CONNECTION_SETUP)
            .await
            .map_err(ConnectionError::CouldntSetupConfiguration)?;
        Ok(conn)
    })
}

fn is_in_memory(database_url: &str) -> bool {
    database_url == ":memory:"
        || database_url.starts_with("file::memory:")
        || database_url.contains("mode=memory")
}

#[async_trait]
impl Storage for SqliteStorage {
    async fn ping(&self) -> Result<(), StoreError> {
        let mut conn = self.pool.get().await?;
        conn.batch_execute("SELECT 1").await?;
        Ok(())
    }

    async fn migrate(&self) -> Result<usize, StoreError> {
        let mut conn = self.pool.get().await?;

        // The harness is synchronous, so it runs on the wrapper's blocking
        // thread rather than on the async runtime.
        let applied = conn
            .spawn_blocking(|conn: &mut SqliteConnection| {
                conn.run_pending_migrations(MIGRATIONS)
                    .map(|versions| versions.iter().map(ToString::to_string).collect::<Vec<_>>())
                    .map_err(DieselError::QueryBuilderError)
            })
            .await?;

        for version in &applied {
            info!(version, "Applied migration");
        }

        Ok(applied.len())
    }
}

#[async_trait]
impl UserStore for SqliteStorage {
    async fn list(&self) -> Result<Vec<DbUser>, StoreError> {
        let mut conn = self.pool.get().await?;

        let users = users::table
            .order(users::id.asc())
            .select(DbUser::as_select())
            .load(&mut *conn)
            .await?;

        Ok(users)
    }

    async fn get(&self, id: i64) -> Result<Option<DbUser>, StoreError> {
        let mut conn = self.pool.get().await?;

        let user = users::table
            .find(id)
            .select(DbUser::as_select())
            .first(&mut *conn)
            .await
            .optional()?;

        Ok(user)
    }

    async fn create(&self, user: NewUser) -> Result<DbUser, StoreError> {
        let mut conn = self.pool.get().await?;
        let row = NewDbUser::stamped(user, Utc::now().naive_utc());

        let created = diesel::insert_into(users::table)
            .values(row)
            .returning(DbUser::as_returning())
            .get_result(&mut *conn)
            .await?;

        debug!(user = %created, "Inserted user");
        Ok(created)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn new_user(name: &str, email: &str) -> NewUser {
        NewUser {
            name: name.into(),
            email: email.into(),
        }
    }

    #[tokio::test]
    async fn empty_store_lists_nothing() {
        let stg = SqliteStorage::in_memory().await.unwrap();
        assert!(stg.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_assigns_increasing_ids_and_timestamps() {
        let stg = SqliteStorage::in_memory().await.unwrap();

        let alice = stg.create(new_user("Alice", "alice@example.com")).await.unwrap();
        let bob = stg.create(new_user("Bob", "bob@example.com")).await.unwrap();

        assert!(alice.id > 0);
        assert!(bob.id > alice.id);
        assert_eq!(alice.name, "Alice");
        assert_eq!(alice.email, "alice@example.com");
        assert_eq!(alice.created_at, alice.updated_at);
    }

    #[tokio::test]
    async fn list_returns_insertion_order() {
        let stg = SqliteStorage::in_memory().await.unwrap();
        for (name, email) in [("C", "c@example.com"), ("A", "a@example.com"), ("B", "b@example.com")] {
            stg.create(new_user(name, email)).await.unwrap();
        }

        let names: Vec<_> = stg.list().await.unwrap().into_iter().map(|u| u.name).collect();
        assert_eq!(names, vec!["C", "A", "B"]);
    }

    #[tokio::test]
    async fn get_round_trips_created_user() {
        let stg = SqliteStorage::in_memory().await.unwrap();
        let created = stg.create(new_user("Alice", "alice@example.com")).await.unwrap();

        let fetched = stg.get(created.id).await.unwrap();
        assert_eq!(fetched, Some(created));
    }

    #[tokio::test]
    async fn get_missing_is_none() {
        let stg = SqliteStorage::in_memory().await.unwrap();
        assert_eq!(stg.get(999).await.unwrap(), None);
    }

    #[tokio::test]
    async fn duplicate_email_is_unique_violation() {
        let stg = SqliteStorage::in_memory().await.unwrap();
        stg.create(new_user("Alice", "alice@example.com")).await.unwrap();

        let err = stg
            .create(new_user("Other Alice", "alice@example.com"))
            .await
            .unwrap_err();

        match err {
            StoreError::UniqueViolation { field } => assert_eq!(field, "email"),
            other => panic!("expected unique violation, got {other:?}"),
        }
        assert_eq!(stg.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn migrate_is_idempotent() {
        let stg = SqliteStorage::in_memory().await.unwrap();
        assert_eq!(stg.migrate().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn migrate_applies_embedded_migrations_once() {
        let stg = SqliteStorage::connect(":memory:", 1).await.unwrap();

        assert_eq!(stg.migrate().await.unwrap(), 1);
        assert_eq!(stg.migrate().await.unwrap(), 0);
        assert!(stg.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn ping_succeeds() {
        let stg = SqliteStorage::in_memory().await.unwrap();
        stg.ping().await.unwrap();
    }

    #[test]
    fn memory_urls_are_detected() {
        assert!(is_in_memory(":memory:"));
        assert!(is_in_memory("file::memory:?cache=shared"));
        assert!(is_in_memory("file:roster?mode=memory"));
        assert!(!is_in_memory("roster.db"));
    }
}
