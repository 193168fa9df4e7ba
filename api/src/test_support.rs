use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use async_trait::async_trait;
use clap::Parser;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use roster_common::params::NewUser;
use roster_db::{
    models::DbUser,
    storage::{Storage, StoreError, UserStore, sqlite::SqliteStorage},
};
use serde_json::Value;
use tower::ServiceExt;

use crate::{config::RosterApiConfig, context::ApiContext, server};

/// A router backed by a fresh in-memory database.
pub async fn app() -> Router {
    let storage = SqliteStorage::in_memory().await.unwrap();
    app_with(Arc::new(storage))
}

pub fn app_with(db: Arc<dyn Storage>) -> Router {
    let config = RosterApiConfig::parse_from(["roster-api"]);
    server::make(ApiContext::new(config, db)).unwrap()
}

/// A store whose every operation fails, as if the schema had never been
/// migrated.
pub struct BrokenStorage;

pub const BROKEN_STORAGE_CAUSE: &str = "no such table: users";

fn broken() -> StoreError {
    StoreError::Query(DieselError::DatabaseError(
        DatabaseErrorKind::Unknown,
        Box::new(BROKEN_STORAGE_CAUSE.to_string()),
    ))
}

#[async_trait]
impl Storage for BrokenStorage {
    async fn ping(&self) -> Result<(), StoreError> {
        Err(broken())
    }

    async fn migrate(&self) -> Result<usize, StoreError> {
        Err(broken())
    }
}

#[async_trait]
impl UserStore for BrokenStorage {
    async fn list(&self) -> Result<Vec<DbUser>, StoreError> {
        Err(broken())
    }

    async fn get(&self, _id: i64) -> Result<Option<DbUser>, StoreError> {
        Err(broken())
    }

    async fn create(&self, _user: NewUser) -> Result<DbUser, StoreError> {
        Err(broken())
    }
}

pub async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

pub async fn get(router: &Router, uri: &str) -> (StatusCode, Value) {
    request(router, Method::GET, uri).await
}

/// Send a bodiless request with any method.
pub async fn request(router: &Router, method: Method, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(router, request).await
}

pub async fn post_json(router: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    post_raw(router, uri, body.to_string()).await
}

pub async fn post_raw(router: &Router, uri: &str, body: impl Into<Body>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap();
    send(router, request).await
}
