use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};
use roster_common::{
    params::{CreateUserParams, UserId},
    views::{ApiResponse, User},
};
use tracing::info;

use crate::{context::ApiContext, error::ApiError};


#[utoipa::path(
    get,
    path = "/users",
    tags = ["users"],
    responses((status = 200, description = "Every user, oldest first", body = ApiResponse<Vec<User>>))
)]
pub async fn list_users(State(ctx): State<ApiContext>) -> Result<ApiResponse<Vec<User>>, ApiError> {
    let users: Vec<User> = ctx
        .db
        .list()
        .await
        .map_err(|e| ApiError::storage("fetch users", e))?
        .into_iter()
        .map(Into::into)
        .collect();

    let message = format!("Retrieved {} users", users.len());
    Ok(ApiResponse::ok(users).with_message(message))
}

#[utoipa::path(
    get,
    path = "/users/{id}",
    tags = ["users"],
    params(("id" = i64, Path, description = "Positive user id")),
    responses(
        (status = 200, description = "Resolved user", body = ApiResponse<User>),
        (status = 400, description = "The id is not a positive integer"),
        (status = 404, description = "No user has this id"),
    )
)]
pub async fn get_user(
    State(ctx): State<ApiContext>,
    path: Result<Path<String>, PathRejection>,
) -> Result<ApiResponse<User>, ApiError> {
    let Path(id) = path?;
    let id = UserId::parse(&id)?;

    let user = ctx
        .db
        .get(id)
        .await
        .map_err(|e| ApiError::storage("fetch user", e))?
        .ok_or(ApiError::not_found("User"))?;

    Ok(ApiResponse::ok(user.into()))
}

#[utoipa::path(
    post,
    path = "/users",
    tags = ["users"],
    request_body(content = CreateUserParams, content_type = "application/json"),
    responses(
        (status = 201, description = "User created", body = ApiResponse<User>),
        (status = 400, description = "The body failed validation"),
        (status = 409, description = "A user with this email already exists"),
    )
)]
pub async fn create_user(
    State(ctx): State<ApiContext>,
    body: Result<Json<CreateUserParams>, JsonRejection>,
) -> Result<(StatusCode, ApiResponse<User>), ApiError> {
    let Json(params) = body?;
    let new_user = params.validate()?;

    let created = ctx
        .db
        .create(new_user)
        .await
        .map_err(|e| ApiError::from_write("create user", "user", e))?;

    info!(user_id = created.id, "Created user");

    Ok((
        StatusCode::CREATED,
        ApiResponse::ok(created.into()).with_message("User created successfully"),
    ))
}
