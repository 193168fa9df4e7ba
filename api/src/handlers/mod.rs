use axum::{
    Json,
    extract::State,
    http::{Method, StatusCode, Uri},
    response::IntoResponse,
};
use chrono::Utc;
use roster_common::views::{ApiResponse, Greeting, HealthStatus};

use crate::{context::ApiContext, error::ApiError};

pub mod users;


#[utoipa::path(
    get,
    path = "/",
    tags = ["health"],
    responses((status = 200, description = "Service and database are reachable", body = HealthStatus))
)]
pub async fn health_check(State(ctx): State<ApiContext>) -> Result<Json<HealthStatus>, ApiError> {
    ctx.db
        .ping()
        .await
        .map_err(|e| ApiError::storage("reach database", e))?;

    Ok(Json(HealthStatus {
        message: "Roster API".into(),
        status: "healthy".into(),
        timestamp: Utc::now(),
    }))
}

#[utoipa::path(
    get,
    path = "/hello",
    tags = ["hello"],
    responses((status = 200, description = "Static greeting", body = ApiResponse<Greeting>))
)]
pub async fn hello() -> ApiResponse<Greeting> {
    ApiResponse::ok(Greeting {
        greeting: "Hello from Roster!".into(),
    })
    .with_message("API is working correctly")
}

/// Fallback for unmatched routes.
pub async fn not_found(uri: Uri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        ApiResponse::<()>::failure("Not Found").with_message(format!("No route for {}", uri.path())),
    )
}

/// Fallback for known routes called with a method they don't serve.
pub async fn method_not_allowed(method: Method, uri: Uri) -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        ApiResponse::<()>::failure("Method Not Allowed")
            .with_message(format!("{method} is not supported on {}", uri.path())),
    )
}
