// src/handlers/auth.rs

use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use validator::Validate;

use crate::{
    error::AppError,
    models::user::{LoginRequest, MessageResponse, RegisterRequest, TokenResponse},
    services::IdentityService,
    utils::jwt::Claims,
};

/// Registers a new user account.
///
/// Hashes the password using Argon2 before storing it.
/// Returns 201 Created with the new user's id and a bearer token.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = TokenResponse),
        (status = 400, description = "Malformed username, email or password"),
        (status = 409, description = "Username or email already registered")
    ),
    tag = "auth"
)]
pub async fn register(
    State(identity): State<IdentityService>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let outcome = identity
        .register(&payload.username, &payload.email, &payload.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(TokenResponse::bearer(outcome.user_id, outcome.token)),
    ))
}

/// Authenticates a user and returns a fresh bearer token.
///
/// Missing account, deactivated account and wrong password all answer with
/// the same 401.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = TokenResponse),
        (status = 400, description = "Malformed request"),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "auth"
)]
pub async fn login(
    State(identity): State<IdentityService>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let outcome = identity
        .authenticate(&payload.username, &payload.password)
        .await?;

    Ok(Json(TokenResponse::bearer(outcome.user_id, outcome.token)))
}

/// Deactivates the authenticated user's account.
///
/// The account keeps its row but can no longer authenticate; deactivating
/// twice is an error.
#[utoipa::path(
    delete,
    path = "/api/auth/deactivate",
    responses(
        (status = 200, description = "Account deactivated", body = MessageResponse),
        (status = 401, description = "Missing or invalid token, or account already inactive")
    ),
    security(("bearer_token" = [])),
    tag = "auth"
)]
pub async fn deactivate(
    State(identity): State<IdentityService>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    identity.deactivate(&claims.sub).await?;

    Ok(Json(MessageResponse {
        message: format!("User {} has been deactivated", claims.sub),
    }))
}
