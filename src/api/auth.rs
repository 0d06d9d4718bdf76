//! Identity API endpoints
//!
//! POST /api/v1/auth/register - Create an account, returns a bearer token
//! POST /api/v1/auth/login    - Exchange credentials for a bearer token

use axum::http::StatusCode;
use axum::routing::post;
use axum::{Extension, Json, Router};
use serde::Deserialize;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;
use utoipa::ToSchema;

use eventide_core::{auth, Tokens, User, UserStore};

use super::ApiResponse;

/// Registration/login request body
#[derive(Debug, Deserialize, ToSchema)]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}

/// Issued bearer token
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    pub token: String,
}

fn validate_credentials(request: &CredentialsRequest) -> Result<(), &'static str> {
    if request.username.trim().is_empty() {
        return Err("username must not be empty");
    }
    if request.password.len() < 8 {
        return Err("password must be at least 8 characters");
    }
    Ok(())
}

/// Register a new account
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "auth",
    request_body = CredentialsRequest,
    responses(
        (status = 201, description = "Account created, token issued", body = TokenResponse),
        (status = 400, description = "Invalid username or password"),
        (status = 409, description = "Username already exists")
    )
)]
pub async fn register(
    Extension(users): Extension<Arc<UserStore>>,
    Extension(tokens): Extension<Arc<Tokens>>,
    Json(request): Json<CredentialsRequest>,
) -> (StatusCode, Json<ApiResponse<TokenResponse>>) {
    if let Err(msg) = validate_credentials(&request) {
        return (StatusCode::BAD_REQUEST, Json(ApiResponse::error(msg)));
    }

    let password_hash = match auth::hash_password(&request.password) {
        Ok(hash) => hash,
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(format!("failed to hash password: {}", e))),
            )
        }
    };

    let user = User::new(request.username.trim(), password_hash);
    match users.create(&user).await {
        Ok(()) => {}
        Err(eventide_core::Error::UsernameTaken(_)) => {
            return (
                StatusCode::CONFLICT,
                Json(ApiResponse::error("Username already exists")),
            )
        }
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(format!("failed to create user: {}", e))),
            )
        }
    }

    info!(username = %user.username, user_id = %user.id, "registered new user");

    match tokens.issue(user.id) {
        Ok(token) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(TokenResponse { token })),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("failed to issue token: {}", e))),
        ),
    }
}

/// Log in with existing credentials
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "auth",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 401, description = "Unknown user or wrong password")
    )
)]
pub async fn login(
    Extension(users): Extension<Arc<UserStore>>,
    Extension(tokens): Extension<Arc<Tokens>>,
    Json(request): Json<CredentialsRequest>,
) -> (StatusCode, Json<ApiResponse<TokenResponse>>) {
    // Unknown user and wrong password are deliberately indistinguishable
    let invalid = || {
        (
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::error("Invalid credentials")),
        )
    };

    let user = match users.find_by_username(request.username.trim()).await {
        Ok(Some(user)) => user,
        Ok(None) => return invalid(),
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(format!("lookup failed: {}", e))),
            )
        }
    };

    match auth::verify_password(&request.password, &user.password_hash) {
        Ok(true) => {}
        Ok(false) => return invalid(),
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(format!("verification failed: {}", e))),
            )
        }
    }

    match tokens.issue(user.id) {
        Ok(token) => (
            StatusCode::OK,
            Json(ApiResponse::success(TokenResponse { token })),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("failed to issue token: {}", e))),
        ),
    }
}

/// Create auth routes
pub fn auth_routes() -> Router {
    Router::new()
        .route("/api/v1/auth/register", post(register))
        .route("/api/v1/auth/login", post(login))
}
