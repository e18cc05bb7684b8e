//! services/api/src/web/auth.rs
//!
//! Authentication endpoints for registration, login, and profile lookup,
//! plus the health/banner/fallback routes and the master OpenAPI definition.

use axum::{
    extract::State,
    http::{Method, StatusCode, Uri},
    response::IntoResponse,
    Extension, Json,
};
use chrono::Utc;
use movieflix_core::domain::Account;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::{OpenApi, ToSchema};

use crate::web::protocol::{
    AccountBody, ApiFailure, BannerEnvelope, ErrorEnvelope, HealthEnvelope, NotFoundEnvelope,
    ProfileEnvelope, SessionData, SessionEnvelope,
};
use crate::web::state::AppState;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        register_handler,
        login_handler,
        profile_handler,
        health_handler,
    ),
    components(
        schemas(
            RegisterRequest,
            LoginRequest,
            AccountBody,
            SessionData,
            SessionEnvelope,
            ProfileEnvelope,
            HealthEnvelope,
            BannerEnvelope,
            ErrorEnvelope,
            NotFoundEnvelope
        )
    ),
    tags(
        (name = "MovieFlix API", description = "Registration, login and profile endpoints for the movie-browsing client.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// Request Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub username: String,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /api/auth/register - Create a new account and sign it in
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Account created", body = SessionEnvelope),
        (status = 400, description = "Missing or empty field", body = ErrorEnvelope),
        (status = 409, description = "Email already registered", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    )
)]
pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<SessionEnvelope>, ApiFailure> {
    let session = state
        .auth
        .register(&req.email, &req.password, &req.username)
        .await?;
    Ok(Json(SessionEnvelope::new(session)))
}

/// POST /api/auth/login - Login with an existing account
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = SessionEnvelope),
        (status = 401, description = "Invalid credentials", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<SessionEnvelope>, ApiFailure> {
    let session = state.auth.login(&req.email, &req.password).await?;
    Ok(Json(SessionEnvelope::new(session)))
}

/// GET /api/auth/profile - The account behind the presented bearer token
///
/// The `require_auth` middleware has already validated the token and resolved
/// the account by the time this handler runs.
#[utoipa::path(
    get,
    path = "/api/auth/profile",
    responses(
        (status = 200, description = "Current account", body = ProfileEnvelope),
        (status = 401, description = "Missing, invalid or expired token", body = ErrorEnvelope)
    )
)]
pub async fn profile_handler(Extension(account): Extension<Account>) -> Json<ProfileEnvelope> {
    Json(ProfileEnvelope::new(account))
}

/// GET /api/health - Liveness check
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Server is healthy", body = HealthEnvelope)
    )
)]
pub async fn health_handler() -> Json<HealthEnvelope> {
    Json(HealthEnvelope {
        success: true,
        message: "Server is healthy".to_string(),
        timestamp: Utc::now(),
    })
}

/// GET / - API banner
pub async fn root_handler() -> Json<BannerEnvelope> {
    Json(BannerEnvelope {
        success: true,
        message: "MovieFlix API is running!".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
    })
}

/// Answers any unmatched route with the 404 envelope.
pub async fn fallback_handler(method: Method, uri: Uri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(NotFoundEnvelope {
            success: false,
            message: "Route not found".to_string(),
            path: uri.path().to_string(),
            method: method.to_string(),
        }),
    )
}
