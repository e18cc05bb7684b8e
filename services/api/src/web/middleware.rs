//! services/api/src/web/middleware.rs
//!
//! Authentication middleware for protecting routes.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use movieflix_core::ports::AuthError;
use std::sync::Arc;

use crate::web::protocol::ApiFailure;
use crate::web::state::AppState;

/// Middleware that validates the `Authorization: Bearer <token>` header and
/// resolves it to the account it was issued for.
///
/// If valid, inserts the `Account` into request extensions for handlers to use.
/// If invalid, missing, or expired, answers 401 with the failure envelope.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiFailure> {
    // 1. Extract the bearer token.
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_owned)
        .ok_or(ApiFailure(AuthError::TokenInvalid))?;

    // 2. Validate the token and look up the bound account.
    let account = state.auth.profile(&token).await.map_err(ApiFailure)?;

    // 3. Insert the account into request extensions.
    req.extensions_mut().insert(account);

    // 4. Continue to the handler.
    Ok(next.run(req).await)
}
