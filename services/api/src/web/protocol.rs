//! services/api/src/web/protocol.rs
//!
//! Defines the response envelope the client sees: every body is
//! `{success: true, data: ...}` or `{success: false, message: ...}`, and
//! failures never leak internal detail past the envelope message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use movieflix_core::domain::{Account, AuthSession};
use movieflix_core::ports::AuthError;
use serde::Serialize;
use tracing::error;
use utoipa::ToSchema;
use uuid::Uuid;

//=========================================================================================
// Success Envelopes
//=========================================================================================

/// Public projection of an account on the wire.
#[derive(Serialize, ToSchema)]
pub struct AccountBody {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

impl From<Account> for AccountBody {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            email: account.email,
            username: account.username,
            created_at: account.created_at,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct SessionData {
    pub account: AccountBody,
    pub token: String,
}

impl From<AuthSession> for SessionData {
    fn from(session: AuthSession) -> Self {
        Self {
            account: session.account.into(),
            token: session.token,
        }
    }
}

/// Body of a successful register/login response.
#[derive(Serialize, ToSchema)]
pub struct SessionEnvelope {
    pub success: bool,
    pub data: SessionData,
}

impl SessionEnvelope {
    pub fn new(session: AuthSession) -> Self {
        Self {
            success: true,
            data: session.into(),
        }
    }
}

/// Body of a successful profile response.
#[derive(Serialize, ToSchema)]
pub struct ProfileEnvelope {
    pub success: bool,
    pub data: AccountBody,
}

impl ProfileEnvelope {
    pub fn new(account: Account) -> Self {
        Self {
            success: true,
            data: account.into(),
        }
    }
}

/// Health check body.
#[derive(Serialize, ToSchema)]
pub struct HealthEnvelope {
    pub success: bool,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Banner body served at the root path.
#[derive(Serialize, ToSchema)]
pub struct BannerEnvelope {
    pub success: bool,
    pub message: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
}

//=========================================================================================
// Failure Envelopes
//=========================================================================================

#[derive(Serialize, ToSchema)]
pub struct ErrorEnvelope {
    pub success: bool,
    pub message: String,
}

/// Body for unmatched routes.
#[derive(Serialize, ToSchema)]
pub struct NotFoundEnvelope {
    pub success: bool,
    pub message: String,
    pub path: String,
    pub method: String,
}

/// Wrapper that turns an `AuthError` into the uniform failure envelope, so
/// handlers can bail with `?`.
#[derive(Debug)]
pub struct ApiFailure(pub AuthError);

impl From<AuthError> for ApiFailure {
    fn from(err: AuthError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            AuthError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AuthError::DuplicateEmail => (StatusCode::CONFLICT, self.0.to_string()),
            AuthError::InvalidCredentials
            | AuthError::TokenExpired
            | AuthError::TokenInvalid
            | AuthError::AccountNotFound => (StatusCode::UNAUTHORIZED, self.0.to_string()),
            other => {
                // The detail goes to the log, never onto the wire.
                error!(error = %other, "request failed unexpectedly");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (
            status,
            Json(ErrorEnvelope {
                success: false,
                message,
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: AuthError) -> StatusCode {
        ApiFailure(err).into_response().status()
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_of(AuthError::Validation("missing field".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status_of(AuthError::DuplicateEmail), StatusCode::CONFLICT);
        assert_eq!(
            status_of(AuthError::InvalidCredentials),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(status_of(AuthError::TokenExpired), StatusCode::UNAUTHORIZED);
        assert_eq!(status_of(AuthError::TokenInvalid), StatusCode::UNAUTHORIZED);
        assert_eq!(
            status_of(AuthError::AccountNotFound),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(AuthError::Unexpected("boom".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_internal_detail_is_not_leaked() {
        let response = ApiFailure(AuthError::Unexpected("connection refused".into())).into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Internal server error");
    }
}
