//! crates/movieflix_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like databases, local
//! device storage, or the network.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Account, AccountCredentials, AuthSession};

//=========================================================================================
// Shared Error Taxonomy
//=========================================================================================

/// The failure categories every port and service in the system speaks.
///
/// Server-side code raises the credential/token variants; the device client
/// additionally surfaces the network and storage variants. `InvalidCredentials`
/// deliberately covers both "no such account" and "wrong password" so callers
/// cannot tell which factor failed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AuthError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Email already registered")]
    DuplicateEmail,
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Token expired")]
    TokenExpired,
    #[error("Invalid token")]
    TokenInvalid,
    #[error("Account not found")]
    AccountNotFound,
    #[error("Request timed out")]
    NetworkTimeout,
    #[error("Network unavailable")]
    NetworkUnavailable,
    #[error("Local storage error: {0}")]
    Storage(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, AuthError>`.
pub type AuthResult<T> = Result<T, AuthError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Durable persistence of account records (server side).
///
/// `create` must be atomic under concurrent invocation: two racing creates
/// for the same email resolve to exactly one success and one `DuplicateEmail`.
/// Email comparison is case-insensitive throughout. There are no update or
/// delete operations; the store is append-only.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn create(
        &self,
        email: &str,
        username: &str,
        password_hash: &str,
    ) -> AuthResult<Account>;

    async fn find_by_email(&self, email: &str) -> AuthResult<Option<AccountCredentials>>;

    async fn find_by_id(&self, id: Uuid) -> AuthResult<Option<Account>>;
}

/// The device client's view of the first-party auth server.
#[async_trait]
pub trait AuthGateway: Send + Sync {
    async fn register(
        &self,
        email: &str,
        password: &str,
        username: &str,
    ) -> AuthResult<AuthSession>;

    async fn login(&self, email: &str, password: &str) -> AuthResult<AuthSession>;

    async fn profile(&self, token: &str) -> AuthResult<Account>;
}

/// Durable device-local storage for the current session token.
///
/// Holds at most one opaque string; absence means unauthenticated.
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn load(&self) -> AuthResult<Option<String>>;

    async fn save(&self, token: &str) -> AuthResult<()>;

    async fn clear(&self) -> AuthResult<()>;
}
