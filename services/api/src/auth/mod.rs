//! services/api/src/auth/mod.rs
//!
//! The request-level auth orchestration: composes the credential store and
//! the token issuer into the register/login/profile operations the web layer
//! exposes. Every operation is independent; no state survives a request.

pub mod password;
pub mod token;

use std::sync::Arc;

use movieflix_core::domain::{Account, AuthSession};
use movieflix_core::ports::{AuthError, AuthResult, CredentialStore};
use tracing::info;

use token::TokenIssuer;

pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    issuer: TokenIssuer,
    /// Verified against when a login email is unknown, so that path costs the
    /// same as a wrong password and reveals nothing about which factor failed.
    dummy_hash: String,
}

impl AuthService {
    pub fn new(store: Arc<dyn CredentialStore>, issuer: TokenIssuer) -> AuthResult<Self> {
        let dummy_hash = password::hash_password("placeholder-never-a-real-secret")?;
        Ok(Self {
            store,
            issuer,
            dummy_hash,
        })
    }

    /// Creates an account and signs the caller straight in.
    ///
    /// `DuplicateEmail` from the store propagates unchanged.
    pub async fn register(
        &self,
        email: &str,
        password_input: &str,
        username: &str,
    ) -> AuthResult<AuthSession> {
        let email = email.trim();
        let username = username.trim();
        if email.is_empty() || password_input.is_empty() || username.is_empty() {
            return Err(AuthError::Validation(
                "email, password and username are required".to_string(),
            ));
        }

        let password_hash = password::hash_password(password_input)?;
        let account = self.store.create(email, username, &password_hash).await?;
        let token = self.issuer.issue(account.id)?;

        info!(email = %account.email, "account registered");
        Ok(AuthSession { account, token })
    }

    /// Verifies the password for `email` and issues a fresh token.
    ///
    /// An unknown email and a wrong password both answer `InvalidCredentials`.
    pub async fn login(&self, email: &str, password_input: &str) -> AuthResult<AuthSession> {
        let Some(credentials) = self.store.find_by_email(email.trim()).await? else {
            let _ = password::verify_password(password_input, &self.dummy_hash);
            return Err(AuthError::InvalidCredentials);
        };

        password::verify_password(password_input, &credentials.password_hash)?;

        let token = self.issuer.issue(credentials.id)?;
        info!(email = %credentials.email, "login succeeded");
        Ok(AuthSession {
            account: credentials.into_account(),
            token,
        })
    }

    /// Resolves a bearer token into the account it was issued for.
    pub async fn profile(&self, token: &str) -> AuthResult<Account> {
        let account_id = self.issuer.validate(token)?;
        self.store
            .find_by_id(account_id)
            .await?
            .ok_or(AuthError::AccountNotFound)
    }
}
