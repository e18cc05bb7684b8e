//! crates/movieflix_client/tests/session.rs
//!
//! Scenario tests for the session manager, driven through a fake gateway
//! and the in-memory token store.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use movieflix_client::{MemoryTokenStore, SessionManager, SessionState};
use movieflix_core::domain::{Account, AuthSession};
use movieflix_core::ports::{AuthError, AuthGateway, AuthResult, TokenStore};
use uuid::Uuid;

fn account() -> Account {
    Account {
        id: Uuid::new_v4(),
        email: "user@example.com".to_string(),
        username: "moviefan".to_string(),
        created_at: Utc::now(),
    }
}

/// A gateway whose answers are fixed up front. Counts profile calls so tests
/// can assert that no network request happened.
struct FakeGateway {
    account: Account,
    login_error: Option<AuthError>,
    profile_error: Option<AuthError>,
    profile_calls: AtomicUsize,
}

impl FakeGateway {
    fn new(account: Account) -> Self {
        Self {
            account,
            login_error: None,
            profile_error: None,
            profile_calls: AtomicUsize::new(0),
        }
    }

    fn session(&self) -> AuthSession {
        AuthSession {
            account: self.account.clone(),
            token: "issued-token".to_string(),
        }
    }
}

#[async_trait]
impl AuthGateway for FakeGateway {
    async fn register(
        &self,
        _email: &str,
        _password: &str,
        _username: &str,
    ) -> AuthResult<AuthSession> {
        match &self.login_error {
            Some(err) => Err(err.clone()),
            None => Ok(self.session()),
        }
    }

    async fn login(&self, _email: &str, _password: &str) -> AuthResult<AuthSession> {
        match &self.login_error {
            Some(err) => Err(err.clone()),
            None => Ok(self.session()),
        }
    }

    async fn profile(&self, _token: &str) -> AuthResult<Account> {
        self.profile_calls.fetch_add(1, Ordering::SeqCst);
        match &self.profile_error {
            Some(err) => Err(err.clone()),
            None => Ok(self.account.clone()),
        }
    }
}

#[tokio::test]
async fn fresh_install_boots_unauthenticated_without_network() {
    let gateway = Arc::new(FakeGateway::new(account()));
    let tokens = Arc::new(MemoryTokenStore::new());
    let manager = SessionManager::new(gateway.clone(), tokens);

    assert_eq!(manager.current(), SessionState::Initializing);

    let state = manager.bootstrap().await;
    assert_eq!(state, SessionState::Unauthenticated);
    // No persisted token, so profile must never have been called.
    assert_eq!(gateway.profile_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn persisted_valid_token_boots_authenticated() {
    let expected = account();
    let gateway = Arc::new(FakeGateway::new(expected.clone()));
    let tokens = Arc::new(MemoryTokenStore::with_token("stored-token"));
    let manager = SessionManager::new(gateway.clone(), tokens);

    let state = manager.bootstrap().await;
    assert_eq!(state, SessionState::Authenticated(expected));
    assert_eq!(gateway.profile_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn rejected_token_is_cleared_and_boots_unauthenticated() {
    let mut gateway = FakeGateway::new(account());
    gateway.profile_error = Some(AuthError::TokenExpired);
    let tokens = Arc::new(MemoryTokenStore::with_token("stale-token"));
    let manager = SessionManager::new(Arc::new(gateway), tokens.clone());

    let state = manager.bootstrap().await;
    assert_eq!(state, SessionState::Unauthenticated);
    // The stale token is gone from storage.
    assert_eq!(tokens.load().await.unwrap(), None);
}

#[tokio::test]
async fn network_failure_during_bootstrap_fails_closed() {
    let mut gateway = FakeGateway::new(account());
    gateway.profile_error = Some(AuthError::NetworkTimeout);
    let tokens = Arc::new(MemoryTokenStore::with_token("stored-token"));
    let manager = SessionManager::new(Arc::new(gateway), tokens.clone());

    let state = manager.bootstrap().await;
    assert_eq!(state, SessionState::Unauthenticated);
    assert_eq!(tokens.load().await.unwrap(), None);
}

#[tokio::test]
async fn bootstrap_runs_only_once() {
    let gateway = Arc::new(FakeGateway::new(account()));
    let tokens = Arc::new(MemoryTokenStore::with_token("stored-token"));
    let manager = SessionManager::new(gateway.clone(), tokens);

    manager.bootstrap().await;
    manager.bootstrap().await;
    assert_eq!(gateway.profile_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn login_persists_token_and_logout_clears_it() {
    let expected = account();
    let gateway = Arc::new(FakeGateway::new(expected.clone()));
    let tokens = Arc::new(MemoryTokenStore::new());
    let manager = SessionManager::new(gateway, tokens.clone());

    manager.bootstrap().await;
    let logged_in = manager.login("user@example.com", "secret123").await.unwrap();
    assert_eq!(logged_in, expected);
    assert!(manager.is_authenticated());
    assert_eq!(
        tokens.load().await.unwrap(),
        Some("issued-token".to_string())
    );

    manager.logout().await;
    assert_eq!(manager.current(), SessionState::Unauthenticated);
    assert_eq!(tokens.load().await.unwrap(), None);
}

#[tokio::test]
async fn register_behaves_like_login() {
    let expected = account();
    let gateway = Arc::new(FakeGateway::new(expected.clone()));
    let tokens = Arc::new(MemoryTokenStore::new());
    let manager = SessionManager::new(gateway, tokens.clone());

    manager.bootstrap().await;
    let registered = manager
        .register("user@example.com", "secret123", "moviefan")
        .await
        .unwrap();
    assert_eq!(registered, expected);
    assert!(manager.is_authenticated());
    assert_eq!(
        tokens.load().await.unwrap(),
        Some("issued-token".to_string())
    );
}

#[tokio::test]
async fn failed_login_leaves_state_and_storage_untouched() {
    let mut gateway = FakeGateway::new(account());
    gateway.login_error = Some(AuthError::InvalidCredentials);
    let tokens = Arc::new(MemoryTokenStore::new());
    let manager = SessionManager::new(Arc::new(gateway), tokens.clone());

    manager.bootstrap().await;
    let err = manager
        .login("user@example.com", "wrong")
        .await
        .unwrap_err();
    assert_eq!(err, AuthError::InvalidCredentials);
    assert_eq!(manager.current(), SessionState::Unauthenticated);
    assert_eq!(tokens.load().await.unwrap(), None);
}

#[tokio::test]
async fn subscribers_observe_transitions_in_order() {
    let expected = account();
    let gateway = Arc::new(FakeGateway::new(expected.clone()));
    let tokens = Arc::new(MemoryTokenStore::new());
    let manager = SessionManager::new(gateway, tokens);

    let mut rx = manager.subscribe();
    assert_eq!(*rx.borrow(), SessionState::Initializing);

    manager.bootstrap().await;
    rx.changed().await.unwrap();
    assert_eq!(*rx.borrow_and_update(), SessionState::Unauthenticated);

    manager.login("user@example.com", "secret123").await.unwrap();
    rx.changed().await.unwrap();
    assert_eq!(
        *rx.borrow_and_update(),
        SessionState::Authenticated(expected)
    );

    manager.logout().await;
    rx.changed().await.unwrap();
    assert_eq!(*rx.borrow_and_update(), SessionState::Unauthenticated);
}
