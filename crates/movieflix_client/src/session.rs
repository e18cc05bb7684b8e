//! crates/movieflix_client/src/session.rs
//!
//! The session manager: the single owner of the client's authentication
//! state. Created once at process start and handed to consumers explicitly;
//! everyone else observes it through `subscribe()` and treats the state as
//! read-only.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use movieflix_core::domain::{Account, AuthSession};
use movieflix_core::ports::{AuthGateway, AuthResult, TokenStore};
use tokio::sync::watch;
use tracing::{info, warn};

/// The client-side reflection of "current user or none".
///
/// `Initializing` is entered once at construction and left exactly once,
/// when `bootstrap()` completes.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Initializing,
    Authenticated(Account),
    Unauthenticated,
}

impl SessionState {
    pub fn account(&self) -> Option<&Account> {
        match self {
            SessionState::Authenticated(account) => Some(account),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated(_))
    }
}

pub struct SessionManager {
    gateway: Arc<dyn AuthGateway>,
    tokens: Arc<dyn TokenStore>,
    state: watch::Sender<SessionState>,
    bootstrapped: AtomicBool,
}

impl SessionManager {
    pub fn new(gateway: Arc<dyn AuthGateway>, tokens: Arc<dyn TokenStore>) -> Self {
        let (state, _) = watch::channel(SessionState::Initializing);
        Self {
            gateway,
            tokens,
            state,
            bootstrapped: AtomicBool::new(false),
        }
    }

    /// A snapshot of the current state.
    pub fn current(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    /// Hands out a receiver that observes every state change. Dropping the
    /// receiver is the unsubscription.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Attempts silent re-authentication from the persisted token.
    ///
    /// Runs once per process; a second call answers the settled state without
    /// side effects. Must complete before any screen that depends on
    /// authentication state is shown. Fails closed: any failure, including a
    /// network one, clears the persisted token and lands in `Unauthenticated`.
    pub async fn bootstrap(&self) -> SessionState {
        if self.bootstrapped.swap(true, Ordering::SeqCst) {
            return self.current();
        }

        let next = match self.tokens.load().await {
            Ok(Some(token)) => match self.gateway.profile(&token).await {
                Ok(account) => {
                    info!(username = %account.username, "silent re-authentication succeeded");
                    SessionState::Authenticated(account)
                }
                Err(err) => {
                    warn!(error = %err, "stored token rejected; clearing it");
                    if let Err(err) = self.tokens.clear().await {
                        warn!(error = %err, "failed to remove stored token");
                    }
                    SessionState::Unauthenticated
                }
            },
            Ok(None) => SessionState::Unauthenticated,
            Err(err) => {
                warn!(error = %err, "failed to read stored token");
                SessionState::Unauthenticated
            }
        };

        self.state.send_replace(next);
        self.current()
    }

    /// Logs in and, on success, persists the token and transitions to
    /// `Authenticated`. On failure the state is untouched and the error is
    /// the caller's to surface; nothing is retried.
    pub async fn login(&self, email: &str, password: &str) -> AuthResult<Account> {
        let session = self.gateway.login(email, password).await?;
        Ok(self.install(session).await)
    }

    /// Same contract as `login`, for new accounts.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        username: &str,
    ) -> AuthResult<Account> {
        let session = self.gateway.register(email, password, username).await?;
        Ok(self.install(session).await)
    }

    /// The gateway response is observed strictly before the token is
    /// persisted. A failed write is logged and tolerated: the in-memory
    /// session is live either way, a restart just costs a fresh login.
    async fn install(&self, session: AuthSession) -> Account {
        if let Err(err) = self.tokens.save(&session.token).await {
            warn!(error = %err, "failed to persist session token");
        }
        self.state
            .send_replace(SessionState::Authenticated(session.account.clone()));
        session.account
    }

    /// Never fails. The in-memory state transitions even if removing the
    /// persisted token does not succeed.
    pub async fn logout(&self) {
        info!("logging out");
        self.state.send_replace(SessionState::Unauthenticated);
        if let Err(err) = self.tokens.clear().await {
            warn!(error = %err, "failed to remove persisted token");
        }
    }
}
