//! services/api/src/adapters/memory.rs
//!
//! An in-memory `CredentialStore` used by the test suite and by the server
//! when no `DATABASE_URL` is configured. The whole map sits behind one lock,
//! so the uniqueness check and the insert are a single atomic step.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use movieflix_core::domain::{Account, AccountCredentials};
use movieflix_core::ports::{AuthError, AuthResult, CredentialStore};
use uuid::Uuid;

#[derive(Default)]
pub struct MemoryCredentialStore {
    /// Keyed by lowercased email.
    accounts: Mutex<HashMap<String, AccountCredentials>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> AuthResult<std::sync::MutexGuard<'_, HashMap<String, AccountCredentials>>> {
        self.accounts
            .lock()
            .map_err(|_| AuthError::Unexpected("credential store lock poisoned".to_string()))
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn create(
        &self,
        email: &str,
        username: &str,
        password_hash: &str,
    ) -> AuthResult<Account> {
        let key = email.to_lowercase();
        let mut accounts = self.lock()?;
        if accounts.contains_key(&key) {
            return Err(AuthError::DuplicateEmail);
        }

        let credentials = AccountCredentials {
            id: Uuid::new_v4(),
            email: key.clone(),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };
        let account = credentials.clone().into_account();
        accounts.insert(key, credentials);
        Ok(account)
    }

    async fn find_by_email(&self, email: &str) -> AuthResult<Option<AccountCredentials>> {
        Ok(self.lock()?.get(&email.to_lowercase()).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> AuthResult<Option<Account>> {
        Ok(self
            .lock()?
            .values()
            .find(|c| c.id == id)
            .cloned()
            .map(AccountCredentials::into_account))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_email_uniqueness_is_case_insensitive() {
        let store = MemoryCredentialStore::new();
        store.create("User@Example.com", "user", "hash").await.unwrap();

        assert_eq!(
            store.create("user@example.com", "other", "hash").await,
            Err(AuthError::DuplicateEmail)
        );
    }

    #[tokio::test]
    async fn test_lookup_by_email_ignores_case() {
        let store = MemoryCredentialStore::new();
        store.create("user@example.com", "user", "hash").await.unwrap();

        let found = store.find_by_email("USER@EXAMPLE.COM").await.unwrap();
        assert_eq!(found.map(|c| c.username), Some("user".to_string()));
    }

    #[tokio::test]
    async fn test_lookup_by_id() {
        let store = MemoryCredentialStore::new();
        let created = store.create("user@example.com", "user", "hash").await.unwrap();

        let found = store.find_by_id(created.id).await.unwrap();
        assert_eq!(found, Some(created));

        assert_eq!(store.find_by_id(Uuid::new_v4()).await.unwrap(), None);
    }
}
