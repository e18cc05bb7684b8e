//! crates/movieflix_client/src/storage.rs
//!
//! Durable device-local storage for the session token: one opaque string at
//! a well-known path. Absence of the file means unauthenticated.

use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use movieflix_core::ports::{AuthError, AuthResult, TokenStore};

/// File-backed token storage.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn load(&self) -> AuthResult<Option<String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => {
                let token = contents.trim();
                if token.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(token.to_string()))
                }
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AuthError::Storage(e.to_string())),
        }
    }

    async fn save(&self, token: &str) -> AuthResult<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AuthError::Storage(e.to_string()))?;
        }
        tokio::fs::write(&self.path, token)
            .await
            .map_err(|e| AuthError::Storage(e.to_string()))
    }

    async fn clear(&self) -> AuthResult<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            // Already gone is as cleared as it gets.
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AuthError::Storage(e.to_string())),
        }
    }
}

/// In-memory token storage for tests and throwaway sessions.
#[derive(Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        Self {
            token: Mutex::new(Some(token.to_string())),
        }
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> AuthResult<Option<String>> {
        Ok(self
            .token
            .lock()
            .map_err(|_| AuthError::Storage("token store lock poisoned".to_string()))?
            .clone())
    }

    async fn save(&self, token: &str) -> AuthResult<()> {
        *self
            .token
            .lock()
            .map_err(|_| AuthError::Storage("token store lock poisoned".to_string()))? =
            Some(token.to_string());
        Ok(())
    }

    async fn clear(&self) -> AuthResult<()> {
        *self
            .token
            .lock()
            .map_err(|_| AuthError::Storage("token store lock poisoned".to_string()))? = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_absent_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("session-token"));
        assert_eq!(store.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_save_load_clear_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("nested/session-token"));

        store.save("opaque-token").await.unwrap();
        assert_eq!(
            store.load().await.unwrap(),
            Some("opaque-token".to_string())
        );

        store.clear().await.unwrap();
        assert_eq!(store.load().await.unwrap(), None);

        // Clearing twice is fine.
        store.clear().await.unwrap();
    }
}
