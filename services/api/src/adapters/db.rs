//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `CredentialStore` port from the `core` crate. It handles all interactions
//! with the PostgreSQL database using `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use movieflix_core::domain::{Account, AccountCredentials};
use movieflix_core::ports::{AuthError, AuthResult, CredentialStore};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `CredentialStore` port.
///
/// Emails are stored lowercased, so the UNIQUE column makes the uniqueness
/// check case-insensitive and atomic: of two racing inserts for the same
/// address, the database accepts exactly one.
#[derive(Clone)]
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    /// Creates a new `PgCredentialStore`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct AccountRecord {
    id: Uuid,
    email: String,
    username: String,
    created_at: DateTime<Utc>,
}
impl AccountRecord {
    fn to_domain(self) -> Account {
        Account {
            id: self.id,
            email: self.email,
            username: self.username,
            created_at: self.created_at,
        }
    }
}

#[derive(FromRow)]
struct CredentialsRecord {
    id: Uuid,
    email: String,
    username: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}
impl CredentialsRecord {
    fn to_domain(self) -> AccountCredentials {
        AccountCredentials {
            id: self.id,
            email: self.email,
            username: self.username,
            password_hash: self.password_hash,
            created_at: self.created_at,
        }
    }
}

//=========================================================================================
// `CredentialStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn create(
        &self,
        email: &str,
        username: &str,
        password_hash: &str,
    ) -> AuthResult<Account> {
        let record = sqlx::query_as::<_, AccountRecord>(
            "INSERT INTO accounts (id, email, username, password_hash) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, email, username, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(email.to_lowercase())
        .bind(username)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => AuthError::DuplicateEmail,
            _ => AuthError::Unexpected(e.to_string()),
        })?;

        Ok(record.to_domain())
    }

    async fn find_by_email(&self, email: &str) -> AuthResult<Option<AccountCredentials>> {
        let record = sqlx::query_as::<_, CredentialsRecord>(
            "SELECT id, email, username, password_hash, created_at \
             FROM accounts WHERE email = $1",
        )
        .bind(email.to_lowercase())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuthError::Unexpected(e.to_string()))?;

        Ok(record.map(CredentialsRecord::to_domain))
    }

    async fn find_by_id(&self, id: Uuid) -> AuthResult<Option<Account>> {
        let record = sqlx::query_as::<_, AccountRecord>(
            "SELECT id, email, username, created_at FROM accounts WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuthError::Unexpected(e.to_string()))?;

        Ok(record.map(AccountRecord::to_domain))
    }
}
