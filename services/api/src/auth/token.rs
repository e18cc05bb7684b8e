//! services/api/src/auth/token.rs
//!
//! Issues and validates the bearer tokens handed out at login/registration.
//! Validation is stateless: it depends only on the token itself and the
//! server-held secret, never on a session table.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use movieflix_core::ports::{AuthError, AuthResult};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// Bound account identifier.
    sub: String,
    /// Issued at (Unix timestamp).
    iat: i64,
    /// Expiration time (Unix timestamp).
    exp: i64,
    /// Unique token identifier.
    jti: String,
}

/// Mints and verifies HS256-signed session tokens with a fixed validity window.
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    /// Issues a token binding `account_id` until now + ttl.
    pub fn issue(&self, account_id: Uuid) -> AuthResult<String> {
        self.issue_at(account_id, Utc::now())
    }

    fn issue_at(&self, account_id: Uuid, issued_at: DateTime<Utc>) -> AuthResult<String> {
        let claims = Claims {
            sub: account_id.to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + self.ttl).timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AuthError::Unexpected(format!("Failed to sign token: {e}")))
    }

    /// Returns the bound account id if the token is intact and inside its
    /// validity window.
    pub fn validate(&self, token: &str) -> AuthResult<Uuid> {
        let mut validation = Validation::new(Algorithm::HS256);
        // The validity window is exact; no clock-skew allowance.
        validation.leeway = 0;

        let data =
            decode::<Claims>(token, &self.decoding, &validation).map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::TokenInvalid,
            })?;

        data.claims
            .sub
            .parse::<Uuid>()
            .map_err(|_| AuthError::TokenInvalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new("unit-test-secret", Duration::hours(1))
    }

    #[test]
    fn test_round_trip_before_expiry() {
        let issuer = issuer();
        let account_id = Uuid::new_v4();
        let token = issuer.issue(account_id).unwrap();
        assert_eq!(issuer.validate(&token), Ok(account_id));
    }

    #[test]
    fn test_expired_token_rejected() {
        let issuer = issuer();
        let token = issuer
            .issue_at(Uuid::new_v4(), Utc::now() - Duration::hours(2))
            .unwrap();
        assert_eq!(issuer.validate(&token), Err(AuthError::TokenExpired));
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let issuer = issuer();
        let token = issuer.issue(Uuid::new_v4()).unwrap();

        // Flip one character inside the payload segment.
        let payload_start = token.find('.').unwrap() + 1;
        let mut bytes = token.into_bytes();
        let i = payload_start + 4;
        bytes[i] = if bytes[i] == b'A' { b'B' } else { b'A' };
        let tampered = String::from_utf8(bytes).unwrap();

        assert_eq!(issuer.validate(&tampered), Err(AuthError::TokenInvalid));
    }

    #[test]
    fn test_tampered_signature_rejected() {
        let issuer = issuer();
        let token = issuer.issue(Uuid::new_v4()).unwrap();

        let sig_start = token.rfind('.').unwrap() + 1;
        let mut bytes = token.into_bytes();
        bytes[sig_start] = if bytes[sig_start] == b'A' { b'B' } else { b'A' };
        let tampered = String::from_utf8(bytes).unwrap();

        assert_eq!(issuer.validate(&tampered), Err(AuthError::TokenInvalid));
    }

    #[test]
    fn test_malformed_token_rejected() {
        let issuer = issuer();
        assert_eq!(issuer.validate(""), Err(AuthError::TokenInvalid));
        assert_eq!(issuer.validate("not-a-token"), Err(AuthError::TokenInvalid));
        assert_eq!(
            issuer.validate("aaaa.bbbb.cccc"),
            Err(AuthError::TokenInvalid)
        );
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = issuer().issue(Uuid::new_v4()).unwrap();
        let other = TokenIssuer::new("a-different-secret", Duration::hours(1));
        assert_eq!(other.validate(&token), Err(AuthError::TokenInvalid));
    }
}
