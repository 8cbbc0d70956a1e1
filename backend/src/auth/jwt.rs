//! Signed token issuance and verification
//!
//! Two token kinds share one mechanism (HS256 JWT): session tokens issued on
//! login and reset tokens mailed out by the forgot-password flow. Each kind
//! has its own secret and carries a `purpose` claim that is checked on
//! verification, so one kind is never accepted in place of the other.
//!
//! Tokens are not stored. Nothing revokes them before `exp`.

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind as JwtErrorKind, Algorithm, DecodingKey, EncodingKey,
    Header, Validation,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// What a token may be used for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenPurpose {
    Session,
    Reset,
}

impl TokenPurpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenPurpose::Session => "session",
            TokenPurpose::Reset => "reset",
        }
    }
}

/// Token verification failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token has expired")]
    Expired,

    #[error("Invalid token: {0}")]
    Invalid(String),
}

/// Claims carried by every token kind
pub trait TokenClaims: Serialize + DeserializeOwned {
    fn purpose(&self) -> TokenPurpose;
}

/// Session (login) token claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub email: String,
    pub role: String,
    pub purpose: TokenPurpose,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl SessionClaims {
    pub fn new(email: &str, role: &str, issued_at: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            email: email.to_string(),
            role: role.to_string(),
            purpose: TokenPurpose::Session,
            iat: issued_at.timestamp(),
            exp: (issued_at + ttl).timestamp(),
        }
    }
}

impl TokenClaims for SessionClaims {
    fn purpose(&self) -> TokenPurpose {
        self.purpose
    }
}

/// Password reset token claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetClaims {
    /// Subject (user ID)
    pub sub: String,
    pub purpose: TokenPurpose,
    pub iat: i64,
    pub exp: i64,
}

impl ResetClaims {
    pub fn new(user_id: Uuid, issued_at: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            sub: user_id.to_string(),
            purpose: TokenPurpose::Reset,
            iat: issued_at.timestamp(),
            exp: (issued_at + ttl).timestamp(),
        }
    }
}

impl TokenClaims for ResetClaims {
    fn purpose(&self) -> TokenPurpose {
        self.purpose
    }
}

/// Pre-computed signing keys for one token purpose
#[derive(Clone)]
pub struct TokenKeys {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
}

impl TokenKeys {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: Arc::new(EncodingKey::from_secret(secret.as_bytes())),
            decoding: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
        }
    }

    pub fn encoding(&self) -> &EncodingKey {
        &self.encoding
    }

    pub fn decoding(&self) -> &DecodingKey {
        &self.decoding
    }
}

/// Sign claims into a compact token
pub fn issue<C: TokenClaims>(claims: &C, keys: &TokenKeys) -> Result<String> {
    encode(&Header::new(Algorithm::HS256), claims, keys.encoding()).map_err(|e| {
        anyhow::anyhow!("Failed to issue {} token: {}", claims.purpose().as_str(), e)
    })
}

/// Check signature, expiry and purpose, returning the claims
///
/// Expiry is checked with zero leeway.
pub fn verify<C: TokenClaims>(
    token: &str,
    keys: &TokenKeys,
    expected: TokenPurpose,
) -> Result<C, TokenError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    let data = decode::<C>(token, keys.decoding(), &validation).map_err(|e| match e.kind() {
        JwtErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Invalid(e.to_string()),
    })?;

    if data.claims.purpose() != expected {
        return Err(TokenError::Invalid(format!(
            "expected a {} token",
            expected.as_str()
        )));
    }

    Ok(data.claims)
}

/// Token service holding the keys and lifetimes of both token kinds
#[derive(Clone)]
pub struct TokenService {
    session_keys: TokenKeys,
    reset_keys: TokenKeys,
    session_ttl: Duration,
    reset_ttl: Duration,
}

impl TokenService {
    /// Create a token service with pre-computed keys
    ///
    /// Call this once at application startup and store in AppState.
    pub fn new(
        session_secret: &str,
        reset_secret: &str,
        session_token_expiry_secs: i64,
        reset_token_expiry_secs: i64,
    ) -> Self {
        Self {
            session_keys: TokenKeys::new(session_secret),
            reset_keys: TokenKeys::new(reset_secret),
            session_ttl: Duration::seconds(session_token_expiry_secs),
            reset_ttl: Duration::seconds(reset_token_expiry_secs),
        }
    }

    /// Issue a session token carrying `{email, role}`
    pub fn issue_session_token(&self, email: &str, role: &str) -> Result<String> {
        let claims = SessionClaims::new(email, role, Utc::now(), self.session_ttl);
        issue(&claims, &self.session_keys)
    }

    /// Issue a reset token carrying the user identifier
    pub fn issue_reset_token(&self, user_id: Uuid) -> Result<String> {
        let claims = ResetClaims::new(user_id, Utc::now(), self.reset_ttl);
        issue(&claims, &self.reset_keys)
    }

    #[inline]
    pub fn verify_session_token(&self, token: &str) -> Result<SessionClaims, TokenError> {
        verify(token, &self.session_keys, TokenPurpose::Session)
    }

    #[inline]
    pub fn verify_reset_token(&self, token: &str) -> Result<ResetClaims, TokenError> {
        verify(token, &self.reset_keys, TokenPurpose::Reset)
    }

    pub fn session_keys(&self) -> &TokenKeys {
        &self.session_keys
    }

    pub fn reset_keys(&self) -> &TokenKeys {
        &self.reset_keys
    }

    pub fn session_ttl(&self) -> Duration {
        self.session_ttl
    }
}
