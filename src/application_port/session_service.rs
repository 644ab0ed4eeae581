use crate::domain_model::TokenClaims;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("malformed token")]
    Malformed,
    #[error("signature mismatch")]
    SignatureInvalid,
    #[error("token expired")]
    Expired,
    #[error("claims mismatch")]
    ClaimsMismatch,
    #[error("session not found")]
    SessionNotFound,
    #[error("backing store unavailable: {0}")]
    Unavailable(String),
    #[error("{0}")]
    ValidationFailed(String),
    #[error("internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct AccessToken(pub String);

#[derive(Debug, Clone, Serialize)]
pub struct RefreshToken(pub String);

/// One issued session: an access/refresh pair sharing a subject and
/// session id at signing time.
#[derive(Debug, Clone, Serialize)]
pub struct IssuedTokens {
    pub access_token: AccessToken,
    pub refresh_token: RefreshToken,
    pub access_expires_at: DateTime<Utc>,
    pub refresh_expires_at: DateTime<Utc>,
}

/// Whether revoking an already-dead session reports an error or succeeds.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub enum RevokePolicy {
    #[default]
    Strict,
    Idempotent,
}

#[async_trait::async_trait]
pub trait SessionService: Send + Sync {
    /// Mint a fresh access/refresh pair for the given user object and
    /// persist the refresh session. Nothing is stored for the access token.
    async fn issue(&self, user: &serde_json::Value) -> Result<IssuedTokens, AuthError>;
    /// Verify an access token by signature and expiry alone. Never touches
    /// the credential store.
    async fn validate_access(&self, token: &str) -> Result<TokenClaims, AuthError>;
    /// Consume a refresh token exactly once and mint a replacement session.
    /// A token that was already rotated or revoked fails `SessionNotFound`.
    async fn rotate_refresh(&self, token: &str) -> Result<IssuedTokens, AuthError>;
    /// End a refresh session without replacement.
    async fn revoke(&self, token: &str) -> Result<(), AuthError>;
}
