use crate::domain_model::{SessionId, TokenType};
use chrono::{DateTime, Utc};
use std::fmt;

/// Composite key of one refresh session: subject plus session id.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct SessionKey {
    pub subject: String,
    pub session_id: SessionId,
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.subject, self.session_id)
    }
}

/// Persisted image of an active refresh session. Holds a one-way digest of
/// the token, never the token itself. A record exists exactly as long as its
/// refresh token is still eligible to be rotated or revoked.
#[derive(Debug, Clone, PartialEq)]
pub struct CredentialRecord {
    pub subject: String,
    pub digest_hex: String,
    pub token_type: TokenType,
    pub expires_at: DateTime<Utc>,
}
