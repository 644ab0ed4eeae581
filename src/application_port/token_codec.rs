use crate::application_port::AuthError;
use crate::domain_model::{SessionId, TokenClaims, TokenType};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

/// What the claims mapper hands the codec for signing: the owning subject
/// plus any extra claims to embed alongside it.
#[derive(Debug, Clone)]
pub struct JwtPayload {
    pub sub: String,
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone)]
pub struct SignedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Signs and verifies self-contained credentials. Codec work is pure
/// computation with no suspension points, so the trait is synchronous.
pub trait TokenCodec: Send + Sync {
    /// Encode and sign claims with the type-specific secret.
    fn sign(
        &self,
        payload: &JwtPayload,
        token_type: TokenType,
        session_id: SessionId,
    ) -> Result<SignedToken, AuthError>;

    /// Decode and check a token, in order: structure, signature, expiry,
    /// then issuer/audience/type.
    fn verify(&self, token: &str, expected: TokenType) -> Result<TokenClaims, AuthError>;
}
