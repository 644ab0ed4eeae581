use crate::application_port::{AuthError, JwtPayload};
use crate::domain_model::TokenClaims;
use serde_json::Value;

/// Business rule for one route kind (login or register): decides whether a
/// request body names a real identity and returns the user object if so.
/// Rejections surface as `AuthError::ValidationFailed` with the reason.
#[async_trait::async_trait]
pub trait IdentityValidator: Send + Sync {
    async fn validate(&self, body: &Value) -> Result<Value, AuthError>;
}

/// Maps a validated user object to the payload embedded in signed tokens.
pub trait ClaimsMapper: Send + Sync {
    fn map(&self, user: &Value) -> Result<JwtPayload, AuthError>;
}

/// Maps verified access claims back to the user object returned by the
/// profile route.
#[async_trait::async_trait]
pub trait ClaimsResolver: Send + Sync {
    async fn resolve(&self, claims: &TokenClaims) -> Result<Value, AuthError>;
}
