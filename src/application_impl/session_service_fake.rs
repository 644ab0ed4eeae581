use crate::application_port::{
    AccessToken, AuthError, IssuedTokens, RefreshToken, SessionService,
};
use crate::domain_model::{TokenClaims, TokenType};
use chrono::{Duration, Utc};
use serde_json::{Map, Value};

#[derive(Debug)]
pub struct FakeSessionService;

impl FakeSessionService {
    pub fn new() -> Self {
        Self
    }
}

// Minimal fake implementation for basic use only. Tokens are transparent
// strings; nothing is stored, so rotation is never consumed.
#[async_trait::async_trait]
impl SessionService for FakeSessionService {
    async fn issue(&self, user: &Value) -> Result<IssuedTokens, AuthError> {
        let sub = user
            .get("sub")
            .and_then(Value::as_str)
            .ok_or_else(|| AuthError::ValidationFailed("user has no subject".to_string()))?;
        Ok(fake_tokens(sub))
    }

    async fn validate_access(&self, token: &str) -> Result<TokenClaims, AuthError> {
        match token.strip_prefix("fake-access-token:") {
            Some(sub) => Ok(fake_claims(sub, TokenType::Access)),
            None => Err(AuthError::Malformed),
        }
    }

    async fn rotate_refresh(&self, token: &str) -> Result<IssuedTokens, AuthError> {
        match token.strip_prefix("fake-refresh-token:") {
            Some(sub) => Ok(fake_tokens(sub)),
            None => Err(AuthError::Malformed),
        }
    }

    async fn revoke(&self, token: &str) -> Result<(), AuthError> {
        match token.strip_prefix("fake-refresh-token:") {
            Some(_) => Ok(()),
            None => Err(AuthError::Malformed),
        }
    }
}

fn fake_tokens(sub: &str) -> IssuedTokens {
    let now = Utc::now();
    IssuedTokens {
        access_token: AccessToken(format!("fake-access-token:{}", sub)),
        refresh_token: RefreshToken(format!("fake-refresh-token:{}", sub)),
        access_expires_at: now + Duration::minutes(15),
        refresh_expires_at: now + Duration::days(7),
    }
}

fn fake_claims(sub: &str, token_type: TokenType) -> TokenClaims {
    let now = Utc::now();
    TokenClaims {
        sub: sub.to_string(),
        token_type,
        jti: uuid::Uuid::nil().to_string(),
        iat: now.timestamp(),
        exp: (now + Duration::minutes(15)).timestamp(),
        iss: "fake".to_string(),
        aud: Vec::new(),
        extra: Map::new(),
    }
}
