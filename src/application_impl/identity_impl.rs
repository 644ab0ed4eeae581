use crate::application_port::{
    AuthError, ClaimsMapper, ClaimsResolver, IdentityValidator, JwtPayload,
};
use crate::domain_model::TokenClaims;
use serde_json::{Map, Value};

/// Claims mapper that reads `sub` straight off the user object and embeds
/// every other top-level field as an extra claim.
pub struct SubjectClaimsMapper;

impl ClaimsMapper for SubjectClaimsMapper {
    fn map(&self, user: &Value) -> Result<JwtPayload, AuthError> {
        let object = user
            .as_object()
            .ok_or_else(|| AuthError::ValidationFailed("user is not an object".to_string()))?;
        let sub = object
            .get("sub")
            .and_then(Value::as_str)
            .ok_or_else(|| AuthError::ValidationFailed("user has no subject".to_string()))?
            .to_string();
        let extra: Map<String, Value> = object
            .iter()
            .filter(|(k, _)| k.as_str() != "sub")
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Ok(JwtPayload { sub, extra })
    }
}

/// Resolver that echoes the token's public claims back as the user object.
pub struct EchoClaimsResolver;

#[async_trait::async_trait]
impl ClaimsResolver for EchoClaimsResolver {
    async fn resolve(&self, claims: &TokenClaims) -> Result<Value, AuthError> {
        Ok(claims.public_payload())
    }
}

// Minimal fake validator for basic use only. Accepts any body carrying a
// non-empty username and password and echoes it back as the user.
pub struct FakeIdentityValidator {
    rejection: String,
}

impl FakeIdentityValidator {
    pub fn new(rejection: impl Into<String>) -> Self {
        Self {
            rejection: rejection.into(),
        }
    }
}

#[async_trait::async_trait]
impl IdentityValidator for FakeIdentityValidator {
    async fn validate(&self, body: &Value) -> Result<Value, AuthError> {
        let username = body.get("username").and_then(Value::as_str).unwrap_or("");
        let password = body.get("password").and_then(Value::as_str).unwrap_or("");
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::ValidationFailed(self.rejection.clone()));
        }
        let mut user = Map::new();
        user.insert("sub".to_string(), Value::String(username.to_string()));
        user.insert("username".to_string(), Value::String(username.to_string()));
        Ok(Value::Object(user))
    }
}
