use crate::application_port::{AuthError, JwtPayload, SignedToken, TokenCodec};
use crate::domain_model::{SessionId, TokenClaims, TokenType};
use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub issuer: String,
    pub audience: Vec<String>,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
    pub access_secret: Vec<u8>,
    pub refresh_secret: Vec<u8>,
}

pub struct JwtHs256Codec {
    cfg: JwtConfig,
}

impl JwtHs256Codec {
    pub fn new(cfg: JwtConfig) -> Self {
        JwtHs256Codec { cfg }
    }

    #[inline]
    fn secret(&self, token_type: TokenType) -> &[u8] {
        match token_type {
            TokenType::Access => &self.cfg.access_secret,
            TokenType::Refresh => &self.cfg.refresh_secret,
        }
    }

    #[inline]
    fn ttl(&self, token_type: TokenType) -> Duration {
        match token_type {
            TokenType::Access => self.cfg.access_ttl,
            TokenType::Refresh => self.cfg.refresh_ttl,
        }
    }
}

fn map_decode_error(error: jsonwebtoken::errors::Error) -> AuthError {
    match error.kind() {
        ErrorKind::InvalidSignature => AuthError::SignatureInvalid,
        ErrorKind::ExpiredSignature => AuthError::Expired,
        ErrorKind::InvalidIssuer
        | ErrorKind::InvalidAudience
        | ErrorKind::InvalidSubject
        | ErrorKind::MissingRequiredClaim(_) => AuthError::ClaimsMismatch,
        _ => AuthError::Malformed,
    }
}

impl TokenCodec for JwtHs256Codec {
    fn sign(
        &self,
        payload: &JwtPayload,
        token_type: TokenType,
        session_id: SessionId,
    ) -> Result<SignedToken, AuthError> {
        let iat_dt = Utc::now();
        let exp_dt = iat_dt + self.ttl(token_type);
        let claims = TokenClaims {
            sub: payload.sub.clone(),
            token_type,
            jti: session_id.to_string(),
            iat: iat_dt.timestamp(),
            exp: exp_dt.timestamp(),
            iss: self.cfg.issuer.clone(),
            aud: self.cfg.audience.clone(),
            extra: payload.extra.clone(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret(token_type)),
        )
        .map_err(|e| AuthError::Internal(e.to_string()))?;
        Ok(SignedToken {
            token,
            expires_at: exp_dt,
        })
    }

    fn verify(&self, token: &str, expected: TokenType) -> Result<TokenClaims, AuthError> {
        let mut v = Validation::new(Algorithm::HS256);
        v.validate_exp = true;
        // Tokens expired by seconds must fail, not slide through leeway.
        v.leeway = 0;
        v.set_audience(&self.cfg.audience);
        v.set_issuer(&[self.cfg.issuer.as_str()]);
        let data = decode::<TokenClaims>(
            token,
            &DecodingKey::from_secret(self.secret(expected)),
            &v,
        )
        .map_err(map_decode_error)?;
        if data.claims.token_type != expected {
            return Err(AuthError::ClaimsMismatch);
        }
        Ok(data.claims)
    }
}
