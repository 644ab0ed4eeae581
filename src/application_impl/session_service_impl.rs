use crate::application_port::{
    AccessToken, AuthError, ClaimsMapper, IssuedTokens, JwtPayload, RefreshToken, RevokePolicy,
    SessionService, TokenCodec,
};
use crate::domain_model::{CredentialRecord, SessionId, SessionKey, TokenClaims, TokenType};
use crate::domain_port::CredentialStore;
use crate::logger::*;
use chrono::{DateTime, Utc};
use std::sync::Arc;

pub struct RealSessionService {
    token_codec: Arc<dyn TokenCodec>,
    credential_store: Arc<dyn CredentialStore>,
    claims_mapper: Arc<dyn ClaimsMapper>,
    revoke_policy: RevokePolicy,
}

impl RealSessionService {
    pub fn new(
        token_codec: Arc<dyn TokenCodec>,
        credential_store: Arc<dyn CredentialStore>,
        claims_mapper: Arc<dyn ClaimsMapper>,
        revoke_policy: RevokePolicy,
    ) -> Self {
        Self {
            token_codec,
            credential_store,
            claims_mapper,
            revoke_policy,
        }
    }

    fn ttl_secs(until: DateTime<Utc>) -> u64 {
        let secs = (until - Utc::now()).num_seconds();
        if secs <= 0 { 1 } else { secs as u64 }
    }

    fn session_key(claims: &TokenClaims) -> Result<SessionKey, AuthError> {
        let session_id = claims
            .jti
            .parse::<SessionId>()
            .map_err(|_| AuthError::ClaimsMismatch)?;
        Ok(SessionKey {
            subject: claims.sub.clone(),
            session_id,
        })
    }

    /// Sign a fresh pair under a new session id and persist the refresh
    /// digest with TTL equal to the token's remaining lifetime.
    async fn issue_session(&self, payload: &JwtPayload) -> Result<IssuedTokens, AuthError> {
        let session_id = SessionId::generate();
        let access = self
            .token_codec
            .sign(payload, TokenType::Access, session_id)?;
        let refresh = self
            .token_codec
            .sign(payload, TokenType::Refresh, session_id)?;

        let digest_hex = self.credential_store.digest(&refresh.token)?;
        let key = SessionKey {
            subject: payload.sub.clone(),
            session_id,
        };
        let record = CredentialRecord {
            subject: payload.sub.clone(),
            digest_hex,
            token_type: TokenType::Refresh,
            expires_at: refresh.expires_at,
        };
        self.credential_store
            .put(&key, &record, Self::ttl_secs(refresh.expires_at))
            .await?;

        Ok(IssuedTokens {
            access_token: AccessToken(access.token),
            refresh_token: RefreshToken(refresh.token),
            access_expires_at: access.expires_at,
            refresh_expires_at: refresh.expires_at,
        })
    }

    /// Verify a refresh token and atomically consume its record. Fails fast
    /// before any store round trip when verification rejects the token.
    async fn consume_refresh(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let claims = self.token_codec.verify(token, TokenType::Refresh)?;
        let key = Self::session_key(&claims)?;
        let digest_hex = self.credential_store.digest(token)?;
        if !self
            .credential_store
            .delete_if_matches(&key, &digest_hex)
            .await?
        {
            return Err(AuthError::SessionNotFound);
        }
        debug!(subject = %key.subject, session = %key.session_id, "refresh session consumed");
        Ok(claims)
    }
}

#[async_trait::async_trait]
impl SessionService for RealSessionService {
    async fn issue(&self, user: &serde_json::Value) -> Result<IssuedTokens, AuthError> {
        let payload = self.claims_mapper.map(user)?;
        self.issue_session(&payload).await
    }

    async fn validate_access(&self, token: &str) -> Result<TokenClaims, AuthError> {
        self.token_codec.verify(token, TokenType::Access)
    }

    async fn rotate_refresh(&self, token: &str) -> Result<IssuedTokens, AuthError> {
        let claims = self.consume_refresh(token).await?;
        // The consumed session's claims carry forward into the replacement.
        self.issue_session(&JwtPayload {
            sub: claims.sub,
            extra: claims.extra,
        })
        .await
    }

    async fn revoke(&self, token: &str) -> Result<(), AuthError> {
        match self.consume_refresh(token).await {
            Ok(_) => Ok(()),
            Err(AuthError::SessionNotFound) if self.revoke_policy == RevokePolicy::Idempotent => {
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}
