use crate::application_port::AuthError;
use crate::domain_model::{CredentialRecord, SessionKey};
use hmac::{Hmac, KeyInit, Mac};
use sha2::Sha256;

#[derive(Debug, thiserror::Error)]
pub enum CredentialStoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<CredentialStoreError> for AuthError {
    fn from(error: CredentialStoreError) -> Self {
        match error {
            CredentialStoreError::Unavailable(e) => AuthError::Unavailable(e),
            CredentialStoreError::Internal(e) => AuthError::Internal(e),
        }
    }
}

/// Keyed one-way digest of a token string, hex encoded. Deterministic, so a
/// presented token can be compared byte-for-byte against the stored digest.
pub fn digest_hex(key: &[u8], token: &str) -> Result<String, CredentialStoreError> {
    let mut mac = Hmac::<Sha256>::new_from_slice(key)
        .map_err(|e| CredentialStoreError::Internal(e.to_string()))?;
    mac.update(token.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Keyed store of active refresh sessions with native TTL expiry.
#[async_trait::async_trait]
pub trait CredentialStore: Send + Sync {
    /// Digest of a token string; raw tokens are never persisted.
    fn digest(&self, token: &str) -> Result<String, CredentialStoreError>;

    /// Write a record under `key`, expiring after `ttl_secs`. TTL must equal
    /// the refresh token's remaining lifetime.
    async fn put(
        &self,
        key: &SessionKey,
        record: &CredentialRecord,
        ttl_secs: u64,
    ) -> Result<(), CredentialStoreError>;

    async fn get(&self, key: &SessionKey) -> Result<Option<CredentialRecord>, CredentialStoreError>;

    /// Unconditional delete. True iff a record existed and was removed.
    async fn delete(&self, key: &SessionKey) -> Result<bool, CredentialStoreError>;

    /// Atomic compare-and-delete: remove the record only if its stored
    /// digest equals `digest_hex`. True iff a matching record was removed.
    /// Concurrent callers racing on one key see at most one `true`.
    async fn delete_if_matches(
        &self,
        key: &SessionKey,
        digest_hex: &str,
    ) -> Result<bool, CredentialStoreError>;
}
