use crate::domain_model::{CredentialRecord, SessionKey};
use crate::domain_port::{CredentialStore, CredentialStoreError, digest_hex};
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;

struct StoredEntry {
    record: CredentialRecord,
    expires_at: DateTime<Utc>,
}

impl StoredEntry {
    fn expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

/// In-process credential store. Expiry is enforced on read; the conditional
/// delete rides on DashMap's per-key atomicity.
pub struct MemoryCredentialStore {
    entries: DashMap<String, StoredEntry>,
    digest_key: Vec<u8>,
}

impl MemoryCredentialStore {
    pub fn new(digest_key: Vec<u8>) -> Self {
        Self {
            entries: DashMap::new(),
            digest_key,
        }
    }
}

#[async_trait::async_trait]
impl CredentialStore for MemoryCredentialStore {
    fn digest(&self, token: &str) -> Result<String, CredentialStoreError> {
        digest_hex(&self.digest_key, token)
    }

    async fn put(
        &self,
        key: &SessionKey,
        record: &CredentialRecord,
        ttl_secs: u64,
    ) -> Result<(), CredentialStoreError> {
        let entry = StoredEntry {
            record: record.clone(),
            expires_at: Utc::now() + Duration::seconds(ttl_secs as i64),
        };
        self.entries.insert(key.to_string(), entry);
        Ok(())
    }

    async fn get(
        &self,
        key: &SessionKey,
    ) -> Result<Option<CredentialRecord>, CredentialStoreError> {
        match self.entries.get(&key.to_string()) {
            Some(entry) if !entry.expired() => Ok(Some(entry.record.clone())),
            _ => Ok(None),
        }
    }

    async fn delete(&self, key: &SessionKey) -> Result<bool, CredentialStoreError> {
        let removed = self.entries.remove(&key.to_string());
        Ok(matches!(removed, Some((_, entry)) if !entry.expired()))
    }

    async fn delete_if_matches(
        &self,
        key: &SessionKey,
        digest_hex: &str,
    ) -> Result<bool, CredentialStoreError> {
        let removed = self
            .entries
            .remove_if(&key.to_string(), |_, entry| {
                entry.record.digest_hex == digest_hex && !entry.expired()
            });
        Ok(removed.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain_model::{SessionId, TokenType};

    fn store() -> MemoryCredentialStore {
        MemoryCredentialStore::new(b"digest-key".to_vec())
    }

    fn key() -> SessionKey {
        SessionKey {
            subject: "u1".to_string(),
            session_id: SessionId::generate(),
        }
    }

    fn record(store: &MemoryCredentialStore, token: &str) -> CredentialRecord {
        CredentialRecord {
            subject: "u1".to_string(),
            digest_hex: store.digest(token).unwrap(),
            token_type: TokenType::Refresh,
            expires_at: Utc::now() + Duration::hours(1),
        }
    }

    #[tokio::test]
    async fn put_then_get_round_trips() {
        let store = store();
        let key = key();
        let record = record(&store, "token-1");

        store.put(&key, &record, 3600).await.unwrap();
        assert_eq!(store.get(&key).await.unwrap(), Some(record));
    }

    #[tokio::test]
    async fn expired_entries_read_as_absent() {
        let store = store();
        let key = key();
        let record = record(&store, "token-1");

        store.put(&key, &record, 0).await.unwrap();
        assert_eq!(store.get(&key).await.unwrap(), None);
        assert!(
            !store
                .delete_if_matches(&key, &record.digest_hex)
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn delete_reports_prior_existence() {
        let store = store();
        let key = key();
        let record = record(&store, "token-1");

        store.put(&key, &record, 3600).await.unwrap();
        assert!(store.delete(&key).await.unwrap());
        assert!(!store.delete(&key).await.unwrap());
    }

    #[tokio::test]
    async fn conditional_delete_requires_matching_digest() {
        let store = store();
        let key = key();
        let record = record(&store, "token-1");
        store.put(&key, &record, 3600).await.unwrap();

        let wrong = store.digest("token-2").unwrap();
        assert!(!store.delete_if_matches(&key, &wrong).await.unwrap());
        assert!(store.get(&key).await.unwrap().is_some());

        assert!(
            store
                .delete_if_matches(&key, &record.digest_hex)
                .await
                .unwrap()
        );
        assert_eq!(store.get(&key).await.unwrap(), None);
    }
}
