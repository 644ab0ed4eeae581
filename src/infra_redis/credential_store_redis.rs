use crate::domain_model::{CredentialRecord, SessionKey, TokenType};
use crate::domain_port::{CredentialStore, CredentialStoreError, digest_hex};
use chrono::DateTime;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Script};
use std::collections::HashMap;

const CONSUME_IF_MATCHES: &str = include_str!("consume.lua");

pub struct RedisCredentialStore {
    conn: ConnectionManager,
    prefix: String,
    digest_key: Vec<u8>,
}

impl RedisCredentialStore {
    pub fn new(conn: ConnectionManager, prefix: impl Into<String>, digest_key: Vec<u8>) -> Self {
        RedisCredentialStore {
            conn,
            prefix: prefix.into(),
            digest_key,
        }
    }

    fn key(&self, key: &SessionKey) -> String {
        format!("{}:{}", self.prefix, key)
    }
}

fn store_err(e: redis::RedisError) -> CredentialStoreError {
    CredentialStoreError::Unavailable(e.to_string())
}

fn parse_record(fields: HashMap<String, String>) -> Result<CredentialRecord, CredentialStoreError> {
    let field = |name: &str| {
        fields
            .get(name)
            .cloned()
            .ok_or_else(|| CredentialStoreError::Internal(format!("record missing field {}", name)))
    };
    let token_type = field("type")?
        .parse::<TokenType>()
        .map_err(CredentialStoreError::Internal)?;
    let exp = field("exp")?
        .parse::<i64>()
        .map_err(|e| CredentialStoreError::Internal(e.to_string()))?;
    let expires_at = DateTime::from_timestamp(exp, 0)
        .ok_or_else(|| CredentialStoreError::Internal(format!("invalid expiry {}", exp)))?;
    Ok(CredentialRecord {
        subject: field("sub")?,
        digest_hex: field("digest")?,
        token_type,
        expires_at,
    })
}

#[async_trait::async_trait]
impl CredentialStore for RedisCredentialStore {
    fn digest(&self, token: &str) -> Result<String, CredentialStoreError> {
        digest_hex(&self.digest_key, token)
    }

    async fn put(
        &self,
        key: &SessionKey,
        record: &CredentialRecord,
        ttl_secs: u64,
    ) -> Result<(), CredentialStoreError> {
        let key = self.key(key);
        let mut conn = self.conn.clone();
        let fields = [
            ("sub", record.subject.clone()),
            ("digest", record.digest_hex.clone()),
            ("type", record.token_type.to_string()),
            ("exp", record.expires_at.timestamp().to_string()),
        ];
        let _: () = conn
            .hset_multiple(&key, &fields)
            .await
            .map_err(store_err)?;
        let _: () = conn
            .expire(&key, ttl_secs as i64)
            .await
            .map_err(store_err)?;
        Ok(())
    }

    async fn get(
        &self,
        key: &SessionKey,
    ) -> Result<Option<CredentialRecord>, CredentialStoreError> {
        let key = self.key(key);
        let mut conn = self.conn.clone();
        let fields: HashMap<String, String> = conn.hgetall(&key).await.map_err(store_err)?;
        if fields.is_empty() {
            return Ok(None);
        }
        parse_record(fields).map(Some)
    }

    async fn delete(&self, key: &SessionKey) -> Result<bool, CredentialStoreError> {
        let key = self.key(key);
        let mut conn = self.conn.clone();
        let removed: i64 = conn.del(&key).await.map_err(store_err)?;
        Ok(removed > 0)
    }

    async fn delete_if_matches(
        &self,
        key: &SessionKey,
        digest_hex: &str,
    ) -> Result<bool, CredentialStoreError> {
        let key = self.key(key);
        let mut conn = self.conn.clone();
        let script = Script::new(CONSUME_IF_MATCHES);
        let consumed: i64 = script
            .key(&key)
            .arg(digest_hex)
            .invoke_async(&mut conn)
            .await
            .map_err(store_err)?;
        Ok(consumed == 1)
    }
}
