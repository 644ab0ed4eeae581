use crate::api::v1::{BearerHeaderExtractor, TokenExtractor};
use crate::application_impl::{
    EchoClaimsResolver, FakeSessionService, JwtConfig, JwtHs256Codec, RealSessionService,
};
use crate::application_port::{
    ClaimsMapper, ClaimsResolver, IdentityValidator, RevokePolicy, SessionService, TokenCodec,
};
use crate::domain_port::CredentialStore;
use crate::infra_memory::MemoryCredentialStore;
use crate::infra_redis::{ConnectionSpec, RedisCredentialStore, connect};
use crate::logger::*;
use crate::settings::{Settings, Store};
use std::sync::Arc;
use std::time::Duration;

/// The capabilities a host application injects: business validation per
/// route kind, claims mapping, and the token transport. Resolved once at
/// construction, never mutated afterwards.
pub struct AuthHooks {
    pub login_validator: Arc<dyn IdentityValidator>,
    pub register_validator: Arc<dyn IdentityValidator>,
    pub claims_mapper: Arc<dyn ClaimsMapper>,
    pub claims_resolver: Arc<dyn ClaimsResolver>,
    pub extractor: Arc<dyn TokenExtractor>,
}

impl AuthHooks {
    pub fn new(
        login_validator: Arc<dyn IdentityValidator>,
        register_validator: Arc<dyn IdentityValidator>,
        claims_mapper: Arc<dyn ClaimsMapper>,
    ) -> Self {
        Self {
            login_validator,
            register_validator,
            claims_mapper,
            claims_resolver: Arc::new(EchoClaimsResolver),
            extractor: Arc::new(BearerHeaderExtractor),
        }
    }

    pub fn with_claims_resolver(mut self, resolver: Arc<dyn ClaimsResolver>) -> Self {
        self.claims_resolver = resolver;
        self
    }

    pub fn with_extractor(mut self, extractor: Arc<dyn TokenExtractor>) -> Self {
        self.extractor = extractor;
        self
    }
}

pub struct Server {
    pub session_service: Arc<dyn SessionService>,
    pub login_validator: Arc<dyn IdentityValidator>,
    pub register_validator: Arc<dyn IdentityValidator>,
    pub claims_resolver: Arc<dyn ClaimsResolver>,
    pub extractor: Arc<dyn TokenExtractor>,
}

impl Server {
    pub async fn try_new(settings: &Settings, hooks: AuthHooks) -> anyhow::Result<Self> {
        let digest_key = env_secret("TOKEN_DIGEST_KEY", "dev-digest-key");

        let credential_store: Arc<dyn CredentialStore> = match settings.store.backend.as_str() {
            "memory" => Arc::new(MemoryCredentialStore::new(digest_key)),
            "redis" => {
                let spec = connection_spec(&settings.store)?;
                let manager = connect(&spec).await?;
                Arc::new(RedisCredentialStore::new(
                    manager,
                    settings.store.key_prefix.clone(),
                    digest_key,
                ))
            }
            other => return Err(anyhow::anyhow!("Unknown store backend: {}", other)),
        };

        let token_codec: Arc<dyn TokenCodec> = Arc::new(JwtHs256Codec::new(JwtConfig {
            issuer: settings.jwt.issuer.clone(),
            audience: settings.jwt.audience.clone(),
            access_ttl: Duration::from_secs(settings.jwt.access_ttl_secs),
            refresh_ttl: Duration::from_secs(settings.jwt.refresh_ttl_secs),
            access_secret: env_secret("JWT_ACCESS_TOKEN_SECRET", "dev-access-secret"),
            refresh_secret: env_secret("JWT_REFRESH_TOKEN_SECRET", "dev-refresh-secret"),
        }));

        let revoke_policy = match settings.auth.revoke_policy.as_str() {
            "strict" => RevokePolicy::Strict,
            "idempotent" => RevokePolicy::Idempotent,
            other => return Err(anyhow::anyhow!("Unknown revoke policy: {}", other)),
        };

        let session_service: Arc<dyn SessionService> = match settings.auth.backend.as_str() {
            "fake" => Arc::new(FakeSessionService::new()),
            "real" => Arc::new(RealSessionService::new(
                token_codec,
                credential_store,
                hooks.claims_mapper.clone(),
                revoke_policy,
            )),
            other => return Err(anyhow::anyhow!("Unknown auth backend: {}", other)),
        };

        info!("server started");

        Ok(Self {
            session_service,
            login_validator: hooks.login_validator,
            register_validator: hooks.register_validator,
            claims_resolver: hooks.claims_resolver,
            extractor: hooks.extractor,
        })
    }
}

fn env_secret(var: &str, dev_fallback: &str) -> Vec<u8> {
    std::env::var(var)
        .unwrap_or_else(|_| dev_fallback.to_string())
        .into_bytes()
}

fn connection_spec(store: &Store) -> anyhow::Result<ConnectionSpec> {
    if let Some(url) = &store.url {
        return Ok(ConnectionSpec::ByUrl(url.clone()));
    }
    match (&store.host, store.port) {
        (Some(host), Some(port)) => Ok(ConnectionSpec::ByHostPort {
            host: host.clone(),
            port,
            username: store.username.clone(),
            password: store.password.clone(),
        }),
        _ => Err(anyhow::anyhow!(
            "store settings need either url or host + port"
        )),
    }
}
