use crate::logger::*;
use redis::aio::ConnectionManager;

/// How to reach the backing store, resolved once at startup.
#[derive(Debug, Clone)]
pub enum ConnectionSpec {
    ByUrl(String),
    ByHostPort {
        host: String,
        port: u16,
        username: Option<String>,
        password: Option<String>,
    },
}

impl ConnectionSpec {
    pub fn url(&self) -> String {
        match self {
            ConnectionSpec::ByUrl(url) => url.clone(),
            ConnectionSpec::ByHostPort {
                host,
                port,
                username,
                password,
            } => {
                let auth = match (username, password) {
                    (Some(u), Some(p)) => format!("{}:{}@", u, p),
                    (None, Some(p)) => format!(":{}@", p),
                    (Some(u), None) => format!("{}@", u),
                    (None, None) => String::new(),
                };
                format!("redis://{}{}:{}", auth, host, port)
            }
        }
    }
}

/// Open a managed connection. The manager owns reconnection; callers only
/// see `Unavailable` errors while it is re-establishing.
pub async fn connect(spec: &ConnectionSpec) -> anyhow::Result<ConnectionManager> {
    let client = redis::Client::open(spec.url())?;
    let manager = client.get_connection_manager().await?;
    info!("credential store connected");
    Ok(manager)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_port_spec_builds_url() {
        let spec = ConnectionSpec::ByHostPort {
            host: "redis.internal".to_string(),
            port: 6380,
            username: None,
            password: Some("secret".to_string()),
        };
        assert_eq!(spec.url(), "redis://:secret@redis.internal:6380");

        let bare = ConnectionSpec::ByHostPort {
            host: "localhost".to_string(),
            port: 6379,
            username: None,
            password: None,
        };
        assert_eq!(bare.url(), "redis://localhost:6379");
    }
}
