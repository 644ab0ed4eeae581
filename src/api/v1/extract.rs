use warp::http::HeaderMap;
use warp::http::header::{AUTHORIZATION, COOKIE};

/// Strategy that locates the raw credential string inside a request.
/// Swapping the transport never touches the session service or handlers.
pub trait TokenExtractor: Send + Sync {
    fn extract(&self, headers: &HeaderMap) -> Option<String>;
}

/// `Authorization: Bearer <token>`, the default transport.
pub struct BearerHeaderExtractor;

impl TokenExtractor for BearerHeaderExtractor {
    fn extract(&self, headers: &HeaderMap) -> Option<String> {
        let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
        value.strip_prefix("Bearer ").map(|t| t.trim().to_string())
    }
}

/// Reads the token out of a named cookie instead.
pub struct CookieExtractor {
    name: String,
}

impl CookieExtractor {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl TokenExtractor for CookieExtractor {
    fn extract(&self, headers: &HeaderMap) -> Option<String> {
        let raw = headers.get(COOKIE)?.to_str().ok()?;
        raw.split(';').find_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            (name == self.name).then(|| value.to_string())
        })
    }
}
