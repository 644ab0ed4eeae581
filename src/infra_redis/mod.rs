mod connection;
mod credential_store_redis;

pub use connection::*;
pub use credential_store_redis::*;
