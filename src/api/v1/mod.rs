mod error;
mod extract;
mod handler;
mod router;

pub use error::{GatewayError, recover_error};
pub use extract::*;
pub use router::routes;
