mod identity;
mod session_service;
mod token_codec;

pub use identity::*;
pub use session_service::*;
pub use token_codec::*;
