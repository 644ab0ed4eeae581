mod identity_impl;
mod session_service_fake;
mod session_service_impl;
mod token_codec_impl;

pub use identity_impl::*;
pub use session_service_fake::*;
pub use session_service_impl::*;
pub use token_codec_impl::*;
