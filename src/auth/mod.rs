//! Authentication pipeline: allow-list, one-time codes, signed session
//! tokens, cookies, and the gate middleware for protected routes.

pub mod allowlist;
pub mod code_store;
pub mod cookie;
pub mod middleware;
pub mod session;
pub mod token;

pub use allowlist::{AllowList, CredentialSet};
pub use code_store::CodeStore;
pub use middleware::require_auth;
pub use session::Session;
pub use token::TokenCodec;
