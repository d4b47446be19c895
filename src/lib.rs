//! Reclast: HTTP gateway for hosted AI inference.
//!
//! A thin facade that routes text/image/code generation requests to a
//! delegated backend, gated by an authentication pipeline with two
//! strategies (one-time email codes as the canonical flow, static
//! credentials as an alternative mode), plus best-effort usage counters.
//!
//! # Modules
//!
//! - [`config`] - YAML configuration with env-var overrides for secrets
//! - [`logging`] - tracing setup (rolling file + stdout)
//! - [`store`] - key-value store trait with per-key TTL
//! - [`auth`] - allow-list, verification codes, tokens, gate middleware
//! - [`gateway`] - axum router, validation chain, handlers
//! - [`stats`] - best-effort usage counters
//! - [`inference`] - delegated AI backend boundary
//! - [`mailer`] - verification-code delivery boundary

pub mod auth;
pub mod config;
pub mod gateway;
pub mod inference;
pub mod logging;
pub mod mailer;
pub mod stats;
pub mod store;

// Convenient re-exports at crate root
pub use auth::{AllowList, CodeStore, CredentialSet, Session, TokenCodec};
pub use config::AppConfig;
pub use gateway::state::AppState;
pub use store::{KvStore, MemoryKv, StoreError};
