use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use crate::auth::allowlist::{AllowList, CredentialSet};
use crate::auth::code_store::CodeStore;
use crate::auth::token::TokenCodec;
use crate::config::{AppConfig, ConfigError};
use crate::inference::InferenceBackend;
use crate::mailer::Mailer;
use crate::stats::StatsService;
use crate::store::KvStore;

/// Shared application state, one instance per process.
///
/// All configuration is explicit here; no component reads ambient globals.
pub struct AppState {
    pub codec: TokenCodec,
    pub allowlist: AllowList,
    pub credentials: CredentialSet,
    /// Static service API keys (`reclast_` prefix). Empty set disables the
    /// API-key credential path entirely.
    pub api_keys: HashSet<String>,
    pub codes: CodeStore,
    pub stats: StatsService,
    pub backend: Arc<dyn InferenceBackend>,
    pub mailer: Arc<dyn Mailer>,
}

impl AppState {
    pub fn from_config(
        config: &AppConfig,
        kv: Arc<dyn KvStore>,
        backend: Arc<dyn InferenceBackend>,
        mailer: Arc<dyn Mailer>,
    ) -> Result<Self, ConfigError> {
        let auth = &config.auth;
        let api_keys: HashSet<String> = auth
            .api_keys
            .iter()
            .filter(|k| {
                let ok = k.starts_with("reclast_");
                if !ok {
                    tracing::warn!("ignoring API key without reclast_ prefix");
                }
                ok
            })
            .cloned()
            .collect();

        Ok(Self {
            codec: TokenCodec::from_config(auth)?,
            allowlist: AllowList::from_config(auth.allowed_emails.as_deref()),
            credentials: CredentialSet::from_config(auth.user_credentials.as_deref()),
            api_keys,
            codes: CodeStore::with_ttl(kv.clone(), Duration::from_secs(auth.code_ttl_secs)),
            stats: StatsService::new(kv),
            backend,
            mailer,
        })
    }
}
