//! One-time email verification codes.
//!
//! Lifecycle: issue (overwriting any live code for the same email) →
//! consume-on-match or expiry, whichever comes first. A wrong guess does
//! not burn the stored code; the legitimate code stays usable until its
//! TTL runs out or it is correctly consumed.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::store::{KvStore, StoreError};

/// Default code lifetime: 10 minutes.
pub const DEFAULT_CODE_TTL: Duration = Duration::from_secs(600);

const CODE_LEN: usize = 6;

#[derive(Debug, Serialize, Deserialize)]
struct StoredCode {
    code: String,
    email: String,
    expires_at_ms: i64,
}

pub struct CodeStore {
    kv: Arc<dyn KvStore>,
    ttl: Duration,
}

impl CodeStore {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self::with_ttl(kv, DEFAULT_CODE_TTL)
    }

    pub fn with_ttl(kv: Arc<dyn KvStore>, ttl: Duration) -> Self {
        Self { kv, ttl }
    }

    fn key(email: &str) -> String {
        format!("code:{}", email.trim().to_lowercase())
    }

    /// Generate and persist a fresh 6-digit code for `email`, invalidating
    /// any previously issued code for the same address.
    pub async fn issue(&self, email: &str) -> Result<String, StoreError> {
        let code: String = {
            let mut rng = rand::thread_rng();
            (0..CODE_LEN)
                .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
                .collect()
        };

        let stored = StoredCode {
            code: code.clone(),
            email: email.trim().to_lowercase(),
            expires_at_ms: chrono::Utc::now().timestamp_millis() + self.ttl.as_millis() as i64,
        };
        let payload = serde_json::to_string(&stored)
            .map_err(|e| StoreError::Corrupt(e.to_string()))?;

        // KV-level TTL keeps unconsumed codes self-cleaning
        self.kv.put(&Self::key(email), &payload, Some(self.ttl)).await?;

        tracing::debug!(email = %stored.email, "verification code issued");
        Ok(code)
    }

    /// Check `supplied` against the stored code.
    ///
    /// - no stored code → false
    /// - stored code expired → delete it, false
    /// - match → delete it (single use), true
    /// - mismatch → false, stored code left intact
    pub async fn consume(&self, email: &str, supplied: &str) -> Result<bool, StoreError> {
        let key = Self::key(email);
        let Some(payload) = self.kv.get(&key).await? else {
            return Ok(false);
        };

        let stored: StoredCode = serde_json::from_str(&payload)
            .map_err(|e| StoreError::Corrupt(e.to_string()))?;

        if stored.expires_at_ms <= chrono::Utc::now().timestamp_millis() {
            self.kv.delete(&key).await?;
            return Ok(false);
        }

        if stored.code == supplied.trim() {
            self.kv.delete(&key).await?;
            return Ok(true);
        }

        Ok(false)
    }
}
