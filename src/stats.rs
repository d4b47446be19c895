//! Best-effort usage counters.
//!
//! A single aggregate record under the `stats` key, read-modify-write on
//! every generation call. Counter updates must never fail the request that
//! triggered them: store errors are logged and swallowed, reads degrade to
//! a zeroed default. Concurrent updates can lose an increment; counters are
//! approximate telemetry, not billing.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::store::KvStore;

const STATS_KEY: &str = "stats";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Text,
    Image,
    Code,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UsageStats {
    #[serde(rename = "totalRequests")]
    pub total_requests: u64,
    #[serde(rename = "textRequests")]
    pub text_requests: u64,
    #[serde(rename = "imageRequests")]
    pub image_requests: u64,
    #[serde(rename = "codeRequests")]
    pub code_requests: u64,
    /// ISO-8601 timestamp of the last update
    #[serde(rename = "lastUpdated")]
    #[schema(example = "2025-01-01T00:00:00Z")]
    pub last_updated: String,
}

impl UsageStats {
    pub fn zeroed() -> Self {
        Self {
            total_requests: 0,
            text_requests: 0,
            image_requests: 0,
            code_requests: 0,
            last_updated: now_iso(),
        }
    }
}

fn now_iso() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

pub struct StatsService {
    kv: Arc<dyn KvStore>,
}

impl StatsService {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }

    /// Increment the total and per-category counters. Best effort: any
    /// store failure is logged and swallowed.
    pub async fn record(&self, category: Category) {
        let mut stats = match self.read().await {
            Ok(stats) => stats,
            Err(e) => {
                tracing::warn!(error = %e, "could not read usage stats; skipping update");
                return;
            }
        };

        stats.total_requests += 1;
        match category {
            Category::Text => stats.text_requests += 1,
            Category::Image => stats.image_requests += 1,
            Category::Code => stats.code_requests += 1,
        }
        stats.last_updated = now_iso();

        if let Err(e) = self.write(&stats).await {
            tracing::warn!(error = %e, "could not write usage stats");
        }
    }

    /// Current aggregate, degrading to a zeroed default on any failure.
    pub async fn fetch(&self) -> UsageStats {
        match self.read().await {
            Ok(stats) => stats,
            Err(e) => {
                tracing::warn!(error = %e, "could not fetch usage stats; returning defaults");
                UsageStats::zeroed()
            }
        }
    }

    /// Write back a zeroed aggregate (best effort) and return it.
    pub async fn reset(&self) -> UsageStats {
        let stats = UsageStats::zeroed();
        if let Err(e) = self.write(&stats).await {
            tracing::warn!(error = %e, "could not persist stats reset");
        }
        stats
    }

    async fn read(&self) -> anyhow::Result<UsageStats> {
        match self.kv.get(STATS_KEY).await? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(UsageStats::zeroed()),
        }
    }

    async fn write(&self, stats: &UsageStats) -> anyhow::Result<()> {
        let raw = serde_json::to_string(stats)?;
        self.kv.put(STATS_KEY, &raw, None).await?;
        Ok(())
    }
}
