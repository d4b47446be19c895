use serde::{Deserialize, Serialize};
use std::fs;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        source: serde_yaml::Error,
    },
    #[error("jwt_secret is not configured; refusing to issue or verify tokens")]
    MissingJwtSecret,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub log_dir: String,
    pub log_file: String,
    pub use_json: bool,
    pub rotation: String,
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub inference: InferenceConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
}

/// Authentication configuration.
///
/// Secret material (`jwt_secret`, `allowed_emails`, `user_credentials`,
/// `api_keys`) is normally injected via `RECLAST_*` environment variables
/// rather than committed to the YAML file.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct AuthConfig {
    /// HS256 signing secret. Startup fails when absent.
    #[serde(default)]
    pub jwt_secret: Option<String>,
    /// Comma-separated allow-listed emails. Absent or empty denies everyone.
    #[serde(default)]
    pub allowed_emails: Option<String>,
    /// Comma-separated `user:pass` pairs for the alternative login mode.
    #[serde(default)]
    pub user_credentials: Option<String>,
    /// Static service API keys. Each must carry the `reclast_` prefix.
    #[serde(default)]
    pub api_keys: Vec<String>,
    /// Verification code lifetime in seconds.
    #[serde(default = "default_code_ttl_secs")]
    pub code_ttl_secs: u64,
    /// Session token lifetime in seconds.
    #[serde(default = "default_token_lifetime_secs")]
    pub token_lifetime_secs: i64,
}

fn default_code_ttl_secs() -> u64 {
    600
}

fn default_token_lifetime_secs() -> i64 {
    24 * 60 * 60
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct InferenceConfig {
    /// "echo" for the local stub, "http" for a real backend.
    pub mode: String,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub api_token: Option<String>,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            mode: "echo".to_string(),
            base_url: None,
            api_token: None,
        }
    }
}

impl AppConfig {
    pub fn load(env: &str) -> Result<Self, ConfigError> {
        let config_path = format!("config/{}.yaml", env);
        let content = fs::read_to_string(&config_path).map_err(|source| ConfigError::Read {
            path: config_path.clone(),
            source,
        })?;
        let mut config: AppConfig =
            serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
                path: config_path,
                source,
            })?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Environment variables win over the YAML file for secret material.
    fn apply_env_overrides(&mut self) {
        if let Ok(secret) = std::env::var("RECLAST_JWT_SECRET") {
            if !secret.is_empty() {
                self.auth.jwt_secret = Some(secret);
            }
        }
        if let Ok(emails) = std::env::var("RECLAST_ALLOWED_EMAILS") {
            if !emails.is_empty() {
                self.auth.allowed_emails = Some(emails);
            }
        }
        if let Ok(creds) = std::env::var("RECLAST_USER_CREDENTIALS") {
            if !creds.is_empty() {
                self.auth.user_credentials = Some(creds);
            }
        }
        if let Ok(keys) = std::env::var("RECLAST_API_KEYS") {
            if !keys.is_empty() {
                self.auth.api_keys = keys
                    .split(',')
                    .map(|k| k.trim().to_string())
                    .filter(|k| !k.is_empty())
                    .collect();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_minimal_yaml() {
        let yaml = r#"
log_level: info
log_dir: logs
log_file: reclast.log
use_json: false
rotation: daily
gateway:
  host: 127.0.0.1
  port: 8787
"#;
        let config: AppConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.gateway.port, 8787);
        assert_eq!(config.auth.code_ttl_secs, 600);
        assert_eq!(config.auth.token_lifetime_secs, 86400);
        assert!(config.auth.jwt_secret.is_none());
        assert_eq!(config.inference.mode, "echo");
    }

    #[test]
    fn parse_auth_section() {
        let yaml = r#"
log_level: info
log_dir: logs
log_file: reclast.log
use_json: false
rotation: never
gateway:
  host: 0.0.0.0
  port: 8080
auth:
  jwt_secret: test-secret
  allowed_emails: "a@b.com, c@d.com"
  api_keys: ["reclast_abc123"]
  code_ttl_secs: 60
"#;
        let config: AppConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.auth.jwt_secret.as_deref(), Some("test-secret"));
        assert_eq!(config.auth.code_ttl_secs, 60);
        assert_eq!(config.auth.api_keys.len(), 1);
    }
}
