//! Reclast gateway entry point.
//!
//! ```text
//! ┌──────────┐    ┌───────────┐    ┌──────────┐    ┌──────────┐
//! │  Config  │───▶│ Validator │───▶│ AuthGate │───▶│ Backend  │
//! │  (YAML)  │    │  (chain)  │    │ (tokens) │    │ (HTTP)   │
//! └──────────┘    └───────────┘    └──────────┘    └──────────┘
//! ```

use std::sync::Arc;

use reclast::gateway::{run_server, state::AppState};
use reclast::inference::backend_from_config;
use reclast::mailer::LogMailer;
use reclast::store::MemoryKv;

fn get_env() -> String {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if (args[i] == "--env" || args[i] == "-e") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }
    "dev".to_string()
}

/// Get port override from command line (--port argument)
fn get_port_override() -> Option<u16> {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if args[i] == "--port" && i + 1 < args.len() {
            return args[i + 1].parse().ok();
        }
    }
    None
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = get_env();
    let config = reclast::AppConfig::load(&env)?;
    let _log_guard = reclast::logging::init_logging(&config);

    tracing::info!("starting reclast gateway in {} mode", env);

    let port = get_port_override().unwrap_or(config.gateway.port);

    let kv = Arc::new(MemoryKv::new());
    let backend = backend_from_config(&config.inference)?;
    let mailer = Arc::new(LogMailer);

    // Fails here when no signing secret is configured: the gateway refuses
    // to start rather than fall back to a predictable secret.
    let state = Arc::new(AppState::from_config(&config, kv, backend, mailer)?);

    if state.allowlist.is_empty() {
        tracing::warn!("allow-list is empty: no email can authenticate");
    }

    run_server(&config.gateway.host, port, state).await
}
