//! dexd: Balloon DEX devnet daemon
//!
//! Loads configuration, provisions the devnet and serves the HTTP API.

use std::path::Path;

use anyhow::Context;
use dex_api::AppState;
use dex_core::AppConfig;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_DIRECTIVES: &str = "info,dexd_lib=debug,dex=debug,dex_api=debug";

/// Read a JSON config file, or fall back to the built-in devnet defaults
pub fn load_config(path: Option<&Path>) -> anyhow::Result<AppConfig> {
    let Some(path) = path else {
        return Ok(AppConfig::default());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading config file {}", path.display()))?;
    AppConfig::from_json(&json).with_context(|| format!("parsing config file {}", path.display()))
}

/// Install the global tracing subscriber. `RUST_LOG` overrides the defaults.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_DIRECTIVES));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Provision the devnet and serve until the listener fails
pub async fn run(config: AppConfig) -> anyhow::Result<()> {
    tracing::info!("Starting Balloon DEX on {}", config.chain);

    let state = AppState::provision(config).context("provisioning devnet")?;
    {
        let devnet = state.devnet().await;
        tracing::info!("Deployment:\n{}", devnet.deployment.to_json()?);
    }

    dex_api::start_server(state)
        .await
        .context("running API server")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dex_core::{ether, Chain};

    #[test]
    fn test_defaults_without_path() {
        let config = load_config(None).unwrap();
        assert_eq!(config.chain, Chain::Localhost);
        assert_eq!(config.deployment.init_value, ether(5));
    }

    #[test]
    fn test_load_partial_config() {
        let path = std::env::temp_dir().join(format!("dexd-config-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "chain": "sepolia", "api_port": 9000 }"#).unwrap();

        let config = load_config(Some(&path)).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.chain, Chain::Sepolia);
        assert_eq!(config.api_port, 9000);
        assert_eq!(config.fee.numerator, 997);
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = load_config(Some(Path::new("/nonexistent/dexd.json"))).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/dexd.json"));
    }

    #[test]
    fn test_invalid_fee_rejected() {
        let path = std::env::temp_dir().join(format!("dexd-bad-fee-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "fee": { "numerator": 1001, "denominator": 1000 } }"#).unwrap();

        let result = load_config(Some(&path));
        std::fs::remove_file(&path).unwrap();
        assert!(result.is_err());
    }
}
