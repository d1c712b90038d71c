//! Configuration loading for the CLI
//!
//! Layers the configuration file, the environment and the command-line flags
//! in that order, then builds the API client the commands share.

use crate::args::CliArgs;
use anyhow::{Context, Result};
use sierpinski_api_client::{ApiClient, ApiClientHooks};
use sierpinski_config::DashboardConfig;
use tracing::debug;

/// Loads the effective configuration: defaults, then the file (if present),
/// then `SIERPINSKI_API_URL`, then `--api-url`.
pub fn load_config(args: &CliArgs) -> Result<DashboardConfig> {
    let mut config = DashboardConfig::load(&args.config)
        .with_context(|| format!("failed to load {}", args.config.display()))?;
    config.apply_env();
    apply_args(&mut config, args);
    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn apply_args(config: &mut DashboardConfig, args: &CliArgs) {
    if let Some(url) = &args.api_url {
        config.api.base_url = url.clone();
    }
    if let Some(level) = args.verbose {
        config.logging.level = level.as_str().to_string();
    }
}

/// Builds the client with a per-request debug log hook.
pub fn build_client(config: &DashboardConfig) -> Result<ApiClient> {
    let base_url = config.api.base_url()?;
    let hooks = ApiClientHooks::new().on_request(|outcome| {
        debug!(
            target: "sierpinski",
            method = %outcome.method,
            endpoint = %outcome.endpoint,
            status = ?outcome.status,
            elapsed_ms = outcome.elapsed.as_millis() as u64,
            success = outcome.success,
            "api request"
        );
    });
    ApiClient::builder(base_url)
        .timeout(config.api.timeout())
        .hooks(hooks)
        .build()
        .context("failed to build API client")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::LogLevel;
    use clap::Parser;
    use std::time::Duration;
    use tempfile::TempDir;

    fn args_for(dir: &TempDir, extra: &[&str]) -> CliArgs {
        let path = dir.path().join("sierpinski.toml");
        let mut argv = vec!["sierpinski".to_string(), "--config".to_string(), path.display().to_string()];
        argv.extend(extra.iter().map(|s| s.to_string()));
        CliArgs::parse_from(argv)
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let mut args = args_for(&dir, &[]);
        args.api_url = None;
        let mut config = DashboardConfig::load(&args.config).unwrap();
        apply_args(&mut config, &args);
        assert_eq!(config, DashboardConfig::default());
    }

    #[test]
    fn test_flags_override_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("sierpinski.toml"),
            "[api]\nbase_url = \"http://file.example:8001\"\n[logging]\nlevel = \"warn\"\n",
        )
        .unwrap();

        let args = args_for(&dir, &["--api-url", "http://flag.example:9000", "--verbose", "trace"]);
        let config = load_config(&args).unwrap();
        assert_eq!(config.api.base_url, "http://flag.example:9000");
        assert_eq!(config.logging.level, "trace");
        assert_eq!(args.verbose, Some(LogLevel::Trace));
    }

    #[test]
    fn test_invalid_url_is_rejected() {
        let dir = TempDir::new().unwrap();
        let args = args_for(&dir, &["--api-url", "ftp://example.com"]);
        assert!(load_config(&args).is_err());
    }

    #[test]
    fn test_client_uses_configured_timeout() {
        let mut config = DashboardConfig::default();
        config.api.timeout_secs = 3;
        let client = build_client(&config).unwrap();
        assert_eq!(client.request_timeout(), Duration::from_secs(3));
        assert_eq!(client.base_url().as_str(), "http://localhost:8001/");
    }
}
