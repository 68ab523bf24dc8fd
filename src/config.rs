//! Bridge configuration.
//!
//! Loads from a TOML file, then applies `ORDERBRIDGE_*` environment
//! overrides. The hosting shim resolves the file path and passes the final
//! struct in once; nothing here is global.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::error::{BridgeError, Result};

/// Which connectivity back-end the engine should own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdapterKind {
    Simulator,
    Stub,
    Worker,
}

impl AdapterKind {
    fn parse(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "simulator" => Ok(AdapterKind::Simulator),
            "stub" => Ok(AdapterKind::Stub),
            "worker" => Ok(AdapterKind::Worker),
            other => Err(BridgeError::Config(format!("unknown adapter: {other}"))),
        }
    }
}

/// Top-level bridge configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BridgeConfig {
    /// Back-end selection; simulator unless configured otherwise.
    #[serde(default = "default_adapter")]
    pub adapter: AdapterKind,

    /// Unix-socket path used as the channel to the worker process.
    #[serde(default = "default_socket_path")]
    pub socket_path: String,

    /// Path to the worker executable.
    #[serde(default = "default_worker_path")]
    pub worker_path: String,

    /// When false, never spawn the worker; attach to an externally managed one.
    #[serde(default = "default_autostart")]
    pub worker_autostart: bool,

    /// Channel-open deadline in milliseconds.
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,

    /// Interval between channel-open retries in milliseconds.
    #[serde(default = "default_retry_interval_ms")]
    pub retry_interval_ms: u64,
}

fn default_adapter() -> AdapterKind {
    AdapterKind::Simulator
}
fn default_socket_path() -> String {
    "/tmp/orderbridge-worker.sock".to_string()
}
fn default_worker_path() -> String {
    "orderbridge-worker".to_string()
}
fn default_autostart() -> bool {
    true
}
fn default_connect_timeout_ms() -> u64 {
    5_000
}
fn default_retry_interval_ms() -> u64 {
    100
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            adapter: default_adapter(),
            socket_path: default_socket_path(),
            worker_path: default_worker_path(),
            worker_autostart: default_autostart(),
            connect_timeout_ms: default_connect_timeout_ms(),
            retry_interval_ms: default_retry_interval_ms(),
        }
    }
}

impl BridgeConfig {
    /// Load config from the given TOML file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| BridgeError::Config(format!("{}: {e}", path.display())))?;
        let mut config: BridgeConfig = toml::from_str(&content)
            .map_err(|e| BridgeError::Config(format!("{}: {e}", path.display())))?;
        config.apply_env_overrides()?;
        tracing::info!(path = %path.display(), "loaded bridge config");
        Ok(config)
    }

    /// Defaults plus environment overrides, for hosts that ship no file.
    pub fn load_default() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Override individual keys from `ORDERBRIDGE_*` environment variables.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(v) = std::env::var("ORDERBRIDGE_ADAPTER") {
            self.adapter = AdapterKind::parse(&v)?;
        }
        if let Ok(v) = std::env::var("ORDERBRIDGE_SOCKET_PATH") {
            self.socket_path = v;
        }
        if let Ok(v) = std::env::var("ORDERBRIDGE_WORKER_PATH") {
            self.worker_path = v;
        }
        if let Ok(v) = std::env::var("ORDERBRIDGE_WORKER_AUTOSTART") {
            self.worker_autostart = v.eq_ignore_ascii_case("true") || v == "1";
        }
        if let Ok(v) = std::env::var("ORDERBRIDGE_CONNECT_TIMEOUT_MS") {
            self.connect_timeout_ms = v
                .parse()
                .map_err(|_| BridgeError::Config(format!("bad ORDERBRIDGE_CONNECT_TIMEOUT_MS: {v}")))?;
        }
        if let Ok(v) = std::env::var("ORDERBRIDGE_RETRY_INTERVAL_MS") {
            self.retry_interval_ms = v
                .parse()
                .map_err(|_| BridgeError::Config(format!("bad ORDERBRIDGE_RETRY_INTERVAL_MS: {v}")))?;
        }
        Ok(())
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn retry_interval(&self) -> Duration {
        Duration::from_millis(self.retry_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults() {
        let cfg = BridgeConfig::default();
        assert_eq!(cfg.adapter, AdapterKind::Simulator);
        assert!(cfg.worker_autostart);
        assert_eq!(cfg.connect_timeout_ms, 5_000);
        assert_eq!(cfg.retry_interval_ms, 100);
    }

    #[test]
    fn loads_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "adapter = \"worker\"\nsocket_path = \"/tmp/ob-test.sock\"\nworker_path = \"/opt/ob/worker\"\nconnect_timeout_ms = 750"
        )
        .unwrap();

        let cfg = BridgeConfig::load(file.path()).unwrap();
        assert_eq!(cfg.adapter, AdapterKind::Worker);
        assert_eq!(cfg.socket_path, "/tmp/ob-test.sock");
        assert_eq!(cfg.worker_path, "/opt/ob/worker");
        assert_eq!(cfg.connect_timeout_ms, 750);
        // untouched keys keep defaults
        assert_eq!(cfg.retry_interval_ms, 100);
    }

    #[test]
    fn missing_file_is_config_error() {
        let res = BridgeConfig::load(Path::new("/nonexistent/orderbridge.toml"));
        assert!(matches!(res, Err(BridgeError::Config(_))));
    }

    #[test]
    fn malformed_file_is_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "adapter = [not toml").unwrap();
        let res = BridgeConfig::load(file.path());
        assert!(matches!(res, Err(BridgeError::Config(_))));
    }

    #[test]
    fn unknown_adapter_name_is_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "adapter = \"fix\"").unwrap();
        let res = BridgeConfig::load(file.path());
        assert!(matches!(res, Err(BridgeError::Config(_))));
    }
}
