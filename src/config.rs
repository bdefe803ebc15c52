//! Application configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup and validated before the server starts.
//!
//! ## Required Variables
//!
//! - `ADMIN_KEY` - Shared secret expected in the `x-admin-key` header of admin requests
//!
//! ## Optional Variables
//!
//! - `LISTEN` - Bind address (default: `0.0.0.0:3000`)
//! - `DATA_DIR` - Directory holding `ads.json` and `ad_stats.json` (default: `data`)
//! - `STORAGE_BACKEND` - `file` or `memory` (default: `file`)
//! - `AD_ID_POLICY` - `unique`, `overwrite` or `auto` (default: `unique`)
//! - `VIEWER_KEY_SOURCE` - `peer` or `client` (default: `peer`)
//! - `CASCADE_DELETE_STATS` - Delete stats together with their ad (default: `true`)
//! - `BEHIND_PROXY` - Trust `X-Forwarded-For` / `X-Real-IP` (default: `false`)
//! - `STATIC_DIR` - Front-end files served for unmatched paths (default: `public`)
//! - `RUST_LOG` - Log level (default: `info`)
//! - `LOG_FORMAT` - Log format: `text` or `json` (default: `text`)

use anyhow::{Context, Result};
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::domain::IdPolicy;

/// Where ad collections are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// JSON files under `DATA_DIR`.
    File,
    /// Process memory only; nothing survives a restart.
    Memory,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(Self::File),
            "memory" => Ok(Self::Memory),
            other => Err(format!(
                "unknown storage backend '{other}', expected 'file' or 'memory'"
            )),
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File => f.write_str("file"),
            Self::Memory => f.write_str("memory"),
        }
    }
}

/// Where the client key used for view deduplication comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerKeySource {
    /// Prefer the `viewerId` sent by the client, fall back to the request origin address.
    Peer,
    /// Require the client to send a `viewerId`.
    Client,
}

impl FromStr for ViewerKeySource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "peer" | "ip" => Ok(Self::Peer),
            "client" | "token" => Ok(Self::Client),
            other => Err(format!(
                "unknown viewer key source '{other}', expected 'peer' or 'client'"
            )),
        }
    }
}

impl fmt::Display for ViewerKeySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Peer => f.write_str("peer"),
            Self::Client => f.write_str("client"),
        }
    }
}

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: String,
    /// Shared admin secret. Compared for exact equality; never logged.
    pub admin_key: String,
    pub data_dir: PathBuf,
    pub storage_backend: StorageBackend,
    pub id_policy: IdPolicy,
    pub viewer_key_source: ViewerKeySource,
    pub cascade_delete_stats: bool,
    /// When true, the client address is read from X-Forwarded-For / X-Real-IP headers.
    /// Enable only when the service is behind a trusted reverse proxy.
    pub behind_proxy: bool,
    pub static_dir: PathBuf,
    pub log_level: String,
    pub log_format: String,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `ADMIN_KEY` is missing or an enumerated variable
    /// has an unknown value.
    pub fn from_env() -> Result<Self> {
        let admin_key = env::var("ADMIN_KEY").context("ADMIN_KEY must be set")?;

        let listen_addr = env::var("LISTEN").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let data_dir = env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string());
        let static_dir = env::var("STATIC_DIR").unwrap_or_else(|_| "public".to_string());
        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

        let storage_backend = parse_var("STORAGE_BACKEND", StorageBackend::File)?;
        let id_policy = parse_var("AD_ID_POLICY", IdPolicy::Unique)?;
        let viewer_key_source = parse_var("VIEWER_KEY_SOURCE", ViewerKeySource::Peer)?;

        let cascade_delete_stats = bool_var("CASCADE_DELETE_STATS", true);
        let behind_proxy = bool_var("BEHIND_PROXY", false);

        Ok(Self {
            listen_addr,
            admin_key,
            data_dir: PathBuf::from(data_dir),
            storage_backend,
            id_policy,
            viewer_key_source,
            cascade_delete_stats,
            behind_proxy,
            static_dir: PathBuf::from(static_dir),
            log_level,
            log_format,
        })
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `admin_key` is empty
    /// - `log_format` is not `text` or `json`
    /// - `listen_addr` is invalid
    /// - `data_dir` is empty while the file backend is selected
    pub fn validate(&self) -> Result<()> {
        if self.admin_key.trim().is_empty() {
            anyhow::bail!("ADMIN_KEY must not be empty");
        }

        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        if !self.listen_addr.contains(':') {
            anyhow::bail!(
                "LISTEN must be in format 'host:port', got '{}'",
                self.listen_addr
            );
        }

        if self.storage_backend == StorageBackend::File && self.data_dir.as_os_str().is_empty() {
            anyhow::bail!("DATA_DIR must not be empty when STORAGE_BACKEND is 'file'");
        }

        Ok(())
    }

    /// Prints configuration summary (without sensitive data).
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Listen address: {}", self.listen_addr);
        tracing::info!("  Admin key: {}", mask_secret(&self.admin_key));
        match self.storage_backend {
            StorageBackend::File => {
                tracing::info!("  Storage: file ({})", self.data_dir.display())
            }
            StorageBackend::Memory => tracing::info!("  Storage: memory (not persisted)"),
        }
        tracing::info!("  Ad id policy: {}", self.id_policy);
        tracing::info!("  Viewer key source: {}", self.viewer_key_source);
        tracing::info!("  Cascade delete stats: {}", self.cascade_delete_stats);
        tracing::info!("  Behind proxy: {}", self.behind_proxy);
        tracing::info!("  Static dir: {}", self.static_dir.display());
        tracing::info!("  Log level: {}", self.log_level);
        tracing::info!("  Log format: {}", self.log_format);
    }
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr<Err = String>,
{
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => value
            .parse()
            .map_err(|e: String| anyhow::anyhow!("{name}: {e}")),
        _ => Ok(default),
    }
}

fn bool_var(name: &str, default: bool) -> bool {
    env::var(name)
        .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
        .unwrap_or(default)
}

/// Masks a secret for logging, keeping only its length visible.
///
/// - `s3cr3t-key` -> `***(10 chars)`
fn mask_secret(secret: &str) -> String {
    format!("***({} chars)", secret.chars().count())
}

/// Loads and validates configuration from environment variables.
///
/// # Errors
///
/// Returns an error if required variables are missing or validation fails.
///
/// # Note
///
/// This function expects environment variables to be already loaded
/// (e.g., via `dotenvy::dotenv()` in `main.rs`).
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn test_config() -> Config {
        Config {
            listen_addr: "0.0.0.0:3000".to_string(),
            admin_key: "test-admin-key".to_string(),
            data_dir: PathBuf::from("data"),
            storage_backend: StorageBackend::File,
            id_policy: IdPolicy::Unique,
            viewer_key_source: ViewerKeySource::Peer,
            cascade_delete_stats: true,
            behind_proxy: false,
            static_dir: PathBuf::from("public"),
            log_level: "info".to_string(),
            log_format: "text".to_string(),
        }
    }

    const VARS: [&str; 8] = [
        "ADMIN_KEY",
        "DATA_DIR",
        "STORAGE_BACKEND",
        "AD_ID_POLICY",
        "VIEWER_KEY_SOURCE",
        "CASCADE_DELETE_STATS",
        "BEHIND_PROXY",
        "LISTEN",
    ];

    fn clear_env() {
        // SAFETY: Tests touching the environment are run serially via #[serial]
        unsafe {
            for var in VARS {
                env::remove_var(var);
            }
        }
    }

    #[test]
    fn test_mask_secret() {
        assert_eq!(mask_secret("1387hhh"), "***(7 chars)");
        assert!(!mask_secret("super-secret").contains("secret"));
    }

    #[test]
    fn test_config_validation() {
        let mut config = test_config();
        assert!(config.validate().is_ok());

        config.admin_key = "  ".to_string();
        assert!(config.validate().is_err());
        config.admin_key = "k".to_string();

        config.log_format = "invalid".to_string();
        assert!(config.validate().is_err());
        config.log_format = "json".to_string();
        assert!(config.validate().is_ok());

        config.listen_addr = "3000".to_string();
        assert!(config.validate().is_err());
        config.listen_addr = "127.0.0.1:3000".to_string();

        config.data_dir = PathBuf::new();
        assert!(config.validate().is_err());
        config.storage_backend = StorageBackend::Memory;
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_env();
        // SAFETY: Tests are run serially due to #[serial], so no concurrent access
        unsafe {
            env::set_var("ADMIN_KEY", "secret");
        }

        let config = Config::from_env().unwrap();

        assert_eq!(config.admin_key, "secret");
        assert_eq!(config.listen_addr, "0.0.0.0:3000");
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.storage_backend, StorageBackend::File);
        assert_eq!(config.id_policy, IdPolicy::Unique);
        assert_eq!(config.viewer_key_source, ViewerKeySource::Peer);
        assert!(config.cascade_delete_stats);
        assert!(!config.behind_proxy);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        clear_env();
        // SAFETY: Tests are run serially due to #[serial], so no concurrent access
        unsafe {
            env::set_var("ADMIN_KEY", "secret");
            env::set_var("STORAGE_BACKEND", "memory");
            env::set_var("AD_ID_POLICY", "auto");
            env::set_var("VIEWER_KEY_SOURCE", "client");
            env::set_var("CASCADE_DELETE_STATS", "false");
            env::set_var("BEHIND_PROXY", "1");
        }

        let config = Config::from_env().unwrap();

        assert_eq!(config.storage_backend, StorageBackend::Memory);
        assert_eq!(config.id_policy, IdPolicy::AutoIncrement);
        assert_eq!(config.viewer_key_source, ViewerKeySource::Client);
        assert!(!config.cascade_delete_stats);
        assert!(config.behind_proxy);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_missing_admin_key_fails() {
        clear_env();

        assert!(Config::from_env().is_err());
    }

    #[test]
    #[serial]
    fn test_unknown_policy_fails() {
        clear_env();
        // SAFETY: Tests are run serially due to #[serial], so no concurrent access
        unsafe {
            env::set_var("ADMIN_KEY", "secret");
            env::set_var("AD_ID_POLICY", "random");
        }

        let err = Config::from_env().unwrap_err();
        assert!(err.to_string().contains("AD_ID_POLICY"));

        clear_env();
    }
}
