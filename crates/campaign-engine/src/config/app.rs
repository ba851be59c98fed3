//! Application configuration for the campaign engine server.

use std::time::Duration;

use serde::Deserialize;

/// Where execution records and workflow definitions live.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// PostgreSQL via the `POSTGRES_*` settings.
    #[default]
    Postgres,
    /// Process-local storage, lost on restart.
    Memory,
}

impl std::fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackend::Postgres => write!(f, "postgres"),
            StorageBackend::Memory => write!(f, "memory"),
        }
    }
}

/// Application configuration loaded from environment variables.
///
/// Environment variables are prefixed with `CAMPAIGN_`:
/// - `CAMPAIGN_HOST`: Server bind address (default: "0.0.0.0")
/// - `CAMPAIGN_PORT`: Server port (default: 1337)
/// - `CAMPAIGN_DEBUG`: Enable debug mode (default: false)
/// - `CAMPAIGN_SERVER_NAME`: Server name for identification
/// - `CAMPAIGN_HTTP_TIMEOUT_SECONDS`: Timeout for `api_call` actions (default: 30)
/// - `CAMPAIGN_STORAGE`: `postgres` or `memory` (default: postgres)
/// - `CAMPAIGN_WORKFLOWS_FILE`: YAML/JSON workflow definitions to seed the memory backend
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server bind address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Enable debug mode
    #[serde(default)]
    pub debug: bool,

    /// Server name for identification
    #[serde(default = "default_server_name")]
    pub server_name: String,

    /// Outbound HTTP timeout for `api_call` actions, in seconds
    #[serde(default = "default_http_timeout")]
    pub http_timeout_seconds: u64,

    /// Storage backend
    #[serde(default)]
    pub storage: StorageBackend,

    /// Optional seed file for the in-memory workflow source
    #[serde(default)]
    pub workflows_file: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    1337
}

fn default_server_name() -> String {
    "campaign-engine".to_string()
}

fn default_http_timeout() -> u64 {
    30
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables are prefixed with `CAMPAIGN_`.
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::prefixed("CAMPAIGN_").from_env::<AppConfig>()
    }

    /// Get the server bind address as a string suitable for `TcpListener::bind`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Timeout applied to every outbound `api_call` request.
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_seconds.max(1))
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            debug: false,
            server_name: default_server_name(),
            http_timeout_seconds: default_http_timeout(),
            storage: StorageBackend::default(),
            workflows_file: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 1337);
        assert!(!config.debug);
        assert_eq!(config.storage, StorageBackend::Postgres);
        assert_eq!(config.http_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_bind_address() {
        let config = AppConfig::default();
        assert_eq!(config.bind_address(), "0.0.0.0:1337");
    }

    #[test]
    fn test_zero_timeout_is_bounded() {
        let config = AppConfig {
            http_timeout_seconds: 0,
            ..AppConfig::default()
        };
        assert_eq!(config.http_timeout(), Duration::from_secs(1));
    }

    #[test]
    fn test_storage_backend_names() {
        let backend: StorageBackend = serde_json::from_str("\"memory\"").unwrap();
        assert_eq!(backend, StorageBackend::Memory);
    }
}
