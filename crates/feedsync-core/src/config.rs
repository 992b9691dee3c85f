use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Ambient settings read from `settings.toml`.
///
/// The subscription state (credentials and feed cursors) lives in a separate
/// JSON record, see [`crate::state::StateFile`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub pocket: PocketConfig,
    #[serde(default)]
    pub sync: SyncConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Data directory path (holds the catalog database)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Log level used when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PocketConfig {
    /// Base URL of the read-later service
    #[serde(default = "default_pocket_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_pocket_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for PocketConfig {
    fn default() -> Self {
        Self {
            base_url: default_pocket_base_url(),
            request_timeout_secs: default_pocket_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Feed request timeout in seconds
    #[serde(default = "default_sync_timeout")]
    pub request_timeout_secs: u64,
    /// HTTP proxy URL for feed fetching (e.g., "http://127.0.0.1:7890" or "socks5://127.0.0.1:1080")
    #[serde(default)]
    pub proxy_url: Option<String>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_sync_timeout(),
            proxy_url: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Seconds to wait for the browser callback (0 = wait forever)
    #[serde(default = "default_consent_timeout")]
    pub consent_timeout_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            consent_timeout_secs: default_consent_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    /// Catalog database file name, relative to the data directory
    #[serde(default = "default_database_file")]
    pub database_file: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            database_file: default_database_file(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("feedsync")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_pocket_base_url() -> String {
    "https://getpocket.com".to_string()
}

fn default_pocket_timeout() -> u64 {
    30
}

fn default_sync_timeout() -> u64 {
    10
}

fn default_consent_timeout() -> u64 {
    600 // 10 minutes
}

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    8080
}

fn default_database_file() -> String {
    "feedsync.db".to_string()
}

/// Expand tilde (~) in path to user's home directory
fn expand_tilde(path: &std::path::Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

impl AppConfig {
    /// Load settings from the default location or return defaults
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load settings from an explicit path; a missing file yields defaults
    pub fn load_from(path: &std::path::Path) -> crate::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            toml::from_str(&content).map_err(|e| crate::Error::Persistence(e.to_string()))
        } else {
            Ok(Self::default())
        }
    }

    /// Directory holding both `settings.toml` and the `config.json` state record
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("feedsync")
    }

    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("settings.toml")
    }

    /// Get the subscription state file path
    pub fn state_path() -> PathBuf {
        Self::config_dir().join("config.json")
    }

    /// Get the catalog database file path
    pub fn database_path(&self) -> PathBuf {
        self.data_dir().join(&self.server.database_file)
    }

    /// Address the catalog daemon binds to
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Get the data directory (with tilde expansion)
    pub fn data_dir(&self) -> PathBuf {
        expand_tilde(&self.general.data_dir)
    }
}
