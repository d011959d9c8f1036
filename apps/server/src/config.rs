//! # Server Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     ORDERDESK_PORT=8080                                                │
//! │     ORDERDESK_DB_PATH=/var/lib/orderdesk/orderdesk.db                  │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     --config <path>, or                                                │
//! │     ~/.config/orderdesk-server/config.toml (Linux)                     │
//! │     ~/Library/Application Support/com.orderdesk.server/config.toml     │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [server]
//! bind_addr = "127.0.0.1"
//! port = 8080
//!
//! [database]
//! path = "./orderdesk.db"
//! max_connections = 5
//! seed_if_empty = true
//!
//! [sessions]
//! idle_timeout_secs = 1800
//! sweep_interval_secs = 60
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{ServerError, ServerResult};

// =============================================================================
// Sections
// =============================================================================

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_bind_addr() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerSettings {
    fn default() -> Self {
        ServerSettings {
            bind_addr: default_bind_addr(),
            port: default_port(),
        }
    }
}

impl ServerSettings {
    /// Returns the full bind address.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

/// Catalog and order storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// SQLite file path, or `:memory:`.
    #[serde(default = "default_db_path")]
    pub path: PathBuf,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Load the built-in house menu when the catalog is empty.
    #[serde(default = "default_true")]
    pub seed_if_empty: bool,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./orderdesk.db")
}

fn default_max_connections() -> u32 {
    5
}

fn default_true() -> bool {
    true
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            path: default_db_path(),
            max_connections: default_max_connections(),
            seed_if_empty: default_true(),
        }
    }
}

/// Per-conversation cart lifetime.
///
/// ```text
///  last tool call ──── idle_timeout_secs ────► evictable
///                    ▲        ▲        ▲
///                    └ sweep every sweep_interval_secs
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSettings {
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,

    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,
}

fn default_idle_timeout() -> u64 {
    30 * 60
}

fn default_sweep_interval() -> u64 {
    60
}

impl Default for SessionSettings {
    fn default() -> Self {
        SessionSettings {
            idle_timeout_secs: default_idle_timeout(),
            sweep_interval_secs: default_sweep_interval(),
        }
    }
}

impl SessionSettings {
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

// =============================================================================
// Server Config
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub database: DatabaseSettings,

    #[serde(default)]
    pub sessions: SessionSettings,
}

impl ServerConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ServerResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading server config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load server config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Writes the configuration as TOML, creating parent directories.
    pub fn save(&self, config_path: Option<PathBuf>) -> ServerResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ServerError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ServerError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| ServerError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Server config saved");
        Ok(())
    }

    pub fn validate(&self) -> ServerResult<()> {
        if self.server.bind_addr.trim().is_empty() {
            return Err(ServerError::InvalidConfig("bind_addr must not be empty".into()));
        }

        if self.database.path.as_os_str().is_empty() {
            return Err(ServerError::InvalidConfig("database path must not be empty".into()));
        }

        if self.database.max_connections == 0 {
            return Err(ServerError::InvalidConfig(
                "max_connections must be greater than 0".into(),
            ));
        }

        if self.sessions.idle_timeout_secs == 0 {
            return Err(ServerError::InvalidConfig(
                "idle_timeout_secs must be greater than 0".into(),
            ));
        }

        if self.sessions.sweep_interval_secs == 0 {
            return Err(ServerError::InvalidConfig(
                "sweep_interval_secs must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(addr) = std::env::var("ORDERDESK_BIND_ADDR") {
            debug!(bind_addr = %addr, "Overriding bind address from environment");
            self.server.bind_addr = addr;
        }

        if let Ok(port) = std::env::var("ORDERDESK_PORT") {
            match port.parse::<u16>() {
                Ok(p) => {
                    debug!(port = p, "Overriding port from environment");
                    self.server.port = p;
                }
                Err(_) => warn!(port = %port, "Ignoring invalid ORDERDESK_PORT"),
            }
        }

        if let Ok(path) = std::env::var("ORDERDESK_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = PathBuf::from(path);
        }

        if let Ok(max) = std::env::var("ORDERDESK_DB_MAX_CONNECTIONS") {
            if let Ok(m) = max.parse::<u32>() {
                self.database.max_connections = m;
            }
        }

        if let Ok(seed) = std::env::var("ORDERDESK_SEED_IF_EMPTY") {
            match seed.to_lowercase().as_str() {
                "1" | "true" | "yes" => self.database.seed_if_empty = true,
                "0" | "false" | "no" => self.database.seed_if_empty = false,
                _ => warn!(value = %seed, "Ignoring invalid ORDERDESK_SEED_IF_EMPTY"),
            }
        }

        if let Ok(secs) = std::env::var("ORDERDESK_SESSION_IDLE_SECS") {
            if let Ok(s) = secs.parse::<u64>() {
                self.sessions.idle_timeout_secs = s;
            }
        }

        if let Ok(secs) = std::env::var("ORDERDESK_SESSION_SWEEP_SECS") {
            if let Ok(s) = secs.parse::<u64>() {
                self.sessions.sweep_interval_secs = s;
            }
        }
    }

    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "orderdesk", "server")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }
}
