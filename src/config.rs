//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub telemetry: TelemetryConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub pages: PageFlags,

    #[serde(default)]
    pub preview: PreviewConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Remote API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Origin serving the `/api/*` endpoints
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Optional request timeout. Unset means requests may wait indefinitely.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: None,
        }
    }
}

impl ApiConfig {
    /// Base URL without a trailing slash
    pub fn normalized_base_url(&self) -> String {
        self.base_url.trim_end_matches('/').to_string()
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

/// Telemetry beacon configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_telemetry_enabled")]
    pub enabled: bool,

    #[serde(default = "default_heartbeat_interval")]
    pub heartbeat_interval_secs: u64,
}

fn default_telemetry_enabled() -> bool {
    true
}

fn default_heartbeat_interval() -> u64 {
    30
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: default_telemetry_enabled(),
            heartbeat_interval_secs: default_heartbeat_interval(),
        }
    }
}

impl TelemetryConfig {
    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_secs(self.heartbeat_interval_secs.max(1))
    }
}

/// Local persisted state (session id, admin credentials)
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_state_dir")]
    pub state_dir: String,
}

fn default_state_dir() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("civitas").to_string_lossy().to_string())
        .unwrap_or_else(|| "./civitas_state".to_string())
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            state_dir: default_state_dir(),
        }
    }
}

impl StorageConfig {
    /// Path of the key-value file backing local storage
    pub fn store_path(&self) -> PathBuf {
        PathBuf::from(&self.state_dir).join("local_storage.json")
    }
}

/// Per-page feature switches.
///
/// The page variants only differ by these flags.
#[derive(Debug, Clone, Deserialize)]
pub struct PageFlags {
    /// Parse `SUGGESTIONS:` payloads into clickable chips
    #[serde(default = "default_true")]
    pub suggestion_chips: bool,

    /// Detail modal with achievements, news and sources
    #[serde(default = "default_true")]
    pub rich_detail_modal: bool,

    /// Open the chat with an assistant greeting
    #[serde(default = "default_true")]
    pub chat_greeting: bool,

    /// Parties shown before "View All Parties" is clicked
    #[serde(default = "default_party_preview_limit")]
    pub party_preview_limit: usize,
}

fn default_true() -> bool {
    true
}

fn default_party_preview_limit() -> usize {
    3
}

impl Default for PageFlags {
    fn default() -> Self {
        Self {
            suggestion_chips: true,
            rich_detail_modal: true,
            chat_greeting: true,
            party_preview_limit: default_party_preview_limit(),
        }
    }
}

/// Preview server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PreviewConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8084
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl PreviewConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl LoggingConfig {
    /// Install the global tracing subscriber.
    ///
    /// `RUST_LOG` takes precedence over the configured level.
    pub fn init(&self) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("civitas={}", self.level)));

        let registry = tracing_subscriber::registry().with(filter);
        let result = if self.format == "json" {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .try_init()
        } else {
            registry.with(tracing_subscriber::fmt::layer()).try_init()
        };

        if let Err(e) = result {
            eprintln!("Logging already initialized: {}", e);
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })
    }

    fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("civitas").join("config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("CIVITAS_API_URL") {
            self.api.base_url = url;
        }

        if let Ok(dir) = std::env::var("CIVITAS_STATE_DIR") {
            self.storage.state_dir = dir;
        }

        if let Ok(secs) = std::env::var("CIVITAS_HEARTBEAT_SECS") {
            if let Ok(s) = secs.parse() {
                self.telemetry.heartbeat_interval_secs = s;
            }
        }

        if let Ok(host) = std::env::var("CIVITAS_PREVIEW_HOST") {
            self.preview.host = host;
        }
        if let Ok(port) = std::env::var("CIVITAS_PREVIEW_PORT") {
            if let Ok(p) = port.parse() {
                self.preview.port = p;
            }
        }

        if let Ok(level) = std::env::var("CIVITAS_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("CIVITAS_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Civitas Configuration
#
# Environment variables override these settings:
# - CIVITAS_API_URL
# - CIVITAS_STATE_DIR
# - CIVITAS_HEARTBEAT_SECS
# - CIVITAS_PREVIEW_HOST
# - CIVITAS_PREVIEW_PORT
# - CIVITAS_LOG_LEVEL
# - CIVITAS_LOG_FORMAT

[api]
# Origin serving /api/representatives, /api/chat, /api/admin/* ...
base_url = "http://localhost:8000"

# Request timeout in seconds (unset: wait indefinitely)
# request_timeout_secs = 30

[telemetry]
# Send heartbeat and event beacons
enabled = true

# Heartbeat period (seconds)
heartbeat_interval_secs = 30

[storage]
# Directory holding the session id and admin credentials
state_dir = "~/.local/share/civitas"

[pages]
# Turn "SUGGESTIONS:" payloads into clickable chips
suggestion_chips = true

# Show achievements, news and sources in the representative modal
rich_detail_modal = true

# Greet the citizen when the chat opens
chat_greeting = true

# Parties visible before "View All Parties"
party_preview_limit = 3

[preview]
host = "127.0.0.1"
port = 8084

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "http://localhost:8000");
        assert_eq!(config.telemetry.heartbeat_interval_secs, 30);
        assert!(config.api.request_timeout().is_none());
        assert_eq!(config.pages.party_preview_limit, 3);
        assert_eq!(config.preview.addr(), "127.0.0.1:8084");
    }

    #[test]
    fn test_generated_config_parses() {
        let config = Config::parse(&generate_default_config()).unwrap();
        assert_eq!(config.telemetry.heartbeat_interval_secs, 30);
        assert!(config.pages.suggestion_chips);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config = Config::parse(
            r#"
            [api]
            base_url = "https://civic.example.org/"
            request_timeout_secs = 10

            [pages]
            suggestion_chips = false
            "#,
        )
        .unwrap();

        assert_eq!(config.api.normalized_base_url(), "https://civic.example.org");
        assert_eq!(config.api.request_timeout(), Some(Duration::from_secs(10)));
        assert!(!config.pages.suggestion_chips);
        assert!(config.pages.rich_detail_modal);
        assert_eq!(config.preview.port, 8084);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(Path::new("/nonexistent/civitas.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[telemetry]\nenabled = false\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert!(!config.telemetry.enabled);
    }

    #[test]
    fn test_zero_heartbeat_is_clamped() {
        let telemetry = TelemetryConfig {
            enabled: true,
            heartbeat_interval_secs: 0,
        };
        assert_eq!(telemetry.heartbeat_interval(), Duration::from_secs(1));
    }
}
