//! Configuration for rustdis

use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub store: StoreConfig,
    pub session: SessionConfig,
    pub metrics: MetricsConfig,
}

/// In-memory store configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Number of entries to preallocate room for
    pub initial_capacity: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 1024,
        }
    }
}

/// Interactive session configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Prompt printed before each request when attached to a terminal
    pub prompt: String,

    /// Print the welcome banner when attached to a terminal
    pub banner: bool,

    /// Read buffer size (bytes)
    pub read_buffer_size: usize,

    /// Write buffer size (bytes)
    pub write_buffer_size: usize,

    /// Longest accepted request line (bytes)
    pub max_line_length: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            prompt: "rustdis> ".to_string(),
            banner: true,
            read_buffer_size: 8192,
            write_buffer_size: 8192,
            max_line_length: 1024 * 1024, // 1MB
        }
    }
}

/// Metrics configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Enable the `stats` session command
    pub enabled: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &str) -> crate::Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            crate::RustdisError::Config(format!("Failed to read config file: {e}"))
        })?;

        toml::from_str(&contents)
            .map_err(|e| crate::RustdisError::Config(format!("Failed to parse config: {e}")))
    }

    /// Load configuration from environment variables or use defaults
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(n) = env_parse("RUSTDIS_INITIAL_CAPACITY") {
            config.store.initial_capacity = n;
        }

        if let Ok(prompt) = std::env::var("RUSTDIS_PROMPT") {
            config.session.prompt = prompt;
        }

        if let Ok(banner) = std::env::var("RUSTDIS_BANNER") {
            config.session.banner = parse_flag(&banner);
        }

        if let Some(n) = env_parse("RUSTDIS_MAX_LINE_LENGTH") {
            config.session.max_line_length = n;
        }

        if let Ok(enabled) = std::env::var("RUSTDIS_METRICS_ENABLED") {
            config.metrics.enabled = parse_flag(&enabled);
        }

        config
    }
}

fn env_parse(name: &str) -> Option<usize> {
    std::env::var(name).ok()?.parse().ok()
}

fn parse_flag(value: &str) -> bool {
    value.eq_ignore_ascii_case("true") || value == "1"
}
