//! Configuration loading — TOML file with environment variable overrides,
//! plus the JSON board file describing the entities.
//!
//! Looks for `gpiohub.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values, and a first command-line argument takes
//! precedence over both for the board file path.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;

use gpiohub_adapter_gpio_cli::GpioCliConfig;
use gpiohub_adapter_udp::DEFAULT_MAX_DATAGRAM_SIZE;
use gpiohub_domain::board::BoardDefinition;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// UDP listener settings.
    pub server: ServerConfig,
    /// Board file location.
    pub board: BoardConfig,
    /// Pin access backend.
    pub hardware: HardwareConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// UDP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// UDP port.
    pub port: u16,
    /// Receive buffer size; longer datagrams are truncated.
    pub max_datagram_size: usize,
}

/// Board file configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Path of the JSON board file.
    pub path: PathBuf,
}

/// Which [`PinAccess`](gpiohub_app::ports::PinAccess) implementation to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Real pins through the `gpio` utility.
    #[default]
    Gpio,
    /// Simulated in-memory pins.
    Virtual,
}

impl FromStr for Backend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gpio" => Ok(Self::Gpio),
            "virtual" => Ok(Self::Virtual),
            other => Err(ConfigError::Validation(format!(
                "unknown hardware backend {other:?}"
            ))),
        }
    }
}

/// Hardware configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct HardwareConfig {
    pub backend: Backend,
    /// Settings of the `gpio` backend.
    pub gpio: GpioCliConfig,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Config {
    /// Load configuration from `gpiohub.toml` (if present), apply
    /// environment-variable overrides, then command-line arguments.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load(mut args: impl Iterator<Item = String>) -> Result<Self, ConfigError> {
        let mut config = Self::from_file("gpiohub.toml")?;
        config.apply_env_overrides()?;
        if let Some(path) = args.next() {
            config.board.path = PathBuf::from(path);
        }
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(val) = std::env::var("GPIOHUB_HOST") {
            self.server.host = val;
        }
        if let Ok(val) = std::env::var("GPIOHUB_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Ok(val) = std::env::var("GPIOHUB_BIND") {
            if let Some((host, port)) = val.rsplit_once(':') {
                self.server.host = host.to_string();
                if let Ok(port) = port.parse() {
                    self.server.port = port;
                }
            }
        }
        if let Ok(val) = std::env::var("GPIOHUB_BOARD") {
            self.board.path = PathBuf::from(val);
        }
        if let Ok(val) = std::env::var("GPIOHUB_BACKEND") {
            self.hardware.backend = val.parse()?;
        }
        if let Ok(val) = std::env::var("GPIOHUB_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.server.max_datagram_size == 0 {
            return Err(ConfigError::Validation(
                "max_datagram_size must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Read and parse the board file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Board`] if the file cannot be read and
    /// [`ConfigError::BoardFormat`] if it is not valid board JSON.
    pub fn load_board(&self) -> Result<BoardDefinition, ConfigError> {
        load_board(&self.board.path)
    }
}

/// Read and parse a board file.
///
/// # Errors
///
/// See [`Config::load_board`].
pub fn load_board(path: &Path) -> Result<BoardDefinition, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Board {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ConfigError::BoardFormat {
        path: path.to_path_buf(),
        source,
    })
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 4200,
            max_datagram_size: DEFAULT_MAX_DATAGRAM_SIZE,
        }
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./gohome.json"),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "gpiohubd=info,gpiohub=info".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// The board file could not be read.
    #[error("failed to read board file {}", path.display())]
    Board {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The board file is not valid JSON of the expected shape.
    #[error("failed to parse board file {}", path.display())]
    BoardFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
