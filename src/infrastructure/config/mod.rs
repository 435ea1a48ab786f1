// ============================================================
// SERVICE CONFIGURATION
// ============================================================
// Layered settings: defaults < TOML file < environment < command line
//
// Environment variables use the `SENTIMENT_` prefix with `__` between
// sections, e.g. `SENTIMENT_SERVER__PORT=9000`. The bare `PORT` variable
// is honoured for hosting platforms that inject it.

use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::domain::error::{AppError, Result};

pub const DEFAULT_CONFIG_FILE: &str = "review-sentiment.toml";
pub const ENV_PREFIX: &str = "SENTIMENT_";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub csv: CsvConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (all interfaces unless overridden)
    pub host: String,

    pub port: u16,

    /// Optional mount point for the API routes, e.g. `/api`
    pub route_prefix: String,

    /// Root of the pre-built client bundle
    pub static_dir: PathBuf,

    /// Largest accepted upload body
    pub max_upload_bytes: usize,

    /// actix worker count; actix picks one per core when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workers: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            route_prefix: String::new(),
            static_dir: PathBuf::from("frontend/build"),
            max_upload_bytes: 16 * 1024 * 1024,
            workers: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Path of the serialized classifier artifact
    pub path: PathBuf,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("senti_lr.json"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvConfig {
    pub delimiter: char,

    /// Sniff the delimiter from the first lines instead of using `delimiter`
    pub auto_detect_delimiter: bool,

    /// Trim surrounding whitespace from every cell
    pub trim: bool,
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            auto_detect_delimiter: false,
            trim: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub top_products_limit: usize,
    pub sample_size: usize,

    /// Rows of the sample shown in the dashboard preview table
    pub dashboard_preview_rows: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            top_products_limit: 10,
            sample_size: 20,
            dashboard_preview_rows: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Values given on the command line; they win over every other layer.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub port: Option<u16>,
    pub model_path: Option<PathBuf>,
    pub static_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Build the provider chain. `config_file` replaces the default TOML location.
    pub fn figment(config_file: Option<&Path>) -> Figment {
        let toml_path = config_file
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(toml_path))
            .merge(Env::raw().only(&["PORT"]).map(|_| "server.port".into()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load and validate configuration from all layers.
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        if let Some(path) = config_file {
            if !path.exists() {
                return Err(AppError::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
        }

        let config: AppConfig = Self::figment(config_file)
            .extract()
            .map_err(|e| AppError::Config(e.to_string()))?;

        config.validate().map_err(AppError::Config)?;
        Ok(config)
    }

    /// Same as [`AppConfig::load`], reading a `.env` file first when present.
    pub fn load_with_dotenv(config_file: Option<&Path>) -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::load(config_file)
    }

    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Result<Self> {
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
        if let Some(path) = overrides.model_path {
            self.model.path = path;
        }
        if let Some(dir) = overrides.static_dir {
            self.server.static_dir = dir;
        }
        self.validate().map_err(AppError::Config)?;
        Ok(self)
    }

    /// Validate configuration values
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.analysis.top_products_limit == 0 {
            return Err("analysis.top_products_limit must be > 0".to_string());
        }
        if self.analysis.sample_size == 0 {
            return Err("analysis.sample_size must be > 0".to_string());
        }
        if self.analysis.dashboard_preview_rows == 0 {
            return Err("analysis.dashboard_preview_rows must be > 0".to_string());
        }
        if self.server.max_upload_bytes == 0 {
            return Err("server.max_upload_bytes must be > 0".to_string());
        }
        if self.server.workers == Some(0) {
            return Err("server.workers must be > 0".to_string());
        }
        if !self.csv.delimiter.is_ascii() {
            return Err("csv.delimiter must be a single ASCII character".to_string());
        }
        let prefix = &self.server.route_prefix;
        if !prefix.is_empty() && (!prefix.starts_with('/') || prefix.ends_with('/')) {
            return Err(
                "server.route_prefix must start with '/' and must not end with '/'".to_string(),
            );
        }
        Ok(())
    }

    /// Address the HTTP server binds to.
    pub fn bind_address(&self) -> (String, u16) {
        (self.server.host.clone(), self.server.port)
    }
}

impl CsvConfig {
    /// Delimiter as the byte the csv reader expects. Only valid after `validate`.
    pub fn delimiter_byte(&self) -> u8 {
        self.delimiter as u8
    }
}
