//! Configuration module for Etsin.

use serde::Deserialize;
use std::path::Path;

use crate::{EtsinError, Result};

/// Web API configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    /// Host address to bind.
    #[serde(default = "default_web_host")]
    pub host: String,
    /// Port number for the Web API.
    #[serde(default = "default_web_port")]
    pub port: u16,
    /// CORS allowed origins.
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// Secret used to verify bearer tokens (must be set).
    #[serde(default)]
    pub jwt_secret: String,
}

fn default_web_host() -> String {
    "0.0.0.0".to_string()
}

fn default_web_port() -> u16 {
    8080
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: default_web_host(),
            port: default_web_port(),
            cors_origins: vec![],
            jwt_secret: String::new(),
        }
    }
}

/// Metax catalog API configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MetaxConfig {
    /// Base URL of the Metax API, without the `/rest` suffix.
    #[serde(default = "default_metax_base_url")]
    pub base_url: String,
    /// Basic auth user.
    #[serde(default)]
    pub user: String,
    /// Basic auth password.
    #[serde(default)]
    pub password: String,
    /// Total request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub timeout_secs: u64,
}

fn default_metax_base_url() -> String {
    "https://metax.fairdata.fi".to_string()
}

fn default_request_timeout() -> u64 {
    15
}

impl Default for MetaxConfig {
    fn default() -> Self {
        Self {
            base_url: default_metax_base_url(),
            user: String::new(),
            password: String::new(),
            timeout_secs: default_request_timeout(),
        }
    }
}

/// Download service configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DownloadConfig {
    /// Base URL of dataset downloads; the dataset identifier is appended.
    #[serde(default = "default_download_base_url")]
    pub base_url: String,
}

fn default_download_base_url() -> String {
    "https://download.fairdata.fi/secure/api/v1/dataset".to_string()
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            base_url: default_download_base_url(),
        }
    }
}

/// REMS permit service configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RemsConfig {
    /// Whether permit lookups are enabled.
    #[serde(default)]
    pub enabled: bool,
    /// Base URL of the REMS instance.
    #[serde(default = "default_rems_base_url")]
    pub base_url: String,
    /// API key (must be set if enabled).
    #[serde(default)]
    pub api_key: String,
    /// REMS user allowed to create users on behalf of applicants.
    #[serde(default = "default_rems_owner_id")]
    pub owner_id: String,
    /// Total request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub timeout_secs: u64,
}

fn default_rems_base_url() -> String {
    "https://vm1446.kaj.pouta.csc.fi".to_string()
}

fn default_rems_owner_id() -> String {
    "RDowner@funet.fi".to_string()
}

impl Default for RemsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: default_rems_base_url(),
            api_key: String::new(),
            owner_id: default_rems_owner_id(),
            timeout_secs: default_request_timeout(),
        }
    }
}

/// Locale configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LocaleConfig {
    /// Timezone for catalog dates without an offset (e.g., "Europe/Helsinki").
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Language used for reference-data labels (en / fi / sv).
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_timezone() -> String {
    "Europe/Helsinki".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            language: default_language(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/etsin.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Web API configuration.
    #[serde(default)]
    pub web: WebConfig,
    /// Metax configuration.
    #[serde(default)]
    pub metax: MetaxConfig,
    /// Download service configuration.
    #[serde(default)]
    pub download: DownloadConfig,
    /// REMS configuration.
    #[serde(default)]
    pub rems: RemsConfig,
    /// Locale configuration.
    #[serde(default)]
    pub locale: LocaleConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(EtsinError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| EtsinError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `ETSIN_JWT_SECRET`: Override the JWT secret key
    /// - `ETSIN_METAX_PASSWORD`: Override the Metax password
    /// - `ETSIN_REMS_API_KEY`: Override the REMS API key
    pub fn apply_env_overrides(&mut self) {
        let overrides: [(&str, &mut String); 3] = [
            ("ETSIN_JWT_SECRET", &mut self.web.jwt_secret),
            ("ETSIN_METAX_PASSWORD", &mut self.metax.password),
            ("ETSIN_REMS_API_KEY", &mut self.rems.api_key),
        ];
        for (name, target) in overrides {
            if let Ok(value) = std::env::var(name) {
                if !value.is_empty() {
                    *target = value;
                }
            }
        }
    }

    /// Validate the configuration.
    ///
    /// Returns an error if:
    /// - JWT secret is not set
    /// - Metax or download base URL does not parse
    /// - REMS is enabled without an API key
    /// - The timezone is not a known IANA zone
    pub fn validate(&self) -> Result<()> {
        if self.web.jwt_secret.is_empty() {
            return Err(EtsinError::Config(
                "jwt_secret is not set. \
                 Set it in config.toml or via ETSIN_JWT_SECRET environment variable."
                    .to_string(),
            ));
        }

        for (name, value) in [
            ("metax.base_url", &self.metax.base_url),
            ("download.base_url", &self.download.base_url),
        ] {
            url::Url::parse(value)
                .map_err(|e| EtsinError::Config(format!("invalid {name} '{value}': {e}")))?;
        }

        if self.rems.enabled && self.rems.api_key.is_empty() {
            return Err(EtsinError::Config(
                "REMS is enabled but api_key is not set. \
                 Set it in config.toml or via ETSIN_REMS_API_KEY environment variable."
                    .to_string(),
            ));
        }

        if self.locale.timezone.parse::<chrono_tz::Tz>().is_err() {
            return Err(EtsinError::Config(format!(
                "unknown timezone '{}'",
                self.locale.timezone
            )));
        }

        Ok(())
    }
}
