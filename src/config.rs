use std::collections::HashMap;

use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use contact_relay_notification::MailConfig;
use serde::Deserialize;

/// Flat variables read from the deployment environment, mapped onto their
/// config keys.
const LEGACY_VARS: [(&str, &str); 9] = [
    ("HOST", "server.host"),
    ("PORT", "server.port"),
    ("SMTP_SERVER", "smtp.server"),
    ("SMTP_PORT", "smtp.port"),
    ("SENDER_EMAIL", "smtp.sender_email"),
    ("SENDER_PASSWORD", "smtp.sender_password"),
    ("RECEIVER_EMAIL", "smtp.receiver_email"),
    ("ENVIRONMENT", "observability.environment"),
    ("RUST_LOG", "observability.log_level"),
];

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub smtp: MailConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    /// `*` allows any origin.
    #[serde(default = "default_allow_origins")]
    pub allow_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_origins: default_allow_origins(),
        }
    }
}

fn default_allow_origins() -> Vec<String> {
    vec!["*".to_string()]
}

#[derive(Debug, Deserialize, Clone)]
pub struct ObservabilityConfig {
    /// `EnvFilter` directives, e.g. `info` or `contact_relay=debug`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_environment")]
    pub environment: String,
}

impl ObservabilityConfig {
    /// Production logs are emitted as JSON.
    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            environment: default_environment(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_environment() -> String {
    "development".to_string()
}

impl Config {
    /// Load configuration from the process environment
    pub fn load(config_path: Option<String>) -> Result<Self, ConfigError> {
        Self::load_from(config_path, std::env::vars().collect())
    }

    /// Load configuration from an explicit set of environment variables
    ///
    /// Priority (highest to lowest):
    /// 1. Flat deployment variables (SENDER_EMAIL, SMTP_PORT, ENVIRONMENT, etc.)
    /// 2. Prefixed variables (CONTACT_RELAY__SMTP__SERVER, etc.)
    /// 3. Config file specified by path
    /// 4. Hardcoded defaults
    pub fn load_from(
        config_path: Option<String>,
        vars: HashMap<String, String>,
    ) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8000)?;

        let config_file_path = config_path
            .or_else(|| vars.get("CONFIG_PATH").cloned())
            .unwrap_or_else(|| "config/default.toml".to_string());

        // Optional, ignored if not found
        if std::path::Path::new(&config_file_path).exists() {
            builder = builder.add_source(File::with_name(&config_file_path));
        }

        builder = builder.add_source(
            Environment::with_prefix("CONTACT_RELAY")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("cors.allow_origins")
                .source(Some(vars.clone().into_iter().collect())),
        );

        for (var, key) in LEGACY_VARS {
            if let Some(value) = vars.get(var) {
                builder = builder.set_override(key, value.as_str())?;
            }
        }

        builder.build()?.try_deserialize()
    }

    /// Validate configuration
    ///
    /// Missing SMTP credentials are not an error here: the relay reports
    /// them per request so health probes keep answering.
    pub fn validate(&self) -> Result<(), String> {
        if self.server.port == 0 {
            return Err("Server port must be greater than 0".to_string());
        }
        if self.smtp.port == 0 {
            return Err("SMTP port must be greater than 0".to_string());
        }
        if self.smtp.timeout_secs == 0 {
            return Err("SMTP timeout must be at least 1 second".to_string());
        }
        if self.cors.allow_origins.is_empty() {
            return Err("At least one CORS origin must be allowed".to_string());
        }
        Ok(())
    }
}
