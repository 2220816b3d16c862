use crate::core::{AppError, Currency, Result};
use crate::modules::gateways::models::{validate_settings, GatewaySettings, HostContext};
use crate::modules::gateways::services::khalti_client::DEFAULT_BASE_URL;
use std::time::Duration;

pub mod server;

pub use server::ServerConfig;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub server: ServerConfig,
    pub khalti: KhaltiConfig,
    pub host: HostContext,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: String,
    pub log_level: String,
    /// Emit logs as JSON lines instead of human-readable text
    pub log_json: bool,
}

#[derive(Debug, Clone)]
pub struct KhaltiConfig {
    pub base_url: String,
    pub settings: GatewaySettings,
    pub timeout_secs: u64,
}

impl KhaltiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_vars<F>(var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            var(key).ok_or_else(|| AppError::Configuration(format!("{} not set", key)))
        };
        let or_default = |key: &str, default: &str| var(key).unwrap_or_else(|| default.to_string());

        let config = Config {
            app: AppConfig {
                env: or_default("APP_ENV", "development"),
                log_level: or_default("LOG_LEVEL", "debug"),
                log_json: or_default("LOG_FORMAT", "text").eq_ignore_ascii_case("json"),
            },
            server: ServerConfig::new(
                or_default("SERVER_HOST", "127.0.0.1"),
                or_default("SERVER_PORT", "8080")
                    .parse()
                    .map_err(|_| AppError::Configuration("Invalid SERVER_PORT".to_string()))?,
            ),
            khalti: KhaltiConfig {
                base_url: or_default("KHALTI_BASE_URL", DEFAULT_BASE_URL),
                settings: GatewaySettings::new(
                    required("KHALTI_PUBLIC_KEY")?,
                    required("KHALTI_SECRET_KEY")?,
                ),
                timeout_secs: or_default("KHALTI_TIMEOUT_SECS", "15")
                    .parse()
                    .map_err(|_| {
                        AppError::Configuration("Invalid KHALTI_TIMEOUT_SECS".to_string())
                    })?,
            },
            host: HostContext::new(
                required("CALLBACK_URL_BASE")?,
                or_default("COMPANY_ID", "1"),
                or_default("CURRENCY", "NPR")
                    .parse::<Currency>()
                    .map_err(AppError::Configuration)?,
            ),
        };

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.khalti.timeout_secs == 0 {
            return Err(AppError::Configuration(
                "KHALTI_TIMEOUT_SECS must be greater than 0".to_string(),
            ));
        }

        if !self.host.callback_url_base.ends_with('/') {
            return Err(AppError::Configuration(
                "CALLBACK_URL_BASE must end with '/'".to_string(),
            ));
        }

        validate_settings(self.khalti.settings.clone())?;

        Ok(())
    }
}
