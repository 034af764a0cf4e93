use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::Path;
use thiserror::Error;
use tracing::{error, info};
use validator::Validate;

const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_ENV: &str = "development";
const CONFIG_DIR: &str = "config";

/// Hard ceiling on a single bulk-create batch, mirrored by command validation.
pub const DEFAULT_BULK_CREATE_MAX: u32 = 1000;
/// Zero-pad width for generated serial numbers (`CPU000001`).
pub const DEFAULT_SERIAL_PAD_WIDTH: usize = 6;

#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] ConfigError),
    #[error("Configuration validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Capacity and numbering policy for the assignment engine.
///
/// Lot capacity always comes from the lot's `serial_count`; item and package
/// targets have no per-node capacity in the catalog, so their limits are
/// deployment policy. `None` means unbounded.
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    #[serde(default)]
    pub default_item_capacity: Option<u32>,

    #[serde(default)]
    pub default_package_capacity: Option<u32>,

    #[serde(default = "default_bulk_create_max")]
    #[validate(range(min = 1))]
    pub bulk_create_max: u32,

    #[serde(default = "default_serial_pad_width")]
    #[validate(range(min = 1, max = 12))]
    pub serial_pad_width: usize,
}

fn default_bulk_create_max() -> u32 {
    DEFAULT_BULK_CREATE_MAX
}

fn default_serial_pad_width() -> usize {
    DEFAULT_SERIAL_PAD_WIDTH
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_item_capacity: None,
            default_package_capacity: None,
            bulk_create_max: DEFAULT_BULK_CREATE_MAX,
            serial_pad_width: DEFAULT_SERIAL_PAD_WIDTH,
        }
    }
}

/// Application configuration with validation.
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Environment name: development, staging, production
    #[serde(default = "default_environment")]
    pub environment: String,

    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit logs as JSON instead of human-readable text
    #[serde(default)]
    pub log_json: bool,

    #[serde(default)]
    #[validate]
    pub engine: EngineConfig,
}

fn default_environment() -> String {
    DEFAULT_ENV.to_string()
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: default_environment(),
            log_level: default_log_level(),
            log_json: false,
            engine: EngineConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }
}

/// Loads configuration from `config/default`, an environment-specific file
/// selected by `RUN_ENV`/`APP_ENV`, and `APP__`-prefixed environment
/// variables, in that order of precedence.
pub fn load_config() -> Result<AppConfig, AppConfigError> {
    let run_env = env::var("RUN_ENV")
        .or_else(|_| env::var("APP_ENV"))
        .unwrap_or_else(|_| DEFAULT_ENV.to_string());
    info!("Loading configuration for environment: {}", run_env);

    if !Path::new(CONFIG_DIR).exists() {
        info!(
            "Config directory '{}' not found; relying on built-in defaults and environment variables",
            CONFIG_DIR
        );
    }

    let config = Config::builder()
        .set_default("environment", DEFAULT_ENV)?
        .set_default("log_level", DEFAULT_LOG_LEVEL)?
        .set_default("log_json", false)?
        .add_source(File::with_name(&format!("{}/default", CONFIG_DIR)).required(false))
        .add_source(File::with_name(&format!("{}/{}", CONFIG_DIR, run_env)).required(false))
        .add_source(Environment::with_prefix("APP").separator("__"))
        .build()?;

    let app_config: AppConfig = config.try_deserialize()?;

    app_config.validate().map_err(|e| {
        error!("Configuration validation failed: {:?}", e);
        AppConfigError::Validation(e)
    })?;

    Ok(app_config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_defaults_are_unbounded_except_bulk_limit() {
        let engine = EngineConfig::default();
        assert_eq!(engine.default_item_capacity, None);
        assert_eq!(engine.default_package_capacity, None);
        assert_eq!(engine.bulk_create_max, 1000);
        assert_eq!(engine.serial_pad_width, 6);
    }

    #[test]
    fn default_config_validates() {
        assert!(AppConfig::default().validate().is_ok());
    }
}
