//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section; every section has defaults so an empty file is valid.

pub mod i18n;
pub mod logging;
pub mod menu;
pub mod templates;

use serde::{Deserialize, Serialize};

use self::i18n::I18nConfig;
use self::logging::LoggingConfig;
use self::menu::MenuConfig;
use self::templates::TemplatesConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// Top-level deserialization target for the merged TOML configuration file
/// and `FIELDHUB__*` environment overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Template lookup settings.
    #[serde(default)]
    pub templates: TemplatesConfig,
    /// Menu block rendering settings.
    #[serde(default)]
    pub menu: MenuConfig,
    /// Translation settings.
    #[serde(default)]
    pub i18n: I18nConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    ///
    /// A missing file is not an error; environment variables prefixed with
    /// `FIELDHUB__` (e.g. `FIELDHUB__LOGGING__LEVEL=debug`) override file values.
    pub fn load(path: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("FIELDHUB")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}
