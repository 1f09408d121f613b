//! Template lookup configuration.

use serde::{Deserialize, Serialize};

/// Where element templates are loaded from.
///
/// A template with id `Plugin.name` lives at
/// `<directory>/<Plugin>/<name>.<extension>`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplatesConfig {
    /// Root directory of element templates.
    #[serde(default = "default_directory")]
    pub directory: String,
    /// File extension of template files, without the dot.
    #[serde(default = "default_extension")]
    pub extension: String,
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            extension: default_extension(),
        }
    }
}

fn default_directory() -> String {
    "./templates".to_string()
}

fn default_extension() -> String {
    "liquid".to_string()
}
