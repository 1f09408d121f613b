//! Menu block rendering configuration.

use serde::{Deserialize, Serialize};

/// Menu block rendering configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuConfig {
    /// Naming prefix of menu templates; candidates are
    /// `<prefix>_<region>_<view-mode>`, `<prefix>_<region>` and `<prefix>`.
    #[serde(default = "default_template_prefix")]
    pub template_prefix: String,
    /// View mode used when the caller does not supply one.
    #[serde(default = "default_view_mode")]
    pub default_view_mode: String,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            template_prefix: default_template_prefix(),
            default_view_mode: default_view_mode(),
        }
    }
}

fn default_template_prefix() -> String {
    "Menu.render_menu".to_string()
}

fn default_view_mode() -> String {
    "default".to_string()
}
