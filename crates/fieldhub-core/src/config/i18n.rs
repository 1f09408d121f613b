//! Translation configuration.

use serde::{Deserialize, Serialize};

/// Translation configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct I18nConfig {
    /// Optional JSON message catalog: `{ "<domain>": { "<message>": "<translation>" } }`.
    #[serde(default)]
    pub catalog: Option<String>,
}
