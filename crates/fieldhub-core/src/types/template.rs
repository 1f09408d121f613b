//! Template resolution keys and results.

use serde::{Deserialize, Serialize};

/// Cache key of a template resolution: one per region and view mode.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TemplateKey {
    /// Theme region name.
    pub region: String,
    /// View mode in use.
    pub view_mode: String,
}

impl TemplateKey {
    /// Creates a resolution key.
    pub fn new(region: &str, view_mode: &str) -> Self {
        Self {
            region: region.to_string(),
            view_mode: view_mode.to_string(),
        }
    }
}

/// Outcome of a template resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resolution {
    /// The winning template identifier.
    Found(String),
    /// No candidate existed.
    NotFound,
}
