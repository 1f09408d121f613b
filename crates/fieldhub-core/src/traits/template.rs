//! Template engine trait.

use serde_json::Value;

use crate::result::AppResult;

/// Renders element templates addressed as `Plugin.name`.
pub trait TemplateEngine: Send + Sync + std::fmt::Debug {
    /// Returns whether a template with this identifier exists.
    fn exists(&self, template_id: &str) -> bool;

    /// Renders a template with the given data bag.
    fn render(&self, template_id: &str, data: &Value) -> AppResult<String>;
}
