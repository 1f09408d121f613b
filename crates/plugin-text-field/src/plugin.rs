//! Text field plugin: wires the handler into a registry.

use std::sync::Arc;

use tracing::info;

use fieldhub_core::traits::{ShortTagExpander, TemplateEngine, Translator};
use fieldhub_hooks::FieldHandlerRegistry;

use crate::text::{FIELD_TYPE, TextField};

/// Text field plugin for FieldHub
#[derive(Debug, Clone)]
pub struct TextFieldPlugin {
    /// Shared handler instance
    handler: Arc<TextField>,
}

impl TextFieldPlugin {
    /// Create the plugin with its view collaborators
    pub fn new(
        templates: Arc<dyn TemplateEngine>,
        translator: Arc<dyn Translator>,
        hooktags: Arc<dyn ShortTagExpander>,
    ) -> Self {
        Self {
            handler: Arc::new(TextField::new(templates, translator, hooktags)),
        }
    }

    /// Register the `text` handler
    pub fn register_handlers(&self, registry: &mut FieldHandlerRegistry) {
        registry.register(FIELD_TYPE, self.handler.clone());
        info!(field_type = FIELD_TYPE, "Text field handler registered");
    }

    /// Get the handler
    pub fn handler(&self) -> &Arc<TextField> {
        &self.handler
    }
}
