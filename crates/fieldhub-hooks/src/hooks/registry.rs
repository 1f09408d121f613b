//! Field handler registry: field type name → handler, in registration order.

use std::sync::Arc;

use indexmap::IndexMap;
use tracing::info;

use fieldhub_core::error::AppError;
use fieldhub_core::result::AppResult;
use fieldhub_core::types::HandlerDescriptor;

use crate::traits::FieldHandler;

/// Registry of field handlers keyed by field type.
///
/// Filled once at startup, then shared read-only behind an `Arc`.
#[derive(Debug, Default)]
pub struct FieldHandlerRegistry {
    /// Field type → handler.
    handlers: IndexMap<String, Arc<dyn FieldHandler>>,
}

impl FieldHandlerRegistry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler for a field type, replacing any prior handler.
    ///
    /// A replaced handler keeps its original position in [`list`](Self::list).
    /// Returns the handler that was replaced.
    pub fn register(
        &mut self,
        field_type: &str,
        handler: Arc<dyn FieldHandler>,
    ) -> Option<Arc<dyn FieldHandler>> {
        let previous = self.handlers.insert(field_type.to_string(), handler);

        info!(
            field_type = %field_type,
            replaced = previous.is_some(),
            "Field handler registered"
        );

        previous
    }

    /// Returns the handler for a field type.
    ///
    /// An unregistered type is a configuration error, never a silent no-op.
    pub fn resolve(&self, field_type: &str) -> AppResult<Arc<dyn FieldHandler>> {
        self.handlers
            .get(field_type)
            .cloned()
            .ok_or_else(|| AppError::unknown_field_type(field_type))
    }

    /// Lazily yields `(field type, descriptor)` pairs in registration order.
    ///
    /// Call again to restart.
    pub fn list(&self) -> impl Iterator<Item = (&str, HandlerDescriptor)> + '_ {
        self.handlers
            .iter()
            .map(|(field_type, handler)| (field_type.as_str(), handler.info()))
    }

    /// Returns whether a field type has a handler.
    pub fn contains(&self, field_type: &str) -> bool {
        self.handlers.contains_key(field_type)
    }

    /// Returns the registered field types in registration order.
    pub fn types(&self) -> Vec<&str> {
        self.handlers.keys().map(String::as_str).collect()
    }

    /// Returns the number of registered handlers.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
