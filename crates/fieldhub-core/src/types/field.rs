//! Field definitions and handler self-descriptions.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A field attached to a record type, together with its current value.
///
/// `field_type` selects the handler; `metadata.settings` is an opaque blob
/// whose schema belongs to that handler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// Machine name, unique per owning table.
    pub name: String,
    /// Handler type name, e.g. `"text"`.
    #[serde(rename = "type")]
    pub field_type: String,
    /// Human readable label.
    #[serde(default)]
    pub label: String,
    /// Instance configuration.
    #[serde(default)]
    pub metadata: FieldMetadata,
    /// Current content.
    #[serde(default)]
    pub value: Option<Value>,
}

/// Per-instance configuration of a field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldMetadata {
    /// Whether an empty value is rejected on save.
    #[serde(default)]
    pub required: bool,
    /// Help text shown next to the widget.
    #[serde(default)]
    pub description: String,
    /// Handler-specific settings.
    #[serde(default)]
    pub settings: Value,
}

impl FieldDefinition {
    /// Creates a field of the given type with empty metadata and no value.
    pub fn new(name: &str, field_type: &str) -> Self {
        Self {
            name: name.to_string(),
            field_type: field_type.to_string(),
            label: name.to_string(),
            metadata: FieldMetadata::default(),
            value: None,
        }
    }

    /// Sets the label.
    pub fn with_label(mut self, label: &str) -> Self {
        self.label = label.to_string();
        self
    }

    /// Marks the field as required.
    pub fn required(mut self) -> Self {
        self.metadata.required = true;
        self
    }

    /// Sets the handler-specific settings blob.
    pub fn with_settings(mut self, settings: Value) -> Self {
        self.metadata.settings = settings;
        self
    }

    /// Sets the current value.
    pub fn with_value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }

    /// Path under which validation rules for this field are registered.
    pub fn rule_path(&self) -> String {
        format!(":{}", self.name)
    }

    /// Returns the value as text: strings verbatim, `null`/absent as empty,
    /// anything else in its JSON form.
    pub fn value_text(&self) -> String {
        value_as_text(self.value.as_ref())
    }
}

/// Text form of an optional JSON value, as used by text-oriented rules.
pub fn value_as_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Static self-description returned by a field handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlerDescriptor {
    /// Human readable handler name, e.g. `Text`.
    pub name: String,
    /// What the handler stores or allows.
    pub description: String,
    /// When `true` the handler cannot be picked from a field UI.
    pub hidden: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_uses_type_key() {
        let field: FieldDefinition = serde_json::from_value(json!({
            "name": "body",
            "type": "text",
            "metadata": { "required": true, "settings": { "type": "textarea" } }
        }))
        .expect("valid field");

        assert_eq!(field.field_type, "text");
        assert!(field.metadata.required);
        assert_eq!(field.metadata.settings["type"], "textarea");
        assert!(field.value.is_none());
    }

    #[test]
    fn test_value_text() {
        let field = FieldDefinition::new("n", "text");
        assert_eq!(field.value_text(), "");
        assert_eq!(field.clone().with_value(json!("abc")).value_text(), "abc");
        assert_eq!(field.with_value(json!(42)).value_text(), "42");
    }

    #[test]
    fn test_rule_path() {
        assert_eq!(FieldDefinition::new("body", "text").rule_path(), ":body");
    }
}
