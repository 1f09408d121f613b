//! Typed instance settings of the text field.
//!
//! The settings blob stored with a field instance is opaque to the host.
//! [`TextSettings::from_value`] is the only way to read it: it fills in
//! defaults, rejects unknown processing modes and compiles the validation
//! pattern, so a broken configuration fails before any value is checked.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use fieldhub_core::error::AppError;
use fieldhub_core::result::AppResult;
use fieldhub_core::types::FieldDefinition;

use crate::processing::ProcessingMode;

/// Widget the field is edited with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextKind {
    /// Single-line textbox.
    #[default]
    Text,
    /// Multi-line textarea.
    Textarea,
}

/// Settings as stored, before validation.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawTextSettings {
    #[serde(rename = "type")]
    kind: TextKind,
    max_len: Option<u64>,
    validation_rule: Option<String>,
    validation_message: Option<String>,
    text_processing: ProcessingMode,
}

/// Validated settings of one text field instance.
#[derive(Debug, Clone)]
pub struct TextSettings {
    /// Textbox or textarea.
    pub kind: TextKind,
    /// Maximum length in characters; `0` means unlimited.
    pub max_len: u64,
    /// Compiled validation pattern.
    pub validation_rule: Option<ValidationPattern>,
    /// Message shown when the pattern does not match; may contain hooktags.
    pub validation_message: Option<String>,
    /// How the value is transformed on display.
    pub text_processing: ProcessingMode,
}

impl Default for TextSettings {
    fn default() -> Self {
        Self {
            kind: TextKind::Text,
            max_len: 0,
            validation_rule: None,
            validation_message: None,
            text_processing: ProcessingMode::Full,
        }
    }
}

impl TextSettings {
    /// Reads and validates a settings blob. `null` yields the defaults.
    pub fn from_value(value: &Value) -> AppResult<Self> {
        if value.is_null() {
            return Ok(Self::default());
        }

        let raw: RawTextSettings = serde_json::from_value(value.clone())
            .map_err(|e| AppError::configuration(format!("Invalid text field settings: {e}")))?;

        let validation_rule = raw
            .validation_rule
            .as_deref()
            .map(str::trim)
            .filter(|rule| !rule.is_empty())
            .map(ValidationPattern::parse)
            .transpose()?;

        Ok(Self {
            kind: raw.kind,
            max_len: raw.max_len.unwrap_or(0),
            validation_rule,
            validation_message: raw.validation_message.filter(|m| !m.trim().is_empty()),
            text_processing: raw.text_processing,
        })
    }

    /// Reads the settings of a field definition.
    pub fn from_field(field: &FieldDefinition) -> AppResult<Self> {
        Self::from_value(&field.metadata.settings).map_err(|e| {
            AppError::configuration(format!("Field '{}': {}", field.name, e.message))
        })
    }

    /// Returns the length limit when one applies.
    ///
    /// Only textboxes are limited; textareas ignore `max_len`.
    pub fn length_limit(&self) -> Option<u64> {
        (self.kind == TextKind::Text && self.max_len > 0).then_some(self.max_len)
    }

    /// Settings with every key present, as handed to templates.
    pub fn to_template_value(&self) -> Value {
        json!({
            "type": self.kind,
            "max_len": self.max_len,
            "validation_rule": self.validation_rule.as_ref().map_or("", |p| p.source()),
            "validation_message": self.validation_message.as_deref().unwrap_or_default(),
            "text_processing": self.text_processing,
        })
    }
}

/// A validation pattern as written in the settings, with its compiled form.
#[derive(Debug, Clone)]
pub struct ValidationPattern {
    source: String,
    regex: Regex,
}

impl ValidationPattern {
    /// Compiles a pattern; see [`compile_pattern`].
    pub fn parse(source: &str) -> AppResult<Self> {
        Ok(Self {
            regex: compile_pattern(source)?,
            source: source.to_string(),
        })
    }

    /// The pattern as written.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Whether `text` matches.
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

/// Characters accepted as pattern delimiters, e.g. `/^\d+$/i` or `#\d+#`.
const DELIMITERS: &[char] = &['/', '#', '~', '!', '@', '%', '|', '+'];

/// Compiles a validation pattern.
///
/// Bare patterns are used as is. Delimited patterns may carry trailing flags:
/// `i` (case-insensitive), `m` (multi-line), `s` (dot matches newline),
/// `x` (verbose) and `u` (Unicode, always on).
pub fn compile_pattern(raw: &str) -> AppResult<Regex> {
    let (pattern, flags) = split_delimited(raw)?;

    let mut builder = RegexBuilder::new(pattern);
    for flag in flags.chars() {
        match flag {
            'i' => builder.case_insensitive(true),
            'm' => builder.multi_line(true),
            's' => builder.dot_matches_new_line(true),
            'x' => builder.ignore_whitespace(true),
            'u' => builder.unicode(true),
            other => {
                return Err(AppError::configuration(format!(
                    "Unsupported pattern flag '{other}' in '{raw}'"
                )));
            }
        };
    }

    builder
        .build()
        .map_err(|e| AppError::configuration(format!("Invalid validation pattern '{raw}': {e}")))
}

fn split_delimited(raw: &str) -> AppResult<(&str, &str)> {
    let Some(delimiter) = raw.chars().next().filter(|c| DELIMITERS.contains(c)) else {
        return Ok((raw, ""));
    };

    let body = &raw[delimiter.len_utf8()..];
    let end = body.rfind(delimiter).ok_or_else(|| {
        AppError::configuration(format!("Validation pattern '{raw}' has no closing delimiter"))
    })?;

    Ok((&body[..end], &body[end + delimiter.len_utf8()..]))
}
