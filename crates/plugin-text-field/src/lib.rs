//! Text field handler plugin for FieldHub.
//!
//! Stores plain text in textboxes and textareas. On display the value runs
//! through a text-processing mode (`full`, `plain`, `filtered`, `markdown`);
//! on save it is checked against the required, max-length and pattern rules
//! configured in the instance settings.

pub mod plugin;
pub mod processing;
pub mod rules;
pub mod settings;
pub mod text;

pub use plugin::TextFieldPlugin;
pub use processing::ProcessingMode;
pub use settings::{TextKind, TextSettings};
pub use text::{FIELD_TYPE, TextField};
