//! Message catalog translator.
//!
//! A catalog file is JSON keyed by domain, then by source message:
//!
//! ```json
//! { "field": { "Field required.": "Campo obligatorio." } }
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::debug;

use fieldhub_core::result::AppResult;
use fieldhub_core::traits::Translator;

/// Looks messages up per domain and falls back to the source text.
#[derive(Debug, Clone, Default)]
pub struct CatalogTranslator {
    catalog: HashMap<String, HashMap<String, String>>,
}

impl CatalogTranslator {
    /// Creates a translator with an empty catalog (identity translation).
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a JSON catalog file.
    pub fn from_file(path: &Path) -> AppResult<Self> {
        let raw = fs::read_to_string(path)?;
        let catalog: HashMap<String, HashMap<String, String>> = serde_json::from_str(&raw)?;
        debug!(
            path = %path.display(),
            domains = catalog.len(),
            "Translation catalog loaded"
        );
        Ok(Self { catalog })
    }

    /// Adds one translation.
    pub fn with_entry(mut self, domain: &str, message: &str, translation: &str) -> Self {
        self.catalog
            .entry(domain.to_string())
            .or_default()
            .insert(message.to_string(), translation.to_string());
        self
    }
}

impl Translator for CatalogTranslator {
    fn translate(&self, domain: &str, message: &str, args: &[&str]) -> String {
        let template = self
            .catalog
            .get(domain)
            .and_then(|messages| messages.get(message))
            .map_or(message, String::as_str);
        substitute(template, args)
    }
}

/// Replaces each `%s` with the next argument; `%%` yields a literal `%`.
/// Placeholders without an argument are left as they are.
fn substitute(template: &str, args: &[&str]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut args = args.iter();
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.peek() {
            Some('%') => {
                chars.next();
                out.push('%');
            }
            Some('s') => {
                chars.next();
                match args.next() {
                    Some(arg) => out.push_str(arg),
                    None => out.push_str("%s"),
                }
            }
            _ => out.push('%'),
        }
    }

    out
}
