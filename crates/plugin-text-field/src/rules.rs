//! Predicates behind the text field's validation rules.

use std::sync::OnceLock;

use regex::Regex;

use crate::settings::ValidationPattern;

static MARKUP_REGEX: OnceLock<Regex> = OnceLock::new();

fn markup_regex() -> &'static Regex {
    MARKUP_REGEX.get_or_init(|| {
        Regex::new(r"(?s)<!--.*?-->|</?[A-Za-z!?][^>]*>").expect("Invalid markup regex")
    })
}

/// Removes HTML tags and comments, keeping their text content.
pub fn strip_tags(text: &str) -> String {
    markup_regex().replace_all(text, "").into_owned()
}

/// Whether a required value has visible content.
///
/// Tags are stripped first. Textarea values are then entity-decoded, so
/// `&nbsp;` alone counts as blank. `"0"` is content.
pub fn has_content(text: &str, textarea: bool) -> bool {
    let stripped = strip_tags(text);
    if textarea {
        !html_escape::decode_html_entities(&stripped).trim().is_empty()
    } else {
        !stripped.trim().is_empty()
    }
}

/// Whether the trimmed value fits in `max_len` characters.
///
/// Counts Unicode scalar values after trimming all Unicode whitespace, so
/// `"héllo"` is five long. A byte count with an ASCII-only trim would call it
/// six; the limit is advertised to users in characters.
pub fn within_length(text: &str, max_len: u64) -> bool {
    u64::try_from(text.trim().chars().count()).is_ok_and(|len| len <= max_len)
}

/// Whether the raw value matches the configured pattern.
pub fn matches_pattern(pattern: &ValidationPattern, text: &str) -> bool {
    pattern.is_match(text)
}
