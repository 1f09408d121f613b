//! Translation function.

/// Translates user-facing strings. Pure: no side effects.
pub trait Translator: Send + Sync + std::fmt::Debug {
    /// Translates `message` within `domain`, substituting each `%s` with the
    /// next argument.
    fn translate(&self, domain: &str, message: &str, args: &[&str]) -> String;
}
