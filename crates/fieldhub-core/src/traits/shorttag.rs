//! Short-tag ("hooktag") expansion.

/// Expands embedded short tags such as `[date format="Y"]` into final text.
pub trait ShortTagExpander: Send + Sync + std::fmt::Debug {
    /// Returns `text` with every known short tag expanded.
    fn expand(&self, text: &str) -> String;
}
