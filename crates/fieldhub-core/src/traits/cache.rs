//! Template resolution cache trait.

use crate::types::template::{Resolution, TemplateKey};

/// Process-lifetime memo of template resolutions.
///
/// Implementations backed by a shared store must tolerate concurrent writers:
/// every worker computes the same resolution for a key, so last writer wins.
pub trait ResolutionCache: Send + Sync + std::fmt::Debug {
    /// Returns the cached resolution for a key, if any.
    fn get(&self, key: &TemplateKey) -> Option<Resolution>;

    /// Stores a resolution.
    fn put(&self, key: TemplateKey, resolution: Resolution);

    /// Number of cached keys.
    fn len(&self) -> usize;

    /// Returns `true` when nothing is cached.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
