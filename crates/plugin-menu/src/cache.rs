//! In-process resolution cache backed by `DashMap`.

use dashmap::DashMap;

use fieldhub_core::traits::ResolutionCache;
use fieldhub_core::types::{Resolution, TemplateKey};

/// Resolution cache shared by every renderer of the process.
#[derive(Debug, Default)]
pub struct MemoryResolutionCache {
    entries: DashMap<TemplateKey, Resolution>,
}

impl MemoryResolutionCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ResolutionCache for MemoryResolutionCache {
    fn get(&self, key: &TemplateKey) -> Option<Resolution> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    fn put(&self, key: TemplateKey, resolution: Resolution) {
        self.entries.insert(key, resolution);
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_and_get() {
        let cache = MemoryResolutionCache::new();
        let key = TemplateKey::new("footer", "full");
        assert!(cache.get(&key).is_none());
        assert!(cache.is_empty());

        cache.put(key.clone(), Resolution::Found("Menu.render_menu".to_string()));
        cache.put(TemplateKey::new("left", "full"), Resolution::NotFound);

        assert_eq!(
            cache.get(&key),
            Some(Resolution::Found("Menu.render_menu".to_string()))
        );
        assert_eq!(
            cache.get(&TemplateKey::new("left", "full")),
            Some(Resolution::NotFound)
        );
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_last_writer_wins() {
        let cache = MemoryResolutionCache::new();
        let key = TemplateKey::new("footer", "full");
        cache.put(key.clone(), Resolution::NotFound);
        cache.put(key.clone(), Resolution::Found("Menu.render_menu_footer".to_string()));
        assert_eq!(
            cache.get(&key),
            Some(Resolution::Found("Menu.render_menu_footer".to_string()))
        );
        assert_eq!(cache.len(), 1);
    }
}
