//! Template resolution with a region / view-mode fallback chain.
//!
//! For a block in region `footer` rendered in view mode `full` the
//! candidates are, in order:
//!
//! 1. `Menu.render_menu_footer_full`
//! 2. `Menu.render_menu_footer`
//! 3. `Menu.render_menu`
//!
//! The first candidate the template engine knows wins. The answer, found or
//! not, is cached per `(region, view_mode)` so the engine is asked at most
//! once per key for the life of the cache.

use std::sync::Arc;

use tracing::{debug, warn};

use fieldhub_core::error::AppError;
use fieldhub_core::result::AppResult;
use fieldhub_core::traits::{ResolutionCache, TemplateEngine};
use fieldhub_core::types::{Resolution, TemplateKey};

/// Maps a key to its ordered template candidates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateNaming {
    prefix: String,
}

impl TemplateNaming {
    /// Creates a naming scheme with the given prefix, e.g. `Menu.render_menu`.
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
        }
    }

    /// Candidates from most to least specific.
    pub fn candidates(&self, key: &TemplateKey) -> [String; 3] {
        let prefix = &self.prefix;
        [
            format!("{prefix}_{}_{}", key.region, key.view_mode),
            format!("{prefix}_{}", key.region),
            prefix.clone(),
        ]
    }
}

impl Default for TemplateNaming {
    fn default() -> Self {
        Self::new("Menu.render_menu")
    }
}

/// Resolves and memoizes templates for `(region, view_mode)` keys.
#[derive(Debug, Clone)]
pub struct TemplateResolver {
    naming: TemplateNaming,
    cache: Arc<dyn ResolutionCache>,
}

impl TemplateResolver {
    /// Creates a resolver over a (possibly shared) cache.
    pub fn new(naming: TemplateNaming, cache: Arc<dyn ResolutionCache>) -> Self {
        Self { naming, cache }
    }

    /// Returns the naming scheme.
    pub fn naming(&self) -> &TemplateNaming {
        &self.naming
    }

    /// Returns the template id for `key`, or `TemplateNotFound`.
    pub fn resolve(&self, engine: &dyn TemplateEngine, key: &TemplateKey) -> AppResult<String> {
        let resolution = match self.cache.get(key) {
            Some(cached) => {
                debug!(region = %key.region, view_mode = %key.view_mode, "Template resolution cache hit");
                cached
            }
            None => {
                let resolution = self.lookup(engine, key);
                self.cache.put(key.clone(), resolution.clone());
                resolution
            }
        };

        match resolution {
            Resolution::Found(template_id) => Ok(template_id),
            Resolution::NotFound => Err(AppError::template_not_found(format!(
                "No menu template for region '{}' in view mode '{}' (tried {})",
                key.region,
                key.view_mode,
                self.naming.candidates(key).join(", ")
            ))),
        }
    }

    fn lookup(&self, engine: &dyn TemplateEngine, key: &TemplateKey) -> Resolution {
        let found = self
            .naming
            .candidates(key)
            .into_iter()
            .find(|candidate| engine.exists(candidate));

        match found {
            Some(template_id) => {
                debug!(
                    region = %key.region,
                    view_mode = %key.view_mode,
                    template = %template_id,
                    "Template resolved"
                );
                Resolution::Found(template_id)
            }
            None => {
                warn!(region = %key.region, view_mode = %key.view_mode, "No template candidate exists");
                Resolution::NotFound
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryResolutionCache;
    use fieldhub_core::error::ErrorKind;
    use serde_json::Value;
    use std::sync::Mutex;

    /// Knows a fixed set of ids and records every existence query.
    #[derive(Debug, Default)]
    struct Probe {
        known: Vec<String>,
        queries: Mutex<Vec<String>>,
    }

    impl Probe {
        fn knowing(ids: &[&str]) -> Self {
            Self {
                known: ids.iter().map(|s| s.to_string()).collect(),
                queries: Mutex::default(),
            }
        }

        fn queries(&self) -> Vec<String> {
            self.queries.lock().map(|q| q.clone()).unwrap_or_default()
        }
    }

    impl TemplateEngine for Probe {
        fn exists(&self, template_id: &str) -> bool {
            if let Ok(mut queries) = self.queries.lock() {
                queries.push(template_id.to_string());
            }
            self.known.iter().any(|k| k == template_id)
        }

        fn render(&self, template_id: &str, _data: &Value) -> AppResult<String> {
            Ok(template_id.to_string())
        }
    }

    fn resolver() -> TemplateResolver {
        TemplateResolver::new(TemplateNaming::default(), Arc::new(MemoryResolutionCache::new()))
    }

    #[test]
    fn test_candidates_keep_hyphens() {
        let names = TemplateNaming::default().candidates(&TemplateKey::new("left-sidebar", "teaser"));
        assert_eq!(
            names,
            [
                "Menu.render_menu_left-sidebar_teaser".to_string(),
                "Menu.render_menu_left-sidebar".to_string(),
                "Menu.render_menu".to_string(),
            ]
        );
    }

    #[test]
    fn test_most_specific_wins() {
        let engine = Probe::knowing(&["Menu.render_menu", "Menu.render_menu_footer_full"]);
        let id = resolver()
            .resolve(&engine, &TemplateKey::new("footer", "full"))
            .expect("found");
        assert_eq!(id, "Menu.render_menu_footer_full");
        assert_eq!(engine.queries(), vec!["Menu.render_menu_footer_full"]);
    }

    #[test]
    fn test_falls_back_to_region_then_default() {
        let engine = Probe::knowing(&["Menu.render_menu", "Menu.render_menu_footer"]);
        let resolver = resolver();

        assert_eq!(
            resolver
                .resolve(&engine, &TemplateKey::new("footer", "full"))
                .expect("found"),
            "Menu.render_menu_footer"
        );
        assert_eq!(
            resolver
                .resolve(&engine, &TemplateKey::new("header", "full"))
                .expect("found"),
            "Menu.render_menu"
        );
    }

    #[test]
    fn test_second_resolution_skips_engine() {
        let engine = Probe::knowing(&["Menu.render_menu"]);
        let resolver = resolver();
        let key = TemplateKey::new("footer", "full");

        resolver.resolve(&engine, &key).expect("found");
        let asked = engine.queries().len();
        assert_eq!(asked, 3);

        resolver.resolve(&engine, &key).expect("found");
        assert_eq!(engine.queries().len(), asked);
    }

    #[test]
    fn test_not_found_is_cached_too() {
        let engine = Probe::knowing(&[]);
        let resolver = resolver();
        let key = TemplateKey::new("footer", "full");

        let err = resolver.resolve(&engine, &key).expect_err("nothing exists");
        assert_eq!(err.kind, ErrorKind::TemplateNotFound);
        assert!(err.message.contains("Menu.render_menu_footer_full"));

        let err = resolver.resolve(&engine, &key).expect_err("still nothing");
        assert_eq!(err.kind, ErrorKind::TemplateNotFound);
        assert_eq!(engine.queries().len(), 3);
    }

    #[test]
    fn test_custom_prefix() {
        let engine = Probe::knowing(&["Theme.nav_top"]);
        let resolver = TemplateResolver::new(
            TemplateNaming::new("Theme.nav"),
            Arc::new(MemoryResolutionCache::new()),
        );
        assert_eq!(
            resolver
                .resolve(&engine, &TemplateKey::new("top", "default"))
                .expect("found"),
            "Theme.nav_top"
        );
    }
}
