//! Menu block rendering.

use std::sync::Arc;

use serde_json::{Map, Value, json};
use tracing::{debug, info};

use fieldhub_core::config::menu::MenuConfig;
use fieldhub_core::error::AppError;
use fieldhub_core::result::AppResult;
use fieldhub_core::traits::{MenuRepository, ResolutionCache, TemplateEngine};
use fieldhub_core::types::{Block, TemplateKey};

use crate::resolver::{TemplateNaming, TemplateResolver};
use crate::tree::thread_links;

/// Renders blocks whose `delta` names a menu.
#[derive(Debug, Clone)]
pub struct MenuBlockRenderer {
    templates: Arc<dyn TemplateEngine>,
    menus: Arc<dyn MenuRepository>,
    resolver: TemplateResolver,
    default_view_mode: String,
}

impl MenuBlockRenderer {
    /// Creates a renderer with the default naming scheme.
    pub fn new(
        templates: Arc<dyn TemplateEngine>,
        menus: Arc<dyn MenuRepository>,
        cache: Arc<dyn ResolutionCache>,
    ) -> Self {
        Self::from_config(&MenuConfig::default(), templates, menus, cache)
    }

    /// Creates a renderer from the `[menu]` configuration section.
    pub fn from_config(
        config: &MenuConfig,
        templates: Arc<dyn TemplateEngine>,
        menus: Arc<dyn MenuRepository>,
        cache: Arc<dyn ResolutionCache>,
    ) -> Self {
        Self {
            templates,
            menus,
            resolver: TemplateResolver::new(TemplateNaming::new(&config.template_prefix), cache),
            default_view_mode: config.default_view_mode.clone(),
        }
    }

    /// Returns the template resolver.
    pub fn resolver(&self) -> &TemplateResolver {
        &self.resolver
    }

    /// Renders a menu block.
    ///
    /// `view_mode` falls back to the configured default.
    pub fn display_block(&self, block: &Block, view_mode: Option<&str>) -> AppResult<String> {
        self.display_block_with_options(block, view_mode, Map::new())
    }

    /// Renders a menu block, forwarding `options` to the template.
    pub fn display_block_with_options(
        &self,
        block: &Block,
        view_mode: Option<&str>,
        options: Map<String, Value>,
    ) -> AppResult<String> {
        let view_mode = view_mode.unwrap_or(self.default_view_mode.as_str());
        let key = TemplateKey::new(&block.region, view_mode);
        let template_id = self.resolver.resolve(self.templates.as_ref(), &key)?;

        let menu = self.menus.find_menu(block.delta)?.ok_or_else(|| {
            AppError::not_found(format!(
                "Menu {} shown by block {} does not exist",
                block.delta, block.id
            ))
        })?;
        let links = thread_links(self.menus.find_links(menu.id)?);

        debug!(
            block = block.id,
            menu = menu.id,
            region = %block.region,
            view_mode = %view_mode,
            roots = links.len(),
            "Rendering menu block"
        );

        let mut menu_data = serde_json::to_value(&menu)?;
        if let Value::Object(fields) = &mut menu_data {
            fields.insert("links".to_string(), serde_json::to_value(&links)?);
        }

        let data = json!({
            "menu": menu_data,
            "block": block,
            "options": options,
            "view_mode": view_mode,
        });
        let markup = self.templates.render(&template_id, &data)?;

        info!(block = block.id, template = %template_id, "Menu block rendered");
        Ok(markup)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryResolutionCache;
    use crate::repository::MemoryMenuRepository;
    use fieldhub_core::error::ErrorKind;
    use fieldhub_core::types::{Menu, MenuLink};

    /// Renders `<template>:<menu title>:<root count>:<view mode>`.
    #[derive(Debug)]
    struct Summary(Vec<&'static str>);

    impl TemplateEngine for Summary {
        fn exists(&self, template_id: &str) -> bool {
            self.0.iter().any(|known| *known == template_id)
        }

        fn render(&self, template_id: &str, data: &Value) -> AppResult<String> {
            Ok(format!(
                "{template_id}:{}:{}:{}",
                data["menu"]["title"].as_str().unwrap_or_default(),
                data["menu"]["links"].as_array().map_or(0, Vec::len),
                data["view_mode"].as_str().unwrap_or_default()
            ))
        }
    }

    fn repository() -> MemoryMenuRepository {
        let mut repository = MemoryMenuRepository::new();
        repository.insert_menu(Menu {
            id: 1,
            title: "Main".to_string(),
            description: String::new(),
        });
        for (id, parent_id, lft, rght) in [(1, None, 1, 4), (2, Some(1), 2, 3), (3, None, 5, 6)] {
            repository.insert_link(MenuLink {
                id,
                menu_id: 1,
                parent_id,
                lft,
                rght,
                title: format!("Link {id}"),
                url: format!("/{id}"),
            });
        }
        repository
    }

    fn renderer(templates: Vec<&'static str>) -> MenuBlockRenderer {
        MenuBlockRenderer::new(
            Arc::new(Summary(templates)),
            Arc::new(repository()),
            Arc::new(MemoryResolutionCache::new()),
        )
    }

    fn block(delta: i64) -> Block {
        Block {
            id: 7,
            delta,
            region: "footer".to_string(),
            title: String::new(),
        }
    }

    #[test]
    fn test_display_block() {
        let renderer = renderer(vec!["Menu.render_menu", "Menu.render_menu_footer"]);
        let out = renderer.display_block(&block(1), Some("full")).expect("rendered");
        assert_eq!(out, "Menu.render_menu_footer:Main:2:full");
    }

    #[test]
    fn test_default_view_mode() {
        let renderer = renderer(vec!["Menu.render_menu_footer_default"]);
        let out = renderer.display_block(&block(1), None).expect("rendered");
        assert_eq!(out, "Menu.render_menu_footer_default:Main:2:default");
    }

    #[test]
    fn test_missing_menu() {
        let renderer = renderer(vec!["Menu.render_menu"]);
        let err = renderer.display_block(&block(9), None).expect_err("no menu");
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[test]
    fn test_missing_template_is_checked_first() {
        let renderer = renderer(Vec::new());
        let err = renderer.display_block(&block(9), None).expect_err("no template");
        assert_eq!(err.kind, ErrorKind::TemplateNotFound);
    }
}
