//! Template engine over Liquid element templates.

use std::fmt;
use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, info};

use fieldhub_core::config::templates::TemplatesConfig;
use fieldhub_core::error::AppError;
use fieldhub_core::result::AppResult;
use fieldhub_core::traits::TemplateEngine;

/// Element templates parsed once and rendered with Liquid's standard library.
///
/// Templates are addressed as `Plugin.name`; on disk that is
/// `<root>/<Plugin>/<name>.<extension>`.
pub struct LiquidTemplateEngine {
    parser: liquid::Parser,
    templates: IndexMap<String, liquid::Template>,
}

impl fmt::Debug for LiquidTemplateEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiquidTemplateEngine")
            .field("templates", &self.templates.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl LiquidTemplateEngine {
    /// Creates an engine with no templates.
    pub fn new() -> AppResult<Self> {
        let parser = liquid::ParserBuilder::with_stdlib()
            .build()
            .map_err(|e| AppError::render(format!("Failed to build template parser: {e}")))?;

        Ok(Self {
            parser,
            templates: IndexMap::new(),
        })
    }

    /// Creates an engine and loads the configured template directory.
    ///
    /// A missing directory yields an empty engine.
    pub fn from_config(config: &TemplatesConfig) -> AppResult<Self> {
        let mut engine = Self::new()?;
        let root = Path::new(&config.directory);
        if root.is_dir() {
            engine.load_directory(root, &config.extension)?;
        } else {
            debug!(directory = %config.directory, "Template directory not found, starting empty");
        }
        Ok(engine)
    }

    /// Loads every `<root>/<Plugin>/<name>.<extension>` file.
    ///
    /// Returns the number of templates loaded.
    pub fn load_directory(&mut self, root: &Path, extension: &str) -> AppResult<usize> {
        let mut loaded = 0;

        for plugin_dir in fs::read_dir(root)? {
            let plugin_dir = plugin_dir?.path();
            if !plugin_dir.is_dir() {
                continue;
            }
            let Some(plugin) = plugin_dir.file_name().and_then(|n| n.to_str()) else {
                continue;
            };

            for file in fs::read_dir(&plugin_dir)? {
                let path = file?.path();
                if path.extension().and_then(|e| e.to_str()) != Some(extension) {
                    continue;
                }
                let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                    continue;
                };

                let source = fs::read_to_string(&path)?;
                self.register(&format!("{plugin}.{name}"), &source)?;
                loaded += 1;
            }
        }

        info!(root = %root.display(), loaded, "Templates loaded");
        Ok(loaded)
    }

    /// Parses and registers a template, replacing any previous one with the same id.
    pub fn register(&mut self, template_id: &str, source: &str) -> AppResult<()> {
        let template = self.parser.parse(source).map_err(|e| {
            AppError::render(format!("Failed to parse template '{template_id}': {e}"))
        })?;
        self.templates.insert(template_id.to_string(), template);
        Ok(())
    }

    /// Registered template ids in load order.
    pub fn ids(&self) -> Vec<&str> {
        self.templates.keys().map(String::as_str).collect()
    }
}

impl TemplateEngine for LiquidTemplateEngine {
    fn exists(&self, template_id: &str) -> bool {
        self.templates.contains_key(template_id)
    }

    fn render(&self, template_id: &str, data: &Value) -> AppResult<String> {
        let template = self.templates.get(template_id).ok_or_else(|| {
            AppError::template_not_found(format!("Template '{template_id}' does not exist"))
        })?;

        let globals = liquid::to_object(data).map_err(|e| {
            AppError::render(format!("Template data for '{template_id}' is not an object: {e}"))
        })?;

        template
            .render(&globals)
            .map_err(|e| AppError::render(format!("Failed to render '{template_id}': {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldhub_core::error::ErrorKind;
    use serde_json::json;

    #[test]
    fn test_register_and_render() {
        let mut engine = LiquidTemplateEngine::new().expect("engine");
        engine
            .register("Field.hello", "Hello {{ field.name | upcase }}!")
            .expect("parsed");

        assert!(engine.exists("Field.hello"));
        assert!(!engine.exists("Field.bye"));
        let out = engine
            .render("Field.hello", &json!({ "field": { "name": "body" } }))
            .expect("rendered");
        assert_eq!(out, "Hello BODY!");
    }

    #[test]
    fn test_render_missing_template() {
        let engine = LiquidTemplateEngine::new().expect("engine");
        let err = engine.render("Menu.render_menu", &json!({})).expect_err("missing");
        assert_eq!(err.kind, ErrorKind::TemplateNotFound);
    }

    #[test]
    fn test_invalid_template_is_rejected_at_registration() {
        let mut engine = LiquidTemplateEngine::new().expect("engine");
        let err = engine
            .register("Field.broken", "{% if %}")
            .expect_err("bad syntax");
        assert_eq!(err.kind, ErrorKind::Render);
    }

    #[test]
    fn test_load_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let menu = dir.path().join("Menu");
        fs::create_dir(&menu).expect("mkdir");
        fs::write(menu.join("render_menu.liquid"), "{{ menu.title }}").expect("write");
        fs::write(menu.join("render_menu_footer.liquid"), "footer").expect("write");
        fs::write(menu.join("notes.txt"), "ignored").expect("write");

        let mut engine = LiquidTemplateEngine::new().expect("engine");
        let loaded = engine.load_directory(dir.path(), "liquid").expect("loaded");

        assert_eq!(loaded, 2);
        assert!(engine.exists("Menu.render_menu"));
        assert!(engine.exists("Menu.render_menu_footer"));
        assert!(!engine.exists("Menu.notes"));
    }

    #[test]
    fn test_from_config_tolerates_missing_directory() {
        let config = TemplatesConfig {
            directory: "/definitely/not/here".to_string(),
            extension: "liquid".to_string(),
        };
        let engine = LiquidTemplateEngine::from_config(&config).expect("engine");
        assert!(engine.ids().is_empty());
    }
}
