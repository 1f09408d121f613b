//! CLI command definitions and dispatch.

pub mod config;
pub mod display;
pub mod handlers;
pub mod menu;
pub mod validate;

use std::fs;
use std::path::Path;
use std::sync::Arc;

use chrono::{Datelike, Utc};
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use fieldhub_core::config::AppConfig;
use fieldhub_core::error::{AppError, ErrorKind};
use fieldhub_core::types::{FieldDefinition, TableRef};
use fieldhub_hooks::{AttachOutcome, FieldHandlerRegistry, FieldManager, LifecycleDispatcher};
use fieldhub_view::{CatalogTranslator, HooktagExpander, LiquidTemplateEngine};
use plugin_text_field::TextFieldPlugin;

use crate::output::OutputFormat;

/// FieldHub: pluggable content fields and menu blocks
#[derive(Debug, Parser)]
#[command(name = "fieldhub", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List registered field handlers
    Handlers,
    /// Run a submission through the save flow of a set of fields
    Validate(validate::ValidateArgs),
    /// Render one field through a render phase
    Display(display::DisplayArgs),
    /// Render a menu block
    Menu(menu::MenuArgs),
    /// Configuration management
    Config(config::ConfigArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(&self, config: &AppConfig) -> Result<(), AppError> {
        info!(command = self.command.name(), config = %self.config, "Running command");

        let result = match &self.command {
            Commands::Handlers => handlers::execute(config, self.format),
            Commands::Validate(args) => validate::execute(args, config, self.format),
            Commands::Display(args) => display::execute(args, config, self.format),
            Commands::Menu(args) => menu::execute(args, config, self.format),
            Commands::Config(args) => config::execute(args, config, &self.config, self.format),
        };

        match &result {
            Ok(()) => debug!(command = self.command.name(), "Command finished"),
            Err(e) => debug!(command = self.command.name(), error = %e, "Command failed"),
        }
        result
    }
}

impl Commands {
    /// Subcommand name as typed on the command line
    pub fn name(&self) -> &'static str {
        match self {
            Self::Handlers => "handlers",
            Self::Validate(_) => "validate",
            Self::Display(_) => "display",
            Self::Menu(_) => "menu",
            Self::Config(_) => "config",
        }
    }
}

/// View collaborators shared by every command.
#[derive(Debug, Clone)]
pub struct ViewLayer {
    /// Templates loaded from `[templates]`
    pub templates: Arc<LiquidTemplateEngine>,
    /// Translator over the optional `[i18n]` catalog
    pub translator: Arc<CatalogTranslator>,
    /// Built-in hooktags
    pub hooktags: Arc<HooktagExpander>,
}

impl ViewLayer {
    /// Build the view layer from configuration
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let templates = LiquidTemplateEngine::from_config(&config.templates)?;
        let translator = match &config.i18n.catalog {
            Some(path) => CatalogTranslator::from_file(Path::new(path))?,
            None => CatalogTranslator::new(),
        };
        debug!(
            templates = templates.ids().len(),
            catalog = ?config.i18n.catalog,
            "View layer ready"
        );

        Ok(Self {
            templates: Arc::new(templates),
            translator: Arc::new(translator),
            hooktags: Arc::new(default_hooktags()),
        })
    }
}

/// Hooktags available to validation messages and content.
pub fn default_hooktags() -> HooktagExpander {
    let mut hooktags = HooktagExpander::new();
    hooktags
        .register("year", |_, _| Utc::now().year().to_string())
        .register("link", |attrs, content| {
            let url = attrs.get("url").unwrap_or("#");
            format!("<a href=\"{url}\">{}</a>", content.unwrap_or(url))
        });
    hooktags
}

/// Registry with every bundled field handler
pub fn build_registry(view: &ViewLayer) -> FieldHandlerRegistry {
    let mut registry = FieldHandlerRegistry::new();
    TextFieldPlugin::new(
        view.templates.clone(),
        view.translator.clone(),
        view.hooktags.clone(),
    )
    .register_handlers(&mut registry);
    registry
}

/// Field manager with `fields` attached to `table`
pub fn build_manager(
    view: &ViewLayer,
    table: &TableRef,
    fields: Vec<FieldDefinition>,
) -> Result<FieldManager, AppError> {
    let dispatcher = LifecycleDispatcher::new(Arc::new(build_registry(view)));
    let mut manager = FieldManager::new(dispatcher);

    for field in fields {
        let name = field.name.clone();
        if let AttachOutcome::Vetoed(veto) = manager.attach(table, field)? {
            return Err(AppError::validation(format!(
                "Field '{name}' refused to attach ({})",
                veto.phase
            )));
        }
    }
    Ok(manager)
}

/// Helper: read a JSON file into `T`
pub fn read_json<T: DeserializeOwned>(path: &str) -> Result<T, AppError> {
    let raw = fs::read_to_string(path).map_err(|e| {
        AppError::with_source(ErrorKind::Io, format!("Failed to read '{path}': {e}"), e)
    })?;
    Ok(serde_json::from_str(&raw)?)
}
