//! Rendering of a single field.

use clap::{Args, ValueEnum};
use serde_json::Value;

use crate::output::{self, OutputFormat};
use fieldhub_core::config::AppConfig;
use fieldhub_core::error::AppError;
use fieldhub_core::types::{Entity, FieldDefinition, TableRef};
use fieldhub_hooks::LifecyclePhase;

/// Render phases selectable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RenderPhase {
    /// Field content
    Display,
    /// Form widget
    Edit,
    /// Default formatter
    Formatter,
    /// Instance settings form
    Settings,
}

impl From<RenderPhase> for LifecyclePhase {
    fn from(phase: RenderPhase) -> Self {
        match phase {
            RenderPhase::Display => Self::Display,
            RenderPhase::Edit => Self::Edit,
            RenderPhase::Formatter => Self::Formatter,
            RenderPhase::Settings => Self::Settings,
        }
    }
}

/// Arguments for the display command
#[derive(Debug, Args)]
pub struct DisplayArgs {
    /// JSON file with the field definitions
    #[arg(long, default_value = "fixtures/article_fields.json")]
    pub fields: String,

    /// Field to render
    #[arg(long)]
    pub field: String,

    /// Value to render the field with
    #[arg(long)]
    pub value: Option<String>,

    /// Render phase
    #[arg(long, value_enum, default_value = "display")]
    pub phase: RenderPhase,

    /// View mode; defaults to `[menu] default_view_mode`
    #[arg(long)]
    pub view_mode: Option<String>,
}

/// Render the field of an ad-hoc entity
pub fn execute(args: &DisplayArgs, config: &AppConfig, format: OutputFormat) -> Result<(), AppError> {
    let fields: Vec<FieldDefinition> = super::read_json(&args.fields)?;
    let view = super::ViewLayer::from_config(config)?;
    let table = TableRef::new("cli");
    let manager = super::build_manager(&view, &table, fields)?;

    let mut entity = Entity::new(&table.name);
    if let Some(value) = &args.value {
        entity
            .values
            .insert(args.field.clone(), Value::String(value.clone()));
    }

    let view_mode = args
        .view_mode
        .as_deref()
        .unwrap_or(config.menu.default_view_mode.as_str());
    let markup = manager.render(&entity, &args.field, args.phase.into(), view_mode)?;

    output::print_markup(&markup, format);
    Ok(())
}
