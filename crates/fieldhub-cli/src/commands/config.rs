//! Configuration management CLI commands.

use clap::{Args, Subcommand};

use crate::output::{self, OutputFormat};
use fieldhub_core::config::AppConfig;
use fieldhub_core::error::AppError;
use fieldhub_view::LiquidTemplateEngine;

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,
    /// Check that templates and the translation catalog load
    Validate,
}

/// Execute config commands
pub fn execute(
    args: &ConfigArgs,
    config: &AppConfig,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        ConfigCommand::Show => match format {
            OutputFormat::Json => output::print_json(config),
            OutputFormat::Table => {
                println!("Configuration '{config_path}':");
                output::print_kv("Log level", &config.logging.level);
                output::print_kv("Log format", &config.logging.format);
                output::print_kv("Templates", &config.templates.directory);
                output::print_kv("Template extension", &config.templates.extension);
                output::print_kv("Menu prefix", &config.menu.template_prefix);
                output::print_kv("Default view mode", &config.menu.default_view_mode);
                output::print_kv(
                    "Catalog",
                    config.i18n.catalog.as_deref().unwrap_or("(none)"),
                );
            }
        },
        ConfigCommand::Validate => match super::ViewLayer::from_config(config) {
            Ok(view) => {
                output::print_success(&format!("Configuration '{config_path}' is valid"));
                report_templates(&view.templates);
            }
            Err(e) => {
                output::print_error(&format!("Configuration invalid: {e}"));
                return Err(e);
            }
        },
    }

    Ok(())
}

fn report_templates(templates: &LiquidTemplateEngine) {
    let ids = templates.ids();
    if ids.is_empty() {
        output::print_warning("No templates loaded");
        return;
    }
    output::print_kv("Templates loaded", &ids.len().to_string());
    for id in ids {
        println!("    {id}");
    }
}
