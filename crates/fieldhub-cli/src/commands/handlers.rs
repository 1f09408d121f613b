//! Field handler listing.

use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use fieldhub_core::config::AppConfig;
use fieldhub_core::error::AppError;

/// One registered handler
#[derive(Debug, Serialize, Tabled)]
struct HandlerRow {
    #[tabled(rename = "Type")]
    field_type: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Hidden")]
    hidden: bool,
}

/// List handlers in registration order
pub fn execute(config: &AppConfig, format: OutputFormat) -> Result<(), AppError> {
    let view = super::ViewLayer::from_config(config)?;
    let registry = super::build_registry(&view);

    let rows: Vec<HandlerRow> = registry
        .list()
        .map(|(field_type, descriptor)| HandlerRow {
            field_type: field_type.to_string(),
            name: descriptor.name,
            description: descriptor.description,
            hidden: descriptor.hidden,
        })
        .collect();

    output::print_list(&rows, format);
    Ok(())
}
