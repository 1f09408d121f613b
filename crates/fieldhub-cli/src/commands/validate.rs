//! Save-flow validation of a submission.

use clap::Args;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use fieldhub_core::config::AppConfig;
use fieldhub_core::error::AppError;
use fieldhub_core::types::{Entity, FieldDefinition, TableRef};
use fieldhub_hooks::{MemoryEntityStore, SaveOutcome};

/// Arguments for the validate command
#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// JSON file with the field definitions to attach
    #[arg(long, default_value = "fixtures/article_fields.json")]
    pub fields: String,

    /// JSON file with the submitted values, keyed by field name
    #[arg(long)]
    pub post: String,

    /// Table the fields are attached to
    #[arg(long, default_value = "articles")]
    pub table: String,
}

/// One failed rule
#[derive(Debug, Serialize, Tabled)]
struct FailureRow {
    #[tabled(rename = "Field")]
    field: String,
    #[tabled(rename = "Rule")]
    rule: String,
    #[tabled(rename = "Message")]
    message: String,
}

/// Attach the fields, then save the submission into an in-memory store
pub fn execute(args: &ValidateArgs, config: &AppConfig, format: OutputFormat) -> Result<(), AppError> {
    let fields: Vec<FieldDefinition> = super::read_json(&args.fields)?;
    let post: IndexMap<String, Value> = super::read_json(&args.post)?;

    let view = super::ViewLayer::from_config(config)?;
    let table = TableRef::new(&args.table);
    let manager = super::build_manager(&view, &table, fields)?;

    let mut store = MemoryEntityStore::new();
    let mut entity = Entity::new(&table.name);

    match manager.save(&mut entity, &mut store, &post)? {
        SaveOutcome::Saved => match format {
            OutputFormat::Json => output::print_json(&entity),
            OutputFormat::Table => {
                output::print_success("Submission is valid");
                for (name, value) in &entity.values {
                    output::print_kv(name, &value.to_string());
                }
            }
        },
        SaveOutcome::Invalid(errors) => {
            let rows: Vec<FailureRow> = errors
                .iter()
                .flat_map(|(path, failures)| {
                    failures.iter().map(move |failure| FailureRow {
                        field: path.trim_start_matches(':').to_string(),
                        rule: failure.rule.clone(),
                        message: failure.message.clone(),
                    })
                })
                .collect();
            output::print_list(&rows, format);
            return Err(AppError::validation(format!(
                "{} rule(s) failed",
                rows.len()
            )));
        }
        SaveOutcome::Vetoed(veto) => {
            output::print_warning(&format!(
                "Save vetoed by field '{}' during {}",
                veto.field, veto.phase
            ));
        }
    }

    Ok(())
}
