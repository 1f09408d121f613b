//! Lifecycle phase definitions and the context passed to field handlers.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use fieldhub_core::error::AppError;
use fieldhub_core::result::AppResult;
use fieldhub_core::types::{EntityRef, FieldDefinition, HandlerDescriptor, TableRef};
use fieldhub_core::validation::Validator;

/// Enumeration of every point in a field's life a handler is invoked at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecyclePhase {
    // ── Entity ──
    /// Render the field's content for viewing.
    Display,
    /// Render the field's form widget.
    Edit,
    /// Render the field through its default formatter.
    Formatter,
    /// Before an entity carrying the field is loaded. Can veto.
    BeforeFind,
    /// After an entity carrying the field was saved.
    AfterSave,
    /// Before an entity is validated; handlers register rules here. Can veto.
    BeforeValidate,
    /// After an entity passed validation. Can veto.
    AfterValidate,
    /// Before an entity is deleted. Can veto.
    BeforeDelete,
    /// After an entity was deleted.
    AfterDelete,

    // ── Instance ──
    /// Describe the handler.
    Info,
    /// Render the instance settings form.
    Settings,
    /// Before a field instance is attached to a table. Can veto.
    BeforeAttach,
    /// After a field instance was attached.
    AfterAttach,
    /// Before a field instance is detached from a table. Can veto.
    BeforeDetach,
    /// After a field instance was detached.
    AfterDetach,
}

/// How the dispatcher treats a phase's result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseKind {
    /// Produces markup.
    Render,
    /// Produces a handler descriptor.
    Describe,
    /// Produces a continue/veto flag.
    Gate,
    /// Result is ignored.
    Notify,
}

impl LifecyclePhase {
    /// Every phase, entity phases first.
    pub const ALL: [LifecyclePhase; 15] = [
        Self::Display,
        Self::Edit,
        Self::Formatter,
        Self::BeforeFind,
        Self::AfterSave,
        Self::BeforeValidate,
        Self::AfterValidate,
        Self::BeforeDelete,
        Self::AfterDelete,
        Self::Info,
        Self::Settings,
        Self::BeforeAttach,
        Self::AfterAttach,
        Self::BeforeDetach,
        Self::AfterDetach,
    ];

    /// Returns the callback name of this phase.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Display => "display",
            Self::Edit => "edit",
            Self::Formatter => "formatter",
            Self::BeforeFind => "beforeFind",
            Self::AfterSave => "afterSave",
            Self::BeforeValidate => "beforeValidate",
            Self::AfterValidate => "afterValidate",
            Self::BeforeDelete => "beforeDelete",
            Self::AfterDelete => "afterDelete",
            Self::Info => "info",
            Self::Settings => "settings",
            Self::BeforeAttach => "beforeAttach",
            Self::AfterAttach => "afterAttach",
            Self::BeforeDetach => "beforeDetach",
            Self::AfterDetach => "afterDetach",
        }
    }

    /// Returns how the dispatcher treats this phase's result.
    pub fn kind(&self) -> PhaseKind {
        match self {
            Self::Display | Self::Edit | Self::Formatter | Self::Settings => PhaseKind::Render,
            Self::Info => PhaseKind::Describe,
            Self::BeforeFind
            | Self::BeforeValidate
            | Self::AfterValidate
            | Self::BeforeDelete
            | Self::BeforeAttach
            | Self::BeforeDetach => PhaseKind::Gate,
            Self::AfterSave | Self::AfterDelete | Self::AfterAttach | Self::AfterDetach => {
                PhaseKind::Notify
            }
        }
    }

    /// Returns whether a `false` result of this phase vetoes the enclosing operation.
    pub fn is_gate(&self) -> bool {
        self.kind() == PhaseKind::Gate
    }

    /// Returns whether the phase concerns a field instance rather than an entity.
    pub fn is_instance_phase(&self) -> bool {
        matches!(
            self,
            Self::Info
                | Self::Settings
                | Self::BeforeAttach
                | Self::AfterAttach
                | Self::BeforeDetach
                | Self::AfterDetach
        )
    }

    /// Fully qualified event name, e.g. `Field.Text.Entity.display`.
    pub fn event_name(&self, handler: &str) -> String {
        let scope = if self.is_instance_phase() {
            "Instance"
        } else {
            "Entity"
        };
        format!("Field.{}.{}.{}", handler, scope, self.as_str())
    }
}

impl std::fmt::Display for LifecyclePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of invoking one phase on one handler.
#[derive(Debug, Clone, PartialEq)]
pub enum PhaseOutcome {
    /// Markup produced by a render phase.
    Rendered(String),
    /// Descriptor produced by the info phase.
    Described(HandlerDescriptor),
    /// A gate phase allowed the operation to proceed.
    Continue,
    /// A gate phase returned `false`; the enclosing operation must stop.
    Veto,
    /// A notify phase ran; its result carries no meaning.
    Notified,
}

impl PhaseOutcome {
    /// Returns `true` for [`PhaseOutcome::Veto`].
    pub fn is_veto(&self) -> bool {
        matches!(self, Self::Veto)
    }
}

/// Everything a handler receives when invoked.
///
/// The field is borrowed mutably so handlers can reshape its value in place;
/// the change is visible to the caller only.
#[derive(Debug)]
pub struct InvocationContext<'a> {
    /// Field being processed.
    pub field: &'a mut FieldDefinition,
    /// Entity that started the invocation.
    pub entity: Option<EntityRef>,
    /// Table the field is being attached to or detached from.
    pub table: Option<&'a TableRef>,
    /// Validator collecting rules during `beforeValidate`.
    pub validator: Option<&'a mut Validator>,
    /// Raw submitted value, available to `afterSave`.
    pub post: Option<Value>,
    /// View mode the host is rendering in.
    pub view_mode: Option<String>,
    /// Free-form options forwarded to templates.
    pub options: HashMap<String, Value>,
}

impl<'a> InvocationContext<'a> {
    /// Creates a context around a field.
    pub fn new(field: &'a mut FieldDefinition) -> Self {
        Self {
            field,
            entity: None,
            table: None,
            validator: None,
            post: None,
            view_mode: None,
            options: HashMap::new(),
        }
    }

    /// Sets the owning entity.
    pub fn with_entity(mut self, entity: EntityRef) -> Self {
        self.entity = Some(entity);
        self
    }

    /// Sets the owning table.
    pub fn with_table(mut self, table: &'a TableRef) -> Self {
        self.table = Some(table);
        self
    }

    /// Sets the pending validator.
    pub fn with_validator(mut self, validator: &'a mut Validator) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Sets the submitted value.
    pub fn with_post(mut self, post: Value) -> Self {
        self.post = Some(post);
        self
    }

    /// Sets the view mode.
    pub fn with_view_mode(mut self, view_mode: &str) -> Self {
        self.view_mode = Some(view_mode.to_string());
        self
    }

    /// Inserts a free-form option.
    pub fn with_option(mut self, key: &str, value: Value) -> Self {
        self.options.insert(key.to_string(), value);
        self
    }

    /// Returns the pending validator, or an error if the host did not supply one.
    pub fn validator_mut(&mut self) -> AppResult<&mut Validator> {
        let name = &self.field.name;
        self.validator.as_deref_mut().ok_or_else(|| {
            AppError::internal(format!("No validator supplied while validating field '{name}'"))
        })
    }

    /// Template data bag: the field and the options.
    pub fn template_data(&self) -> AppResult<Value> {
        Ok(serde_json::json!({
            "field": serde_json::to_value(&*self.field)?,
            "options": self.options,
            "view_mode": self.view_mode,
        }))
    }
}
