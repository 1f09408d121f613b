//! Resolves a field's handler and invokes one lifecycle phase.
//!
//! For gate phases (`before*`, `afterValidate`):
//! - A `false` result becomes [`PhaseOutcome::Veto`]; the caller must abort
//!   the enclosing save, delete, attach, or detach.
//!
//! For notify phases (`after*`):
//! - The handler runs; its result carries no meaning.
//!
//! Handler errors and unknown field types propagate unchanged. Nothing is
//! retried or swallowed.

use std::sync::Arc;

use tracing::{debug, info};

use fieldhub_core::error::AppError;
use fieldhub_core::result::AppResult;
use fieldhub_core::types::HandlerDescriptor;

use super::definitions::{InvocationContext, LifecyclePhase, PhaseKind, PhaseOutcome};
use super::registry::FieldHandlerRegistry;

/// Dispatches lifecycle phases to field handlers.
#[derive(Debug, Clone)]
pub struct LifecycleDispatcher {
    /// Handler registry.
    registry: Arc<FieldHandlerRegistry>,
}

impl LifecycleDispatcher {
    /// Creates a new dispatcher.
    pub fn new(registry: Arc<FieldHandlerRegistry>) -> Self {
        Self { registry }
    }

    /// Invokes `phase` on the handler of `ctx.field`'s type.
    pub fn invoke(
        &self,
        phase: LifecyclePhase,
        ctx: &mut InvocationContext<'_>,
    ) -> AppResult<PhaseOutcome> {
        let handler = self.registry.resolve(&ctx.field.field_type)?;

        debug!(
            phase = %phase,
            event = %phase.event_name(&handler_label(&ctx.field.field_type)),
            field = %ctx.field.name,
            field_type = %ctx.field.field_type,
            "Dispatching lifecycle phase"
        );

        let outcome = match phase {
            LifecyclePhase::Info => PhaseOutcome::Described(handler.info()),
            LifecyclePhase::Display => PhaseOutcome::Rendered(handler.display(ctx)?),
            LifecyclePhase::Edit => PhaseOutcome::Rendered(handler.edit(ctx)?),
            LifecyclePhase::Formatter => PhaseOutcome::Rendered(handler.formatter(ctx)?),
            LifecyclePhase::Settings => PhaseOutcome::Rendered(handler.settings(ctx)?),
            LifecyclePhase::BeforeFind => gate(handler.before_find(ctx)?),
            LifecyclePhase::BeforeValidate => gate(handler.before_validate(ctx)?),
            LifecyclePhase::AfterValidate => gate(handler.after_validate(ctx)?),
            LifecyclePhase::BeforeDelete => gate(handler.before_delete(ctx)?),
            LifecyclePhase::BeforeAttach => gate(handler.before_attach(ctx)?),
            LifecyclePhase::BeforeDetach => gate(handler.before_detach(ctx)?),
            LifecyclePhase::AfterSave => {
                handler.after_save(ctx)?;
                PhaseOutcome::Notified
            }
            LifecyclePhase::AfterDelete => {
                handler.after_delete(ctx)?;
                PhaseOutcome::Notified
            }
            LifecyclePhase::AfterAttach => {
                handler.after_attach(ctx)?;
                PhaseOutcome::Notified
            }
            LifecyclePhase::AfterDetach => {
                handler.after_detach(ctx)?;
                PhaseOutcome::Notified
            }
        };

        if outcome.is_veto() {
            info!(
                phase = %phase,
                event = %phase.event_name(&handler_label(&ctx.field.field_type)),
                field = %ctx.field.name,
                field_type = %ctx.field.field_type,
                "Field handler vetoed operation"
            );
        }

        Ok(outcome)
    }

    /// Invokes a render phase and returns its markup.
    pub fn render(
        &self,
        phase: LifecyclePhase,
        ctx: &mut InvocationContext<'_>,
    ) -> AppResult<String> {
        expect_kind(phase, PhaseKind::Render)?;
        match self.invoke(phase, ctx)? {
            PhaseOutcome::Rendered(markup) => Ok(markup),
            other => Err(unexpected(phase, &other)),
        }
    }

    /// Invokes a gate phase; `Ok(false)` means the operation was vetoed.
    pub fn gate(&self, phase: LifecyclePhase, ctx: &mut InvocationContext<'_>) -> AppResult<bool> {
        expect_kind(phase, PhaseKind::Gate)?;
        Ok(!self.invoke(phase, ctx)?.is_veto())
    }

    /// Invokes a notify phase.
    pub fn notify(&self, phase: LifecyclePhase, ctx: &mut InvocationContext<'_>) -> AppResult<()> {
        expect_kind(phase, PhaseKind::Notify)?;
        self.invoke(phase, ctx).map(|_| ())
    }

    /// Returns the descriptor of the handler registered for a field type.
    pub fn describe(&self, field_type: &str) -> AppResult<HandlerDescriptor> {
        Ok(self.registry.resolve(field_type)?.info())
    }

    /// Returns a reference to the handler registry.
    pub fn registry(&self) -> &Arc<FieldHandlerRegistry> {
        &self.registry
    }
}

fn gate(proceed: bool) -> PhaseOutcome {
    if proceed {
        PhaseOutcome::Continue
    } else {
        PhaseOutcome::Veto
    }
}

fn expect_kind(phase: LifecyclePhase, kind: PhaseKind) -> AppResult<()> {
    if phase.kind() == kind {
        Ok(())
    } else {
        Err(AppError::internal(format!(
            "Phase '{phase}' is a {:?} phase, not {kind:?}",
            phase.kind()
        )))
    }
}

fn unexpected(phase: LifecyclePhase, outcome: &PhaseOutcome) -> AppError {
    AppError::internal(format!("Phase '{phase}' produced unexpected outcome {outcome:?}"))
}

/// Handler segment of an event name: `text` becomes `Text`, `text_list`
/// becomes `TextList`.
fn handler_label(field_type: &str) -> String {
    field_type
        .split(['_', '-'])
        .map(|part| {
            let mut chars = part.chars();
            chars
                .next()
                .map(|first| first.to_uppercase().chain(chars).collect::<String>())
                .unwrap_or_default()
        })
        .collect()
}
