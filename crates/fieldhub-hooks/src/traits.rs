//! The capability set every field handler implements.

use fieldhub_core::result::AppResult;
use fieldhub_core::types::HandlerDescriptor;

use crate::hooks::definitions::InvocationContext;

/// A field type's behavior at each lifecycle phase.
///
/// Render phases and `info` must be implemented. Gate phases default to
/// continue and notify phases default to doing nothing; override them only
/// where the field type needs to. Returning `Ok(false)` from a gate phase
/// vetoes the enclosing save, delete, attach, or detach.
pub trait FieldHandler: Send + Sync + std::fmt::Debug {
    /// Describes the handler.
    fn info(&self) -> HandlerDescriptor;

    /// Renders the field for viewing. May rewrite `ctx.field.value` first.
    fn display(&self, ctx: &mut InvocationContext<'_>) -> AppResult<String>;

    /// Renders the field's form widget.
    fn edit(&self, ctx: &mut InvocationContext<'_>) -> AppResult<String>;

    /// Renders the field through its default formatter.
    fn formatter(&self, ctx: &mut InvocationContext<'_>) -> AppResult<String>;

    /// Renders the instance settings form.
    fn settings(&self, ctx: &mut InvocationContext<'_>) -> AppResult<String>;

    /// Before an entity carrying this field is loaded.
    fn before_find(&self, _ctx: &mut InvocationContext<'_>) -> AppResult<bool> {
        Ok(true)
    }

    /// Before an entity is validated; register rules on `ctx.validator`.
    fn before_validate(&self, _ctx: &mut InvocationContext<'_>) -> AppResult<bool> {
        Ok(true)
    }

    /// After an entity passed validation.
    fn after_validate(&self, _ctx: &mut InvocationContext<'_>) -> AppResult<bool> {
        Ok(true)
    }

    /// After an entity was saved; `ctx.post` holds the submitted value.
    fn after_save(&self, _ctx: &mut InvocationContext<'_>) -> AppResult<()> {
        Ok(())
    }

    /// Before an entity is deleted.
    fn before_delete(&self, _ctx: &mut InvocationContext<'_>) -> AppResult<bool> {
        Ok(true)
    }

    /// After an entity was deleted.
    fn after_delete(&self, _ctx: &mut InvocationContext<'_>) -> AppResult<()> {
        Ok(())
    }

    /// Before an instance is attached to `ctx.table`.
    fn before_attach(&self, _ctx: &mut InvocationContext<'_>) -> AppResult<bool> {
        Ok(true)
    }

    /// After an instance was attached.
    fn after_attach(&self, _ctx: &mut InvocationContext<'_>) -> AppResult<()> {
        Ok(())
    }

    /// Before an instance is detached from `ctx.table`.
    fn before_detach(&self, _ctx: &mut InvocationContext<'_>) -> AppResult<bool> {
        Ok(true)
    }

    /// After an instance was detached.
    fn after_detach(&self, _ctx: &mut InvocationContext<'_>) -> AppResult<()> {
        Ok(())
    }
}
