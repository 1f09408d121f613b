//! Prelude for field handler implementations.

pub use fieldhub_core::error::AppError;
pub use fieldhub_core::result::AppResult;
pub use fieldhub_core::traits::{ShortTagExpander, TemplateEngine, Translator};
pub use fieldhub_core::types::{FieldDefinition, HandlerDescriptor};
pub use fieldhub_core::validation::{RuleContext, Validator};

pub use crate::hooks::definitions::{InvocationContext, LifecyclePhase, PhaseOutcome};
pub use crate::traits::FieldHandler;
