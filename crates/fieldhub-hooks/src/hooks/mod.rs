//! Handler registry, dispatcher and typed lifecycle definitions.

pub mod definitions;
pub mod dispatcher;
pub mod registry;

pub use definitions::{InvocationContext, LifecyclePhase, PhaseKind, PhaseOutcome};
pub use dispatcher::LifecycleDispatcher;
pub use registry::FieldHandlerRegistry;
