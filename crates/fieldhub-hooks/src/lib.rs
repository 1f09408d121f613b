//! # fieldhub-hooks
//!
//! Field handler framework for FieldHub. Provides:
//!
//! - The [`FieldHandler`] capability set every field type implements
//! - A handler registry keyed by field type, in registration order
//! - A lifecycle dispatcher with gate (veto) and notify semantics
//! - A field manager running attach, detach, save, delete and find flows
//! - An in-memory entity store

pub mod hooks;
pub mod manager;
pub mod prelude;
pub mod store;
pub mod traits;

pub use hooks::definitions::{InvocationContext, LifecyclePhase, PhaseKind, PhaseOutcome};
pub use hooks::dispatcher::LifecycleDispatcher;
pub use hooks::registry::FieldHandlerRegistry;
pub use manager::{AttachOutcome, DeleteOutcome, DetachOutcome, FieldManager, SaveOutcome, Veto};
pub use store::MemoryEntityStore;
pub use traits::FieldHandler;
