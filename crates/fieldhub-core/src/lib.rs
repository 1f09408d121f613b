//! # fieldhub-core
//!
//! Core crate for FieldHub. Contains the field data model, the collaborator
//! traits handlers are built against (templates, translation, short tags,
//! entity storage, menus, resolution caching), the validator that field
//! handlers register rules on, configuration schemas, and the unified error
//! system.
//!
//! This crate has **no** internal dependencies on other FieldHub crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;
pub mod validation;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
