//! # fieldhub-view
//!
//! View-layer collaborators handed to field handlers and block renderers:
//!
//! - [`LiquidTemplateEngine`]: element templates addressed as `Plugin.name`
//! - [`HooktagExpander`]: `[tag attr="v"]content[/tag]` short-tag expansion
//! - [`CatalogTranslator`]: domain-scoped message lookup with `%s` arguments

pub mod engine;
pub mod hooktags;
pub mod i18n;

pub use engine::LiquidTemplateEngine;
pub use hooktags::{HooktagAttrs, HooktagExpander};
pub use i18n::CatalogTranslator;
