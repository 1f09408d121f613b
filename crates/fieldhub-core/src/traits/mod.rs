//! Collaborator traits defined in `fieldhub-core` and implemented by other crates.
//!
//! Field handlers and block renderers never talk to a concrete template
//! engine, translator or store; they receive these traits through their
//! constructors.

pub mod cache;
pub mod i18n;
pub mod menu;
pub mod shorttag;
pub mod store;
pub mod template;

pub use cache::ResolutionCache;
pub use i18n::Translator;
pub use menu::MenuRepository;
pub use shorttag::ShortTagExpander;
pub use store::EntityStore;
pub use template::TemplateEngine;
