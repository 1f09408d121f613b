//! Menu block plugin for FieldHub.
//!
//! Renders a block that shows a menu. The template is picked from a
//! region- and view-mode-specific fallback chain, memoized per
//! `(region, view_mode)`; the menu's links are threaded into a tree
//! ordered by their nested-set `lft` value.

pub mod cache;
pub mod render;
pub mod repository;
pub mod resolver;
pub mod tree;

pub use cache::MemoryResolutionCache;
pub use render::MenuBlockRenderer;
pub use repository::MemoryMenuRepository;
pub use resolver::{TemplateNaming, TemplateResolver};
pub use tree::thread_links;
