//! Domain types shared across crates.

pub mod entity;
pub mod field;
pub mod id;
pub mod menu;
pub mod template;

pub use entity::{Entity, EntityRef, TableRef};
pub use field::{FieldDefinition, FieldMetadata, HandlerDescriptor};
pub use id::InstanceId;
pub use menu::{Block, Menu, MenuLink, MenuLinkNode};
pub use template::{Resolution, TemplateKey};
