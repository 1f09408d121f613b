//! Entity storage trait.

use crate::result::AppResult;
use crate::types::entity::{Entity, EntityRef};

/// Persists fieldable entities. The field layer only reads and writes values;
/// it never issues queries of its own.
pub trait EntityStore: Send + Sync + std::fmt::Debug {
    /// Loads an entity by table and key.
    fn get(&self, table: &str, id: &str) -> AppResult<Option<Entity>>;

    /// Inserts or updates an entity together with its field values,
    /// assigning an id on first save.
    fn save(&mut self, entity: &mut Entity) -> AppResult<()>;

    /// Deletes an entity. Returns `false` if it did not exist.
    fn delete(&mut self, entity: &EntityRef) -> AppResult<bool>;
}
