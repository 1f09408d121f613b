//! In-memory entity store.

use indexmap::IndexMap;
use tracing::debug;

use fieldhub_core::result::AppResult;
use fieldhub_core::traits::EntityStore;
use fieldhub_core::types::{Entity, EntityRef};

/// Entity store keeping everything in process memory.
///
/// Ids are sequential per store, starting at `1`.
#[derive(Debug, Default)]
pub struct MemoryEntityStore {
    /// `(table, id)` → entity.
    entities: IndexMap<(String, String), Entity>,
    /// Last assigned id.
    last_id: u64,
}

impl MemoryEntityStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl EntityStore for MemoryEntityStore {
    fn get(&self, table: &str, id: &str) -> AppResult<Option<Entity>> {
        Ok(self
            .entities
            .get(&(table.to_string(), id.to_string()))
            .cloned())
    }

    fn save(&mut self, entity: &mut Entity) -> AppResult<()> {
        let id = match &entity.id {
            Some(id) => id.clone(),
            None => {
                self.last_id += 1;
                let id = self.last_id.to_string();
                entity.id = Some(id.clone());
                id
            }
        };

        debug!(table = %entity.table, id = %id, "Storing entity");
        self.entities
            .insert((entity.table.clone(), id), entity.clone());
        Ok(())
    }

    fn delete(&mut self, entity: &EntityRef) -> AppResult<bool> {
        let Some(id) = &entity.id else {
            return Ok(false);
        };
        Ok(self
            .entities
            .shift_remove(&(entity.table.clone(), id.clone()))
            .is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_save_assigns_sequential_ids() {
        let mut store = MemoryEntityStore::new();
        let mut first = Entity::new("nodes");
        let mut second = Entity::new("nodes");
        store.save(&mut first).expect("saved");
        store.save(&mut second).expect("saved");

        assert_eq!(first.id.as_deref(), Some("1"));
        assert_eq!(second.id.as_deref(), Some("2"));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_save_stores_values_and_delete() {
        let mut store = MemoryEntityStore::new();
        let mut entity = Entity::new("nodes");
        entity.values.insert("body".to_string(), json!("hello"));
        store.save(&mut entity).expect("saved");

        let loaded = store.get("nodes", "1").expect("get").expect("present");
        assert_eq!(loaded.values["body"], json!("hello"));

        entity.values.insert("body".to_string(), json!("bye"));
        store.save(&mut entity).expect("updated");
        let loaded = store.get("nodes", "1").expect("get").expect("present");
        assert_eq!(loaded.values["body"], json!("bye"));
        assert_eq!(store.len(), 1);

        assert!(store.delete(&entity.handle()).expect("delete"));
        assert!(!store.delete(&entity.handle()).expect("delete"));
        assert!(store.is_empty());
    }
}
