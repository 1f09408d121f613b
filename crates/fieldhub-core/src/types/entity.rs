//! Entity handles passed to field handlers.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A table that field instances can be attached to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableRef {
    /// Table name, e.g. `nodes`.
    pub name: String,
}

impl TableRef {
    /// Creates a table reference.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

/// Opaque handle to the entity that started an invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRef {
    /// Owning table.
    pub table: String,
    /// Primary key, absent until first save.
    pub id: Option<String>,
}

/// A fieldable record: its table, key, and one value per attached field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Owning table.
    pub table: String,
    /// Primary key, assigned by the store on first save.
    #[serde(default)]
    pub id: Option<String>,
    /// Field name → stored value, in attach order.
    #[serde(default)]
    pub values: IndexMap<String, Value>,
}

impl Entity {
    /// Creates an unsaved entity for a table.
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            id: None,
            values: IndexMap::new(),
        }
    }

    /// Returns the opaque handle handed to field handlers.
    pub fn handle(&self) -> EntityRef {
        EntityRef {
            table: self.table.clone(),
            id: self.id.clone(),
        }
    }
}
