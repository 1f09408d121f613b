//! Host-side attach, detach, save, delete and find flows.
//!
//! Every flow runs the relevant gate phase on each attached field first; a
//! single veto aborts the flow before anything is committed. `afterAttach`,
//! `afterDetach` and `afterSave` run on staged copies and the change is
//! committed only once they all return, so a failing handler leaves the
//! manager and the store untouched. `afterDelete` follows the store delete.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use fieldhub_core::error::AppError;
use fieldhub_core::result::AppResult;
use fieldhub_core::traits::EntityStore;
use fieldhub_core::types::{Entity, FieldDefinition, InstanceId, TableRef};
use fieldhub_core::validation::{ValidationErrors, Validator};

use crate::hooks::definitions::{InvocationContext, LifecyclePhase};
use crate::hooks::dispatcher::LifecycleDispatcher;

/// A field attached to a table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldInstance {
    /// Instance identifier.
    pub id: InstanceId,
    /// Owning table.
    pub table: String,
    /// Field definition; `value` is unused at instance level.
    pub field: FieldDefinition,
    /// When the instance was attached.
    pub attached_at: DateTime<Utc>,
}

/// Which phase and field stopped an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Veto {
    /// Phase that returned `false`.
    pub phase: LifecyclePhase,
    /// Field whose handler returned `false`.
    pub field: String,
}

/// Result of [`FieldManager::attach`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttachOutcome {
    /// The instance was recorded.
    Attached(InstanceId),
    /// `beforeAttach` returned `false`; nothing was recorded.
    Vetoed(Veto),
}

/// Result of [`FieldManager::detach`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetachOutcome {
    /// The instance was removed.
    Detached(InstanceId),
    /// `beforeDetach` returned `false`; the instance is kept.
    Vetoed(Veto),
}

/// Result of [`FieldManager::save`].
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    /// The entity and its field values were persisted.
    Saved,
    /// Submitted values broke one or more rules; nothing was persisted.
    Invalid(ValidationErrors),
    /// A gate phase vetoed the save; nothing was persisted.
    Vetoed(Veto),
}

/// Result of [`FieldManager::delete`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The entity was deleted.
    Deleted,
    /// The store had no such entity.
    Missing,
    /// `beforeDelete` returned `false`; the entity is kept.
    Vetoed(Veto),
}

/// Runs field lifecycles for fieldable tables.
#[derive(Debug)]
pub struct FieldManager {
    /// Lifecycle dispatcher.
    dispatcher: LifecycleDispatcher,
    /// Table name → attached instances in attach order.
    instances: IndexMap<String, Vec<FieldInstance>>,
}

impl FieldManager {
    /// Creates a manager with no attached fields.
    pub fn new(dispatcher: LifecycleDispatcher) -> Self {
        Self {
            dispatcher,
            instances: IndexMap::new(),
        }
    }

    /// Returns the dispatcher.
    pub fn dispatcher(&self) -> &LifecycleDispatcher {
        &self.dispatcher
    }

    /// Attached instances of a table, in attach order.
    pub fn instances(&self, table: &str) -> &[FieldInstance] {
        self.instances
            .get(table)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Attaches a field to a table unless its handler vetoes.
    pub fn attach(&mut self, table: &TableRef, field: FieldDefinition) -> AppResult<AttachOutcome> {
        if self.find_instance(&table.name, &field.name).is_some() {
            return Err(AppError::validation(format!(
                "Field '{}' is already attached to '{}'",
                field.name, table.name
            )));
        }

        let mut field = field;
        let proceed = {
            let mut ctx = InvocationContext::new(&mut field).with_table(table);
            self.dispatcher.gate(LifecyclePhase::BeforeAttach, &mut ctx)?
        };
        if !proceed {
            return Ok(AttachOutcome::Vetoed(Veto {
                phase: LifecyclePhase::BeforeAttach,
                field: field.name,
            }));
        }

        let mut instance = FieldInstance {
            id: InstanceId::new(),
            table: table.name.clone(),
            field,
            attached_at: Utc::now(),
        };
        {
            let mut ctx = InvocationContext::new(&mut instance.field).with_table(table);
            self.dispatcher.notify(LifecyclePhase::AfterAttach, &mut ctx)?;
        }

        info!(
            table = %table.name,
            field = %instance.field.name,
            field_type = %instance.field.field_type,
            instance_id = %instance.id,
            "Field attached"
        );

        let id = instance.id;
        self.instances
            .entry(table.name.clone())
            .or_default()
            .push(instance);

        Ok(AttachOutcome::Attached(id))
    }

    /// Detaches a field from a table unless its handler vetoes.
    pub fn detach(&mut self, table: &TableRef, name: &str) -> AppResult<DetachOutcome> {
        let index = self.find_instance(&table.name, name).ok_or_else(|| {
            AppError::not_found(format!("Field '{name}' is not attached to '{}'", table.name))
        })?;

        let instances = self
            .instances
            .get_mut(&table.name)
            .ok_or_else(|| AppError::internal("Attached instances vanished"))?;

        let proceed = {
            let mut ctx = InvocationContext::new(&mut instances[index].field).with_table(table);
            self.dispatcher.gate(LifecyclePhase::BeforeDetach, &mut ctx)?
        };
        if !proceed {
            return Ok(DetachOutcome::Vetoed(Veto {
                phase: LifecyclePhase::BeforeDetach,
                field: name.to_string(),
            }));
        }

        let mut staged = instances[index].field.clone();
        {
            let mut ctx = InvocationContext::new(&mut staged).with_table(table);
            self.dispatcher.notify(LifecyclePhase::AfterDetach, &mut ctx)?;
        }

        let instance = instances.remove(index);
        if instances.is_empty() {
            self.instances.shift_remove(&table.name);
        }

        info!(table = %table.name, field = %name, "Field detached");
        Ok(DetachOutcome::Detached(instance.id))
    }

    /// Validates and saves an entity with the submitted field values.
    ///
    /// Values missing from `post` keep the entity's current value. The entity
    /// and its values are written in a single store call after `afterSave`;
    /// a new entity has no id yet while `afterSave` runs.
    pub fn save(
        &self,
        entity: &mut Entity,
        store: &mut dyn EntityStore,
        post: &IndexMap<String, Value>,
    ) -> AppResult<SaveOutcome> {
        let mut fields = self.load_fields(entity);
        let submitted: Vec<Option<Value>> = fields
            .iter()
            .map(|f| post.get(&f.name).cloned().or_else(|| f.value.clone()))
            .collect();

        let mut validator = Validator::new();
        for (field, value) in fields.iter_mut().zip(&submitted) {
            let mut ctx = InvocationContext::new(field)
                .with_entity(entity.handle())
                .with_validator(&mut validator);
            ctx.post = value.clone();
            if !self.dispatcher.gate(LifecyclePhase::BeforeValidate, &mut ctx)? {
                return Ok(SaveOutcome::Vetoed(Veto {
                    phase: LifecyclePhase::BeforeValidate,
                    field: ctx.field.name.clone(),
                }));
            }
        }

        let data: IndexMap<String, Value> = fields
            .iter()
            .zip(&submitted)
            .map(|(f, v)| (f.rule_path(), v.clone().unwrap_or(Value::Null)))
            .collect();
        let errors = validator.validate(&data);
        if !errors.is_empty() {
            debug!(table = %entity.table, "Entity failed validation");
            return Ok(SaveOutcome::Invalid(errors));
        }

        if let Some(veto) = self.run_gate(LifecyclePhase::AfterValidate, entity, &mut fields)? {
            return Ok(SaveOutcome::Vetoed(veto));
        }

        let handle = entity.handle();
        for (field, value) in fields.iter_mut().zip(submitted) {
            let mut ctx = InvocationContext::new(field).with_entity(handle.clone());
            ctx.post = value;
            self.dispatcher.notify(LifecyclePhase::AfterSave, &mut ctx)?;
        }

        let mut staged = entity.clone();
        for field in &fields {
            staged.values.insert(
                field.name.clone(),
                field.value.clone().unwrap_or(Value::Null),
            );
        }
        store.save(&mut staged)?;
        *entity = staged;

        info!(
            table = %entity.table,
            id = ?entity.id,
            fields = fields.len(),
            "Entity saved"
        );
        Ok(SaveOutcome::Saved)
    }

    /// Deletes an entity unless a field handler vetoes.
    pub fn delete(&self, entity: &Entity, store: &mut dyn EntityStore) -> AppResult<DeleteOutcome> {
        let mut fields = self.load_fields(entity);

        if let Some(veto) = self.run_gate(LifecyclePhase::BeforeDelete, entity, &mut fields)? {
            return Ok(DeleteOutcome::Vetoed(veto));
        }

        let handle = entity.handle();
        if !store.delete(&handle)? {
            return Ok(DeleteOutcome::Missing);
        }

        for field in fields.iter_mut() {
            let mut ctx = InvocationContext::new(field).with_entity(handle.clone());
            self.dispatcher.notify(LifecyclePhase::AfterDelete, &mut ctx)?;
        }

        info!(table = %entity.table, id = ?entity.id, "Entity deleted");
        Ok(DeleteOutcome::Deleted)
    }

    /// Loads an entity unless a field handler vetoes the find.
    pub fn find(&self, store: &dyn EntityStore, table: &str, id: &str) -> AppResult<Option<Entity>> {
        let Some(entity) = store.get(table, id)? else {
            return Ok(None);
        };

        let mut fields = self.load_fields(&entity);
        if self
            .run_gate(LifecyclePhase::BeforeFind, &entity, &mut fields)?
            .is_some()
        {
            return Ok(None);
        }

        Ok(Some(entity))
    }

    /// Renders one field of an entity through a render phase.
    pub fn render(
        &self,
        entity: &Entity,
        field_name: &str,
        phase: LifecyclePhase,
        view_mode: &str,
    ) -> AppResult<String> {
        let mut field = self
            .load_fields(entity)
            .into_iter()
            .find(|f| f.name == field_name)
            .ok_or_else(|| {
                AppError::not_found(format!(
                    "Field '{field_name}' is not attached to '{}'",
                    entity.table
                ))
            })?;

        let mut ctx = InvocationContext::new(&mut field)
            .with_entity(entity.handle())
            .with_view_mode(view_mode);
        self.dispatcher.render(phase, &mut ctx)
    }

    fn find_instance(&self, table: &str, name: &str) -> Option<usize> {
        self.instances(table)
            .iter()
            .position(|instance| instance.field.name == name)
    }

    /// Attached definitions of the entity's table, carrying the entity's values.
    fn load_fields(&self, entity: &Entity) -> Vec<FieldDefinition> {
        self.instances(&entity.table)
            .iter()
            .map(|instance| {
                let mut field = instance.field.clone();
                field.value = entity.values.get(&field.name).cloned();
                field
            })
            .collect()
    }

    fn run_gate(
        &self,
        phase: LifecyclePhase,
        entity: &Entity,
        fields: &mut [FieldDefinition],
    ) -> AppResult<Option<Veto>> {
        for field in fields.iter_mut() {
            let mut ctx = InvocationContext::new(field).with_entity(entity.handle());
            if !self.dispatcher.gate(phase, &mut ctx)? {
                return Ok(Some(Veto {
                    phase,
                    field: ctx.field.name.clone(),
                }));
            }
        }
        Ok(None)
    }
}
