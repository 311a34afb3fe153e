//! ECS World implementation
//!
//! The world owns every entity identity and component value of one scene.
//! Components live in one dense storage per type, looked up by `TypeId` and
//! downcast internally, so callers only ever see concrete types.
//!
//! References handed out by [`World::get_component_mut`] borrow the world
//! mutably; adding or removing components, or destroying entities, needs a
//! fresh `&mut World`, so no reference can outlive a structural change.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use slotmap::SlotMap;

use super::component::component_name;
use super::error::{EcsError, EcsResult};
use super::handle::{EntityMut, EntityRef};
use super::query::{self, ComponentSet};
use super::storage::{ComponentStorage, ErasedStorage};
use super::{Component, Entity};
use crate::config::WorldConfig;

/// Largest number of simultaneously live entities the identity space supports
pub const MAX_LIVE_ENTITIES: usize = (u32::MAX - 1) as usize;

static NEXT_WORLD_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identifier of a [`World`] instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WorldId(u64);

impl WorldId {
    fn next() -> Self {
        Self(NEXT_WORLD_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// ECS World containing all entities and components
pub struct World {
    id: WorldId,
    entities: SlotMap<Entity, ()>,
    component_storages: HashMap<TypeId, Box<dyn ErasedStorage>>,
    capacity: usize,
}

impl World {
    /// Create a new world
    pub fn new() -> Self {
        Self {
            id: WorldId::next(),
            entities: SlotMap::with_key(),
            component_storages: HashMap::new(),
            capacity: MAX_LIVE_ENTITIES,
        }
    }

    /// Create a world honoring the limits in `config`
    pub fn with_config(config: &WorldConfig) -> Self {
        let mut world = Self::new();
        if let Some(max_entities) = config.max_entities {
            world.capacity = max_entities.min(MAX_LIVE_ENTITIES);
        }
        world
    }

    /// Identifier of this world instance
    pub fn id(&self) -> WorldId {
        self.id
    }

    /// Maximum number of live entities
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Create a new entity with no components
    ///
    /// # Errors
    ///
    /// [`EcsError::OutOfCapacity`] when the live entity limit is reached.
    pub fn create_entity(&mut self) -> EcsResult<Entity> {
        if self.entities.len() >= self.capacity {
            return Err(EcsError::OutOfCapacity {
                limit: self.capacity,
            });
        }

        let entity = self.entities.insert(());
        log::trace!("Created {}", entity);
        Ok(entity)
    }

    /// Destroy an entity and drop all of its components
    ///
    /// Destroying a dead entity is a no-op and returns `false`.
    pub fn destroy_entity(&mut self, entity: Entity) -> bool {
        if self.entities.remove(entity).is_none() {
            return false;
        }

        for storage in self.component_storages.values_mut() {
            storage.remove_entity(entity);
        }
        log::trace!("Destroyed {}", entity);
        true
    }

    /// Whether `entity` is alive in this world
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.contains_key(entity)
    }

    /// Number of live entities
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Get an iterator over all live entities
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.entities.keys()
    }

    /// Add a component to an entity
    ///
    /// An existing component of the same type is overwritten and returned.
    ///
    /// # Errors
    ///
    /// [`EcsError::UnknownEntity`] if `entity` is not alive.
    pub fn add_component<T: Component>(&mut self, entity: Entity, component: T) -> EcsResult<Option<T>> {
        self.ensure_alive(entity)?;
        Ok(self.storage_or_insert::<T>().insert(entity, component))
    }

    /// Get a component from an entity
    ///
    /// # Errors
    ///
    /// [`EcsError::UnknownEntity`] if `entity` is not alive,
    /// [`EcsError::MissingComponent`] if it has no `T`.
    pub fn get_component<T: Component>(&self, entity: Entity) -> EcsResult<&T> {
        self.ensure_alive(entity)?;
        self.storage::<T>()
            .and_then(|storage| storage.get(entity))
            .ok_or_else(|| missing::<T>(entity))
    }

    /// Get a mutable component from an entity
    ///
    /// The reference points at the stored value; writes through it are
    /// visible to every later reader.
    ///
    /// # Errors
    ///
    /// Same as [`World::get_component`].
    pub fn get_component_mut<T: Component>(&mut self, entity: Entity) -> EcsResult<&mut T> {
        self.ensure_alive(entity)?;
        self.storage_mut::<T>()
            .and_then(|storage| storage.get_mut(entity))
            .ok_or_else(|| missing::<T>(entity))
    }

    /// Get a component if the entity is alive and has one
    pub fn try_get_component<T: Component>(&self, entity: Entity) -> Option<&T> {
        self.get_component(entity).ok()
    }

    /// Whether `entity` is alive and has a `T`
    pub fn has_component<T: Component>(&self, entity: Entity) -> bool {
        self.storage::<T>()
            .is_some_and(|storage| storage.contains(entity))
    }

    /// Remove a component from an entity, returning it if present
    ///
    /// Removing from a dead entity or one without `T` is a no-op.
    pub fn remove_component<T: Component>(&mut self, entity: Entity) -> Option<T> {
        self.storage_mut::<T>()?.remove(entity)
    }

    /// Number of entities holding a `T`
    pub fn component_count<T: Component>(&self) -> usize {
        self.storage::<T>().map_or(0, ErasedStorage::len)
    }

    /// Snapshot of every live entity that has all components in `Q`
    ///
    /// The order is the dense order of the least populated component type in
    /// `Q`; it only changes when that storage is structurally modified.
    /// The result is owned, so the world can be mutated while walking it;
    /// re-validate each entity with [`World::get_component`] as needed.
    pub fn query<Q: ComponentSet>(&self) -> Vec<Entity> {
        let mut storages = Vec::new();
        for type_id in Q::type_ids() {
            match self.component_storages.get(&type_id) {
                Some(storage) => storages.push(storage.as_ref()),
                // A type nobody has ever added cannot match anything
                None => return Vec::new(),
            }
        }
        query::intersect(storages)
    }

    /// Iterate every `(entity, &T)` pair
    pub fn view<T: Component>(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.storage::<T>().into_iter().flat_map(|storage| storage.iter())
    }

    /// Iterate every `(entity, &mut T)` pair, mutating in place
    pub fn view_mut<T: Component>(&mut self) -> impl Iterator<Item = (Entity, &mut T)> {
        self.storage_mut::<T>().into_iter().flat_map(|storage| storage.iter_mut())
    }

    /// Read-only handle to a live entity
    ///
    /// # Errors
    ///
    /// [`EcsError::UnknownEntity`] if `entity` is not alive.
    pub fn entity(&self, entity: Entity) -> EcsResult<EntityRef<'_>> {
        self.ensure_alive(entity)?;
        Ok(EntityRef::new(entity, self))
    }

    /// Mutable handle to a live entity
    ///
    /// # Errors
    ///
    /// [`EcsError::UnknownEntity`] if `entity` is not alive.
    pub fn entity_mut(&mut self, entity: Entity) -> EcsResult<EntityMut<'_>> {
        self.ensure_alive(entity)?;
        Ok(EntityMut::new(entity, self))
    }

    /// Destroy every entity and component
    pub fn clear(&mut self) {
        let entity_count = self.entities.len();
        self.entities.clear();
        self.component_storages.clear();
        log::debug!("Cleared world {:?} ({} entities)", self.id, entity_count);
    }

    /// Names of every component type that currently has at least one value
    pub fn component_types(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self
            .component_storages
            .values()
            .filter(|storage| storage.len() > 0)
            .map(|storage| storage.component_name())
            .collect();
        names.sort_unstable();
        names
    }

    fn ensure_alive(&self, entity: Entity) -> EcsResult<()> {
        if self.is_alive(entity) {
            Ok(())
        } else {
            Err(EcsError::UnknownEntity(entity))
        }
    }

    fn storage<T: Component>(&self) -> Option<&ComponentStorage<T>> {
        self.component_storages
            .get(&TypeId::of::<T>())
            .and_then(|storage| storage.as_any().downcast_ref())
    }

    fn storage_mut<T: Component>(&mut self) -> Option<&mut ComponentStorage<T>> {
        self.component_storages
            .get_mut(&TypeId::of::<T>())
            .and_then(|storage| storage.as_any_mut().downcast_mut())
    }

    fn storage_or_insert<T: Component>(&mut self) -> &mut ComponentStorage<T> {
        self.component_storages
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(ComponentStorage::<T>::new()))
            .as_any_mut()
            .downcast_mut()
            .unwrap_or_else(|| unreachable!("storage registered under the TypeId of another type"))
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World")
            .field("id", &self.id)
            .field("entities", &self.entities.len())
            .field("component_types", &self.component_types())
            .finish()
    }
}

fn missing<T: Component>(entity: Entity) -> EcsError {
    EcsError::MissingComponent {
        entity,
        component: component_name::<T>(),
    }
}
