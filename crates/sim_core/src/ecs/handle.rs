//! Entity handles
//!
//! A handle pairs an [`Entity`] with a borrow of the world that owns it, so
//! component access reads naturally as `handle.get::<Position>()`. Handles do
//! not keep entities alive: once the entity is destroyed every access through
//! a handle reports [`EcsError::UnknownEntity`].

use std::fmt;

use super::error::{EcsError, EcsResult};
use super::world::{World, WorldId};
use super::{Component, Entity};

/// Read-only handle to an entity and its owning world
#[derive(Clone, Copy)]
pub struct EntityRef<'w> {
    entity: Entity,
    world: &'w World,
}

impl<'w> EntityRef<'w> {
    pub(super) fn new(entity: Entity, world: &'w World) -> Self {
        Self { entity, world }
    }

    /// Entity identity
    pub fn id(&self) -> Entity {
        self.entity
    }

    /// Owning world
    pub fn world_id(&self) -> WorldId {
        self.world.id()
    }

    /// Whether the entity is still alive
    pub fn is_alive(&self) -> bool {
        self.world.is_alive(self.entity)
    }

    /// Borrow a component
    ///
    /// # Errors
    ///
    /// See [`World::get_component`].
    pub fn get<T: Component>(&self) -> EcsResult<&'w T> {
        self.world.get_component(self.entity)
    }

    /// Borrow a component if present
    pub fn try_get<T: Component>(&self) -> Option<&'w T> {
        self.world.try_get_component(self.entity)
    }

    /// Whether the entity has a `T`
    pub fn has<T: Component>(&self) -> bool {
        self.world.has_component::<T>(self.entity)
    }
}

impl PartialEq for EntityRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.entity == other.entity && self.world.id() == other.world.id()
    }
}

impl Eq for EntityRef<'_> {}

impl fmt::Debug for EntityRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityRef")
            .field("entity", &self.entity)
            .field("world", &self.world.id())
            .finish()
    }
}

/// Mutable handle to an entity and its owning world
pub struct EntityMut<'w> {
    entity: Entity,
    world: &'w mut World,
}

impl<'w> EntityMut<'w> {
    pub(super) fn new(entity: Entity, world: &'w mut World) -> Self {
        Self { entity, world }
    }

    /// Entity identity
    pub fn id(&self) -> Entity {
        self.entity
    }

    /// Owning world
    pub fn world_id(&self) -> WorldId {
        self.world.id()
    }

    /// Whether the entity is still alive
    pub fn is_alive(&self) -> bool {
        self.world.is_alive(self.entity)
    }

    /// Add or overwrite a component, returning the previous value
    ///
    /// # Errors
    ///
    /// [`EcsError::UnknownEntity`] once the entity has been destroyed.
    pub fn insert<T: Component>(&mut self, component: T) -> EcsResult<Option<T>> {
        self.world.add_component(self.entity, component)
    }

    /// Builder-style [`EntityMut::insert`]
    ///
    /// # Errors
    ///
    /// [`EcsError::UnknownEntity`] once the entity has been destroyed.
    pub fn with<T: Component>(mut self, component: T) -> EcsResult<Self> {
        self.insert(component)?;
        Ok(self)
    }

    /// Borrow a component
    ///
    /// # Errors
    ///
    /// See [`World::get_component`].
    pub fn get<T: Component>(&self) -> EcsResult<&T> {
        self.world.get_component(self.entity)
    }

    /// Mutably borrow a component
    ///
    /// # Errors
    ///
    /// See [`World::get_component_mut`].
    pub fn get_mut<T: Component>(&mut self) -> EcsResult<&mut T> {
        self.world.get_component_mut(self.entity)
    }

    /// Whether the entity has a `T`
    pub fn has<T: Component>(&self) -> bool {
        self.world.has_component::<T>(self.entity)
    }

    /// Remove a component if present
    pub fn remove<T: Component>(&mut self) -> Option<T> {
        self.world.remove_component(self.entity)
    }

    /// Destroy the entity, consuming the handle
    ///
    /// # Errors
    ///
    /// [`EcsError::UnknownEntity`] if the entity was already gone.
    pub fn destroy(self) -> EcsResult<()> {
        if self.world.destroy_entity(self.entity) {
            Ok(())
        } else {
            Err(EcsError::UnknownEntity(self.entity))
        }
    }

    /// Downgrade to a read-only handle
    pub fn downgrade(&self) -> EntityRef<'_> {
        EntityRef::new(self.entity, self.world)
    }
}

impl fmt::Debug for EntityMut<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityMut")
            .field("entity", &self.entity)
            .field("world", &self.world.id())
            .finish()
    }
}
