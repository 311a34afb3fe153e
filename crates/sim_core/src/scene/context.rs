//! Facades handed to scene hooks
//!
//! Scene code never reaches into the world or the schedulers directly: hooks
//! receive a [`SceneContext`] forwarding entity and component operations, and
//! `register_systems` receives a [`SystemRegistrar`] that can only add systems.

use crate::config::ViewportConfig;
use crate::ecs::{
    Component, ComponentSet, EcsResult, Entity, EntityMut, EntityRef, World,
};
use crate::schedule::{LogicSystem, RenderSystem, SchedulerPair, SystemId};
use crate::services::{ServiceError, ServiceRegistry};

/// World and service access for scene hooks
pub struct SceneContext<'a> {
    world: &'a mut World,
    services: &'a ServiceRegistry,
    viewport: ViewportConfig,
}

impl<'a> SceneContext<'a> {
    pub(crate) fn new(world: &'a mut World, services: &'a ServiceRegistry, viewport: ViewportConfig) -> Self {
        Self {
            world,
            services,
            viewport,
        }
    }

    /// Shared services
    pub fn services(&self) -> &'a ServiceRegistry {
        self.services
    }

    /// Look up a required service
    ///
    /// # Errors
    ///
    /// [`ServiceError::Missing`] if no `T` is registered.
    pub fn service<T: Send + Sync + 'static>(&self) -> Result<&'a T, ServiceError> {
        let services: &'a ServiceRegistry = self.services;
        services.require::<T>()
    }

    /// Current viewport size
    pub fn viewport(&self) -> ViewportConfig {
        self.viewport
    }

    /// See [`World::create_entity`]
    ///
    /// # Errors
    ///
    /// [`EcsError::OutOfCapacity`](crate::ecs::EcsError::OutOfCapacity).
    pub fn create_entity(&mut self) -> EcsResult<Entity> {
        self.world.create_entity()
    }

    /// See [`World::destroy_entity`]
    pub fn destroy_entity(&mut self, entity: Entity) -> bool {
        self.world.destroy_entity(entity)
    }

    /// See [`World::add_component`]
    ///
    /// # Errors
    ///
    /// [`EcsError::UnknownEntity`](crate::ecs::EcsError::UnknownEntity).
    pub fn add_component<T: Component>(&mut self, entity: Entity, component: T) -> EcsResult<Option<T>> {
        self.world.add_component(entity, component)
    }

    /// See [`World::get_component`]
    ///
    /// # Errors
    ///
    /// Unknown entity or missing component.
    pub fn get_component<T: Component>(&self, entity: Entity) -> EcsResult<&T> {
        self.world.get_component(entity)
    }

    /// See [`World::get_component_mut`]
    ///
    /// # Errors
    ///
    /// Unknown entity or missing component.
    pub fn get_component_mut<T: Component>(&mut self, entity: Entity) -> EcsResult<&mut T> {
        self.world.get_component_mut(entity)
    }

    /// See [`World::try_get_component`]
    pub fn try_get_component<T: Component>(&self, entity: Entity) -> Option<&T> {
        self.world.try_get_component(entity)
    }

    /// See [`World::has_component`]
    pub fn has_component<T: Component>(&self, entity: Entity) -> bool {
        self.world.has_component::<T>(entity)
    }

    /// See [`World::remove_component`]
    pub fn remove_component<T: Component>(&mut self, entity: Entity) -> Option<T> {
        self.world.remove_component(entity)
    }

    /// See [`World::query`]
    pub fn query<Q: ComponentSet>(&self) -> Vec<Entity> {
        self.world.query::<Q>()
    }

    /// See [`World::entity`]
    ///
    /// # Errors
    ///
    /// [`EcsError::UnknownEntity`](crate::ecs::EcsError::UnknownEntity).
    pub fn entity(&self, entity: Entity) -> EcsResult<EntityRef<'_>> {
        self.world.entity(entity)
    }

    /// See [`World::entity_mut`]
    ///
    /// # Errors
    ///
    /// [`EcsError::UnknownEntity`](crate::ecs::EcsError::UnknownEntity).
    pub fn entity_mut(&mut self, entity: Entity) -> EcsResult<EntityMut<'_>> {
        self.world.entity_mut(entity)
    }

    /// Number of live entities
    pub fn entity_count(&self) -> usize {
        self.world.entity_count()
    }
}

/// Add-only access to the scheduler pair during `register_systems`
pub struct SystemRegistrar<'a> {
    schedulers: &'a mut SchedulerPair,
    services: &'a ServiceRegistry,
}

impl<'a> SystemRegistrar<'a> {
    pub(crate) fn new(schedulers: &'a mut SchedulerPair, services: &'a ServiceRegistry) -> Self {
        Self {
            schedulers,
            services,
        }
    }

    /// Register a logic system
    pub fn add_logic<S: LogicSystem + 'static>(&mut self, system: S) -> SystemId {
        self.schedulers.add_logic(system)
    }

    /// Register a render system
    pub fn add_render<S: RenderSystem + 'static>(&mut self, system: S) -> SystemId {
        self.schedulers.add_render(system)
    }

    /// Shared services, e.g. to hand a device to a render system
    pub fn services(&self) -> &'a ServiceRegistry {
        self.services
    }

    /// Look up a required service
    ///
    /// # Errors
    ///
    /// [`ServiceError::Missing`] if no `T` is registered.
    pub fn service<T: Send + Sync + 'static>(&self) -> Result<&'a T, ServiceError> {
        let services: &'a ServiceRegistry = self.services;
        services.require::<T>()
    }

    /// Number of systems registered so far across both schedulers
    pub fn registered(&self) -> usize {
        self.schedulers.len()
    }
}
