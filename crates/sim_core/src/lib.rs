//! # Sim Core
//!
//! Runtime core of a small real-time simulation engine: an entity-component
//! world, ordered logic/render schedulers and a scene lifecycle manager.
//!
//! ## Features
//!
//! - **ECS World**: generational entity ids, dense per-type component storage,
//!   in-place mutable access and multi-type queries
//! - **Scheduler Pair**: logic and render systems ticked in explicit order,
//!   single-threaded and deterministic
//! - **Scene Manager**: leak-free transitions between scenes, with deferred
//!   transitions requested from inside a tick
//! - **Service Registry**: explicit, sealable type-keyed service lookup
//!
//! ## Quick Start
//!
//! ```rust
//! use sim_core::prelude::*;
//!
//! #[derive(Debug, Clone, Copy)]
//! struct Position(f32, f32);
//! impl Component for Position {}
//!
//! #[derive(Debug, Clone, Copy)]
//! struct Velocity(f32, f32);
//! impl Component for Velocity {}
//!
//! struct Movement;
//!
//! impl LogicSystem for Movement {
//!     fn order(&self) -> i32 {
//!         0
//!     }
//!
//!     fn tick_logic(&mut self, ctx: &mut TickContext<'_>, time: FrameTime) -> Result<(), SystemError> {
//!         for entity in ctx.world.query::<(Position, Velocity)>() {
//!             let velocity = *ctx.world.get_component::<Velocity>(entity)?;
//!             let position = ctx.world.get_component_mut::<Position>(entity)?;
//!             position.0 += velocity.0 * time.delta_seconds();
//!             position.1 += velocity.1 * time.delta_seconds();
//!         }
//!         Ok(())
//!     }
//! }
//!
//! struct Level;
//!
//! impl SceneLifecycle for Level {
//!     fn on_load(&mut self, ctx: &mut SceneContext<'_>) -> Result<(), SceneError> {
//!         let ship = ctx.create_entity()?;
//!         ctx.add_component(ship, Position(0.0, 0.0))?;
//!         ctx.add_component(ship, Velocity(1.0, 0.0))?;
//!         Ok(())
//!     }
//!
//!     fn register_systems(&mut self, registrar: &mut SystemRegistrar<'_>) -> Result<(), SceneError> {
//!         registrar.add_logic(Movement);
//!         Ok(())
//!     }
//! }
//!
//! fn main() -> Result<(), SceneError> {
//!     let mut manager = SceneManager::new(ServiceRegistry::new());
//!     manager.load(Scene::new("level", Level))?;
//!
//!     let mut time = FrameTime::default();
//!     for _ in 0..3 {
//!         time = time.advance(1.0 / 60.0);
//!         manager.tick(time)?;
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod foundation;
pub mod ecs;
pub mod schedule;
pub mod scene;
pub mod services;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, RuntimeConfig, LoggingConfig, WorldConfig, ViewportConfig},
        ecs::{Component, ComponentSet, EcsError, EcsResult, Entity, EntityMut, EntityRef, World},
        foundation::time::{FrameTime, Timer},
        schedule::{Commands, LogicSystem, RenderSystem, SchedulerPair, SystemError, SystemId, TickContext},
        scene::{Scene, SceneContext, SceneError, SceneLifecycle, SceneManager, SceneState, SystemRegistrar},
        services::{ServiceError, ServiceRegistry},
    };
}
