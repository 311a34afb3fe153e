//! System traits and implementations
//!
//! A system is a unit of per-tick behaviour with an explicit execution order.
//! Logic and render systems share one scheduler design; [`SystemKind`] tells
//! the scheduler which trait it is driving.

use std::any::type_name;

use thiserror::Error;

use super::commands::Commands;
use crate::ecs::{EcsError, World};
use crate::foundation::time::FrameTime;
use crate::services::{ServiceError, ServiceRegistry};

/// Errors raised by a system tick
#[derive(Error, Debug)]
pub enum SystemError {
    /// Component store failure
    #[error(transparent)]
    Ecs(#[from] EcsError),

    /// Service lookup failure
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// System-specific failure
    #[error("system '{system}' failed: {message}")]
    Failed {
        /// Name of the failing system
        system: String,
        /// What went wrong
        message: String,
    },
}

impl SystemError {
    /// Build a [`SystemError::Failed`]
    pub fn failed(system: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Failed {
            system: system.into(),
            message: message.into(),
        }
    }
}

/// Everything a system can touch during a tick
///
/// Fields are public so a system can borrow the world and the command queue
/// at the same time.
pub struct TickContext<'a> {
    /// World of the current scene
    pub world: &'a mut World,
    /// Shared, read-only services
    pub services: &'a ServiceRegistry,
    /// Deferred scheduler and scene mutations
    pub commands: &'a mut Commands,
}

impl<'a> TickContext<'a> {
    /// Bundle the pieces of a tick
    pub fn new(world: &'a mut World, services: &'a ServiceRegistry, commands: &'a mut Commands) -> Self {
        Self {
            world,
            services,
            commands,
        }
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
}

/// Per-tick game logic
pub trait LogicSystem {
    /// Execution order; lower runs first
    fn order(&self) -> i32;

    /// Name used in logs and diagnostics
    fn name(&self) -> &str {
        type_name::<Self>()
    }

    /// Run the system for one logic tick
    ///
    /// # Errors
    ///
    /// Any failure stops the remainder of the tick and is returned to the host.
    fn tick_logic(&mut self, ctx: &mut TickContext<'_>, time: FrameTime) -> Result<(), SystemError>;
}

/// Per-tick rendering work
pub trait RenderSystem {
    /// Execution order; lower runs first
    fn order(&self) -> i32;

    /// Name used in logs and diagnostics
    fn name(&self) -> &str {
        type_name::<Self>()
    }

    /// Run the system for one render tick
    ///
    /// # Errors
    ///
    /// Any failure stops the remainder of the tick and is returned to the host.
    fn tick_render(&mut self, ctx: &mut TickContext<'_>, time: FrameTime) -> Result<(), SystemError>;
}

/// Which of the two schedulers a system belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Logic scheduler, ticked first
    Logic,
    /// Render scheduler, ticked after logic
    Render,
}

/// Binds a scheduler to one system trait
pub trait SystemKind: 'static {
    /// Trait object the scheduler stores
    type System: ?Sized;

    /// Stage handled by this kind
    const STAGE: Stage;

    /// Execution order of `system`
    fn order(system: &Self::System) -> i32;

    /// Diagnostic name of `system`
    fn name(system: &Self::System) -> &str;

    /// Invoke the stage's tick entry point
    ///
    /// # Errors
    ///
    /// Whatever the system returns.
    fn tick(system: &mut Self::System, ctx: &mut TickContext<'_>, time: FrameTime) -> Result<(), SystemError>;
}

/// Marker for the logic scheduler
#[derive(Debug)]
pub enum Logic {}

/// Marker for the render scheduler
#[derive(Debug)]
pub enum Render {}

impl SystemKind for Logic {
    type System = dyn LogicSystem;
    const STAGE: Stage = Stage::Logic;

    fn order(system: &Self::System) -> i32 {
        system.order()
    }

    fn name(system: &Self::System) -> &str {
        system.name()
    }

    fn tick(system: &mut Self::System, ctx: &mut TickContext<'_>, time: FrameTime) -> Result<(), SystemError> {
        system.tick_logic(ctx, time)
    }
}

impl SystemKind for Render {
    type System = dyn RenderSystem;
    const STAGE: Stage = Stage::Render;

    fn order(system: &Self::System) -> i32 {
        system.order()
    }

    fn name(system: &Self::System) -> &str {
        system.name()
    }

    fn tick(system: &mut Self::System, ctx: &mut TickContext<'_>, time: FrameTime) -> Result<(), SystemError> {
        system.tick_render(ctx, time)
    }
}
