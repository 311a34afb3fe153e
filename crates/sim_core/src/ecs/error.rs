//! ECS error types

use thiserror::Error;

use super::Entity;

/// Errors raised by the component store and entity handles
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EcsError {
    /// The entity was never created by this world or has been destroyed
    #[error("unknown entity: {0}")]
    UnknownEntity(Entity),

    /// Typed access to a component the entity does not have
    #[error("{entity} has no {component} component")]
    MissingComponent {
        /// Entity that was addressed
        entity: Entity,
        /// Short type name of the requested component
        component: &'static str,
    },

    /// No more entities can be created
    #[error("entity capacity exhausted (limit {limit})")]
    OutOfCapacity {
        /// Live entity limit that was hit
        limit: usize,
    },

    /// A structural mutation was attempted while it is forbidden
    #[error("reentrant mutation: {0}")]
    ReentrantMutation(&'static str),
}

/// Result alias for ECS operations
pub type EcsResult<T> = Result<T, EcsError>;
