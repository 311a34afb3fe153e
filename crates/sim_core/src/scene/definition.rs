//! Scene definition
//!
//! A [`Scene`] bundles a name, the [`World`] holding its entities, and the
//! author-supplied [`SceneLifecycle`] hooks. Scenes are driven exclusively by
//! the [`SceneManager`](super::SceneManager).

use std::fmt;

use thiserror::Error;

use super::context::{SceneContext, SystemRegistrar};
use crate::ecs::{EcsError, World};
use crate::schedule::SystemError;
use crate::services::ServiceError;

/// Scene lifecycle errors
#[derive(Error, Debug)]
pub enum SceneError {
    /// An operation needed a current scene and there is none
    #[error("no current scene")]
    NoCurrentScene,

    /// `on_load` or `register_systems` failed
    #[error("failed to load scene '{scene}': {source}")]
    Load {
        /// Scene being loaded
        scene: String,
        /// Hook failure
        #[source]
        source: Box<SceneError>,
    },

    /// `on_unload` failed
    #[error("failed to unload scene '{scene}': {source}")]
    Unload {
        /// Scene being unloaded
        scene: String,
        /// Hook failure
        #[source]
        source: Box<SceneError>,
    },

    /// Component store failure inside a hook
    #[error(transparent)]
    Ecs(#[from] EcsError),

    /// Service lookup failure inside a hook
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// A system failed during a tick
    #[error(transparent)]
    System(#[from] SystemError),

    /// Scene-specific hook failure
    #[error("{0}")]
    Hook(String),
}

impl SceneError {
    /// Build a [`SceneError::Hook`]
    pub fn hook(message: impl Into<String>) -> Self {
        Self::Hook(message.into())
    }
}

/// Hooks a scene author implements
///
/// The implementing type also carries any scene-specific setup data and the
/// handles of resources acquired in `on_load` that `on_unload` must release.
pub trait SceneLifecycle {
    /// Populate the (freshly reset) world
    ///
    /// # Errors
    ///
    /// Aborts the load; the manager clears the schedulers and reports the
    /// scene as not loaded.
    fn on_load(&mut self, ctx: &mut SceneContext<'_>) -> Result<(), SceneError>;

    /// Attach this scene's systems to the scheduler pair
    ///
    /// # Errors
    ///
    /// Same as [`SceneLifecycle::on_load`].
    fn register_systems(&mut self, registrar: &mut SystemRegistrar<'_>) -> Result<(), SceneError>;

    /// Release resources acquired in `on_load`
    ///
    /// # Errors
    ///
    /// Reported to the caller after the manager finished tearing down.
    fn on_unload(&mut self, _ctx: &mut SceneContext<'_>) -> Result<(), SceneError> {
        Ok(())
    }

    /// The viewport changed size; only called while loaded
    ///
    /// # Errors
    ///
    /// Reported to the caller of
    /// [`SceneManager::on_viewport_resize`](super::SceneManager::on_viewport_resize).
    fn on_viewport_resize(&mut self, _ctx: &mut SceneContext<'_>, _width: u32, _height: u32) -> Result<(), SceneError> {
        Ok(())
    }
}

/// A named world plus its lifecycle hooks
pub struct Scene {
    name: String,
    pub(super) world: World,
    pub(super) loaded: bool,
    pub(super) lifecycle: Box<dyn SceneLifecycle>,
}

impl Scene {
    /// Create an unloaded scene
    pub fn new(name: impl Into<String>, lifecycle: impl SceneLifecycle + 'static) -> Self {
        Self {
            name: name.into(),
            world: World::new(),
            loaded: false,
            lifecycle: Box::new(lifecycle),
        }
    }

    /// Scene name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// World owned by this scene
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Whether `on_load` and `register_systems` both succeeded
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }
}

impl fmt::Debug for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scene")
            .field("name", &self.name)
            .field("loaded", &self.loaded)
            .field("world", &self.world)
            .finish()
    }
}
