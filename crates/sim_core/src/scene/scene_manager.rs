//! # Scene Manager
//!
//! Owns the current scene, the logic/render scheduler pair and the sealed
//! service registry, and moves between scenes with a fixed sequence:
//!
//! 1. if the current scene is loaded, run its `on_unload`;
//! 2. clear both schedulers;
//! 3. make the new scene current, with a freshly reset world;
//! 4. run `on_load`, then `register_systems`;
//! 5. mark the scene loaded.
//!
//! Failures leave one documented state, [`SceneState::LoadFailed`]: the
//! incoming scene is current but not loaded, and both schedulers are empty.
//! If step 1 fails the outgoing scene is still dropped and step 4 is skipped.
//! The error is then returned to the caller.
//!
//! Transitions are synchronous. Systems request them through
//! [`Commands`](crate::schedule::Commands); the request is applied at the
//! start of the next [`SceneManager::tick`], never inside a running tick.

use super::context::{SceneContext, SystemRegistrar};
use super::definition::{Scene, SceneError};
use crate::config::{RuntimeConfig, ViewportConfig, WorldConfig};
use crate::ecs::World;
use crate::foundation::time::{FrameTime, Stopwatch};
use crate::schedule::{Commands, SceneRequest, SchedulerPair};
use crate::services::ServiceRegistry;

/// Where the manager is in the transition state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneState {
    /// No scene has been loaded yet, or the last one was unloaded
    NoScene,
    /// The outgoing scene's `on_unload` is running
    Unloading,
    /// The incoming scene's `on_load` / `register_systems` are running
    Loading,
    /// A scene is current and loaded
    SceneActive,
    /// A scene is current but its last load or unload failed
    LoadFailed,
}

/// High-level scene manager coordinating scenes and schedulers
pub struct SceneManager {
    current: Option<Scene>,
    state: SceneState,
    schedulers: SchedulerPair,
    services: ServiceRegistry,
    commands: Commands,
    world_config: WorldConfig,
    viewport: ViewportConfig,
}

impl SceneManager {
    /// Create a manager with default configuration
    ///
    /// The registry is sealed; scenes only get read access to it.
    pub fn new(services: ServiceRegistry) -> Self {
        Self::with_config(services, &RuntimeConfig::default())
    }

    /// Create a manager with custom configuration
    pub fn with_config(mut services: ServiceRegistry, config: &RuntimeConfig) -> Self {
        services.seal();
        Self {
            current: None,
            state: SceneState::NoScene,
            schedulers: SchedulerPair::new(),
            services,
            commands: Commands::new(),
            world_config: config.world.clone(),
            viewport: config.viewport,
        }
    }

    /// Replace the current scene with `scene`
    ///
    /// # Errors
    ///
    /// [`SceneError::Unload`] if the outgoing scene's `on_unload` failed,
    /// [`SceneError::Load`] if the incoming scene's hooks failed. Either way
    /// the manager ends in [`SceneState::LoadFailed`].
    pub fn load(&mut self, scene: Scene) -> Result<(), SceneError> {
        self.transition(Some(scene))
    }

    /// Re-run the full load cycle on the current scene
    ///
    /// # Errors
    ///
    /// [`SceneError::NoCurrentScene`], or the same failures as
    /// [`SceneManager::load`].
    pub fn reload(&mut self) -> Result<(), SceneError> {
        if self.current.is_none() {
            return Err(SceneError::NoCurrentScene);
        }
        self.transition(None)
    }

    /// Unload and drop the current scene, returning to [`SceneState::NoScene`]
    ///
    /// # Errors
    ///
    /// [`SceneError::Unload`] if `on_unload` failed; teardown still completes.
    pub fn unload(&mut self) -> Result<(), SceneError> {
        let result = self.unload_current();
        self.schedulers.clear();
        self.commands.clear();
        if let Some(scene) = self.current.take() {
            log::info!("Scene '{}' unloaded", scene.name());
        }
        self.state = SceneState::NoScene;
        result
    }

    /// Queue a transition to `scene` for the start of the next tick
    ///
    /// # Errors
    ///
    /// [`EcsError::ReentrantMutation`](crate::ecs::EcsError::ReentrantMutation)
    /// if a transition is already queued.
    pub fn request_load(&mut self, scene: Scene) -> Result<(), SceneError> {
        self.commands.load_scene(scene)?;
        Ok(())
    }

    /// Queue a reload for the start of the next tick
    ///
    /// # Errors
    ///
    /// [`EcsError::ReentrantMutation`](crate::ecs::EcsError::ReentrantMutation)
    /// if a transition is already queued.
    pub fn request_reload(&mut self) -> Result<(), SceneError> {
        self.commands.reload_scene()?;
        Ok(())
    }

    /// Run one frame: apply a queued transition, then logic, then render
    ///
    /// Nothing is ticked while no scene is loaded.
    ///
    /// # Errors
    ///
    /// A failed queued transition, or the first failing system.
    pub fn tick(&mut self, time: FrameTime) -> Result<(), SceneError> {
        match self.commands.take_scene_request() {
            Some(SceneRequest::Load(scene)) => self.load(scene)?,
            Some(SceneRequest::Reload) => self.reload()?,
            None => {}
        }

        let Some(scene) = self.current.as_mut().filter(|scene| scene.loaded) else {
            return Ok(());
        };
        self.schedulers
            .tick(&mut scene.world, &self.services, &mut self.commands, time)?;
        Ok(())
    }

    /// Forward a viewport resize to the current, loaded scene
    ///
    /// The size is remembered either way and handed to later loads.
    /// Scheduler contents are never touched.
    ///
    /// # Errors
    ///
    /// Whatever the scene's `on_viewport_resize` hook returns.
    pub fn on_viewport_resize(&mut self, width: u32, height: u32) -> Result<(), SceneError> {
        self.viewport = ViewportConfig { width, height };

        let Some(scene) = self.current.as_mut().filter(|scene| scene.loaded) else {
            log::debug!("Viewport resized to {}x{} with no loaded scene", width, height);
            return Ok(());
        };
        log::debug!("Viewport resized to {}x{} for scene '{}'", width, height, scene.name());
        let mut ctx = SceneContext::new(&mut scene.world, &self.services, self.viewport);
        scene.lifecycle.on_viewport_resize(&mut ctx, width, height)
    }

    /// Current scene, loaded or not
    pub fn current(&self) -> Option<&Scene> {
        self.current.as_ref()
    }

    /// Whether the current scene is loaded
    pub fn is_loaded(&self) -> bool {
        self.current.as_ref().is_some_and(Scene::is_loaded)
    }

    /// Transition state
    pub fn state(&self) -> SceneState {
        self.state
    }

    /// The logic/render scheduler pair
    pub fn schedulers(&self) -> &SchedulerPair {
        &self.schedulers
    }

    /// The sealed service registry
    pub fn services(&self) -> &ServiceRegistry {
        &self.services
    }

    /// Last known viewport size
    pub fn viewport(&self) -> ViewportConfig {
        self.viewport
    }

    /// Whether a transition is queued for the next tick
    pub fn has_pending_transition(&self) -> bool {
        self.commands.has_scene_request()
    }

    /// Steps 1 to 5; `next == None` reloads the current scene
    fn transition(&mut self, next: Option<Scene>) -> Result<(), SceneError> {
        let stopwatch = Stopwatch::start_new();
        if self.commands.has_scene_request() {
            log::warn!("Discarding queued scene request superseded by an explicit transition");
        }
        self.commands.clear();

        // 1. unload the outgoing scene
        let unloaded = self.unload_current();

        // 2. no system of the outgoing scene survives
        self.schedulers.clear();

        // 3. make the incoming scene current
        if let Some(scene) = next {
            log::info!("Loading scene '{}'", scene.name());
            if let Some(old) = self.current.replace(scene) {
                log::debug!("Dropped scene '{}'", old.name());
            }
        } else if let Some(scene) = &self.current {
            log::info!("Reloading scene '{}'", scene.name());
        }

        let Some(scene) = self.current.as_mut() else {
            self.state = SceneState::NoScene;
            return Err(SceneError::NoCurrentScene);
        };
        scene.loaded = false;
        scene.world = World::with_config(&self.world_config);

        if let Err(err) = unloaded {
            self.state = SceneState::LoadFailed;
            log::error!("Scene '{}' left unloaded: {}", scene.name(), err);
            return Err(err);
        }

        // 4. populate and register
        self.state = SceneState::Loading;
        let loaded = {
            let mut ctx = SceneContext::new(&mut scene.world, &self.services, self.viewport);
            scene.lifecycle.on_load(&mut ctx)
        }
        .and_then(|()| {
            let mut registrar = SystemRegistrar::new(&mut self.schedulers, &self.services);
            scene.lifecycle.register_systems(&mut registrar)
        });

        if let Err(source) = loaded {
            // No partially registered system may survive a failed load
            self.schedulers.clear();
            self.state = SceneState::LoadFailed;
            log::error!("Failed to load scene '{}': {}", scene.name(), source);
            return Err(SceneError::Load {
                scene: scene.name().to_string(),
                source: Box::new(source),
            });
        }

        // 5. done
        scene.loaded = true;
        self.state = SceneState::SceneActive;
        log::info!(
            "Scene '{}' loaded in {:.2} ms ({} entities, {} logic / {} render systems)",
            scene.name(),
            stopwatch.elapsed_millis(),
            scene.world.entity_count(),
            self.schedulers.logic().len(),
            self.schedulers.render().len()
        );
        Ok(())
    }

    /// Run `on_unload` on the current scene if it is loaded
    fn unload_current(&mut self) -> Result<(), SceneError> {
        let Some(scene) = self.current.as_mut().filter(|scene| scene.loaded) else {
            return Ok(());
        };

        self.state = SceneState::Unloading;
        log::info!("Unloading scene '{}'", scene.name());
        scene.loaded = false;
        let mut ctx = SceneContext::new(&mut scene.world, &self.services, self.viewport);
        scene.lifecycle.on_unload(&mut ctx).map_err(|source| {
            log::error!("Unload hook of scene '{}' failed: {}", scene.name(), source);
            SceneError::Unload {
                scene: scene.name().to_string(),
                source: Box::new(source),
            }
        })
    }
}

impl std::fmt::Debug for SceneManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneManager")
            .field("current", &self.current.as_ref().map(Scene::name))
            .field("state", &self.state)
            .field("schedulers", &self.schedulers)
            .field("services", &self.services)
            .finish()
    }
}
