//! Deferred mutations requested from inside a tick
//!
//! While a scheduler is ticking nothing may change its system list or swap
//! the current scene. Systems queue those requests in [`Commands`]; the
//! scheduler pair applies system changes once the running tick finishes and
//! the scene manager applies scene requests before the next tick starts.

use super::scheduler::SystemId;
use super::system::{LogicSystem, RenderSystem, Stage};
use crate::ecs::EcsError;
use crate::scene::Scene;

/// A queued scheduler mutation
pub enum SystemOp {
    /// Add a logic system under a pre-allocated id
    AddLogic(SystemId, Box<dyn LogicSystem>),
    /// Add a render system under a pre-allocated id
    AddRender(SystemId, Box<dyn RenderSystem>),
    /// Remove a system from whichever scheduler holds it
    Remove(SystemId),
}

impl std::fmt::Debug for SystemOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AddLogic(id, system) => write!(f, "AddLogic({id:?}, {})", system.name()),
            Self::AddRender(id, system) => write!(f, "AddRender({id:?}, {})", system.name()),
            Self::Remove(id) => write!(f, "Remove({id:?})"),
        }
    }
}

/// A queued scene transition
#[derive(Debug)]
pub enum SceneRequest {
    /// Replace the current scene
    Load(Scene),
    /// Re-run the full load cycle on the current scene
    Reload,
}

/// Queue of deferred mutations
#[derive(Debug, Default)]
pub struct Commands {
    system_ops: Vec<SystemOp>,
    scene_request: Option<SceneRequest>,
}

impl Commands {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a logic system; it first ticks on the next logic tick
    pub fn add_logic<S: LogicSystem + 'static>(&mut self, system: S) -> SystemId {
        let id = SystemId::allocate(Stage::Logic);
        self.system_ops.push(SystemOp::AddLogic(id, Box::new(system)));
        id
    }

    /// Queue a render system; it first ticks on the next render tick
    pub fn add_render<S: RenderSystem + 'static>(&mut self, system: S) -> SystemId {
        let id = SystemId::allocate(Stage::Render);
        self.system_ops.push(SystemOp::AddRender(id, Box::new(system)));
        id
    }

    /// Queue removal of a system; unknown ids are ignored when applied
    pub fn remove_system(&mut self, id: SystemId) {
        self.system_ops.push(SystemOp::Remove(id));
    }

    /// Request a transition to `scene` before the next tick
    ///
    /// # Errors
    ///
    /// [`EcsError::ReentrantMutation`] if a transition is already queued.
    pub fn load_scene(&mut self, scene: Scene) -> Result<(), EcsError> {
        self.request(SceneRequest::Load(scene))
    }

    /// Request a reload of the current scene before the next tick
    ///
    /// # Errors
    ///
    /// [`EcsError::ReentrantMutation`] if a transition is already queued.
    pub fn reload_scene(&mut self) -> Result<(), EcsError> {
        self.request(SceneRequest::Reload)
    }

    /// Whether a scene transition is queued
    pub fn has_scene_request(&self) -> bool {
        self.scene_request.is_some()
    }

    /// Number of queued scheduler mutations
    pub fn pending_system_ops(&self) -> usize {
        self.system_ops.len()
    }

    /// Whether nothing is queued
    pub fn is_empty(&self) -> bool {
        self.system_ops.is_empty() && self.scene_request.is_none()
    }

    /// Drop everything queued
    pub fn clear(&mut self) {
        self.system_ops.clear();
        self.scene_request = None;
    }

    pub(crate) fn take_system_ops(&mut self) -> Vec<SystemOp> {
        std::mem::take(&mut self.system_ops)
    }

    pub(crate) fn take_scene_request(&mut self) -> Option<SceneRequest> {
        self.scene_request.take()
    }

    fn request(&mut self, request: SceneRequest) -> Result<(), EcsError> {
        if self.scene_request.is_some() {
            log::warn!("Rejected scene request {:?}: a transition is already pending", request);
            return Err(EcsError::ReentrantMutation("a scene transition is already pending"));
        }
        self.scene_request = Some(request);
        Ok(())
    }
}
