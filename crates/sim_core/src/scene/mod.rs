//! Scene management system
//!
//! A scene is a named [`World`](crate::ecs::World) plus lifecycle hooks. The
//! [`SceneManager`] keeps at most one scene current and owns the scheduler
//! pair its systems run in.
//!
//! ## Flow
//!
//! ```text
//! host frame
//!      ↓
//! SceneManager::tick  (applies a queued transition, if any)
//!      ↓
//! logic scheduler → render scheduler
//! ```

mod definition;
mod context;
mod scene_manager;

#[cfg(test)]
mod tests;

pub use definition::{Scene, SceneError, SceneLifecycle};
pub use context::{SceneContext, SystemRegistrar};
pub use scene_manager::{SceneManager, SceneState};
