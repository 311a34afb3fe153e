//! Ordered logic and render scheduling
//!
//! Systems run single-threaded, once per tick, sorted by their explicit
//! order. Requests to change the system list or the current scene made while
//! a tick is running are queued in [`Commands`] and applied afterwards.

pub mod system;
pub mod scheduler;
pub mod commands;

pub use system::{LogicSystem, RenderSystem, SystemError, SystemKind, Stage, TickContext, Logic, Render};
pub use scheduler::{Scheduler, SchedulerPair, LogicScheduler, RenderScheduler, SystemId};
pub use commands::{Commands, SceneRequest, SystemOp};
