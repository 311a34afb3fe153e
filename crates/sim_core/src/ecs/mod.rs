//! Entity-Component-System implementation
//!
//! Entity identities, the per-scene [`World`] component store, multi-type
//! queries and entity handles.

pub mod world;
pub mod entity;
pub mod component;
pub mod query;
pub mod handle;
pub mod error;
mod storage;

pub use world::{World, WorldId, MAX_LIVE_ENTITIES};
pub use entity::Entity;
pub use component::Component;
pub use query::ComponentSet;
pub use handle::{EntityRef, EntityMut};
pub use error::{EcsError, EcsResult};
