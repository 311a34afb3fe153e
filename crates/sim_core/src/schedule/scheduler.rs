//! System Scheduling
//!
//! A scheduler keeps its systems sorted by ascending `order()` and ticks them
//! one after another on the calling thread, so a system always observes every
//! mutation made by the systems before it in the same tick. Ties keep
//! insertion order, which makes runs reproducible.

use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};

use super::commands::{Commands, SystemOp};
use super::system::{
    Logic, LogicSystem, Render, RenderSystem, Stage, SystemError, SystemKind, TickContext,
};
use crate::ecs::World;
use crate::foundation::time::FrameTime;
use crate::services::ServiceRegistry;

static NEXT_SYSTEM_SERIAL: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for systems
///
/// Ids are never reused, so removing by a stale id is always a harmless no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SystemId {
    stage: Stage,
    serial: u64,
}

impl SystemId {
    pub(crate) fn allocate(stage: Stage) -> Self {
        Self {
            stage,
            serial: NEXT_SYSTEM_SERIAL.fetch_add(1, Ordering::Relaxed),
        }
    }

    /// Scheduler this id belongs to
    pub fn stage(&self) -> Stage {
        self.stage
    }
}

struct ScheduledSystem<K: SystemKind> {
    id: SystemId,
    system: Box<K::System>,
}

/// Ordered collection of systems of one kind
pub struct Scheduler<K: SystemKind> {
    systems: Vec<ScheduledSystem<K>>,
    _kind: PhantomData<K>,
}

/// Scheduler for [`LogicSystem`]s
pub type LogicScheduler = Scheduler<Logic>;

/// Scheduler for [`RenderSystem`]s
pub type RenderScheduler = Scheduler<Render>;

impl<K: SystemKind> Scheduler<K> {
    /// Create an empty scheduler
    pub fn new() -> Self {
        Self {
            systems: Vec::new(),
            _kind: PhantomData,
        }
    }

    /// Add a system and re-sort by execution order
    pub fn add(&mut self, system: Box<K::System>) -> SystemId {
        let id = SystemId::allocate(K::STAGE);
        self.insert(id, system);
        id
    }

    fn insert(&mut self, id: SystemId, system: Box<K::System>) {
        log::debug!(
            "{:?} scheduler: adding '{}' (order {})",
            K::STAGE,
            K::name(&system),
            K::order(&system)
        );
        self.systems.push(ScheduledSystem { id, system });
        // `sort_by_key` is stable, equal orders keep insertion order
        self.systems.sort_by_key(|scheduled| K::order(&scheduled.system));
    }

    /// Remove a system by id; returns `false` if it was not scheduled here
    pub fn remove(&mut self, id: SystemId) -> bool {
        let Some(position) = self.systems.iter().position(|scheduled| scheduled.id == id) else {
            return false;
        };
        let removed = self.systems.remove(position);
        log::debug!("{:?} scheduler: removed '{}'", K::STAGE, K::name(&removed.system));
        true
    }

    /// Tick every system once in order
    ///
    /// Mutations systems queue in `ctx.commands` are left in the queue;
    /// [`SchedulerPair::apply`] routes them to the right scheduler.
    ///
    /// # Errors
    ///
    /// The first failing system stops the tick and its error is returned.
    pub fn tick(&mut self, ctx: &mut TickContext<'_>, time: FrameTime) -> Result<(), SystemError> {
        for scheduled in &mut self.systems {
            log::trace!("{:?} tick: '{}'", K::STAGE, K::name(&scheduled.system));
            if let Err(err) = K::tick(&mut scheduled.system, ctx, time) {
                log::error!(
                    "{:?} system '{}' failed: {}",
                    K::STAGE,
                    K::name(&scheduled.system),
                    err
                );
                return Err(err);
            }
        }
        Ok(())
    }

    /// Drop every system without any teardown
    pub fn clear(&mut self) {
        if !self.systems.is_empty() {
            log::debug!("{:?} scheduler: cleared {} systems", K::STAGE, self.systems.len());
        }
        self.systems.clear();
    }

    /// Whether `id` is scheduled here
    pub fn contains(&self, id: SystemId) -> bool {
        self.systems.iter().any(|scheduled| scheduled.id == id)
    }

    /// Number of systems
    pub fn len(&self) -> usize {
        self.systems.len()
    }

    /// Whether there are no systems
    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    /// System names in execution order
    pub fn system_names(&self) -> Vec<&str> {
        self.systems
            .iter()
            .map(|scheduled| K::name(&scheduled.system))
            .collect()
    }

    /// System ids in execution order
    pub fn system_ids(&self) -> Vec<SystemId> {
        self.systems.iter().map(|scheduled| scheduled.id).collect()
    }
}

impl<K: SystemKind> Default for Scheduler<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: SystemKind> std::fmt::Debug for Scheduler<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("stage", &K::STAGE)
            .field("systems", &self.system_names())
            .finish()
    }
}

/// The logic and render schedulers driven by one host loop
#[derive(Debug, Default)]
pub struct SchedulerPair {
    logic: LogicScheduler,
    render: RenderScheduler,
}

impl SchedulerPair {
    /// Create two empty schedulers
    pub fn new() -> Self {
        Self::default()
    }

    /// Logic scheduler
    pub fn logic(&self) -> &LogicScheduler {
        &self.logic
    }

    /// Render scheduler
    pub fn render(&self) -> &RenderScheduler {
        &self.render
    }

    /// Add a logic system
    pub fn add_logic<S: LogicSystem + 'static>(&mut self, system: S) -> SystemId {
        self.logic.add(Box::new(system))
    }

    /// Add a render system
    pub fn add_render<S: RenderSystem + 'static>(&mut self, system: S) -> SystemId {
        self.render.add(Box::new(system))
    }

    /// Remove a system from the scheduler its id belongs to
    pub fn remove(&mut self, id: SystemId) -> bool {
        match id.stage() {
            Stage::Logic => self.logic.remove(id),
            Stage::Render => self.render.remove(id),
        }
    }

    /// Drop every system from both schedulers
    pub fn clear(&mut self) {
        self.logic.clear();
        self.render.clear();
    }

    /// Total number of systems
    pub fn len(&self) -> usize {
        self.logic.len() + self.render.len()
    }

    /// Whether both schedulers are empty
    pub fn is_empty(&self) -> bool {
        self.logic.is_empty() && self.render.is_empty()
    }

    /// Apply queued system additions and removals
    pub fn apply(&mut self, commands: &mut Commands) {
        for op in commands.take_system_ops() {
            match op {
                SystemOp::AddLogic(id, system) => self.logic.insert(id, system),
                SystemOp::AddRender(id, system) => self.render.insert(id, system),
                SystemOp::Remove(id) => {
                    if !self.remove(id) {
                        log::debug!("Ignoring removal of unscheduled system {:?}", id);
                    }
                }
            }
        }
    }

    /// Run one logic tick then one render tick
    ///
    /// Mutations queued in `commands` during a tick are applied right after
    /// that scheduler finishes, never while it iterates. A logic failure
    /// skips the render tick.
    ///
    /// # Errors
    ///
    /// The first system error of either stage.
    pub fn tick(
        &mut self,
        world: &mut World,
        services: &ServiceRegistry,
        commands: &mut Commands,
        time: FrameTime,
    ) -> Result<(), SystemError> {
        let logic = self.logic.tick(&mut TickContext::new(world, services, commands), time);
        self.apply(commands);
        logic?;

        let render = self.render.tick(&mut TickContext::new(world, services, commands), time);
        self.apply(commands);
        render
    }
}
