//! Scene lifecycle integration tests
//!
//! Drive the manager through loads, reloads, failures and queued transitions
//! and check both hook ordering and scheduler contents.

use std::sync::{Arc, Mutex};

use super::*;
use crate::config::{RuntimeConfig, WorldConfig};
use crate::ecs::{Component, EcsError};
use crate::foundation::time::FrameTime;
use crate::schedule::{LogicSystem, RenderSystem, SystemError, TickContext};
use crate::services::ServiceRegistry;

type Log = Arc<Mutex<Vec<String>>>;

fn drain(log: &Log) -> Vec<String> {
    std::mem::take(&mut *log.lock().unwrap())
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Position(f32, f32);
impl Component for Position {}

#[derive(Debug, Clone, PartialEq)]
struct Tag(String);
impl Component for Tag {}

struct Gravity(f32);

/// Counts its own ticks into the shared log
struct Probe {
    label: String,
    order: i32,
    log: Log,
}

impl LogicSystem for Probe {
    fn order(&self) -> i32 {
        self.order
    }

    fn tick_logic(&mut self, _ctx: &mut TickContext<'_>, _time: FrameTime) -> Result<(), SystemError> {
        self.log.lock().unwrap().push(format!("tick:{}", self.label));
        Ok(())
    }
}

impl RenderSystem for Probe {
    fn order(&self) -> i32 {
        self.order
    }

    fn tick_render(&mut self, _ctx: &mut TickContext<'_>, _time: FrameTime) -> Result<(), SystemError> {
        self.log.lock().unwrap().push(format!("render:{}", self.label));
        Ok(())
    }
}

/// Requests a scene transition from inside a tick
struct Switcher {
    next: Option<Scene>,
    second: Option<Scene>,
    outcome: Arc<Mutex<Option<Result<(), EcsError>>>>,
}

impl LogicSystem for Switcher {
    fn order(&self) -> i32 {
        100
    }

    fn tick_logic(&mut self, ctx: &mut TickContext<'_>, _time: FrameTime) -> Result<(), SystemError> {
        if let Some(scene) = self.next.take() {
            ctx.commands.load_scene(scene)?;
        }
        if let Some(scene) = self.second.take() {
            *self.outcome.lock().unwrap() = Some(ctx.commands.load_scene(scene));
        }
        Ok(())
    }
}

/// Configurable scene hooks recording every call
struct Recorder {
    name: &'static str,
    log: Log,
    entities: usize,
    logic: Vec<i32>,
    render: usize,
    fail_load: bool,
    fail_register_after: Option<usize>,
    fail_unload: bool,
    switch_to: Option<Scene>,
}

impl Recorder {
    fn new(name: &'static str, log: &Log) -> Self {
        Self {
            name,
            log: Arc::clone(log),
            entities: 1,
            logic: vec![0],
            render: 1,
            fail_load: false,
            fail_register_after: None,
            fail_unload: false,
            switch_to: None,
        }
    }

    fn push(&self, event: &str) {
        self.log.lock().unwrap().push(format!("{}:{}", self.name, event));
    }

    fn into_scene(self) -> Scene {
        Scene::new(self.name, self)
    }
}

impl SceneLifecycle for Recorder {
    fn on_load(&mut self, ctx: &mut SceneContext<'_>) -> Result<(), SceneError> {
        self.push("load");
        if self.fail_load {
            return Err(SceneError::hook("load failed"));
        }
        for i in 0..self.entities {
            let entity = ctx.create_entity()?;
            ctx.add_component(entity, Position(i as f32, 0.0))?;
            ctx.add_component(entity, Tag(format!("{}-{}", self.name, i)))?;
        }
        Ok(())
    }

    fn register_systems(&mut self, registrar: &mut SystemRegistrar<'_>) -> Result<(), SceneError> {
        self.push("register");
        for (i, &order) in self.logic.iter().enumerate() {
            if self.fail_register_after == Some(i) {
                return Err(SceneError::hook("register failed"));
            }
            registrar.add_logic(Probe {
                label: format!("{}-logic-{}", self.name, order),
                order,
                log: Arc::clone(&self.log),
            });
        }
        for i in 0..self.render {
            registrar.add_render(Probe {
                label: format!("{}-render-{}", self.name, i),
                order: 0,
                log: Arc::clone(&self.log),
            });
        }
        if let Some(scene) = self.switch_to.take() {
            registrar.add_logic(Switcher {
                next: Some(scene),
                second: None,
                outcome: Arc::default(),
            });
        }
        Ok(())
    }

    fn on_unload(&mut self, _ctx: &mut SceneContext<'_>) -> Result<(), SceneError> {
        self.push("unload");
        if self.fail_unload {
            return Err(SceneError::hook("unload failed"));
        }
        Ok(())
    }

    fn on_viewport_resize(&mut self, ctx: &mut SceneContext<'_>, width: u32, height: u32) -> Result<(), SceneError> {
        assert_eq!(ctx.viewport().width, width);
        self.push(&format!("resize:{}x{}", width, height));
        Ok(())
    }
}

fn manager() -> SceneManager {
    SceneManager::new(ServiceRegistry::new())
}

fn frame() -> FrameTime {
    FrameTime::new(1.0 / 60.0, 1.0)
}

fn system_counts(manager: &SceneManager) -> (usize, usize) {
    let schedulers = manager.schedulers();
    (schedulers.logic().len(), schedulers.render().len())
}

#[test]
fn test_load_into_empty_manager() {
    let log = Log::default();
    let mut manager = manager();
    assert_eq!(manager.state(), SceneState::NoScene);

    manager.load(Recorder::new("a", &log).into_scene()).unwrap();

    assert_eq!(drain(&log), vec!["a:load", "a:register"]);
    assert_eq!(manager.state(), SceneState::SceneActive);
    assert!(manager.is_loaded());
    assert_eq!(manager.current().unwrap().name(), "a");
    assert_eq!(manager.current().unwrap().world().entity_count(), 1);
    assert_eq!(system_counts(&manager), (1, 1));
}

#[test]
fn test_load_replaces_current_scene() {
    let log = Log::default();
    let mut manager = manager();
    let mut a = Recorder::new("a", &log);
    a.logic = vec![0, 1, 2];
    manager.load(a.into_scene()).unwrap();
    drain(&log);

    let mut b = Recorder::new("b", &log);
    b.logic = vec![7];
    b.render = 2;
    manager.load(b.into_scene()).unwrap();

    assert_eq!(drain(&log), vec!["a:unload", "b:load", "b:register"]);
    assert_eq!(system_counts(&manager), (1, 2));
    assert_eq!(manager.current().unwrap().name(), "b");

    manager.tick(frame()).unwrap();
    assert_eq!(
        drain(&log),
        vec!["tick:b-logic-7", "render:b-render-0", "render:b-render-1"]
    );
}

#[test]
fn test_reload_does_not_duplicate_systems() {
    let log = Log::default();
    let mut manager = manager();
    let mut a = Recorder::new("a", &log);
    a.logic = vec![3, 1];
    a.entities = 4;
    manager.load(a.into_scene()).unwrap();
    let before = system_counts(&manager);
    drain(&log);

    manager.reload().unwrap();
    manager.reload().unwrap();

    assert_eq!(
        drain(&log),
        vec!["a:unload", "a:load", "a:register", "a:unload", "a:load", "a:register"]
    );
    assert_eq!(system_counts(&manager), before);
    // The world is rebuilt from scratch, not appended to
    assert_eq!(manager.current().unwrap().world().entity_count(), 4);
    assert!(manager.is_loaded());
}

#[test]
fn test_reload_without_scene_fails() {
    let mut manager = manager();
    assert!(matches!(manager.reload(), Err(SceneError::NoCurrentScene)));
    assert_eq!(manager.state(), SceneState::NoScene);
}

#[test]
fn test_failed_on_load_leaves_scene_not_loaded() {
    let log = Log::default();
    let mut manager = manager();
    manager.load(Recorder::new("a", &log).into_scene()).unwrap();
    drain(&log);

    let mut b = Recorder::new("b", &log);
    b.fail_load = true;
    let err = manager.load(b.into_scene()).unwrap_err();

    assert!(matches!(err, SceneError::Load { ref scene, .. } if scene == "b"));
    assert_eq!(drain(&log), vec!["a:unload", "b:load"]);
    assert_eq!(manager.state(), SceneState::LoadFailed);
    assert!(!manager.is_loaded());
    assert_eq!(manager.current().unwrap().name(), "b");
    assert_eq!(system_counts(&manager), (0, 0));

    // Nothing ticks while the scene is not loaded
    manager.tick(frame()).unwrap();
    assert!(drain(&log).is_empty());
}

#[test]
fn test_failed_registration_leaves_no_partial_systems() {
    let log = Log::default();
    let mut manager = manager();
    let mut a = Recorder::new("a", &log);
    a.logic = vec![0, 1, 2, 3];
    a.fail_register_after = Some(2);
    let err = manager.load(a.into_scene()).unwrap_err();

    assert!(matches!(err, SceneError::Load { .. }));
    assert_eq!(system_counts(&manager), (0, 0));
    assert_eq!(manager.state(), SceneState::LoadFailed);

    // Unloading a scene that never finished loading does not run on_unload
    drain(&log);
    manager.load(Recorder::new("b", &log).into_scene()).unwrap();
    assert_eq!(drain(&log), vec!["b:load", "b:register"]);
}

#[test]
fn test_failed_on_unload_drops_old_scene() {
    let log = Log::default();
    let mut manager = manager();
    let mut a = Recorder::new("a", &log);
    a.fail_unload = true;
    manager.load(a.into_scene()).unwrap();
    drain(&log);

    let err = manager.load(Recorder::new("b", &log).into_scene()).unwrap_err();

    assert!(matches!(err, SceneError::Unload { ref scene, .. } if scene == "a"));
    assert_eq!(drain(&log), vec!["a:unload"]);
    assert_eq!(manager.current().unwrap().name(), "b");
    assert!(!manager.is_loaded());
    assert_eq!(manager.state(), SceneState::LoadFailed);
    assert_eq!(system_counts(&manager), (0, 0));

    // Retrying completes the load of the scene left current
    manager.reload().unwrap();
    assert_eq!(drain(&log), vec!["b:load", "b:register"]);
    assert!(manager.is_loaded());
}

#[test]
fn test_viewport_resize_only_reaches_loaded_scene() {
    let log = Log::default();
    let mut manager = manager();
    manager.on_viewport_resize(640, 480).unwrap();
    assert_eq!(manager.viewport().width, 640);

    manager.load(Recorder::new("a", &log).into_scene()).unwrap();
    drain(&log);
    let counts = system_counts(&manager);

    manager.on_viewport_resize(800, 600).unwrap();
    assert_eq!(drain(&log), vec!["a:resize:800x600"]);
    assert_eq!(system_counts(&manager), counts);

    let mut b = Recorder::new("b", &log);
    b.fail_load = true;
    manager.load(b.into_scene()).unwrap_err();
    drain(&log);
    manager.on_viewport_resize(1024, 768).unwrap();
    assert!(drain(&log).is_empty());
}

#[test]
fn test_transition_requested_by_system_is_deferred() {
    let log = Log::default();
    let mut manager = manager();
    let mut a = Recorder::new("a", &log);
    a.switch_to = Some(Recorder::new("b", &log).into_scene());
    manager.load(a.into_scene()).unwrap();
    drain(&log);

    manager.tick(frame()).unwrap();
    // The whole tick of scene a completes before anything changes
    assert_eq!(drain(&log), vec!["tick:a-logic-0", "render:a-render-0"]);
    assert!(manager.has_pending_transition());
    assert_eq!(manager.current().unwrap().name(), "a");

    manager.tick(frame()).unwrap();
    assert_eq!(
        drain(&log),
        vec![
            "a:unload",
            "b:load",
            "b:register",
            "tick:b-logic-0",
            "render:b-render-0"
        ]
    );
    assert!(!manager.has_pending_transition());
    assert_eq!(manager.current().unwrap().name(), "b");
}

#[test]
fn test_second_transition_request_in_one_tick_is_rejected() {
    struct Doubler {
        outcome: Arc<Mutex<Option<Result<(), EcsError>>>>,
        log: Log,
    }

    impl SceneLifecycle for Doubler {
        fn on_load(&mut self, _ctx: &mut SceneContext<'_>) -> Result<(), SceneError> {
            Ok(())
        }

        fn register_systems(&mut self, registrar: &mut SystemRegistrar<'_>) -> Result<(), SceneError> {
            registrar.add_logic(Switcher {
                next: Some(Recorder::new("b", &self.log).into_scene()),
                second: Some(Recorder::new("c", &self.log).into_scene()),
                outcome: Arc::clone(&self.outcome),
            });
            Ok(())
        }
    }

    let log = Log::default();
    let outcome = Arc::default();
    let mut manager = manager();
    manager
        .load(Scene::new(
            "doubler",
            Doubler {
                outcome: Arc::clone(&outcome),
                log: Arc::clone(&log),
            },
        ))
        .unwrap();

    manager.tick(frame()).unwrap();
    assert!(matches!(
        *outcome.lock().unwrap(),
        Some(Err(EcsError::ReentrantMutation(_)))
    ));

    manager.tick(frame()).unwrap();
    assert_eq!(manager.current().unwrap().name(), "b");
}

#[test]
fn test_host_requests_are_applied_on_next_tick() {
    let log = Log::default();
    let mut manager = manager();
    manager.request_load(Recorder::new("a", &log).into_scene()).unwrap();
    assert!(manager.current().is_none());
    assert!(manager.request_reload().is_err());

    manager.tick(frame()).unwrap();
    assert_eq!(
        drain(&log),
        vec!["a:load", "a:register", "tick:a-logic-0", "render:a-render-0"]
    );

    manager.request_reload().unwrap();
    manager.tick(frame()).unwrap();
    assert_eq!(
        drain(&log),
        vec![
            "a:unload",
            "a:load",
            "a:register",
            "tick:a-logic-0",
            "render:a-render-0"
        ]
    );
}

#[test]
fn test_unload_returns_to_no_scene() {
    let log = Log::default();
    let mut manager = manager();
    manager.load(Recorder::new("a", &log).into_scene()).unwrap();
    drain(&log);

    manager.unload().unwrap();

    assert_eq!(drain(&log), vec!["a:unload"]);
    assert_eq!(manager.state(), SceneState::NoScene);
    assert!(manager.current().is_none());
    assert_eq!(system_counts(&manager), (0, 0));
    manager.tick(frame()).unwrap();
    assert!(drain(&log).is_empty());
}

#[test]
fn test_services_are_visible_and_sealed() {
    struct NeedsGravity {
        seen: Arc<Mutex<Option<f32>>>,
    }

    impl SceneLifecycle for NeedsGravity {
        fn on_load(&mut self, ctx: &mut SceneContext<'_>) -> Result<(), SceneError> {
            *self.seen.lock().unwrap() = Some(ctx.service::<Gravity>()?.0);
            Ok(())
        }

        fn register_systems(&mut self, registrar: &mut SystemRegistrar<'_>) -> Result<(), SceneError> {
            registrar.service::<Gravity>()?;
            Ok(())
        }
    }

    let mut services = ServiceRegistry::new();
    services.insert(Gravity(9.8)).unwrap();
    let mut manager = SceneManager::new(services);
    assert!(manager.services().is_sealed());

    let seen = Arc::default();
    manager
        .load(Scene::new("g", NeedsGravity { seen: Arc::clone(&seen) }))
        .unwrap();
    assert_eq!(*seen.lock().unwrap(), Some(9.8));

    // Without the service the load fails cleanly
    let mut bare = SceneManager::new(ServiceRegistry::new());
    let err = bare
        .load(Scene::new("g", NeedsGravity { seen: Arc::default() }))
        .unwrap_err();
    assert!(matches!(err, SceneError::Load { .. }));
    assert_eq!(bare.state(), SceneState::LoadFailed);
}

#[test]
fn test_world_config_applies_to_scene_worlds() {
    let log = Log::default();
    let config = RuntimeConfig {
        world: WorldConfig {
            max_entities: Some(2),
        },
        ..RuntimeConfig::default()
    };
    let mut manager = SceneManager::with_config(ServiceRegistry::new(), &config);

    let mut a = Recorder::new("a", &log);
    a.entities = 3;
    let err = manager.load(a.into_scene()).unwrap_err();

    match err {
        SceneError::Load { source, .. } => {
            assert!(matches!(*source, SceneError::Ecs(EcsError::OutOfCapacity { limit: 2 })));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_player_query_through_scene_context() {
    struct Players {
        found: Arc<Mutex<Vec<usize>>>,
    }

    impl SceneLifecycle for Players {
        fn on_load(&mut self, ctx: &mut SceneContext<'_>) -> Result<(), SceneError> {
            let e1 = ctx.create_entity()?;
            ctx.add_component(e1, Position(0.0, 0.0))?;
            ctx.add_component(e1, Tag("Player".to_string()))?;
            let e2 = ctx.create_entity()?;
            ctx.add_component(e2, Position(5.0, 5.0))?;

            let mut found = self.found.lock().unwrap();
            found.push(ctx.query::<(Position, Tag)>().len());
            assert_eq!(ctx.query::<(Position, Tag)>(), vec![e1]);

            ctx.remove_component::<Tag>(e1);
            found.push(ctx.query::<(Position, Tag)>().len());
            assert!(ctx.has_component::<Position>(e2));
            Ok(())
        }

        fn register_systems(&mut self, _registrar: &mut SystemRegistrar<'_>) -> Result<(), SceneError> {
            Ok(())
        }
    }

    let found = Arc::default();
    let mut manager = manager();
    manager
        .load(Scene::new("players", Players { found: Arc::clone(&found) }))
        .unwrap();
    assert_eq!(*found.lock().unwrap(), vec![1, 0]);
}
