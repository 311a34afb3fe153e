//! Menu and field scenes with their systems
//!
//! The menu counts down and then asks the scene manager for the field. The
//! field scatters drifting motes inside an arena sized from the viewport.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use nalgebra::Vector2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sim_core::prelude::*;

use crate::components::{Bounds, Countdown, Label, Position, Velocity};

/// Tunables shared by both scenes
#[derive(Debug, Clone)]
pub struct ArenaSettings {
    pub menu_seconds: f32,
    pub mote_count: usize,
    pub max_speed: f32,
    pub span: f32,
    pub seed: u64,
}

impl Default for ArenaSettings {
    fn default() -> Self {
        Self {
            menu_seconds: 0.5,
            mote_count: 64,
            max_speed: 4.0,
            span: 40.0,
            seed: 7,
        }
    }
}

/// Counters written by render systems and read by the host
#[derive(Debug, Default)]
pub struct Telemetry {
    frames_rendered: AtomicU64,
    last_visible: AtomicUsize,
    transitions: AtomicU64,
}

impl Telemetry {
    fn record_frame(&self, visible: usize) {
        self.frames_rendered.fetch_add(1, Ordering::Relaxed);
        self.last_visible.store(visible, Ordering::Relaxed);
    }

    fn record_transition(&self) {
        self.transitions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered.load(Ordering::Relaxed)
    }

    pub fn last_visible(&self) -> usize {
        self.last_visible.load(Ordering::Relaxed)
    }

    pub fn transitions(&self) -> u64 {
        self.transitions.load(Ordering::Relaxed)
    }
}

/// Title screen that hands over to the field after a short countdown
#[derive(Debug, Default)]
pub struct MenuScene;

impl MenuScene {
    pub fn scene() -> Scene {
        Scene::new("menu", Self)
    }
}

impl SceneLifecycle for MenuScene {
    fn on_load(&mut self, ctx: &mut SceneContext<'_>) -> Result<(), SceneError> {
        let seconds = ctx.service::<ArenaSettings>()?.menu_seconds;
        let title = ctx.create_entity()?;
        ctx.entity_mut(title)?
            .with(Countdown { remaining: seconds })?
            .with(Label("title".to_string()))?;
        log::info!("Menu ready, field in {:.2}s", seconds);
        Ok(())
    }

    fn register_systems(&mut self, registrar: &mut SystemRegistrar<'_>) -> Result<(), SceneError> {
        registrar.add_logic(MenuCountdown { requested: false });
        registrar.add_render(Census);
        Ok(())
    }
}

/// Arena of drifting motes
#[derive(Debug, Default)]
pub struct FieldScene {
    motes: Vec<Entity>,
}

impl FieldScene {
    pub fn scene() -> Scene {
        Scene::new("field", Self::default())
    }
}

impl SceneLifecycle for FieldScene {
    fn on_load(&mut self, ctx: &mut SceneContext<'_>) -> Result<(), SceneError> {
        let settings = ctx.service::<ArenaSettings>()?;
        let viewport = ctx.viewport();
        let bounds = Bounds::from_viewport(viewport.width, viewport.height, settings.span);

        let arena = ctx.create_entity()?;
        ctx.add_component(arena, bounds)?;
        ctx.add_component(arena, Label("arena".to_string()))?;

        let mut rng = StdRng::seed_from_u64(settings.seed);
        self.motes.clear();
        for _ in 0..settings.mote_count {
            let position = Vector2::new(
                rng.gen_range(-bounds.half_extents.x..=bounds.half_extents.x),
                rng.gen_range(-bounds.half_extents.y..=bounds.half_extents.y),
            );
            let velocity = Vector2::new(
                rng.gen_range(-settings.max_speed..=settings.max_speed),
                rng.gen_range(-settings.max_speed..=settings.max_speed),
            );
            let mote = ctx.create_entity()?;
            ctx.add_component(mote, Position(position))?;
            ctx.add_component(mote, Velocity(velocity))?;
            self.motes.push(mote);
        }

        log::info!(
            "Field loaded: {} motes in {:.1}x{:.1} arena",
            self.motes.len(),
            bounds.half_extents.x * 2.0,
            bounds.half_extents.y * 2.0
        );
        Ok(())
    }

    fn register_systems(&mut self, registrar: &mut SystemRegistrar<'_>) -> Result<(), SceneError> {
        registrar.add_logic(WrapToBounds);
        registrar.add_logic(Integrate);
        registrar.add_render(Census);
        Ok(())
    }

    fn on_unload(&mut self, _ctx: &mut SceneContext<'_>) -> Result<(), SceneError> {
        log::debug!("Field unloading {} motes", self.motes.len());
        self.motes.clear();
        Ok(())
    }

    fn on_viewport_resize(&mut self, ctx: &mut SceneContext<'_>, width: u32, height: u32) -> Result<(), SceneError> {
        let span = ctx.service::<ArenaSettings>()?.span;
        for arena in ctx.query::<(Bounds,)>() {
            *ctx.get_component_mut::<Bounds>(arena)? = Bounds::from_viewport(width, height, span);
        }
        log::info!("Field arena resized for {}x{}", width, height);
        Ok(())
    }
}

/// Counts the menu down and requests the field scene once
struct MenuCountdown {
    requested: bool,
}

impl LogicSystem for MenuCountdown {
    fn order(&self) -> i32 {
        0
    }

    fn name(&self) -> &str {
        "MenuCountdown"
    }

    fn tick_logic(&mut self, ctx: &mut TickContext<'_>, time: FrameTime) -> Result<(), SystemError> {
        if self.requested {
            return Ok(());
        }

        let mut expired = false;
        for entity in ctx.world.query::<(Countdown,)>() {
            let countdown = ctx.world.get_component_mut::<Countdown>(entity)?;
            countdown.remaining -= time.delta_seconds();
            expired |= countdown.remaining <= 0.0;
        }

        if expired {
            ctx.commands.load_scene(FieldScene::scene())?;
            ctx.service::<Telemetry>()?.record_transition();
            self.requested = true;
            log::info!("Menu finished at {:.2}s, requesting field", time.total_seconds());
        }
        Ok(())
    }
}

/// Moves every entity with a velocity
struct Integrate;

impl LogicSystem for Integrate {
    fn order(&self) -> i32 {
        0
    }

    fn name(&self) -> &str {
        "Integrate"
    }

    fn tick_logic(&mut self, ctx: &mut TickContext<'_>, time: FrameTime) -> Result<(), SystemError> {
        let dt = time.delta_seconds();
        for entity in ctx.world.query::<(Position, Velocity)>() {
            let velocity = ctx.world.get_component::<Velocity>(entity)?.0;
            ctx.world.get_component_mut::<Position>(entity)?.0 += velocity * dt;
        }
        Ok(())
    }
}

/// Wraps positions that left the arena; runs after integration
struct WrapToBounds;

impl LogicSystem for WrapToBounds {
    fn order(&self) -> i32 {
        10
    }

    fn name(&self) -> &str {
        "WrapToBounds"
    }

    fn tick_logic(&mut self, ctx: &mut TickContext<'_>, _time: FrameTime) -> Result<(), SystemError> {
        let Some(bounds) = ctx.world.view::<Bounds>().map(|(_, bounds)| *bounds).next() else {
            return Err(SystemError::failed(self.name(), "arena has no bounds"));
        };
        for (_, position) in ctx.world.view_mut::<Position>() {
            position.0 = bounds.wrap(position.0);
        }
        Ok(())
    }
}

/// Stand-in renderer: counts what would be drawn this frame
struct Census;

impl RenderSystem for Census {
    fn order(&self) -> i32 {
        0
    }

    fn name(&self) -> &str {
        "Census"
    }

    fn tick_render(&mut self, ctx: &mut TickContext<'_>, _time: FrameTime) -> Result<(), SystemError> {
        let visible = ctx.world.query::<(Position,)>().len() + ctx.world.query::<(Label,)>().len();
        ctx.service::<Telemetry>()?.record_frame(visible);
        Ok(())
    }
}
