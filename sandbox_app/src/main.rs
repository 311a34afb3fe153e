//! Sandbox host: a menu scene that hands over to a field of drifting motes
//!
//! Usage: `sandbox [config.toml|config.ron]`. A missing config file falls
//! back to defaults.

mod components;
mod scenes;

use sim_core::config::{Config, RuntimeConfig};
use sim_core::foundation::logging;
use sim_core::prelude::*;
use thiserror::Error;

use crate::components::Position;
use crate::scenes::{ArenaSettings, MenuScene, Telemetry};

const FRAME_COUNT: usize = 240;
const FIXED_STEP: f32 = 1.0 / 60.0;
const RESIZE_AT_FRAME: usize = 180;
const DEFAULT_CONFIG_PATH: &str = "sandbox.toml";

#[derive(Error, Debug)]
enum SandboxError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("service registration failed: {0}")]
    Service(#[from] ServiceError),

    #[error("scene error: {0}")]
    Scene(#[from] SceneError),
}

fn run(config: &RuntimeConfig) -> Result<(), SandboxError> {
    let services = ServiceRegistry::new()
        .with(ArenaSettings::default())?
        .with(Telemetry::default())?;

    let mut manager = SceneManager::with_config(services, config);
    manager.load(MenuScene::scene())?;

    let mut timer = Timer::new();
    let mut time = FrameTime::default();
    for frame in 0..FRAME_COUNT {
        if frame == RESIZE_AT_FRAME {
            let viewport = manager.viewport();
            manager.on_viewport_resize(viewport.width / 2, viewport.height)?;
        }

        time = time.advance(FIXED_STEP);
        manager.tick(time)?;
        timer.update();
    }

    let telemetry = manager.services().require::<Telemetry>()?;
    let scene = manager.current().map_or("<none>", Scene::name);
    let motes = manager
        .current()
        .map_or(0, |scene| scene.world().component_count::<Position>());

    println!("Sandbox summary");
    println!("  frames ticked:     {}", FRAME_COUNT);
    println!("  simulated seconds: {:.2}", time.total_seconds());
    println!("  wall fps:          {:.1}", timer.average_fps());
    println!("  final scene:       {} ({:?})", scene, manager.state());
    println!("  scene transitions: {}", telemetry.transitions());
    println!("  frames rendered:   {}", telemetry.frames_rendered());
    println!("  live motes:        {}", motes);
    println!("  systems:           {:?}", manager.schedulers().logic().system_names());
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = RuntimeConfig::load_or_default(&config_path)?;
    logging::init_with_config(&config.logging);

    log::info!("Starting sandbox with config '{}'", config_path);
    match run(&config) {
        Ok(()) => {
            log::info!("Sandbox completed successfully");
            Ok(())
        }
        Err(e) => {
            log::error!("Sandbox failed: {}", e);
            Err(e.into())
        }
    }
}
