//! Components used by the sandbox scenes

use nalgebra::Vector2;
use sim_core::ecs::Component;

/// World-space position in arena units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position(pub Vector2<f32>);
impl Component for Position {}

/// Linear velocity in arena units per second
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Velocity(pub Vector2<f32>);
impl Component for Velocity {}

/// Half extents of the playable area, kept on a single arena entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub half_extents: Vector2<f32>,
}
impl Component for Bounds {}

impl Bounds {
    /// Bounds matching a viewport, scaled so the short side spans `span` units
    pub fn from_viewport(width: u32, height: u32, span: f32) -> Self {
        let short = width.min(height).max(1) as f32;
        let scale = span / short;
        Self {
            half_extents: Vector2::new(width as f32 * scale, height as f32 * scale) * 0.5,
        }
    }

    /// Wrap a position back inside the arena
    pub fn wrap(&self, position: Vector2<f32>) -> Vector2<f32> {
        let extent = self.half_extents;
        Vector2::new(wrap_axis(position.x, extent.x), wrap_axis(position.y, extent.y))
    }
}

fn wrap_axis(value: f32, half_extent: f32) -> f32 {
    if half_extent <= 0.0 {
        return 0.0;
    }
    let size = half_extent * 2.0;
    (value + half_extent).rem_euclid(size) - half_extent
}

/// Seconds left before the menu hands over to the field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Countdown {
    pub remaining: f32,
}
impl Component for Countdown {}

/// Display name for debug output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label(pub String);
impl Component for Label {}
