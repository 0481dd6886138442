//! Simulation tunables. Everything that shapes the glass or the physics
//! lives here so the shell can expose sliders without reaching into the
//! core modules.

use crate::math::{Vec2, vec2};

#[derive(Clone, Debug)]
pub struct SimConfig {
    /// Canvas size in pixels; the pile height field has one column per
    /// horizontal pixel.
    pub width: f32,
    pub height: f32,

    /// Full width of each glass bulb and of the connecting neck.
    pub glass_width: f32,
    pub neck_width: f32,
    /// Distance from the canvas edge to the glass rim / floor.
    pub rim_margin: f32,

    /// Per-frame gravity acceleration applied as a force (scaled by mass
    /// on application, divided back out by `apply_force`).
    pub gravity: Vec2,
    /// Per-frame velocity retention factor (air drag).
    pub drag: f32,
    /// Lateral velocity multiplier on wall contact. Negative: reflect.
    pub wall_damping: f32,
    /// Lateral velocity multiplier while brushing the pile surface.
    pub ground_friction: f32,

    /// Vertical proximity at which a particle counts as touching the pile.
    pub ground_epsilon: f32,
    /// Neighbor height differential beyond which a particle slides
    /// instead of resting (the angle of repose).
    pub repose_threshold: f32,
    /// How much one settled particle raises its column.
    pub settle_amount: f32,
    /// Columns on each side sharing the raise with triangular falloff.
    /// Zero keeps the whole amount in a single column.
    pub settle_radius: usize,

    /// Horizontal inset of the spawn region from the bulb walls and the
    /// vertical depth of the region below the rim.
    pub spawn_inset: f32,
    pub spawn_depth: f32,
    pub spawn_per_frame: usize,
    pub particle_cap: usize,
    pub mass_range: (f32, f32),

    /// How far below the canvas a particle may stray before respawning.
    pub escape_margin: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig {
            width: 800.0,
            height: 600.0,
            glass_width: 300.0,
            neck_width: 20.0,
            rim_margin: 50.0,
            gravity: vec2(0.0, 0.05),
            drag: 0.99,
            wall_damping: -0.5,
            ground_friction: 0.5,
            ground_epsilon: 2.0,
            repose_threshold: 3.0,
            settle_amount: 1.0,
            settle_radius: 2,
            spawn_inset: 20.0,
            spawn_depth: 50.0,
            spawn_per_frame: 2,
            particle_cap: 2000,
            mass_range: (0.8, 1.5),
            escape_margin: 50.0,
        }
    }
}

impl SimConfig {
    pub fn center_x(&self) -> f32 {
        self.width / 2.0
    }

    pub fn mid_y(&self) -> f32 {
        self.height / 2.0
    }

    pub fn top_y(&self) -> f32 {
        self.rim_margin
    }

    /// The pile floor inside the lower bulb.
    pub fn bottom_y(&self) -> f32 {
        self.height - self.rim_margin
    }

    pub fn spawn_origin(&self) -> Vec2 {
        vec2(self.center_x(), self.top_y())
    }
}
