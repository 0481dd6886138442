//! Point force fields. A single type covers both attraction and
//! repulsion; the sign of `strength` picks the direction.

use crate::math::Vec2;

/// Distance clamp keeping the inverse-square law finite near the field
/// center and negligible far away.
const MIN_DISTANCE: f32 = 5.0;
const MAX_DISTANCE: f32 = 100.0;
/// Visibility scaling applied to the raw inverse-square magnitude.
const FORCE_SCALE: f32 = 50.0;

#[derive(Clone, Copy, Debug)]
pub struct Field {
    pub position: Vec2,
    pub strength: f32,
}

impl Field {
    pub fn attractor(position: Vec2, strength: f32) -> Field {
        Field { position, strength }
    }

    pub fn repeller(position: Vec2, strength: f32) -> Field {
        Field {
            position,
            strength: -strength.abs(),
        }
    }

    pub fn is_repeller(&self) -> bool {
        self.strength < 0.0
    }

    /// Force exerted on a particle of the given mass at `position`.
    ///
    /// Always finite: the distance clamp rules out the zero-distance
    /// singularity, and a coincident position yields the zero vector.
    pub fn force_on(&self, position: Vec2, mass: f32) -> Vec2 {
        let dir = self.position - position;
        let d = dir.length().clamp(MIN_DISTANCE, MAX_DISTANCE);
        let magnitude = self.strength * mass / (d * d);
        dir.normalized() * (magnitude * FORCE_SCALE)
    }
}
