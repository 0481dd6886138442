//! A single grain of sand: force accumulation, per-frame integration,
//! wall reflection, and contact with the growing pile.

use rand::Rng;

use crate::boundary::ContainerBoundary;
use crate::config::SimConfig;
use crate::math::{Color, Vec2, remap, vec2};
use crate::pile::{PileHeightField, Slide, repose};

/// Color at the top of the glass.
pub const YOUNG: Color = Color::new(100, 255, 255);
/// Color near the floor.
pub const AGED: Color = Color::new(255, 200, 50);
const SPAWN_COLOR: Color = Color::new(100, 200, 255);

/// Lateral nudge applied when sliding off a slope.
const SLIDE_NUDGE: f32 = 0.5;
/// Random kick range when perched on a peak.
const PEAK_KICK: f32 = 1.0;

/// Outcome of one pile-contact evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PileContact {
    /// Not near the surface this frame.
    Airborne,
    /// Touching but still moving laterally toward a resting spot.
    Sliding,
    /// Froze into the pile this frame.
    Settled,
    /// Over a bottomless column; the particle is leaving the glass.
    Escaped,
}

#[derive(Clone, Copy, Debug)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    pub acceleration: Vec2,
    pub mass: f32,
    pub settled: bool,
    pub color: Color,
}

impl Particle {
    /// A fresh grain somewhere in the spawn band under `origin`, the
    /// center of the upper bulb's rim.
    pub fn spawn(origin: Vec2, cfg: &SimConfig, rng: &mut impl Rng) -> Particle {
        let half = cfg.glass_width / 2.0 - cfg.spawn_inset;
        Particle {
            position: vec2(
                rng.gen_range(origin.x - half..origin.x + half),
                rng.gen_range(origin.y..origin.y + cfg.spawn_depth),
            ),
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            mass: rng.gen_range(cfg.mass_range.0..cfg.mass_range.1),
            settled: false,
            color: SPAWN_COLOR,
        }
    }

    /// Reset to a fresh spawn state. Used when a grain escapes the
    /// glass instead of ever treating that as an error.
    pub fn respawn(&mut self, origin: Vec2, cfg: &SimConfig, rng: &mut impl Rng) {
        *self = Particle::spawn(origin, cfg, rng);
    }

    /// Accumulate `force / mass` into the acceleration. A no-op once
    /// settled: frozen grains are part of the pile and feel nothing.
    pub fn apply_force(&mut self, force: Vec2) {
        if self.settled {
            return;
        }
        self.acceleration += force * (1.0 / self.mass);
    }

    /// One frame of motion: Euler step, drag, color aging. Settled
    /// grains never move again.
    pub fn integrate(&mut self, cfg: &SimConfig) {
        if self.settled {
            return;
        }
        self.velocity += self.acceleration;
        self.position += self.velocity;
        self.acceleration = Vec2::ZERO;
        self.velocity *= cfg.drag;

        let t = remap(self.position.y, cfg.top_y(), cfg.bottom_y(), 0.0, 1.0);
        self.color = Color::lerp(YOUNG, AGED, t);
    }

    /// Reflect off the glass wall when the lateral offset exceeds the
    /// row's half-width. Rows outside the table are unconstrained.
    pub fn constrain_to_glass(&mut self, boundary: &ContainerBoundary, cfg: &SimConfig) {
        if self.settled {
            return;
        }
        let Some(hw) = boundary.half_width_at(self.position.y) else {
            return;
        };
        let cx = cfg.center_x();
        let dx = self.position.x - cx;
        if dx.abs() > hw {
            self.position.x = cx + hw.copysign(dx);
            self.velocity.x *= cfg.wall_damping;
        }
    }

    /// Resolve contact with the pile surface. Callers invoke this only
    /// for unsettled grains below the midline.
    pub fn contact_pile(
        &mut self,
        pile: &mut PileHeightField,
        cfg: &SimConfig,
        rng: &mut impl Rng,
    ) -> PileContact {
        let Some(col) = pile.column_of(self.position.x) else {
            return PileContact::Escaped;
        };
        if pile.is_bottomless(col) {
            return PileContact::Escaped;
        }

        let ground = pile.height_at(col as isize);
        if self.position.y < ground - cfg.ground_epsilon {
            return PileContact::Airborne;
        }

        let left = pile.height_at(col as isize - 1);
        let right = pile.height_at(col as isize + 1);
        match repose(ground, left, right, cfg.repose_threshold) {
            Slide::Peak => self.velocity.x += rng.gen_range(-PEAK_KICK..PEAK_KICK),
            Slide::Left => self.velocity.x -= SLIDE_NUDGE,
            Slide::Right => self.velocity.x += SLIDE_NUDGE,
            Slide::Rest => {
                self.position.y = ground;
                self.velocity = Vec2::ZERO;
                self.acceleration = Vec2::ZERO;
                self.settled = true;
                pile.settle(col, cfg.settle_amount, cfg.settle_radius);
                return PileContact::Settled;
            }
        }

        // Surface friction while skidding toward a resting spot.
        self.velocity.x *= cfg.ground_friction;
        PileContact::Sliding
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn spawn_has_positive_mass_inside_spawn_band() {
        let cfg = SimConfig::default();
        let mut rng = rng();
        for _ in 0..500 {
            let p = Particle::spawn(cfg.spawn_origin(), &cfg, &mut rng);
            assert!(p.mass > 0.0);
            assert!(p.mass >= cfg.mass_range.0 && p.mass < cfg.mass_range.1);
            assert!(p.position.x >= 270.0 && p.position.x <= 530.0);
            assert!(p.position.y >= 50.0 && p.position.y < 100.0);
            assert!(!p.settled);
        }
    }

    #[test]
    fn apply_force_divides_by_mass() {
        let cfg = SimConfig::default();
        let mut p = Particle::spawn(cfg.spawn_origin(), &cfg, &mut rng());
        p.mass = 2.0;
        p.apply_force(vec2(1.0, 4.0));
        assert_eq!(p.acceleration, vec2(0.5, 2.0));
    }

    #[test]
    fn apply_force_is_noop_once_settled() {
        let cfg = SimConfig::default();
        let mut p = Particle::spawn(cfg.spawn_origin(), &cfg, &mut rng());
        p.settled = true;
        p.apply_force(vec2(10.0, 10.0));
        assert_eq!(p.acceleration, Vec2::ZERO);
    }

    #[test]
    fn integrate_applies_drag_and_clears_acceleration() {
        let cfg = SimConfig::default();
        let mut p = Particle::spawn(cfg.spawn_origin(), &cfg, &mut rng());
        p.position = vec2(400.0, 100.0);
        p.velocity = vec2(1.0, 0.0);
        p.acceleration = vec2(0.0, 1.0);
        p.integrate(&cfg);
        assert_eq!(p.position, vec2(401.0, 101.0));
        assert_eq!(p.acceleration, Vec2::ZERO);
        assert!((p.velocity.x - 0.99).abs() < 1e-6);
        assert!((p.velocity.y - 0.99).abs() < 1e-6);
    }

    #[test]
    fn settled_particle_never_moves() {
        let cfg = SimConfig::default();
        let mut p = Particle::spawn(cfg.spawn_origin(), &cfg, &mut rng());
        p.settled = true;
        p.velocity = Vec2::ZERO;
        p.acceleration = Vec2::ZERO;
        let frozen_at = p.position;
        let frozen_color = p.color;
        for _ in 0..100 {
            p.integrate(&cfg);
        }
        assert_eq!(p.position, frozen_at);
        assert_eq!(p.velocity, Vec2::ZERO);
        assert_eq!(p.acceleration, Vec2::ZERO);
        assert_eq!(p.color, frozen_color);
    }

    #[test]
    fn color_ages_downward() {
        let cfg = SimConfig::default();
        let mut p = Particle::spawn(cfg.spawn_origin(), &cfg, &mut rng());
        p.position = vec2(400.0, 49.0);
        p.integrate(&cfg);
        assert_eq!(p.color, YOUNG);
        p.position = vec2(400.0, 549.0);
        p.velocity = Vec2::ZERO;
        p.integrate(&cfg);
        assert_eq!(p.color, AGED);
    }

    #[test]
    fn wall_reflection_at_the_neck() {
        let cfg = SimConfig::default();
        let boundary = ContainerBoundary::build(&cfg);
        let mut p = Particle::spawn(cfg.spawn_origin(), &cfg, &mut rng());
        // Just past the right neck wall, moving outward.
        p.position = vec2(412.0, 310.0);
        p.velocity = vec2(1.0, 0.0);
        p.constrain_to_glass(&boundary, &cfg);
        let hw = boundary.half_width_at(310.0).unwrap();
        assert!((p.position.x - (400.0 + hw)).abs() < 1e-4);
        assert!((p.velocity.x - cfg.wall_damping).abs() < 1e-6);

        // Mirrored on the left wall.
        p.position = vec2(388.0, 310.0);
        p.velocity = vec2(-1.0, 0.0);
        p.constrain_to_glass(&boundary, &cfg);
        assert!((p.position.x - (400.0 - hw)).abs() < 1e-4);
        assert!(p.velocity.x > 0.0);
    }

    #[test]
    fn no_constraint_outside_table_range() {
        let cfg = SimConfig::default();
        let boundary = ContainerBoundary::build(&cfg);
        let mut p = Particle::spawn(cfg.spawn_origin(), &cfg, &mut rng());
        p.position = vec2(4000.0, 10.0);
        p.velocity = vec2(1.0, 0.0);
        p.constrain_to_glass(&boundary, &cfg);
        assert_eq!(p.position.x, 4000.0);
        assert_eq!(p.velocity.x, 1.0);
    }

    #[test]
    fn flat_floor_contact_settles() {
        let cfg = SimConfig::default();
        let mut pile = PileHeightField::new(&cfg);
        let mut rng = rng();
        let mut p = Particle::spawn(cfg.spawn_origin(), &cfg, &mut rng);
        p.position = vec2(400.0, 549.5);
        let outcome = p.contact_pile(&mut pile, &cfg, &mut rng);
        assert_eq!(outcome, PileContact::Settled);
        assert!(p.settled);
        assert_eq!(p.position.y, 550.0);
        assert_eq!(p.velocity, Vec2::ZERO);
        assert_eq!(p.acceleration, Vec2::ZERO);
        assert!(pile.height_at(400) < 550.0);
    }

    #[test]
    fn contact_far_above_surface_is_airborne() {
        let cfg = SimConfig::default();
        let mut pile = PileHeightField::new(&cfg);
        let mut rng = rng();
        let mut p = Particle::spawn(cfg.spawn_origin(), &cfg, &mut rng);
        p.position = vec2(400.0, 400.0);
        assert_eq!(
            p.contact_pile(&mut pile, &cfg, &mut rng),
            PileContact::Airborne
        );
        assert!(!p.settled);
    }

    #[test]
    fn contact_over_bottomless_column_escapes() {
        let cfg = SimConfig::default();
        let mut pile = PileHeightField::new(&cfg);
        let mut rng = rng();
        let mut p = Particle::spawn(cfg.spawn_origin(), &cfg, &mut rng);
        p.position = vec2(10.0, 590.0);
        assert_eq!(
            p.contact_pile(&mut pile, &cfg, &mut rng),
            PileContact::Escaped
        );
        p.position = vec2(-500.0, 590.0);
        assert_eq!(
            p.contact_pile(&mut pile, &cfg, &mut rng),
            PileContact::Escaped
        );
    }

    #[test]
    fn slope_contact_slides_toward_the_lower_side() {
        let cfg = SimConfig::default();
        let mut pile = PileHeightField::new(&cfg);
        let mut rng = rng();
        // Raise a shelf so the column at 400 towers over its right
        // neighbor but not its left.
        for _ in 0..10 {
            pile.settle(399, 1.0, 0);
            pile.settle(400, 1.0, 0);
        }
        let mut p = Particle::spawn(cfg.spawn_origin(), &cfg, &mut rng);
        p.position = vec2(400.2, pile.height_at(400));
        p.velocity = vec2(0.0, 1.0);
        let outcome = p.contact_pile(&mut pile, &cfg, &mut rng);
        assert_eq!(outcome, PileContact::Sliding);
        assert!(!p.settled);
        // Nudged right, then surface friction halves the result.
        assert!((p.velocity.x - SLIDE_NUDGE * cfg.ground_friction).abs() < 1e-6);
    }
}
