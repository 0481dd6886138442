//! Population orchestration and the top-level simulation context.

use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::boundary::ContainerBoundary;
use crate::config::SimConfig;
use crate::field::Field;
use crate::math::{Vec2, vec2};
use crate::particle::{Particle, PileContact};
use crate::pile::PileHeightField;

const ATTRACTOR_STRENGTH: f32 = 15.0;
const ATTRACTOR_OFFSET_X: f32 = 80.0;
const ATTRACTOR_RAISE: f32 = 100.0;

const REPELLER_STRENGTH: f32 = 30.0;
const REPELLER_RAISE: f32 = 150.0;
/// Idle drift of the repeller when the pointer is not steering it.
const IDLE_RATE: f32 = 0.02;
const IDLE_AMPLITUDE: f32 = 50.0;

/// The particle population. Append-only up to the cap; grains are never
/// removed, so the pile visibly accumulates over time.
pub struct ParticleSystem {
    /// Center of the rim the spawn band hangs under.
    origin: Vec2,
    particles: Vec<Particle>,
    cap: usize,
    cap_reached: bool,
}

impl ParticleSystem {
    pub fn new(origin: Vec2, cap: usize) -> ParticleSystem {
        ParticleSystem {
            origin,
            particles: Vec::with_capacity(cap),
            cap,
            cap_reached: false,
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Add up to `count` fresh grains, stopping hard at the cap.
    pub fn spawn(&mut self, count: usize, cfg: &SimConfig, rng: &mut impl Rng) {
        for _ in 0..count {
            if self.particles.len() >= self.cap {
                if !self.cap_reached {
                    info!("population cap reached ({})", self.cap);
                    self.cap_reached = true;
                }
                return;
            }
            self.particles.push(Particle::spawn(self.origin, cfg, rng));
        }
    }

    /// Gravity acts as a raw per-frame force, so lighter grains
    /// accelerate faster under it.
    pub fn apply_gravity(&mut self, gravity: Vec2) {
        for p in &mut self.particles {
            p.apply_force(gravity);
        }
    }

    /// Apply a field to every unsettled grain the predicate admits.
    pub fn apply_field(&mut self, field: &Field, active: impl Fn(&Particle) -> bool) {
        for p in &mut self.particles {
            if !p.settled && active(p) {
                let force = field.force_on(p.position, p.mass);
                p.apply_force(force);
            }
        }
    }

    /// Advance every grain one frame: integrate, then wall constraint,
    /// then pile contact for unsettled grains below the midline. The
    /// constraint must run after integration and before the pile check,
    /// or a wall bounce can be read as a landing in the same frame.
    pub fn step(
        &mut self,
        boundary: &ContainerBoundary,
        pile: &mut PileHeightField,
        cfg: &SimConfig,
        rng: &mut impl Rng,
    ) {
        let mid = cfg.mid_y();
        let origin = self.origin;
        for p in &mut self.particles {
            p.integrate(cfg);
            p.constrain_to_glass(boundary, cfg);
            if !p.settled
                && p.position.y > mid
                && p.contact_pile(pile, cfg, rng) == PileContact::Escaped
            {
                debug!("grain escaped at {:?}, respawning", p.position);
                p.respawn(origin, cfg, rng);
                continue;
            }
            if p.position.y > cfg.height + cfg.escape_margin {
                debug!("grain fell out at {:?}, respawning", p.position);
                p.respawn(origin, cfg, rng);
            }
        }
    }
}

/// Per-frame pointer sample handed in by the shell.
#[derive(Clone, Copy, Debug, Default)]
pub struct PointerInput {
    pub pressed: bool,
    pub position: Vec2,
}

/// Everything one simulation owns: the population plus the shared
/// structures it mutates or consults, the force fields, the RNG, and
/// the frame counter. There is deliberately no global state; the shell
/// holds one of these and ticks it.
pub struct Simulation {
    pub config: SimConfig,
    pub boundary: ContainerBoundary,
    pub pile: PileHeightField,
    pub attractors: Vec<Field>,
    pub repeller: Field,
    pub system: ParticleSystem,
    rng: StdRng,
    frame: u64,
}

impl Simulation {
    pub fn new(config: SimConfig) -> Simulation {
        Simulation::with_rng(config, StdRng::from_entropy())
    }

    /// Deterministic variant: the same seed reproduces exact
    /// trajectories.
    pub fn with_seed(config: SimConfig, seed: u64) -> Simulation {
        Simulation::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: SimConfig, rng: StdRng) -> Simulation {
        let cx = config.center_x();
        let h = config.height;
        let boundary = ContainerBoundary::build(&config);
        let pile = PileHeightField::new(&config);
        let attractors = vec![
            Field::attractor(vec2(cx - ATTRACTOR_OFFSET_X, h - ATTRACTOR_RAISE), ATTRACTOR_STRENGTH),
            Field::attractor(vec2(cx + ATTRACTOR_OFFSET_X, h - ATTRACTOR_RAISE), ATTRACTOR_STRENGTH),
        ];
        let repeller = Field::repeller(vec2(cx, h - REPELLER_RAISE), REPELLER_STRENGTH);
        let system = ParticleSystem::new(config.spawn_origin(), config.particle_cap);
        info!(
            "simulation ready: {}x{} canvas, cap {}",
            config.width, config.height, config.particle_cap
        );
        Simulation {
            config,
            boundary,
            pile,
            attractors,
            repeller,
            system,
            rng,
            frame: 0,
        }
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// While the pointer is pressed in the bottom half it steers the
    /// repeller; otherwise the repeller drifts on a sine around its
    /// anchor.
    fn update_repeller(&mut self, pointer: PointerInput) {
        let cfg = &self.config;
        if pointer.pressed && pointer.position.y > cfg.mid_y() {
            self.repeller.position = pointer.position;
        } else {
            self.repeller.position = vec2(
                cfg.center_x() + (self.frame as f32 * IDLE_RATE).sin() * IDLE_AMPLITUDE,
                cfg.height - REPELLER_RAISE,
            );
        }
    }

    /// One animation frame: reposition the repeller, spawn, accumulate
    /// forces on the whole population, then advance it.
    pub fn step(&mut self, pointer: PointerInput) {
        self.update_repeller(pointer);
        self.system
            .spawn(self.config.spawn_per_frame, &self.config, &mut self.rng);

        self.system.apply_gravity(self.config.gravity);
        let mid = self.config.mid_y();
        let in_lower_bulb = |p: &Particle| p.position.y > mid;
        self.system.apply_field(&self.repeller, in_lower_bulb);
        for attractor in &self.attractors {
            self.system.apply_field(attractor, in_lower_bulb);
        }

        self.system
            .step(&self.boundary, &mut self.pile, &self.config, &mut self.rng);
        self.frame += 1;
    }
}
