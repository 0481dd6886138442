//! Sand in an hourglass.
//!
//! Grains spawn under the rim of the upper bulb, fall under gravity
//! through the neck, get pulled and shoved by a pair of attractors and
//! a movable repeller, and pile up on the floor of the lower bulb under
//! a simple angle-of-repose rule.
//!
//! The crate is the simulation core only. Rendering and input live in
//! the shell binary, which owns a [`system::Simulation`], feeds it one
//! [`system::PointerInput`] per frame, and draws whatever state it
//! exposes.

pub mod boundary;
pub mod config;
pub mod field;
pub mod math;
pub mod particle;
pub mod pile;
pub mod system;

pub use boundary::{ContainerBoundary, GlassOutline};
pub use config::SimConfig;
pub use field::Field;
pub use math::{Color, Vec2, vec2};
pub use particle::{Particle, PileContact};
pub use pile::PileHeightField;
pub use system::{ParticleSystem, PointerInput, Simulation};
