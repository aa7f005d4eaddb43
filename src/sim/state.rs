//! Particle and field state
//!
//! The field is created whole and discarded whole: on load, after the
//! layout settles, and on every resize. There is no incremental rescale.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// A single simulated point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Nominal drift velocity, fixed at creation
    pub base_vel: Vec2,
    /// Render and collision radius (always > 0)
    pub size: f32,
    /// Adhered to a nearby obstacle edge (spatial mode only)
    pub scanning: bool,
}

impl Particle {
    /// Particle at rest-drift: current velocity equals base velocity
    pub fn new(pos: Vec2, vel: Vec2, size: f32) -> Self {
        debug_assert!(size > 0.0, "particle radius must be positive");
        Self {
            pos,
            vel,
            base_vel: vel,
            size,
            scanning: false,
        }
    }

    /// Uniform-random position inside `bounds`, small random drift
    pub fn random(rng: &mut impl Rng, bounds: Vec2) -> Self {
        let pos = Vec2::new(
            rng.random::<f32>() * bounds.x,
            rng.random::<f32>() * bounds.y,
        );
        let vel = Vec2::new(
            (rng.random::<f32>() - 0.5) * BASE_SPEED,
            (rng.random::<f32>() - 0.5) * BASE_SPEED,
        );
        let size = PARTICLE_SIZE_MIN + rng.random::<f32>() * PARTICLE_SIZE_SPREAD;
        let mut particle = Self::new(pos, vel, size);
        // random() * extent can round up to extent
        particle.pos = super::collision::wrap_position(particle.pos, bounds);
        particle
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }
}

/// The full particle collection and the canvas it lives on
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticleField {
    particles: Vec<Particle>,
    bounds: Vec2,
}

impl ParticleField {
    /// Create and populate a field
    pub fn new(rng: &mut impl Rng, width: f32, height: f32, count: usize) -> Self {
        let mut field = Self {
            particles: Vec::new(),
            bounds: Vec2::ZERO,
        };
        field.initialize(rng, width, height, count);
        field
    }

    /// Build a field from explicit particles (tests, replays)
    pub fn from_particles(particles: Vec<Particle>, width: f32, height: f32) -> Self {
        Self {
            particles,
            bounds: Vec2::new(width, height),
        }
    }

    /// Discard every particle and reseed `count` new ones
    pub fn initialize(&mut self, rng: &mut impl Rng, width: f32, height: f32, count: usize) {
        self.bounds = Vec2::new(width.max(0.0), height.max(0.0));
        self.particles.clear();
        self.particles.reserve(count);
        for _ in 0..count {
            self.particles.push(Particle::random(rng, self.bounds));
        }
    }

    /// Full re-initialize at the new size; prior state is not preserved
    pub fn on_resize(&mut self, rng: &mut impl Rng, width: f32, height: f32) {
        let count = self.particles.len();
        self.initialize(rng, width, height, count);
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub(crate) fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Canvas dimensions (width, height)
    pub fn bounds(&self) -> Vec2 {
        self.bounds
    }

    /// Number of particles currently adhered to an obstacle edge
    pub fn scanning_count(&self) -> usize {
        self.particles.iter().filter(|p| p.scanning).count()
    }
}
