//! Particle simulation module
//!
//! All physics lives here. This module must stay pure:
//! - One step per frame, no wall-clock time
//! - Randomness only through a caller-supplied RNG
//! - No rendering or platform dependencies

pub mod collision;
pub mod mode;
pub mod state;
pub mod tick;

pub use collision::{
    Edge, Rect, nearest_surface_point, repulsion_impulse, resolve_obstacle, resolve_obstacles,
    wrap_position,
};
pub use mode::{Mode, ModeInfo, mode_catalog, mode_catalog_json};
pub use state::{Particle, ParticleField};
pub use tick::{
    StepContext, UpdateRule, update_field, update_quantum, update_spatial, update_spectral,
    update_temporal,
};
