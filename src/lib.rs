//! Lighting Lab - a pointer-reactive particle background
//!
//! Core modules:
//! - `sim`: Pure simulation (particles, obstacle collision, per-mode update rules)
//! - `renderer`: Drawing surface abstraction and the per-mode draw routines
//! - `platform`: Pointer/obstacle tracking and the browser host glue
//! - `engine`: The render loop driving simulate-then-draw once per frame
//! - `settings`: Data-driven configuration

pub mod engine;
pub mod error;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use engine::{Engine, LoopState};
pub use error::LabError;
pub use settings::{QualityPreset, Settings};
pub use sim::{Mode, ModeInfo, Rect};

/// Simulation and rendering constants
pub mod consts {
    use glam::Vec2;

    /// Pointer position used while no pointer is over the page.
    /// Far enough outside any canvas that repulsion is always zero.
    pub const POINTER_SENTINEL: Vec2 = Vec2::new(-1000.0, -1000.0);

    /// Initial velocity components are uniform in ±BASE_SPEED/2
    pub const BASE_SPEED: f32 = 1.0;
    /// Particle radius range [MIN, MIN + SPREAD)
    pub const PARTICLE_SIZE_MIN: f32 = 4.0;
    pub const PARTICLE_SIZE_SPREAD: f32 = 4.0;

    /// Push-out margin past an obstacle edge after a collision
    pub const PUSH_OUT_MARGIN: f32 = 1.0;

    /// Common rule (spectral, temporal, quantum)
    pub const REPULSION_RADIUS: f32 = 220.0;
    pub const REPULSION_FORCE: f32 = 0.8;
    /// Fraction of base velocity blended in per frame
    pub const RELAX_RATE: f32 = 0.03;

    /// Spatial rule
    pub const SPATIAL_REPULSION_RADIUS: f32 = 220.0;
    pub const SPATIAL_REPULSION_FORCE: f32 = 0.5;
    pub const SPATIAL_RELAX_RATE: f32 = 0.02;
    /// Obstacle edges further than this are ignored
    pub const CAPTURE_RADIUS: f32 = 100.0;
    /// Edges closer than this make the particle adhere
    pub const STICK_RADIUS: f32 = 60.0;
    pub const STICK_PULL: f32 = 0.05;
    pub const STICK_DAMPING: f32 = 0.8;

    /// Spectral channel offset along the velocity vector
    pub const SPECTRAL_LAG: f32 = 2.0;
    /// Quantum jitter is uniform in ±QUANTUM_JITTER/2 per axis
    pub const QUANTUM_JITTER: f32 = 4.0;
    pub const QUANTUM_DOT_RADIUS: f32 = 2.0;
    /// Temporal dots shrink by this much but never below the floor
    pub const TEMPORAL_SHRINK: f32 = 1.0;
    pub const TEMPORAL_MIN_RADIUS: f32 = 0.5;
    pub const SPATIAL_DOT_RADIUS: f32 = 4.0;
    pub const SPATIAL_SCAN_RADIUS: f32 = 6.0;
    /// Mesh connects pairs closer than 50px
    pub const MESH_DISTANCE_SQ: f32 = 2500.0;
    pub const MESH_LINE_WIDTH: f32 = 0.5;
}
