//! Platform abstraction layer
//!
//! Host-facing state the render loop reads passively:
//! - Pointer position (last write wins)
//! - Obstacle rectangles (swapped wholesale)
//! - Which canvases already have a running loop
//!
//! On wasm32 the `web` module wires both to browser events.

pub mod claims;
pub mod input;
pub mod obstacles;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use claims::CanvasClaim;
pub use input::PointerTracker;
pub use obstacles::ObstacleTracker;
