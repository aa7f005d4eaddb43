//! Rendering module
//!
//! Draw routines talk to a `Surface`, a minimal immediate-mode 2D API that
//! maps one-to-one onto a canvas 2D context. The browser implementation is
//! `CanvasSurface`; `RecordingSurface` captures calls for headless runs.

pub mod draw;
pub mod recording;

#[cfg(target_arch = "wasm32")]
pub mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;
pub use draw::{draw_particles, mesh_segments};
pub use recording::{DrawCall, RecordingSurface};

use glam::Vec2;

/// Straight-alpha RGBA color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// 0.0 - 1.0
    pub a: f32,
}

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 1.0)
    }

    /// CSS color string for canvas fill/stroke styles
    pub fn to_css(&self) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

/// Canvas compositing operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Composite {
    /// Standard paint-over
    #[default]
    SourceOver,
    /// Additive blending
    Lighter,
}

impl Composite {
    /// Canvas `globalCompositeOperation` name
    pub fn as_str(&self) -> &'static str {
        match self {
            Composite::SourceOver => "source-over",
            Composite::Lighter => "lighter",
        }
    }
}

/// A line segment between two points
pub type Segment = (Vec2, Vec2);

/// Immediate-mode 2D drawing target
pub trait Surface {
    /// Surface dimensions in pixels
    fn size(&self) -> Vec2;
    /// Erase everything to transparent
    fn clear(&mut self);
    /// Paint a full-surface rectangle over the previous contents
    fn fill_overlay(&mut self, color: Color);
    fn set_composite(&mut self, op: Composite);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);
    /// Stroke all segments as one path
    fn stroke_segments(&mut self, segments: &[Segment], width: f32, color: Color);
}
