//! Headless surface that records draw calls
//!
//! Used by the native driver and by tests to inspect what a frame drew
//! without a browser.

use glam::Vec2;

use super::{Color, Composite, Segment, Surface};

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Clear,
    Overlay(Color),
    Composite(Composite),
    Circle {
        center: Vec2,
        radius: f32,
        color: Color,
    },
    Segments {
        segments: Vec<Segment>,
        width: f32,
        color: Color,
    },
}

#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    size: Vec2,
    composite: Composite,
    calls: Vec<DrawCall>,
}

impl RecordingSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Vec2::new(width, height),
            composite: Composite::SourceOver,
            calls: Vec::new(),
        }
    }

    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    /// Forget recorded calls (keeps size and composite state)
    pub fn reset(&mut self) {
        self.calls.clear();
    }

    /// Composite op currently in effect
    pub fn composite(&self) -> Composite {
        self.composite
    }

    /// Every circle drawn, in order
    pub fn circles(&self) -> Vec<(Vec2, f32, Color)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                DrawCall::Circle {
                    center,
                    radius,
                    color,
                } => Some((*center, *radius, *color)),
                _ => None,
            })
            .collect()
    }

    /// Total segments across all stroke calls
    pub fn segment_count(&self) -> usize {
        self.calls
            .iter()
            .map(|call| match call {
                DrawCall::Segments { segments, .. } => segments.len(),
                _ => 0,
            })
            .sum()
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn clear(&mut self) {
        self.calls.push(DrawCall::Clear);
    }

    fn fill_overlay(&mut self, color: Color) {
        self.calls.push(DrawCall::Overlay(color));
    }

    fn set_composite(&mut self, op: Composite) {
        self.composite = op;
        self.calls.push(DrawCall::Composite(op));
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.calls.push(DrawCall::Circle {
            center,
            radius,
            color,
        });
    }

    fn stroke_segments(&mut self, segments: &[Segment], width: f32, color: Color) {
        self.calls.push(DrawCall::Segments {
            segments: segments.to_vec(),
            width,
            color,
        });
    }
}
