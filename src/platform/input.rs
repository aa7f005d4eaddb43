//! Pointer tracking
//!
//! Last-write-wins: host events overwrite the position, the render loop
//! reads it once at the top of each frame.

use glam::Vec2;

use crate::consts::POINTER_SENTINEL;

#[derive(Debug, Clone, Copy)]
pub struct PointerTracker {
    position: Vec2,
}

impl Default for PointerTracker {
    fn default() -> Self {
        Self {
            position: POINTER_SENTINEL,
        }
    }
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pointer moved to (x, y) in canvas coordinates
    pub fn moved(&mut self, x: f32, y: f32) {
        self.position = Vec2::new(x, y);
    }

    /// Pointer left the page
    pub fn left(&mut self) {
        self.position = POINTER_SENTINEL;
    }

    /// Current position, or the sentinel when absent
    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn is_present(&self) -> bool {
        self.position != POINTER_SENTINEL
    }
}
