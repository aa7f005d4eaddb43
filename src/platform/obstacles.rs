//! Obstacle tracking
//!
//! Holds the latest snapshot of obstacle rectangles. The host decides when
//! layout changed and hands over a complete new list; the stored list is
//! swapped wholesale so a frame never sees a half-updated snapshot.

use crate::sim::Rect;

#[derive(Debug, Clone, Default)]
pub struct ObstacleTracker {
    rects: Vec<Rect>,
    /// Number of snapshots taken so far
    generation: u64,
}

impl ObstacleTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stored list with a fresh snapshot
    ///
    /// Degenerate rects (right < left or bottom < top) are dropped. An empty
    /// list is a valid state.
    pub fn refresh(&mut self, rects: impl IntoIterator<Item = Rect>) -> &[Rect] {
        self.rects = rects
            .into_iter()
            .filter(|r| r.right >= r.left && r.bottom >= r.top)
            .collect();
        self.generation += 1;
        log::debug!(
            "Obstacles refreshed: {} rects (snapshot {})",
            self.rects.len(),
            self.generation
        );
        &self.rects
    }

    pub fn rects(&self) -> &[Rect] {
        &self.rects
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}
