//! Undo history - bounded stack of PNG-encoded surface snapshots

use std::collections::VecDeque;

use crate::error::DoodleError;
use crate::surface::Surface;

/// Maximum retained snapshots. The oldest entry is evicted first.
const MAX_UNDO: usize = 20;

/// Bounded snapshot stack. The bottom entry is the baseline (usually the
/// blank canvas or a freshly loaded drawing); undo never pops past it, so
/// the stack is never empty once seeded.
#[derive(Debug, Default)]
pub struct HistoryStack {
    snapshots: VecDeque<Vec<u8>>,
    /// Bumped on every restore-relevant mutation; stale async restores
    /// carry an older generation and are rejected.
    generation: u64,
}

impl HistoryStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Push a snapshot of the surface, evicting the oldest entry at
    /// capacity. Encoding failure keeps the stack unchanged.
    pub fn push(&mut self, surface: &Surface) {
        let png = match surface.to_png() {
            Ok(png) => png,
            Err(e) => {
                tracing::warn!("snapshot skipped, encode failed: {e}");
                return;
            }
        };
        if self.snapshots.len() >= MAX_UNDO {
            self.snapshots.pop_front();
        }
        self.snapshots.push_back(png);
        self.generation += 1;
        tracing::debug!(depth = self.snapshots.len(), "snapshot pushed");
    }

    /// Drop everything and seed a fresh baseline from the surface.
    pub fn clear_and_baseline(&mut self, surface: &Surface) {
        self.snapshots.clear();
        self.push(surface);
    }

    /// Pop the current state and decode the previous snapshot. At the
    /// baseline this is a no-op returning `None`; a decode failure leaves
    /// the stack intact so the next undo can retry.
    pub fn undo(&mut self) -> Option<Surface> {
        if self.snapshots.len() <= 1 {
            return None;
        }
        let top_idx = self.snapshots.len() - 2;
        let restored = match Surface::from_png(&self.snapshots[top_idx]) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!("undo failed, snapshot did not decode: {e}");
                return None;
            }
        };
        self.snapshots.pop_back();
        self.generation += 1;
        Some(restored)
    }

    /// Decode the current top without popping.
    pub fn current(&self) -> Result<Option<Surface>, DoodleError> {
        match self.snapshots.back() {
            Some(png) => Ok(Some(Surface::from_png(png)?)),
            None => Ok(None),
        }
    }

    /// Whether a restore started at `generation` may still be applied.
    /// Anything pushed or undone since then makes the restore stale.
    pub fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::color::Rgb;

    fn marked_surface(v: u8) -> Surface {
        let mut s = Surface::new(8, 8);
        s.blend_pixel(0, 0, Rgb::new(v, 0, 0), 1.0);
        s
    }

    #[test]
    fn test_undo_restores_previous_snapshot() {
        let mut h = HistoryStack::new();
        h.clear_and_baseline(&Surface::new(8, 8));
        h.push(&marked_surface(10));
        h.push(&marked_surface(20));

        let restored = h.undo().unwrap();
        assert_eq!(restored.pixel(0, 0), [10, 0, 0, 255]);
        assert_eq!(h.len(), 2);
    }

    #[test]
    fn test_undo_stops_at_baseline() {
        let mut h = HistoryStack::new();
        h.clear_and_baseline(&Surface::new(8, 8));
        assert!(h.undo().is_none());
        assert_eq!(h.len(), 1);
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut h = HistoryStack::new();
        h.clear_and_baseline(&Surface::new(8, 8));
        for i in 0..25 {
            h.push(&marked_surface(i as u8 + 1));
        }
        assert_eq!(h.len(), MAX_UNDO);

        // Unwind fully: the bottom entry is now snapshot 6, not the blank
        // baseline, because older entries were evicted
        while h.undo().is_some() {}
        let bottom = h.current().unwrap().unwrap();
        assert_eq!(bottom.pixel(0, 0), [7, 0, 0, 255]);
    }

    #[test]
    fn test_generation_tracks_mutations() {
        let mut h = HistoryStack::new();
        h.clear_and_baseline(&Surface::new(8, 8));
        let seen = h.generation();
        assert!(h.is_current(seen));

        h.push(&marked_surface(1));
        assert!(!h.is_current(seen));
        assert!(h.is_current(h.generation()));
    }

    #[test]
    fn test_clear_and_baseline_resets_depth() {
        let mut h = HistoryStack::new();
        h.clear_and_baseline(&Surface::new(8, 8));
        h.push(&marked_surface(1));
        h.push(&marked_surface(2));
        h.clear_and_baseline(&marked_surface(99));
        assert_eq!(h.len(), 1);
        assert!(h.undo().is_none());
        let current = h.current().unwrap().unwrap();
        assert_eq!(current.pixel(0, 0), [99, 0, 0, 255]);
    }
}
