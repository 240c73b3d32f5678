//! Surface-pixel geometry shared by the brush, symmetry and stamp modules

use serde::{Deserialize, Serialize};

/// A point in surface-pixel coordinates.
///
/// Screen-to-surface scaling is applied at input time by the canvas
/// manager; everything below it works in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: Point) -> f32 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Linear interpolation toward another point
    pub fn lerp(&self, other: Point, t: f32) -> Point {
        Point {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }
}
