//! Symmetry/mirror transforms about the canvas centre
//!
//! Pure geometry on already-resolved surface coordinates; these functions
//! never consult the viewport pan/zoom state.

use serde::{Deserialize, Serialize};

use crate::geom::Point;

/// Symmetry configuration for the drawing modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymmetryConfig {
    /// Number of rotational replicas (including the original), >= 1
    pub fold_count: u32,
    /// Four-way axis mirroring
    pub axis_mirror: bool,
    /// Horizontally mirror odd-indexed folds (stamps only)
    pub kaleidoscope_mirror_alternate: bool,
}

impl Default for SymmetryConfig {
    fn default() -> Self {
        Self {
            fold_count: 8,
            axis_mirror: false,
            kaleidoscope_mirror_alternate: false,
        }
    }
}

/// Rotate a point about a centre by `angle` radians.
pub fn rotate_about(p: Point, center: Point, angle: f32) -> Point {
    let (sin, cos) = angle.sin_cos();
    let dx = p.x - center.x;
    let dy = p.y - center.y;
    Point {
        x: center.x + dx * cos - dy * sin,
        y: center.y + dx * sin + dy * cos,
    }
}

/// Rotational replicas of a point for fold indices `1..fold_count`.
///
/// The original (index 0) is not included; for `fold_count = 8` this
/// yields exactly 7 points spaced 45 degrees apart.
pub fn rotational_point_replicas(p: Point, center: Point, fold_count: u32) -> Vec<Point> {
    let segment_angle = std::f32::consts::TAU / fold_count.max(1) as f32;
    (1..fold_count)
        .map(|i| rotate_about(p, center, i as f32 * segment_angle))
        .collect()
}

/// Rotational replicas of a segment for fold indices `1..fold_count`.
pub fn rotational_replicas(
    from: Point,
    to: Point,
    center: Point,
    fold_count: u32,
) -> Vec<(Point, Point)> {
    let segment_angle = std::f32::consts::TAU / fold_count.max(1) as f32;
    (1..fold_count)
        .map(|i| {
            let angle = i as f32 * segment_angle;
            (
                rotate_about(from, center, angle),
                rotate_about(to, center, angle),
            )
        })
        .collect()
}

/// The four axis-mirror variants of a segment: original, horizontal flip,
/// vertical flip, and both.
pub fn axis_mirrors(from: Point, to: Point, width: f32, height: f32) -> [(Point, Point); 4] {
    let flip_h = |p: Point| Point::new(width - p.x, p.y);
    let flip_v = |p: Point| Point::new(p.x, height - p.y);
    [
        (from, to),
        (flip_h(from), flip_h(to)),
        (flip_v(from), flip_v(to)),
        (flip_v(flip_h(from)), flip_v(flip_h(to))),
    ]
}
