//! Stamp placement, transform stack and the pop-in animation

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{CompiledStamp, Subpath};
use crate::color::Rgb;
use crate::geom::Point;
use crate::surface::Surface;
use crate::symmetry::{rotate_about, SymmetryConfig};

/// Centre of the 0-100 local stamp space.
const LOCAL_CENTER: f32 = 50.0;

/// Segments used to stroke a circle outline.
const CIRCLE_SEGMENTS: usize = 48;

/// Placement animation length.
const DURATION_MS: f32 = 200.0;

/// User-facing stamp parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StampSettings {
    /// Stamp span as a percentage of the 100-unit local space
    pub size_pct: f32,
    /// Base rotation in degrees
    pub rotation_deg: f32,
    /// Fill closed shapes instead of stroking outlines
    pub fill: bool,
    /// Horizontal mirror in local space
    pub mirror: bool,
}

impl Default for StampSettings {
    fn default() -> Self {
        Self {
            size_pct: 90.0,
            rotation_deg: 0.0,
            fill: false,
            mirror: false,
        }
    }
}

/// One resolved copy of a stamp on the surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub at: Point,
    pub angle: f32,
    pub mirror: bool,
}

/// Resolve where a stamp lands: a single placement in free drawing, or one
/// per fold when symmetry is active. With alternate-mirroring enabled,
/// odd-indexed folds flip horizontally relative to the base mirror flag.
pub fn placements_for(
    at: Point,
    center: Point,
    settings: &StampSettings,
    symmetry: Option<&SymmetryConfig>,
) -> Vec<Placement> {
    let base_angle = settings.rotation_deg.to_radians();
    let fold_count = symmetry.map_or(1, |s| s.fold_count.max(1));
    if fold_count <= 1 {
        return vec![Placement {
            at,
            angle: base_angle,
            mirror: settings.mirror,
        }];
    }

    let alternate = symmetry.is_some_and(|s| s.kaleidoscope_mirror_alternate);
    let segment_angle = std::f32::consts::TAU / fold_count as f32;
    (0..fold_count)
        .map(|i| {
            let angle = i as f32 * segment_angle;
            Placement {
                at: rotate_about(at, center, angle),
                angle: base_angle + angle,
                mirror: settings.mirror ^ (alternate && i % 2 == 1),
            }
        })
        .collect()
}

/// Draw one placement of a compiled stamp.
///
/// Local coordinates map through recentre -> mirror -> rotate -> translate,
/// with uniform scale `s = (size_pct / 100) * anim_scale`. Draw order is
/// circles, then lines, then paths.
#[allow(clippy::too_many_arguments)]
pub fn draw_stamp(
    surface: &mut Surface,
    stamp: &CompiledStamp,
    placement: Placement,
    settings: &StampSettings,
    rgb: Rgb,
    alpha: f32,
    brush_size: f32,
    anim_scale: f32,
) {
    let s = (settings.size_pct / 100.0).max(0.0) * anim_scale;
    if s <= 0.0 || alpha <= 0.0 {
        return;
    }
    let stroke = (brush_size / 4.0).max(1.0) * s;
    let (sin, cos) = placement.angle.sin_cos();

    let map = |p: Point| -> Point {
        let mut vx = (p.x - LOCAL_CENTER) * s;
        let vy = (p.y - LOCAL_CENTER) * s;
        if placement.mirror {
            vx = -vx;
        }
        Point {
            x: placement.at.x + vx * cos - vy * sin,
            y: placement.at.y + vx * sin + vy * cos,
        }
    };

    for c in &stamp.circles {
        let center = map(Point::new(c.x, c.y));
        let radius = c.r * s;
        if settings.fill {
            surface.fill_disc(center.x, center.y, radius, rgb, alpha);
        } else {
            let ring: Vec<Point> = (0..CIRCLE_SEGMENTS)
                .map(|i| {
                    let a = i as f32 / CIRCLE_SEGMENTS as f32 * std::f32::consts::TAU;
                    Point {
                        x: center.x + radius * a.cos(),
                        y: center.y + radius * a.sin(),
                    }
                })
                .collect();
            surface.stroke_polyline(&ring, true, stroke, rgb, alpha);
        }
    }

    for l in &stamp.lines {
        surface.stroke_line(
            map(Point::new(l.x1, l.y1)),
            map(Point::new(l.x2, l.y2)),
            stroke,
            rgb,
            alpha,
        );
    }

    for path in &stamp.paths {
        if settings.fill {
            let closed: Vec<Vec<Point>> = path
                .subpaths
                .iter()
                .filter(|sub| sub.closed)
                .map(|sub| sub.points.iter().map(|&p| map(p)).collect())
                .collect();
            if !closed.is_empty() {
                surface.fill_polygon(&closed, rgb, alpha);
            }
            // Open detail strokes still render in fill mode
            for sub in path.subpaths.iter().filter(|sub| !sub.closed) {
                stroke_subpath(surface, sub, &map, stroke, rgb, alpha);
            }
        } else {
            for sub in &path.subpaths {
                stroke_subpath(surface, sub, &map, stroke, rgb, alpha);
            }
        }
    }
}

fn stroke_subpath<F: Fn(Point) -> Point>(
    surface: &mut Surface,
    sub: &Subpath,
    map: &F,
    stroke: f32,
    rgb: Rgb,
    alpha: f32,
) {
    let points: Vec<Point> = sub.points.iter().map(|&p| map(p)).collect();
    surface.stroke_polyline(&points, sub.closed, stroke, rgb, alpha);
}

/// In-flight placement animation: a 200 ms ease-out pop from 92% scale and
/// 85% opacity to full size. Every frame restores the snapshot captured at
/// placement time and redraws all placements, so partial frames never
/// accumulate on the surface.
#[derive(Debug, Clone)]
pub struct StampAnimation {
    base: Surface,
    stamp: Arc<CompiledStamp>,
    placements: Vec<Placement>,
    settings: StampSettings,
    rgb: Rgb,
    alpha: f32,
    brush_size: f32,
    elapsed_ms: f32,
    done: bool,
}

impl StampAnimation {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        base: Surface,
        stamp: Arc<CompiledStamp>,
        placements: Vec<Placement>,
        settings: StampSettings,
        rgb: Rgb,
        alpha: f32,
        brush_size: f32,
    ) -> Self {
        Self {
            base,
            stamp,
            placements,
            settings,
            rgb,
            alpha,
            brush_size,
            elapsed_ms: 0.0,
            done: false,
        }
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Advance by `dt_ms` and render the current frame. Returns `true` once
    /// the final full-scale frame has been drawn.
    pub fn advance(&mut self, surface: &mut Surface, dt_ms: f32) -> bool {
        if self.done {
            return true;
        }
        self.elapsed_ms += dt_ms.max(0.0);
        let t = (self.elapsed_ms / DURATION_MS).clamp(0.0, 1.0);
        let eased = ease_out_cubic(t);
        let scale = 0.92 + 0.08 * eased;
        let alpha = self.alpha * (0.85 + 0.15 * eased);

        surface.copy_from(&self.base);
        for &placement in &self.placements {
            draw_stamp(
                surface,
                &self.stamp,
                placement,
                &self.settings,
                self.rgb,
                alpha,
                self.brush_size,
                scale,
            );
        }

        if t >= 1.0 {
            self.done = true;
        }
        self.done
    }
}

fn ease_out_cubic(t: f32) -> f32 {
    let u = 1.0 - t;
    1.0 - u * u * u
}
