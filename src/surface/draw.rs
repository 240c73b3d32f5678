//! Drawing primitives over the raster surface
//!
//! Everything the brush renderers and the stamp engine need: filled and
//! rotated rects, discs, radial-gradient discs, round-capped line strokes
//! (capsule coverage) and even-odd polygon fill. Edges get a one-pixel
//! linear falloff.

use super::Surface;
use crate::color::Rgb;
use crate::geom::Point;

/// Radial gradient stops as `(position, alpha)` pairs, position 0 at the
/// centre and 1 at the rim, sorted ascending.
pub type GradientStops<'a> = &'a [(f32, f32)];

impl Surface {
    /// Fill an axis-aligned rectangle given its top-left corner.
    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, rgb: Rgb, alpha: f32) {
        if w <= 0.0 || h <= 0.0 {
            return;
        }
        let x0 = x.floor() as i32;
        let y0 = y.floor() as i32;
        let x1 = (x + w).ceil() as i32;
        let y1 = (y + h).ceil() as i32;

        for py in y0..y1 {
            for px in x0..x1 {
                // Coverage of the pixel cell by the rect, per axis
                let cx = overlap(px as f32, x, x + w);
                let cy = overlap(py as f32, y, y + h);
                let cov = cx * cy;
                if cov > 0.0 {
                    self.blend_pixel(px, py, rgb, alpha * cov);
                }
            }
        }
    }

    /// Fill a disc with a soft one-pixel edge.
    pub fn fill_disc(&mut self, cx: f32, cy: f32, radius: f32, rgb: Rgb, alpha: f32) {
        if radius <= 0.0 {
            return;
        }
        let x0 = (cx - radius - 1.0).floor() as i32;
        let y0 = (cy - radius - 1.0).floor() as i32;
        let x1 = (cx + radius + 1.0).ceil() as i32;
        let y1 = (cy + radius + 1.0).ceil() as i32;

        for py in y0..y1 {
            for px in x0..x1 {
                let dist = (px as f32 + 0.5 - cx).hypot(py as f32 + 0.5 - cy);
                let cov = (radius - dist + 0.5).clamp(0.0, 1.0);
                if cov > 0.0 {
                    self.blend_pixel(px, py, rgb, alpha * cov);
                }
            }
        }
    }

    /// Fill a disc whose alpha follows a radial gradient.
    pub fn gradient_disc(&mut self, cx: f32, cy: f32, radius: f32, rgb: Rgb, stops: GradientStops) {
        if radius <= 0.0 || stops.is_empty() {
            return;
        }
        let x0 = (cx - radius - 1.0).floor() as i32;
        let y0 = (cy - radius - 1.0).floor() as i32;
        let x1 = (cx + radius + 1.0).ceil() as i32;
        let y1 = (cy + radius + 1.0).ceil() as i32;

        for py in y0..y1 {
            for px in x0..x1 {
                let dist = (px as f32 + 0.5 - cx).hypot(py as f32 + 0.5 - cy);
                if dist > radius {
                    continue;
                }
                let a = gradient_alpha(stops, dist / radius);
                if a > 0.0 {
                    self.blend_pixel(px, py, rgb, a);
                }
            }
        }
    }

    /// Fill a rectangle centred at (cx, cy) and rotated by `angle` radians.
    pub fn fill_rotated_rect(
        &mut self,
        cx: f32,
        cy: f32,
        w: f32,
        h: f32,
        angle: f32,
        rgb: Rgb,
        alpha: f32,
    ) {
        if w <= 0.0 || h <= 0.0 {
            return;
        }
        let extent = (w.hypot(h)) * 0.5 + 1.0;
        let x0 = (cx - extent).floor() as i32;
        let y0 = (cy - extent).floor() as i32;
        let x1 = (cx + extent).ceil() as i32;
        let y1 = (cy + extent).ceil() as i32;
        let (sin, cos) = angle.sin_cos();

        for py in y0..y1 {
            for px in x0..x1 {
                let dx = px as f32 + 0.5 - cx;
                let dy = py as f32 + 0.5 - cy;
                // Inverse-rotate into the rect's frame
                let u = dx * cos + dy * sin;
                let v = -dx * sin + dy * cos;
                let cov_u = (w * 0.5 - u.abs() + 0.5).clamp(0.0, 1.0);
                let cov_v = (h * 0.5 - v.abs() + 0.5).clamp(0.0, 1.0);
                let cov = cov_u * cov_v;
                if cov > 0.0 {
                    self.blend_pixel(px, py, rgb, alpha * cov);
                }
            }
        }
    }

    /// Stroke a round-capped line segment (capsule coverage).
    pub fn stroke_line(&mut self, from: Point, to: Point, width: f32, rgb: Rgb, alpha: f32) {
        self.capsule(from, to, width, |s, x, y, a| {
            s.blend_pixel(x, y, rgb, alpha * a)
        });
    }

    /// Destination-out clearing along a round-capped segment.
    pub fn erase_line(&mut self, from: Point, to: Point, width: f32) {
        self.capsule(from, to, width, |s, x, y, a| s.erase_pixel(x, y, a));
    }

    /// Stroke consecutive segments of a polyline, optionally closed.
    pub fn stroke_polyline(
        &mut self,
        points: &[Point],
        closed: bool,
        width: f32,
        rgb: Rgb,
        alpha: f32,
    ) {
        if points.len() < 2 {
            return;
        }
        for pair in points.windows(2) {
            self.stroke_line(pair[0], pair[1], width, rgb, alpha);
        }
        if closed {
            if let (Some(&first), Some(&last)) = (points.first(), points.last()) {
                if first != last {
                    self.stroke_line(last, first, width, rgb, alpha);
                }
            }
        }
    }

    /// Even-odd scanline fill of one or more closed subpaths.
    pub fn fill_polygon(&mut self, subpaths: &[Vec<Point>], rgb: Rgb, alpha: f32) {
        let mut edges: Vec<(Point, Point)> = Vec::new();
        let mut min_y = f32::MAX;
        let mut max_y = f32::MIN;

        for sub in subpaths {
            if sub.len() < 3 {
                continue;
            }
            for i in 0..sub.len() {
                let a = sub[i];
                let b = sub[(i + 1) % sub.len()];
                if (a.y - b.y).abs() > f32::EPSILON {
                    edges.push((a, b));
                }
                min_y = min_y.min(a.y);
                max_y = max_y.max(a.y);
            }
        }
        if edges.is_empty() {
            return;
        }

        let y0 = (min_y.floor() as i32).max(0);
        let y1 = (max_y.ceil() as i32).min(self.height() as i32);
        let mut crossings: Vec<f32> = Vec::with_capacity(edges.len());

        for py in y0..y1 {
            let sy = py as f32 + 0.5;
            crossings.clear();
            for &(a, b) in &edges {
                let (lo, hi) = if a.y < b.y { (a, b) } else { (b, a) };
                if sy >= lo.y && sy < hi.y {
                    let t = (sy - lo.y) / (hi.y - lo.y);
                    crossings.push(lo.x + (hi.x - lo.x) * t);
                }
            }
            crossings.sort_by(|p, q| p.partial_cmp(q).unwrap_or(std::cmp::Ordering::Equal));
            for pair in crossings.chunks_exact(2) {
                let x0 = pair[0].round() as i32;
                let x1 = pair[1].round() as i32;
                for px in x0..x1 {
                    self.blend_pixel(px, py, rgb, alpha);
                }
            }
        }
    }

    /// Visit every pixel of a capsule around the segment with its coverage.
    fn capsule<F: FnMut(&mut Surface, i32, i32, f32)>(
        &mut self,
        from: Point,
        to: Point,
        width: f32,
        mut visit: F,
    ) {
        let half = (width * 0.5).max(0.0);
        if half <= 0.0 {
            return;
        }
        let x0 = (from.x.min(to.x) - half - 1.0).floor() as i32;
        let y0 = (from.y.min(to.y) - half - 1.0).floor() as i32;
        let x1 = (from.x.max(to.x) + half + 1.0).ceil() as i32;
        let y1 = (from.y.max(to.y) + half + 1.0).ceil() as i32;

        let dx = to.x - from.x;
        let dy = to.y - from.y;
        let len_sq = dx * dx + dy * dy;

        for py in y0..y1 {
            for px in x0..x1 {
                let qx = px as f32 + 0.5;
                let qy = py as f32 + 0.5;
                let t = if len_sq > 0.0 {
                    (((qx - from.x) * dx + (qy - from.y) * dy) / len_sq).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let cx = from.x + dx * t;
                let cy = from.y + dy * t;
                let dist = (qx - cx).hypot(qy - cy);
                let cov = (half - dist + 0.5).clamp(0.0, 1.0);
                if cov > 0.0 {
                    visit(self, px, py, cov);
                }
            }
        }
    }
}

/// Coverage of the unit pixel cell starting at `px` by the span [lo, hi].
fn overlap(px: f32, lo: f32, hi: f32) -> f32 {
    (hi.min(px + 1.0) - lo.max(px)).clamp(0.0, 1.0)
}

/// Interpolate an alpha value from sorted gradient stops at position t.
fn gradient_alpha(stops: GradientStops, t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t <= stops[0].0 {
        return stops[0].1;
    }
    for pair in stops.windows(2) {
        let (p0, a0) = pair[0];
        let (p1, a1) = pair[1];
        if t <= p1 {
            if (p1 - p0).abs() <= f32::EPSILON {
                return a1;
            }
            let f = (t - p0) / (p1 - p0);
            return a0 + (a1 - a0) * f;
        }
    }
    stops[stops.len() - 1].1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn painted_pixels(s: &Surface) -> usize {
        (0..s.height())
            .flat_map(|y| (0..s.width()).map(move |x| (x, y)))
            .filter(|&(x, y)| s.pixel(x, y)[3] > 0)
            .count()
    }

    #[test]
    fn test_fill_rect_subpixel_still_marks() {
        let mut s = Surface::new(10, 10);
        s.fill_rect(4.2, 4.2, 1.0, 1.0, Rgb::new(0, 0, 0), 1.0);
        assert!(painted_pixels(&s) > 0);
    }

    #[test]
    fn test_fill_disc_centre_opaque() {
        let mut s = Surface::new(20, 20);
        s.fill_disc(10.0, 10.0, 5.0, Rgb::new(255, 0, 0), 1.0);
        assert_eq!(s.pixel(10, 10)[3], 255);
        // Well outside stays clear
        assert_eq!(s.pixel(1, 1)[3], 0);
    }

    #[test]
    fn test_gradient_disc_falls_off() {
        let mut s = Surface::new(40, 40);
        s.gradient_disc(
            20.0,
            20.0,
            10.0,
            Rgb::new(0, 0, 255),
            &[(0.0, 0.8), (0.5, 0.3), (1.0, 0.0)],
        );
        let centre = s.pixel(20, 20)[3];
        let mid = s.pixel(25, 20)[3];
        let rim = s.pixel(29, 20)[3];
        assert!(centre > mid);
        assert!(mid > rim);
    }

    #[test]
    fn test_stroke_line_zero_length_is_a_dot() {
        let mut s = Surface::new(20, 20);
        let p = Point::new(10.0, 10.0);
        s.stroke_line(p, p, 4.0, Rgb::new(0, 0, 0), 1.0);
        assert!(painted_pixels(&s) > 0);
        assert_eq!(s.pixel(10, 10)[3], 255);
    }

    #[test]
    fn test_erase_line_clears() {
        let mut s = Surface::new(20, 20);
        s.fill_rect(0.0, 0.0, 20.0, 20.0, Rgb::new(0, 0, 0), 1.0);
        s.erase_line(Point::new(0.0, 10.0), Point::new(20.0, 10.0), 6.0);
        assert_eq!(s.pixel(10, 10)[3], 0);
        assert_eq!(s.pixel(10, 1)[3], 255);
    }

    #[test]
    fn test_fill_polygon_even_odd() {
        let mut s = Surface::new(30, 30);
        // Outer square with an inner square hole
        let outer = vec![
            Point::new(5.0, 5.0),
            Point::new(25.0, 5.0),
            Point::new(25.0, 25.0),
            Point::new(5.0, 25.0),
        ];
        let inner = vec![
            Point::new(12.0, 12.0),
            Point::new(18.0, 12.0),
            Point::new(18.0, 18.0),
            Point::new(12.0, 18.0),
        ];
        s.fill_polygon(&[outer, inner], Rgb::new(0, 128, 0), 1.0);
        assert!(s.pixel(8, 15)[3] > 0);
        assert_eq!(s.pixel(15, 15)[3], 0);
    }

    #[test]
    fn test_rotated_rect_marks_along_angle() {
        let mut s = Surface::new(30, 30);
        s.fill_rotated_rect(
            15.0,
            15.0,
            10.0,
            2.0,
            std::f32::consts::FRAC_PI_4,
            Rgb::new(0, 0, 0),
            1.0,
        );
        assert!(painted_pixels(&s) > 0);
        assert!(s.pixel(15, 15)[3] > 0);
    }
}
