//! Procedural guide artwork: trace templates and colouring pages
//!
//! Trace templates are crisp 500x500 grey line drawings meant for the
//! quarter-strength overlay. Colouring pages render at surface size in a
//! warm parchment grey with hand-drawn wobble from an injected RNG, plus a
//! soft double-pass stroke that fakes a pencil underdrawing.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use crate::geom::Point;
use crate::surface::Surface;

const TEMPLATE_SIZE: u32 = 500;
const TEMPLATE_GREY: Rgb = Rgb {
    r: 0xd0,
    g: 0xd0,
    b: 0xd0,
};
const TEMPLATE_WIDTH: f32 = 1.5;

const PAGE_GREY: Rgb = Rgb {
    r: 0xb8,
    g: 0xb1,
    b: 0xa4,
};
const PAGE_ALPHA: f32 = 0.85;

const CIRCLE_SEGMENTS: usize = 96;
const CURVE_STEPS: usize = 24;

/// The built-in trace templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MandalaTemplate {
    /// Concentric circles with eight spokes
    Petals,
    /// Dense rings with twelve offset spokes
    StarBloom,
    /// Tight rings with six spokes
    LotusWheel,
    /// Sixteen radiating rays over sparse rings
    SunHalo,
    /// Fine rings dotted with small circles
    SpiralFlower,
    /// Rings threaded with circle clusters
    SacredWeb,
    /// Plain concentric rings
    RadiantRings,
    /// Hearts arranged around the centre
    HeartBloom,
    /// Rings with twelve long spokes
    CosmicPetals,
    /// Rings with eight spokes and four offset diagonals
    TempleWheel,
}

impl MandalaTemplate {
    pub const ALL: [MandalaTemplate; 10] = [
        MandalaTemplate::Petals,
        MandalaTemplate::StarBloom,
        MandalaTemplate::LotusWheel,
        MandalaTemplate::SunHalo,
        MandalaTemplate::SpiralFlower,
        MandalaTemplate::SacredWeb,
        MandalaTemplate::RadiantRings,
        MandalaTemplate::HeartBloom,
        MandalaTemplate::CosmicPetals,
        MandalaTemplate::TempleWheel,
    ];
}

/// The built-in colouring pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColouringPage {
    Lotus,
    Flower,
    Heart,
    Mandala,
    Leaves,
}

impl ColouringPage {
    pub const ALL: [ColouringPage; 5] = [
        ColouringPage::Lotus,
        ColouringPage::Flower,
        ColouringPage::Heart,
        ColouringPage::Mandala,
        ColouringPage::Leaves,
    ];
}

/// Render a trace template onto a fresh 500x500 surface.
pub fn render_mandala_template(template: MandalaTemplate) -> Surface {
    let mut s = Surface::new(TEMPLATE_SIZE, TEMPLATE_SIZE);
    let c = Point::new(250.0, 250.0);

    let rings = |s: &mut Surface, start: f32, end: f32, step: f32| {
        let mut r = start;
        while r <= end {
            stroke_circle(s, c, r, TEMPLATE_WIDTH, TEMPLATE_GREY, 1.0);
            r += step;
        }
    };
    let spokes = |s: &mut Surface, count: u32, inner: f32, outer: f32, offset: f32| {
        for i in 0..count {
            let angle = i as f32 / count as f32 * std::f32::consts::TAU + offset;
            let (sin, cos) = angle.sin_cos();
            s.stroke_line(
                Point::new(c.x + cos * inner, c.y + sin * inner),
                Point::new(c.x + cos * outer, c.y + sin * outer),
                TEMPLATE_WIDTH,
                TEMPLATE_GREY,
                1.0,
            );
        }
    };

    match template {
        MandalaTemplate::Petals => {
            rings(&mut s, 50.0, 200.0, 30.0);
            spokes(&mut s, 8, 0.0, 200.0, 0.0);
        }
        MandalaTemplate::StarBloom => {
            rings(&mut s, 40.0, 200.0, 30.0);
            spokes(&mut s, 12, 50.0, 200.0, 0.0);
        }
        MandalaTemplate::LotusWheel => {
            rings(&mut s, 30.0, 200.0, 25.0);
            spokes(&mut s, 6, 0.0, 180.0, 0.0);
        }
        MandalaTemplate::SunHalo => {
            spokes(&mut s, 16, 0.0, 200.0, 0.0);
            rings(&mut s, 60.0, 200.0, 40.0);
        }
        MandalaTemplate::SpiralFlower => {
            rings(&mut s, 20.0, 200.0, 15.0);
            for i in 0..10 {
                let angle = i as f32 / 10.0 * std::f32::consts::TAU;
                let (sin, cos) = angle.sin_cos();
                let mut r = 50.0;
                while r <= 200.0 {
                    let at = Point::new(c.x + cos * r, c.y + sin * r);
                    stroke_circle(&mut s, at, 8.0, TEMPLATE_WIDTH, TEMPLATE_GREY, 1.0);
                    r += 50.0;
                }
            }
        }
        MandalaTemplate::SacredWeb => {
            rings(&mut s, 50.0, 200.0, 30.0);
            for i in 0..8 {
                let angle = i as f32 / 8.0 * std::f32::consts::TAU;
                let (sin, cos) = angle.sin_cos();
                for j in 0..3 {
                    let r = 70.0 + j as f32 * 40.0;
                    let at = Point::new(c.x + cos * r, c.y + sin * r);
                    stroke_circle(&mut s, at, 15.0, TEMPLATE_WIDTH, TEMPLATE_GREY, 1.0);
                }
            }
        }
        MandalaTemplate::RadiantRings => {
            rings(&mut s, 40.0, 200.0, 20.0);
        }
        MandalaTemplate::HeartBloom => {
            for i in 0..8 {
                let angle = i as f32 / 8.0 * std::f32::consts::TAU;
                let (sin, cos) = angle.sin_cos();
                let mut r = 60.0;
                while r <= 200.0 {
                    let at = Point::new(c.x + cos * r, c.y + sin * r);
                    stroke_heart(&mut s, at, TEMPLATE_WIDTH, TEMPLATE_GREY, 1.0);
                    r += 50.0;
                }
            }
            rings(&mut s, 30.0, 200.0, 40.0);
        }
        MandalaTemplate::CosmicPetals => {
            rings(&mut s, 35.0, 200.0, 25.0);
            spokes(&mut s, 12, 0.0, 190.0, 0.0);
        }
        MandalaTemplate::TempleWheel => {
            rings(&mut s, 50.0, 200.0, 30.0);
            spokes(&mut s, 8, 50.0, 200.0, 0.0);
            spokes(&mut s, 4, 50.0, 200.0, std::f32::consts::FRAC_PI_8);
        }
    }
    s
}

/// Render a colouring page onto a fresh surface of the given dimensions.
/// The wobble comes from the RNG; seed it to reproduce a page exactly.
pub fn render_colouring_page<R: Rng>(
    page: ColouringPage,
    width: u32,
    height: u32,
    rng: &mut R,
) -> Surface {
    let mut s = Surface::new(width, height);
    let cx = width as f32 / 2.0;
    let cy = height as f32 / 2.0;
    let size = (width.min(height)) as f32 * 0.4;

    match page {
        ColouringPage::Lotus => {
            for i in 0..8 {
                let angle = i as f32 / 8.0 * std::f32::consts::TAU;
                let (sin, cos) = angle.sin_cos();
                let at = Point::new(
                    wobble(rng, cx + cos * size * 0.25, 1.5),
                    wobble(rng, cy + sin * size * 0.25, 1.5),
                );
                let rx = wobble(rng, size * 0.22, 2.0);
                let ry = wobble(rng, size * 0.42, 2.0);
                let tilt = angle + wobble(rng, 0.0, 0.05);
                let outline = ellipse_points(at, rx, ry, tilt);
                soft_stroke(&mut s, &outline, true, soft_line_width(rng, 2.3));
            }
        }
        ColouringPage::Flower => {
            for i in 0..6 {
                let angle = i as f32 / 6.0 * std::f32::consts::TAU;
                let (sin, cos) = angle.sin_cos();
                let at = Point::new(
                    wobble(rng, cx + cos * size * 0.32, 1.5),
                    wobble(rng, cy + sin * size * 0.32, 1.5),
                );
                let r = wobble(rng, size * 0.32, 2.0);
                soft_stroke(
                    &mut s,
                    &ellipse_points(at, r, r, 0.0),
                    true,
                    soft_line_width(rng, 2.0),
                );
            }
            let at = Point::new(wobble(rng, cx, 1.5), wobble(rng, cy, 1.5));
            let r = wobble(rng, size * 0.32, 2.0);
            soft_stroke(
                &mut s,
                &ellipse_points(at, r, r, 0.0),
                true,
                soft_line_width(rng, 2.0),
            );
        }
        ColouringPage::Heart => {
            let bottom = Point::new(wobble(rng, cx, 2.0), wobble(rng, cy + size * 0.25, 2.0));
            let notch = Point::new(wobble(rng, cx, 2.0), wobble(rng, cy - size * 0.2, 2.0));
            let mut outline = vec![bottom];
            append_cubic(
                &mut outline,
                Point::new(
                    wobble(rng, cx - size * 0.5, 3.0),
                    wobble(rng, cy - size * 0.1, 3.0),
                ),
                Point::new(
                    wobble(rng, cx - size * 0.25, 3.0),
                    wobble(rng, cy - size * 0.45, 3.0),
                ),
                notch,
            );
            append_cubic(
                &mut outline,
                Point::new(
                    wobble(rng, cx + size * 0.25, 3.0),
                    wobble(rng, cy - size * 0.45, 3.0),
                ),
                Point::new(
                    wobble(rng, cx + size * 0.5, 3.0),
                    wobble(rng, cy - size * 0.1, 3.0),
                ),
                Point::new(wobble(rng, cx, 2.0), wobble(rng, cy + size * 0.25, 2.0)),
            );
            soft_stroke(&mut s, &outline, false, soft_line_width(rng, 2.5));
        }
        ColouringPage::Mandala => {
            let mut r = size * 0.2;
            while r <= size * 0.8 {
                let at = Point::new(wobble(rng, cx, 1.5), wobble(rng, cy, 1.5));
                let radius = wobble(rng, r, 2.0);
                soft_stroke(
                    &mut s,
                    &ellipse_points(at, radius, radius, 0.0),
                    true,
                    soft_line_width(rng, 2.0),
                );
                r += size * 0.15;
            }
        }
        ColouringPage::Leaves => {
            for i in 0..10 {
                let angle = i as f32 / 10.0 * std::f32::consts::TAU;
                let (sin, cos) = angle.sin_cos();
                let at = Point::new(
                    wobble(rng, cx + cos * size * 0.35, 1.5),
                    wobble(rng, cy + sin * size * 0.35, 1.5),
                );
                let rx = wobble(rng, size * 0.12, 2.0);
                let ry = wobble(rng, size * 0.28, 2.0);
                let tilt = angle + wobble(rng, 0.0, 0.05);
                let outline = ellipse_points(at, rx, ry, tilt);
                soft_stroke(&mut s, &outline, true, soft_line_width(rng, 2.2));
            }
        }
    }
    s
}

fn wobble<R: Rng>(rng: &mut R, value: f32, amount: f32) -> f32 {
    value + (rng.gen::<f32>() - 0.5) * amount
}

fn soft_line_width<R: Rng>(rng: &mut R, base: f32) -> f32 {
    base + (rng.gen::<f32>() - 0.5) * 0.6
}

/// Stroke once at full page alpha, then again thinner and fainter for the
/// pencil-underdrawing look.
fn soft_stroke(s: &mut Surface, points: &[Point], closed: bool, width: f32) {
    s.stroke_polyline(points, closed, width, PAGE_GREY, PAGE_ALPHA);
    s.stroke_polyline(points, closed, width * 0.7, PAGE_GREY, 0.35);
}

fn stroke_circle(s: &mut Surface, center: Point, radius: f32, width: f32, rgb: Rgb, alpha: f32) {
    s.stroke_polyline(&ellipse_points(center, radius, radius, 0.0), true, width, rgb, alpha);
}

fn ellipse_points(center: Point, rx: f32, ry: f32, tilt: f32) -> Vec<Point> {
    let (sin, cos) = tilt.sin_cos();
    (0..CIRCLE_SEGMENTS)
        .map(|i| {
            let t = i as f32 / CIRCLE_SEGMENTS as f32 * std::f32::consts::TAU;
            let x = rx * t.cos();
            let y = ry * t.sin();
            Point {
                x: center.x + x * cos - y * sin,
                y: center.y + x * sin + y * cos,
            }
        })
        .collect()
}

fn append_cubic(points: &mut Vec<Point>, c1: Point, c2: Point, end: Point) {
    let start = match points.last() {
        Some(&p) => p,
        None => return,
    };
    for k in 1..=CURVE_STEPS {
        let t = k as f32 / CURVE_STEPS as f32;
        let u = 1.0 - t;
        points.push(Point {
            x: u * u * u * start.x
                + 3.0 * u * u * t * c1.x
                + 3.0 * u * t * t * c2.x
                + t * t * t * end.x,
            y: u * u * u * start.y
                + 3.0 * u * u * t * c1.y
                + 3.0 * u * t * t * c2.y
                + t * t * t * end.y,
        });
    }
}

/// A small heart outline centred at `at`, spanning roughly 30 units.
fn stroke_heart(s: &mut Surface, at: Point, width: f32, rgb: Rgb, alpha: f32) {
    let mut outline = vec![Point::new(at.x - 15.0, at.y)];
    append_cubic(
        &mut outline,
        Point::new(at.x - 15.0, at.y - 15.0),
        Point::new(at.x, at.y - 30.0),
        at,
    );
    append_cubic(
        &mut outline,
        Point::new(at.x, at.y - 30.0),
        Point::new(at.x + 15.0, at.y - 15.0),
        Point::new(at.x + 15.0, at.y),
    );
    append_cubic(
        &mut outline,
        Point::new(at.x + 15.0, at.y + 15.0),
        Point::new(at.x, at.y + 30.0),
        at,
    );
    append_cubic(
        &mut outline,
        Point::new(at.x, at.y + 30.0),
        Point::new(at.x - 15.0, at.y + 15.0),
        Point::new(at.x - 15.0, at.y),
    );
    s.stroke_polyline(&outline, false, width, rgb, alpha);
}
