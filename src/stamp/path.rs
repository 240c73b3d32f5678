//! Path-data parsing and flattening for stamp outlines
//!
//! Stamp shapes are authored as absolute `M`/`L`/`C`/`Z` path-data strings
//! in the 0-100 local space. Compilation flattens them into polylines the
//! raster primitives can fill or stroke directly.

use crate::error::DoodleError;
use crate::geom::Point;

/// Samples per cubic segment when flattening.
const CURVE_STEPS: usize = 16;

/// One contour of a flattened path.
#[derive(Debug, Clone)]
pub struct Subpath {
    pub points: Vec<Point>,
    pub closed: bool,
}

/// A path-data string flattened to polylines.
#[derive(Debug, Clone, Default)]
pub struct FlattenedPath {
    pub subpaths: Vec<Subpath>,
}

/// Parse absolute path data (`M x y`, `L x y`, `C x1 y1 x2 y2 x y`, `Z`)
/// into flattened subpaths.
pub fn parse_path_data(d: &str) -> Result<FlattenedPath, DoodleError> {
    let tokens = tokenize(d);
    let mut it = tokens.iter().peekable();

    let mut path = FlattenedPath::default();
    let mut current: Vec<Point> = Vec::new();
    let mut closed = false;

    let flush = |path: &mut FlattenedPath, current: &mut Vec<Point>, closed: bool| {
        if current.len() >= 2 {
            path.subpaths.push(Subpath {
                points: std::mem::take(current),
                closed,
            });
        } else {
            current.clear();
        }
    };

    while let Some(tok) = it.next() {
        match tok.as_str() {
            "M" => {
                flush(&mut path, &mut current, closed);
                closed = false;
                current.push(take_point(&mut it, d)?);
            }
            "L" => {
                current.push(take_point(&mut it, d)?);
            }
            "C" => {
                let c1 = take_point(&mut it, d)?;
                let c2 = take_point(&mut it, d)?;
                let end = take_point(&mut it, d)?;
                let start = *current
                    .last()
                    .ok_or_else(|| bad_path(d, "curve before move"))?;
                for k in 1..=CURVE_STEPS {
                    let t = k as f32 / CURVE_STEPS as f32;
                    current.push(cubic_at(start, c1, c2, end, t));
                }
            }
            "Z" | "z" => {
                closed = true;
                flush(&mut path, &mut current, closed);
                closed = false;
            }
            other => return Err(bad_path(d, &format!("unexpected token `{other}`"))),
        }
    }
    flush(&mut path, &mut current, closed);

    if path.subpaths.is_empty() {
        return Err(bad_path(d, "no drawable subpaths"));
    }
    Ok(path)
}

fn bad_path(d: &str, why: &str) -> DoodleError {
    DoodleError::InvalidInput(format!("path data `{d}`: {why}"))
}

fn tokenize(d: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut num = String::new();
    for c in d.chars() {
        if c.is_ascii_alphabetic() {
            if !num.is_empty() {
                tokens.push(std::mem::take(&mut num));
            }
            tokens.push(c.to_string());
        } else if c.is_ascii_digit() || c == '.' || c == '-' || c == '+' {
            num.push(c);
        } else if !num.is_empty() {
            tokens.push(std::mem::take(&mut num));
        }
    }
    if !num.is_empty() {
        tokens.push(num);
    }
    tokens
}

fn take_point<'a, I: Iterator<Item = &'a String>>(
    it: &mut std::iter::Peekable<I>,
    d: &str,
) -> Result<Point, DoodleError> {
    let x = take_number(it, d)?;
    let y = take_number(it, d)?;
    Ok(Point::new(x, y))
}

fn take_number<'a, I: Iterator<Item = &'a String>>(
    it: &mut std::iter::Peekable<I>,
    d: &str,
) -> Result<f32, DoodleError> {
    let tok = it.next().ok_or_else(|| bad_path(d, "missing coordinate"))?;
    tok.parse::<f32>()
        .map_err(|_| bad_path(d, &format!("bad coordinate `{tok}`")))
}

fn cubic_at(p0: Point, c1: Point, c2: Point, p1: Point, t: f32) -> Point {
    let u = 1.0 - t;
    let b0 = u * u * u;
    let b1 = 3.0 * u * u * t;
    let b2 = 3.0 * u * t * t;
    let b3 = t * t * t;
    Point {
        x: b0 * p0.x + b1 * c1.x + b2 * c2.x + b3 * p1.x,
        y: b0 * p0.y + b1 * c1.y + b2 * c2.y + b3 * p1.y,
    }
}
