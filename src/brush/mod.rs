//! Brush renderer set - six stateless stroke-segment renderers
//!
//! Each renderer consumes a line segment plus style parameters and emits
//! marks onto the raster surface. Texture variety comes from an injected
//! random generator: renderers keep no state between calls, and two calls
//! with identical inputs but different RNG states render differently on
//! purpose (organic media simulation). A fixed seed reproduces a stroke
//! exactly.

mod renderers;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::color::resolve_channels;
use crate::geom::Point;
use crate::surface::Surface;

/// The stylised brush renderers. The eraser is not one of these: it is a
/// destination-clearing stroke handled by the canvas manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BrushKind {
    /// Graphite pencil with paper-grain speckles
    Graphite,
    /// Pressure-simulated smooth ink stroke
    Ink,
    /// Airbrush with radial-gradient discs
    Airbrush,
    /// Wet-media watercolour blobs with blooms
    WetMedia,
    /// Waxy crayon marks rotated to the stroke angle
    Wax,
    /// Alcohol-ink blooms with tendrils and splatter
    SolventBloom,
}

impl BrushKind {
    pub const ALL: [BrushKind; 6] = [
        BrushKind::Graphite,
        BrushKind::Ink,
        BrushKind::Airbrush,
        BrushKind::WetMedia,
        BrushKind::Wax,
        BrushKind::SolventBloom,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BrushKind::Graphite => "graphite",
            BrushKind::Ink => "ink",
            BrushKind::Airbrush => "airbrush",
            BrushKind::WetMedia => "wet-media",
            BrushKind::Wax => "wax",
            BrushKind::SolventBloom => "solvent-bloom",
        }
    }

    /// Look up a renderer by identifier. Unknown names resolve to `None`;
    /// callers treat that as a no-op rather than an error.
    pub fn from_name(name: &str) -> Option<BrushKind> {
        Self::ALL.iter().copied().find(|k| k.name() == name)
    }
}

/// Immutable per-segment style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrushStyle {
    /// Colour token (`#RRGGBB` or `rgb(...)`)
    pub colour: String,
    /// Stroke diameter in surface pixels
    pub size: f32,
    /// Base opacity in [0, 1]
    pub opacity: f32,
}

impl Default for BrushStyle {
    fn default() -> Self {
        Self {
            colour: "#C8963E".to_string(),
            size: 5.0,
            opacity: 1.0,
        }
    }
}

/// Render one stroke segment with the given renderer.
pub fn render_segment<R: Rng>(
    kind: BrushKind,
    surface: &mut Surface,
    from: Point,
    to: Point,
    style: &BrushStyle,
    rng: &mut R,
) {
    match kind {
        BrushKind::Graphite => renderers::graphite(surface, from, to, style, rng),
        BrushKind::Ink => renderers::ink(surface, from, to, style),
        BrushKind::Airbrush => renderers::airbrush(surface, from, to, style),
        BrushKind::WetMedia => renderers::wet_media(surface, from, to, style, rng),
        BrushKind::Wax => renderers::wax(surface, from, to, style, rng),
        BrushKind::SolventBloom => renderers::solvent_bloom(surface, from, to, style, rng),
    }
}

/// The initial dab placed on pointer-down: a filled disc of diameter
/// `style.size`.
pub fn render_dab(surface: &mut Surface, at: Point, style: &BrushStyle) {
    let rgb = resolve_channels(&style.colour);
    surface.fill_disc(at.x, at.y, (style.size * 0.5).max(0.5), rgb, style.opacity);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn painted(s: &Surface) -> usize {
        (0..s.height())
            .flat_map(|y| (0..s.width()).map(move |x| (x, y)))
            .filter(|&(x, y)| s.pixel(x, y)[3] > 0)
            .count()
    }

    #[test]
    fn test_brush_names_round_trip() {
        for kind in BrushKind::ALL {
            assert_eq!(BrushKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(BrushKind::from_name("chalk"), None);
    }

    #[test]
    fn test_zero_length_segment_marks_every_renderer() {
        let style = BrushStyle {
            colour: "#000000".into(),
            size: 8.0,
            opacity: 1.0,
        };
        let p = Point::new(32.0, 32.0);
        for kind in BrushKind::ALL {
            let mut surface = Surface::new(64, 64);
            let mut rng = SmallRng::seed_from_u64(7);
            render_segment(kind, &mut surface, p, p, &style, &mut rng);
            assert!(painted(&surface) > 0, "{} left no marks", kind.name());
        }
    }

    #[test]
    fn test_fixed_seed_reproduces_stroke() {
        let style = BrushStyle {
            colour: "#B22222".into(),
            size: 10.0,
            opacity: 0.8,
        };
        let from = Point::new(5.0, 5.0);
        let to = Point::new(55.0, 40.0);

        for kind in BrushKind::ALL {
            let mut a = Surface::new(64, 64);
            let mut b = Surface::new(64, 64);
            let mut rng_a = SmallRng::seed_from_u64(42);
            let mut rng_b = SmallRng::seed_from_u64(42);
            render_segment(kind, &mut a, from, to, &style, &mut rng_a);
            render_segment(kind, &mut b, from, to, &style, &mut rng_b);
            assert_eq!(a.data(), b.data(), "{} not seed-stable", kind.name());
        }
    }

    #[test]
    fn test_dab_diameter() {
        let mut surface = Surface::new(32, 32);
        let style = BrushStyle {
            colour: "#000000".into(),
            size: 10.0,
            opacity: 1.0,
        };
        render_dab(&mut surface, Point::new(16.0, 16.0), &style);
        assert_eq!(surface.pixel(16, 16)[3], 255);
        // Radius 5: pixel at distance 8 stays clear
        assert_eq!(surface.pixel(24, 16)[3], 0);
    }

    #[test]
    fn test_serde_kebab_names() {
        let json = serde_json::to_string(&BrushKind::SolventBloom).unwrap();
        assert_eq!(json, "\"solvent-bloom\"");
    }
}
