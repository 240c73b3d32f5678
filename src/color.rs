//! Colour token parsing and rgba formatting
//!
//! Tokens are either `#RRGGBB` hex strings or anything carrying three
//! numeric substrings (`rgb(10, 20, 30)` and friends). Unresolvable
//! tokens degrade to black rather than erroring.

use serde::{Deserialize, Serialize};

/// Resolved colour channels, 0-255 each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Format as an `rgb(r, g, b)` token.
    pub fn to_token(self) -> String {
        format!("rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

/// Parse a colour token into channel values.
///
/// `#RRGGBB` is read as hex pairs; any other string is scanned for its
/// first three integer substrings, each clamped to 255. Fails soft: no
/// resolvable triplet means black.
pub fn resolve_channels(token: &str) -> Rgb {
    if let Some(hex) = token.strip_prefix('#') {
        if let Some(rgb) = parse_hex_pairs(hex) {
            return rgb;
        }
    }
    parse_numeric_triplet(token).unwrap_or(Rgb::BLACK)
}

/// Format a token as `rgba(r, g, b, a)` with the opacity clamped to [0, 1].
pub fn with_opacity(token: &str, opacity: f32) -> String {
    let rgb = resolve_channels(token);
    let a = opacity.clamp(0.0, 1.0);
    format!("rgba({}, {}, {}, {})", rgb.r, rgb.g, rgb.b, a)
}

fn parse_hex_pairs(hex: &str) -> Option<Rgb> {
    if hex.len() < 6 || !hex.is_char_boundary(6) {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Rgb::new(r, g, b))
}

fn parse_numeric_triplet(token: &str) -> Option<Rgb> {
    let mut channels = [0u8; 3];
    let mut found = 0usize;
    let mut run: Option<u32> = None;

    for c in token.chars().chain(std::iter::once(' ')) {
        if let Some(d) = c.to_digit(10) {
            run = Some(run.unwrap_or(0).saturating_mul(10).saturating_add(d));
        } else if let Some(value) = run.take() {
            if found < 3 {
                channels[found] = value.min(255) as u8;
                found += 1;
            }
            if found == 3 {
                break;
            }
        }
    }

    (found == 3).then(|| Rgb::new(channels[0], channels[1], channels[2]))
}

/// A named palette of colour tokens.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Palette {
    pub name: &'static str,
    pub colours: [&'static str; 5],
}

/// The seven chakra palettes offered alongside the free colour picker.
pub const CHAKRA_PALETTES: [Palette; 7] = [
    Palette {
        name: "Root",
        colours: ["#7A1F1F", "#A94442", "#C96A6A", "#E8B4B4", "#4A1C1C"],
    },
    Palette {
        name: "Sacral",
        colours: ["#D35400", "#E67E22", "#F39C12", "#FAD7A0", "#A04000"],
    },
    Palette {
        name: "Solar Plexus",
        colours: ["#F1C40F", "#F7DC6F", "#FCF3CF", "#D4AC0D", "#9A7D0A"],
    },
    Palette {
        name: "Heart",
        colours: ["#2ECC71", "#58D68D", "#A9DFBF", "#1D8348", "#145A32"],
    },
    Palette {
        name: "Throat",
        colours: ["#3498DB", "#5DADE2", "#AED6F1", "#21618C", "#154360"],
    },
    Palette {
        name: "Third Eye",
        colours: ["#5B2C6F", "#76448A", "#BB8FCE", "#4A235A", "#2E1A47"],
    },
    Palette {
        name: "Crown",
        colours: ["#F4ECF7", "#E8DAEF", "#D2B4DE", "#A569BD", "#7D3C98"],
    },
];
