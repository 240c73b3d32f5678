//! Stamp engine - vector glyph placement with symmetry replication
//!
//! Stamp shapes live in a normalized 0-100 local space as path-data
//! strings, circles and line segments. Definitions compile once per name
//! into flattened primitives held in a global cache; placement applies a
//! translate -> rotate -> mirror -> scale -> recenter transform stack and
//! draws circles, then lines, then paths, so later primitives draw over
//! earlier ones.

mod engine;
mod path;

pub use engine::{placements_for, Placement, StampAnimation, StampSettings};
pub use path::{parse_path_data, FlattenedPath, Subpath};

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::DoodleError;

/// A circle primitive in local 0-100 units.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CircleDef {
    pub x: f32,
    pub y: f32,
    pub r: f32,
}

/// A line-segment primitive in local 0-100 units.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LineDef {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

/// A named shape: zero or more closed/stroked paths, circles and lines.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StampDefinition {
    #[serde(default)]
    pub paths: Vec<String>,
    #[serde(default)]
    pub circles: Vec<CircleDef>,
    #[serde(default)]
    pub lines: Vec<LineDef>,
}

/// A definition resolved into drawable primitives.
#[derive(Debug, Clone)]
pub struct CompiledStamp {
    pub paths: Vec<FlattenedPath>,
    pub circles: Vec<CircleDef>,
    pub lines: Vec<LineDef>,
}

/// Compile-once cache keyed by stamp name (parking_lot lock, no poisoning).
static STAMP_CACHE: RwLock<Option<HashMap<String, Arc<CompiledStamp>>>> = RwLock::new(None);

/// Resolve a stamp name to its compiled primitives, compiling and caching
/// on first use. Unknown names yield `None`; callers treat placement of an
/// unknown stamp as a silent no-op.
pub fn compiled_stamp(name: &str) -> Option<Arc<CompiledStamp>> {
    {
        let guard = STAMP_CACHE.read();
        if let Some(cache) = guard.as_ref() {
            if let Some(stamp) = cache.get(name) {
                return Some(Arc::clone(stamp));
            }
        }
    }

    let def = builtin_definition(name)?;
    match compile(&def) {
        Ok(stamp) => {
            let stamp = Arc::new(stamp);
            let mut guard = STAMP_CACHE.write();
            guard
                .get_or_insert_with(HashMap::new)
                .insert(name.to_string(), Arc::clone(&stamp));
            tracing::debug!("compiled stamp `{name}`");
            Some(stamp)
        }
        Err(e) => {
            tracing::warn!("stamp `{name}` failed to compile: {e}");
            None
        }
    }
}

/// Register a custom stamp definition under a name, compiling it eagerly.
pub fn register_stamp(name: &str, def: &StampDefinition) -> Result<(), DoodleError> {
    let stamp = Arc::new(compile(def)?);
    STAMP_CACHE
        .write()
        .get_or_insert_with(HashMap::new)
        .insert(name.to_string(), stamp);
    Ok(())
}

fn compile(def: &StampDefinition) -> Result<CompiledStamp, DoodleError> {
    let paths = def
        .paths
        .iter()
        .map(|d| parse_path_data(d))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(CompiledStamp {
        paths,
        circles: def.circles.clone(),
        lines: def.lines.clone(),
    })
}

fn circle(x: f32, y: f32, r: f32) -> CircleDef {
    CircleDef { x, y, r }
}

fn line(x1: f32, y1: f32, x2: f32, y2: f32) -> LineDef {
    LineDef { x1, y1, x2, y2 }
}

/// The built-in stamp library.
fn builtin_definition(name: &str) -> Option<StampDefinition> {
    let def = match name {
        "hexagon" => StampDefinition {
            paths: vec!["M 50 5 L 90 27.5 L 90 72.5 L 50 95 L 10 72.5 L 10 27.5 Z".into()],
            ..Default::default()
        },
        "triangle" => StampDefinition {
            paths: vec!["M 50 8 L 92 88 L 8 88 Z".into()],
            ..Default::default()
        },
        "heart" => StampDefinition {
            paths: vec![
                "M 50 88 C 22 68 10 52 10 36 C 10 22 22 12 36 12 C 44 12 48 16 50 20 \
                 C 52 16 56 12 64 12 C 78 12 90 22 90 36 C 90 52 78 68 50 88 Z"
                    .into(),
            ],
            ..Default::default()
        },
        "leaf" => StampDefinition {
            paths: vec![
                "M 18 78 C 22 38 50 12 82 18 C 78 50 54 84 18 78 Z".into(),
                "M 22 72 C 46 62 62 46 78 26".into(),
            ],
            ..Default::default()
        },
        "lotus" => StampDefinition {
            paths: vec![
                "M 50 10 C 44 22 44 34 50 44 C 56 34 56 22 50 10 Z".into(),
                "M 32 22 C 30 38 38 52 50 58 C 46 44 42 32 32 22 Z".into(),
                "M 68 22 C 58 32 54 44 50 58 C 62 52 70 38 68 22 Z".into(),
                "M 22 46 C 30 62 40 72 50 76 C 44 64 34 54 22 46 Z".into(),
                "M 78 46 C 66 54 56 64 50 76 C 60 72 70 62 78 46 Z".into(),
            ],
            ..Default::default()
        },
        "seed-of-life" => StampDefinition {
            circles: vec![
                circle(50.0, 50.0, 22.0),
                circle(50.0, 28.0, 22.0),
                circle(69.0, 39.0, 22.0),
                circle(69.0, 61.0, 22.0),
                circle(50.0, 72.0, 22.0),
                circle(31.0, 61.0, 22.0),
                circle(31.0, 39.0, 22.0),
            ],
            ..Default::default()
        },
        "flower-of-life" => StampDefinition {
            circles: vec![
                circle(50.0, 50.0, 20.0),
                circle(50.0, 30.0, 20.0),
                circle(67.0, 40.0, 20.0),
                circle(67.0, 60.0, 20.0),
                circle(50.0, 70.0, 20.0),
                circle(33.0, 60.0, 20.0),
                circle(33.0, 40.0, 20.0),
                circle(50.0, 10.0, 20.0),
                circle(84.0, 30.0, 20.0),
                circle(84.0, 70.0, 20.0),
                circle(50.0, 90.0, 20.0),
                circle(16.0, 70.0, 20.0),
                circle(16.0, 30.0, 20.0),
            ],
            ..Default::default()
        },
        "metatron" => StampDefinition {
            circles: vec![
                circle(50.0, 50.0, 18.0),
                circle(50.0, 22.0, 8.0),
                circle(74.0, 36.0, 8.0),
                circle(74.0, 64.0, 8.0),
                circle(50.0, 78.0, 8.0),
                circle(26.0, 64.0, 8.0),
                circle(26.0, 36.0, 8.0),
            ],
            lines: vec![
                line(50.0, 22.0, 74.0, 36.0),
                line(74.0, 36.0, 74.0, 64.0),
                line(74.0, 64.0, 50.0, 78.0),
                line(50.0, 78.0, 26.0, 64.0),
                line(26.0, 64.0, 26.0, 36.0),
                line(26.0, 36.0, 50.0, 22.0),
                line(50.0, 22.0, 50.0, 78.0),
                line(26.0, 36.0, 74.0, 64.0),
                line(74.0, 36.0, 26.0, 64.0),
            ],
            ..Default::default()
        },
        "sri-yantra" => StampDefinition {
            paths: vec![
                "M 50 12 L 86 78 L 14 78 Z".into(),
                "M 50 20 L 80 74 L 20 74 Z".into(),
                "M 50 78 L 14 30 L 86 30 Z".into(),
                "M 50 70 L 20 34 L 80 34 Z".into(),
            ],
            circles: vec![circle(50.0, 50.0, 40.0)],
            ..Default::default()
        },
        "cat-head" => StampDefinition {
            paths: vec![
                "M 22 44 L 18 18 L 34 30 L 50 20 L 66 30 L 82 18 L 78 44 \
                 C 78 70 64 84 50 84 C 36 84 22 70 22 44 Z"
                    .into(),
                "M 36 54 C 40 50 44 50 48 54".into(),
                "M 64 54 C 60 50 56 50 52 54".into(),
                "M 50 58 C 48 62 46 64 44 66".into(),
                "M 50 58 C 52 62 54 64 56 66".into(),
            ],
            ..Default::default()
        },
        _ => return None,
    };
    Some(def)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const BUILTINS: [&str; 10] = [
        "hexagon",
        "triangle",
        "heart",
        "leaf",
        "lotus",
        "seed-of-life",
        "flower-of-life",
        "metatron",
        "sri-yantra",
        "cat-head",
    ];

    #[test]
    fn test_all_builtins_compile() {
        for name in BUILTINS {
            let stamp = compiled_stamp(name).unwrap_or_else(|| panic!("{name} missing"));
            let primitives =
                stamp.paths.len() + stamp.circles.len() + stamp.lines.len();
            assert!(primitives > 0, "{name} has no primitives");
        }
    }

    #[test]
    fn test_unknown_name_is_none() {
        assert!(compiled_stamp("pentagon-of-doom").is_none());
    }

    #[test]
    fn test_cache_returns_same_compilation() {
        let a = compiled_stamp("hexagon").unwrap();
        let b = compiled_stamp("hexagon").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_register_custom_stamp() {
        let def = StampDefinition {
            paths: vec!["M 10 10 L 90 10 L 90 90 L 10 90 Z".into()],
            ..Default::default()
        };
        register_stamp("square", &def).unwrap();
        assert!(compiled_stamp("square").is_some());
    }

    #[test]
    fn test_register_bad_path_errors() {
        let def = StampDefinition {
            paths: vec!["W nope".into()],
            ..Default::default()
        };
        assert!(register_stamp("broken", &def).is_err());
    }

    #[test]
    fn test_metatron_draw_order_groups() {
        let stamp = compiled_stamp("metatron").unwrap();
        assert_eq!(stamp.circles.len(), 7);
        assert_eq!(stamp.lines.len(), 9);
        assert!(stamp.paths.is_empty());
    }
}
