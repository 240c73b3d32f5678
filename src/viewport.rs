//! Viewport pan/zoom - presentation-layer transform over the surface
//!
//! Tracks two-finger pinch scale and pan translation independently of the
//! raster contents. The transform is meant for the host's surface element;
//! nothing here touches pixel data.

use serde::{Deserialize, Serialize};

/// Presentational transform applied to the whole surface element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub scale: f32,
    pub offset_x: f32,
    pub offset_y: f32,
    pub min_scale: f32,
    pub max_scale: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
            min_scale: 0.5,
            max_scale: 3.0,
        }
    }
}

impl Viewport {
    /// Back to identity. Called whenever the interaction mode leaves pan.
    pub fn reset(&mut self) {
        self.scale = 1.0;
        self.offset_x = 0.0;
        self.offset_y = 0.0;
    }

    pub fn is_identity(&self) -> bool {
        self.scale == 1.0 && self.offset_x == 0.0 && self.offset_y == 0.0
    }

    /// CSS-style transform string for the host element.
    pub fn css_transform(&self) -> String {
        format!(
            "translate({}px, {}px) scale({})",
            self.offset_x, self.offset_y, self.scale
        )
    }
}

/// A touch position in client (device) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClientPoint {
    pub x: f32,
    pub y: f32,
}

/// Distance between the first two touches.
pub fn touch_distance(a: ClientPoint, b: ClientPoint) -> f32 {
    (a.x - b.x).hypot(a.y - b.y)
}

/// Centroid of a touch pair.
pub fn touch_center(a: ClientPoint, b: ClientPoint) -> ClientPoint {
    ClientPoint {
        x: (a.x + b.x) / 2.0,
        y: (a.y + b.y) / 2.0,
    }
}

/// Two-finger gesture tracking state.
#[derive(Debug, Clone, Copy, Default)]
pub struct GestureState {
    pub pinching: bool,
    initial_distance: f32,
    initial_scale: f32,
    last_center: Option<ClientPoint>,
}

impl GestureState {
    /// Begin tracking a pinch from the current touch pair.
    pub fn begin_pinch(&mut self, a: ClientPoint, b: ClientPoint, viewport: &Viewport) {
        self.pinching = true;
        self.initial_distance = touch_distance(a, b).max(f32::EPSILON);
        self.initial_scale = viewport.scale;
        self.last_center = Some(touch_center(a, b));
    }

    /// Update scale and translation from the current touch pair.
    pub fn update_pinch(&mut self, a: ClientPoint, b: ClientPoint, viewport: &mut Viewport) {
        if !self.pinching {
            self.begin_pinch(a, b, viewport);
            return;
        }
        let factor = touch_distance(a, b) / self.initial_distance;
        viewport.scale = (self.initial_scale * factor).clamp(viewport.min_scale, viewport.max_scale);

        let center = touch_center(a, b);
        if let Some(last) = self.last_center {
            viewport.offset_x += center.x - last.x;
            viewport.offset_y += center.y - last.y;
        }
        self.last_center = Some(center);
    }

    /// Begin single-pointer pan tracking (hand mode).
    pub fn begin_pan(&mut self, at: ClientPoint) {
        self.last_center = Some(at);
    }

    /// Accumulate a pan delta.
    pub fn update_pan(&mut self, at: ClientPoint, viewport: &mut Viewport) {
        if let Some(last) = self.last_center {
            viewport.offset_x += at.x - last.x;
            viewport.offset_y += at.y - last.y;
        }
        self.last_center = Some(at);
    }

    /// End any gesture. Missing touches silently land here rather than
    /// erroring.
    pub fn end(&mut self) {
        self.pinching = false;
        self.last_center = None;
    }
}
