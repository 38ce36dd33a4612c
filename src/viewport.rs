//! Pan/zoom state of the canvas and screen↔world conversion.
//!
//! The rendering transform is `translate(pan) scale(zoom)`, so
//!
//! ```text
//! screen = world * zoom + pan
//! world  = (screen - pan) / zoom
//! ```
//!
//! `pan` is measured in screen pixels.

use crate::vector::{ScreenPoint, Vector, WorldPoint};

pub const DEFAULT_MIN_ZOOM: f32 = 0.1;
pub const DEFAULT_MAX_ZOOM: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Viewport {
    pan: Vector,
    zoom: f32,
    min_zoom: f32,
    max_zoom: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::with_zoom_bounds(DEFAULT_MIN_ZOOM, DEFAULT_MAX_ZOOM)
    }
}

impl Viewport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Viewport at zoom 1.0 and no pan, accepting zoom values in `[min_zoom, max_zoom]`.
    ///
    /// The bounds are expected to have been validated by
    /// [`CanvasConfig::validate`](crate::CanvasConfig::validate).
    pub fn with_zoom_bounds(min_zoom: f32, max_zoom: f32) -> Self {
        Self {
            pan: Vector::ZERO,
            zoom: 1.0_f32.clamp(min_zoom, max_zoom),
            min_zoom,
            max_zoom,
        }
    }

    pub fn pan(&self) -> Vector {
        self.pan
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn zoom_bounds(&self) -> (f32, f32) {
        (self.min_zoom, self.max_zoom)
    }

    /// Shift the pan offset by a screen-space delta, 1:1 regardless of zoom.
    pub fn pan_by(&mut self, delta: Vector) {
        self.pan += delta;
    }

    pub fn set_pan(&mut self, pan: Vector) {
        self.pan = pan;
    }

    /// Set the zoom directly. Values outside the bounds are rejected.
    pub fn set_zoom(&mut self, zoom: f32) -> bool {
        if !self.accepts(zoom) {
            return false;
        }
        self.zoom = zoom;
        true
    }

    /// Change zoom by `delta_zoom` while keeping the world point under `cursor` fixed.
    ///
    /// Returns `false` and leaves pan and zoom untouched when the resulting
    /// zoom would leave the configured bounds.
    pub fn zoom_at(&mut self, cursor: ScreenPoint, delta_zoom: f32) -> bool {
        let new_zoom = self.zoom + delta_zoom;
        if !self.accepts(new_zoom) {
            log::trace!("zoom {new_zoom} rejected, bounds {}..={}", self.min_zoom, self.max_zoom);
            return false;
        }

        // cursor - pan is the focal point scaled by the old zoom; rescale it
        // to the new zoom and re-anchor it at the cursor.
        let cursor = cursor.vector();
        let scaled = (cursor - self.pan) * (new_zoom / self.zoom);
        self.pan = cursor - scaled;
        self.zoom = new_zoom;
        true
    }

    pub fn screen_to_world(&self, point: ScreenPoint) -> WorldPoint {
        WorldPoint((point.vector() - self.pan) / self.zoom)
    }

    pub fn world_to_screen(&self, point: WorldPoint) -> ScreenPoint {
        ScreenPoint(point.vector() * self.zoom + self.pan)
    }

    /// Convert a screen displacement (e.g. a drag delta) into world units.
    pub fn screen_delta_to_world(&self, delta: Vector) -> Vector {
        delta / self.zoom
    }

    fn accepts(&self, zoom: f32) -> bool {
        zoom.is_finite() && zoom >= self.min_zoom && zoom <= self.max_zoom
    }
}
