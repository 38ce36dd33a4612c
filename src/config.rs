//! Canvas configuration.

use crate::error::CanvasError;
use crate::graph::HandleId;
use crate::path::EdgeStyle;

/// Tunables for a [`NodeCanvas`](crate::NodeCanvas).
///
/// ```
/// use slint_node_canvas::{CanvasConfig, EdgeStyle};
///
/// let config = CanvasConfig::default()
///     .with_zoom_bounds(0.25, 4.0)
///     .with_edge_style(EdgeStyle::Bezier { min_offset: 50.0 });
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CanvasConfig {
    pub min_zoom: f32,
    pub max_zoom: f32,
    /// Wheel delta that corresponds to a zoom change of 1.0.
    pub wheel_step: f32,
    /// Reserved handle identifier marking an output port.
    pub output_handle: HandleId,
    pub edge_style: EdgeStyle,
    /// Hit radius in screen pixels used by
    /// [`NodeCanvas::handle_at_screen`](crate::NodeCanvas::handle_at_screen).
    pub handle_hit_radius: f32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            min_zoom: 0.1,
            max_zoom: 2.0,
            wheel_step: 100.0,
            output_handle: HandleId::from("output"),
            edge_style: EdgeStyle::Step,
            handle_hit_radius: 10.0,
        }
    }
}

impl CanvasConfig {
    pub fn with_zoom_bounds(mut self, min_zoom: f32, max_zoom: f32) -> Self {
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom;
        self
    }

    pub fn with_wheel_step(mut self, wheel_step: f32) -> Self {
        self.wheel_step = wheel_step;
        self
    }

    pub fn with_output_handle(mut self, output_handle: impl Into<HandleId>) -> Self {
        self.output_handle = output_handle.into();
        self
    }

    pub fn with_edge_style(mut self, edge_style: EdgeStyle) -> Self {
        self.edge_style = edge_style;
        self
    }

    pub fn with_handle_hit_radius(mut self, radius: f32) -> Self {
        self.handle_hit_radius = radius;
        self
    }

    /// Check that the values describe a usable canvas.
    pub fn validate(&self) -> Result<(), CanvasError> {
        if !(self.min_zoom > 0.0 && self.min_zoom.is_finite()) {
            return Err(CanvasError::InvalidConfig(format!(
                "min_zoom must be positive, got {}",
                self.min_zoom
            )));
        }
        if !(self.max_zoom > self.min_zoom && self.max_zoom.is_finite()) {
            return Err(CanvasError::InvalidConfig(format!(
                "max_zoom ({}) must be greater than min_zoom ({})",
                self.max_zoom, self.min_zoom
            )));
        }
        if !(self.wheel_step > 0.0) {
            return Err(CanvasError::InvalidConfig(format!(
                "wheel_step must be positive, got {}",
                self.wheel_step
            )));
        }
        if self.output_handle.as_str().is_empty() {
            return Err(CanvasError::InvalidConfig(
                "output_handle must not be empty".into(),
            ));
        }
        if !(self.handle_hit_radius >= 0.0 && self.handle_hit_radius.is_finite()) {
            return Err(CanvasError::InvalidConfig(format!(
                "handle_hit_radius must be a non-negative number, got {}",
                self.handle_hit_radius
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = CanvasConfig::default();
        assert_eq!(config.min_zoom, 0.1);
        assert_eq!(config.max_zoom, 2.0);
        assert_eq!(config.output_handle.as_str(), "output");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_inverted_zoom_bounds() {
        let config = CanvasConfig::default().with_zoom_bounds(2.0, 1.0);
        assert!(matches!(
            config.validate(),
            Err(CanvasError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_rejects_non_positive_min_zoom() {
        let config = CanvasConfig::default().with_zoom_bounds(0.0, 1.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_wheel_step() {
        let config = CanvasConfig::default().with_wheel_step(0.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_empty_output_handle() {
        let config = CanvasConfig::default().with_output_handle("");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_nan_hit_radius() {
        let config = CanvasConfig::default().with_handle_hit_radius(f32::NAN);
        assert!(config.validate().is_err());
        let config = CanvasConfig::default().with_handle_hit_radius(-1.0);
        assert!(config.validate().is_err());
    }
}
