//! SVG path generation for edges.
//!
//! Paths are produced from two already-resolved points in a single coordinate
//! space. `scale` is the ratio between that space and screen pixels: 1.0 for
//! world-space paths drawn under the viewport transform, the zoom for paths
//! drawn directly in screen space. It only affects the pixel-sized constants
//! (bezier control offset, straight-line threshold).

use crate::vector::Vector;

/// Shape used to draw edges.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EdgeStyle {
    /// Orthogonal connector: vertical, horizontal along the midline, vertical.
    #[default]
    Step,
    /// Horizontal-biased cubic bezier.
    Bezier {
        /// Minimum control point offset in pixels.
        min_offset: f32,
    },
}

impl EdgeStyle {
    /// SVG path commands from `start` to `end`.
    pub fn path_commands(&self, start: Vector, end: Vector, scale: f32) -> String {
        match *self {
            EdgeStyle::Step => generate_step_path(start, end),
            EdgeStyle::Bezier { min_offset } => generate_bezier_path(start, end, scale, min_offset),
        }
    }

    /// Point halfway along the drawn path, used to place edge labels.
    pub fn midpoint(&self, start: Vector, end: Vector, scale: f32) -> Vector {
        match *self {
            EdgeStyle::Step => step_midpoint(start, end),
            EdgeStyle::Bezier { min_offset } => {
                CubicBezier::from_endpoints(start, end, scale, min_offset).eval(0.5)
            }
        }
    }
}

/// Y coordinate of the horizontal run of a step path.
pub fn step_midline(start: Vector, end: Vector) -> f32 {
    start.y + (end.y - start.y) / 2.0
}

fn step_midpoint(start: Vector, end: Vector) -> Vector {
    Vector::new(start.x + (end.x - start.x) / 2.0, step_midline(start, end))
}

/// Generate SVG path command for a stepped connector
///
/// The path runs vertically from `start` to the horizontal midline between
/// the two points, across to `end.x`, then vertically into `end`.
///
/// # Returns
/// SVG path command string (e.g., "M 0 0 L 0 50 100 50 100 100")
pub fn generate_step_path(start: Vector, end: Vector) -> String {
    let mid_y = step_midline(start, end);
    format!(
        "M {} {} L {} {} {} {} {} {}",
        start.x, start.y, start.x, mid_y, end.x, mid_y, end.x, end.y
    )
}

/// Generate SVG path command for a bezier link between two points
///
/// Creates a horizontal-biased cubic bezier curve suitable for node connections.
/// Control points extend horizontally from start and end points.
///
/// # Arguments
/// * `start`, `end` - Endpoints (handle centres)
/// * `scale` - Pixels per unit of the points' space (affects control point offset)
/// * `min_offset` - Minimum control point offset in pixels
///
/// # Returns
/// SVG path command string (e.g., "M 10 20 C 60 20 90 80 140 80")
pub fn generate_bezier_path(start: Vector, end: Vector, scale: f32, min_offset: f32) -> String {
    let bezier = CubicBezier::from_endpoints(start, end, scale, min_offset);
    if bezier.is_straight() {
        return format!("M {} {} L {} {}", start.x, start.y, end.x, end.y);
    }
    format!(
        "M {} {} C {} {} {} {} {} {}",
        bezier.p0.x, bezier.p0.y, bezier.p1.x, bezier.p1.y, bezier.p2.x, bezier.p2.y, bezier.p3.x, bezier.p3.y
    )
}

/// Cubic bezier curve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    pub p0: Vector, // Start point
    pub p1: Vector, // Control point 1
    pub p2: Vector, // Control point 2
    pub p3: Vector, // End point
}

impl CubicBezier {
    /// Create a bezier from endpoints using the same logic as generate_bezier_path
    ///
    /// Endpoints closer than 10 pixels collapse into a straight segment to
    /// avoid zig-zags.
    pub fn from_endpoints(start: Vector, end: Vector, scale: f32, min_offset: f32) -> Self {
        let delta = end - start;
        let threshold = 10.0 / scale;

        if delta.length_sq() < threshold * threshold {
            return CubicBezier {
                p0: start,
                p1: start,
                p2: end,
                p3: end,
            };
        }

        let offset = (delta.x.abs() * 0.5).max(min_offset / scale);

        CubicBezier {
            p0: start,
            p1: Vector::new(start.x + offset, start.y),
            p2: Vector::new(end.x - offset, end.y),
            p3: end,
        }
    }

    fn is_straight(&self) -> bool {
        self.p1 == self.p0 && self.p2 == self.p3
    }

    /// Evaluate the bezier curve at parameter t (0.0 to 1.0)
    pub fn eval(&self, t: f32) -> Vector {
        let t2 = t * t;
        let t3 = t2 * t;
        let mt = 1.0 - t;
        let mt2 = mt * mt;
        let mt3 = mt2 * mt;

        self.p0 * mt3 + self.p1 * (3.0 * mt2 * t) + self.p2 * (3.0 * mt * t2) + self.p3 * t3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: f32, y: f32) -> Vector {
        Vector::new(x, y)
    }

    // ========================================================================
    // generate_step_path()
    // ========================================================================

    #[test]
    fn test_step_path_format() {
        let path = generate_step_path(v(0.0, 0.0), v(100.0, 100.0));
        assert_eq!(path, "M 0 0 L 0 50 100 50 100 100");
    }

    #[test]
    fn test_step_path_upwards() {
        let path = generate_step_path(v(10.0, 200.0), v(50.0, 100.0));
        assert_eq!(path, "M 10 200 L 10 150 50 150 50 100");
    }

    #[test]
    fn test_step_path_vertical_alignment() {
        let path = generate_step_path(v(20.0, 0.0), v(20.0, 40.0));
        assert_eq!(path, "M 20 0 L 20 20 20 20 20 40");
    }

    #[test]
    fn test_step_midpoint() {
        let mid = EdgeStyle::Step.midpoint(v(0.0, 0.0), v(100.0, 40.0), 1.0);
        assert_eq!(mid, v(50.0, 20.0));
    }

    // ========================================================================
    // generate_bezier_path()
    // ========================================================================

    #[test]
    fn test_bezier_path() {
        let path = generate_bezier_path(v(0.0, 50.0), v(100.0, 50.0), 1.0, 50.0);
        assert!(path.starts_with("M 0 50 C"));
        assert!(path.ends_with("100 50"));
    }

    #[test]
    fn test_bezier_path_small_distance() {
        // Distance is 5.0, threshold is 10.0
        let path = generate_bezier_path(v(0.0, 0.0), v(5.0, 0.0), 1.0, 50.0);
        assert!(path.contains(" L "));
        assert!(!path.contains(" C "));

        // Distance is 15.0, threshold is 10.0
        let path2 = generate_bezier_path(v(0.0, 0.0), v(15.0, 0.0), 1.0, 50.0);
        assert!(path2.contains(" C "));
        assert!(!path2.contains(" L "));
    }

    #[test]
    fn test_bezier_scale_affects_offset() {
        let path1 = generate_bezier_path(v(0.0, 0.0), v(50.0, 0.0), 1.0, 50.0);
        let path2 = generate_bezier_path(v(0.0, 0.0), v(50.0, 0.0), 2.0, 50.0);
        assert_ne!(path1, path2);
    }

    #[test]
    fn test_bezier_control_points() {
        let bezier = CubicBezier::from_endpoints(v(0.0, 0.0), v(200.0, 100.0), 1.0, 50.0);
        assert_eq!(bezier.p1, v(100.0, 0.0));
        assert_eq!(bezier.p2, v(100.0, 100.0));
    }

    #[test]
    fn test_bezier_eval_endpoints() {
        let bezier = CubicBezier::from_endpoints(v(0.0, 0.0), v(200.0, 100.0), 1.0, 50.0);
        assert_eq!(bezier.eval(0.0), v(0.0, 0.0));
        assert_eq!(bezier.eval(1.0), v(200.0, 100.0));
        assert!(bezier.eval(0.5).approx_eq(v(100.0, 50.0), 1e-3));
    }

    #[test]
    fn test_style_dispatch() {
        let start = v(0.0, 0.0);
        let end = v(100.0, 100.0);
        assert!(EdgeStyle::Step.path_commands(start, end, 1.0).contains(" L "));
        assert!(EdgeStyle::Bezier { min_offset: 50.0 }
            .path_commands(start, end, 1.0)
            .contains(" C "));
        assert_eq!(EdgeStyle::default(), EdgeStyle::Step);
    }
}
