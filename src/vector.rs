//! 2D vectors and the two coordinate spaces of the canvas.
//!
//! [`Vector`] is plain arithmetic. Positions that live in a particular space
//! are wrapped in [`ScreenPoint`] (pixels as delivered by pointer events) or
//! [`WorldPoint`] (the pan/zoom independent space nodes are placed in).
//! Moving between the two always goes through a
//! [`Viewport`](crate::viewport::Viewport).

use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

/// A point or displacement without an attached coordinate space.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vector {
    pub x: f32,
    pub y: f32,
}

impl Vector {
    pub const ZERO: Vector = Vector { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f32 {
        self.length_sq().sqrt()
    }

    pub fn length_sq(self) -> f32 {
        self.x * self.x + self.y * self.y
    }

    /// Component-wise approximate equality.
    pub fn approx_eq(self, other: Vector, epsilon: f32) -> bool {
        (self.x - other.x).abs() <= epsilon && (self.y - other.y).abs() <= epsilon
    }
}

impl Add for Vector {
    type Output = Vector;
    fn add(self, rhs: Vector) -> Vector {
        Vector::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vector {
    fn add_assign(&mut self, rhs: Vector) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vector {
    type Output = Vector;
    fn sub(self, rhs: Vector) -> Vector {
        Vector::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Vector {
    fn sub_assign(&mut self, rhs: Vector) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Mul<f32> for Vector {
    type Output = Vector;
    fn mul(self, rhs: f32) -> Vector {
        Vector::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f32> for Vector {
    type Output = Vector;
    fn div(self, rhs: f32) -> Vector {
        Vector::new(self.x / rhs, self.y / rhs)
    }
}

impl Neg for Vector {
    type Output = Vector;
    fn neg(self) -> Vector {
        Vector::new(-self.x, -self.y)
    }
}

impl From<(f32, f32)> for Vector {
    fn from((x, y): (f32, f32)) -> Self {
        Vector::new(x, y)
    }
}

macro_rules! space_point {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name(pub Vector);

        impl $name {
            pub const fn new(x: f32, y: f32) -> Self {
                Self(Vector::new(x, y))
            }

            pub fn x(self) -> f32 {
                self.0.x
            }

            pub fn y(self) -> f32 {
                self.0.y
            }

            pub fn vector(self) -> Vector {
                self.0
            }

            /// Displacement from `origin` to `self`, in this space's units.
            pub fn delta_from(self, origin: $name) -> Vector {
                self.0 - origin.0
            }

            pub fn offset(self, delta: Vector) -> Self {
                Self(self.0 + delta)
            }

            pub fn approx_eq(self, other: $name, epsilon: f32) -> bool {
                self.0.approx_eq(other.0, epsilon)
            }
        }
    };
}

space_point!(
    /// A position in screen pixels, before the inverse viewport transform.
    ScreenPoint
);

space_point!(
    /// A position in world space, independent of pan and zoom.
    WorldPoint
);

/// Axis-aligned rectangle in screen pixels, typically a measured element box.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScreenRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl ScreenRect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn center(&self) -> ScreenPoint {
        ScreenPoint::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}
