//! Core geometry types for rect-tiler.
//!
//! ## Rust Lesson #1: Private Fields
//!
//! `Rectangle` keeps its four fields private. The only way to get one is
//! through `Rectangle::new` (or a `TryFrom` conversion), which validates the
//! input. Once built, nothing can change it - there are no setters and no
//! `&mut self` methods - so every `Rectangle` you hold is known to be valid.
//!
//! The `#[derive(...)]` line gives us structural equality (`==` compares the
//! fields) and `Copy`, so rectangles are passed around like plain numbers.

use std::fmt;
use thiserror::Error;

/// Largest magnitude an `f64` can hold while still representing every integer.
const MAX_EXACT_F64: f64 = 9_007_199_254_740_992.0;

/// Errors raised at the geometry construction boundary.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// Width or height not positive, origin negative, or a component that is
    /// not an integer.
    #[error("invalid geometry: origin ({x}, {y}), width {width}, height {height}")]
    InvalidGeometry {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    /// An element of an obstacle list could not be turned into a rectangle.
    #[error("obstacle {index} is not a valid rectangle")]
    InvalidObstacleList {
        index: usize,
        #[source]
        source: Box<GeometryError>,
    },
}

/// An integer point on the plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

impl Point {
    #[inline]
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle with integer origin (lower-left corner), width
/// and height.
///
/// Invariant: `x >= 0`, `y >= 0`, `width > 0`, `height > 0`, and the far
/// corner does not overflow `i64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rectangle {
    x: i64,
    y: i64,
    width: i64,
    height: i64,
}

/// Unvalidated rectangle components, as read from JSON or YAML input.
///
/// Converting into a [`Rectangle`] runs the full validation, including the
/// check that every component is a whole number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectSpec {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

// ============================================================================
// RECTANGLE
// ============================================================================

impl Rectangle {
    /// Create a rectangle from its lower-left corner and size.
    ///
    /// Fails with [`GeometryError::InvalidGeometry`] when the width or height
    /// is not positive or the origin is negative.
    pub fn new(origin: (i64, i64), width: i64, height: i64) -> Result<Self, GeometryError> {
        let (x, y) = origin;
        let invalid = || GeometryError::InvalidGeometry {
            x: x as f64,
            y: y as f64,
            width: width as f64,
            height: height as f64,
        };

        if width <= 0 || height <= 0 || x < 0 || y < 0 {
            return Err(invalid());
        }
        // Far corner must be representable.
        if x.checked_add(width).is_none() || y.checked_add(height).is_none() {
            return Err(invalid());
        }
        if width.checked_mul(height).is_none() {
            return Err(invalid());
        }

        Ok(Self { x, y, width, height })
    }

    /// Build a rectangle the caller has already proven valid.
    ///
    /// Used by the enumerator and the intersection code, which only ever
    /// shrink an existing valid rectangle.
    #[inline]
    pub(crate) fn from_parts(x: i64, y: i64, width: i64, height: i64) -> Self {
        debug_assert!(x >= 0 && y >= 0 && width > 0 && height > 0);
        Self { x, y, width, height }
    }

    #[inline]
    pub fn x(&self) -> i64 {
        self.x
    }

    #[inline]
    pub fn y(&self) -> i64 {
        self.y
    }

    #[inline]
    pub fn width(&self) -> i64 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i64 {
        self.height
    }

    /// X coordinate of the right wall.
    #[inline]
    pub fn right(&self) -> i64 {
        self.x + self.width
    }

    /// Y coordinate of the top wall.
    #[inline]
    pub fn top(&self) -> i64 {
        self.y + self.height
    }

    #[inline]
    pub fn origin(&self) -> Point {
        self.lower_left()
    }

    #[inline]
    pub fn lower_left(&self) -> Point {
        Point::new(self.x, self.y)
    }

    #[inline]
    pub fn lower_right(&self) -> Point {
        Point::new(self.right(), self.y)
    }

    #[inline]
    pub fn top_left(&self) -> Point {
        Point::new(self.x, self.top())
    }

    #[inline]
    pub fn top_right(&self) -> Point {
        Point::new(self.right(), self.top())
    }

    /// The four corners in predicate order: `[LL, TL, LR, TR]`.
    #[inline]
    pub fn corners(&self) -> [Point; 4] {
        [
            self.lower_left(),
            self.top_left(),
            self.lower_right(),
            self.top_right(),
        ]
    }

    #[inline]
    pub fn area(&self) -> i64 {
        self.width * self.height
    }

    /// String form that reads like the constructor call.
    pub fn debug_string(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Rectangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rectangle(({}, {}), {}, {})", self.x, self.y, self.width, self.height)
    }
}

// ============================================================================
// CONVERSIONS
// ============================================================================
//
// ## Rust Lesson #2: TryFrom
//
// `From` is for conversions that cannot fail. `TryFrom` is its fallible
// sibling: it returns a `Result`, and implementing it also gives you
// `spec.try_into()` for free on the other side.

impl RectSpec {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }
}

impl TryFrom<RectSpec> for Rectangle {
    type Error = GeometryError;

    fn try_from(spec: RectSpec) -> Result<Self, Self::Error> {
        let components = [spec.x, spec.y, spec.width, spec.height];
        let integral = components
            .iter()
            .all(|v| v.is_finite() && v.fract() == 0.0 && v.abs() <= MAX_EXACT_F64);

        if !integral {
            return Err(GeometryError::InvalidGeometry {
                x: spec.x,
                y: spec.y,
                width: spec.width,
                height: spec.height,
            });
        }

        Rectangle::new(
            (spec.x as i64, spec.y as i64),
            spec.width as i64,
            spec.height as i64,
        )
    }
}

impl From<Rectangle> for RectSpec {
    fn from(rect: Rectangle) -> Self {
        Self {
            x: rect.x as f64,
            y: rect.y as f64,
            width: rect.width as f64,
            height: rect.height as f64,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
