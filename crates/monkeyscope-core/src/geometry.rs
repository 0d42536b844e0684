//! Geometric primitives for graph layout and rendering.
//!
//! Coordinates follow SVG: the origin is top-left, `x` grows to the right
//! and `y` grows downwards. A graph node's position names the top-left
//! corner of its box.

use serde::{Deserialize, Serialize};

/// A 2D point in view coordinates. Serializes as `{"x": .., "y": ..}`.
///
/// ```
/// # use monkeyscope_core::geometry::Point;
/// let child = Point::new(400.0, 50.0).offset(-100.0, 100.0);
/// assert_eq!(child, Point::new(300.0, 150.0));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn x(self) -> f32 {
        self.x
    }

    pub fn y(self) -> f32 {
        self.y
    }

    /// Returns this point moved by `dx` and `dy`.
    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn width(self) -> f32 {
        self.width
    }

    pub fn height(self) -> f32 {
        self.height
    }
}

/// An axis-aligned rectangle given by its extreme coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    min: Point,
    max: Point,
}

impl Bounds {
    /// Creates the rectangle of `size` whose top-left corner is `top_left`.
    pub fn new_from_top_left(top_left: Point, size: Size) -> Self {
        Self {
            min: top_left,
            max: top_left.offset(size.width, size.height),
        }
    }

    pub fn min_x(self) -> f32 {
        self.min.x
    }

    pub fn min_y(self) -> f32 {
        self.min.y
    }

    pub fn max_x(self) -> f32 {
        self.max.x
    }

    pub fn max_y(self) -> f32 {
        self.max.y
    }

    pub fn width(self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(self) -> f32 {
        self.max.y - self.min.y
    }

    /// Returns the smallest rectangle covering both `self` and `other`.
    ///
    /// ```
    /// # use monkeyscope_core::geometry::{Bounds, Point, Size};
    /// let left = Bounds::new_from_top_left(Point::new(-100.0, 0.0), Size::new(80.0, 40.0));
    /// let right = Bounds::new_from_top_left(Point::new(100.0, 100.0), Size::new(80.0, 40.0));
    ///
    /// let both = left.union(right);
    /// assert_eq!(both.min_x(), -100.0);
    /// assert_eq!(both.width(), 280.0);
    /// assert_eq!(both.height(), 140.0);
    /// ```
    pub fn union(self, other: Self) -> Self {
        Self {
            min: Point::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Point::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }

    /// Grows the rectangle by `margin` on every side.
    pub fn expand(self, margin: f32) -> Self {
        Self {
            min: self.min.offset(-margin, -margin),
            max: self.max.offset(margin, margin),
        }
    }
}
