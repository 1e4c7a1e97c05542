//! Integer points and rectangles in window coordinates
//!
//! The origin is the top-left corner of the client area, with Y growing
//! downwards.

use std::ops::{Add, Sub};

/// A position in window coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Point {
    /// Horizontal coordinate
    pub x: i32,
    /// Vertical coordinate
    pub y: i32,
}

impl Point {
    /// The origin
    pub const ZERO: Self = Self { x: 0, y: 0 };

    /// Create a point
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Truncate floating point cursor coordinates toward zero
    pub fn from_cursor(x: f64, y: f64) -> Self {
        Self::new(x as i32, y as i32)
    }
}

// Arithmetic saturates at the `i32` range.
impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x.saturating_add(rhs.x), self.y.saturating_add(rhs.y))
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x.saturating_sub(rhs.x), self.y.saturating_sub(rhs.y))
    }
}

/// An axis-aligned rectangle; `min` is inclusive and `max` exclusive
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    /// Top-left corner
    pub min: Point,
    /// Bottom-right corner
    pub max: Point,
}

impl Rect {
    /// Create a rectangle from corner coordinates
    pub const fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self {
            min: Point::new(x0, y0),
            max: Point::new(x1, y1),
        }
    }

    /// Rectangle of the given size with its top-left corner at `origin`
    pub const fn from_size(origin: Point, width: i32, height: i32) -> Self {
        Self::new(
            origin.x,
            origin.y,
            origin.x.saturating_add(width),
            origin.y.saturating_add(height),
        )
    }

    /// Width
    pub const fn dx(&self) -> i32 {
        self.max.x.saturating_sub(self.min.x)
    }

    /// Height
    pub const fn dy(&self) -> i32 {
        self.max.y.saturating_sub(self.min.y)
    }

    /// True if the rectangle covers no pixels
    pub const fn is_empty(&self) -> bool {
        self.min.x >= self.max.x || self.min.y >= self.max.y
    }

    /// Rectangle moved by `offset`
    #[must_use]
    pub fn translate(&self, offset: Point) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_truncates_toward_zero() {
        assert_eq!(Point::from_cursor(10.9, -3.7), Point::new(10, -3));
    }

    #[test]
    fn test_rect_size() {
        let r = Rect::from_size(Point::new(5, 10), 20, 30);
        assert_eq!(r, Rect::new(5, 10, 25, 40));
        assert_eq!((r.dx(), r.dy()), (20, 30));
        assert!(!r.is_empty());
        assert!(Rect::new(4, 4, 4, 9).is_empty());
    }

    #[test]
    fn test_translate() {
        let r = Rect::new(0, 0, 2, 3).translate(Point::new(7, 1));
        assert_eq!(r, Rect::new(7, 1, 9, 4));
    }

    #[test]
    fn test_arithmetic_saturates() {
        let far = Point::new(i32::MAX - 1, i32::MIN + 1);
        assert_eq!(far + Point::new(5, -5), Point::new(i32::MAX, i32::MIN));
        assert_eq!(far - Point::new(-5, 5), Point::new(i32::MAX, i32::MIN));

        let r = Rect::from_size(Point::new(i32::MAX - 10, 0), 20, 5);
        assert_eq!(r.max, Point::new(i32::MAX, 5));
        assert_eq!(r.translate(Point::new(100, 0)).min.x, i32::MAX);
        assert_eq!(Rect::new(i32::MIN, 0, i32::MAX, 1).dx(), i32::MAX);
    }
}
