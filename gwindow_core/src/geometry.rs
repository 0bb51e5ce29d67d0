// Copyright 2026 the Gwindow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Integer device-space geometry.
//!
//! Device space is the pixel grid of a window surface: the origin is the
//! top-left corner and Y grows downward. Logical space uses [`kurbo`] types
//! directly (see [`mapper`](crate::mapper)).

use core::fmt;

/// A point in device (pixel) coordinates.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DevicePoint {
    /// Horizontal pixel offset from the left edge.
    pub x: i32,
    /// Vertical pixel offset from the top edge.
    pub y: i32,
}

impl DevicePoint {
    /// The origin `(0, 0)`.
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    /// Creates a point from its coordinates.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns this point moved by `(dx, dy)`, saturating at the `i32` range.
    #[inline]
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }

    /// Whether both coordinates fit the signed 16-bit range of the X protocol.
    #[inline]
    #[must_use]
    pub const fn fits_i16(self) -> bool {
        self.x.unsigned_abs() < i16::MAX as u32 && self.y.unsigned_abs() < i16::MAX as u32
    }
}

impl fmt::Debug for DevicePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DevicePoint({}, {})", self.x, self.y)
    }
}

/// An axis-aligned rectangle in device coordinates.
///
/// `x`/`y` is the top-left corner. A rectangle with a non-positive width or
/// height is empty.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DeviceRect {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
}

impl DeviceRect {
    /// Creates a rectangle from its top-left corner and size.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates a rectangle anchored at the origin.
    #[inline]
    #[must_use]
    pub const fn from_size(width: i32, height: i32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Creates the rectangle spanned by two corners, in any order.
    #[must_use]
    pub fn from_corners(a: DevicePoint, b: DevicePoint) -> Self {
        let x = a.x.min(b.x);
        let y = a.y.min(b.y);
        Self::new(
            x,
            y,
            a.x.max(b.x).saturating_sub(x),
            a.y.max(b.y).saturating_sub(y),
        )
    }

    /// The top-left corner.
    #[inline]
    #[must_use]
    pub const fn origin(self) -> DevicePoint {
        DevicePoint::new(self.x, self.y)
    }

    /// Left edge.
    #[inline]
    #[must_use]
    pub const fn left(self) -> i32 {
        self.x
    }

    /// Top edge.
    #[inline]
    #[must_use]
    pub const fn top(self) -> i32 {
        self.y
    }

    /// Exclusive right edge.
    #[inline]
    #[must_use]
    pub const fn right(self) -> i32 {
        self.x.saturating_add(self.width)
    }

    /// Exclusive bottom edge.
    #[inline]
    #[must_use]
    pub const fn bottom(self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// Whether the rectangle covers no pixels.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Whether `p` lies inside the rectangle.
    #[inline]
    #[must_use]
    pub const fn contains(self, p: DevicePoint) -> bool {
        p.x >= self.x && p.x < self.right() && p.y >= self.y && p.y < self.bottom()
    }

    /// The smallest rectangle containing both `self` and `other`.
    ///
    /// This is a bounding box, not a region union: two disjoint rectangles
    /// produce a box that also covers the gap between them.
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Self::new(x, y, right.saturating_sub(x), bottom.saturating_sub(y))
    }

    /// Converts to a `kurbo` rectangle with the same (Y-down) edges.
    #[must_use]
    pub fn to_kurbo(self) -> kurbo::Rect {
        kurbo::Rect::new(
            f64::from(self.x),
            f64::from(self.y),
            f64::from(self.right()),
            f64::from(self.bottom()),
        )
    }
}

impl fmt::Debug for DeviceRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DeviceRect({}, {}, {}x{})",
            self.x, self.y, self.width, self.height
        )
    }
}

/// Width and height of a window surface, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct DeviceSize {
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
}

impl DeviceSize {
    /// Creates a size.
    #[inline]
    #[must_use]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_is_bounding_box() {
        let a = DeviceRect::new(0, 0, 10, 10);
        let b = DeviceRect::new(5, 5, 20, 20);
        assert_eq!(a.union(b), DeviceRect::new(0, 0, 25, 25));
        assert_eq!(b.union(a), DeviceRect::new(0, 0, 25, 25));
    }

    #[test]
    fn union_of_disjoint_rects_covers_the_gap() {
        let a = DeviceRect::new(0, 0, 2, 2);
        let b = DeviceRect::new(10, 10, 2, 2);
        let u = a.union(b);
        assert_eq!(u, DeviceRect::new(0, 0, 12, 12));
        assert!(u.contains(DevicePoint::new(6, 6)), "gap is part of the box");
    }

    #[test]
    fn union_saturates_at_the_i32_range() {
        let far = DeviceRect::new(i32::MIN, i32::MIN, i32::MAX, i32::MAX);
        let u = far.union(DeviceRect::new(10, 10, 50, 50));
        assert_eq!(u, DeviceRect::new(i32::MIN, i32::MIN, i32::MAX, i32::MAX));
    }

    #[test]
    fn from_corners_normalizes() {
        let r = DeviceRect::from_corners(DevicePoint::new(30, 5), DevicePoint::new(10, 25));
        assert_eq!(r, DeviceRect::new(10, 5, 20, 20));
    }

    #[test]
    fn fits_i16_boundary() {
        assert!(DevicePoint::new(32_766, -32_766).fits_i16());
        assert!(!DevicePoint::new(32_767, 0).fits_i16());
        assert!(!DevicePoint::new(0, i32::MIN).fits_i16());
    }

    #[test]
    fn empty_and_contains() {
        assert!(DeviceRect::from_size(0, 5).is_empty());
        let r = DeviceRect::from_size(4, 4);
        assert!(r.contains(DevicePoint::new(3, 3)));
        assert!(!r.contains(DevicePoint::new(4, 0)));
    }
}
