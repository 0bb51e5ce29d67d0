// Copyright 2026 the Gwindow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Affine mapping between a window's logical and device coordinate spaces.
//!
//! The *logical* rectangle is an arbitrary real-valued extent chosen by the
//! application, with Y increasing upward. It is stored as a [`kurbo::Rect`]
//! whose `x0`/`x1` are the left/right edges and whose `y0`/`y1` are the
//! **bottom**/**top** edges. The *device* rectangle is the window's pixel
//! grid, anchored at `(0, 0)` with Y increasing downward.
//!
//! ```text
//!   logical                         device
//!   y1 ┌───────────┐               (0,0) ┌───────────┐
//!      │     ▲ y   │    to_device        │     │ y   │
//!      │     │     │  ───────────►       │     ▼     │
//!   y0 └───────────┘                     └───────────┘ (w,h)
//!      x0         x1
//! ```
//!
//! Zero extents on either side are clamped to one unit before the scale
//! coefficients are computed, so the mapping is always finite.

use kurbo::{Point, Rect};

use crate::geometry::{DevicePoint, DeviceRect, DeviceSize};

/// Per-window logical ↔ device transform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoordinateMapper {
    device: DeviceRect,
    logical: Rect,
    xcoeff: f64,
    ycoeff: f64,
}

impl CoordinateMapper {
    /// Creates a mapper for a device surface of `size` showing `logical`.
    #[must_use]
    pub fn new(size: DeviceSize, logical: Rect) -> Self {
        let mut mapper = Self {
            device: DeviceRect::from_size(size.width, size.height),
            logical,
            xcoeff: 1.0,
            ycoeff: 1.0,
        };
        mapper.recompute();
        mapper
    }

    /// Creates a 1:1 mapper whose logical rectangle matches the device size.
    #[must_use]
    pub fn identity(size: DeviceSize) -> Self {
        Self::new(
            size,
            Rect::new(0.0, 0.0, f64::from(size.width), f64::from(size.height)),
        )
    }

    /// The device rectangle (origin is always `(0, 0)`).
    #[inline]
    #[must_use]
    pub const fn device(&self) -> DeviceRect {
        self.device
    }

    /// The logical rectangle (`y0` is the bottom edge, `y1` the top).
    #[inline]
    #[must_use]
    pub const fn logical(&self) -> Rect {
        self.logical
    }

    /// Device pixels per logical unit along X.
    #[inline]
    #[must_use]
    pub const fn xcoeff(&self) -> f64 {
        self.xcoeff
    }

    /// Device pixels per logical unit along Y.
    #[inline]
    #[must_use]
    pub const fn ycoeff(&self) -> f64 {
        self.ycoeff
    }

    /// Replaces the device size and recomputes the coefficients.
    pub fn set_device_size(&mut self, size: DeviceSize) {
        self.device = DeviceRect::from_size(size.width, size.height);
        self.recompute();
    }

    /// Replaces the logical rectangle and recomputes the coefficients.
    pub fn set_logical(&mut self, logical: Rect) {
        self.logical = logical;
        self.recompute();
    }

    /// Clamps degenerate extents to one unit and recomputes `xcoeff`/`ycoeff`.
    pub fn recompute(&mut self) {
        if self.device.width == 0 {
            self.device.width = 1;
        }
        if self.device.height == 0 {
            self.device.height = 1;
        }
        if self.logical.width() == 0.0 {
            self.logical.x1 = self.logical.x0 + 1.0;
        }
        if self.logical.height() == 0.0 {
            self.logical.y1 = self.logical.y0 + 1.0;
        }
        self.xcoeff = f64::from(self.device.width) / self.logical.width();
        self.ycoeff = f64::from(self.device.height) / self.logical.height();
    }

    /// Maps a logical X coordinate to a device column.
    #[inline]
    #[must_use]
    pub fn map_x(&self, x: f64) -> i32 {
        truncate((x - self.logical.x0) * self.xcoeff)
    }

    /// Maps a logical Y coordinate to a device row (Y flipped).
    #[inline]
    #[must_use]
    pub fn map_y(&self, y: f64) -> i32 {
        truncate((self.logical.y1 - y) * self.ycoeff)
    }

    /// Maps a logical point into device space.
    #[must_use]
    pub fn to_device(&self, p: Point) -> DevicePoint {
        DevicePoint::new(self.map_x(p.x), self.map_y(p.y))
    }

    /// Maps a device point into logical space.
    ///
    /// Any `i32` point is accepted; the offsets are taken in `f64`.
    #[must_use]
    pub fn to_logical(&self, p: DevicePoint) -> Point {
        let dw = f64::from(self.device.width);
        let dh = f64::from(self.device.height);
        let dx = f64::from(p.x) - f64::from(self.device.left());
        let dy = f64::from(self.device.bottom()) - f64::from(p.y);
        Point::new(
            dx * self.logical.width() / dw + self.logical.x0,
            dy * self.logical.height() / dh + self.logical.y0,
        )
    }

    /// Maps a logical rectangle into the device rectangle spanned by its
    /// top-left and bottom-right corners.
    ///
    /// Corners beyond the `i32` range saturate, and so does the extent.
    #[must_use]
    pub fn rect_to_device(&self, r: Rect) -> DeviceRect {
        let left_top = self.to_device(Point::new(r.x0, r.y1));
        let right_bottom = self.to_device(Point::new(r.x1, r.y0));
        DeviceRect::new(
            left_top.x,
            left_top.y,
            right_bottom.x.saturating_sub(left_top.x),
            right_bottom.y.saturating_sub(left_top.y),
        )
    }
}

/// Truncates toward zero, saturating at the `i32` range (NaN maps to 0).
#[allow(
    clippy::cast_possible_truncation,
    reason = "device coordinates are truncated toward zero by definition"
)]
#[inline]
pub(crate) fn truncate(v: f64) -> i32 {
    v as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plot_mapper() -> CoordinateMapper {
        // 400x300 pixels showing x in [-2, 2], y in [-1, 2].
        CoordinateMapper::new(DeviceSize::new(400, 300), Rect::new(-2.0, -1.0, 2.0, 2.0))
    }

    #[test]
    fn coefficients_are_extent_ratios() {
        let m = plot_mapper();
        assert_eq!(m.xcoeff(), 100.0);
        assert_eq!(m.ycoeff(), 100.0);
    }

    #[test]
    fn y_axis_is_flipped() {
        let m = plot_mapper();
        assert_eq!(m.to_device(Point::new(-2.0, 2.0)), DevicePoint::new(0, 0));
        assert_eq!(m.to_device(Point::new(0.0, 0.0)), DevicePoint::new(200, 200));
        assert_eq!(m.to_device(Point::new(2.0, -1.0)), DevicePoint::new(400, 300));
    }

    #[test]
    fn round_trip_within_one_pixel() {
        let m = CoordinateMapper::new(DeviceSize::new(317, 211), Rect::new(-3.3, 0.5, 7.1, 9.25));
        let pixel_x = 1.0 / m.xcoeff();
        let pixel_y = 1.0 / m.ycoeff();
        for i in 0..=20 {
            for j in 0..=20 {
                let p = Point::new(
                    -3.3 + 10.4 * f64::from(i) / 20.0,
                    0.5 + 8.75 * f64::from(j) / 20.0,
                );
                let back = m.to_logical(m.to_device(p));
                assert!(
                    (back.x - p.x).abs() <= pixel_x + 1e-9,
                    "x drift at {p:?}: {back:?}"
                );
                assert!(
                    (back.y - p.y).abs() <= pixel_y + 1e-9,
                    "y drift at {p:?}: {back:?}"
                );
            }
        }
    }

    #[test]
    fn zero_extents_are_clamped() {
        let m = CoordinateMapper::new(DeviceSize::new(0, 0), Rect::new(5.0, 5.0, 5.0, 5.0));
        assert_eq!(m.device(), DeviceRect::from_size(1, 1));
        assert_eq!(m.logical().width(), 1.0);
        assert_eq!(m.logical().height(), 1.0);
        assert_eq!(m.xcoeff(), 1.0);
        assert_eq!(m.ycoeff(), 1.0);
    }

    #[test]
    fn set_device_size_recomputes() {
        let mut m = plot_mapper();
        m.set_device_size(DeviceSize::new(800, 150));
        assert_eq!(m.xcoeff(), 200.0);
        assert_eq!(m.ycoeff(), 50.0);
    }

    #[test]
    fn set_logical_recomputes() {
        let mut m = plot_mapper();
        m.set_logical(Rect::new(0.0, 0.0, 8.0, 0.0));
        assert_eq!(m.xcoeff(), 50.0);
        assert_eq!(m.ycoeff(), 300.0, "zero height clamps to one unit");
    }

    #[test]
    fn logical_rect_maps_to_device_rect() {
        let m = plot_mapper();
        assert_eq!(
            m.rect_to_device(Rect::new(-1.0, 0.0, 1.0, 1.0)),
            DeviceRect::new(100, 100, 200, 100)
        );
    }

    #[test]
    fn far_device_points_map_without_overflow() {
        let m = CoordinateMapper::identity(DeviceSize::new(300, 200));
        assert_eq!(
            m.to_logical(DevicePoint::new(i32::MIN, i32::MIN)),
            Point::new(-2_147_483_648.0, 2_147_483_848.0)
        );
        assert_eq!(
            m.to_logical(DevicePoint::new(i32::MAX, i32::MAX)),
            Point::new(2_147_483_647.0, -2_147_483_447.0)
        );
    }

    #[test]
    fn huge_logical_rects_saturate() {
        let m = CoordinateMapper::identity(DeviceSize::new(300, 200));
        assert_eq!(
            m.rect_to_device(Rect::new(-1e10, -1e10, 1e10, 1e10)),
            DeviceRect::new(i32::MIN, i32::MIN, i32::MAX, i32::MAX)
        );
    }

    #[test]
    fn identity_is_one_to_one() {
        let m = CoordinateMapper::identity(DeviceSize::new(300, 200));
        assert_eq!(m.to_device(Point::new(10.0, 190.0)), DevicePoint::new(10, 10));
        assert_eq!(m.to_logical(DevicePoint::new(10, 10)), Point::new(10.0, 190.0));
    }
}
