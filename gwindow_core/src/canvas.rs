// Copyright 2026 the Gwindow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Clipped drawing primitives in device and logical coordinates.
//!
//! A [`Canvas`] pairs one window with the display connection for the length
//! of a hook call (or a [`Context::canvas`](crate::context::Context::canvas)
//! borrow). Every primitive comes in a device-space (`i32`) and a
//! logical-space (`f64`, suffixed `_logical`) flavour; both end in a single
//! device-space native call.
//!
//! Line drawing maintains a *pen*: after any line, the pen sits on the
//! line's end point, stored in both coordinate spaces.

use kurbo::{Line, Point, Rect, Vec2};
#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use crate::clip::clip_line;
use crate::error::DisplayError;
use crate::geometry::{DevicePoint, DeviceRect};
use crate::mapper::truncate;
use crate::native::{FontId, FontMetrics, NativeDisplay, Pixel};
use crate::registry::WindowId;
use crate::window::Window;

/// Drawing surface for one window.
pub struct Canvas<'a> {
    display: &'a mut dyn NativeDisplay,
    window: &'a mut Window,
    id: WindowId,
}

impl core::fmt::Debug for Canvas<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Canvas")
            .field("id", &self.id)
            .field("window", &self.window)
            .finish_non_exhaustive()
    }
}

impl<'a> Canvas<'a> {
    pub(crate) fn new(
        display: &'a mut dyn NativeDisplay,
        window: &'a mut Window,
        id: WindowId,
    ) -> Self {
        Self {
            display,
            window,
            id,
        }
    }

    /// Handle of the window being drawn.
    #[inline]
    #[must_use]
    pub fn id(&self) -> WindowId {
        self.id
    }

    /// The window being drawn.
    #[inline]
    #[must_use]
    pub fn window(&self) -> &Window {
        self.window
    }

    pub(crate) fn window_mut(&mut self) -> &mut Window {
        self.window
    }

    /// Restricts drawing to `rect` without requesting a repaint.
    pub(crate) fn clip_to(&mut self, rect: DeviceRect) -> Result<(), DisplayError> {
        if let Some(gc) = self.window.gc() {
            self.display.set_clip_rectangle(gc, rect)?;
        }
        self.window.set_clip(rect);
        Ok(())
    }

    // -- Pen --

    /// Moves the pen to a device point.
    pub fn move_to(&mut self, p: DevicePoint) {
        self.window.move_pen(p);
    }

    /// Moves the pen to a logical point.
    pub fn move_to_logical(&mut self, p: Point) {
        self.window.move_pen_logical(p);
    }

    /// Moves the pen by a device offset.
    pub fn move_rel(&mut self, dx: i32, dy: i32) {
        let p = self.window.pen().offset(dx, dy);
        self.window.move_pen(p);
    }

    /// Moves the pen by a logical offset.
    pub fn move_rel_logical(&mut self, v: Vec2) {
        let p = self.window.pen_logical() + v;
        self.window.move_pen_logical(p);
    }

    // -- Lines --

    /// Draws a line between two device points and leaves the pen on `to`.
    ///
    /// Endpoints outside the 16-bit protocol range are first clipped to the
    /// device rectangle.
    pub fn draw_line(&mut self, from: DevicePoint, to: DevicePoint) -> Result<(), DisplayError> {
        let (window, gc) = self.window.target()?;
        if from.fits_i16() && to.fits_i16() {
            self.display.draw_line(window, gc, from, to)?;
        } else if let Some(seg) = clip_line(
            self.window.device_rect().to_kurbo(),
            Line::new(to_point(from), to_point(to)),
        ) {
            self.display
                .draw_line(window, gc, round(seg.p0), round(seg.p1))?;
        }
        self.window.move_pen(to);
        Ok(())
    }

    /// Draws a line between two logical points and leaves the pen on `to`.
    ///
    /// The segment is clipped to the logical rectangle first; if nothing is
    /// visible no native call is made.
    pub fn draw_line_logical(&mut self, from: Point, to: Point) -> Result<(), DisplayError> {
        let (window, gc) = self.window.target()?;
        if let Some(seg) = clip_line(self.window.logical_rect(), Line::new(from, to)) {
            let mapper = self.window.mapper();
            let (a, b) = (mapper.to_device(seg.p0), mapper.to_device(seg.p1));
            self.display.draw_line(window, gc, a, b)?;
        }
        self.window.move_pen_logical(to);
        Ok(())
    }

    /// Draws from the pen to a device point.
    pub fn draw_line_to(&mut self, p: DevicePoint) -> Result<(), DisplayError> {
        self.draw_line(self.window.pen(), p)
    }

    /// Draws from the pen to a logical point.
    pub fn draw_line_to_logical(&mut self, p: Point) -> Result<(), DisplayError> {
        self.draw_line_logical(self.window.pen_logical(), p)
    }

    /// Draws from the pen by a device offset.
    pub fn draw_line_rel(&mut self, dx: i32, dy: i32) -> Result<(), DisplayError> {
        self.draw_line_to(self.window.pen().offset(dx, dy))
    }

    /// Draws from the pen by a logical offset.
    pub fn draw_line_rel_logical(&mut self, v: Vec2) -> Result<(), DisplayError> {
        self.draw_line_to_logical(self.window.pen_logical() + v)
    }

    // -- Rectangles and text --

    /// Fills a device rectangle with the foreground color.
    pub fn fill_rectangle(&mut self, rect: DeviceRect) -> Result<(), DisplayError> {
        let (window, gc) = self.window.target()?;
        self.display.fill_rectangle(window, gc, rect)
    }

    /// Fills a logical rectangle (`y0` bottom, `y1` top) with the foreground
    /// color.
    pub fn fill_rectangle_logical(&mut self, rect: Rect) -> Result<(), DisplayError> {
        let device = self.window.mapper().rect_to_device(rect);
        self.fill_rectangle(device)
    }

    /// Draws `text` with its baseline origin at a device point.
    ///
    /// `len` limits the output to a byte prefix; `None` draws the whole
    /// string.
    pub fn draw_string(
        &mut self,
        at: DevicePoint,
        text: &str,
        len: Option<usize>,
    ) -> Result<(), DisplayError> {
        let (window, gc) = self.window.target()?;
        let bytes = text.as_bytes();
        let n = len.map_or(bytes.len(), |n| n.min(bytes.len()));
        self.display.draw_string(window, gc, at, &bytes[..n])
    }

    /// Draws `text` with its baseline origin at a logical point.
    pub fn draw_string_logical(
        &mut self,
        at: Point,
        text: &str,
        len: Option<usize>,
    ) -> Result<(), DisplayError> {
        let at = self.window.mapper().to_device(at);
        self.draw_string(at, text, len)
    }

    /// Draws coordinate axes through the logical origin, with unit ticks and
    /// `x`/`y` labels. With `draw_grid`, integer grid lines are drawn first
    /// in `grid_color`.
    pub fn draw_axes(
        &mut self,
        axes_color: Option<&str>,
        draw_grid: bool,
        grid_color: Option<&str>,
    ) -> Result<(), DisplayError> {
        let r = self.window.logical_rect();
        if draw_grid {
            if let Some(color) = grid_color {
                self.set_foreground_named(color)?;
            }
            for i in truncate(r.x0.ceil())..=truncate(r.x1.floor()) {
                if i != 0 {
                    let x = f64::from(i);
                    self.draw_line_logical(Point::new(x, r.y0), Point::new(x, r.y1))?;
                }
            }
            for i in truncate(r.y0.ceil())..=truncate(r.y1.floor()) {
                if i != 0 {
                    let y = f64::from(i);
                    self.draw_line_logical(Point::new(r.x0, y), Point::new(r.x1, y))?;
                }
            }
        }

        if let Some(color) = axes_color {
            self.set_foreground_named(color)?;
        }
        self.draw_line_logical(Point::new(r.x0, 0.0), Point::new(r.x1, 0.0))?;
        self.draw_line_logical(Point::new(0.0, r.y0), Point::new(0.0, r.y1))?;

        // Unit ticks.
        self.draw_line_logical(Point::new(1.0, -0.1), Point::new(1.0, 0.1))?;
        self.draw_line_logical(Point::new(-0.1, 1.0), Point::new(0.1, 1.0))?;

        let (w, h) = (r.width(), r.height());
        self.draw_string_logical(Point::new(r.x0 + w * 0.9, -h * 0.06), "x", None)?;
        self.draw_string_logical(Point::new(w * 0.03, r.y0 + h * 0.9), "y", None)
    }

    // -- Colors --

    /// Allocates a named color.
    pub fn allocate_color(&mut self, name: &str) -> Result<Pixel, DisplayError> {
        self.display.alloc_named_color(name)
    }

    /// Sets the drawing color.
    pub fn set_foreground(&mut self, pixel: Pixel) -> Result<(), DisplayError> {
        if let Some(gc) = self.window.gc() {
            self.display.set_foreground(gc, pixel)?;
        }
        self.window.set_foreground_pixel(pixel);
        Ok(())
    }

    /// Sets the drawing color by name.
    ///
    /// Before the window is created the name is stored and resolved at
    /// creation time.
    pub fn set_foreground_named(&mut self, name: &str) -> Result<(), DisplayError> {
        if !self.window.is_created() {
            self.window.foreground_name = Some(name.into());
            return Ok(());
        }
        let pixel = self.display.alloc_named_color(name)?;
        self.set_foreground(pixel)
    }

    /// Sets the background color.
    pub fn set_background(&mut self, pixel: Pixel) -> Result<(), DisplayError> {
        if let Some(gc) = self.window.gc() {
            self.display.set_background(gc, pixel)?;
        }
        self.window.set_background_pixel(pixel);
        Ok(())
    }

    /// Sets the background color by name; see
    /// [`set_foreground_named`](Self::set_foreground_named).
    pub fn set_background_named(&mut self, name: &str) -> Result<(), DisplayError> {
        if !self.window.is_created() {
            self.window.background_name = Some(name.into());
            return Ok(());
        }
        let pixel = self.display.alloc_named_color(name)?;
        self.set_background(pixel)
    }

    // -- Fonts --

    /// Loads a server font.
    pub fn load_font(&mut self, name: &str) -> Result<FontId, DisplayError> {
        self.display.load_font(name)
    }

    /// Unloads a server font.
    pub fn unload_font(&mut self, font: FontId) -> Result<(), DisplayError> {
        self.display.unload_font(font)
    }

    /// Queries font metrics.
    pub fn query_font(&mut self, font: FontId) -> Result<FontMetrics, DisplayError> {
        self.display.query_font(font)
    }

    /// Selects the font used by text drawing.
    pub fn set_font(&mut self, font: FontId) -> Result<(), DisplayError> {
        let (_, gc) = self.window.target()?;
        self.display.set_font(gc, font)
    }

    // -- Repaint requests --

    /// Requests a repaint of the whole window.
    pub fn redraw(&mut self) -> Result<(), DisplayError> {
        if !self.window.is_created() {
            return Ok(());
        }
        self.redraw_rect(self.window.device_rect())
    }

    /// Requests a repaint of a device rectangle.
    ///
    /// Drawing is clipped to `rect` and a synthetic expose event is queued;
    /// the repaint hook runs when the dispatcher receives it.
    pub fn redraw_rect(&mut self, rect: DeviceRect) -> Result<(), DisplayError> {
        let (window, gc) = self.window.target()?;
        self.display.set_clip_rectangle(gc, rect)?;
        self.window.set_clip(rect);
        self.display.send_expose(window, rect)
    }

    /// Requests a repaint of a logical rectangle.
    pub fn redraw_rect_logical(&mut self, rect: Rect) -> Result<(), DisplayError> {
        let device = self.window.mapper().rect_to_device(rect);
        self.redraw_rect(device)
    }

    // -- Window metadata --

    /// Replaces the logical coordinate rectangle (`y0` bottom, `y1` top).
    pub fn set_coordinates(&mut self, logical: Rect) {
        self.window.set_logical(logical);
    }

    /// Sets the logical rectangle from its bottom-left corner and extent.
    pub fn set_coordinates_from(&mut self, xmin: f64, ymin: f64, width: f64, height: f64) {
        self.set_coordinates(Rect::new(xmin, ymin, xmin + width, ymin + height));
    }

    /// Sets the logical rectangle from its bottom-left and top-right corners.
    pub fn set_coordinates_corners(&mut self, left_bottom: Point, right_top: Point) {
        self.set_coordinates(Rect::new(left_bottom.x, left_bottom.y, right_top.x, right_top.y));
    }

    /// Changes the window title (truncated to
    /// [`MAX_TITLE_LEN`](crate::window::MAX_TITLE_LEN) bytes).
    pub fn set_title(&mut self, title: &str) -> Result<(), DisplayError> {
        self.window.set_title(title);
        match self.window.native() {
            Some(native) if self.window.is_created() => {
                self.display.set_title(native, self.window.title())
            }
            _ => Ok(()),
        }
    }

    /// Asks the dispatcher to destroy this window once the current hook
    /// returns.
    pub fn close(&mut self) {
        self.window.request_close();
    }
}

fn to_point(p: DevicePoint) -> Point {
    Point::new(f64::from(p.x), f64::from(p.y))
}

fn round(p: Point) -> DevicePoint {
    DevicePoint::new(truncate(p.x + 0.5), truncate(p.y + 0.5))
}
