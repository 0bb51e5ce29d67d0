// Copyright 2026 the Gwindow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-window state and native resource lifecycle.

use alloc::string::String;

use kurbo::{Point, Rect};

use crate::error::DisplayError;
use crate::event::NativeWindow;
use crate::expose::{ExposeState, ExposureAccumulator};
use crate::geometry::{DevicePoint, DeviceRect, DeviceSize};
use crate::mapper::CoordinateMapper;
use crate::native::{
    NativeDisplay, NativeGc, NativeWindowParams, Pixel, WindowAttributes, WindowClass,
};
use crate::registry::WindowId;

/// Longest title kept, in bytes.
pub const MAX_TITLE_LEN: usize = 127;

/// Title used when none is configured.
pub const DEFAULT_TITLE: &str = "Graphic Window";

/// Border width used when none is configured.
pub const DEFAULT_BORDER_WIDTH: u16 = 2;

/// Construction parameters for a window.
///
/// ```rust
/// use gwindow_core::geometry::DeviceRect;
/// use gwindow_core::window::WindowConfig;
/// use kurbo::Rect;
///
/// let config = WindowConfig::new(DeviceRect::new(40, 40, 640, 480))
///     .with_coordinates(Rect::new(-4.0, -3.0, 4.0, 3.0))
///     .with_title("plot")
///     .with_background("white")
///     .with_foreground("navy");
/// assert_eq!(config.title.as_deref(), Some("plot"));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct WindowConfig {
    /// On-screen frame: the origin is the window position, the size the
    /// device surface.
    pub frame: DeviceRect,
    /// Logical coordinate rectangle (`y0` bottom, `y1` top). Defaults to
    /// `0..width × 0..height`.
    pub coordinates: Option<Rect>,
    /// Window title; defaults to [`DEFAULT_TITLE`].
    pub title: Option<String>,
    /// Parent window; `None` creates a top-level window.
    pub parent: Option<WindowId>,
    /// Border width in pixels.
    pub border_width: u16,
    /// Native window class.
    pub class: WindowClass,
    /// Native visual id; `None` copies the parent's.
    pub visual: Option<u32>,
    /// Raw native attribute overrides.
    pub attributes: Option<WindowAttributes>,
    /// Background color name; `None` uses the screen's white pixel.
    pub background: Option<String>,
    /// Foreground color name; `None` uses the screen's black pixel.
    pub foreground: Option<String>,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self::new(DeviceRect::new(0, 0, 300, 200))
    }
}

impl WindowConfig {
    /// A top-level window occupying `frame`, with default everything else.
    #[must_use]
    pub fn new(frame: DeviceRect) -> Self {
        Self {
            frame,
            coordinates: None,
            title: None,
            parent: None,
            border_width: DEFAULT_BORDER_WIDTH,
            class: WindowClass::InputOutput,
            visual: None,
            attributes: None,
            background: None,
            foreground: None,
        }
    }

    /// Sets the logical coordinate rectangle.
    #[must_use]
    pub fn with_coordinates(mut self, coordinates: Rect) -> Self {
        self.coordinates = Some(coordinates);
        self
    }

    /// Sets the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Makes the window a child of `parent`.
    #[must_use]
    pub fn with_parent(mut self, parent: WindowId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Sets the border width.
    #[must_use]
    pub fn with_border_width(mut self, border_width: u16) -> Self {
        self.border_width = border_width;
        self
    }

    /// Sets the native window class.
    #[must_use]
    pub fn with_class(mut self, class: WindowClass) -> Self {
        self.class = class;
        self
    }

    /// Sets the native visual.
    #[must_use]
    pub fn with_visual(mut self, visual: u32) -> Self {
        self.visual = Some(visual);
        self
    }

    /// Sets raw native attribute overrides.
    #[must_use]
    pub fn with_attributes(mut self, attributes: WindowAttributes) -> Self {
        self.attributes = Some(attributes);
        self
    }

    /// Sets the background color by name.
    #[must_use]
    pub fn with_background(mut self, name: impl Into<String>) -> Self {
        self.background = Some(name.into());
        self
    }

    /// Sets the foreground color by name.
    #[must_use]
    pub fn with_foreground(mut self, name: impl Into<String>) -> Self {
        self.foreground = Some(name.into());
        self
    }
}

/// A window: geometry in both coordinate spaces, pen, colors, and the
/// native resources backing it.
#[derive(Clone, Debug)]
pub struct Window {
    native: Option<NativeWindow>,
    gc: Option<NativeGc>,
    created: bool,
    position: DevicePoint,
    mapper: CoordinateMapper,
    pen_device: DevicePoint,
    pen_logical: Point,
    background: Pixel,
    foreground: Pixel,
    pub(crate) background_name: Option<String>,
    pub(crate) foreground_name: Option<String>,
    border_width: u16,
    class: WindowClass,
    visual: Option<u32>,
    attributes: Option<WindowAttributes>,
    title: String,
    exposure: ExposureAccumulator,
    clip: DeviceRect,
    close_requested: bool,
}

impl Window {
    /// Builds the (not yet created) window described by `config`.
    #[must_use]
    pub fn from_config(config: &WindowConfig) -> Self {
        let size = DeviceSize::new(config.frame.width, config.frame.height);
        let mapper = match config.coordinates {
            Some(coordinates) => CoordinateMapper::new(size, coordinates),
            None => CoordinateMapper::identity(size),
        };
        let pen_logical = Point::ZERO;
        Self {
            native: None,
            gc: None,
            created: false,
            position: config.frame.origin(),
            pen_device: mapper.to_device(pen_logical),
            pen_logical,
            clip: mapper.device(),
            mapper,
            background: Pixel::default(),
            foreground: Pixel::default(),
            background_name: config.background.clone(),
            foreground_name: config.foreground.clone(),
            border_width: config.border_width,
            class: config.class,
            visual: config.visual,
            attributes: config.attributes,
            title: bounded_title(config.title.as_deref().unwrap_or(DEFAULT_TITLE)),
            exposure: ExposureAccumulator::new(),
            close_requested: false,
        }
    }

    // -- Accessors --

    /// Native window id, while created.
    #[inline]
    #[must_use]
    pub const fn native(&self) -> Option<NativeWindow> {
        self.native
    }

    /// Native graphics context, while created.
    #[inline]
    #[must_use]
    pub const fn gc(&self) -> Option<NativeGc> {
        self.gc
    }

    /// Whether native resources are allocated.
    #[inline]
    #[must_use]
    pub const fn is_created(&self) -> bool {
        self.created
    }

    /// On-screen position relative to the parent.
    #[inline]
    #[must_use]
    pub const fn position(&self) -> DevicePoint {
        self.position
    }

    /// Device rectangle; the origin is always `(0, 0)`.
    #[inline]
    #[must_use]
    pub const fn device_rect(&self) -> DeviceRect {
        self.mapper.device()
    }

    /// Logical rectangle (`y0` bottom, `y1` top).
    #[inline]
    #[must_use]
    pub const fn logical_rect(&self) -> Rect {
        self.mapper.logical()
    }

    /// The coordinate mapper.
    #[inline]
    #[must_use]
    pub const fn mapper(&self) -> &CoordinateMapper {
        &self.mapper
    }

    /// Pen position in device space.
    #[inline]
    #[must_use]
    pub const fn pen(&self) -> DevicePoint {
        self.pen_device
    }

    /// Pen position in logical space.
    #[inline]
    #[must_use]
    pub const fn pen_logical(&self) -> Point {
        self.pen_logical
    }

    /// Current background pixel.
    #[inline]
    #[must_use]
    pub const fn background(&self) -> Pixel {
        self.background
    }

    /// Current foreground pixel.
    #[inline]
    #[must_use]
    pub const fn foreground(&self) -> Pixel {
        self.foreground
    }

    /// Border width in pixels.
    #[inline]
    #[must_use]
    pub const fn border_width(&self) -> u16 {
        self.border_width
    }

    /// Window title.
    #[inline]
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Rectangle drawing is currently clipped to.
    #[inline]
    #[must_use]
    pub const fn clip(&self) -> DeviceRect {
        self.clip
    }

    /// Exposure accumulator state.
    #[inline]
    #[must_use]
    pub const fn exposure_state(&self) -> ExposeState {
        self.exposure.state()
    }

    // -- Pen and coordinates --

    pub(crate) fn move_pen(&mut self, p: DevicePoint) {
        self.pen_device = p;
        self.pen_logical = self.mapper.to_logical(p);
    }

    pub(crate) fn move_pen_logical(&mut self, p: Point) {
        self.pen_logical = p;
        self.pen_device = self.mapper.to_device(p);
    }

    pub(crate) fn set_logical(&mut self, logical: Rect) {
        self.mapper.set_logical(logical);
        self.pen_device = self.mapper.to_device(self.pen_logical);
    }

    /// Applies a new surface size. Returns `false` when the size is unchanged.
    pub(crate) fn resize(&mut self, size: DeviceSize) -> bool {
        let current = self.mapper.device();
        if current.width == size.width && current.height == size.height {
            return false;
        }
        self.mapper.set_device_size(size);
        self.pen_device = self.mapper.to_device(self.pen_logical);
        true
    }

    pub(crate) fn set_title(&mut self, title: &str) {
        self.title = bounded_title(title);
    }

    pub(crate) fn set_foreground_pixel(&mut self, pixel: Pixel) {
        self.foreground = pixel;
    }

    pub(crate) fn set_background_pixel(&mut self, pixel: Pixel) {
        self.background = pixel;
    }

    pub(crate) fn set_clip(&mut self, clip: DeviceRect) {
        self.clip = clip;
    }

    pub(crate) fn exposure_mut(&mut self) -> &mut ExposureAccumulator {
        &mut self.exposure
    }

    pub(crate) fn request_close(&mut self) {
        self.close_requested = true;
    }

    pub(crate) fn take_close_request(&mut self) -> bool {
        core::mem::replace(&mut self.close_requested, false)
    }

    /// Native window and GC, or [`DisplayError::NotCreated`].
    pub(crate) fn target(&self) -> Result<(NativeWindow, NativeGc), DisplayError> {
        match (self.native, self.gc) {
            (Some(window), Some(gc)) if self.created => Ok((window, gc)),
            _ => Err(DisplayError::NotCreated),
        }
    }

    // -- Native lifecycle --

    /// Allocates colors, the native window and its GC, then maps it and
    /// registers the close protocol.
    ///
    /// Partially allocated resources are left in place on error; the caller
    /// releases them with [`release`](Self::release).
    pub(crate) fn create_native(
        &mut self,
        display: &mut dyn NativeDisplay,
        parent: Option<NativeWindow>,
    ) -> Result<(), DisplayError> {
        if self.created {
            return Ok(());
        }

        self.background = match &self.background_name {
            Some(name) => display.alloc_named_color(name)?,
            None => display.white_pixel(),
        };
        self.foreground = match &self.foreground_name {
            Some(name) => display.alloc_named_color(name)?,
            None => display.black_pixel(),
        };

        let native = display.create_window(&NativeWindowParams {
            parent,
            position: self.position,
            size: DeviceSize::new(self.mapper.device().width, self.mapper.device().height),
            border_width: self.border_width,
            class: self.class,
            visual: self.visual,
            background: self.background,
            foreground: self.foreground,
            attributes: self.attributes,
        })?;
        self.native = Some(native);

        display.set_title(native, &self.title)?;
        self.gc = Some(display.create_gc(native, self.foreground, self.background)?);
        display.clear_window(native)?;
        display.map_raised(native)?;
        display.register_close_protocol(native)?;

        self.clip = self.mapper.device();
        self.exposure.reset();
        self.created = true;
        Ok(())
    }

    /// Releases the GC and native window.
    ///
    /// Returns whether the window was counted as created, together with the
    /// first error reported by the display. Bookkeeping is updated even when
    /// a release request fails.
    pub(crate) fn release(
        &mut self,
        display: &mut dyn NativeDisplay,
    ) -> (bool, Result<(), DisplayError>) {
        let was_created = core::mem::replace(&mut self.created, false);
        let gc_result = self.gc.take().map_or(Ok(()), |gc| display.free_gc(gc));
        let window_result = self
            .native
            .take()
            .map_or(Ok(()), |window| display.destroy_window(window));
        self.exposure.reset();
        self.close_requested = false;
        self.clip = self.mapper.device();
        (was_created, gc_result.and(window_result))
    }

    /// Forgets a native window the server has already destroyed and frees
    /// the GC.
    pub(crate) fn release_destroyed(
        &mut self,
        display: &mut dyn NativeDisplay,
    ) -> (bool, Result<(), DisplayError>) {
        self.native = None;
        self.release(display)
    }
}

/// Truncates `title` to at most [`MAX_TITLE_LEN`] bytes on a char boundary.
fn bounded_title(title: &str) -> String {
    if title.len() <= MAX_TITLE_LEN {
        return title.into();
    }
    let mut end = MAX_TITLE_LEN;
    while !title.is_char_boundary(end) {
        end -= 1;
    }
    title[..end].into()
}
