// Copyright 2026 the Gwindow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend contract for native display servers.
//!
//! `gwindow_core` never talks to a display server directly. Everything that
//! allocates a native resource, draws, or reads events goes through the
//! [`NativeDisplay`] trait. Backend crates (e.g. `gwindow_backend_x11`)
//! implement it; [`HeadlessDisplay`](crate::headless::HeadlessDisplay) is an
//! in-memory implementation for tests and off-screen use.
//!
//! # Crate boundaries
//!
//! The core owns windows, coordinate mapping, exposure coalescing and event
//! routing. A backend owns the connection, the protocol atoms negotiated at
//! connect time, and the translation of wire events into [`NativeEvent`]s.
//! The connection is opened by the caller and handed to a
//! [`Context`](crate::context::Context); the context never opens or closes it
//! implicitly.
//!
//! The trait is object safe: drawing hooks receive a
//! [`Canvas`](crate::canvas::Canvas) holding `&mut dyn NativeDisplay`.

use alloc::string::String;
use core::time::Duration;

use crate::error::DisplayError;
use crate::event::{NativeEvent, NativeWindow, ProtocolAtoms};
use crate::geometry::{DevicePoint, DeviceRect, DeviceSize};

/// A native graphics-context identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NativeGc(pub u32);

/// An allocated color value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Pixel(pub u32);

/// A loaded server-side font.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FontId(pub u32);

/// Metrics of a loaded font, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct FontMetrics {
    /// Distance from the baseline to the top of the tallest glyph.
    pub ascent: i16,
    /// Distance from the baseline to the bottom of the lowest glyph.
    pub descent: i16,
    /// Widest glyph advance.
    pub max_advance: i16,
}

impl FontMetrics {
    /// Line height (`ascent + descent`).
    #[must_use]
    pub const fn line_height(&self) -> i32 {
        self.ascent as i32 + self.descent as i32
    }
}

/// Native window class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum WindowClass {
    /// Inherit the parent's class.
    CopyFromParent,
    /// A normal, drawable window.
    #[default]
    InputOutput,
    /// An invisible window that only receives input.
    InputOnly,
}

/// Raw window attribute overrides, applied on top of the defaults.
///
/// Fields left `None` keep the backend default.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct WindowAttributes {
    /// Background pixel (otherwise the resolved background color).
    pub background_pixel: Option<Pixel>,
    /// Border pixel (otherwise the resolved foreground color).
    pub border_pixel: Option<Pixel>,
    /// Bypass the window manager.
    pub override_redirect: Option<bool>,
    /// Ask the server to keep the contents when obscured.
    pub backing_store: Option<bool>,
    /// Keep the contents under the window when it is mapped.
    pub save_under: Option<bool>,
}

/// Everything a backend needs to allocate one native window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NativeWindowParams {
    /// Parent window; `None` means the screen's root window.
    pub parent: Option<NativeWindow>,
    /// On-screen position relative to the parent.
    pub position: DevicePoint,
    /// Surface size.
    pub size: DeviceSize,
    /// Border width in pixels.
    pub border_width: u16,
    /// Window class.
    pub class: WindowClass,
    /// Visual id; `None` copies the parent's.
    pub visual: Option<u32>,
    /// Resolved background color.
    pub background: Pixel,
    /// Resolved foreground (and default border) color.
    pub foreground: Pixel,
    /// Raw attribute overrides.
    pub attributes: Option<WindowAttributes>,
}

/// Operations the core needs from a display connection.
///
/// Implementations translate each call into native requests. Drawing calls
/// may be buffered; [`flush`](Self::flush) is called by the dispatch loop
/// before it waits for events.
pub trait NativeDisplay {
    // -- Connection --

    /// Atoms negotiated for the window-manager close handshake.
    fn protocol_atoms(&self) -> ProtocolAtoms;

    /// Size of the default screen in pixels.
    fn screen_size(&self) -> DeviceSize;

    /// Sends buffered requests to the server.
    fn flush(&mut self) -> Result<(), DisplayError>;

    /// Returns the next pending event without blocking.
    ///
    /// Only events of interest to the core are returned; anything else is
    /// consumed and skipped.
    fn poll_event(&mut self) -> Result<Option<NativeEvent>, DisplayError>;

    /// Suspends the calling thread for `interval` when no event is pending.
    fn wait_idle(&mut self, interval: Duration);

    // -- Colors --

    /// The screen's default white pixel.
    fn white_pixel(&self) -> Pixel;

    /// The screen's default black pixel.
    fn black_pixel(&self) -> Pixel;

    /// Allocates a color by name (e.g. `"red"`, `"#40a0ff"`) in the default
    /// colormap.
    fn alloc_named_color(&mut self, name: &str) -> Result<Pixel, DisplayError>;

    // -- Window resources --

    /// Creates and returns a native window subscribed to the core's event mask.
    ///
    /// The window is not mapped; see [`map_raised`](Self::map_raised).
    fn create_window(&mut self, params: &NativeWindowParams) -> Result<NativeWindow, DisplayError>;

    /// Sets the window name and icon name.
    fn set_title(&mut self, window: NativeWindow, title: &str) -> Result<(), DisplayError>;

    /// Registers the close-window protocol so the window manager sends a
    /// close request instead of killing the client.
    fn register_close_protocol(&mut self, window: NativeWindow) -> Result<(), DisplayError>;

    /// Clears the window to its background.
    fn clear_window(&mut self, window: NativeWindow) -> Result<(), DisplayError>;

    /// Maps the window and raises it to the top of the stack.
    fn map_raised(&mut self, window: NativeWindow) -> Result<(), DisplayError>;

    /// Destroys a native window.
    fn destroy_window(&mut self, window: NativeWindow) -> Result<(), DisplayError>;

    // -- Graphics contexts --

    /// Creates a graphics context for `window` with the given colors.
    fn create_gc(
        &mut self,
        window: NativeWindow,
        foreground: Pixel,
        background: Pixel,
    ) -> Result<NativeGc, DisplayError>;

    /// Frees a graphics context.
    fn free_gc(&mut self, gc: NativeGc) -> Result<(), DisplayError>;

    /// Sets the drawing color.
    fn set_foreground(&mut self, gc: NativeGc, pixel: Pixel) -> Result<(), DisplayError>;

    /// Sets the background color (used by text and dashed lines).
    fn set_background(&mut self, gc: NativeGc, pixel: Pixel) -> Result<(), DisplayError>;

    /// Restricts all drawing through `gc` to `rect`.
    fn set_clip_rectangle(&mut self, gc: NativeGc, rect: DeviceRect) -> Result<(), DisplayError>;

    // -- Drawing --

    /// Draws a one-pixel line. Coordinates must fit the 16-bit protocol range.
    fn draw_line(
        &mut self,
        window: NativeWindow,
        gc: NativeGc,
        from: DevicePoint,
        to: DevicePoint,
    ) -> Result<(), DisplayError>;

    /// Fills a rectangle with the foreground color.
    fn fill_rectangle(
        &mut self,
        window: NativeWindow,
        gc: NativeGc,
        rect: DeviceRect,
    ) -> Result<(), DisplayError>;

    /// Draws `text` with its baseline origin at `at`.
    fn draw_string(
        &mut self,
        window: NativeWindow,
        gc: NativeGc,
        at: DevicePoint,
        text: &[u8],
    ) -> Result<(), DisplayError>;

    /// Queues a synthetic expose event for `area` with `remaining == 0`.
    fn send_expose(&mut self, window: NativeWindow, area: DeviceRect) -> Result<(), DisplayError>;

    // -- Fonts --

    /// Loads a server font by name.
    fn load_font(&mut self, name: &str) -> Result<FontId, DisplayError>;

    /// Unloads a server font.
    fn unload_font(&mut self, font: FontId) -> Result<(), DisplayError>;

    /// Queries a loaded font's metrics.
    fn query_font(&mut self, font: FontId) -> Result<FontMetrics, DisplayError>;

    /// Selects the font used by text drawing through `gc`.
    fn set_font(&mut self, gc: NativeGc, font: FontId) -> Result<(), DisplayError>;
}

/// Connection options for display backends.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct DisplayOptions {
    /// Display name (e.g. `":1"`); `None` uses the `DISPLAY` environment
    /// variable.
    pub name: Option<String>,
}

impl DisplayOptions {
    /// Options for the default display.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects a display by name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}
