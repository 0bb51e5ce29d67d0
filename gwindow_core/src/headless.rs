// Copyright 2026 the Gwindow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory display backend.
//!
//! [`HeadlessDisplay`] implements [`NativeDisplay`] without a server. It
//! hands out sequential resource ids, records every request as a
//! [`Command`], and serves events from a queue the caller fills with
//! [`push_event`](HeadlessDisplay::push_event). Synthetic expose requests are
//! looped back into that queue, as a real server would deliver them.
//!
//! It backs the crate's tests and can drive windows off-screen.

use alloc::collections::VecDeque;
use alloc::string::String;
use alloc::vec::Vec;
use core::time::Duration;

use crate::error::DisplayError;
use crate::event::{Atom, EventKind, NativeEvent, NativeWindow, ProtocolAtoms};
use crate::geometry::{DevicePoint, DeviceRect, DeviceSize};
use crate::native::{FontId, FontMetrics, NativeDisplay, NativeGc, NativeWindowParams, Pixel};

/// A request recorded by [`HeadlessDisplay`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// `create_window`.
    CreateWindow {
        /// Id handed out.
        window: NativeWindow,
        /// Parent, if any.
        parent: Option<NativeWindow>,
        /// Requested position.
        position: DevicePoint,
        /// Requested size.
        size: DeviceSize,
    },
    /// `set_title`.
    SetTitle(NativeWindow, String),
    /// `register_close_protocol`.
    RegisterCloseProtocol(NativeWindow),
    /// `clear_window`.
    ClearWindow(NativeWindow),
    /// `map_raised`.
    MapRaised(NativeWindow),
    /// `destroy_window`.
    DestroyWindow(NativeWindow),
    /// `create_gc`.
    CreateGc(NativeGc, NativeWindow),
    /// `free_gc`.
    FreeGc(NativeGc),
    /// `set_foreground`.
    SetForeground(NativeGc, Pixel),
    /// `set_background`.
    SetBackground(NativeGc, Pixel),
    /// `set_clip_rectangle`.
    SetClip(NativeGc, DeviceRect),
    /// `draw_line`.
    DrawLine(NativeWindow, DevicePoint, DevicePoint),
    /// `fill_rectangle`.
    FillRectangle(NativeWindow, DeviceRect),
    /// `draw_string`.
    DrawString(NativeWindow, DevicePoint, Vec<u8>),
    /// `send_expose`.
    SendExpose(NativeWindow, DeviceRect),
    /// `load_font`.
    LoadFont(FontId, String),
    /// `unload_font`.
    UnloadFont(FontId),
    /// `set_font`.
    SetFont(NativeGc, FontId),
}

impl Command {
    /// Whether this command puts pixels on a window.
    #[must_use]
    pub const fn is_draw(&self) -> bool {
        matches!(
            self,
            Self::DrawLine(..) | Self::FillRectangle(..) | Self::DrawString(..)
        )
    }
}

const NAMED_COLORS: &[(&str, u32)] = &[
    ("black", 0x00_0000),
    ("white", 0xff_ffff),
    ("red", 0xff_0000),
    ("green", 0x00_ff00),
    ("blue", 0x00_00ff),
    ("yellow", 0xff_ff00),
    ("cyan", 0x00_ffff),
    ("magenta", 0xff_00ff),
    ("gray", 0xbe_bebe),
    ("grey", 0xbe_bebe),
    ("lightgray", 0xd3_d3d3),
    ("navy", 0x00_0080),
    ("orange", 0xff_a500),
];

/// Fixed metrics reported for every headless font.
pub const HEADLESS_FONT_METRICS: FontMetrics = FontMetrics {
    ascent: 11,
    descent: 2,
    max_advance: 7,
};

/// A display that exists only in memory.
#[derive(Debug)]
pub struct HeadlessDisplay {
    screen: DeviceSize,
    atoms: ProtocolAtoms,
    next_id: u32,
    events: VecDeque<NativeEvent>,
    commands: Vec<Command>,
    live_windows: Vec<NativeWindow>,
    idle_waits: u32,
    idle_budget: Option<u32>,
}

impl Default for HeadlessDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessDisplay {
    /// Creates a 1920×1080 headless display.
    #[must_use]
    pub fn new() -> Self {
        Self::with_screen_size(DeviceSize::new(1920, 1080))
    }

    /// Creates a headless display with the given screen size.
    #[must_use]
    pub fn with_screen_size(screen: DeviceSize) -> Self {
        Self {
            screen,
            atoms: ProtocolAtoms {
                protocols: Atom(1),
                delete_window: Atom(2),
            },
            next_id: 0x40_0000,
            events: VecDeque::new(),
            commands: Vec::new(),
            live_windows: Vec::new(),
            idle_waits: 0,
            idle_budget: None,
        }
    }

    /// Makes [`poll_event`](NativeDisplay::poll_event) fail with
    /// [`DisplayError::ConnectionLost`] once the loop has idled `waits`
    /// times, so a loop that would never terminate ends instead.
    #[must_use]
    pub fn with_idle_budget(mut self, waits: u32) -> Self {
        self.idle_budget = Some(waits);
        self
    }

    /// Queues an event for delivery.
    pub fn push_event(&mut self, event: NativeEvent) {
        self.events.push_back(event);
    }

    /// Queues a window-manager close request for `window`.
    pub fn push_close_request(&mut self, window: NativeWindow) {
        self.push_event(NativeEvent::close_request(window, self.atoms));
    }

    /// Number of queued events.
    #[must_use]
    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    /// Every request recorded so far.
    #[must_use]
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Removes and returns the recorded requests.
    pub fn take_commands(&mut self) -> Vec<Command> {
        core::mem::take(&mut self.commands)
    }

    /// Number of recorded drawing requests.
    #[must_use]
    pub fn draw_count(&self) -> usize {
        self.commands.iter().filter(|c| c.is_draw()).count()
    }

    /// Whether `window` exists and has not been destroyed.
    #[must_use]
    pub fn is_live(&self, window: NativeWindow) -> bool {
        self.live_windows.contains(&window)
    }

    /// How often the dispatch loop idled.
    #[must_use]
    pub fn idle_waits(&self) -> u32 {
        self.idle_waits
    }

    fn alloc_id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    fn require_live(
        &self,
        window: NativeWindow,
        request: &'static str,
    ) -> Result<(), DisplayError> {
        if self.is_live(window) {
            Ok(())
        } else {
            Err(DisplayError::request(request, "BadWindow"))
        }
    }
}

impl NativeDisplay for HeadlessDisplay {
    fn protocol_atoms(&self) -> ProtocolAtoms {
        self.atoms
    }

    fn screen_size(&self) -> DeviceSize {
        self.screen
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        Ok(())
    }

    fn poll_event(&mut self) -> Result<Option<NativeEvent>, DisplayError> {
        if let Some(event) = self.events.pop_front() {
            return Ok(Some(event));
        }
        match self.idle_budget {
            Some(budget) if self.idle_waits >= budget => Err(DisplayError::ConnectionLost(
                "headless idle budget exhausted".into(),
            )),
            _ => Ok(None),
        }
    }

    fn wait_idle(&mut self, _interval: Duration) {
        self.idle_waits += 1;
    }

    fn white_pixel(&self) -> Pixel {
        Pixel(0xff_ffff)
    }

    fn black_pixel(&self) -> Pixel {
        Pixel(0x00_0000)
    }

    fn alloc_named_color(&mut self, name: &str) -> Result<Pixel, DisplayError> {
        if let Some(hex) = name.strip_prefix('#') {
            if hex.len() == 6 {
                if let Ok(rgb) = u32::from_str_radix(hex, 16) {
                    return Ok(Pixel(rgb));
                }
            }
        }
        NAMED_COLORS
            .iter()
            .find(|(known, _)| known.eq_ignore_ascii_case(name))
            .map(|&(_, rgb)| Pixel(rgb))
            .ok_or_else(|| DisplayError::UnknownColor(name.into()))
    }

    fn create_window(&mut self, params: &NativeWindowParams) -> Result<NativeWindow, DisplayError> {
        if let Some(parent) = params.parent {
            self.require_live(parent, "CreateWindow")?;
        }
        let window = NativeWindow(self.alloc_id());
        self.live_windows.push(window);
        self.commands.push(Command::CreateWindow {
            window,
            parent: params.parent,
            position: params.position,
            size: params.size,
        });
        Ok(window)
    }

    fn set_title(&mut self, window: NativeWindow, title: &str) -> Result<(), DisplayError> {
        self.require_live(window, "ChangeProperty")?;
        self.commands.push(Command::SetTitle(window, title.into()));
        Ok(())
    }

    fn register_close_protocol(&mut self, window: NativeWindow) -> Result<(), DisplayError> {
        self.require_live(window, "ChangeProperty")?;
        self.commands.push(Command::RegisterCloseProtocol(window));
        Ok(())
    }

    fn clear_window(&mut self, window: NativeWindow) -> Result<(), DisplayError> {
        self.require_live(window, "ClearArea")?;
        self.commands.push(Command::ClearWindow(window));
        Ok(())
    }

    fn map_raised(&mut self, window: NativeWindow) -> Result<(), DisplayError> {
        self.require_live(window, "MapWindow")?;
        self.commands.push(Command::MapRaised(window));
        Ok(())
    }

    fn destroy_window(&mut self, window: NativeWindow) -> Result<(), DisplayError> {
        self.require_live(window, "DestroyWindow")?;
        self.live_windows.retain(|&w| w != window);
        self.commands.push(Command::DestroyWindow(window));
        Ok(())
    }

    fn create_gc(
        &mut self,
        window: NativeWindow,
        foreground: Pixel,
        background: Pixel,
    ) -> Result<NativeGc, DisplayError> {
        self.require_live(window, "CreateGC")?;
        let gc = NativeGc(self.alloc_id());
        self.commands.push(Command::CreateGc(gc, window));
        self.commands.push(Command::SetForeground(gc, foreground));
        self.commands.push(Command::SetBackground(gc, background));
        Ok(gc)
    }

    fn free_gc(&mut self, gc: NativeGc) -> Result<(), DisplayError> {
        self.commands.push(Command::FreeGc(gc));
        Ok(())
    }

    fn set_foreground(&mut self, gc: NativeGc, pixel: Pixel) -> Result<(), DisplayError> {
        self.commands.push(Command::SetForeground(gc, pixel));
        Ok(())
    }

    fn set_background(&mut self, gc: NativeGc, pixel: Pixel) -> Result<(), DisplayError> {
        self.commands.push(Command::SetBackground(gc, pixel));
        Ok(())
    }

    fn set_clip_rectangle(&mut self, gc: NativeGc, rect: DeviceRect) -> Result<(), DisplayError> {
        self.commands.push(Command::SetClip(gc, rect));
        Ok(())
    }

    fn draw_line(
        &mut self,
        window: NativeWindow,
        _gc: NativeGc,
        from: DevicePoint,
        to: DevicePoint,
    ) -> Result<(), DisplayError> {
        self.require_live(window, "PolySegment")?;
        self.commands.push(Command::DrawLine(window, from, to));
        Ok(())
    }

    fn fill_rectangle(
        &mut self,
        window: NativeWindow,
        _gc: NativeGc,
        rect: DeviceRect,
    ) -> Result<(), DisplayError> {
        self.require_live(window, "PolyFillRectangle")?;
        self.commands.push(Command::FillRectangle(window, rect));
        Ok(())
    }

    fn draw_string(
        &mut self,
        window: NativeWindow,
        _gc: NativeGc,
        at: DevicePoint,
        text: &[u8],
    ) -> Result<(), DisplayError> {
        self.require_live(window, "PolyText8")?;
        self.commands.push(Command::DrawString(window, at, text.into()));
        Ok(())
    }

    fn send_expose(&mut self, window: NativeWindow, area: DeviceRect) -> Result<(), DisplayError> {
        self.require_live(window, "SendEvent")?;
        self.commands.push(Command::SendExpose(window, area));
        self.events.push_back(NativeEvent::new(
            window,
            EventKind::Expose { area, remaining: 0 },
        ));
        Ok(())
    }

    fn load_font(&mut self, name: &str) -> Result<FontId, DisplayError> {
        if name.is_empty() {
            return Err(DisplayError::UnknownFont(name.into()));
        }
        let font = FontId(self.alloc_id());
        self.commands.push(Command::LoadFont(font, name.into()));
        Ok(font)
    }

    fn unload_font(&mut self, font: FontId) -> Result<(), DisplayError> {
        self.commands.push(Command::UnloadFont(font));
        Ok(())
    }

    fn query_font(&mut self, _font: FontId) -> Result<FontMetrics, DisplayError> {
        Ok(HEADLESS_FONT_METRICS)
    }

    fn set_font(&mut self, gc: NativeGc, font: FontId) -> Result<(), DisplayError> {
        self.commands.push(Command::SetFont(gc, font));
        Ok(())
    }
}
