// Copyright 2026 the Gwindow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! [`NativeDisplay`] over an x11rb connection.

use core::fmt;
use core::time::Duration;

use gwindow_core::error::DisplayError;
use gwindow_core::event::{Atom, NativeEvent, NativeWindow, ProtocolAtoms};
use gwindow_core::geometry::{DevicePoint, DeviceRect, DeviceSize};
use gwindow_core::native::{
    DisplayOptions, FontId, FontMetrics, NativeDisplay, NativeGc, NativeWindowParams, Pixel,
    WindowClass,
};
use x11rb::connection::Connection;
use x11rb::protocol::Event;
use x11rb::protocol::xproto::{
    self, AtomEnum, BackingStore, ChangeGCAux, ClipOrdering, ConfigureWindowAux,
    ConnectionExt as _, CreateGCAux, CreateWindowAux, EventMask, ExposeEvent, PropMode, Rectangle,
    Segment, StackMode,
};
use x11rb::rust_connection::RustConnection;
use x11rb::wrapper::ConnectionExt as _;

use crate::error;
use crate::keymap::Keymap;
use crate::sleep::sleep;

/// Longest string a single `PolyText8` item carries.
const TEXT_ITEM_MAX: usize = 254;

/// A connection to an X server.
pub struct X11Display {
    conn: RustConnection,
    root: xproto::Window,
    colormap: xproto::Colormap,
    white: u32,
    black: u32,
    screen_size: DeviceSize,
    atoms: ProtocolAtoms,
    keymap: Keymap,
}

impl fmt::Debug for X11Display {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("X11Display")
            .field("root", &format_args!("{:#x}", self.root))
            .field("screen_size", &self.screen_size)
            .field("atoms", &self.atoms)
            .finish_non_exhaustive()
    }
}

impl X11Display {
    /// Opens the display named in `options` (or `$DISPLAY`), interns the
    /// close-protocol atoms and loads the keyboard mapping.
    pub fn connect(options: &DisplayOptions) -> Result<Self, DisplayError> {
        let (conn, screen_num) =
            x11rb::connect(options.name.as_deref()).map_err(|err| error::connect(&err))?;
        let screen = conn
            .setup()
            .roots
            .get(screen_num)
            .ok_or_else(|| DisplayError::Connect(format!("no screen {screen_num}")))?;
        let root = screen.root;
        let colormap = screen.default_colormap;
        let white = screen.white_pixel;
        let black = screen.black_pixel;
        let screen_size = DeviceSize::new(
            i32::from(screen.width_in_pixels),
            i32::from(screen.height_in_pixels),
        );

        let protocols = conn
            .intern_atom(false, b"WM_PROTOCOLS")
            .map_err(|err| error::connection(&err))?;
        let delete_window = conn
            .intern_atom(false, b"WM_DELETE_WINDOW")
            .map_err(|err| error::connection(&err))?;
        let atoms = ProtocolAtoms {
            protocols: Atom(protocols.reply().map_err(error::reply("InternAtom"))?.atom),
            delete_window: Atom(delete_window.reply().map_err(error::reply("InternAtom"))?.atom),
        };

        let keymap = load_keymap(&conn)?;
        log::info!(
            "connected to X display (screen {screen_num}, {}x{})",
            screen_size.width,
            screen_size.height
        );
        Ok(Self {
            conn,
            root,
            colormap,
            white,
            black,
            screen_size,
            atoms,
            keymap,
        })
    }

    /// The underlying connection.
    #[must_use]
    pub fn connection(&self) -> &RustConnection {
        &self.conn
    }

    fn set_gc(&self, gc: NativeGc, aux: &ChangeGCAux) -> Result<(), DisplayError> {
        self.conn
            .change_gc(gc.0, aux)
            .map_err(|err| error::connection(&err))?;
        Ok(())
    }
}

fn load_keymap(conn: &RustConnection) -> Result<Keymap, DisplayError> {
    let setup = conn.setup();
    let (min, max) = (setup.min_keycode, setup.max_keycode);
    let count = max.saturating_sub(min).saturating_add(1);
    let mapping = conn
        .get_keyboard_mapping(min, count)
        .map_err(|err| error::connection(&err))?
        .reply()
        .map_err(error::reply("GetKeyboardMapping"))?;
    Ok(Keymap::new(min, mapping.keysyms_per_keycode, mapping.keysyms))
}

impl NativeDisplay for X11Display {
    fn protocol_atoms(&self) -> ProtocolAtoms {
        self.atoms
    }

    fn screen_size(&self) -> DeviceSize {
        self.screen_size
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        self.conn.flush().map_err(|err| error::connection(&err))
    }

    fn poll_event(&mut self) -> Result<Option<NativeEvent>, DisplayError> {
        loop {
            let Some(event) = self
                .conn
                .poll_for_event()
                .map_err(|err| error::connection(&err))?
            else {
                return Ok(None);
            };
            match &event {
                Event::Error(err) => {
                    log::warn!(
                        "X11 error {} (major opcode {})",
                        err.error_code,
                        err.major_opcode
                    );
                }
                Event::MappingNotify(_) => {
                    self.keymap = load_keymap(&self.conn)?;
                    log::debug!("keyboard mapping reloaded");
                }
                _ => {
                    if let Some(native) = crate::event::translate(&event, &self.keymap) {
                        return Ok(Some(native));
                    }
                }
            }
        }
    }

    fn wait_idle(&mut self, interval: Duration) {
        sleep(interval);
    }

    fn white_pixel(&self) -> Pixel {
        Pixel(self.white)
    }

    fn black_pixel(&self) -> Pixel {
        Pixel(self.black)
    }

    fn alloc_named_color(&mut self, name: &str) -> Result<Pixel, DisplayError> {
        if let Some((red, green, blue)) = parse_hex_color(name) {
            let reply = self
                .conn
                .alloc_color(self.colormap, red, green, blue)
                .map_err(|err| error::connection(&err))?
                .reply()
                .map_err(error::reply("AllocColor"))?;
            return Ok(Pixel(reply.pixel));
        }
        let cookie = self
            .conn
            .alloc_named_color(self.colormap, name.as_bytes())
            .map_err(|err| error::connection(&err))?;
        match cookie.reply() {
            Ok(reply) => Ok(Pixel(reply.pixel)),
            Err(x11rb::errors::ReplyError::X11Error(_)) => {
                Err(DisplayError::UnknownColor(name.into()))
            }
            Err(err) => Err(error::reply("AllocNamedColor")(err)),
        }
    }

    fn create_window(&mut self, params: &NativeWindowParams) -> Result<NativeWindow, DisplayError> {
        let id = self
            .conn
            .generate_id()
            .map_err(error::reply_or_id("CreateWindow"))?;
        let overrides = params.attributes.unwrap_or_default();
        let mut aux = CreateWindowAux::new()
            .background_pixel(overrides.background_pixel.unwrap_or(params.background).0)
            .border_pixel(overrides.border_pixel.unwrap_or(params.foreground).0)
            .event_mask(window_events());
        if let Some(value) = overrides.override_redirect {
            aux = aux.override_redirect(u32::from(value));
        }
        if let Some(value) = overrides.backing_store {
            aux = aux.backing_store(if value {
                BackingStore::ALWAYS
            } else {
                BackingStore::NOT_USEFUL
            });
        }
        if let Some(value) = overrides.save_under {
            aux = aux.save_under(u32::from(value));
        }

        self.conn
            .create_window(
                x11rb::COPY_DEPTH_FROM_PARENT,
                id,
                params.parent.map_or(self.root, |parent| parent.0),
                clamp_i16(params.position.x),
                clamp_i16(params.position.y),
                clamp_extent(params.size.width),
                clamp_extent(params.size.height),
                params.border_width,
                window_class(params.class),
                params.visual.unwrap_or(x11rb::COPY_FROM_PARENT),
                &aux,
            )
            .map_err(|err| error::connection(&err))?;
        log::trace!("CreateWindow {id:#x}");
        Ok(NativeWindow(id))
    }

    fn set_title(&mut self, window: NativeWindow, title: &str) -> Result<(), DisplayError> {
        for property in [AtomEnum::WM_NAME, AtomEnum::WM_ICON_NAME] {
            self.conn
                .change_property8(
                    PropMode::REPLACE,
                    window.0,
                    property,
                    AtomEnum::STRING,
                    title.as_bytes(),
                )
                .map_err(|err| error::connection(&err))?;
        }
        Ok(())
    }

    fn register_close_protocol(&mut self, window: NativeWindow) -> Result<(), DisplayError> {
        self.conn
            .change_property32(
                PropMode::REPLACE,
                window.0,
                self.atoms.protocols.0,
                AtomEnum::ATOM,
                &[self.atoms.delete_window.0],
            )
            .map_err(|err| error::connection(&err))?;
        Ok(())
    }

    fn clear_window(&mut self, window: NativeWindow) -> Result<(), DisplayError> {
        self.conn
            .clear_area(false, window.0, 0, 0, 0, 0)
            .map_err(|err| error::connection(&err))?;
        Ok(())
    }

    fn map_raised(&mut self, window: NativeWindow) -> Result<(), DisplayError> {
        self.conn
            .configure_window(window.0, &ConfigureWindowAux::new().stack_mode(StackMode::ABOVE))
            .map_err(|err| error::connection(&err))?;
        self.conn
            .map_window(window.0)
            .map_err(|err| error::connection(&err))?;
        Ok(())
    }

    fn destroy_window(&mut self, window: NativeWindow) -> Result<(), DisplayError> {
        self.conn
            .destroy_window(window.0)
            .map_err(|err| error::connection(&err))?;
        log::trace!("DestroyWindow {:#x}", window.0);
        Ok(())
    }

    fn create_gc(
        &mut self,
        window: NativeWindow,
        foreground: Pixel,
        background: Pixel,
    ) -> Result<NativeGc, DisplayError> {
        let gc = self
            .conn
            .generate_id()
            .map_err(error::reply_or_id("CreateGC"))?;
        self.conn
            .create_gc(
                gc,
                window.0,
                &CreateGCAux::new()
                    .foreground(foreground.0)
                    .background(background.0)
                    .graphics_exposures(0),
            )
            .map_err(|err| error::connection(&err))?;
        Ok(NativeGc(gc))
    }

    fn free_gc(&mut self, gc: NativeGc) -> Result<(), DisplayError> {
        self.conn
            .free_gc(gc.0)
            .map_err(|err| error::connection(&err))?;
        Ok(())
    }

    fn set_foreground(&mut self, gc: NativeGc, pixel: Pixel) -> Result<(), DisplayError> {
        self.set_gc(gc, &ChangeGCAux::new().foreground(pixel.0))
    }

    fn set_background(&mut self, gc: NativeGc, pixel: Pixel) -> Result<(), DisplayError> {
        self.set_gc(gc, &ChangeGCAux::new().background(pixel.0))
    }

    fn set_clip_rectangle(&mut self, gc: NativeGc, rect: DeviceRect) -> Result<(), DisplayError> {
        self.conn
            .set_clip_rectangles(ClipOrdering::UNSORTED, gc.0, 0, 0, &[to_rectangle(rect)])
            .map_err(|err| error::connection(&err))?;
        Ok(())
    }

    fn draw_line(
        &mut self,
        window: NativeWindow,
        gc: NativeGc,
        from: DevicePoint,
        to: DevicePoint,
    ) -> Result<(), DisplayError> {
        let segment = Segment {
            x1: clamp_i16(from.x),
            y1: clamp_i16(from.y),
            x2: clamp_i16(to.x),
            y2: clamp_i16(to.y),
        };
        self.conn
            .poly_segment(window.0, gc.0, &[segment])
            .map_err(|err| error::connection(&err))?;
        Ok(())
    }

    fn fill_rectangle(
        &mut self,
        window: NativeWindow,
        gc: NativeGc,
        rect: DeviceRect,
    ) -> Result<(), DisplayError> {
        self.conn
            .poly_fill_rectangle(window.0, gc.0, &[to_rectangle(rect)])
            .map_err(|err| error::connection(&err))?;
        Ok(())
    }

    fn draw_string(
        &mut self,
        window: NativeWindow,
        gc: NativeGc,
        at: DevicePoint,
        text: &[u8],
    ) -> Result<(), DisplayError> {
        if text.is_empty() {
            return Ok(());
        }
        self.conn
            .poly_text8(
                window.0,
                gc.0,
                clamp_i16(at.x),
                clamp_i16(at.y),
                &text_items(text),
            )
            .map_err(|err| error::connection(&err))?;
        Ok(())
    }

    fn send_expose(&mut self, window: NativeWindow, area: DeviceRect) -> Result<(), DisplayError> {
        let event = ExposeEvent {
            response_type: xproto::EXPOSE_EVENT,
            sequence: 0,
            window: window.0,
            x: clamp_u16(area.x),
            y: clamp_u16(area.y),
            width: clamp_u16(area.width),
            height: clamp_u16(area.height),
            count: 0,
        };
        self.conn
            .send_event(false, window.0, EventMask::EXPOSURE, event)
            .map_err(|err| error::connection(&err))?;
        Ok(())
    }

    fn load_font(&mut self, name: &str) -> Result<FontId, DisplayError> {
        let font = self
            .conn
            .generate_id()
            .map_err(error::reply_or_id("OpenFont"))?;
        let checked = self
            .conn
            .open_font(font, name.as_bytes())
            .map_err(|err| error::connection(&err))?
            .check();
        match checked {
            Ok(()) => Ok(FontId(font)),
            Err(x11rb::errors::ReplyError::X11Error(_)) => {
                Err(DisplayError::UnknownFont(name.into()))
            }
            Err(err) => Err(error::reply("OpenFont")(err)),
        }
    }

    fn unload_font(&mut self, font: FontId) -> Result<(), DisplayError> {
        self.conn
            .close_font(font.0)
            .map_err(|err| error::connection(&err))?;
        Ok(())
    }

    fn query_font(&mut self, font: FontId) -> Result<FontMetrics, DisplayError> {
        let reply = self
            .conn
            .query_font(font.0)
            .map_err(|err| error::connection(&err))?
            .reply()
            .map_err(error::reply("QueryFont"))?;
        Ok(FontMetrics {
            ascent: reply.font_ascent,
            descent: reply.font_descent,
            max_advance: reply.max_bounds.character_width,
        })
    }

    fn set_font(&mut self, gc: NativeGc, font: FontId) -> Result<(), DisplayError> {
        self.set_gc(gc, &ChangeGCAux::new().font(font.0))
    }
}

/// Events every window created by this backend selects.
fn window_events() -> EventMask {
    EventMask::EXPOSURE
        | EventMask::BUTTON_PRESS
        | EventMask::BUTTON_RELEASE
        | EventMask::KEY_PRESS
        | EventMask::POINTER_MOTION
        | EventMask::STRUCTURE_NOTIFY
        | EventMask::SUBSTRUCTURE_NOTIFY
        | EventMask::FOCUS_CHANGE
}

fn window_class(class: WindowClass) -> xproto::WindowClass {
    match class {
        WindowClass::CopyFromParent => xproto::WindowClass::COPY_FROM_PARENT,
        WindowClass::InputOutput => xproto::WindowClass::INPUT_OUTPUT,
        WindowClass::InputOnly => xproto::WindowClass::INPUT_ONLY,
    }
}

/// Parses `#rrggbb` into 16-bit color channels.
fn parse_hex_color(name: &str) -> Option<(u16, u16, u16)> {
    let hex = name.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |range: core::ops::Range<usize>| {
        u8::from_str_radix(&hex[range], 16)
            .ok()
            .map(|c| u16::from(c) * 0x101)
    };
    Some((channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// Encodes `text` as `PolyText8` items of at most [`TEXT_ITEM_MAX`] bytes,
/// each prefixed with its length and a zero delta.
fn text_items(text: &[u8]) -> Vec<u8> {
    let mut items = Vec::with_capacity(text.len() + 2 * text.len().div_ceil(TEXT_ITEM_MAX));
    for chunk in text.chunks(TEXT_ITEM_MAX) {
        items.push(u8::try_from(chunk.len()).unwrap_or(u8::MAX));
        items.push(0);
        items.extend_from_slice(chunk);
    }
    items
}

fn to_rectangle(rect: DeviceRect) -> Rectangle {
    Rectangle {
        x: clamp_i16(rect.x),
        y: clamp_i16(rect.y),
        width: clamp_extent(rect.width),
        height: clamp_extent(rect.height),
    }
}

fn clamp_i16(v: i32) -> i16 {
    i16::try_from(v).unwrap_or(if v < 0 { i16::MIN } else { i16::MAX })
}

fn clamp_u16(v: i32) -> u16 {
    u16::try_from(v.max(0)).unwrap_or(u16::MAX)
}

/// Window and rectangle extents; the protocol rejects zero.
fn clamp_extent(v: i32) -> u16 {
    clamp_u16(v).max(1)
}
