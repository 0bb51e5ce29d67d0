// Copyright 2026 the Gwindow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! X11 backend for gwindow.
//!
//! [`X11Display`] implements [`NativeDisplay`] over a pure-Rust x11rb
//! connection:
//!
//! - `WM_PROTOCOLS` / `WM_DELETE_WINDOW` interned at connect time, so the
//!   window manager's close box arrives as a close request
//! - keysyms resolved from the server keyboard mapping, reloaded on
//!   `MappingNotify`
//! - idle waits between polls via `nanosleep`
//!
//! ```no_run
//! use gwindow_backend_x11::X11Display;
//! use gwindow_core::context::Context;
//! use gwindow_core::handler::NoopHandler;
//! use gwindow_core::native::DisplayOptions;
//! use gwindow_core::window::WindowConfig;
//!
//! # fn main() -> Result<(), gwindow_core::error::DisplayError> {
//! let display = X11Display::connect(&DisplayOptions::new())?;
//! let mut ctx = Context::new(display);
//! ctx.create_window(WindowConfig::default().with_title("hello"), NoopHandler)?;
//! ctx.run()?;
//! # Ok(())
//! # }
//! ```

mod display;
mod error;
mod event;
mod keymap;
mod sleep;

pub use display::X11Display;
pub use gwindow_core::native::NativeDisplay;
