// Copyright 2026 the Gwindow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Plots `sin(x)` in logical coordinates on an X11 window.
//!
//! The plot window draws axes, a unit grid and the curve, and repaints
//! itself on resize. A small modal notice is shown on top of it first; any
//! key (or its close box) dismisses it. Press `q` or use the close box to
//! quit; click to log the logical coordinates under the pointer.
//!
//! Set `RUST_LOG=debug` to follow window creation and event routing.

use std::f64::consts::PI;

use gwindow_backend_x11::X11Display;
use gwindow_core::canvas::Canvas;
use gwindow_core::context::Context;
use gwindow_core::error::DisplayError;
use gwindow_core::event::{ButtonEvent, KeyEvent};
use gwindow_core::geometry::{DevicePoint, DeviceRect, DeviceSize};
use gwindow_core::handler::{HookResult, WindowHandler};
use gwindow_core::native::{DisplayOptions, FontId};
use gwindow_core::window::WindowConfig;
use kurbo::{Point, Rect};

/// Samples along the curve.
const SAMPLES: u32 = 400;

struct Notice {
    font: Option<FontId>,
}

impl WindowHandler for Notice {
    fn repaint(&mut self, canvas: &mut Canvas<'_>, _clip: DeviceRect) -> HookResult {
        let font = match self.font {
            Some(font) => font,
            None => {
                let font = canvas.load_font("fixed")?;
                canvas.set_font(font)?;
                self.font = Some(font);
                font
            }
        };
        let line = canvas.query_font(font)?.line_height().max(1);
        let lines = ["gwindow plot demo", "", "press any key to continue"];
        let mut y = 20 + line;
        for text in lines {
            canvas.draw_string(DevicePoint::new(16, y), text, None)?;
            y += line;
        }
        Ok(())
    }

    fn key_press(&mut self, canvas: &mut Canvas<'_>, _key: &KeyEvent) -> HookResult {
        self.release_font(canvas);
        canvas.close();
        Ok(())
    }

    fn can_close(&mut self, canvas: &mut Canvas<'_>) -> bool {
        self.release_font(canvas);
        true
    }
}

impl Notice {
    fn release_font(&mut self, canvas: &mut Canvas<'_>) {
        if let Some(font) = self.font.take() {
            if let Err(err) = canvas.unload_font(font) {
                log::warn!("cannot unload font: {err}");
            }
        }
    }
}

struct Plot;

impl WindowHandler for Plot {
    fn repaint(&mut self, canvas: &mut Canvas<'_>, _clip: DeviceRect) -> HookResult {
        canvas.draw_axes(Some("black"), true, Some("lightgray"))?;
        canvas.set_foreground_named("blue")?;

        let r = canvas.window().logical_rect();
        let step = r.width() / f64::from(SAMPLES);
        canvas.move_to_logical(Point::new(r.x0, r.x0.sin()));
        for i in 1..=SAMPLES {
            let x = r.x0 + step * f64::from(i);
            canvas.draw_line_to_logical(Point::new(x, x.sin()))?;
        }
        canvas.set_foreground_named("black")
    }

    fn resize(&mut self, _canvas: &mut Canvas<'_>, size: DeviceSize) -> HookResult {
        log::info!("plot resized to {}x{}", size.width, size.height);
        Ok(())
    }

    fn key_press(&mut self, canvas: &mut Canvas<'_>, key: &KeyEvent) -> HookResult {
        if key.to_char() == Some('q') {
            canvas.close();
        }
        Ok(())
    }

    fn button_press(&mut self, canvas: &mut Canvas<'_>, button: &ButtonEvent) -> HookResult {
        let p = canvas.window().mapper().to_logical(button.position);
        log::info!("button {} at ({:.3}, {:.3})", button.button, p.x, p.y);
        Ok(())
    }
}

fn main() -> Result<(), DisplayError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let display = X11Display::connect(&DisplayOptions::new())?;
    let mut ctx = Context::new(display);
    let screen = ctx.screen_size();
    log::info!("screen is {}x{}", screen.width, screen.height);

    ctx.create_window(
        WindowConfig::new(DeviceRect::new(100, 100, 640, 400))
            .with_title("sin(x)")
            .with_coordinates(Rect::new(-PI, -1.5, PI, 1.5))
            .with_background("white"),
        Plot,
    )?;

    // The plot keeps repainting while the notice is up.
    let notice = ctx.create_window(
        WindowConfig::new(DeviceRect::new(160, 160, 260, 90)).with_title("gwindow"),
        Notice { font: None },
    )?;
    ctx.run_modal(notice)?;
    let _ = ctx.remove_window(notice)?;

    ctx.run()?;

    ctx.shutdown()?;
    log::info!("bye");
    Ok(())
}
