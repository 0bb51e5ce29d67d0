// Copyright 2026 the Gwindow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-window event hooks.
//!
//! A [`WindowHandler`] is supplied when a window is created and receives
//! every event routed to that window. All methods default to doing nothing,
//! except [`can_close`](WindowHandler::can_close), which allows the close.
//! Hooks draw through the [`Canvas`] they are given; errors they return
//! propagate out of [`Context::dispatch_event`](crate::context::Context::dispatch_event).

use crate::canvas::Canvas;
use crate::error::DisplayError;
use crate::event::{ButtonEvent, KeyEvent, MotionEvent, NativeWindow};
use crate::geometry::{DeviceRect, DeviceSize};

/// Result type returned by hooks.
pub type HookResult = Result<(), DisplayError>;

/// Application callbacks for one window.
#[allow(unused_variables, reason = "default hooks ignore their arguments")]
pub trait WindowHandler {
    /// Repaints the window. Drawing is clipped to `clip` for the duration of
    /// the call.
    fn repaint(&mut self, canvas: &mut Canvas<'_>, clip: DeviceRect) -> HookResult {
        Ok(())
    }

    /// The surface was resized. A full repaint follows.
    fn resize(&mut self, canvas: &mut Canvas<'_>, size: DeviceSize) -> HookResult {
        Ok(())
    }

    /// A key was pressed.
    fn key_press(&mut self, canvas: &mut Canvas<'_>, key: &KeyEvent) -> HookResult {
        Ok(())
    }

    /// A pointer button was pressed.
    fn button_press(&mut self, canvas: &mut Canvas<'_>, button: &ButtonEvent) -> HookResult {
        Ok(())
    }

    /// A pointer button was released.
    fn button_release(&mut self, canvas: &mut Canvas<'_>, button: &ButtonEvent) -> HookResult {
        Ok(())
    }

    /// The pointer moved.
    fn pointer_motion(&mut self, canvas: &mut Canvas<'_>, motion: &MotionEvent) -> HookResult {
        Ok(())
    }

    /// A child window was created.
    fn window_created(&mut self, canvas: &mut Canvas<'_>, child: NativeWindow) -> HookResult {
        Ok(())
    }

    /// A window was destroyed.
    fn window_destroyed(&mut self, canvas: &mut Canvas<'_>, window: NativeWindow) -> HookResult {
        Ok(())
    }

    /// Keyboard focus entered the window.
    fn focus_in(&mut self, canvas: &mut Canvas<'_>) -> HookResult {
        Ok(())
    }

    /// Keyboard focus left the window.
    fn focus_out(&mut self, canvas: &mut Canvas<'_>) -> HookResult {
        Ok(())
    }

    /// The user asked to close the window (e.g. the title-bar close box).
    ///
    /// Return `false` to keep the window open. On `true` only this window's
    /// native resources are released; other windows keep running.
    fn can_close(&mut self, canvas: &mut Canvas<'_>) -> bool {
        true
    }
}

/// A handler that ignores every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopHandler;

impl WindowHandler for NoopHandler {}
