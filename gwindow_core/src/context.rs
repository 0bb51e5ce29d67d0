// Copyright 2026 the Gwindow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Window lifecycle and event dispatch.
//!
//! A [`Context`] owns one display connection and every window created on
//! it. It replaces process-wide state: the caller opens the display, hands
//! it to [`Context::new`], and gets it back from [`Context::shutdown`].
//!
//! # Dispatch loop
//!
//! ```text
//!   run() / run_modal(id)
//!     │  while created_count > 0 (and the modal window is still created)
//!     ▼
//!   poll_event ──none──► flush, wait_idle(idle_interval) ──┐
//!     │ some                                              │
//!     ▼                                                   │
//!   dispatch_event ◄──────────────────────────────────────┘
//!     │ find_by_native_id (miss: log and drop)
//!     ├─ Expose ────────► ExposureAccumulator ──burst end──► clip, repaint, unclip
//!     ├─ Configure ─────► size changed? recompute, resize hook, redraw
//!     ├─ ClientMessage ─► close request? can_close ──true──► destroy
//!     ├─ Destroyed (self) ─► window_destroyed hook, forget native resources
//!     └─ input/focus/structure ─► matching hook
//! ```

use alloc::boxed::Box;
use core::time::Duration;

use crate::canvas::Canvas;
use crate::error::DisplayError;
use crate::event::{EventKind, NativeEvent};
use crate::geometry::{DeviceRect, DeviceSize};
use crate::handler::WindowHandler;
use crate::native::NativeDisplay;
use crate::registry::{WindowId, WindowRegistry};
use crate::window::{Window, WindowConfig};

/// Sleep between polls when no event is pending.
pub const DEFAULT_IDLE_INTERVAL: Duration = Duration::from_millis(10);

/// A display connection and the windows created on it.
#[derive(Debug)]
pub struct Context<D: NativeDisplay> {
    display: D,
    registry: WindowRegistry,
    idle_interval: Duration,
}

impl<D: NativeDisplay> Context<D> {
    /// Wraps an open display connection.
    #[must_use]
    pub fn new(display: D) -> Self {
        Self {
            display,
            registry: WindowRegistry::new(),
            idle_interval: DEFAULT_IDLE_INTERVAL,
        }
    }

    /// Sets how long the loop sleeps when no event is pending.
    #[must_use]
    pub fn with_idle_interval(mut self, interval: Duration) -> Self {
        self.idle_interval = interval;
        self
    }

    /// The display connection.
    #[must_use]
    pub fn display(&self) -> &D {
        &self.display
    }

    /// The display connection, mutably.
    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    /// The window registry.
    #[must_use]
    pub fn registry(&self) -> &WindowRegistry {
        &self.registry
    }

    /// Returns a registered window.
    #[must_use]
    pub fn window(&self, id: WindowId) -> Option<&Window> {
        self.registry.get(id)
    }

    /// Size of the default screen.
    #[must_use]
    pub fn screen_size(&self) -> DeviceSize {
        self.display.screen_size()
    }

    /// Borrows a window for drawing outside of a hook.
    pub fn canvas(&mut self, id: WindowId) -> Option<Canvas<'_>> {
        let slot = self.registry.slot_mut(id)?;
        Some(Canvas::new(&mut self.display, &mut slot.window, id))
    }

    // -- Lifecycle --

    /// Registers a window and allocates its native resources.
    ///
    /// On failure the window is unregistered again and the error returned.
    pub fn create_window(
        &mut self,
        config: WindowConfig,
        handler: impl WindowHandler + 'static,
    ) -> Result<WindowId, DisplayError> {
        let parent = config
            .parent
            .and_then(|parent| self.registry.get(parent))
            .filter(|parent| parent.is_created())
            .and_then(Window::native);

        let id = self
            .registry
            .insert(Window::from_config(&config), Box::new(handler));
        let Some(slot) = self.registry.slot_mut(id) else {
            return Err(DisplayError::StaleWindow);
        };

        if let Err(err) = slot.window.create_native(&mut self.display, parent) {
            let _ = slot.window.release(&mut self.display);
            let _ = self.registry.remove(id);
            log::debug!("window creation failed: {err}");
            return Err(err);
        }
        let native = slot.window.native();
        self.registry.note_created();
        log::debug!(
            "created {id:?} as {native:?} ({} live, {} created)",
            self.registry.live_count(),
            self.registry.created_count()
        );
        Ok(id)
    }

    /// Releases a window's native resources; it stays registered.
    ///
    /// Destroying an already destroyed window does nothing.
    pub fn destroy_window(&mut self, id: WindowId) -> Result<(), DisplayError> {
        let slot = self.registry.slot_mut(id).ok_or(DisplayError::StaleWindow)?;
        let (was_created, result) = slot.window.release(&mut self.display);
        if was_created {
            self.registry.note_released();
            log::debug!(
                "destroyed {id:?} ({} created)",
                self.registry.created_count()
            );
        }
        result
    }

    /// Destroys a window if needed and unregisters it, returning its handler.
    pub fn remove_window(&mut self, id: WindowId) -> Result<Box<dyn WindowHandler>, DisplayError> {
        let destroyed = self.destroy_window(id);
        let (_, handler) = self.registry.remove(id).ok_or(DisplayError::StaleWindow)?;
        destroyed.map(|()| handler)
    }

    /// Removes every window and returns the display connection.
    ///
    /// The first release error is reported after all windows are removed.
    pub fn shutdown(mut self) -> Result<D, DisplayError> {
        let mut result = Ok(());
        for id in self.registry.ids() {
            if let Err(err) = self.remove_window(id) {
                result = result.and(Err(err));
            }
        }
        result.and(self.display.flush())?;
        Ok(self.display)
    }

    // -- Event loop --

    /// Polls for one event without blocking.
    pub fn next_event(&mut self) -> Result<Option<NativeEvent>, DisplayError> {
        self.display.poll_event()
    }

    /// Dispatches events until no created window remains.
    pub fn run(&mut self) -> Result<(), DisplayError> {
        self.run_until(None)
    }

    /// Dispatches events until `modal` is destroyed (or no created window
    /// remains).
    pub fn run_modal(&mut self, modal: WindowId) -> Result<(), DisplayError> {
        self.run_until(Some(modal))
    }

    fn run_until(&mut self, modal: Option<WindowId>) -> Result<(), DisplayError> {
        log::debug!("entering dispatch loop (modal: {modal:?})");
        while self.keep_running(modal) {
            match self.next_event()? {
                Some(event) => self.dispatch_event(event)?,
                None => {
                    self.display.flush()?;
                    self.display.wait_idle(self.idle_interval);
                }
            }
        }
        self.display.flush()?;
        log::debug!("leaving dispatch loop (modal: {modal:?})");
        Ok(())
    }

    fn keep_running(&self, modal: Option<WindowId>) -> bool {
        self.registry.created_count() > 0
            && modal.is_none_or(|id| self.registry.get(id).is_some_and(Window::is_created))
    }

    /// Routes one event to its window.
    ///
    /// Events for unknown windows are dropped.
    pub fn dispatch_event(&mut self, event: NativeEvent) -> Result<(), DisplayError> {
        let Some(id) = self.registry.find_by_native_id(event.window) else {
            log::debug!("dropping {:?}: no window for {:?}", event.kind, event.window);
            return Ok(());
        };
        log::trace!("dispatching {:?} to {id:?}", event.kind);

        let atoms = self.display.protocol_atoms();
        let Some(slot) = self.registry.slot_mut(id) else {
            return Ok(());
        };
        let handler = &mut slot.handler;
        let mut canvas = Canvas::new(&mut self.display, &mut slot.window, id);

        let mut close = false;
        let mut gone = false;
        match event.kind {
            EventKind::Expose { area, remaining } => {
                let burst = canvas.window_mut().exposure_mut().accumulate(area, remaining);
                if let Some(clip) = burst {
                    repaint(&mut canvas, handler.as_mut(), clip)?;
                }
            }
            EventKind::KeyPress(key) => handler.key_press(&mut canvas, &key)?,
            EventKind::ButtonPress(button) => handler.button_press(&mut canvas, &button)?,
            EventKind::ButtonRelease(button) => handler.button_release(&mut canvas, &button)?,
            EventKind::PointerMotion(motion) => handler.pointer_motion(&mut canvas, &motion)?,
            EventKind::Created { child } => handler.window_created(&mut canvas, child)?,
            EventKind::Destroyed { window } => {
                handler.window_destroyed(&mut canvas, window)?;
                gone = window == event.window;
            }
            EventKind::FocusIn => handler.focus_in(&mut canvas)?,
            EventKind::FocusOut => handler.focus_out(&mut canvas)?,
            EventKind::Configure { size } => {
                if canvas.window_mut().resize(size) {
                    log::debug!("{id:?} resized to {}x{}", size.width, size.height);
                    handler.resize(&mut canvas, size)?;
                    canvas.redraw()?;
                }
            }
            EventKind::ClientMessage { .. } => {
                if event.is_close_request(atoms) {
                    close = handler.can_close(&mut canvas);
                    log::debug!(
                        "close request for {id:?} {}",
                        if close { "accepted" } else { "refused" }
                    );
                }
            }
        }

        if canvas.window_mut().take_close_request() {
            close = true;
        }
        if gone {
            self.forget_window(id)
        } else if close {
            self.destroy_window(id)
        } else {
            Ok(())
        }
    }

    /// Releases bookkeeping for a window the server destroyed on its own
    /// (e.g. together with its parent).
    fn forget_window(&mut self, id: WindowId) -> Result<(), DisplayError> {
        let slot = self.registry.slot_mut(id).ok_or(DisplayError::StaleWindow)?;
        let (was_created, result) = slot.window.release_destroyed(&mut self.display);
        if was_created {
            self.registry.note_released();
            log::debug!(
                "{id:?} destroyed by the server ({} created)",
                self.registry.created_count()
            );
        }
        result
    }
}

/// Sets the clip to `clip`, runs the repaint hook, then restores the clip to
/// the whole window.
fn repaint(
    canvas: &mut Canvas<'_>,
    handler: &mut dyn WindowHandler,
    clip: DeviceRect,
) -> Result<(), DisplayError> {
    canvas.clip_to(clip)?;
    let painted = handler.repaint(canvas, clip);
    let full = canvas.window().device_rect();
    canvas.clip_to(full)?;
    painted
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    use kurbo::{Point, Rect, Vec2};

    use super::*;
    use crate::event::{KeyEvent, Modifiers, NativeWindow};
    use crate::geometry::DevicePoint;
    use crate::handler::{HookResult, NoopHandler};
    use crate::headless::{Command, HeadlessDisplay};

    #[derive(Clone, Debug, PartialEq, Eq)]
    enum Call {
        /// Clip passed to the hook, and the window clip seen inside it.
        Repaint(DeviceRect, DeviceRect),
        Resize(DeviceSize),
        Key(u32),
        CanClose,
        FocusIn,
    }

    type Log = Rc<RefCell<Vec<Call>>>;

    #[derive(Default)]
    struct Recorder {
        log: Log,
        refuse_close: bool,
        close_on_key: bool,
    }

    impl Recorder {
        fn new() -> (Self, Log) {
            let recorder = Self::default();
            let log = recorder.log.clone();
            (recorder, log)
        }
    }

    impl WindowHandler for Recorder {
        fn repaint(&mut self, canvas: &mut Canvas<'_>, clip: DeviceRect) -> HookResult {
            self.log
                .borrow_mut()
                .push(Call::Repaint(clip, canvas.window().clip()));
            Ok(())
        }

        fn resize(&mut self, _canvas: &mut Canvas<'_>, size: DeviceSize) -> HookResult {
            self.log.borrow_mut().push(Call::Resize(size));
            Ok(())
        }

        fn key_press(&mut self, canvas: &mut Canvas<'_>, key: &KeyEvent) -> HookResult {
            self.log.borrow_mut().push(Call::Key(key.keysym));
            if self.close_on_key {
                canvas.close();
            }
            Ok(())
        }

        fn focus_in(&mut self, _canvas: &mut Canvas<'_>) -> HookResult {
            self.log.borrow_mut().push(Call::FocusIn);
            Ok(())
        }

        fn can_close(&mut self, _canvas: &mut Canvas<'_>) -> bool {
            self.log.borrow_mut().push(Call::CanClose);
            !self.refuse_close
        }
    }

    fn context() -> Context<HeadlessDisplay> {
        Context::new(HeadlessDisplay::new().with_idle_budget(16))
    }

    fn native(ctx: &Context<HeadlessDisplay>, id: WindowId) -> NativeWindow {
        ctx.window(id).and_then(Window::native).unwrap()
    }

    fn key(keysym: u32) -> EventKind {
        EventKind::KeyPress(KeyEvent {
            keycode: 24,
            keysym,
            modifiers: Modifiers::default(),
            position: DevicePoint::new(5, 5),
        })
    }

    fn expose(area: DeviceRect, remaining: u16) -> EventKind {
        EventKind::Expose { area, remaining }
    }

    #[test]
    fn create_allocates_and_maps() {
        let mut ctx = context();
        let id = ctx.create_window(WindowConfig::default(), NoopHandler).unwrap();
        let w = ctx.window(id).unwrap();
        assert!(w.is_created());
        assert_eq!(ctx.registry().live_count(), 1);
        assert_eq!(ctx.registry().created_count(), 1);

        let native = w.native().unwrap();
        let commands = ctx.display().commands();
        assert!(commands.contains(&Command::MapRaised(native)));
        assert!(commands.contains(&Command::RegisterCloseProtocol(native)));
        assert!(commands.contains(&Command::SetTitle(native, "Graphic Window".into())));
    }

    #[test]
    fn failed_creation_unregisters() {
        let mut ctx = context();
        let err = ctx
            .create_window(WindowConfig::default().with_foreground("no-such-color"), NoopHandler)
            .unwrap_err();
        assert_eq!(err, DisplayError::UnknownColor("no-such-color".into()));
        assert_eq!(ctx.registry().live_count(), 0);
        assert_eq!(ctx.registry().created_count(), 0);
    }

    #[test]
    fn child_windows_use_parent_native_id() {
        let mut ctx = context();
        let parent = ctx.create_window(WindowConfig::default(), NoopHandler).unwrap();
        let parent_native = native(&ctx, parent);
        let child = ctx
            .create_window(
                WindowConfig::new(DeviceRect::new(10, 10, 50, 50)).with_parent(parent),
                NoopHandler,
            )
            .unwrap();
        let child_native = native(&ctx, child);
        assert!(ctx.display().commands().iter().any(|c| matches!(
            c,
            Command::CreateWindow { window, parent: Some(p), .. }
                if *window == child_native && *p == parent_native
        )));
    }

    #[test]
    fn registry_stays_consistent_across_removals() {
        let mut ctx = context();
        let ids: Vec<_> = (0..5)
            .map(|_| ctx.create_window(WindowConfig::default(), NoopHandler).unwrap())
            .collect();
        let natives: Vec<_> = ids.iter().map(|&id| native(&ctx, id)).collect();

        assert!(ctx.remove_window(ids[1]).is_ok());
        assert!(ctx.remove_window(ids[3]).is_ok());

        assert_eq!(ctx.registry().live_count(), 3);
        assert_eq!(ctx.registry().created_count(), 3);
        for i in [0, 2, 4] {
            assert_eq!(ctx.registry().find_by_native_id(natives[i]), Some(ids[i]));
        }
        for i in [1, 3] {
            assert_eq!(ctx.registry().find_by_native_id(natives[i]), None);
            assert!(!ctx.display().is_live(natives[i]));
        }
    }

    #[test]
    fn destroy_is_idempotent() {
        let mut ctx = context();
        let a = ctx.create_window(WindowConfig::default(), NoopHandler).unwrap();
        let _b = ctx.create_window(WindowConfig::default(), NoopHandler).unwrap();

        assert_eq!(ctx.destroy_window(a), Ok(()));
        assert_eq!(ctx.registry().created_count(), 1);
        assert_eq!(ctx.destroy_window(a), Ok(()));
        assert_eq!(ctx.registry().created_count(), 1);
        assert_eq!(ctx.registry().live_count(), 2, "destroyed windows stay registered");
    }

    #[test]
    fn exposure_burst_repaints_bounding_box_once() {
        let mut ctx = context();
        let (recorder, log) = Recorder::new();
        let id = ctx.create_window(WindowConfig::default(), recorder).unwrap();
        let w = native(&ctx, id);
        let gc = ctx.window(id).and_then(Window::gc).unwrap();
        let _ = ctx.display_mut().take_commands();

        ctx.dispatch_event(NativeEvent::new(w, expose(DeviceRect::new(0, 0, 10, 10), 1)))
            .unwrap();
        assert!(log.borrow().is_empty(), "mid-burst events do not repaint");
        assert_eq!(
            ctx.window(id).unwrap().exposure_state(),
            crate::expose::ExposeState::Accumulating(DeviceRect::new(0, 0, 10, 10))
        );

        ctx.dispatch_event(NativeEvent::new(w, expose(DeviceRect::new(5, 5, 20, 20), 0)))
            .unwrap();
        let union = DeviceRect::new(0, 0, 25, 25);
        assert_eq!(*log.borrow(), [Call::Repaint(union, union)]);

        let full = DeviceRect::from_size(300, 200);
        assert_eq!(ctx.window(id).unwrap().clip(), full);
        assert_eq!(
            ctx.display().commands(),
            [Command::SetClip(gc, union), Command::SetClip(gc, full)]
        );
    }

    #[test]
    fn events_for_unknown_windows_are_dropped() {
        let mut ctx = context();
        let (recorder, log) = Recorder::new();
        let _ = ctx.create_window(WindowConfig::default(), recorder).unwrap();
        assert_eq!(
            ctx.dispatch_event(NativeEvent::new(NativeWindow(0xdead), EventKind::FocusIn)),
            Ok(())
        );
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn unchanged_size_is_ignored() {
        let mut ctx = context();
        let (recorder, log) = Recorder::new();
        let id = ctx.create_window(WindowConfig::default(), recorder).unwrap();
        let w = native(&ctx, id);
        let _ = ctx.display_mut().take_commands();

        ctx.dispatch_event(NativeEvent::new(
            w,
            EventKind::Configure {
                size: DeviceSize::new(300, 200),
            },
        ))
        .unwrap();
        assert!(log.borrow().is_empty());
        assert!(ctx.display().commands().is_empty());
        assert_eq!(ctx.display().pending_events(), 0);
    }

    #[test]
    fn resize_recomputes_mapping_and_repaints() {
        let mut ctx = context();
        let (recorder, log) = Recorder::new();
        let id = ctx.create_window(WindowConfig::default(), recorder).unwrap();
        let w = native(&ctx, id);
        let size = DeviceSize::new(600, 400);

        ctx.dispatch_event(NativeEvent::new(w, EventKind::Configure { size }))
            .unwrap();
        let mapper = ctx.window(id).unwrap().mapper();
        assert_eq!(mapper.xcoeff(), 2.0);
        assert_eq!(mapper.ycoeff(), 2.0);
        assert_eq!(*log.borrow(), [Call::Resize(size)]);

        let queued = ctx.next_event().unwrap().unwrap();
        ctx.dispatch_event(queued).unwrap();
        let full = DeviceRect::from_size(600, 400);
        assert_eq!(log.borrow()[1], Call::Repaint(full, full));
    }

    #[test]
    fn close_request_ends_the_loop() {
        let mut ctx = context();
        let (recorder, log) = Recorder::new();
        let id = ctx.create_window(WindowConfig::default(), recorder).unwrap();
        let w = native(&ctx, id);
        ctx.display_mut().push_close_request(w);

        assert_eq!(ctx.run(), Ok(()));
        assert_eq!(*log.borrow(), [Call::CanClose]);
        assert_eq!(ctx.registry().created_count(), 0);
        assert!(!ctx.display().is_live(w));
        assert!(ctx.registry().contains(id));
    }

    #[test]
    fn refused_close_keeps_the_window() {
        let mut ctx = context();
        let (mut recorder, log) = Recorder::new();
        recorder.refuse_close = true;
        let id = ctx.create_window(WindowConfig::default(), recorder).unwrap();
        let w = native(&ctx, id);
        ctx.display_mut().push_close_request(w);

        let event = ctx.next_event().unwrap().unwrap();
        ctx.dispatch_event(event).unwrap();
        assert_eq!(*log.borrow(), [Call::CanClose]);
        assert!(ctx.window(id).unwrap().is_created());

        assert!(
            matches!(ctx.run(), Err(DisplayError::ConnectionLost(_))),
            "loop keeps idling while the window lives"
        );
        assert_eq!(ctx.display().idle_waits(), 16);
    }

    #[test]
    fn closing_from_a_hook_is_deferred_until_it_returns() {
        let mut ctx = context();
        let (mut recorder, log) = Recorder::new();
        recorder.close_on_key = true;
        let id = ctx.create_window(WindowConfig::default(), recorder).unwrap();
        let w = native(&ctx, id);
        ctx.display_mut().push_event(NativeEvent::new(w, key(u32::from(b'q'))));

        assert_eq!(ctx.run(), Ok(()));
        assert_eq!(*log.borrow(), [Call::Key(u32::from(b'q'))]);
        assert!(!ctx.window(id).unwrap().is_created());
    }

    #[test]
    fn server_side_destruction_is_forgotten() {
        let mut ctx = context();
        let parent = ctx.create_window(WindowConfig::default(), NoopHandler).unwrap();
        let child = ctx
            .create_window(WindowConfig::default().with_parent(parent), NoopHandler)
            .unwrap();
        let child_native = native(&ctx, child);
        ctx.destroy_window(parent).unwrap();
        let _ = ctx.display_mut().take_commands();

        ctx.dispatch_event(NativeEvent::new(
            child_native,
            EventKind::Destroyed {
                window: child_native,
            },
        ))
        .unwrap();
        assert!(!ctx.window(child).unwrap().is_created());
        assert_eq!(ctx.registry().created_count(), 0);
        assert!(
            !ctx.display()
                .commands()
                .iter()
                .any(|c| matches!(c, Command::DestroyWindow(_))),
            "no destroy request for a window the server already destroyed"
        );
    }

    #[test]
    fn modal_loop_returns_when_its_window_closes() {
        let mut ctx = context();
        let (main_handler, main_log) = Recorder::new();
        let main = ctx.create_window(WindowConfig::default(), main_handler).unwrap();
        let dialog = ctx.create_window(WindowConfig::default(), NoopHandler).unwrap();
        let (main_native, dialog_native) = (native(&ctx, main), native(&ctx, dialog));

        ctx.display_mut()
            .push_event(NativeEvent::new(main_native, EventKind::FocusIn));
        ctx.display_mut().push_close_request(dialog_native);
        ctx.display_mut()
            .push_event(NativeEvent::new(main_native, key(u32::from(b'x'))));

        assert_eq!(ctx.run_modal(dialog), Ok(()));
        assert_eq!(*main_log.borrow(), [Call::FocusIn], "other windows keep receiving events");
        assert!(ctx.window(main).unwrap().is_created());
        assert!(!ctx.window(dialog).unwrap().is_created());
        assert_eq!(ctx.display().pending_events(), 1, "events after the close stay queued");
    }

    #[test]
    fn logical_lines_outside_the_window_draw_nothing() {
        let mut ctx = context();
        let id = ctx.create_window(WindowConfig::default(), NoopHandler).unwrap();
        let mut canvas = ctx.canvas(id).unwrap();
        canvas
            .draw_line_logical(Point::new(400.0, 400.0), Point::new(500.0, 450.0))
            .unwrap();
        assert_eq!(canvas.window().clip(), DeviceRect::from_size(300, 200));
        assert_eq!(canvas.window().pen_logical(), Point::new(500.0, 450.0));
        assert_eq!(ctx.display().draw_count(), 0);
    }

    #[test]
    fn logical_lines_are_clipped_then_mapped() {
        let mut ctx = context();
        let config = WindowConfig::new(DeviceRect::from_size(100, 100))
            .with_coordinates(Rect::new(0.0, 0.0, 10.0, 10.0));
        let id = ctx.create_window(config, NoopHandler).unwrap();
        let w = native(&ctx, id);
        let _ = ctx.display_mut().take_commands();

        let mut canvas = ctx.canvas(id).unwrap();
        canvas
            .draw_line_logical(Point::new(-5.0, 5.0), Point::new(15.0, 5.0))
            .unwrap();
        assert_eq!(
            ctx.display().commands(),
            [Command::DrawLine(w, DevicePoint::new(0, 50), DevicePoint::new(100, 50))]
        );
    }

    #[test]
    fn oversized_device_lines_fall_back_to_clipping() {
        let mut ctx = context();
        let id = ctx.create_window(WindowConfig::default(), NoopHandler).unwrap();
        let w = native(&ctx, id);
        let _ = ctx.display_mut().take_commands();

        let mut canvas = ctx.canvas(id).unwrap();
        canvas
            .draw_line(DevicePoint::new(10, 10), DevicePoint::new(20, 30))
            .unwrap();
        canvas
            .draw_line(DevicePoint::new(-40_000, 100), DevicePoint::new(40_000, 100))
            .unwrap();
        assert_eq!(canvas.window().pen(), DevicePoint::new(40_000, 100));
        assert_eq!(
            ctx.display().commands(),
            [
                Command::DrawLine(w, DevicePoint::new(10, 10), DevicePoint::new(20, 30)),
                Command::DrawLine(w, DevicePoint::new(0, 100), DevicePoint::new(300, 100)),
            ]
        );
    }

    #[test]
    fn far_device_points_keep_the_pen_in_both_spaces() {
        let mut ctx = context();
        let id = ctx.create_window(WindowConfig::default(), NoopHandler).unwrap();
        let w = native(&ctx, id);
        let _ = ctx.display_mut().take_commands();

        let mut canvas = ctx.canvas(id).unwrap();
        canvas
            .draw_line(DevicePoint::new(10, 10), DevicePoint::new(10, -2_147_483_600))
            .unwrap();
        assert_eq!(canvas.window().pen(), DevicePoint::new(10, -2_147_483_600));
        assert_eq!(
            canvas.window().pen_logical(),
            Point::new(10.0, 2_147_483_800.0)
        );

        canvas.move_rel(0, i32::MIN);
        assert_eq!(canvas.window().pen(), DevicePoint::new(10, i32::MIN));
        assert_eq!(
            canvas.window().pen_logical(),
            Point::new(10.0, 2_147_483_848.0)
        );
        assert_eq!(
            ctx.display().commands(),
            [Command::DrawLine(w, DevicePoint::new(10, 10), DevicePoint::new(10, 0))]
        );
    }

    #[test]
    fn huge_logical_fills_saturate() {
        let mut ctx = context();
        let id = ctx.create_window(WindowConfig::default(), NoopHandler).unwrap();
        let w = native(&ctx, id);
        let _ = ctx.display_mut().take_commands();

        let mut canvas = ctx.canvas(id).unwrap();
        canvas
            .fill_rectangle_logical(Rect::new(-1e10, -1e10, 1e10, 1e10))
            .unwrap();
        assert_eq!(
            ctx.display().commands(),
            [Command::FillRectangle(
                w,
                DeviceRect::new(i32::MIN, i32::MIN, i32::MAX, i32::MAX)
            )]
        );
    }

    #[test]
    fn relative_moves_and_lines_track_the_pen() {
        let mut ctx = context();
        let config = WindowConfig::new(DeviceRect::from_size(100, 100))
            .with_coordinates(Rect::new(0.0, 0.0, 10.0, 10.0));
        let id = ctx.create_window(config, NoopHandler).unwrap();
        let w = native(&ctx, id);
        let _ = ctx.display_mut().take_commands();

        let mut canvas = ctx.canvas(id).unwrap();
        canvas.move_to(DevicePoint::new(10, 10));
        canvas.move_rel(20, 30);
        assert_eq!(canvas.window().pen(), DevicePoint::new(30, 40));
        assert_eq!(canvas.window().pen_logical(), Point::new(3.0, 6.0));

        canvas.draw_line_rel(10, -20).unwrap();
        assert_eq!(canvas.window().pen(), DevicePoint::new(40, 20));
        assert_eq!(canvas.window().pen_logical(), Point::new(4.0, 8.0));

        canvas.move_rel_logical(Vec2::new(1.0, -1.0));
        assert_eq!(canvas.window().pen_logical(), Point::new(5.0, 7.0));
        assert_eq!(canvas.window().pen(), DevicePoint::new(50, 30));

        canvas.draw_line_rel_logical(Vec2::new(2.0, 2.0)).unwrap();
        assert_eq!(canvas.window().pen_logical(), Point::new(7.0, 9.0));
        assert_eq!(canvas.window().pen(), DevicePoint::new(70, 10));

        assert_eq!(
            ctx.display().commands(),
            [
                Command::DrawLine(w, DevicePoint::new(30, 40), DevicePoint::new(40, 20)),
                Command::DrawLine(w, DevicePoint::new(50, 30), DevicePoint::new(70, 10)),
            ]
        );
    }

    #[test]
    fn string_length_limits_to_a_clamped_prefix() {
        let mut ctx = context();
        let id = ctx.create_window(WindowConfig::default(), NoopHandler).unwrap();
        let w = native(&ctx, id);
        let _ = ctx.display_mut().take_commands();

        let mut canvas = ctx.canvas(id).unwrap();
        let at = DevicePoint::new(5, 20);
        canvas.draw_string(at, "hello", Some(3)).unwrap();
        canvas.draw_string(at, "hello", Some(99)).unwrap();
        canvas.draw_string(at, "hello", None).unwrap();
        canvas
            .draw_string_logical(Point::new(5.0, 180.0), "hello", Some(0))
            .unwrap();
        assert_eq!(
            ctx.display().commands(),
            [
                Command::DrawString(w, at, b"hel".to_vec()),
                Command::DrawString(w, at, b"hello".to_vec()),
                Command::DrawString(w, at, b"hello".to_vec()),
                Command::DrawString(w, at, Vec::new()),
            ]
        );
    }

    #[test]
    fn coordinate_setters_build_the_logical_rect() {
        let mut ctx = context();
        let config = WindowConfig::new(DeviceRect::from_size(400, 300));
        let id = ctx.create_window(config, NoopHandler).unwrap();

        let mut canvas = ctx.canvas(id).unwrap();
        canvas.set_coordinates_from(-2.0, -1.0, 4.0, 3.0);
        assert_eq!(canvas.window().logical_rect(), Rect::new(-2.0, -1.0, 2.0, 2.0));
        assert_eq!(canvas.window().mapper().xcoeff(), 100.0);
        assert_eq!(canvas.window().mapper().ycoeff(), 100.0);
        assert_eq!(canvas.window().pen(), DevicePoint::new(200, 200));

        canvas.set_coordinates_corners(Point::new(0.0, 0.0), Point::new(8.0, 6.0));
        assert_eq!(canvas.window().logical_rect(), Rect::new(0.0, 0.0, 8.0, 6.0));
        assert_eq!(canvas.window().mapper().xcoeff(), 50.0);
        assert_eq!(canvas.window().pen(), DevicePoint::new(0, 300));
    }

    #[test]
    fn redraw_rect_clips_until_the_repaint_finishes() {
        let mut ctx = context();
        let (recorder, log) = Recorder::new();
        let id = ctx.create_window(WindowConfig::default(), recorder).unwrap();
        let rect = DeviceRect::new(10, 10, 50, 40);

        let mut canvas = ctx.canvas(id).unwrap();
        canvas.redraw_rect(rect).unwrap();
        assert_eq!(canvas.window().clip(), rect);

        let queued = ctx.next_event().unwrap().unwrap();
        ctx.dispatch_event(queued).unwrap();
        assert_eq!(*log.borrow(), [Call::Repaint(rect, rect)]);
        assert_eq!(ctx.window(id).unwrap().clip(), DeviceRect::from_size(300, 200));
    }

    #[test]
    fn redraw_rect_logical_maps_corners() {
        let mut ctx = context();
        let id = ctx.create_window(WindowConfig::default(), NoopHandler).unwrap();
        let w = native(&ctx, id);
        let mut canvas = ctx.canvas(id).unwrap();
        canvas
            .redraw_rect_logical(Rect::new(0.0, 0.0, 150.0, 100.0))
            .unwrap();
        assert!(
            ctx.display()
                .commands()
                .contains(&Command::SendExpose(w, DeviceRect::new(0, 100, 150, 100)))
        );
    }

    #[test]
    fn drawing_after_destroy_reports_not_created() {
        let mut ctx = context();
        let id = ctx.create_window(WindowConfig::default(), NoopHandler).unwrap();
        ctx.destroy_window(id).unwrap();
        let mut canvas = ctx.canvas(id).unwrap();
        assert_eq!(
            canvas.fill_rectangle(DeviceRect::from_size(10, 10)),
            Err(DisplayError::NotCreated)
        );
    }

    #[test]
    fn axes_and_grid_are_drawn_inside_the_window() {
        let mut ctx = context();
        let config = WindowConfig::default().with_coordinates(Rect::new(-3.0, -2.0, 3.0, 2.0));
        let id = ctx.create_window(config, NoopHandler).unwrap();
        let mut canvas = ctx.canvas(id).unwrap();
        canvas.draw_axes(Some("red"), true, Some("gray")).unwrap();

        let commands = ctx.display().commands();
        // 6 vertical and 4 horizontal grid lines, 2 axes, 2 ticks.
        let lines = commands
            .iter()
            .filter(|c| matches!(c, Command::DrawLine(..)))
            .count();
        assert_eq!(lines, 14);
        let labels = commands
            .iter()
            .filter(|c| matches!(c, Command::DrawString(..)))
            .count();
        assert_eq!(labels, 2);
    }

    #[test]
    fn shutdown_releases_everything() {
        let mut ctx = context();
        let a = ctx.create_window(WindowConfig::default(), NoopHandler).unwrap();
        let b = ctx.create_window(WindowConfig::default(), NoopHandler).unwrap();
        let natives = [native(&ctx, a), native(&ctx, b)];
        let display = ctx.shutdown().unwrap();
        assert!(natives.iter().all(|&w| !display.is_live(w)));
    }
}
