// Copyright 2026 the Gwindow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Slot storage for live windows with generational handles.
//!
//! Every window known to a [`Context`](crate::context::Context) lives in a
//! slot of the [`WindowRegistry`]. Slots are recycled through a free list;
//! each slot carries a generation counter so that a [`WindowId`] held past
//! the window's removal is detected as stale instead of aliasing whichever
//! window reuses the slot.
//!
//! The registry keeps two counts:
//!
//! - **live**: windows currently registered, created or not;
//! - **created**: windows whose native resources are allocated. The
//!   dispatch loop runs while this is non-zero.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use crate::event::NativeWindow;
use crate::handler::WindowHandler;
use crate::window::Window;

/// A handle to a window in a [`WindowRegistry`].
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowId {
    pub(crate) idx: u32,
    pub(crate) generation: u32,
}

impl WindowId {
    /// Returns the raw slot index (for diagnostics only).
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.idx
    }

    /// Returns the generation counter.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WindowId({}@gen{})", self.idx, self.generation)
    }
}

/// A registered window together with its event handler.
pub(crate) struct Slot {
    pub(crate) window: Window,
    pub(crate) handler: Box<dyn WindowHandler>,
}

/// Storage for all registered windows.
pub struct WindowRegistry {
    slots: Vec<Option<Slot>>,
    generation: Vec<u32>,
    free_list: Vec<u32>,
    live: usize,
    created: usize,
}

impl fmt::Debug for WindowRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WindowRegistry")
            .field("slots", &self.slots.len())
            .field("generation", &self.generation)
            .field("free_list", &self.free_list)
            .field("live", &self.live)
            .field("created", &self.created)
            .finish()
    }
}

impl Default for WindowRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl WindowRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            generation: Vec::new(),
            free_list: Vec::new(),
            live: 0,
            created: 0,
        }
    }

    /// Number of registered windows.
    #[inline]
    #[must_use]
    pub const fn live_count(&self) -> usize {
        self.live
    }

    /// Number of registered windows with native resources.
    #[inline]
    #[must_use]
    pub const fn created_count(&self) -> usize {
        self.created
    }

    /// Registers a window and returns its handle.
    pub fn insert(&mut self, window: Window, handler: Box<dyn WindowHandler>) -> WindowId {
        let slot = Slot { window, handler };
        let idx = if let Some(idx) = self.free_list.pop() {
            self.slots[idx as usize] = Some(slot);
            idx
        } else {
            let idx = u32::try_from(self.slots.len()).unwrap_or(u32::MAX);
            self.slots.push(Some(slot));
            self.generation.push(0);
            idx
        };
        self.live += 1;
        WindowId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    /// Unregisters a window, returning it and its handler.
    ///
    /// Returns `None` for stale handles. The created count is not touched;
    /// release native resources before removing.
    pub fn remove(&mut self, id: WindowId) -> Option<(Window, Box<dyn WindowHandler>)> {
        if !self.contains(id) {
            return None;
        }
        let slot = self.slots[id.idx as usize].take()?;
        self.generation[id.idx as usize] = self.generation[id.idx as usize].wrapping_add(1);
        self.free_list.push(id.idx);
        self.live -= 1;
        Some((slot.window, slot.handler))
    }

    /// Whether `id` refers to a registered window.
    #[must_use]
    pub fn contains(&self, id: WindowId) -> bool {
        (id.idx as usize) < self.slots.len()
            && self.generation[id.idx as usize] == id.generation
            && self.slots[id.idx as usize].is_some()
    }

    /// Returns the window behind `id`.
    #[must_use]
    pub fn get(&self, id: WindowId) -> Option<&Window> {
        self.slot(id).map(|slot| &slot.window)
    }

    /// Returns the window behind `id` mutably.
    pub fn get_mut(&mut self, id: WindowId) -> Option<&mut Window> {
        self.slot_mut(id).map(|slot| &mut slot.window)
    }

    /// Finds the registered window with the given native id.
    ///
    /// The walk visits at most [`live_count`](Self::live_count) occupied
    /// slots.
    #[must_use]
    pub fn find_by_native_id(&self, native: NativeWindow) -> Option<WindowId> {
        self.iter()
            .take(self.live)
            .find(|(_, window)| window.native() == Some(native))
            .map(|(id, _)| id)
    }

    /// Iterates over registered windows in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (WindowId, &Window)> + '_ {
        self.slots.iter().enumerate().filter_map(|(idx, slot)| {
            let slot = slot.as_ref()?;
            let idx = u32::try_from(idx).ok()?;
            Some((
                WindowId {
                    idx,
                    generation: self.generation[idx as usize],
                },
                &slot.window,
            ))
        })
    }

    /// Handles of all registered windows.
    #[must_use]
    pub fn ids(&self) -> Vec<WindowId> {
        self.iter().map(|(id, _)| id).collect()
    }

    // -- Crate internals --

    pub(crate) fn slot(&self, id: WindowId) -> Option<&Slot> {
        if !self.contains(id) {
            return None;
        }
        self.slots[id.idx as usize].as_ref()
    }

    pub(crate) fn slot_mut(&mut self, id: WindowId) -> Option<&mut Slot> {
        if !self.contains(id) {
            return None;
        }
        self.slots[id.idx as usize].as_mut()
    }

    pub(crate) fn note_created(&mut self) {
        self.created += 1;
    }

    pub(crate) fn note_released(&mut self) {
        self.created = self.created.saturating_sub(1);
    }
}
