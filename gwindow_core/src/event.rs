// Copyright 2026 the Gwindow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Native event model delivered by display backends.

use core::fmt;

use crate::geometry::{DevicePoint, DeviceRect, DeviceSize};

/// A native window identifier assigned by the display server.
///
/// Zero is never a valid window; the core uses `Option<NativeWindow>` for
/// "not created".
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NativeWindow(pub u32);

impl fmt::Debug for NativeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeWindow({:#x})", self.0)
    }
}

/// A native atom (interned protocol name).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Atom(pub u32);

/// The atoms negotiated with the window manager for the close handshake.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct ProtocolAtoms {
    /// `WM_PROTOCOLS`: message type of window-manager protocol messages.
    pub protocols: Atom,
    /// `WM_DELETE_WINDOW`: the "close window" protocol.
    pub delete_window: Atom,
}

/// Keyboard and pointer-button modifier mask, as reported by the server.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers(pub u16);

impl Modifiers {
    /// Shift key.
    pub const SHIFT: Self = Self(1 << 0);
    /// Caps lock.
    pub const LOCK: Self = Self(1 << 1);
    /// Control key.
    pub const CONTROL: Self = Self(1 << 2);
    /// Mod1 (usually Alt).
    pub const MOD1: Self = Self(1 << 3);
    /// Pointer button 1 held.
    pub const BUTTON1: Self = Self(1 << 8);
    /// Pointer button 2 held.
    pub const BUTTON2: Self = Self(1 << 9);
    /// Pointer button 3 held.
    pub const BUTTON3: Self = Self(1 << 10);

    /// Whether every bit of `other` is set.
    #[inline]
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl fmt::Debug for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Modifiers({:#06x})", self.0)
    }
}

/// A key press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyEvent {
    /// Hardware keycode.
    pub keycode: u8,
    /// Keysym resolved from the server keyboard mapping, honouring shift.
    /// Zero when the keycode has no mapping.
    pub keysym: u32,
    /// Modifier state at the time of the press.
    pub modifiers: Modifiers,
    /// Pointer position in window coordinates.
    pub position: DevicePoint,
}

impl KeyEvent {
    /// The keysym as a character, for the printable Latin-1 range.
    #[must_use]
    pub fn to_char(&self) -> Option<char> {
        match self.keysym {
            0x20..=0x7e | 0xa0..=0xff => char::from_u32(self.keysym),
            _ => None,
        }
    }
}

/// A pointer button press or release.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ButtonEvent {
    /// Button number (1 = left, 2 = middle, 3 = right, 4/5 = wheel).
    pub button: u8,
    /// Modifier state at the time of the event.
    pub modifiers: Modifiers,
    /// Pointer position in window coordinates.
    pub position: DevicePoint,
}

/// Pointer motion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MotionEvent {
    /// Modifier and button state during the motion.
    pub modifiers: Modifiers,
    /// Pointer position in window coordinates.
    pub position: DevicePoint,
}

/// What happened, for a [`NativeEvent`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventKind {
    /// Part of the window needs repainting. `remaining == 0` ends a burst.
    Expose {
        /// Damaged area.
        area: DeviceRect,
        /// Number of expose events still to come in this burst.
        remaining: u16,
    },
    /// A key was pressed.
    KeyPress(KeyEvent),
    /// A pointer button was pressed.
    ButtonPress(ButtonEvent),
    /// A pointer button was released.
    ButtonRelease(ButtonEvent),
    /// The pointer moved inside the window.
    PointerMotion(MotionEvent),
    /// A child window was created.
    Created {
        /// The new child.
        child: NativeWindow,
    },
    /// A window (this one or a child) was destroyed.
    Destroyed {
        /// The destroyed window.
        window: NativeWindow,
    },
    /// Keyboard focus entered the window.
    FocusIn,
    /// Keyboard focus left the window.
    FocusOut,
    /// The window's geometry or stacking changed.
    Configure {
        /// New surface size.
        size: DeviceSize,
    },
    /// A client message, e.g. a window-manager protocol request.
    ClientMessage {
        /// Message type atom.
        message_type: Atom,
        /// Payload as 32-bit items.
        data: [u32; 5],
    },
}

/// An event addressed to a native window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NativeEvent {
    /// Window the event is reported on.
    pub window: NativeWindow,
    /// Event payload.
    pub kind: EventKind,
}

impl NativeEvent {
    /// Creates an event.
    #[must_use]
    pub const fn new(window: NativeWindow, kind: EventKind) -> Self {
        Self { window, kind }
    }

    /// Builds the window-manager "close window" request for `window`.
    #[must_use]
    pub const fn close_request(window: NativeWindow, atoms: ProtocolAtoms) -> Self {
        Self::new(
            window,
            EventKind::ClientMessage {
                message_type: atoms.protocols,
                data: [atoms.delete_window.0, 0, 0, 0, 0],
            },
        )
    }

    /// Whether this is a close request under the given protocol atoms.
    #[must_use]
    pub fn is_close_request(&self, atoms: ProtocolAtoms) -> bool {
        matches!(
            self.kind,
            EventKind::ClientMessage { message_type, data }
                if message_type == atoms.protocols && data[0] == atoms.delete_window.0
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ATOMS: ProtocolAtoms = ProtocolAtoms {
        protocols: Atom(301),
        delete_window: Atom(302),
    };

    #[test]
    fn close_request_round_trips_through_classifier() {
        let ev = NativeEvent::close_request(NativeWindow(7), ATOMS);
        assert!(ev.is_close_request(ATOMS));
    }

    #[test]
    fn other_protocol_is_not_a_close_request() {
        let take_focus = NativeEvent::new(
            NativeWindow(7),
            EventKind::ClientMessage {
                message_type: ATOMS.protocols,
                data: [999, 0, 0, 0, 0],
            },
        );
        assert!(!take_focus.is_close_request(ATOMS));

        let foreign_type = NativeEvent::new(
            NativeWindow(7),
            EventKind::ClientMessage {
                message_type: Atom(1),
                data: [ATOMS.delete_window.0, 0, 0, 0, 0],
            },
        );
        assert!(!foreign_type.is_close_request(ATOMS));
    }

    #[test]
    fn printable_keysyms_become_chars() {
        let mut key = KeyEvent {
            keycode: 24,
            keysym: u32::from(b'q'),
            modifiers: Modifiers::default(),
            position: DevicePoint::ORIGIN,
        };
        assert_eq!(key.to_char(), Some('q'));
        key.keysym = 0xff0d; // Return
        assert_eq!(key.to_char(), None);
    }

    #[test]
    fn modifier_containment() {
        let m = Modifiers(Modifiers::SHIFT.0 | Modifiers::CONTROL.0);
        assert!(m.contains(Modifiers::SHIFT));
        assert!(!m.contains(Modifiers::MOD1));
    }
}
