// Copyright 2026 the Gwindow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Translation of X11 wire events into [`NativeEvent`]s.
//!
//! Each event is reported on the window that selected it: `event` for
//! input, focus and structure events, `parent` for `CreateNotify`.
//! `ConfigureNotify` is only forwarded for the window itself; substructure
//! reports about children would otherwise resize the parent.

use gwindow_core::event::{
    Atom, ButtonEvent, EventKind, KeyEvent, Modifiers, MotionEvent, NativeEvent, NativeWindow,
};
use gwindow_core::geometry::{DevicePoint, DeviceRect, DeviceSize};
use x11rb::protocol::Event;

use crate::keymap::Keymap;

/// Translates `event`, or returns `None` for events the core ignores.
pub(crate) fn translate(event: &Event, keymap: &Keymap) -> Option<NativeEvent> {
    let (window, kind) = match event {
        Event::Expose(e) => (
            e.window,
            EventKind::Expose {
                area: DeviceRect::new(
                    i32::from(e.x),
                    i32::from(e.y),
                    i32::from(e.width),
                    i32::from(e.height),
                ),
                remaining: e.count,
            },
        ),
        Event::KeyPress(e) => {
            let modifiers = Modifiers(u16::from(e.state));
            (
                e.event,
                EventKind::KeyPress(KeyEvent {
                    keycode: e.detail,
                    keysym: keymap.lookup(e.detail, modifiers),
                    modifiers,
                    position: position(e.event_x, e.event_y),
                }),
            )
        }
        Event::ButtonPress(e) => (
            e.event,
            EventKind::ButtonPress(ButtonEvent {
                button: e.detail,
                modifiers: Modifiers(u16::from(e.state)),
                position: position(e.event_x, e.event_y),
            }),
        ),
        Event::ButtonRelease(e) => (
            e.event,
            EventKind::ButtonRelease(ButtonEvent {
                button: e.detail,
                modifiers: Modifiers(u16::from(e.state)),
                position: position(e.event_x, e.event_y),
            }),
        ),
        Event::MotionNotify(e) => (
            e.event,
            EventKind::PointerMotion(MotionEvent {
                modifiers: Modifiers(u16::from(e.state)),
                position: position(e.event_x, e.event_y),
            }),
        ),
        Event::CreateNotify(e) => (
            e.parent,
            EventKind::Created {
                child: NativeWindow(e.window),
            },
        ),
        Event::DestroyNotify(e) => (
            e.event,
            EventKind::Destroyed {
                window: NativeWindow(e.window),
            },
        ),
        Event::FocusIn(e) => (e.event, EventKind::FocusIn),
        Event::FocusOut(e) => (e.event, EventKind::FocusOut),
        Event::ConfigureNotify(e) if e.event == e.window => (
            e.window,
            EventKind::Configure {
                size: DeviceSize::new(i32::from(e.width), i32::from(e.height)),
            },
        ),
        Event::ClientMessage(e) if e.format == 32 => (
            e.window,
            EventKind::ClientMessage {
                message_type: Atom(e.type_),
                data: e.data.as_data32(),
            },
        ),
        _ => return None,
    };
    Some(NativeEvent::new(NativeWindow(window), kind))
}

fn position(x: i16, y: i16) -> DevicePoint {
    DevicePoint::new(i32::from(x), i32::from(y))
}

#[cfg(test)]
mod tests {
    use gwindow_core::event::ProtocolAtoms;
    use x11rb::protocol::xproto::{
        CLIENT_MESSAGE_EVENT, CONFIGURE_NOTIFY_EVENT, ClientMessageData, ClientMessageEvent,
        ConfigureNotifyEvent, EXPOSE_EVENT, ExposeEvent, KEY_PRESS_EVENT, KeyButMask,
        KeyPressEvent,
    };

    use super::*;

    fn configure(event: u32, window: u32) -> Event {
        Event::ConfigureNotify(ConfigureNotifyEvent {
            response_type: CONFIGURE_NOTIFY_EVENT,
            sequence: 0,
            event,
            window,
            above_sibling: 0,
            x: 0,
            y: 0,
            width: 640,
            height: 480,
            border_width: 2,
            override_redirect: false,
        })
    }

    #[test]
    fn expose_carries_area_and_count() {
        let event = Event::Expose(ExposeEvent {
            response_type: EXPOSE_EVENT,
            sequence: 0,
            window: 0x20_0001,
            x: 5,
            y: 6,
            width: 70,
            height: 80,
            count: 2,
        });
        assert_eq!(
            translate(&event, &Keymap::default()),
            Some(NativeEvent::new(
                NativeWindow(0x20_0001),
                EventKind::Expose {
                    area: DeviceRect::new(5, 6, 70, 80),
                    remaining: 2,
                },
            ))
        );
    }

    #[test]
    fn configure_for_children_is_ignored() {
        assert!(translate(&configure(1, 1), &Keymap::default()).is_some());
        assert_eq!(translate(&configure(1, 2), &Keymap::default()), None);
    }

    #[test]
    fn key_press_resolves_keysym() {
        let keymap = Keymap::new(24, 2, vec![u32::from(b'q'), u32::from(b'Q')]);
        let event = Event::KeyPress(KeyPressEvent {
            response_type: KEY_PRESS_EVENT,
            detail: 24,
            sequence: 0,
            time: 0,
            root: 1,
            event: 7,
            child: 0,
            root_x: 100,
            root_y: 100,
            event_x: 10,
            event_y: 20,
            state: KeyButMask::SHIFT,
            same_screen: true,
        });
        let Some(NativeEvent {
            window,
            kind: EventKind::KeyPress(key),
        }) = translate(&event, &keymap)
        else {
            panic!("expected a key press");
        };
        assert_eq!(window, NativeWindow(7));
        assert_eq!(key.to_char(), Some('Q'));
        assert_eq!(key.position, DevicePoint::new(10, 20));
    }

    #[test]
    fn delete_window_message_is_a_close_request() {
        let atoms = ProtocolAtoms {
            protocols: Atom(300),
            delete_window: Atom(301),
        };
        let event = Event::ClientMessage(ClientMessageEvent {
            response_type: CLIENT_MESSAGE_EVENT,
            format: 32,
            sequence: 0,
            window: 9,
            type_: 300,
            data: ClientMessageData::from([301_u32, 0, 0, 0, 0]),
        });
        let translated = translate(&event, &Keymap::default()).unwrap();
        assert!(translated.is_close_request(atoms));
    }
}
