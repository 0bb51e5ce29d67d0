// Copyright 2026 the Gwindow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keycode to keysym lookup from the server keyboard mapping.

use gwindow_core::event::Modifiers;

/// `NoSymbol`.
const NO_SYMBOL: u32 = 0;

/// A snapshot of the server's keyboard mapping.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Keymap {
    min_keycode: u8,
    per_keycode: usize,
    keysyms: Vec<u32>,
}

impl Keymap {
    pub(crate) fn new(min_keycode: u8, keysyms_per_keycode: u8, keysyms: Vec<u32>) -> Self {
        Self {
            min_keycode,
            per_keycode: usize::from(keysyms_per_keycode),
            keysyms,
        }
    }

    /// Resolves `keycode` to a keysym, taking the shifted column when shift
    /// (or caps lock on a letter) is active. Unmapped keys yield `0`.
    pub(crate) fn lookup(&self, keycode: u8, modifiers: Modifiers) -> u32 {
        let Some(row) = self.row(keycode) else {
            return NO_SYMBOL;
        };
        let lower = row.first().copied().unwrap_or(NO_SYMBOL);
        let upper = match row.get(1).copied() {
            Some(sym) if sym != NO_SYMBOL => sym,
            _ => lower,
        };

        let is_letter = u8::try_from(lower).is_ok_and(|b| b.is_ascii_lowercase());
        let shifted = modifiers.contains(Modifiers::SHIFT)
            ^ (is_letter && modifiers.contains(Modifiers::LOCK));
        if shifted { upper } else { lower }
    }

    fn row(&self, keycode: u8) -> Option<&[u32]> {
        if self.per_keycode == 0 {
            return None;
        }
        let index = usize::from(keycode.checked_sub(self.min_keycode)?);
        let start = index.checked_mul(self.per_keycode)?;
        self.keysyms.get(start..start + self.per_keycode)
    }
}
