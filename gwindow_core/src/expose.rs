// Copyright 2026 the Gwindow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Coalescing of exposure bursts into a single repaint.
//!
//! Display servers report damage as a burst of expose events, the last of
//! which carries `remaining == 0`. [`ExposureAccumulator`] folds the burst
//! into one bounding rectangle so the repaint hook runs once per burst:
//!
//! ```text
//!             expose(r, remaining > 0)
//!           ┌──────────────────────────┐
//!           ▼                          │
//!   BeginSeries ──expose(r, n>0)──► Accumulating(bbox) ──┐
//!      ▲    │                          ▲    │            │ expose(r, n>0)
//!      │    │ expose(r, 0)             │    └────────────┘ bbox ∪= r
//!      │    ▼                          │
//!      └─ repaint(r)   ◄──expose(r, 0)─┘ repaint(bbox ∪ r)
//! ```
//!
//! The union is a coarse bounding box: disjoint damage rectangles produce a
//! clip that also covers the space between them.

use crate::geometry::DeviceRect;

/// State of an [`ExposureAccumulator`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ExposeState {
    /// No burst in progress.
    #[default]
    BeginSeries,
    /// Mid-burst; holds the bounding box of the damage seen so far.
    Accumulating(DeviceRect),
}

/// Per-window exposure burst accumulator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExposureAccumulator {
    state: ExposeState,
}

impl ExposureAccumulator {
    /// Creates an accumulator at rest.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: ExposeState::BeginSeries,
        }
    }

    /// Current state.
    #[inline]
    #[must_use]
    pub const fn state(&self) -> ExposeState {
        self.state
    }

    /// Whether a burst is in progress.
    #[inline]
    #[must_use]
    pub const fn is_accumulating(&self) -> bool {
        matches!(self.state, ExposeState::Accumulating(_))
    }

    /// Feeds one expose event.
    ///
    /// Returns the rectangle to repaint when `remaining == 0` ends the burst,
    /// and resets to [`ExposeState::BeginSeries`].
    pub fn accumulate(&mut self, area: DeviceRect, remaining: u16) -> Option<DeviceRect> {
        let pending = match self.state {
            ExposeState::BeginSeries => area,
            ExposeState::Accumulating(pending) => pending.union(area),
        };
        if remaining == 0 {
            self.state = ExposeState::BeginSeries;
            Some(pending)
        } else {
            self.state = ExposeState::Accumulating(pending);
            None
        }
    }

    /// Abandons any partial burst.
    pub fn reset(&mut self) {
        self.state = ExposeState::BeginSeries;
    }
}
