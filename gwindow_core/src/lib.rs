// Copyright 2026 the Gwindow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Windows with dual coordinate spaces for simple plotting programs.
//!
//! `gwindow_core` manages top-level and child windows on a display server,
//! each with a device-pixel space and a user-defined logical space whose
//! y-axis points up. It is `no_std` compatible (with `alloc`); the display
//! server is reached only through the [`NativeDisplay`](native::NativeDisplay)
//! trait, implemented by backend crates.
//!
//! # Architecture
//!
//! ```text
//!   Backend (NativeDisplay)
//!       │ poll_event
//!       ▼
//!   NativeEvent ──► Context::dispatch_event ──► WindowRegistry lookup
//!                                                    │
//!                 ┌──────────────────────────────────┘
//!                 ▼
//!   ExposureAccumulator ──burst end──► WindowHandler hooks
//!                                            │
//!                 ┌──────────────────────────┘
//!                 ▼
//!   Canvas (CoordinateMapper + clip_line) ──► NativeDisplay drawing calls
//! ```
//!
//! **[`context`]**: Owns the display connection and the registry; window
//! creation and destruction, and the (modal) dispatch loop.
//!
//! **[`registry`]**: Slot storage with generational [`WindowId`](registry::WindowId)
//! handles, live and created counts, and lookup by native id.
//!
//! **[`window`]**: Per-window state (geometry, pen, colors, title) and
//! native resource allocation.
//!
//! **[`mapper`]**: Linear mapping between device and logical coordinates.
//!
//! **[`clip`]**: Parametric segment clipping against a rectangle.
//!
//! **[`expose`]**: Coalesces an exposure burst into one bounding rectangle.
//!
//! **[`canvas`]**: Clipped drawing primitives in both coordinate spaces.
//!
//! **[`handler`]**: The [`WindowHandler`](handler::WindowHandler) hook trait.
//!
//! **[`native`]**: The backend contract.
//!
//! **[`headless`]**: An in-memory backend for tests and off-screen use.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod canvas;
pub mod clip;
pub mod context;
pub mod error;
pub mod event;
pub mod expose;
pub mod geometry;
pub mod handler;
pub mod headless;
pub mod mapper;
pub mod native;
pub mod registry;
pub mod window;
