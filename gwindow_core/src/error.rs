// Copyright 2026 the Gwindow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error type shared by the core and display backends.

use alloc::string::String;
use core::fmt;

/// Errors from display operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DisplayError {
    /// The display connection could not be opened.
    Connect(String),
    /// The connection to the display server broke.
    ConnectionLost(String),
    /// The server rejected a request.
    Request {
        /// Name of the failing request.
        request: &'static str,
        /// Server or transport message.
        message: String,
    },
    /// The server ran out of resource identifiers.
    IdsExhausted,
    /// A color name could not be resolved.
    UnknownColor(String),
    /// A font name could not be resolved.
    UnknownFont(String),
    /// The window has no native resources (never created, or destroyed).
    NotCreated,
    /// The window handle does not refer to a registered window.
    StaleWindow,
}

impl DisplayError {
    /// Builds a [`DisplayError::Request`] from any displayable cause.
    pub fn request(request: &'static str, cause: impl fmt::Display) -> Self {
        use alloc::string::ToString as _;
        Self::Request {
            request,
            message: cause.to_string(),
        }
    }
}

impl fmt::Display for DisplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connect(msg) => write!(f, "cannot open display: {msg}"),
            Self::ConnectionLost(msg) => write!(f, "display connection lost: {msg}"),
            Self::Request { request, message } => write!(f, "{request} failed: {message}"),
            Self::IdsExhausted => f.write_str("display server ran out of resource ids"),
            Self::UnknownColor(name) => write!(f, "unknown color \"{name}\""),
            Self::UnknownFont(name) => write!(f, "unknown font \"{name}\""),
            Self::NotCreated => f.write_str("window has no native resources"),
            Self::StaleWindow => f.write_str("window handle is stale"),
        }
    }
}

impl core::error::Error for DisplayError {}
