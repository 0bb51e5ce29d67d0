// Copyright 2026 the Gwindow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Conversions from x11rb errors into [`DisplayError`].

use gwindow_core::error::DisplayError;
use x11rb::errors::{ConnectError, ConnectionError, ReplyError, ReplyOrIdError};

pub(crate) fn connect(err: &ConnectError) -> DisplayError {
    DisplayError::Connect(err.to_string())
}

pub(crate) fn connection(err: &ConnectionError) -> DisplayError {
    DisplayError::ConnectionLost(err.to_string())
}

/// Maps a failed request; transport failures become
/// [`DisplayError::ConnectionLost`].
pub(crate) fn reply(request: &'static str) -> impl FnOnce(ReplyError) -> DisplayError {
    move |err| match err {
        ReplyError::ConnectionError(err) => connection(&err),
        ReplyError::X11Error(_) => DisplayError::request(request, err),
    }
}

/// Like [`reply`], for requests that also allocate a resource id.
pub(crate) fn reply_or_id(request: &'static str) -> impl FnOnce(ReplyOrIdError) -> DisplayError {
    move |err| match err {
        ReplyOrIdError::IdsExhausted => DisplayError::IdsExhausted,
        ReplyOrIdError::ConnectionError(err) => connection(&err),
        ReplyOrIdError::X11Error(_) => DisplayError::request(request, err),
    }
}
