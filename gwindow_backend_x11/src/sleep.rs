// Copyright 2026 the Gwindow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Idle waits between event polls.

use core::time::Duration;

use rustix::thread::{NanosleepRelativeResult, nanosleep};
use rustix::time::Timespec;

/// Suspends the calling thread for `interval`, resuming after signals until
/// the full interval has elapsed.
pub(crate) fn sleep(interval: Duration) {
    let mut request = to_timespec(interval);
    loop {
        match nanosleep(&request) {
            NanosleepRelativeResult::Ok => return,
            NanosleepRelativeResult::Interrupted(remaining) => request = remaining,
            NanosleepRelativeResult::Err(err) => {
                log::warn!("nanosleep failed: {err}");
                return;
            }
        }
    }
}

fn to_timespec(interval: Duration) -> Timespec {
    Timespec {
        tv_sec: i64::try_from(interval.as_secs()).unwrap_or(i64::MAX),
        tv_nsec: i64::from(interval.subsec_nanos()),
    }
}
