// Copyright 2026 the Gwindow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Line-segment clipping against axis-aligned rectangles (Liang–Barsky).

use kurbo::{Line, Point, Rect};

/// Clips `line` to `rect`, returning the visible part.
///
/// `rect` may be given with its edges in either order; it is normalized
/// first. Returns `None` when no part of the segment lies inside the
/// rectangle. Points on the boundary count as inside, so a segment that only
/// touches an edge yields a degenerate (single-point) segment.
#[must_use]
pub fn clip_line(rect: Rect, line: Line) -> Option<Line> {
    let r = rect.abs();
    let (p0, p1) = (line.p0, line.p1);
    let dx = p1.x - p0.x;
    let dy = p1.y - p0.y;

    let mut t0 = 0.0_f64;
    let mut t1 = 1.0_f64;

    // Each edge contributes one (p, q) pair: the segment is inside the
    // half-plane where p * t <= q.
    let edges = [
        (-dx, p0.x - r.x0),
        (dx, r.x1 - p0.x),
        (-dy, p0.y - r.y0),
        (dy, r.y1 - p0.y),
    ];
    for (p, q) in edges {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            if t > t1 {
                return None;
            }
            if t > t0 {
                t0 = t;
            }
        } else {
            if t < t0 {
                return None;
            }
            if t < t1 {
                t1 = t;
            }
        }
    }

    let at = |t: f64| Point::new(p0.x + t * dx, p0.y + t * dy);
    Some(Line::new(at(t0), at(t1)))
}
