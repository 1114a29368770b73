//! Resize geometry - handle projection, modifier keys and size limits.
//!
//! Order of operations for one pointer sample:
//!
//! 1. project the pointer delta onto the handle's edges
//! 2. `shift`: restore the start aspect ratio
//! 3. `alt`: re-center on the start center
//! 4. clamp to min/max size, keeping the fixed edge (or center) in place
//!
//! The clamp runs last so no modifier combination can bypass it.

use crate::constants::{DEFAULT_MIN_HEIGHT, DEFAULT_MIN_WIDTH};
use crate::types::{Modifiers, PixelRect, Point, ResizeHandle, Size};
use tracing::trace;

/// Size limits enforced on every resize sample
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SizeConstraints {
    pub min: Size,
    pub max: Option<Size>,
}

impl Default for SizeConstraints {
    fn default() -> Self {
        Self {
            min: Size::new(DEFAULT_MIN_WIDTH, DEFAULT_MIN_HEIGHT),
            max: None,
        }
    }
}

/// Which point of an axis stays put when its length is clamped
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum AxisPin {
    /// Start edge (left/top) stays
    Start,
    /// Far edge (right/bottom) stays
    End,
    Center,
}

/// Compute the rectangle for a resize gesture.
pub fn resize_rect(
    start: &PixelRect,
    handle: ResizeHandle,
    delta: Point,
    modifiers: Modifiers,
    constraints: &SizeConstraints,
) -> PixelRect {
    let mut rect = project(start, handle, delta);

    if modifiers.shift {
        rect = lock_aspect(start, &rect, handle);
    }

    if modifiers.alt {
        let center = start.center();
        rect.x = center.x - rect.width / 2.0;
        rect.y = center.y - rect.height / 2.0;
    }

    clamp(start, rect, handle, modifiers, constraints)
}

fn project(start: &PixelRect, handle: ResizeHandle, delta: Point) -> PixelRect {
    let mut rect = *start;
    if handle.moves_left() {
        rect.x += delta.x;
        rect.width -= delta.x;
    }
    if handle.moves_right() {
        rect.width += delta.x;
    }
    if handle.moves_top() {
        rect.y += delta.y;
        rect.height -= delta.y;
    }
    if handle.moves_bottom() {
        rect.height += delta.y;
    }
    rect
}

fn lock_aspect(start: &PixelRect, rect: &PixelRect, handle: ResizeHandle) -> PixelRect {
    if start.width <= 0.0 || start.height <= 0.0 {
        return *rect;
    }
    let ratio = start.width / start.height;
    let center = start.center();
    let mut out = *rect;

    if !handle.affects_width() {
        // n / s: height drives width, centered horizontally
        out.width = rect.height * ratio;
        out.x = center.x - out.width / 2.0;
    } else if !handle.affects_height() {
        // e / w: width drives height, centered vertically
        out.height = rect.width / ratio;
        out.y = center.y - out.height / 2.0;
    } else {
        // corners: the dominant axis of change drives the other one
        let width_change = (rect.width - start.width).abs();
        let height_change = (rect.height - start.height).abs();
        if width_change > height_change {
            out.height = rect.width / ratio;
            if handle.moves_top() {
                out.y = start.bottom() - out.height;
            }
        } else {
            out.width = rect.height * ratio;
            if handle.moves_left() {
                out.x = start.right() - out.width;
            }
        }
    }
    out
}

fn clamp(
    start: &PixelRect,
    mut rect: PixelRect,
    handle: ResizeHandle,
    modifiers: Modifiers,
    constraints: &SizeConstraints,
) -> PixelRect {
    let pin_x = axis_pin(modifiers, handle.moves_left(), handle.affects_width());
    let pin_y = axis_pin(modifiers, handle.moves_top(), handle.affects_height());
    let max = constraints.max;

    (rect.x, rect.width) = clamp_axis(
        rect.x,
        rect.width,
        constraints.min.width,
        max.map(|m| m.width),
        start.x,
        start.right(),
        pin_x,
    );
    (rect.y, rect.height) = clamp_axis(
        rect.y,
        rect.height,
        constraints.min.height,
        max.map(|m| m.height),
        start.y,
        start.bottom(),
        pin_y,
    );
    rect
}

fn axis_pin(modifiers: Modifiers, moves_start_edge: bool, affected: bool) -> AxisPin {
    if modifiers.alt || (modifiers.shift && !affected) {
        AxisPin::Center
    } else if moves_start_edge {
        AxisPin::End
    } else {
        AxisPin::Start
    }
}

fn clamp_axis(
    pos: f64,
    len: f64,
    min: f64,
    max: Option<f64>,
    start_pos: f64,
    start_end: f64,
    pin: AxisPin,
) -> (f64, f64) {
    let mut clamped = len.max(min);
    if let Some(max) = max {
        clamped = clamped.min(max.max(min));
    }
    if clamped == len {
        return (pos, len);
    }
    trace!(requested = len, clamped, "Resize clamped to size limits");
    let pos = match pin {
        AxisPin::Start => pos,
        AxisPin::End => start_end - clamped,
        AxisPin::Center => (start_pos + start_end) / 2.0 - clamped / 2.0,
    };
    (pos, clamped)
}
