//! Coordinate conversion between the anchor (percent) space and pixels.
//!
//! Every percent <-> pixel formula lives here so the store, the drag session
//! and the commit path cannot disagree about what a percentage means.

use crate::types::{AnchorOrigin, AnchorState, PixelRect, Point, Size};

/// Context needed for coordinate conversions
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoordinateContext {
    /// Parent container size measured at conversion time
    pub parent: Size,
    pub origin: AnchorOrigin,
}

impl CoordinateContext {
    #[inline]
    pub fn new(parent: Size, origin: AnchorOrigin) -> Self {
        Self { parent, origin }
    }
}

pub struct CoordinateConverter;

impl CoordinateConverter {
    /// Resolve an anchor into a parent-relative pixel rectangle
    #[inline]
    pub fn anchor_to_rect(anchor: &AnchorState, ctx: &CoordinateContext) -> PixelRect {
        let ref_point = Point::new(
            anchor.left / 100.0 * ctx.parent.width,
            anchor.top / 100.0 * ctx.parent.height,
        );
        match ctx.origin {
            AnchorOrigin::Center => PixelRect::from_center(ref_point, anchor.size()),
            AnchorOrigin::TopLeft => {
                PixelRect::new(ref_point.x, ref_point.y, anchor.width, anchor.height)
            }
        }
    }

    /// Convert a parent-relative pixel rectangle back into an anchor
    #[inline]
    pub fn rect_to_anchor(rect: &PixelRect, ctx: &CoordinateContext) -> AnchorState {
        let ref_point = match ctx.origin {
            AnchorOrigin::Center => rect.center(),
            AnchorOrigin::TopLeft => Point::new(rect.x, rect.y),
        };
        AnchorState::new(
            ref_point.x / ctx.parent.width * 100.0,
            ref_point.y / ctx.parent.height * 100.0,
            rect.width,
            rect.height,
        )
    }
}
