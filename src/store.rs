//! Coordinate store - the two-layer state of one editable element.
//!
//! ## Layers
//!
//! ```text
//! anchor element      left% / top% / width px / height px   (persisted)
//!   interactive child translate / scale / rotate            (identity at rest)
//! ```
//!
//! The anchor is the only source for the start of the next gesture. The
//! transform is written but never read back to derive a position.

use crate::constants::{TRANSITION_DURATION_MS, TRANSITION_RESET_DELAY_MS};
use crate::error::DetachedElementError;
use crate::input::coords::{CoordinateContext, CoordinateConverter};
use crate::render::{AnchorStyle, RenderTarget, TransformStyle, TransitionScheduler, TransitionToken};
use crate::types::{AnchorOrigin, AnchorState, PixelRect, Point, Size, TransformOffset};
use std::time::Duration;
use tracing::{debug, trace};

/// Timing of animated transform updates
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransitionTiming {
    pub duration: Duration,
    /// Delay before transitions are switched off again
    pub reset_delay: Duration,
}

impl Default for TransitionTiming {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(TRANSITION_DURATION_MS),
            reset_delay: Duration::from_millis(TRANSITION_RESET_DELAY_MS),
        }
    }
}

/// Visually effective placement: anchor resolved to pixels plus transform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UnifiedPosition {
    /// Left edge of the visual box, parent-relative pixels
    pub effective_x: f64,
    /// Top edge of the visual box, parent-relative pixels
    pub effective_y: f64,
    pub effective_width: f64,
    pub effective_height: f64,
    pub anchor: AnchorState,
    pub transform: TransformOffset,
}

impl UnifiedPosition {
    pub fn rect(&self) -> PixelRect {
        PixelRect::new(
            self.effective_x,
            self.effective_y,
            self.effective_width,
            self.effective_height,
        )
    }
}

pub struct CoordinateStore {
    node_id: String,
    origin: AnchorOrigin,
    anchor: AnchorState,
    transform: TransformOffset,
    /// Live size of an in-progress resize; a layout override, not anchor state
    gesture_size: Option<Size>,
    default_anchor: AnchorState,
    target: Box<dyn RenderTarget>,
    scheduler: Option<Box<dyn TransitionScheduler>>,
    timing: TransitionTiming,
    transition_generation: u64,
    transition_active: bool,
}

impl CoordinateStore {
    /// Create a store at `default_anchor` and paint both layers.
    pub fn new(
        node_id: impl Into<String>,
        origin: AnchorOrigin,
        default_anchor: AnchorState,
        target: Box<dyn RenderTarget>,
    ) -> Self {
        let mut store = Self {
            node_id: node_id.into(),
            origin,
            anchor: default_anchor,
            transform: TransformOffset::IDENTITY,
            gesture_size: None,
            default_anchor,
            target,
            scheduler: None,
            timing: TransitionTiming::default(),
            transition_generation: 0,
            transition_active: false,
        };
        store.apply_layout();
        store.apply_transform_style();
        store
    }

    pub fn with_scheduler(mut self, scheduler: Box<dyn TransitionScheduler>) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    pub fn with_timing(mut self, timing: TransitionTiming) -> Self {
        self.timing = timing;
        self
    }

    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    pub fn origin(&self) -> AnchorOrigin {
        self.origin
    }

    pub fn anchor(&self) -> AnchorState {
        self.anchor
    }

    pub fn transform(&self) -> TransformOffset {
        self.transform
    }

    pub fn gesture_size(&self) -> Option<Size> {
        self.gesture_size
    }

    /// True when the transform is identity and no resize override is live
    pub fn is_at_rest(&self) -> bool {
        self.transform.is_identity() && self.gesture_size.is_none()
    }

    pub fn is_transition_active(&self) -> bool {
        self.transition_active
    }

    // ========================================================================
    // Layer writes
    // ========================================================================

    /// Overwrite the anchor entirely and repaint the layout layer.
    pub fn set_anchor(&mut self, anchor: AnchorState) {
        self.anchor = anchor;
        self.apply_layout();
    }

    /// Apply a transform to the interactive layer.
    ///
    /// `animated` turns on a transition for this write only; a reset is
    /// scheduled so later programmatic writes are instantaneous again.
    pub fn set_transform(&mut self, offset: TransformOffset, animated: bool) {
        self.transform = offset;
        if animated {
            self.start_transition();
        } else if self.transition_active {
            self.stop_transition();
        }
        self.apply_transform_style();
    }

    /// Handle a fired transition-reset callback. Returns false for stale tokens.
    pub fn finish_transition(&mut self, token: TransitionToken) -> bool {
        if token.0 != self.transition_generation || !self.transition_active {
            trace!(node_id = %self.node_id, token = token.0, "Ignoring stale transition token");
            return false;
        }
        self.stop_transition();
        true
    }

    pub(crate) fn set_gesture_size(&mut self, size: Option<Size>) {
        if self.gesture_size != size {
            self.gesture_size = size;
            self.apply_layout();
        }
    }

    /// Defaults: default anchor, identity transform, no resize override.
    pub fn reset(&mut self) {
        debug!(node_id = %self.node_id, "Resetting coordinate store");
        self.gesture_size = None;
        self.set_anchor(self.default_anchor);
        self.set_transform(TransformOffset::IDENTITY, false);
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Measure the parent now.
    pub fn measure_parent(&self) -> Result<Size, DetachedElementError> {
        self.target
            .measure_parent()
            .filter(|size| !size.is_degenerate())
            .ok_or_else(|| DetachedElementError {
                node_id: self.node_id.clone(),
            })
    }

    pub fn coordinate_context(&self) -> Result<CoordinateContext, DetachedElementError> {
        Ok(CoordinateContext::new(self.measure_parent()?, self.origin))
    }

    /// The anchor alone resolved to pixels (start point of every gesture)
    pub fn anchor_rect(&self, ctx: &CoordinateContext) -> PixelRect {
        CoordinateConverter::anchor_to_rect(&self.anchor, ctx)
    }

    /// The layout box: the anchor with any live resize size applied
    pub fn layout_rect(&self, ctx: &CoordinateContext) -> PixelRect {
        let mut anchor = self.anchor;
        if let Some(size) = self.gesture_size {
            anchor.width = size.width;
            anchor.height = size.height;
        }
        CoordinateConverter::anchor_to_rect(&anchor, ctx)
    }

    /// The visual box: layout box translated, then scaled about its center
    pub fn effective_rect(&self, ctx: &CoordinateContext) -> PixelRect {
        let layout = self.layout_rect(ctx);
        let center = layout.center();
        PixelRect::from_center(
            Point::new(
                center.x + self.transform.translate_x,
                center.y + self.transform.translate_y,
            ),
            Size::new(
                layout.width * self.transform.scale,
                layout.height * self.transform.scale,
            ),
        )
    }

    /// Visually effective position. Pure read.
    pub fn unified_position(&self) -> Result<UnifiedPosition, DetachedElementError> {
        let ctx = self.coordinate_context()?;
        let rect = self.effective_rect(&ctx);
        Ok(UnifiedPosition {
            effective_x: rect.x,
            effective_y: rect.y,
            effective_width: rect.width,
            effective_height: rect.height,
            anchor: self.anchor,
            transform: self.transform,
        })
    }

    /// Show `rect` during a gesture: size via the layout override, position
    /// via the transform. The anchor itself is not touched.
    pub(crate) fn present_rect(&mut self, rect: PixelRect, ctx: &CoordinateContext) {
        let size = rect.size();
        let override_size = (size != self.anchor.size()).then_some(size);
        self.set_gesture_size(override_size);

        let base = self.layout_rect(ctx).center();
        let center = rect.center();
        self.set_transform(
            TransformOffset::translate(center.x - base.x, center.y - base.y),
            false,
        );
    }

    // ========================================================================
    // Painting
    // ========================================================================

    fn apply_layout(&mut self) {
        let size = self.gesture_size.unwrap_or(self.anchor.size());
        let style = AnchorStyle {
            left_pct: self.anchor.left,
            top_pct: self.anchor.top,
            width_px: size.width,
            height_px: size.height,
            origin: self.origin,
        };
        self.target.apply_anchor(&style);
    }

    fn apply_transform_style(&mut self) {
        let style = TransformStyle {
            offset: self.transform,
        };
        self.target.apply_transform(&style);
    }

    fn start_transition(&mut self) {
        self.transition_generation += 1;
        self.transition_active = true;
        self.target.set_transition(Some(self.timing.duration));
        let token = TransitionToken(self.transition_generation);
        match self.scheduler.as_mut() {
            Some(scheduler) => scheduler.schedule_reset(self.timing.reset_delay, token),
            None => trace!(
                node_id = %self.node_id,
                "No transition scheduler; transition stays on until the next instant write"
            ),
        }
    }

    fn stop_transition(&mut self) {
        self.transition_active = false;
        self.target.set_transition(None);
    }
}

impl std::fmt::Debug for CoordinateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoordinateStore")
            .field("node_id", &self.node_id)
            .field("origin", &self.origin)
            .field("anchor", &self.anchor)
            .field("transform", &self.transform)
            .field("gesture_size", &self.gesture_size)
            .finish_non_exhaustive()
    }
}
