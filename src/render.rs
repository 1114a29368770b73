//! Render-layer contract.
//!
//! An editable element is drawn as two nested layers: the *anchor* layer
//! carries layout properties (`left%`, `top%`, `width`, `height`) and the
//! *interactive* child carries the visual transform. Keeping them on separate
//! elements means a layout change never touches the transform's compositing
//! layer.

use crate::types::{AnchorOrigin, Size, TransformOffset};
use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

/// Layout properties written to the anchor layer
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnchorStyle {
    pub left_pct: f64,
    pub top_pct: f64,
    pub width_px: f64,
    pub height_px: f64,
    pub origin: AnchorOrigin,
}

impl AnchorStyle {
    /// CSS declarations for the anchor element
    pub fn to_css(&self) -> String {
        let mut css = format!(
            "left: {:.2}%; top: {:.2}%; width: {}px; height: {}px;",
            self.left_pct, self.top_pct, self.width_px, self.height_px
        );
        if self.origin == AnchorOrigin::Center {
            css.push_str(" transform: translate(-50%, -50%);");
        }
        css
    }
}

/// Visual transform written to the interactive layer
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformStyle {
    pub offset: TransformOffset,
}

impl fmt::Display for TransformStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let o = &self.offset;
        write!(
            f,
            "translate({}px, {}px) scale({}) rotate({}deg)",
            o.translate_x, o.translate_y, o.scale, o.rotation
        )
    }
}

/// The element a coordinate store paints into.
pub trait RenderTarget {
    /// Current parent container size, or `None` when the element is detached
    fn measure_parent(&self) -> Option<Size>;

    /// Write layout properties to the anchor layer
    fn apply_anchor(&mut self, style: &AnchorStyle);

    /// Write the visual transform to the interactive layer
    fn apply_transform(&mut self, style: &TransformStyle);

    /// Enable (`Some`) or disable (`None`) transform transitions
    fn set_transition(&mut self, transition: Option<Duration>);
}

/// Identifies one scheduled transition reset. Stale tokens are ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TransitionToken(pub(crate) u64);

/// Host hook that runs the transition reset after a delay.
///
/// The host must call `CoordinateStore::finish_transition(token)` (or the
/// controller equivalent) once `delay` has elapsed. Fire-and-forget: nothing
/// waits on it.
pub trait TransitionScheduler {
    fn schedule_reset(&mut self, delay: Duration, token: TransitionToken);
}

// ============================================================================
// Headless implementations
// ============================================================================

/// Recorded state of a [`HeadlessTarget`]
#[derive(Debug, Default, Clone)]
pub struct HeadlessState {
    pub parent: Option<Size>,
    pub anchor: Option<AnchorStyle>,
    pub transform: Option<TransformStyle>,
    pub transition: Option<Duration>,
    pub anchor_writes: usize,
    pub transform_writes: usize,
}

/// In-memory render target. Clones share state, so a caller can keep a
/// handle to resize or detach the parent after giving one to a controller.
#[derive(Clone, Debug, Default)]
pub struct HeadlessTarget {
    inner: Rc<RefCell<HeadlessState>>,
}

impl HeadlessTarget {
    pub fn new(parent: Size) -> Self {
        let target = Self::default();
        target.inner.borrow_mut().parent = Some(parent);
        target
    }

    /// Remove the element's parent from the document
    pub fn detach(&self) {
        self.inner.borrow_mut().parent = None;
    }

    /// Attach (or re-attach) to a parent of the given size
    pub fn attach(&self, parent: Size) {
        self.inner.borrow_mut().parent = Some(parent);
    }

    pub fn state(&self) -> Ref<'_, HeadlessState> {
        self.inner.borrow()
    }
}

impl RenderTarget for HeadlessTarget {
    fn measure_parent(&self) -> Option<Size> {
        self.inner.borrow().parent
    }

    fn apply_anchor(&mut self, style: &AnchorStyle) {
        let mut state = self.inner.borrow_mut();
        state.anchor = Some(*style);
        state.anchor_writes += 1;
    }

    fn apply_transform(&mut self, style: &TransformStyle) {
        let mut state = self.inner.borrow_mut();
        state.transform = Some(*style);
        state.transform_writes += 1;
    }

    fn set_transition(&mut self, transition: Option<Duration>) {
        self.inner.borrow_mut().transition = transition;
    }
}

/// Scheduler that queues resets for the host loop to fire later.
#[derive(Clone, Debug, Default)]
pub struct QueuedScheduler {
    pending: Rc<RefCell<Vec<(Duration, TransitionToken)>>>,
}

impl QueuedScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every queued reset, oldest first
    pub fn take_pending(&self) -> Vec<(Duration, TransitionToken)> {
        std::mem::take(&mut *self.pending.borrow_mut())
    }

    pub fn pending_len(&self) -> usize {
        self.pending.borrow().len()
    }
}

impl TransitionScheduler for QueuedScheduler {
    fn schedule_reset(&mut self, delay: Duration, token: TransitionToken) {
        self.pending.borrow_mut().push((delay, token));
    }
}
