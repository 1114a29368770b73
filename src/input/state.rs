//! Drag session - the lifecycle of one pointer gesture.
//!
//! ## State Transitions
//!
//! ```text
//! Idle   -> Active   (begin: snapshot captured)
//! Active -> Active   (update / update_modifiers: transform recomputed)
//! Active -> Idle     (end: handed to the commit engine)
//! Active -> Idle     (abort: cancelled, transform discarded by the caller)
//! ```
//!
//! `begin` while Active and `update`/`end` while Idle are rejected with
//! `InvalidState` and leave the session untouched.

use super::coords::CoordinateContext;
use super::resize::{SizeConstraints, resize_rect};
use crate::constants::DRAG_THRESHOLD_PX;
use crate::error::{GestureError, GestureResult};
use crate::perf::UPDATE_BUDGET_MS;
use crate::profile_scope;
use crate::store::CoordinateStore;
use crate::types::{
    AnchorState, GestureKind, Modifiers, PixelRect, Point, PointerInput, Size, TransformOffset,
};
use tracing::{debug, trace, warn};

/// Captured once at gesture start; immutable for the gesture's duration.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSnapshot {
    pub start_pointer: Point,
    /// Anchor at gesture start (never the transform)
    pub start_anchor: AnchorState,
    /// Anchor resolved to pixels at gesture start
    pub start_rect: PixelRect,
    pub start_transform: TransformOffset,
    pub kind: GestureKind,
    pub modifiers: Modifiers,
    /// Pointer that started the gesture; other pointers are ignored
    pub pointer_id: Option<u32>,
    /// Parent size measured at gesture start
    pub parent: Size,
}

/// Mutable progress of an active gesture
#[derive(Debug, Clone)]
pub struct ActiveDrag {
    snapshot: DragSnapshot,
    /// Key state now (keys may change mid-gesture)
    modifiers: Modifiers,
    last_pointer: Point,
    /// Pointer travel crossed the drag threshold
    engaged: bool,
}

impl ActiveDrag {
    pub fn snapshot(&self) -> &DragSnapshot {
        &self.snapshot
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    pub fn is_engaged(&self) -> bool {
        self.engaged
    }
}

/// Session state
#[derive(Debug, Clone, Default)]
pub enum DragState {
    #[default]
    Idle,
    Active(ActiveDrag),
}

impl DragState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Active(_) => "active",
        }
    }
}

/// What an update did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UpdateOutcome {
    /// Transform recomputed; `first` is true on the sample that crossed the threshold
    Applied { first: bool },
    /// Pointer has not left the click radius yet
    BelowThreshold,
    /// Sample from a different pointer than the one that began the gesture
    Ignored,
}

/// A gesture returned by `end`, ready for commit
#[derive(Debug, Clone, PartialEq)]
pub struct FinishedGesture {
    pub snapshot: DragSnapshot,
    /// False when the pointer never left the click radius
    pub engaged: bool,
}

/// Per-element drag session. Never shared between elements.
#[derive(Debug, Clone)]
pub struct DragSession {
    state: DragState,
    threshold_px: f64,
    constraints: SizeConstraints,
}

impl Default for DragSession {
    fn default() -> Self {
        Self::new(DRAG_THRESHOLD_PX, SizeConstraints::default())
    }
}

impl DragSession {
    pub fn new(threshold_px: f64, constraints: SizeConstraints) -> Self {
        Self {
            state: DragState::Idle,
            threshold_px: threshold_px.max(0.0),
            constraints,
        }
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, DragState::Active(_))
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, DragState::Idle)
    }

    pub fn snapshot(&self) -> Option<&DragSnapshot> {
        match &self.state {
            DragState::Active(active) => Some(&active.snapshot),
            DragState::Idle => None,
        }
    }

    pub fn is_engaged(&self) -> bool {
        match &self.state {
            DragState::Active(active) => active.engaged,
            DragState::Idle => false,
        }
    }

    pub fn constraints(&self) -> &SizeConstraints {
        &self.constraints
    }

    /// Start a gesture. The start rect comes from the anchor only.
    pub fn begin(
        &mut self,
        store: &CoordinateStore,
        pointer: PointerInput,
        kind: GestureKind,
        modifiers: Modifiers,
    ) -> GestureResult<()> {
        if self.is_active() {
            return Err(GestureError::invalid("begin", self.state.name()));
        }
        let ctx = store.coordinate_context()?;
        let start_transform = store.transform();
        if !store.is_at_rest() {
            warn!(
                node_id = store.node_id(),
                "Gesture started with a non-identity transform; starting from the anchor"
            );
        }

        let snapshot = DragSnapshot {
            start_pointer: pointer.position,
            start_anchor: store.anchor(),
            start_rect: store.anchor_rect(&ctx),
            start_transform,
            kind,
            modifiers,
            pointer_id: pointer.pointer_id,
            parent: ctx.parent,
        };
        debug!(
            node_id = store.node_id(),
            kind = %kind,
            x = pointer.position.x,
            y = pointer.position.y,
            "Drag session started"
        );
        self.state = DragState::Active(ActiveDrag {
            snapshot,
            modifiers,
            last_pointer: pointer.position,
            engaged: false,
        });
        Ok(())
    }

    /// Recompute the transform for a new pointer position.
    pub fn update(
        &mut self,
        store: &mut CoordinateStore,
        pointer: PointerInput,
    ) -> GestureResult<UpdateOutcome> {
        profile_scope!("drag_update", UPDATE_BUDGET_MS);
        let threshold = self.threshold_px;
        let constraints = self.constraints;
        let DragState::Active(active) = &mut self.state else {
            return Err(GestureError::invalid("update", "idle"));
        };

        if active.snapshot.pointer_id.is_some() && pointer.pointer_id != active.snapshot.pointer_id {
            trace!(
                pointer_id = ?pointer.pointer_id,
                active_id = ?active.snapshot.pointer_id,
                "Ignoring sample from foreign pointer"
            );
            return Ok(UpdateOutcome::Ignored);
        }

        active.last_pointer = pointer.position;
        let first = !active.engaged;
        if first {
            if active.snapshot.start_pointer.distance_to(pointer.position) < threshold {
                return Ok(UpdateOutcome::BelowThreshold);
            }
            active.engaged = true;
            debug!(node_id = store.node_id(), "Pointer left click radius, drag engaged");
        }

        Self::apply(active, store, &constraints);
        Ok(UpdateOutcome::Applied { first })
    }

    /// Re-evaluate the gesture with new modifier keys (keydown/keyup).
    pub fn update_modifiers(
        &mut self,
        store: &mut CoordinateStore,
        modifiers: Modifiers,
    ) -> GestureResult<UpdateOutcome> {
        let constraints = self.constraints;
        let DragState::Active(active) = &mut self.state else {
            return Err(GestureError::invalid("update modifiers", "idle"));
        };
        if active.modifiers == modifiers {
            return Ok(UpdateOutcome::Ignored);
        }
        active.modifiers = modifiers;
        if !active.engaged {
            return Ok(UpdateOutcome::BelowThreshold);
        }
        Self::apply(active, store, &constraints);
        Ok(UpdateOutcome::Applied { first: false })
    }

    /// Finish the gesture and return to Idle.
    pub fn end(&mut self) -> GestureResult<FinishedGesture> {
        match std::mem::take(&mut self.state) {
            DragState::Active(active) => Ok(FinishedGesture {
                snapshot: active.snapshot,
                engaged: active.engaged,
            }),
            DragState::Idle => Err(GestureError::invalid("end", "idle")),
        }
    }

    /// Drop the gesture without finishing it. Always leaves the session Idle.
    pub fn abort(&mut self) -> Option<DragSnapshot> {
        match std::mem::take(&mut self.state) {
            DragState::Active(active) => Some(active.snapshot),
            DragState::Idle => None,
        }
    }

    fn apply(active: &ActiveDrag, store: &mut CoordinateStore, constraints: &SizeConstraints) {
        let snapshot = &active.snapshot;
        let delta = Point::new(
            active.last_pointer.x - snapshot.start_pointer.x,
            active.last_pointer.y - snapshot.start_pointer.y,
        );
        let ctx = CoordinateContext::new(snapshot.parent, store.origin());

        let rect = match snapshot.kind {
            GestureKind::Move => PixelRect {
                x: snapshot.start_rect.x + delta.x,
                y: snapshot.start_rect.y + delta.y,
                ..snapshot.start_rect
            },
            GestureKind::Resize(handle) => resize_rect(
                &snapshot.start_rect,
                handle,
                delta,
                active.modifiers,
                constraints,
            ),
        };
        store.present_rect(rect, &ctx);
    }
}
