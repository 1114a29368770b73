//! Commit engine - folds a finished gesture into the anchor.
//!
//! Commit measures the parent at commit time, converts the visually
//! effective box back into anchor percentages, and resets the transform to
//! identity. Nothing is written unless the measurement succeeds.

use crate::error::DetachedElementError;
use crate::input::coords::CoordinateConverter;
use crate::profile_scope;
use crate::store::CoordinateStore;
use crate::types::{AnchorState, TransformOffset};
use tracing::{debug, warn};

/// Result of a successful commit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CommitOutcome {
    pub anchor: AnchorState,
    /// False when the store was already at rest (no-op commit)
    pub changed: bool,
}

pub struct CommitEngine;

impl CommitEngine {
    /// Fold the transform (and any live resize size) into the anchor.
    ///
    /// Idempotent: a second commit finds the store at rest and changes
    /// nothing. Fails with `DetachedElementError` when the parent cannot be
    /// measured, leaving the anchor untouched.
    pub fn commit(store: &mut CoordinateStore) -> Result<CommitOutcome, DetachedElementError> {
        profile_scope!("commit");

        let ctx = store.coordinate_context()?;
        if store.is_at_rest() {
            snap_to_identity(store);
            return Ok(CommitOutcome {
                anchor: store.anchor(),
                changed: false,
            });
        }

        let transform = store.transform();
        if transform.rotation.abs() > f64::EPSILON {
            warn!(
                node_id = store.node_id(),
                rotation = transform.rotation,
                "Rotation cannot be stored in the anchor and is dropped on commit"
            );
        }

        let effective = store.effective_rect(&ctx);
        let anchor = CoordinateConverter::rect_to_anchor(&effective, &ctx);

        store.set_gesture_size(None);
        store.set_anchor(anchor);
        store.set_transform(TransformOffset::IDENTITY, false);

        debug!(
            node_id = store.node_id(),
            left = anchor.left,
            top = anchor.top,
            width = anchor.width,
            height = anchor.height,
            "Committed gesture to anchor"
        );
        Ok(CommitOutcome {
            anchor,
            changed: true,
        })
    }

    /// Drop the transform and live resize size without touching the anchor.
    pub fn discard(store: &mut CoordinateStore) {
        if store.is_at_rest() {
            snap_to_identity(store);
            return;
        }
        debug!(node_id = store.node_id(), "Discarding in-progress transform");
        store.set_gesture_size(None);
        store.set_transform(TransformOffset::IDENTITY, false);
    }
}

/// A transform within epsilon of identity still leaves the store holding
/// exactly `IDENTITY`.
fn snap_to_identity(store: &mut CoordinateStore) {
    if store.transform() != TransformOffset::IDENTITY {
        store.set_transform(TransformOffset::IDENTITY, false);
    }
}
