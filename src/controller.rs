//! Element controller - one editable element's store, session and wiring.
//!
//! ```text
//! pointer down  -> begin     (Resting -> Editing)
//! pointer move  -> update
//! key down/up   -> update_modifiers
//! pointer up    -> end       (commit + persist, or click)
//! escape        -> cancel    (discard)
//! ```
//!
//! Errors from the session never leave the transform dangling: a detached
//! parent or a failed commit discards the in-progress transform before the
//! error is returned.

use crate::commit::{CommitEngine, CommitOutcome};
use crate::config::{EditorConfig, TeardownPolicy};
use crate::constants::NODE_ID_PREFIX;
use crate::error::{DetachedElementError, GestureError, GestureResult, StorageResult};
use crate::input::coords::{CoordinateContext, CoordinateConverter};
use crate::input::{DragSession, UpdateOutcome};
use crate::perf::{COMMIT_BUDGET_MS, OperationStats, ScopedTimer, UPDATE_BUDGET_MS};
use crate::persistence::{PositionRecord, PositionStore};
use crate::render::{RenderTarget, TransitionScheduler, TransitionToken};
use crate::store::{CoordinateStore, UnifiedPosition};
use crate::types::{AnchorState, GestureKind, Modifiers, PointerInput, TransformOffset};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Whether the element is being edited
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EditPhase {
    #[default]
    Resting,
    Editing,
}

/// How a gesture ended
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GestureOutcome {
    /// Pointer never left the click radius; nothing was committed
    Click,
    Committed {
        anchor: AnchorState,
        /// The record reached the position store
        persisted: bool,
    },
}

/// Hot-path timings, for hosts that surface them
#[derive(Clone, Debug, Default)]
pub struct ControllerTimings {
    pub update: OperationStats,
    pub commit: OperationStats,
}

pub struct ElementControllerBuilder {
    target: Box<dyn RenderTarget>,
    node_id: Option<String>,
    config: EditorConfig,
    persistence: Option<Arc<dyn PositionStore>>,
    scheduler: Option<Box<dyn TransitionScheduler>>,
}

impl ElementControllerBuilder {
    pub fn node_id(mut self, node_id: impl Into<String>) -> Self {
        self.node_id = Some(node_id.into());
        self
    }

    pub fn config(mut self, config: EditorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn persistence(mut self, store: Arc<dyn PositionStore>) -> Self {
        self.persistence = Some(store);
        self
    }

    pub fn scheduler(mut self, scheduler: Box<dyn TransitionScheduler>) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    pub fn build(self) -> ElementController {
        let node_id = self
            .node_id
            .unwrap_or_else(|| format!("{NODE_ID_PREFIX}{}", uuid::Uuid::new_v4()));
        let mut store = CoordinateStore::new(
            node_id,
            self.config.origin,
            self.config.default_anchor,
            self.target,
        )
        .with_timing(self.config.transition_timing());
        if let Some(scheduler) = self.scheduler {
            store = store.with_scheduler(scheduler);
        }
        let session = DragSession::new(self.config.drag_threshold_px, self.config.size_constraints());

        ElementController {
            store,
            session,
            config: self.config,
            persistence: self.persistence,
            phase: EditPhase::Resting,
            timings: ControllerTimings::default(),
        }
    }
}

pub struct ElementController {
    store: CoordinateStore,
    session: DragSession,
    config: EditorConfig,
    persistence: Option<Arc<dyn PositionStore>>,
    phase: EditPhase,
    timings: ControllerTimings,
}

impl ElementController {
    pub fn builder(target: Box<dyn RenderTarget>) -> ElementControllerBuilder {
        ElementControllerBuilder {
            target,
            node_id: None,
            config: EditorConfig::default(),
            persistence: None,
            scheduler: None,
        }
    }

    pub fn node_id(&self) -> &str {
        self.store.node_id()
    }

    pub fn store(&self) -> &CoordinateStore {
        &self.store
    }

    pub fn session(&self) -> &DragSession {
        &self.session
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn phase(&self) -> EditPhase {
        self.phase
    }

    pub fn timings(&self) -> &ControllerTimings {
        &self.timings
    }

    pub fn unified_position(&self) -> Result<UnifiedPosition, DetachedElementError> {
        self.store.unified_position()
    }

    // ========================================================================
    // Gesture handlers
    // ========================================================================

    /// Pointer down on the element or one of its handles.
    pub fn begin(
        &mut self,
        pointer: PointerInput,
        kind: GestureKind,
        modifiers: Modifiers,
    ) -> GestureResult<()> {
        if self.session.is_active() {
            let err = GestureError::invalid("begin", self.session.state().name());
            warn!(node_id = self.node_id(), error = %err, "Ignoring re-entrant gesture start");
            return Err(err);
        }

        // A programmatic transform still on screen is folded first, so the
        // gesture starts where the element is drawn.
        if !self.store.is_at_rest() {
            debug!(node_id = self.node_id(), "Folding pending transform before gesture");
            if let Err(err) = CommitEngine::commit(&mut self.store) {
                CommitEngine::discard(&mut self.store);
                return Err(err.into());
            }
        }

        self.session.begin(&self.store, pointer, kind, modifiers)?;
        self.phase = EditPhase::Editing;
        Ok(())
    }

    /// Pointer move.
    pub fn update(&mut self, pointer: PointerInput) -> GestureResult<UpdateOutcome> {
        let timer = ScopedTimer::new("pointer_update", UPDATE_BUDGET_MS);
        let result = self.session.update(&mut self.store, pointer);
        self.timings.update.record(timer.elapsed_ms());
        result.inspect_err(|err| self.log_rejected("update", err))
    }

    /// Modifier keys changed mid-gesture.
    pub fn update_modifiers(&mut self, modifiers: Modifiers) -> GestureResult<UpdateOutcome> {
        let timer = ScopedTimer::new("modifier_update", UPDATE_BUDGET_MS);
        let result = self.session.update_modifiers(&mut self.store, modifiers);
        self.timings.update.record(timer.elapsed_ms());
        result.inspect_err(|err| self.log_rejected("update modifiers", err))
    }

    /// Pointer up: commit an engaged gesture, or report a click.
    pub fn end(&mut self) -> GestureResult<GestureOutcome> {
        let finished = match self.session.end() {
            Ok(finished) => finished,
            Err(err) => {
                self.log_rejected("end", &err);
                return Err(err);
            }
        };

        if !finished.engaged {
            CommitEngine::discard(&mut self.store);
            self.phase = EditPhase::Resting;
            debug!(node_id = self.node_id(), kind = %finished.snapshot.kind, "Gesture ended as click");
            return Ok(GestureOutcome::Click);
        }

        match self.commit_and_persist() {
            Ok((outcome, persisted)) => Ok(GestureOutcome::Committed {
                anchor: outcome.anchor,
                persisted,
            }),
            Err(err) => {
                warn!(node_id = self.node_id(), error = %err, "Commit failed; discarding gesture");
                CommitEngine::discard(&mut self.store);
                self.phase = EditPhase::Resting;
                Err(err.into())
            }
        }
    }

    /// Escape, pointer cancel or lost capture: drop the gesture.
    pub fn cancel(&mut self) {
        if self.session.abort().is_some() {
            debug!(node_id = self.node_id(), "Gesture cancelled");
        }
        CommitEngine::discard(&mut self.store);
        self.phase = EditPhase::Resting;
    }

    // ========================================================================
    // Programmatic edits
    // ========================================================================

    /// Fold the current transform into the anchor outside a gesture.
    pub fn commit(&mut self) -> GestureResult<CommitOutcome> {
        self.ensure_idle("commit")?;
        let (outcome, _) = self.commit_and_persist()?;
        Ok(outcome)
    }

    /// Drop the current transform outside a gesture.
    pub fn discard(&mut self) -> GestureResult<()> {
        self.ensure_idle("discard")?;
        CommitEngine::discard(&mut self.store);
        Ok(())
    }

    /// Place the element at `anchor` directly.
    pub fn set_anchor(&mut self, anchor: AnchorState) -> GestureResult<()> {
        self.ensure_idle("set anchor")?;
        CommitEngine::discard(&mut self.store);
        self.store.set_anchor(anchor);
        Ok(())
    }

    /// Animate the visual layer to `offset`; `commit` makes it permanent.
    pub fn animate_to(&mut self, offset: TransformOffset) -> GestureResult<()> {
        self.ensure_idle("animate")?;
        self.store.set_transform(offset, true);
        Ok(())
    }

    /// Forwarded from the host when a scheduled transition reset fires.
    pub fn finish_transition(&mut self, token: TransitionToken) -> bool {
        self.store.finish_transition(token)
    }

    /// Load this element's anchor from the position store.
    ///
    /// Returns true when a record was applied. A record saved under the
    /// other origin is converted, which needs the parent measured.
    pub fn restore(&mut self) -> StorageResult<bool> {
        let Some(persistence) = self.persistence.clone() else {
            return Ok(false);
        };
        let Some(record) = persistence.load(self.node_id())? else {
            return Ok(false);
        };

        let anchor = if record.origin == self.store.origin() {
            record.anchor
        } else {
            let Ok(parent) = self.store.measure_parent() else {
                warn!(
                    node_id = self.node_id(),
                    "Cannot convert stored anchor origin while detached; keeping current anchor"
                );
                return Ok(false);
            };
            let rect = CoordinateConverter::anchor_to_rect(
                &record.anchor,
                &CoordinateContext::new(parent, record.origin),
            );
            CoordinateConverter::rect_to_anchor(&rect, &CoordinateContext::new(parent, self.store.origin()))
        };

        self.session.abort();
        CommitEngine::discard(&mut self.store);
        self.store.set_anchor(anchor);
        info!(node_id = self.node_id(), left = anchor.left, top = anchor.top, "Restored anchor");
        Ok(true)
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Leave edit mode, settling any in-progress transform per the
    /// configured teardown policy.
    pub fn exit_edit_mode(&mut self) {
        self.session.abort();
        match self.config.teardown {
            TeardownPolicy::Commit => {
                if let Err(err) = self.commit_and_persist() {
                    warn!(node_id = self.node_id(), error = %err, "Commit on exit failed; discarding");
                    CommitEngine::discard(&mut self.store);
                }
            }
            TeardownPolicy::Discard => CommitEngine::discard(&mut self.store),
        }
        self.phase = EditPhase::Resting;
    }

    /// Element removed: settle per teardown policy, then reset the store.
    pub fn teardown(&mut self) {
        self.exit_edit_mode();
        self.store.reset();
        debug!(node_id = self.node_id(), "Controller torn down");
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn ensure_idle(&self, operation: &'static str) -> GestureResult<()> {
        if self.session.is_active() {
            let err = GestureError::invalid(operation, self.session.state().name());
            warn!(node_id = self.node_id(), error = %err, "Rejected during active gesture");
            return Err(err);
        }
        Ok(())
    }

    fn commit_and_persist(&mut self) -> Result<(CommitOutcome, bool), DetachedElementError> {
        let timer = ScopedTimer::new("commit", COMMIT_BUDGET_MS);
        let outcome = CommitEngine::commit(&mut self.store)?;
        self.timings.commit.record(timer.elapsed_ms());
        self.phase = EditPhase::Resting;

        let persisted = outcome.changed && self.persist(outcome.anchor);
        Ok((outcome, persisted))
    }

    fn persist(&self, anchor: AnchorState) -> bool {
        if !self.config.persist_on_commit {
            return false;
        }
        let Some(persistence) = &self.persistence else {
            return false;
        };
        let record = PositionRecord::new(self.node_id(), anchor, self.store.origin());
        match persistence.save(&record) {
            Ok(()) => true,
            Err(err) => {
                warn!(node_id = self.node_id(), error = %err, "Failed to persist anchor");
                false
            }
        }
    }

    fn log_rejected(&self, operation: &str, err: &GestureError) {
        debug!(node_id = self.node_id(), operation, error = %err, "Gesture call rejected");
    }
}

impl std::fmt::Debug for ElementController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElementController")
            .field("store", &self.store)
            .field("session", &self.session.state().name())
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}
