//! Multi-element editor.
//!
//! Holds one controller per element and routes pointer events to them. All
//! elements are assumed to share one parent container, so effective boxes
//! and pointer positions live in the same pixel space.
//!
//! Each pointer id drives at most one element; two pointers can edit two
//! elements at once.

use crate::controller::{ElementController, GestureOutcome};
use crate::input::UpdateOutcome;
use crate::spatial_index::SpatialIndex;
use crate::types::{GestureKind, Modifiers, Point, PointerInput};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

#[derive(Default)]
pub struct ElementRegistry {
    elements: BTreeMap<u64, ElementController>,
    index: SpatialIndex,
    /// Pointer id -> element it is dragging
    active: HashMap<Option<u32>, u64>,
    next_id: u64,
}

impl ElementRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an element on top of the stack. Returns its registry id.
    pub fn insert(&mut self, controller: ElementController) -> u64 {
        self.next_id += 1;
        let id = self.next_id;
        debug!(id, node_id = controller.node_id(), "Element registered");
        self.elements.insert(id, controller);
        self.refresh(id);
        id
    }

    /// Remove an element, settling it per its teardown policy.
    pub fn remove(&mut self, id: u64) -> Option<ElementController> {
        let mut controller = self.elements.remove(&id)?;
        self.index.remove(id);
        self.active.retain(|_, element| *element != id);
        controller.teardown();
        Some(controller)
    }

    pub fn get(&self, id: u64) -> Option<&ElementController> {
        self.elements.get(&id)
    }

    /// Mutable access for programmatic edits. Call `refresh` afterwards so
    /// hit testing sees the new box.
    pub fn get_mut(&mut self, id: u64) -> Option<&mut ElementController> {
        self.elements.get_mut(&id)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.elements.keys().copied()
    }

    /// Element being dragged by `pointer_id`, if any
    pub fn active_element(&self, pointer_id: Option<u32>) -> Option<u64> {
        self.active.get(&pointer_id).copied()
    }

    /// Topmost element under `point` (the most recently inserted wins).
    pub fn hit_test(&self, point: Point) -> Option<u64> {
        self.index.query_point(point).into_iter().max()
    }

    /// Re-read an element's effective box into the hit-test index.
    pub fn refresh(&mut self, id: u64) {
        let Some(controller) = self.elements.get(&id) else {
            return;
        };
        match controller.unified_position() {
            Ok(position) => self.index.update(id, position.rect()),
            Err(_) => {
                // Detached elements cannot be hit
                self.index.remove(id);
            }
        }
    }

    /// Pointer down: start a gesture on the element under the pointer.
    ///
    /// `kind` is decided by the host (body vs. resize handle). Returns the
    /// element id when a gesture started.
    pub fn pointer_down(
        &mut self,
        pointer: PointerInput,
        kind: GestureKind,
        modifiers: Modifiers,
    ) -> Option<u64> {
        if let Some(&busy) = self.active.get(&pointer.pointer_id) {
            warn!(pointer_id = ?pointer.pointer_id, element = busy, "Pointer already dragging an element");
            return None;
        }
        let id = self.hit_test(pointer.position)?;
        let controller = self.elements.get_mut(&id)?;
        if let Err(err) = controller.begin(pointer, kind, modifiers) {
            debug!(id, error = %err, "Gesture not started");
            return None;
        }
        self.active.insert(pointer.pointer_id, id);
        Some(id)
    }

    /// Pointer move: forward to the element this pointer is dragging.
    pub fn pointer_move(&mut self, pointer: PointerInput) -> Option<UpdateOutcome> {
        let id = *self.active.get(&pointer.pointer_id)?;
        let controller = self.elements.get_mut(&id)?;
        match controller.update(pointer) {
            Ok(outcome) => Some(outcome),
            Err(err) => {
                warn!(id, error = %err, "Pointer move failed; cancelling gesture");
                controller.cancel();
                self.active.remove(&pointer.pointer_id);
                None
            }
        }
    }

    /// Modifier keys changed: re-evaluate every active gesture.
    pub fn modifiers_changed(&mut self, modifiers: Modifiers) {
        for id in self.active.values() {
            if let Some(controller) = self.elements.get_mut(id) {
                if let Err(err) = controller.update_modifiers(modifiers) {
                    debug!(id, error = %err, "Modifier change rejected");
                }
            }
        }
    }

    /// Pointer up: finish the gesture and refresh the element's box.
    pub fn pointer_up(&mut self, pointer_id: Option<u32>) -> Option<(u64, GestureOutcome)> {
        let id = self.active.remove(&pointer_id)?;
        let controller = self.elements.get_mut(&id)?;
        let result = controller.end();
        self.refresh(id);
        match result {
            Ok(outcome) => Some((id, outcome)),
            Err(err) => {
                warn!(id, error = %err, "Gesture end failed");
                None
            }
        }
    }

    /// Pointer cancel or lost capture for one pointer.
    pub fn pointer_cancel(&mut self, pointer_id: Option<u32>) {
        let Some(id) = self.active.remove(&pointer_id) else {
            return;
        };
        if let Some(controller) = self.elements.get_mut(&id) {
            controller.cancel();
        }
    }

    /// Escape: cancel every active gesture.
    pub fn cancel_all(&mut self) {
        for (_, id) in self.active.drain() {
            if let Some(controller) = self.elements.get_mut(&id) {
                controller.cancel();
            }
        }
    }

    /// Leave edit mode on every element.
    pub fn exit_edit_mode(&mut self) {
        self.active.clear();
        let ids: Vec<u64> = self.elements.keys().copied().collect();
        for id in ids {
            if let Some(controller) = self.elements.get_mut(&id) {
                controller.exit_edit_mode();
            }
            self.refresh(id);
        }
    }
}

impl std::fmt::Debug for ElementRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElementRegistry")
            .field("elements", &self.elements.len())
            .field("active", &self.active)
            .finish()
    }
}
