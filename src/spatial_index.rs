//! Spatial Index Module
//!
//! R-tree over the elements' effective boxes, used by the registry to route
//! pointer-down to the element under the pointer in O(log n).

use crate::types::{PixelRect, Point};
use rstar::{AABB, RTree, RTreeObject};
use std::collections::HashMap;

/// One element's effective box in parent pixels.
#[derive(Debug, Clone, Copy)]
pub struct SpatialEntry {
    pub element_id: u64,
    pub rect: PixelRect,
}

impl RTreeObject for SpatialEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(
            [self.rect.x, self.rect.y],
            [self.rect.right(), self.rect.bottom()],
        )
    }
}

impl PartialEq for SpatialEntry {
    fn eq(&self, other: &Self) -> bool {
        self.element_id == other.element_id
    }
}

#[derive(Default)]
pub struct SpatialIndex {
    tree: RTree<SpatialEntry>,
    entries: HashMap<u64, SpatialEntry>,
}

impl SpatialIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the box for an element.
    pub fn update(&mut self, element_id: u64, rect: PixelRect) {
        self.remove(element_id);
        let entry = SpatialEntry { element_id, rect };
        self.tree.insert(entry);
        self.entries.insert(element_id, entry);
    }

    pub fn remove(&mut self, element_id: u64) -> bool {
        match self.entries.remove(&element_id) {
            Some(entry) => {
                self.tree.remove(&entry);
                true
            }
            None => false,
        }
    }

    /// Elements whose box contains `point`, in no particular order.
    pub fn query_point(&self, point: Point) -> Vec<u64> {
        self.tree
            .locate_in_envelope_intersecting(&AABB::from_point([point.x, point.y]))
            .filter(|entry| entry.rect.contains(point))
            .map(|entry| entry.element_id)
            .collect()
    }

    pub fn rect(&self, element_id: u64) -> Option<PixelRect> {
        self.entries.get(&element_id).map(|e| e.rect)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.tree = RTree::new();
        self.entries.clear();
    }
}
