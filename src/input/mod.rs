//! Pointer gesture handling for one editable element.
//!
//! ## Architecture
//!
//! The gesture lifecycle is an explicit state machine (`DragState`) owned by
//! each element's `DragSession`. There is no module-level drag state, so two
//! elements can be edited at the same time without interfering.
//!
//! ## Modules
//!
//! - `state` - Drag session state machine and snapshot
//! - `resize` - Resize geometry (handles, modifier keys, size limits)
//! - `coords` - Percent <-> pixel conversion

pub mod coords;
mod resize;
mod state;

pub use resize::{SizeConstraints, resize_rect};
pub use state::{
    ActiveDrag, DragSession, DragSnapshot, DragState, FinishedGesture, UpdateOutcome,
};
