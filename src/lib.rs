//! Spinebox - two-layer bounding-box coordinate core.
//!
//! Every editable element is drawn as two nested layers:
//!
//! - the **anchor** layer holds the resting placement (`left%`, `top%`,
//!   `width px`, `height px`) and is the only state that is persisted;
//! - the **interactive** layer holds a pixel transform that is identity at
//!   rest and only carries the in-progress gesture.
//!
//! A gesture starts from the anchor, drives the transform, and is folded back
//! into the anchor on commit. Positions therefore never accumulate rounding
//! or percentage/transform drift across edit sessions.
//!
//! ```ignore
//! let mut element = ElementController::builder(Box::new(target))
//!     .persistence(Arc::new(MemoryStore::new()))
//!     .build();
//! element.begin(PointerInput::mouse(500.0, 400.0), GestureKind::Move, Modifiers::NONE)?;
//! element.update(PointerInput::mouse(520.0, 410.0))?;
//! element.end()?;
//! ```

pub mod commit;
pub mod config;
pub mod constants;
pub mod controller;
pub mod error;
pub mod input;
pub mod logging;
pub mod perf;
pub mod persistence;
pub mod registry;
pub mod render;
pub mod spatial_index;
pub mod store;
pub mod types;

pub use commit::{CommitEngine, CommitOutcome};
pub use config::{EditorConfig, TeardownPolicy};
pub use controller::{EditPhase, ElementController, GestureOutcome};
pub use error::{DetachedElementError, GestureError, StorageError};
pub use input::DragSession;
pub use persistence::{JsonFileStore, MemoryStore, PositionRecord, PositionStore};
pub use registry::ElementRegistry;
pub use render::{HeadlessTarget, RenderTarget, TransitionScheduler, TransitionToken};
pub use store::{CoordinateStore, UnifiedPosition};
pub use types::{
    AnchorOrigin, AnchorState, GestureKind, Modifiers, PointerInput, ResizeHandle, TransformOffset,
};
