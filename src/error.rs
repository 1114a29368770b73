//! Error types for the coordinate core
//!
//! Gesture errors are always recoverable: the controller logs them and
//! cancels the gesture instead of letting them escape the input handler.

use thiserror::Error;

/// The parent container of an element could not be measured.
///
/// Raised by `commit` and `unified_position` when the element is detached
/// from its document or the parent reports a zero-sized box.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("element '{node_id}' is detached: parent container cannot be measured")]
pub struct DetachedElementError {
    pub node_id: String,
}

/// Errors from the drag/commit state machine
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GestureError {
    /// Operation invoked in the wrong drag session state
    #[error("cannot {operation} while drag session is {state}")]
    InvalidState {
        operation: &'static str,
        state: &'static str,
    },

    /// Parent could not be measured
    #[error(transparent)]
    Detached(#[from] DetachedElementError),

    /// Gesture kind string not understood by the input layer
    #[error("unknown gesture kind: {0}")]
    UnknownGesture(String),
}

impl GestureError {
    pub(crate) fn invalid(operation: &'static str, state: &'static str) -> Self {
        Self::InvalidState { operation, state }
    }

    /// Returns true for `InvalidState` errors
    pub fn is_invalid_state(&self) -> bool {
        matches!(self, Self::InvalidState { .. })
    }

    /// Returns true for detached-element errors
    pub fn is_detached(&self) -> bool {
        matches!(self, Self::Detached(_))
    }
}

/// Result type alias for gesture operations
pub type GestureResult<T> = Result<T, GestureError>;

/// Errors that can occur while persisting anchor positions
#[derive(Error, Debug)]
pub enum StorageError {
    /// IO error from std::io
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Record written by an incompatible version
    #[error("unsupported record version {found} (expected {expected})")]
    Version { found: u32, expected: u32 },

    /// Temp file could not be moved into place
    #[error("failed to persist {path}: {source}")]
    Persist {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
