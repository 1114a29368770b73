//! Crate-wide constants.
//!
//! Centralizes the default geometry, gesture and timing values so the
//! configuration layer and the tests agree on them.

// ============================================================================
// Anchor Defaults
// ============================================================================

/// Default anchor `left` in percent of the parent
pub const DEFAULT_ANCHOR_LEFT_PCT: f64 = 50.0;

/// Default anchor `top` in percent of the parent
pub const DEFAULT_ANCHOR_TOP_PCT: f64 = 50.0;

/// Default element width in pixels
pub const DEFAULT_WIDTH_PX: f64 = 120.0;

/// Default element height in pixels
pub const DEFAULT_HEIGHT_PX: f64 = 80.0;

// ============================================================================
// Resize Constraints
// ============================================================================

/// Minimum element width reachable by an interactive resize
pub const DEFAULT_MIN_WIDTH: f64 = 20.0;

/// Minimum element height reachable by an interactive resize
pub const DEFAULT_MIN_HEIGHT: f64 = 20.0;

// ============================================================================
// Gesture Handling
// ============================================================================

/// Pointer travel (px) before a press becomes a drag instead of a click
pub const DRAG_THRESHOLD_PX: f64 = 3.0;

// ============================================================================
// Animation & Timing
// ============================================================================

/// Duration of an animated transform transition in milliseconds
pub const TRANSITION_DURATION_MS: u64 = 300;

/// Delay after which an animated transition is switched off again
pub const TRANSITION_RESET_DELAY_MS: u64 = 350;

// ============================================================================
// Persistence
// ============================================================================

/// Prefix of the persisted position key (`bb-position-<node_id>`)
pub const POSITION_KEY_PREFIX: &str = "bb-position-";

/// Prefix of generated node ids
pub const NODE_ID_PREFIX: &str = "bb-";

/// Version written into persisted records
pub const POSITION_RECORD_VERSION: u32 = 1;

/// Name of the config file under the platform config directory
pub const CONFIG_FILE_NAME: &str = "spinebox.json";

/// Application directory name under the platform config/data directories
pub const APP_DIR_NAME: &str = "spinebox";

// ============================================================================
// Numeric
// ============================================================================

/// Tolerance used when deciding whether a transform is the identity
pub const IDENTITY_EPSILON: f64 = 1e-9;
