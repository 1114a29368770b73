//! Editor configuration.
//!
//! Loaded from JSON; every field has a default so a partial file (or no file
//! at all) is valid.

use crate::constants::{
    APP_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_MIN_HEIGHT, DEFAULT_MIN_WIDTH, DRAG_THRESHOLD_PX,
    TRANSITION_DURATION_MS, TRANSITION_RESET_DELAY_MS,
};
use crate::input::SizeConstraints;
use crate::store::TransitionTiming;
use crate::types::{AnchorOrigin, AnchorState, Size};
use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

/// What to do with an in-progress transform when editing ends abruptly
/// (element removed, edit mode exited, deselection).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeardownPolicy {
    /// Fold the transform into the anchor and persist it
    #[default]
    Commit,
    /// Reset the transform to identity, anchor unchanged
    Discard,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub origin: AnchorOrigin,
    /// Anchor used for new elements and by `reset`
    pub default_anchor: AnchorState,
    pub min_width: f64,
    pub min_height: f64,
    pub max_width: Option<f64>,
    pub max_height: Option<f64>,
    /// Pointer travel (px) before a press counts as a drag
    pub drag_threshold_px: f64,
    pub transition_ms: u64,
    pub transition_reset_ms: u64,
    pub teardown: TeardownPolicy,
    /// Write committed anchors to the position store
    pub persist_on_commit: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            origin: AnchorOrigin::default(),
            default_anchor: AnchorState::default(),
            min_width: DEFAULT_MIN_WIDTH,
            min_height: DEFAULT_MIN_HEIGHT,
            max_width: None,
            max_height: None,
            drag_threshold_px: DRAG_THRESHOLD_PX,
            transition_ms: TRANSITION_DURATION_MS,
            transition_reset_ms: TRANSITION_RESET_DELAY_MS,
            teardown: TeardownPolicy::default(),
            persist_on_commit: true,
        }
    }
}

impl EditorConfig {
    /// Load and validate a JSON config file.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: Self = serde_json::from_str(&json)
            .with_context(|| format!("invalid config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from the platform config path, falling back to defaults when
    /// no file exists.
    pub fn load_or_default() -> Result<Self> {
        match default_config_path() {
            Some(path) if path.exists() => {
                info!(path = %path.display(), "Loading editor config");
                Self::load(&path)
            }
            _ => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.min_width > 0.0 && self.min_height > 0.0,
            "minimum size must be positive (got {}x{})",
            self.min_width,
            self.min_height
        );
        if let Some(max) = self.max_width {
            ensure!(max >= self.min_width, "max_width {max} is below min_width {}", self.min_width);
        }
        if let Some(max) = self.max_height {
            ensure!(max >= self.min_height, "max_height {max} is below min_height {}", self.min_height);
        }
        ensure!(
            self.drag_threshold_px >= 0.0,
            "drag_threshold_px must not be negative"
        );
        ensure!(
            self.default_anchor.width > 0.0 && self.default_anchor.height > 0.0,
            "default anchor size must be positive"
        );
        Ok(())
    }

    pub fn size_constraints(&self) -> SizeConstraints {
        let max = match (self.max_width, self.max_height) {
            (None, None) => None,
            (w, h) => Some(Size::new(
                w.unwrap_or(f64::INFINITY),
                h.unwrap_or(f64::INFINITY),
            )),
        };
        SizeConstraints {
            min: Size::new(self.min_width, self.min_height),
            max,
        }
    }

    pub fn transition_timing(&self) -> TransitionTiming {
        TransitionTiming {
            duration: Duration::from_millis(self.transition_ms),
            reset_delay: Duration::from_millis(self.transition_reset_ms),
        }
    }
}

/// Platform config file path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
}
