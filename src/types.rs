//! Core types for the two-layer coordinate system.
//!
//! The anchor layer is percentage-based and is the only persisted state. The
//! transform layer is a transient pixel offset that is identity at rest.

use crate::constants::{
    DEFAULT_ANCHOR_LEFT_PCT, DEFAULT_ANCHOR_TOP_PCT, DEFAULT_HEIGHT_PX, DEFAULT_WIDTH_PX,
    IDENTITY_EPSILON,
};
use crate::error::GestureError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Geometry
// ============================================================================

/// A point in screen or parent-relative pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance_to(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// A size in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// True when either dimension is zero, negative or not finite
    pub fn is_degenerate(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
    }
}

/// An axis-aligned pixel rectangle, origin at its top-left corner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PixelRect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build a rectangle from its center point and size
    pub fn from_center(center: Point, size: Size) -> Self {
        Self {
            x: center.x - size.width / 2.0,
            y: center.y - size.height / 2.0,
            width: size.width,
            height: size.height,
        }
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }
}

// ============================================================================
// Anchor Layer
// ============================================================================

/// What the anchor's `left`/`top` percentages refer to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorOrigin {
    /// `left`/`top` name the element center (`translate(-50%, -50%)` placement)
    #[default]
    Center,
    /// `left`/`top` name the element's top-left corner
    TopLeft,
}

/// The element's resting placement: percent position plus pixel size.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnchorState {
    /// Percent of parent width (may leave 0..100 when off-screen)
    pub left: f64,
    /// Percent of parent height
    pub top: f64,
    /// Pixels
    pub width: f64,
    /// Pixels
    pub height: f64,
}

impl AnchorState {
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Component-wise comparison within `tolerance`
    pub fn approx_eq(&self, other: &AnchorState, tolerance: f64) -> bool {
        (self.left - other.left).abs() <= tolerance
            && (self.top - other.top).abs() <= tolerance
            && (self.width - other.width).abs() <= tolerance
            && (self.height - other.height).abs() <= tolerance
    }
}

impl Default for AnchorState {
    fn default() -> Self {
        Self::new(
            DEFAULT_ANCHOR_LEFT_PCT,
            DEFAULT_ANCHOR_TOP_PCT,
            DEFAULT_WIDTH_PX,
            DEFAULT_HEIGHT_PX,
        )
    }
}

// ============================================================================
// Transform Layer
// ============================================================================

/// Transient visual offset layered on top of the anchor during a gesture.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransformOffset {
    pub translate_x: f64,
    pub translate_y: f64,
    pub scale: f64,
    /// Degrees
    pub rotation: f64,
}

impl TransformOffset {
    pub const IDENTITY: TransformOffset = TransformOffset {
        translate_x: 0.0,
        translate_y: 0.0,
        scale: 1.0,
        rotation: 0.0,
    };

    /// Pure translation
    pub const fn translate(x: f64, y: f64) -> Self {
        Self {
            translate_x: x,
            translate_y: y,
            scale: 1.0,
            rotation: 0.0,
        }
    }

    pub fn is_identity(&self) -> bool {
        self.translate_x.abs() <= IDENTITY_EPSILON
            && self.translate_y.abs() <= IDENTITY_EPSILON
            && (self.scale - 1.0).abs() <= IDENTITY_EPSILON
            && self.rotation.abs() <= IDENTITY_EPSILON
    }
}

impl Default for TransformOffset {
    fn default() -> Self {
        Self::IDENTITY
    }
}

// ============================================================================
// Input Layer
// ============================================================================

/// Modifier keys held during a gesture
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    /// Preserve aspect ratio
    pub shift: bool,
    /// Resize about the center
    pub alt: bool,
    pub ctrl: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        alt: false,
        ctrl: false,
    };

    pub const fn shift() -> Self {
        Self {
            shift: true,
            alt: false,
            ctrl: false,
        }
    }

    pub const fn alt() -> Self {
        Self {
            shift: false,
            alt: true,
            ctrl: false,
        }
    }
}

/// The device that produced a pointer event. The core treats all kinds alike.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerKind {
    #[default]
    Mouse,
    Touch,
    Pen,
}

/// A unified pointer sample from the input layer
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerInput {
    pub position: Point,
    /// `None` for legacy mouse events without pointer ids
    pub pointer_id: Option<u32>,
    pub kind: PointerKind,
}

impl PointerInput {
    pub fn mouse(x: f64, y: f64) -> Self {
        Self {
            position: Point::new(x, y),
            pointer_id: None,
            kind: PointerKind::Mouse,
        }
    }

    pub fn touch(pointer_id: u32, x: f64, y: f64) -> Self {
        Self {
            position: Point::new(x, y),
            pointer_id: Some(pointer_id),
            kind: PointerKind::Touch,
        }
    }

    pub fn with_pointer_id(mut self, pointer_id: u32) -> Self {
        self.pointer_id = Some(pointer_id);
        self
    }
}

/// One of the eight resize handles around a bounding box
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeHandle {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl ResizeHandle {
    pub const ALL: [ResizeHandle; 8] = [
        Self::N,
        Self::NE,
        Self::E,
        Self::SE,
        Self::S,
        Self::SW,
        Self::W,
        Self::NW,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::N => "n",
            Self::NE => "ne",
            Self::E => "e",
            Self::SE => "se",
            Self::S => "s",
            Self::SW => "sw",
            Self::W => "w",
            Self::NW => "nw",
        }
    }

    /// Handle drags the left edge
    pub fn moves_left(&self) -> bool {
        matches!(self, Self::W | Self::NW | Self::SW)
    }

    /// Handle drags the right edge
    pub fn moves_right(&self) -> bool {
        matches!(self, Self::E | Self::NE | Self::SE)
    }

    /// Handle drags the top edge
    pub fn moves_top(&self) -> bool {
        matches!(self, Self::N | Self::NE | Self::NW)
    }

    /// Handle drags the bottom edge
    pub fn moves_bottom(&self) -> bool {
        matches!(self, Self::S | Self::SE | Self::SW)
    }

    pub fn affects_width(&self) -> bool {
        self.moves_left() || self.moves_right()
    }

    pub fn affects_height(&self) -> bool {
        self.moves_top() || self.moves_bottom()
    }

    pub fn is_corner(&self) -> bool {
        self.affects_width() && self.affects_height()
    }
}

impl fmt::Display for ResizeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResizeHandle {
    type Err = GestureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|h| h.as_str() == s)
            .ok_or_else(|| GestureError::UnknownGesture(s.to_string()))
    }
}

/// What a gesture does to the element
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GestureKind {
    Move,
    Resize(ResizeHandle),
}

impl GestureKind {
    pub fn is_resize(&self) -> bool {
        matches!(self, Self::Resize(_))
    }

    pub fn handle(&self) -> Option<ResizeHandle> {
        match self {
            Self::Resize(h) => Some(*h),
            Self::Move => None,
        }
    }
}

impl fmt::Display for GestureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Move => f.write_str("move"),
            Self::Resize(h) => write!(f, "resize:{h}"),
        }
    }
}

impl FromStr for GestureKind {
    type Err = GestureError;

    /// Accepts `move`, `resize:<handle>` and the DOM-style `resize-<handle>`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "move" {
            return Ok(Self::Move);
        }
        let handle = s
            .strip_prefix("resize:")
            .or_else(|| s.strip_prefix("resize-"))
            .ok_or_else(|| GestureError::UnknownGesture(s.to_string()))?;
        handle
            .parse()
            .map(Self::Resize)
            .map_err(|_| GestureError::UnknownGesture(s.to_string()))
    }
}
