pub use kurbo::{Affine, Size, Vec2};

use crate::foundation::error::{CinescrollError, CinescrollResult};

/// Opaque handle to an element owned by a [`crate::dom::Dom`] implementation.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct NodeId(pub u32);

/// Viewport dimensions in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    /// Width in CSS pixels.
    pub width: f64,
    /// Height in CSS pixels.
    pub height: f64,
}

impl Viewport {
    /// Unchecked constructor; see [`Viewport::try_new`] for user input.
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Checked constructor for user-supplied dimensions.
    pub fn try_new(width: f64, height: f64) -> CinescrollResult<Self> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(CinescrollError::validation(format!(
                "viewport must be positive and finite (got {width}x{height})"
            )));
        }
        Ok(Self::new(width, height))
    }

    /// Same dimensions as a `kurbo` size.
    pub fn size(self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1440.0, 900.0)
    }
}

/// Absolute document scroll offsets covered by the pinned master trigger.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScrollRange {
    /// Offset where the pin starts.
    pub start: f64,
    /// Offset where the pin releases.
    pub end: f64,
}

impl ScrollRange {
    /// Range from `start` to `end`.
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Scroll distance covered, never negative.
    pub fn len(self) -> f64 {
        (self.end - self.start).max(0.0)
    }

    /// Whether the range covers no distance at all.
    pub fn is_empty(self) -> bool {
        self.len() == 0.0
    }

    /// Map a normalized progress in `[0, 1]` to an absolute scroll offset.
    pub fn offset_at(self, progress: f64) -> f64 {
        self.start + (self.end - self.start) * progress
    }

    /// Inverse of [`ScrollRange::offset_at`], clamped to `[0, 1]`.
    ///
    /// Empty ranges report `0`.
    pub fn progress_at(self, top: f64) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        ((top - self.start) / (self.end - self.start)).clamp(0.0, 1.0)
    }
}

/// How a navigation jump should move the window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollBehavior {
    /// Instant jump (`behavior: "auto"`).
    Auto,
    /// Animated scroll.
    Smooth,
}

/// Round to 3 decimal places.
pub fn round3(v: f64) -> f64 {
    (v * 1000.0).round() / 1000.0
}
