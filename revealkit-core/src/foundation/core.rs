use std::fmt;

use crate::foundation::error::{RevealError, RevealResult};

pub use kurbo::{Point, Rect, Size, Vec2};

/// Stable identity of a list row, as supplied by the row data source.
#[derive(
    Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct RowKey(pub String);

impl RowKey {
    /// Borrow the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RowKey {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for RowKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<usize> for RowKey {
    fn from(value: usize) -> Self {
        Self(value.to_string())
    }
}

/// Identity of one mounted section (one component instance).
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct SectionId(pub u64);

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "section#{}", self.0)
    }
}

/// Identity of one binding session. A section builds a fresh session on every rebind.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct SessionId(pub u64);

/// Ambient viewport and document metrics read on every recompute.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ViewportMetrics {
    /// Vertical scroll offset of the document, in px.
    pub scroll_y: f64,
    /// Viewport width in px.
    pub width: f64,
    /// Viewport height in px.
    pub height: f64,
    /// Full document height in px.
    pub document_height: f64,
}

impl ViewportMetrics {
    /// Build metrics at scroll offset zero.
    pub fn new(width: f64, height: f64, document_height: f64) -> RevealResult<Self> {
        let m = Self {
            scroll_y: 0.0,
            width,
            height,
            document_height: document_height.max(height),
        };
        m.validate()?;
        Ok(m)
    }

    /// Check that all extents are finite and the viewport is non-empty.
    pub fn validate(&self) -> RevealResult<()> {
        let finite = [self.scroll_y, self.width, self.height, self.document_height]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return Err(RevealError::validation("viewport metrics must be finite"));
        }
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(RevealError::validation(
                "viewport width and height must be > 0",
            ));
        }
        Ok(())
    }

    /// Largest reachable scroll offset.
    pub fn max_scroll(self) -> f64 {
        (self.document_height - self.height).max(0.0)
    }

    /// Same metrics at a new scroll offset, clamped to the scrollable range.
    pub fn with_scroll(self, scroll_y: f64) -> Self {
        let scroll_y = if scroll_y.is_finite() { scroll_y } else { 0.0 };
        Self {
            scroll_y: scroll_y.clamp(0.0, self.max_scroll()),
            ..self
        }
    }

    /// Same scroll offset with a new viewport and document size.
    pub fn resized(self, width: f64, height: f64, document_height: f64) -> RevealResult<Self> {
        let resized = Self {
            scroll_y: self.scroll_y,
            width,
            height,
            document_height: document_height.max(height),
        };
        resized.validate()?;
        Ok(resized.with_scroll(self.scroll_y))
    }

    /// Document-space y of the bottom edge of the viewport.
    pub fn visible_bottom(self) -> f64 {
        self.scroll_y + self.height
    }
}
