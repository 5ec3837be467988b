use std::{fmt, str::FromStr};

use crate::foundation::{
    core::Rect,
    error::{RevealError, RevealResult},
};

/// A point along one axis of a box: a fraction of its extent or a pixel offset from its top.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Anchor {
    /// `0.0` is the top edge, `1.0` the bottom edge.
    Fraction(f64),
    /// Pixels below the top edge.
    Pixels(f64),
}

impl Anchor {
    fn resolve(self, extent: f64) -> f64 {
        match self {
            Self::Fraction(f) => f * extent,
            Self::Pixels(px) => px,
        }
    }

    fn parse(token: &str) -> RevealResult<Self> {
        let anchor = match token {
            "top" => Self::Fraction(0.0),
            "center" => Self::Fraction(0.5),
            "bottom" => Self::Fraction(1.0),
            _ => {
                if let Some(pct) = token.strip_suffix('%') {
                    let v: f64 = pct
                        .parse()
                        .map_err(|_| RevealError::trigger(format!("bad percentage '{token}'")))?;
                    Self::Fraction(v / 100.0)
                } else {
                    let px = token.strip_suffix("px").unwrap_or(token);
                    let v: f64 = px
                        .parse()
                        .map_err(|_| RevealError::trigger(format!("bad position '{token}'")))?;
                    Self::Pixels(v)
                }
            }
        };
        match anchor {
            Self::Fraction(v) | Self::Pixels(v) if !v.is_finite() => Err(RevealError::trigger(
                format!("position '{token}' must be finite"),
            )),
            _ => Ok(anchor),
        }
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Fraction(v) if v == 0.0 => f.write_str("top"),
            Self::Fraction(v) if v == 0.5 => f.write_str("center"),
            Self::Fraction(v) if v == 1.0 => f.write_str("bottom"),
            // Parsed percentages are divided by 100; round so they print back as written.
            Self::Fraction(v) => write!(f, "{}%", (v * 100.0 * 1e6).round() / 1e6),
            Self::Pixels(v) => write!(f, "{v}px"),
        }
    }
}

/// Where an element meets the viewport, written `"<element> <viewport>"` (`"top 90%"`).
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TriggerPosition {
    /// Point on the element.
    pub element: Anchor,
    /// Point on the viewport.
    pub viewport: Anchor,
}

impl TriggerPosition {
    /// `"top bottom"`: the element's top meets the viewport's bottom.
    pub const TOP_BOTTOM: Self = Self {
        element: Anchor::Fraction(0.0),
        viewport: Anchor::Fraction(1.0),
    };

    /// `"bottom top"`: the element's bottom meets the viewport's top.
    pub const BOTTOM_TOP: Self = Self {
        element: Anchor::Fraction(1.0),
        viewport: Anchor::Fraction(0.0),
    };

    /// Scroll offset at which the element point reaches the viewport point.
    pub fn scroll_offset(&self, element: Rect, viewport_height: f64) -> f64 {
        let element_y = element.y0 + self.element.resolve(element.height());
        element_y - self.viewport.resolve(viewport_height)
    }
}

impl FromStr for TriggerPosition {
    type Err = RevealError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let mut tokens = lower.split_whitespace();
        let (Some(element), Some(viewport), None) = (tokens.next(), tokens.next(), tokens.next())
        else {
            return Err(RevealError::trigger(format!(
                "trigger position '{s}' must be '<element> <viewport>'"
            )));
        };
        Ok(Self {
            element: Anchor::parse(element)?,
            viewport: Anchor::parse(viewport)?,
        })
    }
}

impl fmt::Display for TriggerPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.element, self.viewport)
    }
}

impl TryFrom<String> for TriggerPosition {
    type Error = RevealError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TriggerPosition> for String {
    fn from(value: TriggerPosition) -> Self {
        value.to_string()
    }
}

/// Activation window of a tracked element.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TriggerWindow {
    /// Crossing this forward starts the entrance; crossing it backward leaves.
    pub start: TriggerPosition,
    /// Crossing this forward completes the entrance.
    pub end: TriggerPosition,
}

impl TriggerWindow {
    /// Parse both thresholds.
    pub fn parse(start: &str, end: &str) -> RevealResult<Self> {
        Ok(Self {
            start: start.parse()?,
            end: end.parse()?,
        })
    }

    /// Resolve to concrete scroll offsets for an element laid out at `element`.
    pub fn resolve(&self, element: Rect, viewport_height: f64) -> ScrollRange {
        ScrollRange {
            start: self.start.scroll_offset(element, viewport_height),
            end: self.end.scroll_offset(element, viewport_height),
        }
    }
}

/// Which side of a resolved window a scroll offset lies on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum Zone {
    /// Above `start`: the element has not reached the window yet.
    Before,
    /// Between `start` and `end`.
    Active,
    /// Past `end`.
    After,
}

/// A window resolved to scroll offsets.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct ScrollRange {
    /// Scroll offset of the start threshold.
    pub start: f64,
    /// Scroll offset of the end threshold.
    pub end: f64,
}

impl ScrollRange {
    /// Classify `scroll`. A collapsed or inverted range has no active zone.
    pub fn zone(&self, scroll: f64) -> Zone {
        if scroll < self.start {
            Zone::Before
        } else if scroll < self.end {
            Zone::Active
        } else {
            Zone::After
        }
    }

    /// Linear progress of `scroll` through the range, clamped to `[0, 1]`.
    pub fn progress(&self, scroll: f64) -> f64 {
        let span = self.end - self.start;
        if span <= 0.0 {
            return if scroll >= self.start { 1.0 } else { 0.0 };
        }
        ((scroll - self.start) / span).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/trigger/window.rs"]
mod tests;
