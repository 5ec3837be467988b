use crate::foundation::core::Point;

/// One pointer position in document coordinates.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PointerSample {
    /// Horizontal position in px.
    pub x: f64,
    /// Vertical position in px.
    pub y: f64,
    /// Host timestamp of the sample.
    #[serde(default)]
    pub timestamp_ms: f64,
}

impl PointerSample {
    /// Sample at `(x, y)`.
    pub fn new(x: f64, y: f64, timestamp_ms: f64) -> Self {
        Self { x, y, timestamp_ms }
    }

    /// Position as a point.
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Horizontal direction of the latest pointer move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum HorizontalDirection {
    /// Moving towards larger x.
    Right,
    /// Moving towards smaller x, or not moving horizontally.
    Left,
}

impl HorizontalDirection {
    /// `+1` for right, `-1` for left.
    pub fn sign(self) -> f64 {
        match self {
            Self::Right => 1.0,
            Self::Left => -1.0,
        }
    }
}

/// Displacement derived from two consecutive samples.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct PointerMotion {
    /// Signed horizontal displacement.
    pub dx: f64,
    /// Direction of `dx`.
    pub direction: HorizontalDirection,
    /// Magnitude of `dx`.
    pub speed: f64,
}

impl PointerMotion {
    /// Rotation target for a panel following this motion, in degrees.
    pub fn rotation(&self, factor: f64) -> f64 {
        self.speed * self.direction.sign() * factor
    }
}

/// Derives horizontal speed and direction from consecutive pointer samples.
///
/// Only the previous sample is kept. The tracker starts at `(0, 0)`, so the first real sample
/// reports its full distance from the origin as speed.
#[derive(Clone, Copy, Debug, Default)]
pub struct PointerTracker {
    prev: Point,
    last: Option<PointerSample>,
}

impl PointerTracker {
    /// Tracker whose previous sample is the origin.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `sample` and return the motion since the previous one.
    pub fn on_sample(&mut self, sample: PointerSample) -> PointerMotion {
        let dx = sample.x - self.prev.x;
        let direction = if sample.x > self.prev.x {
            HorizontalDirection::Right
        } else {
            HorizontalDirection::Left
        };
        self.prev = sample.point();
        self.last = Some(sample);
        PointerMotion {
            dx,
            direction,
            speed: dx.abs(),
        }
    }

    /// Most recent sample, if any was recorded.
    pub fn last(&self) -> Option<PointerSample> {
        self.last
    }
}

#[cfg(test)]
#[path = "../../tests/unit/input/pointer.rs"]
mod tests;
