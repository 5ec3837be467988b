use crate::scene::stage::Style;

/// Independent property groups. At most one transition runs per node per group.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum PropertyGroup {
    /// `x`, `y` and `rotation`.
    Transform,
    /// `opacity` and `visible`.
    Appearance,
}

impl PropertyGroup {
    /// Both groups, in a stable order.
    pub const ALL: [PropertyGroup; 2] = [PropertyGroup::Transform, PropertyGroup::Appearance];
}

/// Sparse set of animatable properties. `None` means "not touched".
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PropertySet {
    /// Horizontal translation in px.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    /// Vertical translation in px.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    /// Rotation in degrees.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    /// Opacity; clamped to `[0, 1]` when applied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    /// Visibility flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
}

impl PropertySet {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `x`.
    pub fn x(mut self, v: f64) -> Self {
        self.x = Some(v);
        self
    }

    /// Set `y`.
    pub fn y(mut self, v: f64) -> Self {
        self.y = Some(v);
        self
    }

    /// Set `rotation`.
    pub fn rotation(mut self, v: f64) -> Self {
        self.rotation = Some(v);
        self
    }

    /// Set `opacity`.
    pub fn opacity(mut self, v: f64) -> Self {
        self.opacity = Some(v);
        self
    }

    /// Set `visible`.
    pub fn visible(mut self, v: bool) -> Self {
        self.visible = Some(v);
        self
    }

    /// Whether no property is set.
    pub fn is_empty(&self) -> bool {
        self.groups().next().is_none()
    }

    /// Whether any property of `group` is set.
    pub fn touches(&self, group: PropertyGroup) -> bool {
        match group {
            PropertyGroup::Transform => {
                self.x.is_some() || self.y.is_some() || self.rotation.is_some()
            }
            PropertyGroup::Appearance => self.opacity.is_some() || self.visible.is_some(),
        }
    }

    /// Groups touched by this set.
    pub fn groups(&self) -> impl Iterator<Item = PropertyGroup> + '_ {
        PropertyGroup::ALL.into_iter().filter(|g| self.touches(*g))
    }

    /// Only the properties belonging to `group`.
    pub fn restrict(&self, group: PropertyGroup) -> Self {
        match group {
            PropertyGroup::Transform => Self {
                x: self.x,
                y: self.y,
                rotation: self.rotation,
                ..Self::default()
            },
            PropertyGroup::Appearance => Self {
                opacity: self.opacity,
                visible: self.visible,
                ..Self::default()
            },
        }
    }

    /// Read the current value of every property set in `self` from `style`.
    pub fn capture(&self, style: &Style) -> Self {
        Self {
            x: self.x.map(|_| style.x),
            y: self.y.map(|_| style.y),
            rotation: self.rotation.map(|_| style.rotation),
            opacity: self.opacity.map(|_| style.opacity),
            visible: self.visible.map(|_| style.visible),
        }
    }

    /// `self`, with properties missing here taken from `fallback`.
    pub fn or(&self, fallback: &Self) -> Self {
        Self {
            x: self.x.or(fallback.x),
            y: self.y.or(fallback.y),
            rotation: self.rotation.or(fallback.rotation),
            opacity: self.opacity.or(fallback.opacity),
            visible: self.visible.or(fallback.visible),
        }
    }

    /// Write every set property into `style`. Opacity is clamped to `[0, 1]`.
    pub fn apply(&self, style: &mut Style) {
        if let Some(v) = self.x {
            style.x = v;
        }
        if let Some(v) = self.y {
            style.y = v;
        }
        if let Some(v) = self.rotation {
            style.rotation = v;
        }
        if let Some(v) = self.opacity {
            style.opacity = v.clamp(0.0, 1.0);
        }
        if let Some(v) = self.visible {
            style.visible = v;
        }
    }
}

/// Interpolation between two values at eased progress `t`.
pub trait Lerp: Sized {
    /// Value at `t` (which may leave `[0, 1]` for overshooting eases).
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

impl Lerp for bool {
    // Becoming visible happens as soon as progress leaves the start; hiding waits for the end.
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        if a == b {
            return *a;
        }
        if *b { t > 0.0 } else { t < 1.0 }
    }
}

fn lerp_opt<T: Lerp + Copy>(a: Option<T>, b: Option<T>, t: f64) -> Option<T> {
    match (a, b) {
        (Some(a), Some(b)) => Some(T::lerp(&a, &b, t)),
        (None, b) => b,
        (a, None) => a,
    }
}

impl Lerp for PropertySet {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Self {
            x: lerp_opt(a.x, b.x, t),
            y: lerp_opt(a.y, b.y, t),
            rotation: lerp_opt(a.rotation, b.rotation, t),
            opacity: lerp_opt(a.opacity, b.opacity, t),
            visible: lerp_opt(a.visible, b.visible, t),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/props.rs"]
mod tests;
