use std::{fmt, str::FromStr};

use crate::foundation::error::RevealError;

/// Easing functions used to map normalized transition progress.
///
/// Names follow the `family.direction` convention hosts already use in stylesheets and
/// animation configs (`"power1.out"`, `"back.out(2)"`); see [`Ease::from_str`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Ease {
    /// Linear interpolation.
    Linear,
    /// Quadratic ease-in (`power1.in`).
    InQuad,
    /// Quadratic ease-out (`power1.out`).
    OutQuad,
    /// Quadratic ease-in/out (`power1.inOut`).
    InOutQuad,
    /// Cubic ease-in (`power2.in`).
    InCubic,
    /// Cubic ease-out (`power2.out`).
    OutCubic,
    /// Cubic ease-in/out (`power2.inOut`).
    InOutCubic,
    /// Quartic ease-in (`power3.in`).
    InQuart,
    /// Quartic ease-out (`power3.out`).
    OutQuart,
    /// Quartic ease-in/out (`power3.inOut`).
    InOutQuart,
    /// Overshooting ease-out; the payload is the overshoot amount (`back.out(2)`).
    BackOut(f64),
}

impl Ease {
    /// Default overshoot of `back.out` when no amount is given.
    pub const DEFAULT_OVERSHOOT: f64 = 1.70158;

    /// Apply this easing function to normalized progress `t` in `[0, 1]`.
    ///
    /// The input is clamped; the output of [`Ease::BackOut`] exceeds `1.0` mid-flight.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::InQuad => t * t,
            Self::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Self::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(2) / 2.0)
                }
            }
            Self::InCubic => t * t * t,
            Self::OutCubic => 1.0 - (1.0 - t).powi(3),
            Self::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(3) / 2.0)
                }
            }
            Self::InQuart => t.powi(4),
            Self::OutQuart => 1.0 - (1.0 - t).powi(4),
            Self::InOutQuart => {
                if t < 0.5 {
                    8.0 * t.powi(4)
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(4) / 2.0)
                }
            }
            Self::BackOut(s) => {
                let u = t - 1.0;
                1.0 + (s + 1.0) * u.powi(3) + s * u.powi(2)
            }
        }
    }
}

impl FromStr for Ease {
    type Err = RevealError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let lower = raw.to_ascii_lowercase();

        if let Some(rest) = lower.strip_prefix("back.out") {
            let rest = rest.trim();
            if rest.is_empty() {
                return Ok(Self::BackOut(Self::DEFAULT_OVERSHOOT));
            }
            let inner = rest
                .strip_prefix('(')
                .and_then(|r| r.strip_suffix(')'))
                .ok_or_else(|| RevealError::validation(format!("malformed ease '{raw}'")))?;
            let amount: f64 = inner
                .trim()
                .parse()
                .map_err(|_| RevealError::validation(format!("bad overshoot in ease '{raw}'")))?;
            if !amount.is_finite() || amount < 0.0 {
                return Err(RevealError::validation(format!(
                    "overshoot in ease '{raw}' must be finite and >= 0"
                )));
            }
            return Ok(Self::BackOut(amount));
        }

        let ease = match lower.as_str() {
            "linear" | "none" | "power0" => Self::Linear,
            "power1.in" | "quad.in" => Self::InQuad,
            "power1.out" | "power1" | "quad.out" => Self::OutQuad,
            "power1.inout" | "quad.inout" => Self::InOutQuad,
            "power2.in" | "cubic.in" => Self::InCubic,
            "power2.out" | "power2" | "cubic.out" => Self::OutCubic,
            "power2.inout" | "cubic.inout" => Self::InOutCubic,
            "power3.in" | "quart.in" => Self::InQuart,
            "power3.out" | "power3" | "quart.out" => Self::OutQuart,
            "power3.inout" | "quart.inout" => Self::InOutQuart,
            _ => {
                return Err(RevealError::validation(format!("unknown ease '{raw}'")));
            }
        };
        Ok(ease)
    }
}

impl fmt::Display for Ease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear => f.write_str("linear"),
            Self::InQuad => f.write_str("power1.in"),
            Self::OutQuad => f.write_str("power1.out"),
            Self::InOutQuad => f.write_str("power1.inOut"),
            Self::InCubic => f.write_str("power2.in"),
            Self::OutCubic => f.write_str("power2.out"),
            Self::InOutCubic => f.write_str("power2.inOut"),
            Self::InQuart => f.write_str("power3.in"),
            Self::OutQuart => f.write_str("power3.out"),
            Self::InOutQuart => f.write_str("power3.inOut"),
            Self::BackOut(s) => write!(f, "back.out({s})"),
        }
    }
}

impl TryFrom<String> for Ease {
    type Error = RevealError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Ease> for String {
    fn from(value: Ease) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
