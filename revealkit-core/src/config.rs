use std::io::Read;

use crate::{
    foundation::{
        core::ViewportMetrics,
        error::{RevealError, RevealResult},
    },
    marquee::timeline::MarqueeConfig,
    preview::controller::PreviewConfig,
    sections::layout::StackLayout,
};

/// Viewport assumed until the host reports its first resize.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Viewport width in px.
    pub width: f64,
    /// Viewport height in px.
    pub height: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

/// Runtime configuration of a [`Page`](crate::Page).
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    /// Floating preview panel.
    pub preview: PreviewConfig,
    /// Tech list marquee.
    pub marquee: MarqueeConfig,
    /// Fallback viewport.
    pub viewport: ViewportConfig,
    /// Section stacking.
    pub layout: StackLayout,
}

impl RevealConfig {
    /// Parse JSON and validate.
    pub fn from_json_str(s: &str) -> RevealResult<Self> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Read JSON from `reader` and validate.
    pub fn from_json_reader(reader: impl Read) -> RevealResult<Self> {
        let config: Self = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every section of the configuration.
    pub fn validate(&self) -> RevealResult<()> {
        self.preview.validate()?;
        self.marquee.validate()?;
        self.layout.validate()?;
        self.initial_metrics().map_err(|e| RevealError::config(format!("viewport: {e}")))?;
        Ok(())
    }

    /// Metrics used before the first resize.
    pub fn initial_metrics(&self) -> RevealResult<ViewportMetrics> {
        ViewportMetrics::new(self.viewport.width, self.viewport.height, self.viewport.height)
    }
}
