use crate::{
    animation::{
        ease::Ease,
        player::{TransitionHandle, TransitionPlayer, TransitionSpec},
        props::PropertySet,
    },
    foundation::{
        error::{RevealError, RevealResult},
        rng::Rng64,
    },
    scene::stage::{NodeId, Stage},
    trigger::{
        actions::TriggerEvent,
        handlers::{Playhead, ensure_bound},
        registry::{TriggerCx, TriggerHandler},
        window::{TriggerPosition, TriggerWindow},
    },
};

/// Parameters of the alternating horizontal drift.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MarqueeConfig {
    /// Seed of the per-row offsets.
    pub seed: u64,
    /// Smallest offset magnitude in px.
    pub min_magnitude: f64,
    /// Largest offset magnitude in px.
    pub max_magnitude: f64,
    /// Time the scrubbed playhead takes to catch up with scroll; `0` follows scroll exactly.
    pub lag_ms: f64,
    /// Ease applied along the drift.
    pub ease: Ease,
    /// Where the pinned range starts.
    pub start: TriggerPosition,
    /// Where the pinned range ends.
    pub end: TriggerPosition,
}

impl Default for MarqueeConfig {
    fn default() -> Self {
        Self {
            seed: 0x7EC4_1157,
            min_magnitude: 400.0,
            max_magnitude: 600.0,
            lag_ms: 0.0,
            ease: Ease::InOutQuad,
            start: TriggerPosition::TOP_BOTTOM,
            end: TriggerPosition::BOTTOM_TOP,
        }
    }
}

impl MarqueeConfig {
    /// Check magnitudes and lag.
    pub fn validate(&self) -> RevealResult<()> {
        if !(self.min_magnitude.is_finite() && self.max_magnitude.is_finite()) {
            return Err(RevealError::config("marquee magnitudes must be finite"));
        }
        if self.min_magnitude < 0.0 || self.min_magnitude > self.max_magnitude {
            return Err(RevealError::config(
                "marquee magnitudes must satisfy 0 <= min <= max",
            ));
        }
        if !self.lag_ms.is_finite() || self.lag_ms < 0.0 {
            return Err(RevealError::config("marquee lag must be >= 0"));
        }
        Ok(())
    }

    /// Scroll range the timeline is pinned to.
    pub fn window(&self) -> TriggerWindow {
        TriggerWindow {
            start: self.start,
            end: self.end,
        }
    }
}

/// Start and end offset of one row.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct RowDrift {
    /// Offset at the start of the range.
    pub from: f64,
    /// Offset at the end of the range.
    pub to: f64,
}

/// Per-row horizontal drift, scrubbed by scroll progress.
///
/// Even rows travel from the right to the left, odd rows the other way. Magnitudes are drawn from a
/// generator keyed by the row index, so a given seed always yields the same layout.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct MarqueeTimeline {
    drifts: Vec<RowDrift>,
    ease: Ease,
}

impl MarqueeTimeline {
    /// Timeline for `rows` rows.
    pub fn new(config: &MarqueeConfig, rows: usize) -> Self {
        let drifts = (0..rows)
            .map(|index| {
                let mut rng = Rng64::keyed(config.seed, index as u64);
                let from = rng.range(config.min_magnitude, config.max_magnitude);
                let to = rng.range(config.min_magnitude, config.max_magnitude);
                if index % 2 == 0 {
                    RowDrift { from, to: -to }
                } else {
                    RowDrift { from: -from, to }
                }
            })
            .collect();
        Self {
            drifts,
            ease: config.ease,
        }
    }

    /// Drift of every row.
    pub fn drifts(&self) -> &[RowDrift] {
        &self.drifts
    }

    /// Row offsets at scroll progress `progress`.
    pub fn offsets_at(&self, progress: f64) -> Vec<f64> {
        let t = self.ease.apply(progress);
        self.drifts
            .iter()
            .map(|d| d.from + (d.to - d.from) * t)
            .collect()
    }

    fn row_spec(&self, index: usize) -> Option<TransitionSpec> {
        let drift = self.drifts.get(index)?;
        Some(
            TransitionSpec::new(format!("marquee-row-{index}"), PropertySet::new().x(drift.to))
                .from_state(PropertySet::new().x(drift.from))
                .ease(self.ease),
        )
    }
}

/// Scrubs a [`MarqueeTimeline`] across its rows and pins the section while the range is active.
#[derive(Debug)]
pub struct MarqueeHandler {
    pin: NodeId,
    timeline: MarqueeTimeline,
    rows: Vec<(NodeId, Option<TransitionHandle>)>,
    lag_ms: f64,
    playhead: Playhead,
}

impl MarqueeHandler {
    /// Bind one drift per row node, applying start offsets right away. `pin` is the section node
    /// held in place while the range is active.
    pub fn attach(
        stage: &mut Stage,
        player: &mut TransitionPlayer,
        config: &MarqueeConfig,
        pin: NodeId,
        rows: &[NodeId],
    ) -> Self {
        let timeline = MarqueeTimeline::new(config, rows.len());
        let rows = rows
            .iter()
            .enumerate()
            .map(|(index, &node)| {
                let handle = timeline
                    .row_spec(index)
                    .and_then(|spec| player.attach(stage, node, &spec));
                (node, handle)
            })
            .collect();
        Self {
            pin,
            timeline,
            rows,
            lag_ms: config.lag_ms,
            playhead: Playhead::default(),
        }
    }

    /// The scrubbed timeline.
    pub fn timeline(&self) -> &MarqueeTimeline {
        &self.timeline
    }
}

impl TriggerHandler for MarqueeHandler {
    fn on_event(&mut self, cx: &mut TriggerCx<'_>, event: TriggerEvent) {
        tracing::trace!(key = cx.key, ?event, "marquee crossing");
    }

    fn on_scrub(&mut self, cx: &mut TriggerCx<'_>, progress: f64) {
        let position = self.playhead.follow(progress, cx.dt_ms, self.lag_ms);

        let span = (cx.range.end - cx.range.start).max(0.0);
        let pin = (cx.metrics.scroll_y - cx.range.start).clamp(0.0, span);
        if let Some(style) = cx.stage.style_mut(self.pin) {
            style.pin_y = pin;
        }

        for (index, (node, handle)) in self.rows.iter_mut().enumerate() {
            let Some(spec) = self.timeline.row_spec(index) else {
                continue;
            };
            if let Some(h) = ensure_bound(cx.stage, cx.player, *node, &spec, handle) {
                cx.player.seek(cx.stage, h, position);
            }
        }
    }

    fn is_settled(&self, _player: &TransitionPlayer) -> bool {
        self.playhead.is_settled()
    }

    fn dispose(&mut self, stage: &mut Stage, player: &mut TransitionPlayer) {
        if let Some(style) = stage.style_mut(self.pin) {
            style.pin_y = 0.0;
        }
        for (_, handle) in self.rows.iter_mut() {
            if let Some(h) = handle.take() {
                player.revert(stage, h);
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/marquee/timeline.rs"]
mod tests;
