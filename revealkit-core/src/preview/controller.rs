use std::collections::BTreeSet;

use crate::{
    animation::{
        ease::Ease,
        player::{TransitionPlayer, TransitionSpec},
        props::PropertySet,
    },
    foundation::{
        core::{Point, RowKey, SectionId, Size, ViewportMetrics},
        error::{RevealError, RevealResult},
        math::clamp_range,
    },
    input::pointer::{PointerMotion, PointerSample},
    preview::images::{ImagePrefetcher, ImageTransform, PreviewImages},
    scene::{
        rows::RowData,
        stage::{NodeId, Stage},
    },
};

/// Geometry and motion of the floating preview panel.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    /// Panel size in px.
    pub panel_size: Size,
    /// Point of the panel placed under the pointer.
    pub anchor: Point,
    /// Gap kept between the panel and the right/bottom viewport edges.
    pub edge_margin: f64,
    /// Duration of the follow motion.
    pub move_duration_ms: f64,
    /// Ease of the follow motion.
    pub move_ease: Ease,
    /// Duration of fades.
    pub fade_duration_ms: f64,
    /// Ease of fades.
    pub fade_ease: Ease,
    /// Degrees of rotation per px of horizontal pointer speed.
    pub rotation_factor: f64,
    /// Crop parameters for preview images.
    pub image: ImageTransform,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            panel_size: Size::new(220.0, 320.0),
            anchor: Point::new(110.0, 160.0),
            edge_margin: 30.0,
            move_duration_ms: 1300.0,
            move_ease: Ease::BackOut(2.0),
            fade_duration_ms: 400.0,
            fade_ease: Ease::OutQuart,
            rotation_factor: 1.0,
            image: ImageTransform::default(),
        }
    }
}

impl PreviewConfig {
    /// Check sizes and durations.
    pub fn validate(&self) -> RevealResult<()> {
        let finite = [
            self.panel_size.width,
            self.panel_size.height,
            self.anchor.x,
            self.anchor.y,
            self.edge_margin,
            self.move_duration_ms,
            self.fade_duration_ms,
            self.rotation_factor,
        ];
        if finite.iter().any(|v| !v.is_finite()) {
            return Err(RevealError::config("preview values must be finite"));
        }
        if self.panel_size.width <= 0.0 || self.panel_size.height <= 0.0 {
            return Err(RevealError::config("preview panel size must be positive"));
        }
        if self.edge_margin < 0.0 || self.move_duration_ms < 0.0 || self.fade_duration_ms < 0.0 {
            return Err(RevealError::config(
                "preview margin and durations must be non-negative",
            ));
        }
        Ok(())
    }
}

/// Top-left target of the panel for a pointer at `pointer` (document coordinates).
///
/// The panel stays inside `[0, width - panel - margin]` horizontally and inside
/// `[0, visible bottom - panel - margin]` vertically; when the viewport is too small for the panel
/// the lower bound wins.
pub fn clamp_panel_position(pointer: Point, metrics: &ViewportMetrics, config: &PreviewConfig) -> Point {
    let size = config.panel_size;
    let max_x = metrics.width - size.width - config.edge_margin;
    let max_y = metrics.visible_bottom() - size.height - config.edge_margin;
    Point::new(
        clamp_range(pointer.x - config.anchor.x, 0.0, max_x),
        clamp_range(pointer.y - config.anchor.y, 0.0, max_y),
    )
}

/// Hover state of one list.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct PreviewState {
    /// Row currently hovered.
    pub active_row: Option<RowKey>,
    /// Whether the pointer is over the list.
    pub pointer_over_list: bool,
    /// Resolved image per row.
    pub images: PreviewImages,
}

impl PreviewState {
    /// The panel is shown exactly when a row is active and the pointer is over the list.
    pub fn panel_visible(&self) -> bool {
        self.active_row.is_some() && self.pointer_over_list
    }
}

/// Owns the floating preview panel of one list and drives it from hover and pointer input.
#[derive(Debug)]
pub struct PreviewRevealController {
    owner: SectionId,
    panel: NodeId,
    config: PreviewConfig,
    state: PreviewState,
    prefetched: BTreeSet<String>,
    shown: bool,
    attached: bool,
}

impl PreviewRevealController {
    /// Lease `panel` for `owner` and hide it.
    pub fn attach(
        stage: &mut Stage,
        panel: NodeId,
        owner: SectionId,
        config: PreviewConfig,
    ) -> RevealResult<Self> {
        config.validate()?;
        stage.lease(panel, owner)?;
        if let Some(style) = stage.style_mut(panel) {
            style.opacity = 0.0;
            style.visible = false;
            style.background = None;
        }
        tracing::debug!(%owner, ?panel, "preview panel attached");
        Ok(Self {
            owner,
            panel,
            config,
            state: PreviewState::default(),
            prefetched: BTreeSet::new(),
            shown: false,
            attached: true,
        })
    }

    /// Resolve images for a new row collection and prefetch URLs not seen before.
    ///
    /// The panel picks up the new image of a still-active row; an active row that is no longer part
    /// of the collection is cleared.
    pub fn set_rows(
        &mut self,
        stage: &mut Stage,
        player: &mut TransitionPlayer,
        rows: &[RowData],
        default_image: Option<&str>,
        prefetcher: &mut dyn ImagePrefetcher,
    ) {
        self.state.images = PreviewImages::resolve(rows, default_image, &self.config.image);
        for url in self.state.images.urls() {
            if self.prefetched.insert(url.to_owned()) {
                prefetcher.prefetch(url);
            }
        }
        let Some(active) = &self.state.active_row else {
            return;
        };
        if self.state.images.contains(active) {
            let background = self.state.images.get(active).map(str::to_owned);
            if let Some(style) = stage.style_mut(self.panel) {
                style.background = background;
            }
        } else {
            self.state.active_row = None;
            self.sync(stage, player);
        }
    }

    /// Pointer entered `row`.
    pub fn hover_enter(&mut self, stage: &mut Stage, player: &mut TransitionPlayer, row: RowKey) {
        if !self.attached {
            return;
        }
        let background = self.state.images.get(&row).map(str::to_owned);
        if let Some(style) = stage.style_mut(self.panel) {
            style.background = background;
        }
        tracing::trace!(owner = %self.owner, %row, "preview hover");
        self.state.active_row = Some(row);
        self.state.pointer_over_list = true;
        self.sync(stage, player);
    }

    /// Pointer left the list.
    pub fn leave_list(&mut self, stage: &mut Stage, player: &mut TransitionPlayer) {
        if !self.attached {
            return;
        }
        self.state.active_row = None;
        self.state.pointer_over_list = false;
        self.sync(stage, player);
    }

    /// Retarget the panel for a new pointer sample. Ignored while no row is active.
    pub fn pointer_sample(
        &mut self,
        stage: &mut Stage,
        player: &mut TransitionPlayer,
        sample: PointerSample,
        motion: PointerMotion,
        metrics: &ViewportMetrics,
    ) {
        if !self.attached || self.state.active_row.is_none() {
            return;
        }
        let target = clamp_panel_position(sample.point(), metrics, &self.config);
        let spec = TransitionSpec::new(
            "preview-move",
            PropertySet::new()
                .x(target.x)
                .y(target.y)
                .rotation(motion.rotation(self.config.rotation_factor)),
        )
        .duration_ms(self.config.move_duration_ms)
        .ease(self.config.move_ease);
        player.play(stage, self.panel, &spec);
    }

    // Fades only start when the logical visibility flips, so repeated hovers don't restart them.
    fn sync(&mut self, stage: &mut Stage, player: &mut TransitionPlayer) {
        let visible = self.state.panel_visible();
        if visible == self.shown {
            return;
        }
        self.shown = visible;

        let spec = if visible {
            TransitionSpec::new("preview-fade-in", PropertySet::new().opacity(1.0).visible(true))
                .from_state(PropertySet::new().visible(true))
        } else {
            TransitionSpec::new(
                "preview-fade-out",
                PropertySet::new().opacity(0.0).visible(false),
            )
        }
        .duration_ms(self.config.fade_duration_ms)
        .ease(self.config.fade_ease);
        player.play(stage, self.panel, &spec);
    }

    /// Stop the panel, hide it and give up the lease. Safe to call more than once.
    pub fn detach(&mut self, stage: &mut Stage, player: &mut TransitionPlayer) {
        if !self.attached {
            return;
        }
        self.attached = false;
        player.cancel_node(self.panel);
        if let Some(style) = stage.style_mut(self.panel) {
            style.opacity = 0.0;
            style.visible = false;
            style.background = None;
        }
        stage.release(self.panel, self.owner);
        self.state.active_row = None;
        self.state.pointer_over_list = false;
        self.shown = false;
        tracing::debug!(owner = %self.owner, "preview panel detached");
    }

    /// Current hover state.
    pub fn state(&self) -> &PreviewState {
        &self.state
    }

    /// The leased panel.
    pub fn panel(&self) -> NodeId {
        self.panel
    }

    /// Whether the controller still holds the panel.
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Active configuration.
    pub fn config(&self) -> &PreviewConfig {
        &self.config
    }
}

#[cfg(test)]
#[path = "../../tests/unit/preview/controller.rs"]
mod tests;
