use crate::{
    animation::player::TransitionPlayer,
    binder::{
        list::{ListAnimationBinder, SectionLayout},
        session::Teardown,
    },
    config::RevealConfig,
    foundation::{
        core::{Rect, RowKey, SectionId, SessionId, ViewportMetrics},
        error::{RevealError, RevealResult},
    },
    input::{
        coalesce::{FrameInbox, InputEvent},
        listeners::{ListenerKind, ListenerSet},
        pointer::{PointerSample, PointerTracker},
    },
    preview::{
        controller::{PreviewRevealController, PreviewState},
        images::{ImagePrefetcher, NoopPrefetcher},
    },
    scene::{
        rows::RowData,
        stage::{Node, NodeId, Stage},
    },
    sections::{
        layout::SectionRects,
        links::{LinkOpener, LinkTarget},
        presets::SectionKind,
    },
    trigger::registry::VisibilityTriggerRegistry,
};

/// What to mount: a section kind and its rows.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SectionSpec {
    /// Section type.
    pub kind: SectionKind,
    /// Rows, in display order.
    #[serde(default)]
    pub rows: Vec<RowData>,
    /// Image shown for rows without their own.
    #[serde(default)]
    pub default_image: Option<String>,
}

impl SectionSpec {
    /// Section of `kind` with `rows`.
    pub fn new(kind: SectionKind, rows: Vec<RowData>) -> Self {
        Self {
            kind,
            rows,
            default_image: None,
        }
    }

    /// Set the fallback preview image.
    pub fn with_default_image(mut self, url: impl Into<String>) -> Self {
        self.default_image = Some(url.into());
        self
    }
}

#[derive(Debug)]
struct MountedSection {
    id: SectionId,
    kind: SectionKind,
    rows: Vec<RowData>,
    default_image: Option<String>,
    layout: SectionLayout,
    binder: ListAnimationBinder,
    preview: Option<PreviewRevealController>,
}

impl MountedSection {
    fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.layout
            .container
            .into_iter()
            .chain(self.layout.rule)
            .chain(self.layout.heading)
            .chain(self.layout.rows.iter().map(|(_, n)| *n))
            .chain(self.preview.as_ref().map(|p| p.panel()))
    }
}

/// Counters of one processed frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize)]
pub struct FrameReport {
    /// Frame index, starting at 1.
    pub frame: u64,
    /// Frame time.
    pub now_ms: f64,
    /// Raw events folded into this frame.
    pub coalesced: u32,
    /// Trigger crossings dispatched.
    pub trigger_events: usize,
    /// Registrations dropped because their node was gone.
    pub dropped: usize,
    /// Transitions still running after the frame.
    pub running: usize,
}

/// Serializable view of one mounted section.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct SectionSnapshot {
    /// Section id.
    pub id: SectionId,
    /// Section type.
    pub kind: SectionKind,
    /// Live session, if bound.
    pub session: Option<SessionId>,
    /// Trigger registrations of the live session.
    pub triggers: usize,
    /// Listeners owned by the section.
    pub listeners: usize,
    /// Row keys, in display order.
    pub rows: Vec<RowKey>,
    /// Preview hover state, for sections with a preview.
    pub preview: Option<PreviewState>,
    /// Whether the preview panel is logically shown.
    pub panel_visible: bool,
}

/// Serializable view of the whole page.
#[derive(Clone, Debug, serde::Serialize)]
pub struct PageSnapshot {
    /// Frames processed so far.
    pub frame: u64,
    /// Current metrics.
    pub metrics: ViewportMetrics,
    /// Mounted sections, top to bottom.
    pub sections: Vec<SectionSnapshot>,
    /// Every node with its live style.
    pub nodes: Vec<Node>,
    /// Trigger registrations across all sections.
    pub registrations: usize,
    /// Live listeners across all sections.
    pub listeners: usize,
    /// Tracks held by the transition player.
    pub transitions: usize,
}

/// A page of stacked sections: the single owner of nodes, transitions, triggers and listeners.
///
/// Host events are queued and applied once per [`frame`](Page::frame); hover changes apply
/// immediately.
pub struct Page {
    config: RevealConfig,
    stage: Stage,
    player: TransitionPlayer,
    registry: VisibilityTriggerRegistry,
    listeners: ListenerSet,
    tracker: PointerTracker,
    inbox: FrameInbox,
    metrics: ViewportMetrics,
    sections: Vec<MountedSection>,
    prefetcher: Box<dyn ImagePrefetcher>,
    next_section: u64,
    frames: u64,
}

impl std::fmt::Debug for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page")
            .field("metrics", &self.metrics)
            .field("sections", &self.sections.len())
            .field("frames", &self.frames)
            .finish_non_exhaustive()
    }
}

impl Page {
    /// Empty page using the configured fallback viewport.
    pub fn new(config: RevealConfig) -> RevealResult<Self> {
        config.validate()?;
        let metrics = config.initial_metrics()?;
        Ok(Self {
            config,
            stage: Stage::new(),
            player: TransitionPlayer::new(),
            registry: VisibilityTriggerRegistry::new(),
            listeners: ListenerSet::new(),
            tracker: PointerTracker::new(),
            inbox: FrameInbox::new(),
            metrics,
            sections: Vec::new(),
            prefetcher: Box::new(NoopPrefetcher),
            next_section: 0,
            frames: 0,
        })
    }

    /// Use `prefetcher` for preview images of sections mounted from now on.
    pub fn with_prefetcher(mut self, prefetcher: Box<dyn ImagePrefetcher>) -> Self {
        self.prefetcher = prefetcher;
        self
    }

    /// Mount a section below the existing ones and bind its animations.
    #[tracing::instrument(level = "debug", skip_all, fields(kind = %spec.kind, rows = spec.rows.len()))]
    pub fn mount(&mut self, spec: SectionSpec) -> RevealResult<SectionId> {
        check_unique_keys(&spec.rows)?;
        let animations = spec.kind.animations(&self.config.marquee)?;
        self.next_section += 1;
        let id = SectionId(self.next_section);
        let binder = ListAnimationBinder::new(id, animations)?;

        let top = self.content_bottom();
        let rects = self
            .config
            .layout
            .measure(spec.kind, top, self.metrics.width, spec.rows.len());
        let layout = insert_section_nodes(&mut self.stage, spec.kind, &rects, &spec.rows);

        let mut section = MountedSection {
            id,
            kind: spec.kind,
            rows: spec.rows,
            default_image: spec.default_image,
            layout,
            binder,
            preview: None,
        };

        if spec.kind.has_preview() {
            let size = self.config.preview.panel_size;
            let panel = self.stage.insert(
                "hover-reveal",
                Rect::new(0.0, 0.0, size.width, size.height),
            );
            match PreviewRevealController::attach(
                &mut self.stage,
                panel,
                id,
                self.config.preview.clone(),
            ) {
                Ok(mut preview) => {
                    preview.set_rows(
                        &mut self.stage,
                        &mut self.player,
                        &section.rows,
                        section.default_image.as_deref(),
                        self.prefetcher.as_mut(),
                    );
                    section.preview = Some(preview);
                }
                Err(err) => {
                    self.stage.remove(panel);
                    self.remove_nodes(&section);
                    return Err(err);
                }
            }
        }

        self.sections.push(section);
        self.refresh_document_height();

        let Some(section) = self.sections.last_mut() else {
            return Err(RevealError::validation("section vanished during mount"));
        };
        let mut td = Teardown {
            stage: &mut self.stage,
            player: &mut self.player,
            registry: &mut self.registry,
            listeners: &mut self.listeners,
        };
        if let Err(err) = section.binder.bind(&mut td, &section.layout) {
            if let Some(mut failed) = self.sections.pop() {
                self.teardown_section(&mut failed);
            }
            self.refresh_document_height();
            return Err(err);
        }
        Ok(id)
    }

    /// Replace the rows of a mounted section.
    ///
    /// A collection with the same keys in the same order keeps its session; anything else tears
    /// the session down and binds the new rows. Returns whether a rebind happened.
    #[tracing::instrument(level = "debug", skip(self, rows), fields(rows = rows.len()))]
    pub fn set_rows(&mut self, id: SectionId, rows: Vec<RowData>) -> RevealResult<bool> {
        check_unique_keys(&rows)?;
        let index = self.section_index(id)?;

        let same_keys = {
            let section = &self.sections[index];
            section.rows.len() == rows.len()
                && section.rows.iter().zip(&rows).all(|(a, b)| a.key == b.key)
        };

        let section = &mut self.sections[index];
        if !same_keys {
            let mut td = Teardown {
                stage: &mut self.stage,
                player: &mut self.player,
                registry: &mut self.registry,
                listeners: &mut self.listeners,
            };
            section.binder.dispose(&mut td);
            for (_, node) in section.layout.rows.drain(..) {
                self.stage.remove(node);
            }
            let label = section.kind.row_label();
            section.layout.rows = rows
                .iter()
                .map(|row| {
                    let node = self.stage.insert(format!("{label}:{}", row.key), Rect::ZERO);
                    (row.key.clone(), node)
                })
                .collect();
        }
        section.rows = rows;

        if let Some(preview) = section.preview.as_mut() {
            preview.set_rows(
                &mut self.stage,
                &mut self.player,
                &section.rows,
                section.default_image.as_deref(),
                self.prefetcher.as_mut(),
            );
        }

        self.relayout();

        let section = &mut self.sections[index];
        let mut td = Teardown {
            stage: &mut self.stage,
            player: &mut self.player,
            registry: &mut self.registry,
            listeners: &mut self.listeners,
        };
        section.binder.rebind_if_changed(&mut td, &section.layout)
    }

    /// Tear a section down: dispose its session, release the panel and remove its nodes.
    pub fn unmount(&mut self, id: SectionId) -> bool {
        let Ok(index) = self.section_index(id) else {
            return false;
        };
        let mut section = self.sections.remove(index);
        self.teardown_section(&mut section);
        self.relayout();
        true
    }

    /// Queue a scroll to `y`.
    pub fn scroll_to(&mut self, y: f64) {
        self.inbox.push(InputEvent::Scroll { y });
    }

    /// Queue a viewport resize.
    pub fn resize(&mut self, width: f64, height: f64) {
        let document_height = self.content_bottom();
        self.inbox.push(InputEvent::Resize {
            width,
            height,
            document_height,
        });
    }

    /// Queue a pointer move, in document coordinates.
    pub fn pointer_move(&mut self, x: f64, y: f64, timestamp_ms: f64) {
        self.inbox
            .push(InputEvent::PointerMove(PointerSample::new(x, y, timestamp_ms)));
    }

    /// Queue a raw host event.
    pub fn push_event(&mut self, event: InputEvent) {
        self.inbox.push(event);
    }

    /// Pointer entered `row` of section `id`. Returns `false` if the section has no preview or no
    /// such row.
    pub fn hover_row(&mut self, id: SectionId, row: &RowKey) -> bool {
        let Ok(index) = self.section_index(id) else {
            return false;
        };
        let section = &mut self.sections[index];
        if !section.rows.iter().any(|r| &r.key == row) {
            return false;
        }
        match section.preview.as_mut() {
            Some(preview) => {
                preview.hover_enter(&mut self.stage, &mut self.player, row.clone());
                true
            }
            None => false,
        }
    }

    /// Pointer left the list of section `id`.
    pub fn leave_list(&mut self, id: SectionId) -> bool {
        let Ok(index) = self.section_index(id) else {
            return false;
        };
        match self.sections[index].preview.as_mut() {
            Some(preview) => {
                preview.leave_list(&mut self.stage, &mut self.player);
                true
            }
            None => false,
        }
    }

    /// Click-through on `row`: open its link in a new browsing context. Rows without a link and
    /// sections without click-through do nothing.
    pub fn activate_row(&self, id: SectionId, row: &RowKey, opener: &mut dyn LinkOpener) -> bool {
        let Ok(index) = self.section_index(id) else {
            return false;
        };
        let section = &self.sections[index];
        if section.kind != SectionKind::ContentIndex {
            return false;
        }
        let Some(link) = section
            .rows
            .iter()
            .find(|r| &r.key == row)
            .and_then(|r| r.link.as_deref())
        else {
            return false;
        };
        opener.open(link, LinkTarget::NewContext);
        true
    }

    /// Apply queued input, advance transitions to `now_ms` and evaluate triggers.
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn frame(&mut self, now_ms: f64) -> FrameReport {
        self.frames += 1;
        let input = self.inbox.drain();

        let running = self.player.tick(&mut self.stage, now_ms);

        if let Some((width, height, _)) = input.resize {
            match self.metrics.resized(width, height, self.content_bottom()) {
                Ok(metrics) => {
                    let relayout = metrics.width != self.metrics.width;
                    self.metrics = metrics;
                    if relayout {
                        self.relayout();
                    } else {
                        self.refresh_document_height();
                    }
                }
                Err(err) => tracing::warn!(%err, "ignoring invalid resize"),
            }
        }
        if let Some(y) = input.scroll_y {
            self.metrics = self.metrics.with_scroll(y);
        }
        if let Some(sample) = input.pointer {
            self.route_pointer(sample);
        }

        let mut report = FrameReport {
            frame: self.frames,
            now_ms,
            coalesced: input.coalesced,
            running,
            ..FrameReport::default()
        };
        if self.listeners.count(ListenerKind::Scroll) > 0 {
            let triggers =
                self.registry
                    .update(&mut self.stage, &mut self.player, self.metrics, now_ms);
            report.trigger_events = triggers.events;
            report.dropped = triggers.dropped;
            report.running = self.player.running_count();
        }
        tracing::trace!(?report, "frame");
        report
    }

    fn route_pointer(&mut self, sample: PointerSample) {
        let motion = self.tracker.on_sample(sample);
        for owner in self.listeners.owners(ListenerKind::PointerMove) {
            let Some(section) = self.sections.iter_mut().find(|s| s.id == owner) else {
                continue;
            };
            if let Some(preview) = section.preview.as_mut() {
                preview.pointer_sample(
                    &mut self.stage,
                    &mut self.player,
                    sample,
                    motion,
                    &self.metrics,
                );
            }
        }
    }

    fn teardown_section(&mut self, section: &mut MountedSection) {
        let mut td = Teardown {
            stage: &mut self.stage,
            player: &mut self.player,
            registry: &mut self.registry,
            listeners: &mut self.listeners,
        };
        section.binder.dispose(&mut td);
        if let Some(preview) = section.preview.as_mut() {
            preview.detach(&mut self.stage, &mut self.player);
        }
        self.remove_nodes(section);
        tracing::debug!(section = %section.id, "section unmounted");
    }

    fn remove_nodes(&mut self, section: &MountedSection) {
        for node in section.nodes() {
            self.player.cancel_node(node);
            self.stage.remove(node);
        }
    }

    fn section_index(&self, id: SectionId) -> RevealResult<usize> {
        self.sections
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| RevealError::validation(format!("{id} is not mounted")))
    }

    fn content_bottom(&self) -> f64 {
        self.sections
            .last()
            .and_then(|s| s.layout.container)
            .and_then(|n| self.stage.get(n))
            .map_or(0.0, |n| n.layout.y1)
    }

    fn refresh_document_height(&mut self) {
        let document_height = self.content_bottom().max(self.metrics.height);
        self.metrics = ViewportMetrics {
            document_height,
            ..self.metrics
        }
        .with_scroll(self.metrics.scroll_y);
    }

    // Restack every section from the top with the current width and row counts.
    fn relayout(&mut self) {
        let mut top = 0.0;
        for section in &self.sections {
            let rects =
                self.config
                    .layout
                    .measure(section.kind, top, self.metrics.width, section.layout.rows.len());
            apply_rects(&mut self.stage, &section.layout, &rects);
            top = rects.container.y1;
        }
        self.refresh_document_height();
    }

    /// Snapshot of everything observable.
    pub fn snapshot(&self) -> PageSnapshot {
        let sections = self
            .sections
            .iter()
            .map(|s| SectionSnapshot {
                id: s.id,
                kind: s.kind,
                session: s.binder.session().map(|session| session.id()),
                triggers: s
                    .binder
                    .session()
                    .map_or(0, |session| session.trigger_count(&self.registry)),
                listeners: self.listeners.owned_by(s.id),
                rows: s.rows.iter().map(|r| r.key.clone()).collect(),
                preview: s.preview.as_ref().map(|p| p.state().clone()),
                panel_visible: s
                    .preview
                    .as_ref()
                    .is_some_and(|p| p.state().panel_visible()),
            })
            .collect();
        PageSnapshot {
            frame: self.frames,
            metrics: self.metrics,
            sections,
            nodes: self.stage.iter().map(|(_, n)| n.clone()).collect(),
            registrations: self.registry.len(),
            listeners: self.listeners.len(),
            transitions: self.player.len(),
        }
    }

    /// Ids of mounted sections, top to bottom.
    pub fn section_ids(&self) -> Vec<SectionId> {
        self.sections.iter().map(|s| s.id).collect()
    }

    /// Node layout of a mounted section.
    pub fn section_layout(&self, id: SectionId) -> Option<&SectionLayout> {
        self.sections
            .iter()
            .find(|s| s.id == id)
            .map(|s| &s.layout)
    }

    /// Preview hover state of a mounted section.
    pub fn preview(&self, id: SectionId) -> Option<&PreviewState> {
        self.sections
            .iter()
            .find(|s| s.id == id)
            .and_then(|s| s.preview.as_ref())
            .map(|p| p.state())
    }

    /// Preview panel node of a mounted section.
    pub fn preview_panel(&self, id: SectionId) -> Option<NodeId> {
        self.sections
            .iter()
            .find(|s| s.id == id)
            .and_then(|s| s.preview.as_ref())
            .map(|p| p.panel())
    }

    /// Node arena.
    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    /// Transition player.
    pub fn player(&self) -> &TransitionPlayer {
        &self.player
    }

    /// Trigger registry.
    pub fn registry(&self) -> &VisibilityTriggerRegistry {
        &self.registry
    }

    /// Host listeners.
    pub fn listeners(&self) -> &ListenerSet {
        &self.listeners
    }

    /// Current viewport metrics.
    pub fn metrics(&self) -> ViewportMetrics {
        self.metrics
    }

    /// Active configuration.
    pub fn config(&self) -> &RevealConfig {
        &self.config
    }
}

impl Drop for Page {
    fn drop(&mut self) {
        while let Some(mut section) = self.sections.pop() {
            self.teardown_section(&mut section);
        }
    }
}

fn check_unique_keys(rows: &[RowData]) -> RevealResult<()> {
    let mut seen = std::collections::BTreeSet::new();
    for row in rows {
        if !seen.insert(&row.key) {
            return Err(RevealError::validation(format!(
                "duplicate row key '{}'",
                row.key
            )));
        }
    }
    Ok(())
}

fn insert_section_nodes(
    stage: &mut Stage,
    kind: SectionKind,
    rects: &SectionRects,
    rows: &[RowData],
) -> SectionLayout {
    let container = stage.insert(format!("section:{kind}"), rects.container);
    let rule = rects.rule.map(|r| stage.insert("rule", r));
    let heading = stage.insert("heading", rects.heading);
    let label = kind.row_label();
    let rows = rows
        .iter()
        .zip(&rects.rows)
        .map(|(row, rect)| {
            (
                row.key.clone(),
                stage.insert(format!("{label}:{}", row.key), *rect),
            )
        })
        .collect();
    SectionLayout {
        container: Some(container),
        rule,
        heading: Some(heading),
        rows,
    }
}

fn apply_rects(stage: &mut Stage, layout: &SectionLayout, rects: &SectionRects) {
    if let Some(n) = layout.container {
        stage.set_layout(n, rects.container);
    }
    if let (Some(n), Some(r)) = (layout.rule, rects.rule) {
        stage.set_layout(n, r);
    }
    if let Some(n) = layout.heading {
        stage.set_layout(n, rects.heading);
    }
    for ((_, n), r) in layout.rows.iter().zip(&rects.rows) {
        stage.set_layout(*n, *r);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/runtime/page.rs"]
mod tests;
