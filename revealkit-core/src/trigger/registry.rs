use std::{collections::BTreeMap, fmt};

use crate::{
    animation::player::TransitionPlayer,
    foundation::core::ViewportMetrics,
    scene::stage::{NodeId, Stage},
    trigger::{
        actions::{TriggerEvent, TriggerMode},
        window::{ScrollRange, TriggerWindow, Zone},
    },
};

/// Handle returned by [`VisibilityTriggerRegistry::register`].
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct TriggerHandle(u64);

/// Trigger state of a tracked element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum ElementState {
    /// Not yet reached, or scrolled back out and settled.
    Hidden,
    /// Past `start`, entrance under way.
    Entering,
    /// Past `end`.
    Visible,
    /// Scrolled back above `start`; exit under way.
    Leaving,
}

/// Everything a handler may touch while reacting to a crossing.
pub struct TriggerCx<'a> {
    /// Stage holding the element.
    pub stage: &'a mut Stage,
    /// Player driving its transitions.
    pub player: &'a mut TransitionPlayer,
    /// The tracked element.
    pub node: NodeId,
    /// Stable key of the tracked element.
    pub key: &'a str,
    /// Metrics of this frame.
    pub metrics: ViewportMetrics,
    /// Window resolved against this frame's layout.
    pub range: ScrollRange,
    /// Frame time.
    pub now_ms: f64,
    /// Time since the previous registry update.
    pub dt_ms: f64,
}

/// Reaction to threshold crossings of one tracked element.
pub trait TriggerHandler {
    /// Called once per crossing, in crossing order.
    fn on_event(&mut self, cx: &mut TriggerCx<'_>, event: TriggerEvent);

    /// Called every update for elements registered in [`TriggerMode::Scrub`].
    fn on_scrub(&mut self, _cx: &mut TriggerCx<'_>, _progress: f64) {}

    /// Whether the exit started by the last crossing has finished.
    fn is_settled(&self, _player: &TransitionPlayer) -> bool {
        true
    }

    /// Release everything the handler started. Called exactly once, on unregister or when the
    /// element is found detached.
    fn dispose(&mut self, _stage: &mut Stage, _player: &mut TransitionPlayer) {}
}

/// Read-only view of a registration.
#[derive(Clone, Debug, serde::Serialize)]
pub struct TrackedElement {
    /// Registration handle.
    pub handle: TriggerHandle,
    /// Stable key.
    pub key: String,
    /// Observed node.
    pub node: NodeId,
    /// Activation window.
    pub window: TriggerWindow,
    /// Current state.
    pub state: ElementState,
    /// How many times `start` has been crossed forward.
    pub enter_count: u32,
}

struct Entry {
    key: String,
    node: NodeId,
    window: TriggerWindow,
    mode: TriggerMode,
    state: ElementState,
    zone: Option<Zone>,
    enter_count: u32,
    handler: Box<dyn TriggerHandler>,
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("key", &self.key)
            .field("node", &self.node)
            .field("state", &self.state)
            .field("zone", &self.zone)
            .finish_non_exhaustive()
    }
}

/// Counters from one registry update.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct TriggerReport {
    /// Crossings dispatched to handlers.
    pub events: usize,
    /// Registrations dropped because their node was detached.
    pub dropped: usize,
}

/// Crossings implied by moving from zone `prev` to zone `now`.
///
/// A first evaluation (`prev == None`) treats the element as coming from above the window, so
/// elements already inside the window at registration receive their Enter immediately.
fn crossings(prev: Option<Zone>, now: Zone) -> &'static [TriggerEvent] {
    use TriggerEvent::*;
    match (prev.unwrap_or(Zone::Before), now) {
        (Zone::Before, Zone::Active) => &[Enter],
        (Zone::Before, Zone::After) => &[Enter, Leave],
        (Zone::Active, Zone::After) => &[Leave],
        (Zone::After, Zone::Active) => &[EnterBack],
        (Zone::After, Zone::Before) => &[EnterBack, LeaveBack],
        (Zone::Active, Zone::Before) => &[LeaveBack],
        _ => &[],
    }
}

fn next_state(state: ElementState, event: TriggerEvent) -> ElementState {
    match event {
        TriggerEvent::Enter => ElementState::Entering,
        TriggerEvent::Leave | TriggerEvent::EnterBack => ElementState::Visible,
        TriggerEvent::LeaveBack if state == ElementState::Hidden => ElementState::Hidden,
        TriggerEvent::LeaveBack => ElementState::Leaving,
    }
}

/// Tracks observed elements and fires crossings of their activation windows.
///
/// The registry does no work per raw scroll event: the host calls [`update`] once per frame with
/// the coalesced metrics.
///
/// [`update`]: VisibilityTriggerRegistry::update
#[derive(Debug, Default)]
pub struct VisibilityTriggerRegistry {
    entries: BTreeMap<TriggerHandle, Entry>,
    next_handle: u64,
    metrics: Option<ViewportMetrics>,
    last_update_ms: Option<f64>,
}

impl VisibilityTriggerRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Observe `node`. The first evaluation happens on the next [`update`] or [`sync`].
    ///
    /// [`update`]: VisibilityTriggerRegistry::update
    /// [`sync`]: VisibilityTriggerRegistry::sync
    pub fn register(
        &mut self,
        key: impl Into<String>,
        node: NodeId,
        window: TriggerWindow,
        mode: TriggerMode,
        handler: Box<dyn TriggerHandler>,
    ) -> TriggerHandle {
        self.next_handle += 1;
        let handle = TriggerHandle(self.next_handle);
        let key = key.into();
        tracing::trace!(?handle, %key, ?node, "trigger registered");
        self.entries.insert(
            handle,
            Entry {
                key,
                node,
                window,
                mode,
                state: ElementState::Hidden,
                zone: None,
                enter_count: 0,
                handler,
            },
        );
        handle
    }

    /// Stop observing and let the handler release what it started. Unknown handles are ignored.
    pub fn unregister(
        &mut self,
        handle: TriggerHandle,
        stage: &mut Stage,
        player: &mut TransitionPlayer,
    ) -> bool {
        match self.entries.remove(&handle) {
            Some(mut entry) => {
                entry.handler.dispose(stage, player);
                true
            }
            None => false,
        }
    }

    /// Evaluate every registration against `metrics`. Call at most once per frame.
    pub fn update(
        &mut self,
        stage: &mut Stage,
        player: &mut TransitionPlayer,
        metrics: ViewportMetrics,
        now_ms: f64,
    ) -> TriggerReport {
        let dt_ms = match self.last_update_ms {
            Some(prev) => (now_ms - prev).max(0.0),
            None => 0.0,
        };
        self.metrics = Some(metrics);
        self.last_update_ms = Some(now_ms);
        self.evaluate(stage, player, metrics, now_ms, dt_ms)
    }

    /// Evaluate registrations against the metrics of the last update, without advancing time.
    ///
    /// Used right after binding so that elements already inside their window enter on mount.
    pub fn sync(&mut self, stage: &mut Stage, player: &mut TransitionPlayer) -> TriggerReport {
        let Some(metrics) = self.metrics else {
            return TriggerReport::default();
        };
        let now_ms = self.last_update_ms.unwrap_or(0.0);
        self.evaluate(stage, player, metrics, now_ms, 0.0)
    }

    fn evaluate(
        &mut self,
        stage: &mut Stage,
        player: &mut TransitionPlayer,
        metrics: ViewportMetrics,
        now_ms: f64,
        dt_ms: f64,
    ) -> TriggerReport {
        let mut report = TriggerReport::default();
        let mut detached = Vec::new();

        for (&handle, entry) in self.entries.iter_mut() {
            let Some(layout) = stage.get(entry.node).map(|n| n.layout) else {
                detached.push(handle);
                continue;
            };

            let range = entry.window.resolve(layout, metrics.height);
            let zone = range.zone(metrics.scroll_y);
            let events = crossings(entry.zone, zone);
            entry.zone = Some(zone);

            let mut cx = TriggerCx {
                stage: &mut *stage,
                player: &mut *player,
                node: entry.node,
                key: &entry.key,
                metrics,
                range,
                now_ms,
                dt_ms,
            };

            for &event in events {
                entry.state = next_state(entry.state, event);
                if event == TriggerEvent::Enter {
                    entry.enter_count += 1;
                }
                tracing::debug!(key = %entry.key, ?event, state = ?entry.state, "trigger crossing");
                entry.handler.on_event(&mut cx, event);
                report.events += 1;
            }

            if let TriggerMode::Scrub { .. } = entry.mode {
                entry
                    .handler
                    .on_scrub(&mut cx, range.progress(metrics.scroll_y));
            }

            if entry.state == ElementState::Leaving
                && zone == Zone::Before
                && entry.handler.is_settled(cx.player)
            {
                entry.state = ElementState::Hidden;
            }
        }

        for handle in detached {
            if let Some(mut entry) = self.entries.remove(&handle) {
                tracing::warn!(key = %entry.key, node = ?entry.node, "dropping trigger of detached node");
                entry.handler.dispose(stage, player);
                report.dropped += 1;
            }
        }

        report
    }

    /// Current state of a registration.
    pub fn state(&self, handle: TriggerHandle) -> Option<ElementState> {
        self.entries.get(&handle).map(|e| e.state)
    }

    /// Read-only view of a registration.
    pub fn tracked(&self, handle: TriggerHandle) -> Option<TrackedElement> {
        self.entries.get(&handle).map(|e| TrackedElement {
            handle,
            key: e.key.clone(),
            node: e.node,
            window: e.window,
            state: e.state,
            enter_count: e.enter_count,
        })
    }

    /// All registrations, in registration order.
    pub fn iter(&self) -> impl Iterator<Item = TrackedElement> + '_ {
        self.entries.keys().filter_map(|h| self.tracked(*h))
    }

    /// Whether `handle` is registered.
    pub fn contains(&self, handle: TriggerHandle) -> bool {
        self.entries.contains_key(&handle)
    }

    /// Number of registrations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/trigger/registry.rs"]
mod tests;
