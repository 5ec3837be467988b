use std::collections::BTreeMap;

use crate::{
    animation::{
        ease::Ease,
        props::{Lerp, PropertyGroup, PropertySet},
    },
    foundation::error::{RevealError, RevealResult},
    scene::stage::{NodeId, Stage},
};

/// Handle to a transition started by [`TransitionPlayer`].
///
/// One handle may cover both property groups of a spec. A handle goes stale once every track it
/// covers has been superseded, cancelled, reverted or dropped with its node.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct TransitionHandle(u64);

/// Immutable description of a transition, supplied per element class.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TransitionSpec {
    /// Name used in logs and snapshots.
    pub name: String,
    /// Start values. Properties present in `to` but missing here start from the live style.
    #[serde(default)]
    pub from: PropertySet,
    /// End values.
    pub to: PropertySet,
    /// Duration in milliseconds.
    pub duration_ms: f64,
    /// Easing applied to linear progress.
    pub ease: Ease,
    /// Whether [`TransitionPlayer::reverse`] may run this transition backwards.
    #[serde(default)]
    pub reverse_on_exit: bool,
}

impl TransitionSpec {
    /// A one second `power1.out` transition towards `to`, starting from the live style.
    pub fn new(name: impl Into<String>, to: PropertySet) -> Self {
        Self {
            name: name.into(),
            from: PropertySet::default(),
            to,
            duration_ms: 1000.0,
            ease: Ease::OutQuad,
            reverse_on_exit: false,
        }
    }

    /// Set explicit start values.
    pub fn from_state(mut self, from: PropertySet) -> Self {
        self.from = from;
        self
    }

    /// Set the duration.
    pub fn duration_ms(mut self, ms: f64) -> Self {
        self.duration_ms = ms;
        self
    }

    /// Set the easing.
    pub fn ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    /// Allow or forbid reversal.
    pub fn reversible(mut self, reverse_on_exit: bool) -> Self {
        self.reverse_on_exit = reverse_on_exit;
        self
    }

    /// Reject empty targets and non-finite numbers.
    pub fn validate(&self) -> RevealResult<()> {
        if self.to.is_empty() {
            return Err(RevealError::validation(format!(
                "transition '{}' has no target properties",
                self.name
            )));
        }
        if !self.duration_ms.is_finite() || self.duration_ms < 0.0 {
            return Err(RevealError::validation(format!(
                "transition '{}' duration must be finite and >= 0",
                self.name
            )));
        }
        let numbers = [
            self.from.x,
            self.from.y,
            self.from.rotation,
            self.from.opacity,
            self.to.x,
            self.to.y,
            self.to.rotation,
            self.to.opacity,
        ];
        if numbers.iter().flatten().any(|v| !v.is_finite()) {
            return Err(RevealError::validation(format!(
                "transition '{}' has non-finite values",
                self.name
            )));
        }
        Ok(())
    }
}

/// Playback direction of a track.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Direction {
    /// Towards `to`.
    Forward,
    /// Back towards `from`, along the same eased path.
    Backward,
}

#[derive(Clone, Debug)]
struct Track {
    handle: TransitionHandle,
    name: String,
    from: PropertySet,
    to: PropertySet,
    origin: PropertySet,
    duration_ms: f64,
    ease: Ease,
    reversible: bool,
    position: f64,
    direction: Direction,
    paused: bool,
}

impl Track {
    fn is_running(&self) -> bool {
        !self.paused
            && match self.direction {
                Direction::Forward => self.position < 1.0,
                Direction::Backward => self.position > 0.0,
            }
    }

    fn advance(&mut self, dt_ms: f64) {
        if !self.is_running() {
            return;
        }
        let step = if self.duration_ms <= 0.0 {
            1.0
        } else {
            dt_ms / self.duration_ms
        };
        self.position = match self.direction {
            Direction::Forward => (self.position + step).min(1.0),
            Direction::Backward => (self.position - step).max(0.0),
        };
    }

    fn sample(&self) -> PropertySet {
        PropertySet::lerp(&self.from, &self.to, self.ease.apply(self.position))
    }
}

/// Runs time-boxed, cancellable transitions against nodes of a [`Stage`].
///
/// Tracks are keyed by `(node, property group)`: starting a transition on a node replaces any
/// track in the same group (last writer wins). Finished tracks are kept, parked at their end,
/// so they can still be reversed; they are removed only by supersession, cancellation, revert
/// or detachment of their node.
#[derive(Debug, Default)]
pub struct TransitionPlayer {
    tracks: BTreeMap<(NodeId, PropertyGroup), Track>,
    next_handle: u64,
    now_ms: Option<f64>,
    superseded: u64,
}

impl TransitionPlayer {
    /// Empty player.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start `spec` on `node` immediately. Returns `None` if the node is detached.
    pub fn play(
        &mut self,
        stage: &mut Stage,
        node: NodeId,
        spec: &TransitionSpec,
    ) -> Option<TransitionHandle> {
        self.start(stage, node, spec, false)
    }

    /// Bind `spec` to `node` paused at its start, applying the `from` state right away.
    ///
    /// Used for entrances that wait for a trigger and for scrubbed transitions.
    pub fn attach(
        &mut self,
        stage: &mut Stage,
        node: NodeId,
        spec: &TransitionSpec,
    ) -> Option<TransitionHandle> {
        self.start(stage, node, spec, true)
    }

    fn start(
        &mut self,
        stage: &mut Stage,
        node: NodeId,
        spec: &TransitionSpec,
        paused: bool,
    ) -> Option<TransitionHandle> {
        let Some(current) = stage.style(node).cloned() else {
            tracing::trace!(transition = %spec.name, ?node, "skipping transition on detached node");
            return None;
        };

        self.next_handle += 1;
        let handle = TransitionHandle(self.next_handle);

        for group in spec.to.groups() {
            let to = spec.to.restrict(group);
            let live = to.capture(&current);
            let from = spec.from.restrict(group).or(&live);

            let mut track = Track {
                handle,
                name: spec.name.clone(),
                from,
                to,
                origin: live,
                duration_ms: spec.duration_ms,
                ease: spec.ease,
                reversible: spec.reverse_on_exit,
                position: 0.0,
                direction: Direction::Forward,
                paused,
            };

            if let Some(prev) = self.tracks.remove(&(node, group)) {
                self.superseded += 1;
                tracing::trace!(
                    old = %prev.name,
                    new = %spec.name,
                    ?node,
                    ?group,
                    "transition superseded"
                );
                track.origin = prev.origin.or(&track.origin);
            }

            if !paused && track.duration_ms <= 0.0 {
                track.position = 1.0;
            }
            if let Some(style) = stage.style_mut(node) {
                track.sample().apply(style);
            }
            self.tracks.insert((node, group), track);
        }

        Some(handle)
    }

    fn tracks_of(&mut self, handle: TransitionHandle) -> impl Iterator<Item = &mut Track> + '_ {
        self.tracks.values_mut().filter(move |t| t.handle == handle)
    }

    fn write_back(&self, stage: &mut Stage, handle: TransitionHandle) {
        for ((node, _), track) in self.tracks.iter().filter(|(_, t)| t.handle == handle) {
            if let Some(style) = stage.style_mut(*node) {
                track.sample().apply(style);
            }
        }
    }

    /// Run forward from the current position. Returns `false` for stale handles.
    pub fn resume(&mut self, handle: TransitionHandle) -> bool {
        let mut found = false;
        for track in self.tracks_of(handle) {
            track.direction = Direction::Forward;
            track.paused = false;
            found = true;
        }
        found
    }

    /// Lift a pause, keeping the current direction. Returns `false` for stale handles.
    pub fn unpause(&mut self, handle: TransitionHandle) -> bool {
        let mut found = false;
        for track in self.tracks_of(handle) {
            track.paused = false;
            found = true;
        }
        found
    }

    /// Run backwards from the current position along the same path.
    ///
    /// Returns `false` for stale handles and for specs without `reverse_on_exit`.
    pub fn reverse(&mut self, handle: TransitionHandle) -> bool {
        let mut found = false;
        for track in self.tracks_of(handle) {
            if !track.reversible {
                tracing::trace!(transition = %track.name, "reverse ignored, spec is not reversible");
                continue;
            }
            track.direction = Direction::Backward;
            track.paused = false;
            found = true;
        }
        found
    }

    /// Freeze at the current position.
    pub fn pause(&mut self, handle: TransitionHandle) -> bool {
        let mut found = false;
        for track in self.tracks_of(handle) {
            track.paused = true;
            found = true;
        }
        found
    }

    /// Jump to `progress` (clamped to `[0, 1]`), keep the current run state, and write the
    /// sampled values immediately.
    pub fn seek(&mut self, stage: &mut Stage, handle: TransitionHandle, progress: f64) -> bool {
        let progress = if progress.is_finite() {
            progress.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let mut found = false;
        for track in self.tracks_of(handle) {
            track.position = progress;
            found = true;
        }
        if found {
            self.write_back(stage, handle);
        }
        found
    }

    /// Jump to the start and run forward.
    pub fn restart(&mut self, stage: &mut Stage, handle: TransitionHandle) -> bool {
        self.seek(stage, handle, 0.0) && self.resume(handle)
    }

    /// Jump to the start and pause.
    pub fn reset(&mut self, stage: &mut Stage, handle: TransitionHandle) -> bool {
        self.seek(stage, handle, 0.0) && self.pause(handle)
    }

    /// Jump to the end and pause.
    pub fn complete(&mut self, stage: &mut Stage, handle: TransitionHandle) -> bool {
        self.seek(stage, handle, 1.0) && self.pause(handle)
    }

    /// Stop and forget the transition, leaving the node where it is.
    pub fn cancel(&mut self, handle: TransitionHandle) -> usize {
        let before = self.tracks.len();
        self.tracks.retain(|_, t| t.handle != handle);
        before - self.tracks.len()
    }

    /// Stop and forget the transition, restoring the values the node had before it was bound.
    pub fn revert(&mut self, stage: &mut Stage, handle: TransitionHandle) -> usize {
        let mut removed = 0;
        self.tracks.retain(|(node, _), t| {
            if t.handle != handle {
                return true;
            }
            if let Some(style) = stage.style_mut(*node) {
                t.origin.apply(style);
            }
            removed += 1;
            false
        });
        removed
    }

    /// Stop every transition on `node`.
    pub fn cancel_node(&mut self, node: NodeId) -> usize {
        let before = self.tracks.len();
        self.tracks.retain(|(n, _), _| *n != node);
        before - self.tracks.len()
    }

    /// Advance all running tracks to `now_ms` and write their values.
    ///
    /// Tracks whose node has been detached are dropped silently. Returns the number of tracks
    /// still running.
    pub fn tick(&mut self, stage: &mut Stage, now_ms: f64) -> usize {
        let dt = match self.now_ms {
            Some(prev) if now_ms.is_finite() => (now_ms - prev).max(0.0),
            _ => 0.0,
        };
        if now_ms.is_finite() {
            self.now_ms = Some(now_ms);
        }

        let mut detached = Vec::new();
        for (&(node, group), track) in self.tracks.iter_mut() {
            if !track.is_running() {
                continue;
            }
            track.advance(dt);
            match stage.style_mut(node) {
                Some(style) => track.sample().apply(style),
                None => detached.push((node, group)),
            }
        }

        for key in detached {
            if let Some(track) = self.tracks.remove(&key) {
                tracing::debug!(transition = %track.name, node = ?key.0, "dropping transition of detached node");
            }
        }

        self.running_count()
    }

    /// Time of the last tick.
    pub fn now_ms(&self) -> Option<f64> {
        self.now_ms
    }

    /// Whether any track of `handle` is still moving.
    pub fn is_running(&self, handle: TransitionHandle) -> bool {
        self.tracks
            .values()
            .any(|t| t.handle == handle && t.is_running())
    }

    /// Whether `handle` still owns at least one track.
    pub fn contains(&self, handle: TransitionHandle) -> bool {
        self.tracks.values().any(|t| t.handle == handle)
    }

    /// Linear progress of `handle` in `[0, 1]`.
    pub fn progress(&self, handle: TransitionHandle) -> Option<f64> {
        self.tracks
            .values()
            .find(|t| t.handle == handle)
            .map(|t| t.position)
    }

    /// Playback direction of `handle`.
    pub fn direction(&self, handle: TransitionHandle) -> Option<Direction> {
        self.tracks
            .values()
            .find(|t| t.handle == handle)
            .map(|t| t.direction)
    }

    /// Handle currently driving `group` on `node`.
    pub fn handle_for(&self, node: NodeId, group: PropertyGroup) -> Option<TransitionHandle> {
        self.tracks.get(&(node, group)).map(|t| t.handle)
    }

    /// Number of tracks still moving.
    pub fn running_count(&self) -> usize {
        self.tracks.values().filter(|t| t.is_running()).count()
    }

    /// Number of tracks, running or parked.
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Whether there are no tracks.
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// How many tracks were replaced by a newer transition on the same node and group.
    pub fn superseded_count(&self) -> u64 {
        self.superseded
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/player.rs"]
mod tests;
