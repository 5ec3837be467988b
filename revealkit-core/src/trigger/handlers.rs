use crate::{
    animation::{
        ease::Ease,
        player::{TransitionHandle, TransitionPlayer, TransitionSpec},
    },
    scene::stage::{NodeId, Stage},
    trigger::{
        actions::{ToggleAction, ToggleActions, TriggerEvent},
        registry::{TriggerCx, TriggerHandler},
    },
};

/// Return `bound` if it still drives a track, else attach `spec` afresh and remember the new handle.
///
/// Another writer may have superseded the bound track since the last crossing.
pub(crate) fn ensure_bound(
    stage: &mut Stage,
    player: &mut TransitionPlayer,
    node: NodeId,
    spec: &TransitionSpec,
    bound: &mut Option<TransitionHandle>,
) -> Option<TransitionHandle> {
    match *bound {
        Some(h) if player.contains(h) => Some(h),
        _ => {
            *bound = player.attach(stage, node, spec);
            *bound
        }
    }
}

/// Scroll-following playhead.
///
/// Each new target starts a `power2.out` glide from the current position that lands on the target
/// exactly `lag_ms` later.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Playhead {
    position: f64,
    from: f64,
    target: f64,
    elapsed_ms: f64,
}

impl Playhead {
    /// Advance by `dt_ms` towards `target` and return the new position.
    pub(crate) fn follow(&mut self, target: f64, dt_ms: f64, lag_ms: f64) -> f64 {
        if lag_ms <= 0.0 || !lag_ms.is_finite() {
            self.position = target;
            self.from = target;
            self.target = target;
            return self.position;
        }
        if (target - self.target).abs() > 1e-9 {
            self.from = self.position;
            self.target = target;
            self.elapsed_ms = 0.0;
        }
        if dt_ms.is_finite() {
            self.elapsed_ms += dt_ms.max(0.0);
        }
        let t = (self.elapsed_ms / lag_ms).min(1.0);
        self.position = if t >= 1.0 {
            self.target
        } else {
            self.from + (self.target - self.from) * Ease::OutCubic.apply(t)
        };
        self.position
    }

    pub(crate) fn position(&self) -> f64 {
        self.position
    }

    pub(crate) fn is_settled(&self) -> bool {
        self.position == self.target
    }
}

/// Plays a bound transition according to four toggle actions.
#[derive(Debug)]
pub struct EntranceHandler {
    spec: TransitionSpec,
    actions: ToggleActions,
    handle: Option<TransitionHandle>,
}

impl EntranceHandler {
    /// Handler driving `handle`, normally obtained from [`TransitionPlayer::attach`].
    pub fn new(
        spec: TransitionSpec,
        actions: ToggleActions,
        handle: Option<TransitionHandle>,
    ) -> Self {
        Self {
            spec,
            actions,
            handle,
        }
    }

    /// Transition currently driven.
    pub fn handle(&self) -> Option<TransitionHandle> {
        self.handle
    }
}

impl TriggerHandler for EntranceHandler {
    fn on_event(&mut self, cx: &mut TriggerCx<'_>, event: TriggerEvent) {
        let action = self.actions.action_for(event);
        if action == ToggleAction::None {
            return;
        }
        let Some(h) = ensure_bound(cx.stage, cx.player, cx.node, &self.spec, &mut self.handle)
        else {
            return;
        };
        tracing::trace!(transition = %self.spec.name, key = cx.key, %action, "toggle action");
        match action {
            ToggleAction::Play => {
                cx.player.resume(h);
            }
            ToggleAction::Resume => {
                cx.player.unpause(h);
            }
            ToggleAction::Pause => {
                cx.player.pause(h);
            }
            ToggleAction::Reverse => {
                cx.player.reverse(h);
            }
            ToggleAction::Restart => {
                cx.player.restart(cx.stage, h);
            }
            ToggleAction::Reset => {
                cx.player.reset(cx.stage, h);
            }
            ToggleAction::Complete => {
                cx.player.complete(cx.stage, h);
            }
            ToggleAction::None => {}
        }
    }

    fn is_settled(&self, player: &TransitionPlayer) -> bool {
        self.handle.is_none_or(|h| !player.is_running(h))
    }

    fn dispose(&mut self, stage: &mut Stage, player: &mut TransitionPlayer) {
        if let Some(h) = self.handle.take() {
            player.revert(stage, h);
        }
    }
}

/// Ties a bound transition's progress to scroll progress through the trigger window.
#[derive(Debug)]
pub struct ScrubHandler {
    spec: TransitionSpec,
    lag_ms: f64,
    handle: Option<TransitionHandle>,
    playhead: Playhead,
}

impl ScrubHandler {
    /// Handler scrubbing `handle`, catching up with scroll over `lag_ms`.
    pub fn new(spec: TransitionSpec, lag_ms: f64, handle: Option<TransitionHandle>) -> Self {
        Self {
            spec,
            lag_ms,
            handle,
            playhead: Playhead::default(),
        }
    }

    /// Progress currently written to the transition.
    pub fn playhead(&self) -> f64 {
        self.playhead.position()
    }
}

impl TriggerHandler for ScrubHandler {
    fn on_event(&mut self, cx: &mut TriggerCx<'_>, event: TriggerEvent) {
        tracing::trace!(transition = %self.spec.name, key = cx.key, ?event, "scrub crossing");
    }

    fn on_scrub(&mut self, cx: &mut TriggerCx<'_>, progress: f64) {
        let position = self.playhead.follow(progress, cx.dt_ms, self.lag_ms);
        if let Some(h) = ensure_bound(cx.stage, cx.player, cx.node, &self.spec, &mut self.handle) {
            cx.player.seek(cx.stage, h, position);
        }
    }

    fn is_settled(&self, _player: &TransitionPlayer) -> bool {
        self.playhead.is_settled()
    }

    fn dispose(&mut self, stage: &mut Stage, player: &mut TransitionPlayer) {
        if let Some(h) = self.handle.take() {
            player.revert(stage, h);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/trigger/handlers.rs"]
mod tests;
