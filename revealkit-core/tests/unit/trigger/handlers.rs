use super::*;
use crate::{
    animation::{ease::Ease, props::PropertySet},
    foundation::core::{Rect, ViewportMetrics},
    scene::stage::NodeId,
    trigger::{
        actions::TriggerMode,
        registry::{ElementState, TriggerHandle, VisibilityTriggerRegistry},
        window::TriggerWindow,
    },
};

fn row_entrance() -> TransitionSpec {
    TransitionSpec::new("row-entrance", PropertySet::new().opacity(1.0).y(0.0))
        .from_state(PropertySet::new().opacity(0.0).y(50.0))
        .duration_ms(1000.0)
        .ease(Ease::OutQuad)
        .reversible(true)
}

struct World {
    stage: Stage,
    player: TransitionPlayer,
    registry: VisibilityTriggerRegistry,
    metrics: ViewportMetrics,
    node: NodeId,
    now: f64,
}

impl World {
    fn new() -> Self {
        let mut stage = Stage::new();
        let node = stage.insert("row", Rect::new(0.0, 1000.0, 800.0, 1100.0));
        Self {
            stage,
            player: TransitionPlayer::new(),
            registry: VisibilityTriggerRegistry::new(),
            metrics: ViewportMetrics::new(1200.0, 800.0, 4000.0).unwrap(),
            node,
            now: 0.0,
        }
    }

    fn bind_entrance(&mut self, actions: ToggleActions) -> TriggerHandle {
        let spec = row_entrance();
        let h = self.player.attach(&mut self.stage, self.node, &spec);
        self.registry.register(
            "row",
            self.node,
            TriggerWindow::parse("top 90%", "top 75%").unwrap(),
            TriggerMode::Toggle(actions),
            Box::new(EntranceHandler::new(spec, actions, h)),
        )
    }

    // Runs frames of 16 ms at a fixed scroll offset.
    fn settle_at(&mut self, scroll: f64, frames: usize) {
        for _ in 0..frames {
            self.player.tick(&mut self.stage, self.now);
            self.registry.update(
                &mut self.stage,
                &mut self.player,
                self.metrics.with_scroll(scroll),
                self.now,
            );
            self.now += 16.0;
        }
    }

    fn opacity(&self) -> f64 {
        self.stage.style(self.node).unwrap().opacity
    }
}

#[test]
fn from_state_is_applied_before_any_scroll() {
    let mut w = World::new();
    w.bind_entrance(ToggleActions::REPLAY);
    assert_eq!(w.opacity(), 0.0);
    assert_eq!(w.stage.style(w.node).unwrap().y, 50.0);
}

#[test]
fn enter_leave_enter_matches_a_single_enter() {
    let mut w = World::new();
    let h = w.bind_entrance(ToggleActions::REPLAY);

    w.settle_at(0.0, 2);
    assert_eq!(w.opacity(), 0.0);

    w.settle_at(350.0, 80);
    assert_eq!(w.opacity(), 1.0);
    assert_eq!(w.registry.state(h), Some(ElementState::Entering));

    w.settle_at(0.0, 80);
    assert_eq!(w.opacity(), 0.0);
    assert_eq!(w.registry.state(h), Some(ElementState::Hidden));

    w.settle_at(350.0, 80);
    assert_eq!(w.opacity(), 1.0);
    assert_eq!(w.stage.style(w.node).unwrap().y, 0.0);
    assert_eq!(w.registry.tracked(h).unwrap().enter_count, 2);
}

#[test]
fn repeated_updates_at_one_offset_are_idempotent() {
    let mut w = World::new();
    let h = w.bind_entrance(ToggleActions::REPLAY);
    w.settle_at(0.0, 1);
    w.settle_at(350.0, 10);
    assert_eq!(w.registry.tracked(h).unwrap().enter_count, 1);
}

#[test]
fn leaving_stays_until_the_reverse_finishes() {
    let mut w = World::new();
    let h = w.bind_entrance(ToggleActions::REPLAY);
    w.settle_at(0.0, 1);
    w.settle_at(350.0, 80);
    w.settle_at(0.0, 3);
    assert_eq!(w.registry.state(h), Some(ElementState::Leaving));
    assert!(w.opacity() > 0.0);
}

#[test]
fn play_then_reverse_variant_reverses_on_enter_back() {
    let mut w = World::new();
    w.bind_entrance(ToggleActions::PLAY_THEN_REVERSE);
    w.settle_at(0.0, 1);
    w.settle_at(2000.0, 80);
    assert_eq!(w.opacity(), 1.0);

    // back inside the window from below
    w.settle_at(350.0, 80);
    assert_eq!(w.opacity(), 0.0);
}

#[test]
fn resume_continues_a_paused_reverse() {
    let mut w = World::new();
    w.bind_entrance(ToggleActions {
        on_enter: ToggleAction::Play,
        on_leave: ToggleAction::Reverse,
        on_enter_back: ToggleAction::Pause,
        on_leave_back: ToggleAction::Resume,
    });
    w.settle_at(0.0, 1);
    w.settle_at(350.0, 80);
    assert_eq!(w.opacity(), 1.0);

    w.settle_at(2000.0, 10);
    w.settle_at(350.0, 1);
    let paused_at = w.opacity();
    assert!(paused_at > 0.0 && paused_at < 1.0, "opacity = {paused_at}");
    w.settle_at(350.0, 20);
    assert_eq!(w.opacity(), paused_at);

    w.settle_at(0.0, 80);
    assert_eq!(w.opacity(), 0.0);
}

#[test]
fn superseded_track_is_rebound_on_the_next_crossing() {
    let mut w = World::new();
    w.bind_entrance(ToggleActions::REPLAY);
    w.settle_at(0.0, 1);

    let other = TransitionSpec::new("flash", PropertySet::new().opacity(0.5).y(10.0))
        .duration_ms(0.0);
    w.player.play(&mut w.stage, w.node, &other);

    w.settle_at(350.0, 80);
    assert_eq!(w.opacity(), 1.0);
}

#[test]
fn unregister_reverts_to_the_pre_bind_style() {
    let mut w = World::new();
    let h = w.bind_entrance(ToggleActions::REPLAY);
    w.settle_at(0.0, 1);
    w.settle_at(350.0, 20);

    w.registry.unregister(h, &mut w.stage, &mut w.player);
    assert!(w.player.is_empty());
    let style = w.stage.style(w.node).unwrap();
    assert_eq!(style.opacity, 1.0);
    assert_eq!(style.y, 0.0);
}

#[test]
fn scrub_follows_scroll_without_lag() {
    let mut w = World::new();
    let spec = TransitionSpec::new("rule", PropertySet::new().x(0.0))
        .from_state(PropertySet::new().x(400.0))
        .ease(Ease::Linear);
    let bound = w.player.attach(&mut w.stage, w.node, &spec);
    w.registry.register(
        "rule",
        w.node,
        TriggerWindow::parse("top 100%", "top 75%").unwrap(),
        TriggerMode::Scrub { lag_ms: 0.0 },
        Box::new(ScrubHandler::new(spec, 0.0, bound)),
    );

    // start 200, end 400
    w.settle_at(300.0, 1);
    assert!((w.stage.style(w.node).unwrap().x - 200.0).abs() < 1e-9);
    w.settle_at(500.0, 1);
    assert_eq!(w.stage.style(w.node).unwrap().x, 0.0);
}

#[test]
fn scrub_with_lag_catches_up_gradually() {
    let mut w = World::new();
    let spec = TransitionSpec::new("heading", PropertySet::new().y(0.0))
        .from_state(PropertySet::new().y(50.0))
        .ease(Ease::Linear);
    let bound = w.player.attach(&mut w.stage, w.node, &spec);
    w.registry.register(
        "heading",
        w.node,
        TriggerWindow::parse("top 100%", "top 75%").unwrap(),
        TriggerMode::Scrub { lag_ms: 1000.0 },
        Box::new(ScrubHandler::new(spec, 1000.0, bound)),
    );

    w.settle_at(0.0, 1);
    w.settle_at(500.0, 2);
    let y = w.stage.style(w.node).unwrap().y;
    assert!(y < 50.0 && y > 0.0, "y = {y}");

    w.settle_at(500.0, 1000);
    assert_eq!(w.stage.style(w.node).unwrap().y, 0.0);
}

#[test]
fn scrub_lag_settles_within_its_duration() {
    let mut w = World::new();
    let spec = TransitionSpec::new("heading", PropertySet::new().y(0.0))
        .from_state(PropertySet::new().y(50.0))
        .ease(Ease::Linear);
    let bound = w.player.attach(&mut w.stage, w.node, &spec);
    w.registry.register(
        "heading",
        w.node,
        TriggerWindow::parse("top 100%", "top 75%").unwrap(),
        TriggerMode::Scrub { lag_ms: 1000.0 },
        Box::new(ScrubHandler::new(spec, 1000.0, bound)),
    );

    w.settle_at(0.0, 1);
    // 31 frames of 16ms: roughly half the lag has elapsed.
    w.settle_at(500.0, 31);
    let y = w.stage.style(w.node).unwrap().y;
    assert!(y > 6.0 && y < 7.0, "y = {y}");

    // 1008ms after the jump the glide has landed.
    w.settle_at(500.0, 32);
    assert_eq!(w.stage.style(w.node).unwrap().y, 0.0);
}
