use super::*;
use crate::foundation::core::Rect;

fn setup() -> (Stage, NodeId, TransitionPlayer) {
    let mut stage = Stage::new();
    let node = stage.insert("row", Rect::new(0.0, 0.0, 100.0, 40.0));
    (stage, node, TransitionPlayer::new())
}

fn entrance() -> TransitionSpec {
    TransitionSpec::new("row-entrance", PropertySet::new().opacity(1.0).y(0.0))
        .from_state(PropertySet::new().opacity(0.0).y(50.0))
        .duration_ms(1000.0)
        .ease(Ease::Linear)
        .reversible(true)
}

#[test]
fn attach_applies_from_state_and_waits() {
    let (mut stage, node, mut player) = setup();
    let h = player.attach(&mut stage, node, &entrance()).unwrap();

    assert_eq!(stage.style(node).unwrap().opacity, 0.0);
    assert_eq!(stage.style(node).unwrap().y, 50.0);
    assert!(!player.is_running(h));

    player.tick(&mut stage, 0.0);
    player.tick(&mut stage, 500.0);
    assert_eq!(stage.style(node).unwrap().opacity, 0.0);
}

#[test]
fn play_interpolates_over_duration() {
    let (mut stage, node, mut player) = setup();
    player.tick(&mut stage, 0.0);
    let h = player.play(&mut stage, node, &entrance()).unwrap();

    player.tick(&mut stage, 250.0);
    let style = stage.style(node).unwrap();
    assert!((style.opacity - 0.25).abs() < 1e-9);
    assert!((style.y - 37.5).abs() < 1e-9);

    player.tick(&mut stage, 1000.0);
    assert_eq!(stage.style(node).unwrap().opacity, 1.0);
    assert!(!player.is_running(h));
    assert!(player.contains(h));
}

#[test]
fn reverse_runs_back_from_current_position() {
    let (mut stage, node, mut player) = setup();
    player.tick(&mut stage, 0.0);
    let h = player.play(&mut stage, node, &entrance()).unwrap();
    player.tick(&mut stage, 600.0);

    assert!(player.reverse(h));
    assert_eq!(player.direction(h), Some(Direction::Backward));
    player.tick(&mut stage, 800.0);
    assert!((player.progress(h).unwrap() - 0.4).abs() < 1e-9);

    player.tick(&mut stage, 2000.0);
    let style = stage.style(node).unwrap();
    assert_eq!(style.opacity, 0.0);
    assert_eq!(style.y, 50.0);
}

#[test]
fn unpause_keeps_the_direction() {
    let (mut stage, node, mut player) = setup();
    player.tick(&mut stage, 0.0);
    let h = player.play(&mut stage, node, &entrance()).unwrap();
    player.tick(&mut stage, 600.0);
    player.reverse(h);
    player.tick(&mut stage, 700.0);
    assert!(player.pause(h));
    player.tick(&mut stage, 900.0);
    assert!((player.progress(h).unwrap() - 0.5).abs() < 1e-9);

    assert!(player.unpause(h));
    assert_eq!(player.direction(h), Some(Direction::Backward));
    player.tick(&mut stage, 1000.0);
    assert!((player.progress(h).unwrap() - 0.4).abs() < 1e-9);
}

#[test]
fn non_reversible_specs_ignore_reverse() {
    let (mut stage, node, mut player) = setup();
    let spec = entrance().reversible(false);
    let h = player.play(&mut stage, node, &spec).unwrap();
    assert!(!player.reverse(h));
    assert_eq!(player.direction(h), Some(Direction::Forward));
}

#[test]
fn newer_play_supersedes_same_group_only() {
    let (mut stage, node, mut player) = setup();
    player.tick(&mut stage, 0.0);
    let first = player.play(&mut stage, node, &entrance()).unwrap();
    player.tick(&mut stage, 500.0);

    let fade = TransitionSpec::new("fade", PropertySet::new().opacity(0.2)).duration_ms(100.0);
    let second = player.play(&mut stage, node, &fade).unwrap();

    assert_eq!(
        player.handle_for(node, PropertyGroup::Appearance),
        Some(second)
    );
    assert_eq!(
        player.handle_for(node, PropertyGroup::Transform),
        Some(first)
    );
    assert_eq!(player.superseded_count(), 1);
    assert_eq!(player.len(), 2);

    // The fade starts from the live mid-flight opacity, not from the entrance's `from`.
    assert!((stage.style(node).unwrap().opacity - 0.5).abs() < 1e-9);
}

#[test]
fn zero_duration_applies_immediately() {
    let (mut stage, node, mut player) = setup();
    let spec = TransitionSpec::new("snap", PropertySet::new().x(42.0)).duration_ms(0.0);
    let h = player.play(&mut stage, node, &spec).unwrap();
    assert_eq!(stage.style(node).unwrap().x, 42.0);
    assert!(!player.is_running(h));
}

#[test]
fn detached_nodes_are_skipped_and_dropped() {
    let (mut stage, node, mut player) = setup();
    player.tick(&mut stage, 0.0);
    let h = player.play(&mut stage, node, &entrance()).unwrap();

    stage.remove(node);
    assert_eq!(player.tick(&mut stage, 16.0), 0);
    assert!(!player.contains(h));
    assert!(player.play(&mut stage, node, &entrance()).is_none());
}

#[test]
fn revert_restores_pre_transition_values() {
    let (mut stage, node, mut player) = setup();
    let h = player.attach(&mut stage, node, &entrance()).unwrap();
    assert_eq!(stage.style(node).unwrap().opacity, 0.0);

    assert_eq!(player.revert(&mut stage, h), 2);
    let style = stage.style(node).unwrap();
    assert_eq!(style.opacity, 1.0);
    assert_eq!(style.y, 0.0);
    assert!(player.is_empty());
    assert_eq!(player.revert(&mut stage, h), 0);
}

#[test]
fn seek_restart_reset_complete() {
    let (mut stage, node, mut player) = setup();
    let h = player.attach(&mut stage, node, &entrance()).unwrap();

    assert!(player.seek(&mut stage, h, 0.5));
    assert!((stage.style(node).unwrap().opacity - 0.5).abs() < 1e-9);

    assert!(player.complete(&mut stage, h));
    assert_eq!(stage.style(node).unwrap().opacity, 1.0);
    assert!(!player.is_running(h));

    assert!(player.restart(&mut stage, h));
    assert_eq!(stage.style(node).unwrap().opacity, 0.0);
    assert!(player.is_running(h));

    assert!(player.reset(&mut stage, h));
    assert!(!player.is_running(h));
    assert_eq!(player.progress(h), Some(0.0));
}

#[test]
fn spec_validation() {
    assert!(entrance().validate().is_ok());
    assert!(
        TransitionSpec::new("empty", PropertySet::new())
            .validate()
            .is_err()
    );
    assert!(entrance().duration_ms(-1.0).validate().is_err());
    assert!(
        TransitionSpec::new("nan", PropertySet::new().x(f64::NAN))
            .validate()
            .is_err()
    );
}
