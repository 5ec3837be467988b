use super::*;
use crate::{
    foundation::core::Rect,
    input::pointer::PointerTracker,
    preview::images::RecordingPrefetcher,
};

struct Rig {
    stage: Stage,
    player: TransitionPlayer,
    preview: PreviewRevealController,
    metrics: ViewportMetrics,
}

fn rows() -> Vec<RowData> {
    vec![
        RowData::new("0", "first").with_image("https://img.test/0.png"),
        RowData::new("1", "second"),
        RowData::new("2", "third").with_image("https://img.test/2.png"),
    ]
}

fn rig() -> Rig {
    let mut stage = Stage::new();
    let panel = stage.insert("hover-reveal", Rect::new(0.0, 0.0, 220.0, 320.0));
    let mut player = TransitionPlayer::new();
    let mut preview =
        PreviewRevealController::attach(&mut stage, panel, SectionId(1), PreviewConfig::default())
            .unwrap();
    preview.set_rows(
        &mut stage,
        &mut player,
        &rows(),
        Some("https://img.test/default.png"),
        &mut RecordingPrefetcher::default(),
    );
    player.tick(&mut stage, 0.0);
    Rig {
        stage,
        player,
        preview,
        metrics: ViewportMetrics::new(1280.0, 720.0, 3000.0).unwrap(),
    }
}

#[test]
fn attach_hides_panel_and_takes_the_lease() {
    let mut r = rig();
    let panel = r.preview.panel();
    let style = r.stage.style(panel).unwrap();
    assert_eq!(style.opacity, 0.0);
    assert!(!style.visible);
    assert_eq!(r.stage.lease_holder(panel), Some(SectionId(1)));

    let err = PreviewRevealController::attach(&mut r.stage, panel, SectionId(2), PreviewConfig::default())
        .unwrap_err();
    assert!(matches!(err, RevealError::PanelBusy(_)));
}

#[test]
fn visibility_tracks_hover_through_any_sequence() {
    let mut r = rig();
    let mut seen = vec![r.preview.state().active_row.clone()];

    r.preview.hover_enter(&mut r.stage, &mut r.player, "1".into());
    seen.push(r.preview.state().active_row.clone());
    assert!(r.preview.state().panel_visible());

    r.preview.leave_list(&mut r.stage, &mut r.player);
    seen.push(r.preview.state().active_row.clone());
    assert!(!r.preview.state().panel_visible());

    assert_eq!(seen, vec![None, Some(RowKey::from("1")), None]);

    // enter, leave and enter again inside one frame
    r.preview.hover_enter(&mut r.stage, &mut r.player, "0".into());
    r.preview.leave_list(&mut r.stage, &mut r.player);
    r.preview.hover_enter(&mut r.stage, &mut r.player, "2".into());
    assert!(r.preview.state().panel_visible());
    r.player.tick(&mut r.stage, 1000.0);
    let style = r.stage.style(r.preview.panel()).unwrap();
    assert_eq!(style.opacity, 1.0);
    assert!(style.visible);
    assert!(style.background.as_deref().unwrap().contains("/2.png"));
}

#[test]
fn fade_out_hides_the_panel_once_finished() {
    let mut r = rig();
    r.preview.hover_enter(&mut r.stage, &mut r.player, "0".into());
    assert!(r.stage.style(r.preview.panel()).unwrap().visible);
    r.player.tick(&mut r.stage, 500.0);

    r.preview.leave_list(&mut r.stage, &mut r.player);
    r.player.tick(&mut r.stage, 600.0);
    assert!(r.stage.style(r.preview.panel()).unwrap().visible);
    r.player.tick(&mut r.stage, 1000.0);
    let style = r.stage.style(r.preview.panel()).unwrap();
    assert_eq!(style.opacity, 0.0);
    assert!(!style.visible);
}

#[test]
fn rows_without_image_use_the_default() {
    let mut r = rig();
    r.preview.hover_enter(&mut r.stage, &mut r.player, "1".into());
    let bg = r.stage.style(r.preview.panel()).unwrap().background.clone();
    assert!(bg.unwrap().contains("/default.png"));
}

#[test]
fn clamped_target_stays_inside_the_visible_area() {
    let config = PreviewConfig::default();
    for scroll in [0.0, 900.0, 2280.0] {
        let metrics = ViewportMetrics::new(1280.0, 720.0, 3000.0)
            .unwrap()
            .with_scroll(scroll);
        for x in [-5000.0, -1.0, 0.0, 640.0, 1280.0, 1281.0, 9000.0] {
            for y in [-5000.0, 0.0, 400.0, 3000.0, 3001.0, 9000.0] {
                let p = clamp_panel_position(Point::new(x, y), &metrics, &config);
                assert!(p.x >= 0.0 && p.x <= metrics.width - 220.0, "{p:?}");
                assert!(p.y >= 0.0 && p.y <= metrics.visible_bottom() - 320.0, "{p:?}");
            }
        }
    }
}

#[test]
fn pointer_moves_retarget_and_rotate_the_panel() {
    let mut r = rig();
    let mut tracker = PointerTracker::new();
    r.preview.hover_enter(&mut r.stage, &mut r.player, "0".into());

    let sample = PointerSample::new(500.0, 0.0, 0.0);
    let motion = tracker.on_sample(sample);
    r.preview
        .pointer_sample(&mut r.stage, &mut r.player, sample, motion, &r.metrics);
    r.player.tick(&mut r.stage, 2000.0);

    let style = r.stage.style(r.preview.panel()).unwrap();
    assert!((style.x - 390.0).abs() < 1e-9);
    assert_eq!(style.y, 0.0);
    assert!((style.rotation - 500.0).abs() < 1e-9);
}

#[test]
fn pointer_moves_are_ignored_without_an_active_row() {
    let mut r = rig();
    let sample = PointerSample::new(500.0, 300.0, 0.0);
    let motion = PointerTracker::new().on_sample(sample);
    r.preview
        .pointer_sample(&mut r.stage, &mut r.player, sample, motion, &r.metrics);
    assert!(r.player.is_empty());
}

#[test]
fn urls_are_prefetched_once_per_distinct_url() {
    let mut r = rig();
    let mut prefetch = RecordingPrefetcher::default();
    r.preview
        .set_rows(&mut r.stage, &mut r.player, &rows(), Some("https://img.test/default.png"), &mut prefetch);
    assert!(prefetch.requested.is_empty());

    let mut more = rows();
    more.push(RowData::new("3", "fourth").with_image("https://img.test/3.png"));
    r.preview
        .set_rows(&mut r.stage, &mut r.player, &more, None, &mut prefetch);
    assert_eq!(prefetch.requested.len(), 1);
    assert!(prefetch.requested[0].contains("/3.png"));
}

#[test]
fn replacing_rows_clears_a_vanished_active_row() {
    let mut r = rig();
    r.preview.hover_enter(&mut r.stage, &mut r.player, "2".into());
    r.preview.set_rows(
        &mut r.stage,
        &mut r.player,
        &rows()[..1],
        None,
        &mut RecordingPrefetcher::default(),
    );
    assert_eq!(r.preview.state().active_row, None);
    assert!(!r.preview.state().panel_visible());
}

#[test]
fn replacing_rows_refreshes_the_active_row_image() {
    let mut r = rig();
    r.preview.hover_enter(&mut r.stage, &mut r.player, "2".into());
    let before = r.stage.style(r.preview.panel()).unwrap().background.clone();
    assert!(before.unwrap().contains("/2.png"));

    let mut next = rows();
    next[2] = RowData::new("2", "third").with_image("https://img.test/2-new.png");
    r.preview.set_rows(
        &mut r.stage,
        &mut r.player,
        &next,
        None,
        &mut RecordingPrefetcher::default(),
    );

    let background = r.stage.style(r.preview.panel()).unwrap().background.clone();
    let resolved = r.preview.state().images.get(&RowKey::from("2")).map(str::to_owned);
    assert_eq!(background, resolved);
    assert!(background.unwrap().contains("/2-new.png"));
    assert_eq!(r.preview.state().active_row, Some(RowKey::from("2")));
    assert!(r.preview.state().panel_visible());
}

#[test]
fn detach_is_idempotent_and_frees_the_panel() {
    let mut r = rig();
    r.preview.hover_enter(&mut r.stage, &mut r.player, "0".into());
    r.preview.detach(&mut r.stage, &mut r.player);
    r.preview.detach(&mut r.stage, &mut r.player);

    let panel = r.preview.panel();
    assert!(!r.preview.is_attached());
    assert!(r.player.is_empty());
    assert_eq!(r.stage.lease_holder(panel), None);
    assert!(!r.stage.style(panel).unwrap().visible);

    r.preview.hover_enter(&mut r.stage, &mut r.player, "0".into());
    assert_eq!(r.preview.state().active_row, None);
}
