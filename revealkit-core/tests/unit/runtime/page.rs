use super::*;
use crate::{
    animation::props::PropertyGroup, sections::links::RecordingOpener,
    trigger::registry::ElementState,
};

fn page() -> Page {
    Page::new(RevealConfig::default()).unwrap()
}

fn posts(n: usize) -> Vec<RowData> {
    (0..n)
        .map(|i| RowData::new(format!("post-{i}"), format!("Post {i}")))
        .collect()
}

fn state_of(page: &Page, key: &str) -> ElementState {
    let suffix = format!("/{key}");
    page.registry()
        .iter()
        .find(|t| t.key.ends_with(&suffix))
        .map(|t| t.state)
        .unwrap()
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

// Rows of a content index sit at y = 152 + 140 * i in a 1280x720 viewport; their window is
// "top 90%" to "top 75%", i.e. [y - 648, y - 540).

#[test]
fn mount_acquires_listeners_and_one_trigger_per_row() {
    let mut p = page();
    let id = p
        .mount(SectionSpec::new(SectionKind::ContentIndex, posts(10)))
        .unwrap();

    assert_eq!(p.registry().len(), 10);
    assert_eq!(p.listeners().owned_by(id), 3);
    assert_eq!(p.listeners().owners(ListenerKind::PointerMove), vec![id]);
    // container + heading + 10 rows + panel
    assert_eq!(p.stage().len(), 13);
    assert!(approx(p.metrics().document_height, 1592.0));
}

#[test]
fn first_frame_enters_rows_already_in_view() {
    let mut p = page();
    p.mount(SectionSpec::new(SectionKind::ContentIndex, posts(10)))
        .unwrap();

    let report = p.frame(0.0);
    // rows 0..=2 are past their window (enter + leave), row 3 is inside it
    assert_eq!(report.trigger_events, 7);
    assert_eq!(state_of(&p, "post-0"), ElementState::Visible);
    assert_eq!(state_of(&p, "post-3"), ElementState::Entering);
    assert_eq!(state_of(&p, "post-4"), ElementState::Hidden);

    p.frame(1100.0);
    let row = p.section_layout(SectionId(1)).unwrap().rows[0].1;
    let style = p.stage().style(row).unwrap();
    assert!(approx(style.opacity, 1.0));
    assert!(approx(style.y, 0.0));
}

#[test]
fn scroll_events_coalesce_into_one_evaluation() {
    let mut p = page();
    p.mount(SectionSpec::new(SectionKind::ContentIndex, posts(10)))
        .unwrap();
    p.frame(0.0);

    p.scroll_to(100.0);
    p.scroll_to(300.0);
    p.scroll_to(400.0);
    let report = p.frame(16.0);

    assert_eq!(report.coalesced, 3);
    assert!(approx(p.metrics().scroll_y, 400.0));
    assert_eq!(state_of(&p, "post-5"), ElementState::Visible);
    assert_eq!(state_of(&p, "post-6"), ElementState::Entering);
    assert_eq!(state_of(&p, "post-7"), ElementState::Hidden);
}

#[test]
fn scrolling_back_up_reverses_rows() {
    let mut p = page();
    p.mount(SectionSpec::new(SectionKind::ContentIndex, posts(10)))
        .unwrap();
    p.frame(0.0);
    p.scroll_to(400.0);
    p.frame(16.0);
    p.frame(2000.0);

    p.scroll_to(0.0);
    p.frame(2016.0);
    assert_eq!(state_of(&p, "post-6"), ElementState::Leaving);

    p.frame(4000.0);
    p.frame(4016.0);
    assert_eq!(state_of(&p, "post-6"), ElementState::Hidden);
    let row = p.section_layout(SectionId(1)).unwrap().rows[6].1;
    assert!(approx(p.stage().style(row).unwrap().opacity, 0.0));
}

#[test]
fn same_keys_keep_the_session() {
    let mut p = page();
    let id = p
        .mount(SectionSpec::new(SectionKind::ContentIndex, posts(4)))
        .unwrap();
    let before = p.snapshot().sections[0].session;

    let retitled: Vec<RowData> = posts(4)
        .into_iter()
        .map(|mut r| {
            r.title.push_str(" (edited)");
            r
        })
        .collect();
    assert!(!p.set_rows(id, retitled).unwrap());
    assert_eq!(p.snapshot().sections[0].session, before);
}

#[test]
fn changed_keys_rebuild_the_session() {
    let mut p = page();
    let id = p
        .mount(SectionSpec::new(SectionKind::ContentIndex, posts(10)))
        .unwrap();
    p.frame(0.0);
    let before = p.snapshot().sections[0].session;

    assert!(p.set_rows(id, posts(4)).unwrap());
    let snap = p.snapshot();
    assert_ne!(snap.sections[0].session, before);
    assert_eq!(snap.registrations, 4);
    assert_eq!(snap.listeners, 3);
    assert_eq!(p.stage().len(), 7);
    assert!(approx(p.metrics().document_height, 752.0));
}

#[test]
fn unmount_releases_everything() {
    let mut p = page();
    let id = p
        .mount(SectionSpec::new(SectionKind::ContentIndex, posts(6)))
        .unwrap();
    p.frame(0.0);
    p.hover_row(id, &RowKey::from("post-1"));
    p.frame(100.0);

    assert!(p.unmount(id));
    assert!(p.registry().is_empty());
    assert!(p.listeners().is_empty());
    assert!(p.stage().is_empty());
    assert!(p.player().is_empty());
    assert!(!p.unmount(id));
}

#[test]
fn duplicate_row_keys_are_rejected_without_leaking() {
    let mut p = page();
    let rows = vec![RowData::new("a", "A"), RowData::new("a", "again")];
    let err = p
        .mount(SectionSpec::new(SectionKind::Education, rows))
        .unwrap_err();
    assert!(matches!(err, RevealError::Validation(_)));
    assert!(p.stage().is_empty());
    assert!(p.section_ids().is_empty());
}

#[test]
fn hover_toggles_the_preview_panel() {
    let mut p = page();
    let id = p
        .mount(SectionSpec::new(SectionKind::ContentIndex, posts(3)))
        .unwrap();
    let edu = p
        .mount(SectionSpec::new(SectionKind::Education, posts(3)))
        .unwrap();

    assert!(p.hover_row(id, &RowKey::from("post-1")));
    assert!(!p.hover_row(id, &RowKey::from("missing")));
    assert!(!p.hover_row(edu, &RowKey::from("post-1")));

    let state = p.preview(id).unwrap();
    assert_eq!(state.active_row, Some(RowKey::from("post-1")));
    assert!(state.panel_visible());

    assert!(p.leave_list(id));
    assert!(!p.preview(id).unwrap().panel_visible());
    assert!(p.preview(edu).is_none());
}

#[test]
fn pointer_moves_are_routed_to_the_preview() {
    let mut p = page();
    let id = p
        .mount(SectionSpec::new(SectionKind::ContentIndex, posts(3)))
        .unwrap();
    let panel = p.preview_panel(id).unwrap();
    p.frame(0.0);

    p.pointer_move(500.0, 400.0, 0.0);
    p.frame(16.0);
    assert!(p.player().handle_for(panel, PropertyGroup::Transform).is_none());

    p.hover_row(id, &RowKey::from("post-0"));
    p.pointer_move(500.0, 400.0, 20.0);
    p.frame(32.0);
    assert!(p.player().handle_for(panel, PropertyGroup::Transform).is_some());

    p.frame(1400.0);
    let style = p.stage().style(panel).unwrap();
    assert!(approx(style.x, 390.0));
    assert!(approx(style.y, 240.0));
    assert!(approx(style.opacity, 1.0));
    assert!(style.visible);
}

#[test]
fn activation_opens_links_in_a_new_context() {
    let mut p = page();
    let rows = vec![
        RowData::new("a", "A").with_link("https://example.com/a"),
        RowData::new("b", "B"),
    ];
    let id = p
        .mount(SectionSpec::new(SectionKind::ContentIndex, rows.clone()))
        .unwrap();
    let edu = p
        .mount(SectionSpec::new(SectionKind::Education, rows))
        .unwrap();

    let mut opener = RecordingOpener::default();
    assert!(p.activate_row(id, &RowKey::from("a"), &mut opener));
    assert!(!p.activate_row(id, &RowKey::from("b"), &mut opener));
    assert!(!p.activate_row(edu, &RowKey::from("a"), &mut opener));
    assert_eq!(
        opener.opened,
        vec![("https://example.com/a".to_owned(), LinkTarget::NewContext)]
    );
}

#[test]
fn marquee_container_is_pinned_while_scrolling_through() {
    let mut p = page();
    p.mount(SectionSpec::new(SectionKind::ContentIndex, posts(10)))
        .unwrap();
    let tech = p
        .mount(SectionSpec::new(SectionKind::TechList, posts(3)))
        .unwrap();
    // tech list spans 1592..2144, its window runs from 872 to 2144
    assert!(approx(p.metrics().document_height, 2144.0));
    p.frame(0.0);

    p.scroll_to(1000.0);
    p.frame(16.0);
    let container = p.section_layout(tech).unwrap().container.unwrap();
    assert!(approx(p.stage().style(container).unwrap().pin_y, 128.0));

    p.scroll_to(0.0);
    p.frame(32.0);
    assert!(approx(p.stage().style(container).unwrap().pin_y, 0.0));
}

#[test]
fn resize_relayouts_on_width_change() {
    let mut p = page();
    let id = p
        .mount(SectionSpec::new(SectionKind::ExtraTechList, posts(8)))
        .unwrap();
    p.resize(800.0, 600.0);
    p.frame(0.0);

    assert!(approx(p.metrics().width, 800.0));
    let container = p.section_layout(id).unwrap().container.unwrap();
    assert!(approx(p.stage().get(container).unwrap().layout.width(), 800.0));
}

#[test]
fn invalid_resize_is_ignored() {
    let mut p = page();
    p.resize(0.0, 600.0);
    p.frame(0.0);
    assert!(approx(p.metrics().width, 1280.0));
}

#[test]
fn preview_images_resolve_on_mount() {
    let mut p = page();
    let rows = vec![
        RowData::new("a", "A").with_image("https://img.example.com/a.jpg"),
        RowData::new("b", "B"),
    ];
    let spec =
        SectionSpec::new(SectionKind::ContentIndex, rows).with_default_image("https://img.example.com/d.jpg");
    let id = p.mount(spec).unwrap();
    assert_eq!(p.preview(id).unwrap().images.len(), 2);
    assert!(
        p.preview(id)
            .unwrap()
            .images
            .get(&RowKey::from("a"))
            .unwrap()
            .starts_with("https://img.example.com/a.jpg?")
    );
}

#[test]
fn snapshot_serializes() {
    let mut p = page();
    p.mount(SectionSpec::new(SectionKind::WorkExperience, posts(2)))
        .unwrap();
    p.frame(0.0);
    let json = serde_json::to_value(p.snapshot()).unwrap();
    assert_eq!(json["frame"], 1);
    assert_eq!(json["sections"][0]["kind"], "work_experience");
    assert_eq!(json["sections"][0]["triggers"], 4);
}
