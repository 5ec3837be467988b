use super::*;

fn rect(y: f64) -> Rect {
    Rect::new(0.0, y, 100.0, y + 50.0)
}

#[test]
fn stale_handles_miss_after_slot_reuse() {
    let mut stage = Stage::new();
    let a = stage.insert("a", rect(0.0));
    assert!(stage.remove(a).is_some());
    let b = stage.insert("b", rect(10.0));

    assert!(!stage.contains(a));
    assert!(stage.style_mut(a).is_none());
    assert_eq!(stage.get(b).unwrap().label, "b");
    assert!(stage.remove(a).is_none());
    assert_eq!(stage.len(), 1);
}

#[test]
fn default_style_is_visible_and_opaque() {
    let mut stage = Stage::new();
    let a = stage.insert("a", rect(0.0));
    let style = stage.style(a).unwrap();
    assert_eq!(style.opacity, 1.0);
    assert!(style.visible);
    assert!(style.background.is_none());
}

#[test]
fn lease_is_exclusive_until_released() {
    let mut stage = Stage::new();
    let panel = stage.insert("panel", rect(0.0));

    stage.lease(panel, SectionId(1)).unwrap();
    stage.lease(panel, SectionId(1)).unwrap();
    assert!(matches!(
        stage.lease(panel, SectionId(2)),
        Err(RevealError::PanelBusy(_))
    ));

    assert!(!stage.release(panel, SectionId(2)));
    assert!(stage.release(panel, SectionId(1)));
    stage.lease(panel, SectionId(2)).unwrap();
    assert_eq!(stage.lease_holder(panel), Some(SectionId(2)));
}

#[test]
fn removing_a_node_drops_its_lease() {
    let mut stage = Stage::new();
    let panel = stage.insert("panel", rect(0.0));
    stage.lease(panel, SectionId(1)).unwrap();
    stage.remove(panel);
    assert_eq!(stage.lease_holder(panel), None);
    assert!(matches!(
        stage.lease(panel, SectionId(1)),
        Err(RevealError::Detached(_))
    ));
}

#[test]
fn iter_skips_vacant_slots() {
    let mut stage = Stage::new();
    let a = stage.insert("a", rect(0.0));
    let _b = stage.insert("b", rect(60.0));
    stage.remove(a);
    let labels: Vec<_> = stage.iter().map(|(_, n)| n.label.as_str()).collect();
    assert_eq!(labels, vec!["b"]);
}
