use super::*;

#[test]
fn groups_split_transform_and_appearance() {
    let set = PropertySet::new().y(50.0).opacity(0.0);
    let groups: Vec<_> = set.groups().collect();
    assert_eq!(
        groups,
        vec![PropertyGroup::Transform, PropertyGroup::Appearance]
    );
    assert_eq!(
        set.restrict(PropertyGroup::Transform),
        PropertySet::new().y(50.0)
    );
    assert_eq!(
        set.restrict(PropertyGroup::Appearance),
        PropertySet::new().opacity(0.0)
    );
    assert!(PropertySet::new().is_empty());
}

#[test]
fn apply_clamps_opacity_and_keeps_rotation_unbounded() {
    let mut style = Style::default();
    PropertySet::new()
        .opacity(1.4)
        .rotation(725.0)
        .apply(&mut style);
    assert_eq!(style.opacity, 1.0);
    assert_eq!(style.rotation, 725.0);

    PropertySet::new().opacity(-0.2).apply(&mut style);
    assert_eq!(style.opacity, 0.0);
}

#[test]
fn capture_reads_only_requested_fields() {
    let style = Style {
        x: 3.0,
        y: 4.0,
        ..Style::default()
    };
    let captured = PropertySet::new().y(0.0).capture(&style);
    assert_eq!(captured, PropertySet::new().y(4.0));
}

#[test]
fn lerp_interpolates_and_falls_back_to_present_side() {
    let a = PropertySet::new().x(0.0).opacity(0.0);
    let b = PropertySet::new().x(100.0).opacity(1.0).y(5.0);
    let mid = PropertySet::lerp(&a, &b, 0.25);
    assert_eq!(mid.x, Some(25.0));
    assert_eq!(mid.opacity, Some(0.25));
    assert_eq!(mid.y, Some(5.0));
}

#[test]
fn visibility_switches_on_early_and_off_late() {
    assert!(!bool::lerp(&false, &true, 0.0));
    assert!(bool::lerp(&false, &true, 0.01));
    assert!(bool::lerp(&true, &false, 0.99));
    assert!(!bool::lerp(&true, &false, 1.0));
}
