use super::*;

#[test]
fn every_preset_validates() {
    for kind in SectionKind::ALL {
        let animations = kind.animations(&MarqueeConfig::default()).unwrap();
        assert!(animations.validate().is_ok(), "{kind}");
        assert!(animations.listeners.contains(&ListenerKind::Scroll));
    }
}

#[test]
fn content_index_rows_replay_and_listen_to_the_pointer() {
    let a = SectionKind::ContentIndex
        .animations(&MarqueeConfig::default())
        .unwrap();
    let RowAnimation::Entrance(rows) = &a.rows else {
        panic!("content index rows use entrances");
    };
    assert_eq!(rows.mode, TriggerMode::Toggle(ToggleActions::REPLAY));
    assert_eq!(rows.transition.ease, Ease::OutQuad);
    assert_eq!(rows.transition.from.y, Some(50.0));
    assert_eq!(rows.window.start.to_string(), "top 90%");
    assert!(a.heading.is_none() && a.rule.is_none());
    assert!(a.listeners.contains(&ListenerKind::PointerMove));
}

#[test]
fn toggle_variants_differ_per_section() {
    let actions = |kind: SectionKind| match kind.animations(&MarqueeConfig::default()).unwrap().rows {
        RowAnimation::Entrance(spec) => Some(spec.mode),
        RowAnimation::Marquee(_) => None,
    };
    assert_eq!(
        actions(SectionKind::Education),
        Some(TriggerMode::Toggle(ToggleActions::PLAY_THEN_REVERSE))
    );
    assert_eq!(
        actions(SectionKind::WorkExperience),
        Some(TriggerMode::Toggle(ToggleActions::REPLAY))
    );
    assert_eq!(actions(SectionKind::TechList), None);
}

#[test]
fn headings_and_rules_are_scrubbed() {
    let a = SectionKind::Education
        .animations(&MarqueeConfig::default())
        .unwrap();
    let heading = a.heading.unwrap();
    assert_eq!(heading.transition.ease, Ease::InCubic);
    assert!(matches!(heading.mode, TriggerMode::Scrub { .. }));
    let rule = a.rule.unwrap();
    assert_eq!(rule.transition.from.x, Some(400.0));
    assert_eq!(rule.transition.duration_ms, 3000.0);
}

#[test]
fn kinds_round_trip_through_their_names() {
    for kind in SectionKind::ALL {
        assert_eq!(kind.to_string().parse::<SectionKind>().unwrap(), kind);
    }
    assert!("footer".parse::<SectionKind>().is_err());
}
