use super::*;

const ALL: [Ease; 11] = [
    Ease::Linear,
    Ease::InQuad,
    Ease::OutQuad,
    Ease::InOutQuad,
    Ease::InCubic,
    Ease::OutCubic,
    Ease::InOutCubic,
    Ease::InQuart,
    Ease::OutQuart,
    Ease::InOutQuart,
    Ease::BackOut(2.0),
];

#[test]
fn endpoints_are_fixed() {
    for ease in ALL {
        assert!(ease.apply(0.0).abs() < 1e-12, "{ease} at 0");
        assert!((ease.apply(1.0) - 1.0).abs() < 1e-12, "{ease} at 1");
    }
}

#[test]
fn input_is_clamped() {
    assert_eq!(Ease::OutQuad.apply(-3.0), 0.0);
    assert_eq!(Ease::OutQuad.apply(4.0), 1.0);
}

#[test]
fn back_out_overshoots_mid_flight() {
    let peak = (1..100)
        .map(|i| Ease::BackOut(2.0).apply(f64::from(i) / 100.0))
        .fold(f64::MIN, f64::max);
    assert!(peak > 1.05, "peak {peak}");
}

#[test]
fn parses_named_eases() {
    assert_eq!("power1.out".parse::<Ease>().unwrap(), Ease::OutQuad);
    assert_eq!("power2.in".parse::<Ease>().unwrap(), Ease::InCubic);
    assert_eq!("power3.out".parse::<Ease>().unwrap(), Ease::OutQuart);
    assert_eq!("power1.inOut".parse::<Ease>().unwrap(), Ease::InOutQuad);
    assert_eq!("back.out(2)".parse::<Ease>().unwrap(), Ease::BackOut(2.0));
    assert_eq!(
        "back.out".parse::<Ease>().unwrap(),
        Ease::BackOut(Ease::DEFAULT_OVERSHOOT)
    );
    assert!("elastic.out".parse::<Ease>().is_err());
    assert!("back.out(x)".parse::<Ease>().is_err());
}

#[test]
fn display_parses_back() {
    for ease in ALL {
        assert_eq!(ease.to_string().parse::<Ease>().unwrap(), ease);
    }
}

#[test]
fn serde_uses_names() {
    let json = serde_json::to_string(&Ease::BackOut(2.0)).unwrap();
    assert_eq!(json, "\"back.out(2)\"");
    let ease: Ease = serde_json::from_str("\"power3.out\"").unwrap();
    assert_eq!(ease, Ease::OutQuart);
}
