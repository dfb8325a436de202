use super::*;

const ALL: [Ease; 4] = [Ease::Linear, Ease::EaseIn, Ease::EaseOut, Ease::EaseInOut];

#[test]
fn endpoints_are_stable() {
    for ease in ALL {
        assert_eq!(ease.apply(0.0), 0.0);
        assert_eq!(ease.apply(1.0), 1.0);
    }
}

#[test]
fn monotonic_spot_check() {
    for ease in ALL {
        let a = ease.apply(0.25);
        let b = ease.apply(0.5);
        let c = ease.apply(0.75);
        assert!(a < b);
        assert!(b < c);
    }
}

#[test]
fn quadratic_midpoints() {
    assert_eq!(Ease::EaseOut.apply(0.5), 0.75);
    assert_eq!(Ease::EaseIn.apply(0.5), 0.25);
    assert_eq!(Ease::EaseInOut.apply(0.25), 0.125);
    assert_eq!(Ease::EaseInOut.apply(0.75), 0.875);
}

#[test]
fn unknown_names_fall_back_to_linear() {
    let ease: Ease = serde_json::from_str("\"bounce\"").unwrap();
    assert_eq!(ease, Ease::Unrecognized);
    assert_eq!(ease.apply(0.3), 0.3);

    let ease: Ease = serde_json::from_str("\"easeInOut\"").unwrap();
    assert_eq!(ease, Ease::EaseInOut);
}

#[test]
fn input_is_clamped() {
    assert_eq!(Ease::EaseIn.apply(-1.0), 0.0);
    assert_eq!(Ease::EaseOut.apply(2.0), 1.0);
}
