use super::*;

#[test]
fn threshold_must_be_a_fraction() {
    assert!(VisibilityGate::new(0.2).is_ok());
    assert!(VisibilityGate::new(1.0).is_ok());
    for bad in [0.0, -0.1, 1.5, f64::NAN] {
        let err = VisibilityGate::new(bad).unwrap_err();
        assert!(matches!(err, FlowreelError::Validation(_)), "{bad}");
    }
}

#[test]
fn activates_at_threshold_not_below() {
    let mut g = VisibilityGate::new(0.2).unwrap();
    assert_eq!(g.observe(Intersection::partial(0.19)), None);
    assert_eq!(g.state(), GateState::Inactive);
    assert_eq!(
        g.observe(Intersection::partial(0.2)),
        Some(GateTransition::Activated)
    );
    assert!(g.is_active());
}

#[test]
fn duplicate_notifications_are_ignored() {
    let mut g = VisibilityGate::default();
    assert_eq!(g.threshold(), VisibilityGate::DEFAULT_THRESHOLD);
    assert_eq!(
        g.observe(Intersection::visible()),
        Some(GateTransition::Activated)
    );
    assert_eq!(g.observe(Intersection::visible()), None);
    assert_eq!(g.observe(Intersection::partial(0.5)), None);
    assert_eq!(g.observe(Intersection::hidden()), Some(GateTransition::Deactivated));
    assert_eq!(g.observe(Intersection::hidden()), None);
}

#[test]
fn dropping_below_threshold_while_on_screen_keeps_running() {
    let mut g = VisibilityGate::new(0.5).unwrap();
    g.observe(Intersection::visible());
    assert_eq!(g.observe(Intersection::partial(0.05)), None);
    assert!(g.is_active());
}

#[test]
fn close_forces_inactive() {
    let mut g = VisibilityGate::default();
    g.observe(Intersection::visible());
    g.close();
    assert_eq!(g.state(), GateState::Inactive);
    assert_eq!(
        g.observe(Intersection::visible()),
        Some(GateTransition::Activated)
    );
}
