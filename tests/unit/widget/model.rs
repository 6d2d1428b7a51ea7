use super::*;
use crate::stage::effect::Change;

const TWO_STEP: &str = r#"{
  "name": "two-step",
  "diagram": {
    "nodes": [
      { "id": "a", "label": "A", "position": { "wide": { "x": 20.0, "y": 50.0 } } },
      { "id": "b", "label": "B", "kind": "service",
        "position": { "wide": { "x": 80.0, "y": 50.0 }, "narrow": { "x": 50.0, "y": 80.0 } } }
    ],
    "edges": [ { "from": "a", "to": "b", "style": "dashed" } ]
  },
  "stages": [
    { "offset": 0, "effect": [ { "activate_node": "a" }, { "label": "Start" } ] },
    { "offset": 500, "effect": [ { "complete_nodes": ["a"] }, "clear_active_node" ] }
  ]
}"#;

#[test]
fn json_widget_gets_default_timing() {
    let w = Widget::from_json(TWO_STEP).unwrap();
    assert_eq!(w.name, "two-step");
    assert_eq!(w.timing, Timing::default());
    assert_eq!(w.timing.threshold, 0.2);
    assert_eq!(w.timing.cooldown_ms, Millis(1000));
    assert_eq!(w.stages.len(), 2);
    assert_eq!(
        w.stages.get(1).unwrap().effect.changes()[1],
        Change::ClearActiveNode
    );
    assert_eq!(w.timing.loop_timing().cycle_length(&w.stages), Millis(1500));
}

#[test]
fn widget_json_round_trips_through_serde() {
    let w = Widget::from_json(TWO_STEP).unwrap();
    let text = serde_json::to_string(&w).unwrap();
    assert_eq!(Widget::from_json(&text).unwrap(), w);
}

#[test]
fn malformed_json_is_a_serde_error() {
    let err = Widget::from_json("{ not json").unwrap_err();
    assert!(matches!(err, FlowreelError::Serde(_)));
}

#[test]
fn missing_file_is_a_config_error() {
    let err = Widget::from_path("does/not/exist.json").unwrap_err();
    assert!(matches!(err, FlowreelError::Config(_)));
}

#[test]
fn stagger_generates_reveal_stages() {
    let json = r#"{
      "name": "reveal",
      "diagram": { "nodes": [
        { "id": "x", "label": "X", "position": { "wide": { "x": 0.0, "y": 0.0 } } },
        { "id": "y", "label": "Y", "position": { "wide": { "x": 0.0, "y": 0.0 } } }
      ], "edges": [] },
      "timing": { "threshold": 0.1, "repeat": false, "stagger_ms": 150 }
    }"#;
    let w = Widget::from_json(json).unwrap();
    let offsets: Vec<_> = w.stages.stages().map(|s| s.offset.get()).collect();
    assert_eq!(offsets, [0, 150]);
}

#[test]
fn stagger_conflicts_with_explicit_stages() {
    let mut w = Widget::from_json(TWO_STEP).unwrap();
    w.timing.stagger_ms = Some(Millis(100));
    let err = w.prepare().unwrap_err();
    assert!(err.to_string().contains("stagger_ms"));
}

#[test]
fn cycle_shorter_than_pass_is_rejected() {
    let mut w = Widget::from_json(TWO_STEP).unwrap();
    w.timing.cycle_ms = Some(Millis(400));
    let err = w.prepare().unwrap_err();
    assert!(matches!(err, FlowreelError::Validation(_)));
    assert!(err.to_string().contains("shorter than the pass"));
}

#[test]
fn zero_cycle_is_rejected_only_when_repeating() {
    let mut w = Widget::from_json(TWO_STEP).unwrap();
    w.stages = StageTable::default();
    w.timing.cooldown_ms = Millis::ZERO;
    assert!(w.clone().prepare().is_err());

    w.timing.repeat = false;
    assert!(w.prepare().is_ok());
}

#[test]
fn bad_threshold_is_rejected() {
    let mut w = Widget::from_json(TWO_STEP).unwrap();
    w.timing.threshold = 0.0;
    assert!(matches!(
        w.prepare().unwrap_err(),
        FlowreelError::Validation(_)
    ));
}

#[test]
fn decreasing_offsets_in_json_are_rejected() {
    let json = TWO_STEP.replace("\"offset\": 500", "\"offset\": 0").replace(
        "{ \"offset\": 0, \"effect\": [ { \"activate_node\"",
        "{ \"offset\": 900, \"effect\": [ { \"activate_node\"",
    );
    let err = Widget::from_json(&json).unwrap_err();
    assert!(err.to_string().contains("fires before"));
}
