use super::*;
use crate::{
    diagram::dsl::{DiagramBuilder, NodeBuilder},
    stage::effect::{Change, edges},
};

fn label(text: &str) -> Effect<&'static str> {
    Effect::new().with(Change::Label(text.to_owned()))
}

#[test]
fn new_rejects_decreasing_offsets() {
    let err = StageTable::new(vec![Stage::at(500, label("b")), Stage::at(100, label("a"))])
        .unwrap_err();
    assert!(matches!(err, FlowreelError::Validation(_)));
    assert!(err.to_string().contains("fires before"));
}

#[test]
fn ties_keep_declaration_order() {
    let t = StageTable::new(vec![
        Stage::at(0, label("first")),
        Stage::at(100, label("second")),
        Stage::at(100, label("third")),
    ])
    .unwrap();

    let labels: Vec<_> = t
        .stages()
        .map(|s| match &s.effect.changes()[0] {
            Change::Label(text) => text.clone(),
            other => panic!("unexpected change {other:?}"),
        })
        .collect();
    assert_eq!(labels, ["first", "second", "third"]);
}

#[test]
fn stages_iterator_restarts() {
    let t = StageTable::new(vec![Stage::at(0, label("a")), Stage::at(10, label("b"))]).unwrap();
    assert_eq!(t.stages().count(), 2);
    assert_eq!(t.stages().count(), 2);
    assert_eq!(t.stages().next().unwrap().offset, Millis(0));
}

#[test]
fn duration_is_last_offset() {
    let t = StageTable::new(vec![Stage::at(200, label("a")), Stage::at(8000, label("b"))])
        .unwrap();
    assert_eq!(t.duration(), Millis(8000));
    assert_eq!(StageTable::<&str>::default().duration(), Millis::ZERO);
}

#[test]
fn check_references_reports_unknown_ids_and_edges() {
    let diagram = DiagramBuilder::new()
        .node(NodeBuilder::new("a", "A", 0.0, 0.0).build())
        .node(NodeBuilder::new("b", "B", 0.0, 0.0).build())
        .solid("a", "b")
        .solid("b", "nowhere")
        .build()
        .unwrap();

    let t = StageTable::new(vec![
        Stage::at(0, Effect::new().with(Change::ActivateNode("a"))),
        Stage::at(
            10,
            Effect::new()
                .with(Change::CompleteNodes(vec!["a", "zzz"]))
                .with(Change::ActivateEdges(edges(&[("a", "b"), ("b", "a")]))),
        ),
    ])
    .unwrap();

    let report = t.check_references(&diagram);
    assert!(!report.is_clean());
    assert_eq!(
        report.issues,
        vec![
            ConfigIssue::DanglingEdge(EdgeKey::new("b", "nowhere")),
            ConfigIssue::UnknownNode { stage: 1, id: "zzz" },
            ConfigIssue::UnknownEdge {
                stage: 1,
                key: EdgeKey::new("b", "a"),
            },
        ]
    );
    assert_eq!(
        report.issues[1].to_string(),
        "stage 1 references unknown node 'zzz'"
    );
}

#[test]
fn deserialized_tables_are_checked_by_check_order() {
    let t: StageTable<String> = serde_json::from_str(
        r#"[{"offset": 300, "effect": []}, {"offset": 100, "effect": []}]"#,
    )
    .unwrap();
    assert_eq!(t.len(), 2);
    assert!(t.check_order().is_err());
}
