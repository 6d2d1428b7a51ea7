use super::*;
use crate::{
    diagram::dsl::{DiagramBuilder, NodeBuilder},
    stage::effect::{Change, Effect, edges},
};

fn diagram() -> Diagram<&'static str> {
    DiagramBuilder::new()
        .node(NodeBuilder::new("a", "A", 10.0, 50.0).narrow(50.0, 10.0).build())
        .node(NodeBuilder::new("b", "B", 50.0, 50.0).build())
        .node(NodeBuilder::new("c", "C", 90.0, 50.0).build())
        .solid("a", "b")
        .solid("b", "c")
        .dashed("c", "ghost")
        .build()
        .unwrap()
}

fn state(changes: Vec<Change<&'static str>>) -> AnimationState<&'static str> {
    let mut s = AnimationState::default();
    s.apply(&Effect(changes));
    s
}

#[test]
fn completed_wins_over_active_and_processing() {
    let d = diagram();
    let s = state(vec![
        Change::CompleteNodes(vec!["a"]),
        Change::ActivateNode("a"),
        Change::SetProcessing(vec!["a", "b", "c"]),
    ]);
    let p = Projection::new(&d, &s, ViewportClass::Wide);

    assert_eq!(p.node_status(&"a"), NodeStatus::Completed);
    assert_eq!(p.node_status(&"b"), NodeStatus::Processing);
    assert_eq!(p.node_status(&"zzz"), NodeStatus::Idle);
}

#[test]
fn active_wins_over_processing() {
    let d = diagram();
    let s = state(vec![Change::SetProcessing(vec!["b"]), Change::ActivateNode("b")]);
    let p = Projection::new(&d, &s, ViewportClass::Wide);
    assert_eq!(p.node_status(&"b"), NodeStatus::Active);
}

#[test]
fn edge_status_precedence() {
    let d = diagram();
    let s = state(vec![
        Change::ActivateEdges(edges(&[("a", "b"), ("b", "c")])),
        Change::CompleteEdges(edges(&[("a", "b")])),
    ]);
    let p = Projection::new(&d, &s, ViewportClass::Wide);

    assert_eq!(p.edge_status(&"a", &"b"), EdgeStatus::Completed);
    assert_eq!(p.edge_status(&"b", &"c"), EdgeStatus::Active);
    assert_eq!(p.edge_status(&"c", &"b"), EdgeStatus::Idle);
}

#[test]
fn positions_follow_viewport_class() {
    let d = diagram();
    let s = AnimationState::default();
    let a = d.node(&"a").unwrap();

    let wide = Projection::new(&d, &s, ViewportClass::Wide);
    let narrow = Projection::new(&d, &s, ViewportClass::Narrow);
    assert_eq!(wide.resolved_position(a), Point::new(10.0, 50.0));
    assert_eq!(narrow.resolved_position(a), Point::new(50.0, 10.0));
    assert_eq!(narrow.viewport(), ViewportClass::Narrow);
}

#[test]
fn dangling_edges_are_not_drawn() {
    let d = diagram();
    let s = AnimationState::default();
    let p = Projection::new(&d, &s, ViewportClass::Wide);

    let drawn: Vec<_> = p.edges().map(|e| e.edge.key().to_string()).collect();
    assert_eq!(drawn, ["a-b", "b-c"]);
    assert_eq!(p.nodes().count(), 3);
}

#[test]
fn frame_is_a_pure_snapshot() {
    let d = diagram();
    let s = state(vec![
        Change::ActivateNode("b"),
        Change::Label("working".into()),
    ]);
    let p = Projection::new(&d, &s, ViewportClass::Wide);

    let f1 = p.frame();
    let f2 = p.frame();
    assert_eq!(f1, f2);
    assert_eq!(f1.label, "working");
    assert_eq!(p.stage_label(), "working");
    assert_eq!(f1.node(&"b"), Some(NodeStatus::Active));
    assert_eq!(f1.node(&"ghost"), None);
    assert!(!f1.is_idle());

    let empty = AnimationState::default();
    assert!(Projection::new(&d, &empty, ViewportClass::Wide).frame().is_idle());
}
