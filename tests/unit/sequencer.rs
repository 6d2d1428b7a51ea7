use super::*;
use crate::{
    diagram::dsl::{DiagramBuilder, NodeBuilder},
    foundation::error::FlowreelError,
    projection::NodeStatus,
    schedule::timer::TimerHandle,
    stage::effect::{Change, Effect},
    stage::table::{Stage, StageTable},
    widget::model::Timing,
};

fn widget(offsets: &[u64], cooldown: u64) -> Widget<&'static str> {
    let diagram = DiagramBuilder::new()
        .node(NodeBuilder::new("a", "A", 20.0, 50.0).narrow(50.0, 20.0).build())
        .node(NodeBuilder::new("b", "B", 80.0, 50.0).build())
        .solid("a", "b")
        .build()
        .unwrap();
    let stages = offsets
        .iter()
        .enumerate()
        .map(|(i, ms)| {
            Stage::at(
                *ms,
                Effect::new().with(Change::Label(format!("stage {i}"))),
            )
        })
        .collect();
    Widget {
        name: "test".to_owned(),
        diagram,
        stages: StageTable::new(stages).unwrap(),
        timing: Timing {
            cooldown_ms: Millis(cooldown),
            ..Timing::default()
        },
    }
}

#[test]
fn nothing_runs_until_visible() {
    let mut seq = Sequencer::simulated(widget(&[0, 100], 500)).unwrap();
    seq.advance_to(Millis(1000)).unwrap();
    assert!(!seq.is_running());
    assert!(seq.state().is_empty());
    assert_eq!(seq.armed_timers(), 0);
}

#[test]
fn visible_widget_applies_stages_in_order() {
    let mut seq = Sequencer::simulated(widget(&[0, 100], 500)).unwrap();
    assert_eq!(
        seq.on_intersection(Intersection::visible()).unwrap(),
        Some(GateTransition::Activated)
    );
    assert_eq!(seq.gate_state(), GateState::Active);
    assert_eq!(seq.armed_timers(), 3);

    assert_eq!(
        seq.step_until(Millis(1000)).unwrap(),
        Some((Millis(0), TimerOutcome::Applied(0)))
    );
    assert_eq!(seq.state().stage_label, "stage 0");
    assert_eq!(
        seq.step_until(Millis(1000)).unwrap(),
        Some((Millis(100), TimerOutcome::Applied(1)))
    );
    assert_eq!(
        seq.step_until(Millis(1000)).unwrap(),
        Some((Millis(600), TimerOutcome::PassRestarted))
    );
    assert_eq!(seq.passes(), 2);
}

#[test]
fn stale_tokens_are_ignored() {
    let mut seq = Sequencer::simulated(widget(&[0, 100], 500)).unwrap();
    seq.start().unwrap();
    let old = TimerToken {
        epoch: seq.epoch(),
        slot: TimerSlot::Stage(1),
    };
    seq.stop();

    assert_eq!(seq.on_timer(old).unwrap(), TimerOutcome::Stale);
    assert!(seq.state().is_empty());
}

#[test]
fn out_of_range_stage_index_is_ignored() {
    let mut seq = Sequencer::simulated(widget(&[0], 500)).unwrap();
    let token = TimerToken {
        epoch: seq.epoch(),
        slot: TimerSlot::Stage(42),
    };
    assert_eq!(seq.on_timer(token).unwrap(), TimerOutcome::Stale);
}

#[test]
fn leaving_the_viewport_stops_and_resets() {
    let mut seq = Sequencer::simulated(widget(&[0, 100], 500)).unwrap();
    seq.on_intersection(Intersection::visible()).unwrap();
    seq.advance_to(Millis(50)).unwrap();
    assert!(!seq.state().is_empty());

    assert_eq!(
        seq.on_intersection(Intersection::hidden()).unwrap(),
        Some(GateTransition::Deactivated)
    );
    assert!(!seq.is_running());
    assert!(seq.state().is_empty());
    assert_eq!(seq.host().pending(), 0);
}

#[test]
fn stop_keeps_state() {
    let mut seq = Sequencer::simulated(widget(&[0, 100], 500)).unwrap();
    seq.start().unwrap();
    seq.advance_to(Millis(50)).unwrap();
    assert!(seq.stop());
    assert!(!seq.stop());
    assert_eq!(seq.state().stage_label, "stage 0");
}

#[test]
fn scheduling_failure_stops_cleanly() {
    let mut seq = Sequencer::new(widget(&[0, 100, 200], 500), TimerQueue::with_capacity_limit(2))
        .unwrap();
    let err = seq.on_intersection(Intersection::visible()).unwrap_err();

    assert!(matches!(err, FlowreelError::Scheduling(_)));
    assert!(!seq.is_running());
    assert_eq!(seq.gate_state(), GateState::Inactive);
    assert_eq!(seq.host().pending(), 0);
    assert!(seq.state().is_empty());
}

/// Queue that accepts a fixed number of `schedule` calls, then refuses.
struct Budgeted {
    queue: TimerQueue,
    left: usize,
}

impl TimerHost for Budgeted {
    fn now(&self) -> Millis {
        self.queue.now()
    }

    fn schedule(&mut self, delay: Millis, token: TimerToken) -> FlowreelResult<TimerHandle> {
        if self.left == 0 {
            return Err(FlowreelError::scheduling("budget spent"));
        }
        self.left -= 1;
        self.queue.schedule(delay, token)
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.queue.cancel(handle);
    }
}

#[test]
fn failed_rearm_closes_the_gate_for_retry() {
    let host = Budgeted {
        queue: TimerQueue::new(),
        left: 2,
    };
    let mut seq = Sequencer::new(widget(&[0], 500), host).unwrap();
    seq.on_intersection(Intersection::visible()).unwrap();
    assert_eq!(seq.armed_timers(), 2);

    let mut result = Ok(TimerOutcome::Stale);
    while let Some((_, token)) = seq.host_mut().queue.pop_due(Millis(1000)) {
        result = seq.on_timer(token);
        if result.is_err() {
            break;
        }
    }
    assert!(matches!(result, Err(FlowreelError::Scheduling(_))));
    assert!(!seq.is_running());
    assert!(seq.state().is_empty());
    assert_eq!(seq.gate_state(), GateState::Inactive);

    seq.host_mut().left = 2;
    assert_eq!(
        seq.on_intersection(Intersection::visible()).unwrap(),
        Some(GateTransition::Activated)
    );
    assert!(seq.is_running());
    assert_eq!(seq.passes(), 2);
}

#[test]
fn single_pass_holds_with_nothing_armed() {
    let mut w = widget(&[0, 100], 500);
    w.timing.repeat = false;
    let mut seq = Sequencer::simulated(w).unwrap();
    seq.on_intersection(Intersection::visible()).unwrap();
    assert_eq!(seq.armed_timers(), 2);

    seq.advance_to(Millis(5000)).unwrap();
    assert_eq!(seq.state().stage_label, "stage 1");
    assert!(seq.is_running());
    assert_eq!(seq.armed_timers(), seq.host().pending());
    assert_eq!(seq.armed_timers(), 0);
}

#[test]
fn viewport_class_changes_positions_only() {
    let mut seq = Sequencer::simulated(widget(&[0], 500)).unwrap();
    seq.start().unwrap();
    seq.advance_to(Millis(0)).unwrap();
    let before = seq.state().clone();

    seq.on_viewport(ViewportClass::Narrow);
    assert_eq!(seq.viewport(), ViewportClass::Narrow);
    assert_eq!(seq.state(), &before);

    let p = seq.projection();
    let a = seq.widget().diagram.node(&"a").unwrap();
    assert_eq!(p.resolved_position(a), crate::foundation::core::Point::new(50.0, 20.0));
    assert_eq!(p.node_status(&"a"), NodeStatus::Idle);
}

#[test]
fn unknown_references_are_reported_not_fatal() {
    let mut w = widget(&[0], 500);
    w.stages = StageTable::new(vec![Stage::at(
        0,
        Effect::new().with(Change::ActivateNode("missing")),
    )])
    .unwrap();
    let mut seq = Sequencer::simulated(w).unwrap();
    assert_eq!(seq.config_report().issues.len(), 1);

    seq.start().unwrap();
    seq.advance_to(Millis(0)).unwrap();
    assert_eq!(seq.state().active_node, Some("missing"));
    assert!(seq.projection().frame().nodes.iter().all(|n| n.status == NodeStatus::Idle));
}

#[test]
fn unmount_closes_everything() {
    let mut seq = Sequencer::simulated(widget(&[0, 100], 500)).unwrap();
    seq.on_intersection(Intersection::visible()).unwrap();
    seq.advance_by(Millis(150)).unwrap();
    assert_eq!(seq.now(), Millis(150));

    seq.unmount();
    assert!(!seq.is_running());
    assert!(seq.state().is_empty());
    assert_eq!(seq.gate_state(), GateState::Inactive);
    assert_eq!(seq.host().pending(), 0);
}
