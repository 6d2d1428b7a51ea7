use crate::{
    diagram::model::NodeKey,
    foundation::core::{Millis, ViewportClass},
    foundation::error::FlowreelResult,
    gate::{GateTransition, Intersection},
    projection::{Frame, Projection},
    schedule::timer::TimerQueue,
    sequencer::{Sequencer, TimerOutcome},
    widget::model::Widget,
};

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// Host signal replayed by a [`VisibilityScript`].
pub enum ScriptAction {
    /// Viewport-intersection notification.
    Intersect(Intersection),
    /// Viewport-class change.
    Viewport(ViewportClass),
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// A host signal at a point in time.
pub struct ScriptEvent {
    /// Host time of the signal.
    pub at: Millis,
    /// The signal.
    pub action: ScriptAction,
}

/// Time-ordered host signals for a simulated run.
///
/// Events sharing a timestamp keep insertion order. Timers due at the same instant as an
/// event fire before it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VisibilityScript {
    events: Vec<ScriptEvent>,
}

impl VisibilityScript {
    /// Empty script: the widget never becomes visible.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fully visible from time zero.
    pub fn always_visible() -> Self {
        Self::new().show(Millis::ZERO)
    }

    /// Fully visible at `at`.
    pub fn show(self, at: Millis) -> Self {
        self.intersect(at, Intersection::visible())
    }

    /// Fully hidden at `at`.
    pub fn hide(self, at: Millis) -> Self {
        self.intersect(at, Intersection::hidden())
    }

    /// Arbitrary intersection notification at `at`.
    pub fn intersect(self, at: Millis, entry: Intersection) -> Self {
        self.push(ScriptEvent {
            at,
            action: ScriptAction::Intersect(entry),
        })
    }

    /// Viewport class change at `at`.
    pub fn viewport(self, at: Millis, viewport: ViewportClass) -> Self {
        self.push(ScriptEvent {
            at,
            action: ScriptAction::Viewport(viewport),
        })
    }

    /// Insert an event, keeping the script time-ordered.
    pub fn push(mut self, event: ScriptEvent) -> Self {
        let idx = self.events.partition_point(|e| e.at <= event.at);
        self.events.insert(idx, event);
        self
    }

    /// Events in replay order.
    pub fn events(&self) -> &[ScriptEvent] {
        &self.events
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
/// What produced a [`TraceEntry`].
pub enum TraceEvent {
    /// A timer fired and changed state.
    Timer(TimerOutcome),
    /// The visibility gate changed membership.
    Gate(GateTransition),
    /// The viewport class changed.
    Viewport(ViewportClass),
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// Projection captured right after an event.
pub struct TraceEntry<I> {
    /// Host time of the event.
    pub at: Millis,
    /// The event.
    pub event: TraceEvent,
    /// Projection after the event.
    pub frame: Frame<I>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// Recorded run of a widget.
pub struct Trace<I> {
    /// Widget name.
    pub widget: String,
    /// Host time the run ended at.
    pub until: Millis,
    /// Entries in event order.
    pub entries: Vec<TraceEntry<I>>,
}

impl<I> Trace<I> {
    /// Frame visible at time `at`: the one captured by the last event at or before `at`.
    pub fn frame_at(&self, at: Millis) -> Option<&Frame<I>> {
        self.entries
            .iter()
            .take_while(|e| e.at <= at)
            .last()
            .map(|e| &e.frame)
    }

    /// Number of stage applications recorded.
    pub fn applied(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e.event, TraceEvent::Timer(TimerOutcome::Applied(_))))
            .count()
    }

    /// Number of pass restarts recorded.
    pub fn restarts(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e.event, TraceEvent::Timer(TimerOutcome::PassRestarted)))
            .count()
    }
}

struct Driver<I: NodeKey> {
    seq: Sequencer<I, TimerQueue>,
    entries: Vec<TraceEntry<I>>,
    record: bool,
}

impl<I: NodeKey> Driver<I> {
    fn new(widget: Widget<I>, record: bool) -> FlowreelResult<Self> {
        Ok(Self {
            seq: Sequencer::simulated(widget)?,
            entries: Vec::new(),
            record,
        })
    }

    fn note(&mut self, at: Millis, event: TraceEvent) {
        if self.record {
            let frame = self.seq.projection().frame();
            self.entries.push(TraceEntry { at, event, frame });
        }
    }

    fn pump(&mut self, to: Millis) -> FlowreelResult<()> {
        while let Some((at, outcome)) = self.seq.step_until(to)? {
            if outcome != TimerOutcome::Stale {
                self.note(at, TraceEvent::Timer(outcome));
            }
        }
        self.seq.host_mut().set_now(to);
        Ok(())
    }

    fn signal(&mut self, event: &ScriptEvent) -> FlowreelResult<()> {
        match event.action {
            ScriptAction::Intersect(entry) => {
                if let Some(transition) = self.seq.on_intersection(entry)? {
                    self.note(event.at, TraceEvent::Gate(transition));
                }
            }
            ScriptAction::Viewport(viewport) => {
                if self.seq.viewport() != viewport {
                    self.seq.on_viewport(viewport);
                    self.note(event.at, TraceEvent::Viewport(viewport));
                }
            }
        }
        Ok(())
    }

    fn run(&mut self, script: &VisibilityScript, until: Millis) -> FlowreelResult<()> {
        for event in script.events().iter().take_while(|e| e.at <= until) {
            self.pump(event.at)?;
            self.signal(event)?;
        }
        self.pump(until)
    }
}

/// Run `widget` on a simulated clock from 0 to `until`, replaying `script`, and record the
/// projection after every state-changing event.
#[tracing::instrument(skip_all, fields(widget = %widget.name, until = %until))]
pub fn simulate<I: NodeKey>(
    widget: Widget<I>,
    script: &VisibilityScript,
    until: Millis,
) -> FlowreelResult<Trace<I>> {
    let mut driver = Driver::new(widget, true)?;
    driver.run(script, until)?;
    tracing::debug!(entries = driver.entries.len(), "simulation finished");
    Ok(Trace {
        widget: driver.seq.widget().name.clone(),
        until,
        entries: driver.entries,
    })
}

/// Run `widget` on a simulated clock up to `at` and hand back the sequencer, e.g. to render
/// its projection.
pub fn settle<I: NodeKey>(
    widget: Widget<I>,
    script: &VisibilityScript,
    at: Millis,
) -> FlowreelResult<Sequencer<I, TimerQueue>> {
    let mut driver = Driver::new(widget, false)?;
    driver.run(script, at)?;
    Ok(driver.seq)
}

/// Real-time playback options.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayOpts {
    /// How long to play.
    pub duration: Millis,
    /// Viewport class used for positions.
    pub viewport: ViewportClass,
}

impl Default for PlayOpts {
    fn default() -> Self {
        Self {
            duration: Millis::from_secs(10),
            viewport: ViewportClass::Wide,
        }
    }
}

/// Play `widget` in real time on the current tokio runtime, as if it became fully visible at
/// the start and left the viewport after `opts.duration`.
///
/// `on_frame` is called after every stage application and every pass restart. Returns the
/// number of frames delivered.
pub async fn play<I, F>(widget: Widget<I>, opts: PlayOpts, mut on_frame: F) -> FlowreelResult<u64>
where
    I: NodeKey,
    F: FnMut(Millis, &Projection<'_, I>),
{
    let mut seq = Sequencer::simulated(widget)?;
    seq.on_viewport(opts.viewport);

    let start = tokio::time::Instant::now();
    seq.on_intersection(Intersection::visible())?;

    let mut frames = 0u64;
    while let Some(next) = seq.host_mut().next_deadline() {
        if next > opts.duration {
            break;
        }
        tokio::time::sleep_until(start + next.as_duration()).await;
        while let Some((at, outcome)) = seq.step_until(next)? {
            if outcome != TimerOutcome::Stale {
                on_frame(at, &seq.projection());
                frames += 1;
            }
        }
    }

    tokio::time::sleep_until(start + opts.duration.as_duration()).await;
    seq.host_mut().set_now(opts.duration);
    seq.on_intersection(Intersection::hidden())?;
    tracing::info!(widget = %seq.widget().name, frames, "playback finished");
    Ok(frames)
}

#[cfg(test)]
#[path = "../tests/unit/playback.rs"]
mod tests;
