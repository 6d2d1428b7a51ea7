use crate::{
    diagram::model::NodeKey,
    foundation::core::{Epoch, Millis, ViewportClass},
    foundation::error::FlowreelResult,
    gate::{GateState, GateTransition, Intersection, VisibilityGate},
    projection::Projection,
    schedule::looper::LoopController,
    schedule::scheduler::Scheduler,
    schedule::timer::{TimerHost, TimerQueue, TimerSlot, TimerToken},
    stage::table::ConfigReport,
    state::AnimationState,
    widget::model::Widget,
};

/// Result of delivering a fired timer to a [`Sequencer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum TimerOutcome {
    /// The stage at this index was applied.
    Applied(usize),
    /// The pass ended; state was reset and the next pass armed.
    PassRestarted,
    /// The token belonged to a cancelled generation and was ignored.
    Stale,
}

/// Generic animation engine for one widget instance.
///
/// Owns the widget's static tables, its [`AnimationState`], the scheduler's generation guard,
/// the loop controller, the visibility gate and the current viewport class. All inputs arrive
/// as discrete calls (`on_intersection`, `on_viewport`, `on_timer`), so the single
/// `&mut self` borrow is the only synchronization needed.
pub struct Sequencer<I, H> {
    widget: Widget<I>,
    report: ConfigReport<I>,
    state: AnimationState<I>,
    scheduler: Scheduler,
    looper: LoopController,
    gate: VisibilityGate,
    viewport: ViewportClass,
    host: H,
}

impl<I: NodeKey, H: TimerHost> Sequencer<I, H> {
    /// Validate `widget` and mount it on `host`. Nothing is armed until the widget becomes
    /// visible (or [`Sequencer::start`] is called).
    #[tracing::instrument(skip_all, fields(widget = %widget.name))]
    pub fn new(widget: Widget<I>, host: H) -> FlowreelResult<Self> {
        let widget = widget.prepare()?;
        let report = widget.stages.check_references(&widget.diagram);
        for issue in &report.issues {
            tracing::warn!(widget = %widget.name, "{issue}");
        }

        let gate = VisibilityGate::new(widget.timing.threshold)?;
        let looper = LoopController::new(widget.timing.loop_timing());

        Ok(Self {
            widget,
            report,
            state: AnimationState::default(),
            scheduler: Scheduler::new(),
            looper,
            gate,
            viewport: ViewportClass::default(),
            host,
        })
    }

    /// Prepared widget tables.
    pub fn widget(&self) -> &Widget<I> {
        &self.widget
    }

    /// Unresolvable references found at construction.
    pub fn config_report(&self) -> &ConfigReport<I> {
        &self.report
    }

    /// Current animation state.
    pub fn state(&self) -> &AnimationState<I> {
        &self.state
    }

    /// Timer host.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable timer host, for drivers that pop due timers.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Current visibility gate state.
    pub fn gate_state(&self) -> GateState {
        self.gate.state()
    }

    /// Viewport class the projection resolves positions for.
    pub fn viewport(&self) -> ViewportClass {
        self.viewport
    }

    /// `true` while passes are being armed.
    pub fn is_running(&self) -> bool {
        self.looper.is_running()
    }

    /// Current scheduler generation.
    pub fn epoch(&self) -> Epoch {
        self.scheduler.epoch()
    }

    /// Passes started since mount.
    pub fn passes(&self) -> u64 {
        self.looper.passes()
    }

    /// Timers currently armed by this sequencer.
    pub fn armed_timers(&self) -> usize {
        self.looper.armed()
    }

    /// Read side for the drawing layer.
    pub fn projection(&self) -> Projection<'_, I> {
        Projection::new(&self.widget.diagram, &self.state, self.viewport)
    }

    /// Start looping regardless of visibility. No-op while running.
    pub fn start(&mut self) -> FlowreelResult<bool> {
        let started = self
            .looper
            .start(&mut self.host, &mut self.scheduler, &self.widget.stages);
        if let Err(err) = &started {
            tracing::error!(widget = %self.widget.name, "failed to arm pass: {err}");
            self.state.reset();
        }
        started
    }

    /// Stop looping and cancel armed timers. State is kept. No-op while stopped.
    pub fn stop(&mut self) -> bool {
        self.looper.stop(&mut self.host, &mut self.scheduler)
    }

    /// Feed a viewport-intersection notification.
    pub fn on_intersection(
        &mut self,
        entry: Intersection,
    ) -> FlowreelResult<Option<GateTransition>> {
        let transition = self.gate.observe(entry);
        match transition {
            Some(GateTransition::Activated) => {
                tracing::info!(widget = %self.widget.name, ratio = entry.ratio, "entered viewport");
                if let Err(err) = self.start() {
                    self.gate.close();
                    return Err(err);
                }
            }
            Some(GateTransition::Deactivated) => {
                tracing::info!(widget = %self.widget.name, "left viewport");
                self.stop();
                self.state.reset();
            }
            None => {}
        }
        Ok(transition)
    }

    /// Feed a viewport-class change. Only affects resolved positions.
    pub fn on_viewport(&mut self, viewport: ViewportClass) {
        if self.viewport != viewport {
            tracing::debug!(widget = %self.widget.name, ?viewport, "viewport class changed");
            self.viewport = viewport;
        }
    }

    /// Deliver a fired timer.
    pub fn on_timer(&mut self, token: TimerToken) -> FlowreelResult<TimerOutcome> {
        if !self.scheduler.accepts(&token) {
            tracing::trace!(
                token_epoch = token.epoch.0,
                epoch = self.scheduler.epoch().0,
                "ignored stale timer"
            );
            return Ok(TimerOutcome::Stale);
        }

        match token.slot {
            TimerSlot::Stage(index) => {
                let Some(stage) = self.widget.stages.get(index) else {
                    return Ok(TimerOutcome::Stale);
                };
                self.state.apply(&stage.effect);
                self.looper.on_stage_fired(index, &self.widget.stages);
                tracing::debug!(
                    widget = %self.widget.name,
                    stage = index,
                    offset = %stage.offset,
                    label = %self.state.stage_label,
                    "stage applied"
                );
                Ok(TimerOutcome::Applied(index))
            }
            TimerSlot::PassEnd => {
                let restarted = self.looper.on_pass_end(
                    &mut self.host,
                    &mut self.scheduler,
                    &self.widget.stages,
                    &mut self.state,
                );
                if let Err(err) = restarted {
                    tracing::error!(widget = %self.widget.name, "failed to arm next pass: {err}");
                    self.state.reset();
                    self.gate.close();
                    return Err(err);
                }
                Ok(TimerOutcome::PassRestarted)
            }
        }
    }

    /// Unmount: stop, reset and close the gate.
    pub fn unmount(&mut self) {
        self.stop();
        self.state.reset();
        self.gate.close();
    }
}

impl<I: NodeKey> Sequencer<I, TimerQueue> {
    /// Mount on a fresh in-process timer queue.
    pub fn simulated(widget: Widget<I>) -> FlowreelResult<Self> {
        Self::new(widget, TimerQueue::new())
    }

    /// Host time.
    pub fn now(&self) -> Millis {
        self.host.now()
    }

    /// Dispatch the next timer due at or before `until`, if any.
    pub fn step_until(&mut self, until: Millis) -> FlowreelResult<Option<(Millis, TimerOutcome)>> {
        let Some((at, token)) = self.host.pop_due(until) else {
            return Ok(None);
        };
        let outcome = self.on_timer(token)?;
        Ok(Some((at, outcome)))
    }

    /// Dispatch every timer due at or before `until`, then move the clock to `until`.
    pub fn advance_to(&mut self, until: Millis) -> FlowreelResult<()> {
        while self.step_until(until)?.is_some() {}
        self.host.set_now(until);
        Ok(())
    }

    /// [`Sequencer::advance_to`] relative to the current time.
    pub fn advance_by(&mut self, delta: Millis) -> FlowreelResult<()> {
        let until = self.host.now() + delta;
        self.advance_to(until)
    }
}

#[cfg(test)]
#[path = "../tests/unit/sequencer.rs"]
mod tests;
