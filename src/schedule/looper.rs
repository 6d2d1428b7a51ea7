use crate::{
    diagram::model::NodeKey,
    foundation::core::Millis,
    foundation::error::FlowreelResult,
    schedule::scheduler::{HandleSet, Scheduler},
    schedule::timer::TimerHost,
    stage::table::StageTable,
    state::AnimationState,
};

/// Pass repetition settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoopTiming {
    /// Rest after the last stage before the next pass starts.
    pub cooldown: Millis,
    /// Fixed pass-start to pass-start period; overrides `duration + cooldown`.
    pub cycle: Option<Millis>,
    /// Run passes back to back while active; `false` plays one pass and holds.
    pub repeat: bool,
}

impl Default for LoopTiming {
    fn default() -> Self {
        Self {
            cooldown: Millis(1000),
            cycle: None,
            repeat: true,
        }
    }
}

impl LoopTiming {
    /// Period between the starts of two consecutive passes.
    pub fn cycle_length<I>(&self, table: &StageTable<I>) -> Millis {
        self.cycle.unwrap_or_else(|| table.duration() + self.cooldown)
    }
}

/// Repeats the stage table while running, with at most one pass armed at a time.
#[derive(Debug)]
pub struct LoopController {
    timing: LoopTiming,
    running: bool,
    run: Option<HandleSet>,
    passes: u64,
    pass_started: Millis,
}

impl LoopController {
    /// Stopped controller.
    pub fn new(timing: LoopTiming) -> Self {
        Self {
            timing,
            running: false,
            run: None,
            passes: 0,
            pass_started: Millis::ZERO,
        }
    }

    /// Configured loop timing.
    pub fn timing(&self) -> LoopTiming {
        self.timing
    }

    /// `true` between `start` and `stop`.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Passes started since construction.
    pub fn passes(&self) -> u64 {
        self.passes
    }

    /// Host time at which the current pass was armed.
    pub fn pass_started(&self) -> Millis {
        self.pass_started
    }

    /// Timers still pending for the current pass (stages plus pass end). A held single pass
    /// reports zero once its last stage has fired.
    pub fn armed(&self) -> usize {
        self.run.as_ref().map_or(0, HandleSet::len)
    }

    /// Start looping. Returns `Ok(false)` if already running.
    pub fn start<I, H: TimerHost>(
        &mut self,
        host: &mut H,
        scheduler: &mut Scheduler,
        table: &StageTable<I>,
    ) -> FlowreelResult<bool> {
        if self.running {
            return Ok(false);
        }
        self.running = true;
        self.begin_pass(host, scheduler, table)?;
        Ok(true)
    }

    /// Pass-end timer fired: reset state and arm the next pass.
    pub fn on_pass_end<I: NodeKey, H: TimerHost>(
        &mut self,
        host: &mut H,
        scheduler: &mut Scheduler,
        table: &StageTable<I>,
        state: &mut AnimationState<I>,
    ) -> FlowreelResult<()> {
        if !self.running {
            return Ok(());
        }
        state.reset();
        if let Some(finished) = self.run.take() {
            scheduler.cancel_all(host, finished);
        }
        self.begin_pass(host, scheduler, table)
    }

    /// Stage `index` of the current pass fired. A single pass whose last stage has fired has
    /// nothing left pending, so its handles are dropped while the loop keeps holding.
    pub fn on_stage_fired<I>(&mut self, index: usize, table: &StageTable<I>) {
        if self.running && !self.timing.repeat && index + 1 == table.len() {
            self.run = None;
            tracing::debug!(pass = self.passes, "single pass finished, holding");
        }
    }

    /// Stop looping and cancel the armed pass. State is left as is. Returns `false` if
    /// nothing was running.
    pub fn stop<H: TimerHost>(&mut self, host: &mut H, scheduler: &mut Scheduler) -> bool {
        let was_running = self.running;
        if let Some(run) = self.run.take() {
            scheduler.cancel_all(host, run);
        }
        self.running = false;
        was_running
    }

    fn begin_pass<I, H: TimerHost>(
        &mut self,
        host: &mut H,
        scheduler: &mut Scheduler,
        table: &StageTable<I>,
    ) -> FlowreelResult<()> {
        let pass_end = self.timing.repeat.then(|| self.timing.cycle_length(table));
        match scheduler.arm(host, table, pass_end) {
            Ok(set) => {
                self.run = Some(set);
                self.passes += 1;
                self.pass_started = host.now();
                tracing::debug!(pass = self.passes, at = %self.pass_started, "pass started");
                Ok(())
            }
            Err(err) => {
                self.running = false;
                self.run = None;
                Err(err)
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/looper.rs"]
mod tests;
