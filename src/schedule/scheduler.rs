use crate::{
    foundation::core::{Epoch, Millis},
    foundation::error::FlowreelResult,
    schedule::timer::{TimerHandle, TimerHost, TimerSlot, TimerToken},
    stage::table::StageTable,
};

/// Timers armed by one [`Scheduler::arm`] call.
#[derive(Debug)]
pub struct HandleSet {
    epoch: Epoch,
    handles: Vec<TimerHandle>,
}

impl HandleSet {
    /// Generation the timers were armed under.
    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    /// Number of armed timers.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Whether nothing was armed.
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

/// Turns a stage table into host timers and owns the generation guard.
///
/// Fired tokens are not applied here: the owner checks [`Scheduler::accepts`] and then applies
/// the stage's effect. After [`Scheduler::cancel_all`] the epoch has moved on, so a token from
/// the cancelled set that the host already had in flight is rejected before it can touch state.
#[derive(Debug, Default)]
pub struct Scheduler {
    epoch: Epoch,
}

impl Scheduler {
    /// Scheduler at epoch zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current generation.
    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    /// Arm one timer per stage at its offset from now, plus an optional pass-end timer.
    ///
    /// Either every timer is armed or none is: on a host refusal the timers armed so far are
    /// cancelled, the epoch advances and the error is returned.
    pub fn arm<I, H: TimerHost>(
        &mut self,
        host: &mut H,
        table: &StageTable<I>,
        pass_end: Option<Millis>,
    ) -> FlowreelResult<HandleSet> {
        let mut set = HandleSet {
            epoch: self.epoch,
            handles: Vec::with_capacity(table.len() + 1),
        };

        let slots = table
            .stages()
            .enumerate()
            .map(|(i, stage)| (stage.offset, TimerSlot::Stage(i)))
            .chain(pass_end.map(|at| (at, TimerSlot::PassEnd)));

        for (delay, slot) in slots {
            let token = TimerToken {
                epoch: self.epoch,
                slot,
            };
            match host.schedule(delay, token) {
                Ok(handle) => set.handles.push(handle),
                Err(err) => {
                    tracing::error!(armed = set.len(), "timer host refused a stage timer: {err}");
                    self.cancel_all(host, set);
                    return Err(err);
                }
            }
        }

        tracing::trace!(epoch = self.epoch.0, timers = set.len(), "armed pass");
        Ok(set)
    }

    /// Cancel every timer of `set` and invalidate its generation.
    pub fn cancel_all<H: TimerHost>(&mut self, host: &mut H, set: HandleSet) {
        for handle in set.handles {
            host.cancel(handle);
        }
        self.epoch = self.epoch.next();
    }

    /// Generation guard: whether a fired token belongs to the live generation.
    pub fn accepts(&self, token: &TimerToken) -> bool {
        token.epoch == self.epoch
    }
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/scheduler.rs"]
mod tests;
