use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap};

use crate::foundation::core::{Epoch, Millis};
use crate::foundation::error::{FlowreelError, FlowreelResult};

/// What a timer does when it fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub enum TimerSlot {
    /// Apply the stage at this index of the stage table.
    Stage(usize),
    /// The pass plus its cooldown elapsed; reset and start the next pass.
    PassEnd,
}

/// Payload handed back to the sequencer when a timer fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub struct TimerToken {
    /// Scheduler generation the timer was armed under.
    pub epoch: Epoch,
    /// What to do.
    pub slot: TimerSlot,
}

/// Host-issued handle used to cancel a pending timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerHandle(pub u64);

/// One-shot timer facility of the hosting environment.
///
/// Hosts only store tokens and hand them back; the sequencer decides whether a fired token is
/// still current. `cancel` must tolerate handles that already fired or were already cancelled.
pub trait TimerHost {
    /// Current host time.
    fn now(&self) -> Millis;

    /// Arm a one-shot timer `delay` from now.
    fn schedule(&mut self, delay: Millis, token: TimerToken) -> FlowreelResult<TimerHandle>;

    /// Disarm a timer. Unknown handles are ignored.
    fn cancel(&mut self, handle: TimerHandle);
}

/// Deterministic in-process timer queue.
///
/// Timers fire in deadline order; equal deadlines fire in the order they were armed. Time only
/// moves when a driver pops due timers or calls [`TimerQueue::set_now`], which makes it usable
/// both as a simulated clock and as the bookkeeping half of a real-time driver.
#[derive(Debug, Default)]
pub struct TimerQueue {
    now: Millis,
    next_id: u64,
    capacity: Option<usize>,
    heap: BinaryHeap<Reverse<(Millis, u64)>>,
    live: BTreeMap<u64, TimerToken>,
}

impl TimerQueue {
    /// Empty queue at time zero, unbounded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue that refuses to hold more than `capacity` pending timers.
    pub fn with_capacity_limit(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity),
            ..Self::default()
        }
    }

    /// Number of armed, not yet fired timers.
    pub fn pending(&self) -> usize {
        self.live.len()
    }

    /// Deadline of the earliest pending timer.
    pub fn next_deadline(&mut self) -> Option<Millis> {
        self.prune_cancelled();
        self.heap.peek().map(|Reverse((at, _))| *at)
    }

    /// Pop the earliest timer due at or before `until`, moving the clock to its deadline.
    pub fn pop_due(&mut self, until: Millis) -> Option<(Millis, TimerToken)> {
        self.prune_cancelled();
        let Reverse((at, _)) = *self.heap.peek()?;
        if at > until {
            return None;
        }
        let Reverse((at, id)) = self.heap.pop()?;
        let token = self.live.remove(&id)?;
        self.now = self.now.max(at);
        Some((at, token))
    }

    /// Move the clock forward. The clock never goes backwards.
    pub fn set_now(&mut self, now: Millis) {
        self.now = self.now.max(now);
    }

    fn prune_cancelled(&mut self) {
        while let Some(Reverse((_, id))) = self.heap.peek() {
            if self.live.contains_key(id) {
                break;
            }
            self.heap.pop();
        }
    }
}

impl TimerHost for TimerQueue {
    fn now(&self) -> Millis {
        self.now
    }

    fn schedule(&mut self, delay: Millis, token: TimerToken) -> FlowreelResult<TimerHandle> {
        if let Some(capacity) = self.capacity
            && self.live.len() >= capacity
        {
            return Err(FlowreelError::scheduling(format!(
                "timer queue is full ({capacity} pending)"
            )));
        }

        let id = self.next_id;
        self.next_id += 1;
        self.heap.push(Reverse((self.now + delay, id)));
        self.live.insert(id, token);
        Ok(TimerHandle(id))
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.live.remove(&handle.0);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/timer.rs"]
mod tests;
