use crate::foundation::error::{FlowreelError, FlowreelResult};

/// One notification from the host's viewport-intersection facility.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Intersection {
    /// Whether any part of the widget is on screen.
    pub intersecting: bool,
    /// Visible fraction of the widget's area, `0.0..=1.0`.
    pub ratio: f64,
}

impl Intersection {
    /// Fully on screen.
    pub fn visible() -> Self {
        Self {
            intersecting: true,
            ratio: 1.0,
        }
    }

    /// Fully off screen.
    pub fn hidden() -> Self {
        Self {
            intersecting: false,
            ratio: 0.0,
        }
    }

    /// Partially on screen.
    pub fn partial(ratio: f64) -> Self {
        Self {
            intersecting: ratio > 0.0,
            ratio,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
/// Gate membership.
pub enum GateState {
    /// Off screen (or not yet visible enough).
    #[default]
    Inactive,
    /// On screen; the loop runs.
    Active,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
/// Membership change produced by [`VisibilityGate::observe`].
pub enum GateTransition {
    /// Entered the viewport: start from stage zero.
    Activated,
    /// Left the viewport: stop, cancel, reset.
    Deactivated,
}

/// Two-state visibility machine that couples a sequencer to on-screen presence.
///
/// Activation needs `ratio >= threshold`; deactivation needs the widget to leave the viewport
/// entirely. Notifications in between do not change membership and are ignored, so repeated
/// "still visible" callbacks never re-arm a running sequence.
#[derive(Clone, Debug)]
pub struct VisibilityGate {
    threshold: f64,
    state: GateState,
}

impl VisibilityGate {
    /// Threshold of the diagram widgets.
    pub const DEFAULT_THRESHOLD: f64 = 0.2;

    /// Gate with a visible-fraction threshold in `(0, 1]`.
    pub fn new(threshold: f64) -> FlowreelResult<Self> {
        if !threshold.is_finite() || threshold <= 0.0 || threshold > 1.0 {
            return Err(FlowreelError::validation(format!(
                "visibility threshold must be in (0, 1], got {threshold}"
            )));
        }
        Ok(Self {
            threshold,
            state: GateState::Inactive,
        })
    }

    /// Minimum visible ratio that counts as visible.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Current gate state.
    pub fn state(&self) -> GateState {
        self.state
    }

    /// `true` while the widget counts as visible.
    pub fn is_active(&self) -> bool {
        self.state == GateState::Active
    }

    /// Feed one notification; returns the transition it caused, if any.
    pub fn observe(&mut self, entry: Intersection) -> Option<GateTransition> {
        match self.state {
            GateState::Inactive if entry.intersecting && entry.ratio >= self.threshold => {
                self.state = GateState::Active;
                Some(GateTransition::Activated)
            }
            GateState::Active if !entry.intersecting => {
                self.state = GateState::Inactive;
                Some(GateTransition::Deactivated)
            }
            _ => None,
        }
    }

    /// Force the gate back to inactive without a notification (unmount).
    pub(crate) fn close(&mut self) {
        self.state = GateState::Inactive;
    }
}

impl Default for VisibilityGate {
    fn default() -> Self {
        Self {
            threshold: Self::DEFAULT_THRESHOLD,
            state: GateState::Inactive,
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/gate.rs"]
mod tests;
