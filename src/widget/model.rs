use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::{
    diagram::model::{Diagram, NodeKey},
    foundation::core::Millis,
    foundation::error::{FlowreelError, FlowreelResult},
    gate::VisibilityGate,
    schedule::looper::LoopTiming,
    stage::presets::staggered_reveal,
    stage::table::StageTable,
};

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Timing and gating options of a widget.
pub struct Timing {
    /// Visible fraction required to start.
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    /// Rest after the last stage before the next pass.
    #[serde(default = "default_cooldown")]
    pub cooldown_ms: Millis,
    /// Fixed pass period; overrides `duration + cooldown`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cycle_ms: Option<Millis>,
    /// Loop while visible. Reveal widgets play once.
    #[serde(default = "default_repeat")]
    pub repeat: bool,
    /// Generate a staggered reveal over the nodes when no stages are given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stagger_ms: Option<Millis>,
}

fn default_threshold() -> f64 {
    VisibilityGate::DEFAULT_THRESHOLD
}

fn default_cooldown() -> Millis {
    LoopTiming::default().cooldown
}

fn default_repeat() -> bool {
    true
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            cooldown_ms: default_cooldown(),
            cycle_ms: None,
            repeat: default_repeat(),
            stagger_ms: None,
        }
    }
}

impl Timing {
    /// Loop settings derived from this timing.
    pub fn loop_timing(&self) -> LoopTiming {
        LoopTiming {
            cooldown: self.cooldown_ms,
            cycle: self.cycle_ms,
            repeat: self.repeat,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(bound(
    serialize = "I: serde::Serialize",
    deserialize = "I: serde::Deserialize<'de>"
))]
/// Everything a widget contributes to the engine: static tables plus timing.
///
/// Widgets are pure data. They can be built in code (see [`crate::agent_architecture`]) or
/// loaded from JSON with [`Widget::from_path`].
pub struct Widget<I> {
    /// Name used in logs.
    pub name: String,
    /// Node and edge tables.
    pub diagram: Diagram<I>,
    /// Narrative of one pass.
    #[serde(default)]
    pub stages: StageTable<I>,
    /// Gating and looping options.
    #[serde(default)]
    pub timing: Timing,
}

impl<I: NodeKey> Widget<I> {
    /// Validate the widget and expand generated stage tables.
    pub fn prepare(mut self) -> FlowreelResult<Self> {
        self.diagram.validate()?;
        self.stages.check_order()?;
        VisibilityGate::new(self.timing.threshold)?;

        if let Some(stagger) = self.timing.stagger_ms {
            if !self.stages.is_empty() {
                return Err(FlowreelError::validation(format!(
                    "widget '{}': stagger_ms generates the stage table and cannot be combined with explicit stages",
                    self.name
                )));
            }
            let ids: Vec<I> = self.diagram.nodes.iter().map(|n| n.id.clone()).collect();
            self.stages = staggered_reveal(&ids, stagger);
        }

        if self.timing.repeat {
            let timing = self.timing.loop_timing();
            let cycle = timing.cycle_length(&self.stages);
            if cycle == Millis::ZERO {
                return Err(FlowreelError::validation(format!(
                    "widget '{}': a repeating widget needs a non-zero cycle",
                    self.name
                )));
            }
            if cycle < self.stages.duration() {
                return Err(FlowreelError::validation(format!(
                    "widget '{}': cycle {cycle} is shorter than the pass ({})",
                    self.name,
                    self.stages.duration()
                )));
            }
        }

        Ok(self)
    }
}

impl Widget<String> {
    /// Parse a widget from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> FlowreelResult<Self> {
        let widget: Self = serde_json::from_reader(r)
            .map_err(|e| FlowreelError::serde(format!("parse widget JSON: {e}")))?;
        widget.prepare()
    }

    /// Parse a widget from a JSON string.
    pub fn from_json(s: &str) -> FlowreelResult<Self> {
        Self::from_reader(s.as_bytes())
    }

    /// Parse a widget from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> FlowreelResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            FlowreelError::config(format!("open widget JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/widget/model.rs"]
mod tests;
