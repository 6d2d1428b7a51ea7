use std::fmt;

use crate::{
    diagram::model::{Diagram, EdgeKey, NodeKey},
    foundation::core::Millis,
    foundation::error::{FlowreelError, FlowreelResult},
    stage::effect::Effect,
};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(bound(
    serialize = "I: serde::Serialize",
    deserialize = "I: serde::Deserialize<'de>"
))]
/// One scheduled mutation.
pub struct Stage<I> {
    /// Time after pass start at which the stage fires.
    pub offset: Millis,
    /// Changes applied when it fires.
    pub effect: Effect<I>,
}

impl<I> Stage<I> {
    /// Stage firing at `offset_ms`.
    pub fn at(offset_ms: u64, effect: Effect<I>) -> Self {
        Self {
            offset: Millis(offset_ms),
            effect,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
#[serde(bound(
    serialize = "I: serde::Serialize",
    deserialize = "I: serde::Deserialize<'de>"
))]
/// Ordered narrative of one pass.
///
/// Offsets are weakly increasing. Stages sharing an offset fire in declaration order.
pub struct StageTable<I> {
    stages: Vec<Stage<I>>,
}

impl<I> Default for StageTable<I> {
    fn default() -> Self {
        Self { stages: Vec::new() }
    }
}

impl<I> StageTable<I> {
    /// Build a table, rejecting decreasing offsets.
    pub fn new(stages: Vec<Stage<I>>) -> FlowreelResult<Self> {
        let table = Self { stages };
        table.check_order()?;
        Ok(table)
    }

    /// Verify offsets are weakly increasing.
    ///
    /// Tables deserialized from JSON bypass [`StageTable::new`], so loaders call this.
    pub fn check_order(&self) -> FlowreelResult<()> {
        for (i, pair) in self.stages.windows(2).enumerate() {
            if pair[1].offset < pair[0].offset {
                return Err(FlowreelError::validation(format!(
                    "stage {} at {} fires before stage {} at {}",
                    i + 1,
                    pair[1].offset,
                    i,
                    pair[0].offset
                )));
            }
        }
        Ok(())
    }

    /// Stages in firing order. Each call starts over from the first stage.
    pub fn stages(&self) -> std::slice::Iter<'_, Stage<I>> {
        self.stages.iter()
    }

    /// Stage by index.
    pub fn get(&self, index: usize) -> Option<&Stage<I>> {
        self.stages.get(index)
    }

    /// Number of stages.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Whether the table has no stages.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Offset of the last stage (zero for an empty table).
    pub fn duration(&self) -> Millis {
        self.stages.last().map(|s| s.offset).unwrap_or_default()
    }
}

impl<I: NodeKey> StageTable<I> {
    /// Collect references the diagram cannot resolve.
    pub fn check_references(&self, diagram: &Diagram<I>) -> ConfigReport<I> {
        let mut report = ConfigReport::default();

        for edge in diagram.dangling_edges() {
            report.issues.push(ConfigIssue::DanglingEdge(edge.key()));
        }

        for (index, stage) in self.stages.iter().enumerate() {
            for id in stage.effect.node_refs() {
                if !diagram.contains_node(id) {
                    report.issues.push(ConfigIssue::UnknownNode {
                        stage: index,
                        id: id.clone(),
                    });
                }
            }
            for key in stage.effect.edge_refs() {
                if !diagram.contains_edge(key) {
                    report.issues.push(ConfigIssue::UnknownEdge {
                        stage: index,
                        key: key.clone(),
                    });
                }
            }
        }

        report
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
/// A reference the static tables cannot resolve. Never fatal: the projection skips it.
pub enum ConfigIssue<I> {
    /// An edge whose endpoint is not in the node table.
    DanglingEdge(EdgeKey<I>),
    /// A stage names a node that does not exist.
    UnknownNode {
        /// Stage index.
        stage: usize,
        /// Missing node id.
        id: I,
    },
    /// A stage names an edge that does not exist.
    UnknownEdge {
        /// Stage index.
        stage: usize,
        /// Missing edge key.
        key: EdgeKey<I>,
    },
}

impl<I: fmt::Display> fmt::Display for ConfigIssue<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DanglingEdge(key) => write!(f, "edge '{key}' references a missing node"),
            Self::UnknownNode { stage, id } => {
                write!(f, "stage {stage} references unknown node '{id}'")
            }
            Self::UnknownEdge { stage, key } => {
                write!(f, "stage {stage} references unknown edge '{key}'")
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
/// Development diagnostics gathered when a sequencer is constructed.
pub struct ConfigReport<I> {
    /// Unresolvable references, in discovery order.
    pub issues: Vec<ConfigIssue<I>>,
}

impl<I> Default for ConfigReport<I> {
    fn default() -> Self {
        Self { issues: Vec::new() }
    }
}

impl<I> ConfigReport<I> {
    /// Whether every reference resolved.
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stage/table.rs"]
mod tests;
