use std::collections::BTreeSet;

use crate::{
    diagram::model::{EdgeKey, NodeKey},
    stage::effect::{Change, Effect},
};

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
/// The only runtime-mutable aggregate of a widget.
///
/// Mutated by stage effects, cleared between passes and when the widget leaves the viewport.
/// A node may sit in `completed_nodes` while also being `active_node`; readers go through
/// [`crate::Projection`], where completion wins.
pub struct AnimationState<I> {
    /// Node currently highlighted.
    pub active_node: Option<I>,
    /// Nodes that finished their step.
    pub completed_nodes: BTreeSet<I>,
    /// Nodes shown with a spinner.
    pub processing_nodes: BTreeSet<I>,
    /// Edges with flowing particles.
    pub active_edges: BTreeSet<EdgeKey<I>>,
    /// Edges already traversed.
    pub completed_edges: BTreeSet<EdgeKey<I>>,
    /// Current phase caption; empty when idle.
    pub stage_label: String,
}

impl<I> Default for AnimationState<I> {
    fn default() -> Self {
        Self {
            active_node: None,
            completed_nodes: BTreeSet::new(),
            processing_nodes: BTreeSet::new(),
            active_edges: BTreeSet::new(),
            completed_edges: BTreeSet::new(),
            stage_label: String::new(),
        }
    }
}

impl<I: NodeKey> AnimationState<I> {
    /// Apply every change of `effect` in order.
    pub fn apply(&mut self, effect: &Effect<I>) {
        for change in effect.changes() {
            match change {
                Change::ActivateNode(id) => self.active_node = Some(id.clone()),
                Change::ClearActiveNode => self.active_node = None,
                Change::CompleteNodes(ids) => self.completed_nodes.extend(ids.iter().cloned()),
                Change::SetProcessing(ids) => {
                    self.processing_nodes = ids.iter().cloned().collect();
                }
                Change::ActivateEdges(keys) => {
                    self.active_edges = keys.iter().cloned().collect();
                }
                Change::CompleteEdges(keys) => {
                    self.completed_edges.extend(keys.iter().cloned());
                }
                Change::Label(text) => self.stage_label.clone_from(text),
            }
        }
    }

    /// Back to the empty form.
    pub fn reset(&mut self) {
        self.active_node = None;
        self.completed_nodes.clear();
        self.processing_nodes.clear();
        self.active_edges.clear();
        self.completed_edges.clear();
        self.stage_label.clear();
    }

    /// Whether nothing is highlighted and no caption is shown.
    pub fn is_empty(&self) -> bool {
        self.active_node.is_none()
            && self.completed_nodes.is_empty()
            && self.processing_nodes.is_empty()
            && self.active_edges.is_empty()
            && self.completed_edges.is_empty()
            && self.stage_label.is_empty()
    }
}

#[cfg(test)]
#[path = "../tests/unit/state.rs"]
mod tests;
