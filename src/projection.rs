use crate::{
    diagram::model::{Diagram, Edge, EdgeKey, Node, NodeKey},
    foundation::core::{Point, ViewportClass},
    state::AnimationState,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
/// Visual status of a node.
pub enum NodeStatus {
    /// Not reached yet.
    Idle,
    /// Currently highlighted.
    Active,
    /// Working (spinner), not highlighted.
    Processing,
    /// Done.
    Completed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
/// Visual status of an edge.
pub enum EdgeStatus {
    /// Not traversed.
    Idle,
    /// Particles flowing.
    Active,
    /// Traversed.
    Completed,
}

/// Read-only mapping from animation state to per-element status.
///
/// Pure: it borrows its inputs and keeps no counters, so repeated calls with the same state
/// return the same answers. Precedence is completed > active > processing > idle.
#[derive(Clone, Copy, Debug)]
pub struct Projection<'a, I> {
    diagram: &'a Diagram<I>,
    state: &'a AnimationState<I>,
    viewport: ViewportClass,
}

/// A node resolved for drawing.
#[derive(Clone, Copy, Debug)]
pub struct NodeView<'a, I> {
    /// Static node data.
    pub node: &'a Node<I>,
    /// Current status.
    pub status: NodeStatus,
    /// Position for the current viewport class.
    pub position: Point,
}

/// An edge resolved for drawing. Only produced when both endpoints exist.
#[derive(Clone, Copy, Debug)]
pub struct EdgeView<'a, I> {
    /// Static edge data.
    pub edge: &'a Edge<I>,
    /// Current status.
    pub status: EdgeStatus,
    /// Resolved source position.
    pub from: Point,
    /// Resolved target position.
    pub to: Point,
}

impl<'a, I: NodeKey> Projection<'a, I> {
    /// Read view over `diagram` and `state` for one viewport class.
    pub fn new(
        diagram: &'a Diagram<I>,
        state: &'a AnimationState<I>,
        viewport: ViewportClass,
    ) -> Self {
        Self {
            diagram,
            state,
            viewport,
        }
    }

    /// Viewport class positions are resolved for.
    pub fn viewport(&self) -> ViewportClass {
        self.viewport
    }

    /// Status of a node. Completed wins over active, active over processing.
    pub fn node_status(&self, id: &I) -> NodeStatus {
        if self.state.completed_nodes.contains(id) {
            NodeStatus::Completed
        } else if self.state.active_node.as_ref() == Some(id) {
            NodeStatus::Active
        } else if self.state.processing_nodes.contains(id) {
            NodeStatus::Processing
        } else {
            NodeStatus::Idle
        }
    }

    /// Status of the connector between `from` and `to`.
    pub fn edge_status(&self, from: &I, to: &I) -> EdgeStatus {
        self.key_status(&EdgeKey::new(from.clone(), to.clone()))
    }

    fn key_status(&self, key: &EdgeKey<I>) -> EdgeStatus {
        if self.state.completed_edges.contains(key) {
            EdgeStatus::Completed
        } else if self.state.active_edges.contains(key) {
            EdgeStatus::Active
        } else {
            EdgeStatus::Idle
        }
    }

    /// Position of `node` for the current viewport class.
    pub fn resolved_position(&self, node: &Node<I>) -> Point {
        node.position.for_viewport(self.viewport)
    }

    /// Caption of the most recently applied stage.
    pub fn stage_label(&self) -> &'a str {
        &self.state.stage_label
    }

    /// Nodes in drawing order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeView<'a, I>> + '_ {
        self.diagram.nodes.iter().map(|node| NodeView {
            node,
            status: self.node_status(&node.id),
            position: self.resolved_position(node),
        })
    }

    /// Edges in drawing order, skipping edges with a missing endpoint.
    pub fn edges(&self) -> impl Iterator<Item = EdgeView<'a, I>> + '_ {
        self.diagram.edges.iter().filter_map(|edge| {
            let from = self.diagram.node(&edge.from)?;
            let to = self.diagram.node(&edge.to)?;
            Some(EdgeView {
                edge,
                status: self.key_status(&edge.key()),
                from: self.resolved_position(from),
                to: self.resolved_position(to),
            })
        })
    }

    /// Owned, serializable snapshot of every status.
    pub fn frame(&self) -> Frame<I> {
        Frame {
            label: self.stage_label().to_owned(),
            nodes: self
                .nodes()
                .map(|v| FrameNode {
                    id: v.node.id.clone(),
                    status: v.status,
                })
                .collect(),
            edges: self
                .edges()
                .map(|v| FrameEdge {
                    from: v.edge.from.clone(),
                    to: v.edge.to.clone(),
                    status: v.status,
                })
                .collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
/// Projection snapshot, used by traces and tests.
pub struct Frame<I> {
    /// Phase caption.
    pub label: String,
    /// Node statuses in drawing order.
    pub nodes: Vec<FrameNode<I>>,
    /// Edge statuses in drawing order.
    pub edges: Vec<FrameEdge<I>>,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
/// Status of one node in a [`Frame`].
pub struct FrameNode<I> {
    /// Node id.
    pub id: I,
    /// Status.
    pub status: NodeStatus,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
/// Status of one edge in a [`Frame`].
pub struct FrameEdge<I> {
    /// Source id.
    pub from: I,
    /// Target id.
    pub to: I,
    /// Status.
    pub status: EdgeStatus,
}

impl<I: NodeKey> Frame<I> {
    /// Status of `id`, if the node exists.
    pub fn node(&self, id: &I) -> Option<NodeStatus> {
        self.nodes.iter().find(|n| &n.id == id).map(|n| n.status)
    }

    /// Whether every node and edge is idle and no caption is shown.
    pub fn is_idle(&self) -> bool {
        self.label.is_empty()
            && self.nodes.iter().all(|n| n.status == NodeStatus::Idle)
            && self.edges.iter().all(|e| e.status == EdgeStatus::Idle)
    }
}

#[cfg(test)]
#[path = "../tests/unit/projection.rs"]
mod tests;
