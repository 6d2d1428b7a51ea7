use crate::{
    diagram::model::{Diagram, Edge, EdgeStyle, Node, NodeKey, NodeKind, NodePosition},
    foundation::core::Point,
    foundation::error::FlowreelResult,
};

/// Programmatic diagram construction.
pub struct DiagramBuilder<I> {
    nodes: Vec<Node<I>>,
    edges: Vec<Edge<I>>,
}

impl<I: NodeKey> Default for DiagramBuilder<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: NodeKey> DiagramBuilder<I> {
    /// Empty builder.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    /// Add a node. Declaration order is drawing order.
    pub fn node(mut self, node: Node<I>) -> Self {
        self.nodes.push(node);
        self
    }

    /// Add a connector from `from` to `to`.
    pub fn edge(mut self, from: I, to: I, style: EdgeStyle) -> Self {
        self.edges.push(Edge { from, to, style });
        self
    }

    /// Add a solid connector.
    pub fn solid(self, from: I, to: I) -> Self {
        self.edge(from, to, EdgeStyle::Solid)
    }

    /// Add a dashed connector.
    pub fn dashed(self, from: I, to: I) -> Self {
        self.edge(from, to, EdgeStyle::Dashed)
    }

    /// Validate and return the diagram.
    pub fn build(self) -> FlowreelResult<Diagram<I>> {
        let diagram = Diagram {
            nodes: self.nodes,
            edges: self.edges,
        };
        diagram.validate()?;
        Ok(diagram)
    }
}

/// Chained construction of a single [`Node`].
pub struct NodeBuilder<I> {
    id: I,
    kind: NodeKind,
    label: String,
    sublabel: Option<String>,
    position: NodePosition,
}

impl<I> NodeBuilder<I> {
    /// Primary node at the same position for every viewport class.
    pub fn new(id: I, label: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            id,
            kind: NodeKind::Primary,
            label: label.into(),
            sublabel: None,
            position: NodePosition::fixed(x, y),
        }
    }

    /// Node role, which selects its palette.
    pub fn kind(mut self, kind: NodeKind) -> Self {
        self.kind = kind;
        self
    }

    /// Secondary caption drawn under the label.
    pub fn sublabel(mut self, sublabel: impl Into<String>) -> Self {
        self.sublabel = Some(sublabel.into());
        self
    }

    /// Override the position used by narrow viewports.
    pub fn narrow(mut self, x: f64, y: f64) -> Self {
        self.position.narrow = Some(Point::new(x, y));
        self
    }

    /// Finish the node.
    pub fn build(self) -> Node<I> {
        Node {
            id: self.id,
            kind: self.kind,
            label: self.label,
            sublabel: self.sublabel,
            position: self.position,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/diagram/dsl.rs"]
mod tests;
