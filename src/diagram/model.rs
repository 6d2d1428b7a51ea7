use std::collections::BTreeSet;
use std::fmt;

use crate::foundation::core::{Point, ViewportClass};
use crate::foundation::error::{FlowreelError, FlowreelResult};

/// Requirements for a node identifier.
///
/// Ids are compared and ordered (state sets are `BTreeSet`s so traces are deterministic) and
/// displayed in diagnostics. `String` and small integers both qualify.
pub trait NodeKey: Clone + Ord + fmt::Debug + fmt::Display {}

impl<T> NodeKey for T where T: Clone + Ord + fmt::Debug + fmt::Display {}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// Cosmetic node category. Affects drawing only, never sequencing.
pub enum NodeKind {
    /// Input/output endpoints.
    #[default]
    Primary,
    /// The orchestrating agent.
    Agent,
    /// Backing services (LLM, stores, tools).
    Service,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Percentage-based layout coordinates per viewport class.
pub struct NodePosition {
    /// Position used on wide viewports.
    pub wide: Point,
    /// Position used on narrow viewports; falls back to `wide`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub narrow: Option<Point>,
}

impl NodePosition {
    /// Same position for every viewport class.
    pub fn fixed(x: f64, y: f64) -> Self {
        Self {
            wide: Point::new(x, y),
            narrow: None,
        }
    }

    /// Resolve for a viewport class.
    pub fn for_viewport(&self, viewport: ViewportClass) -> Point {
        match viewport {
            ViewportClass::Wide => self.wide,
            ViewportClass::Narrow => self.narrow.unwrap_or(self.wide),
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(bound(
    serialize = "I: serde::Serialize",
    deserialize = "I: serde::Deserialize<'de>"
))]
/// One labeled point in a diagram.
pub struct Node<I> {
    /// Unique id within the diagram.
    pub id: I,
    /// Cosmetic category.
    #[serde(default)]
    pub kind: NodeKind,
    /// Main caption.
    pub label: String,
    /// Secondary caption drawn under the label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sublabel: Option<String>,
    /// Layout coordinates.
    pub position: NodePosition,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// Cosmetic connector style.
pub enum EdgeStyle {
    /// Main data path.
    #[default]
    Solid,
    /// Auxiliary/service call.
    Dashed,
}

#[derive(
    Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
/// Identity of an edge, derived from its endpoints.
pub struct EdgeKey<I> {
    /// Source node id.
    pub from: I,
    /// Target node id.
    pub to: I,
}

impl<I> EdgeKey<I> {
    /// Key for the connector `from -> to`.
    pub fn new(from: I, to: I) -> Self {
        Self { from, to }
    }
}

impl<I: fmt::Display> fmt::Display for EdgeKey<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.from, self.to)
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(bound(
    serialize = "I: serde::Serialize",
    deserialize = "I: serde::Deserialize<'de>"
))]
/// Directed connector between two node ids. Endpoints are resolved at draw time.
pub struct Edge<I> {
    /// Source node id.
    pub from: I,
    /// Target node id.
    pub to: I,
    /// Cosmetic style.
    #[serde(default)]
    pub style: EdgeStyle,
}

impl<I: Clone> Edge<I> {
    /// The edge's key.
    pub fn key(&self) -> EdgeKey<I> {
        EdgeKey::new(self.from.clone(), self.to.clone())
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(bound(
    serialize = "I: serde::Serialize",
    deserialize = "I: serde::Deserialize<'de>"
))]
/// Static node and edge tables of one widget.
pub struct Diagram<I> {
    /// Nodes in drawing order.
    pub nodes: Vec<Node<I>>,
    /// Connectors in drawing order.
    pub edges: Vec<Edge<I>>,
}

impl<I> Default for Diagram<I> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }
}

impl<I: NodeKey> Diagram<I> {
    /// Reject structurally invalid tables (duplicate node ids or edges).
    ///
    /// Edges pointing at unknown nodes are not rejected here; see
    /// [`Diagram::dangling_edges`].
    pub fn validate(&self) -> FlowreelResult<()> {
        let mut seen = BTreeSet::new();
        for node in &self.nodes {
            if !seen.insert(&node.id) {
                return Err(FlowreelError::validation(format!(
                    "duplicate node id '{}'",
                    node.id
                )));
            }
        }

        let mut keys = BTreeSet::new();
        for edge in &self.edges {
            let key = edge.key();
            if keys.contains(&key) {
                return Err(FlowreelError::validation(format!(
                    "duplicate edge '{key}'"
                )));
            }
            keys.insert(key);
        }
        Ok(())
    }

    /// Look up a node by id.
    pub fn node(&self, id: &I) -> Option<&Node<I>> {
        self.nodes.iter().find(|n| &n.id == id)
    }

    /// Whether a node with `id` exists.
    pub fn contains_node(&self, id: &I) -> bool {
        self.node(id).is_some()
    }

    /// Whether an edge with `key` exists.
    pub fn contains_edge(&self, key: &EdgeKey<I>) -> bool {
        self.edges
            .iter()
            .any(|e| e.from == key.from && e.to == key.to)
    }

    /// Edges with at least one endpoint missing from the node table.
    pub fn dangling_edges(&self) -> impl Iterator<Item = &Edge<I>> + '_ {
        self.edges
            .iter()
            .filter(|e| !self.contains_node(&e.from) || !self.contains_node(&e.to))
    }
}
