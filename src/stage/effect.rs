use crate::diagram::model::EdgeKey;

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
#[serde(bound(
    serialize = "I: serde::Serialize",
    deserialize = "I: serde::Deserialize<'de>"
))]
/// A single state mutation. Every change is idempotent: applying it twice equals applying it
/// once, so replaying a stage table from a clean state always lands on the same state.
pub enum Change<I> {
    /// Make `id` the active node.
    ActivateNode(I),
    /// No node is active.
    ClearActiveNode,
    /// Add nodes to the completed set.
    CompleteNodes(Vec<I>),
    /// Replace the set of nodes shown as processing.
    SetProcessing(Vec<I>),
    /// Replace the set of active (animating) edges.
    ActivateEdges(Vec<EdgeKey<I>>),
    /// Add edges to the completed set.
    CompleteEdges(Vec<EdgeKey<I>>),
    /// Set the phase caption. An empty string clears it.
    Label(String),
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
#[serde(bound(
    serialize = "I: serde::Serialize",
    deserialize = "I: serde::Deserialize<'de>"
))]
/// Ordered list of changes applied together when a stage fires.
pub struct Effect<I>(pub Vec<Change<I>>);

impl<I> Default for Effect<I> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<I> Effect<I> {
    /// Empty effect.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a change.
    pub fn with(mut self, change: Change<I>) -> Self {
        self.0.push(change);
        self
    }

    /// Changes in application order.
    pub fn changes(&self) -> &[Change<I>] {
        &self.0
    }

    /// Node ids referenced by this effect.
    pub fn node_refs(&self) -> impl Iterator<Item = &I> + '_ {
        self.0.iter().flat_map(change_nodes)
    }

    /// Edge keys referenced by this effect.
    pub fn edge_refs(&self) -> impl Iterator<Item = &EdgeKey<I>> + '_ {
        self.0.iter().flat_map(change_edges)
    }
}

fn change_nodes<I>(change: &Change<I>) -> &[I] {
    match change {
        Change::ActivateNode(id) => std::slice::from_ref(id),
        Change::CompleteNodes(ids) | Change::SetProcessing(ids) => ids,
        _ => &[],
    }
}

fn change_edges<I>(change: &Change<I>) -> &[EdgeKey<I>] {
    match change {
        Change::ActivateEdges(keys) | Change::CompleteEdges(keys) => keys,
        _ => &[],
    }
}

/// Shorthand for building an [`EdgeKey`] list from `(from, to)` pairs.
pub fn edges<I: Clone>(pairs: &[(I, I)]) -> Vec<EdgeKey<I>> {
    pairs
        .iter()
        .map(|(from, to)| EdgeKey::new(from.clone(), to.clone()))
        .collect()
}
