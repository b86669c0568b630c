//! Network — the canonical undirected graph every input shape is normalized
//! into before layout.
//!
//! Wraps a petgraph `UnGraph` plus a node-id index, in the same shape as a
//! layout IR: the petgraph graph for topology, the map for O(log n) lookup by
//! caller-visible id.

use std::collections::{BTreeMap, BTreeSet};

use petgraph::EdgeType;
use petgraph::graph::{Graph, IndexType, NodeIndex, UnGraph};

use super::types::NodeId;
use crate::error::{PlotError, Result};

// ─── Input shapes ─────────────────────────────────────────────────────────────

/// An opaque graph object that can enumerate its nodes and edges.
pub trait GraphSource {
    fn node_ids(&self) -> Vec<NodeId>;
    fn edge_pairs(&self) -> Vec<(NodeId, NodeId)>;
}

impl<N, E, Ty: EdgeType, Ix: IndexType> GraphSource for Graph<N, E, Ty, Ix> {
    fn node_ids(&self) -> Vec<NodeId> {
        self.node_indices().map(|idx| idx.index()).collect()
    }

    fn edge_pairs(&self) -> Vec<(NodeId, NodeId)> {
        self.edge_indices()
            .filter_map(|e| self.edge_endpoints(e))
            .map(|(a, b)| (a.index(), b.index()))
            .collect()
    }
}

/// Everything `graph()` accepts as data.
#[derive(Clone, Copy)]
pub enum GraphInput<'a> {
    /// A graph object.
    Graph(&'a dyn GraphSource),
    /// Square matrix; a non-zero entry in either triangle is an edge.
    Adjacency(&'a [Vec<f64>]),
    /// Rows of `[source, target]` node ids.
    EdgeList(&'a [Vec<f64>]),
}

impl<'a, G: GraphSource> From<&'a G> for GraphInput<'a> {
    fn from(g: &'a G) -> Self {
        GraphInput::Graph(g)
    }
}

// ─── Network ──────────────────────────────────────────────────────────────────

/// Canonical undirected graph. Parallel edges collapse into one.
#[derive(Debug, Clone, Default)]
pub struct Network {
    pub graph: UnGraph<NodeId, ()>,
    /// Maps node id → petgraph NodeIndex.
    pub node_index: BTreeMap<NodeId, NodeIndex>,
}

impl Network {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize any accepted input shape.
    pub fn from_input(input: GraphInput<'_>) -> Result<Self> {
        match input {
            GraphInput::Graph(source) => Ok(Self::from_source(source)),
            GraphInput::Adjacency(matrix) => Self::from_adjacency(matrix),
            GraphInput::EdgeList(rows) => Self::from_edge_list(rows),
        }
    }

    pub fn from_source(source: &dyn GraphSource) -> Self {
        let mut net = Network::new();
        for id in source.node_ids() {
            net.add_node(id);
        }
        for (a, b) in source.edge_pairs() {
            net.add_edge(a, b);
        }
        net
    }

    pub fn from_adjacency(matrix: &[Vec<f64>]) -> Result<Self> {
        let n = matrix.len();
        if let Some((row, cells)) = matrix.iter().enumerate().find(|(_, r)| r.len() != n) {
            return Err(PlotError::UnsupportedGraphInput(format!(
                "adjacency matrix must be square: row {row} has {} entries, expected {n}",
                cells.len()
            )));
        }
        if matrix.iter().flatten().any(|w| !w.is_finite()) {
            return Err(PlotError::UnsupportedGraphInput(
                "adjacency matrix contains non-finite weights".to_string(),
            ));
        }
        let mut net = Network::new();
        for id in 0..n {
            net.add_node(id);
        }
        for i in 0..n {
            for j in i..n {
                if matrix[i][j] != 0.0 || matrix[j][i] != 0.0 {
                    net.add_edge(i, j);
                }
            }
        }
        Ok(net)
    }

    pub fn from_edge_list(rows: &[Vec<f64>]) -> Result<Self> {
        let mut net = Network::new();
        for (i, row) in rows.iter().enumerate() {
            let [a, b] = row.as_slice() else {
                return Err(PlotError::UnsupportedGraphInput(format!(
                    "edge list row {i} has {} columns, expected 2",
                    row.len()
                )));
            };
            net.add_edge(as_node_id(*a, i)?, as_node_id(*b, i)?);
        }
        Ok(net)
    }

    // ── Mutation ─────────────────────────────────────────────────────────────

    /// Add a node. No-op if it already exists.
    pub fn add_node(&mut self, id: NodeId) -> NodeIndex {
        if let Some(&idx) = self.node_index.get(&id) {
            return idx;
        }
        let idx = self.graph.add_node(id);
        self.node_index.insert(id, idx);
        idx
    }

    /// Add an undirected edge, creating missing endpoints.
    pub fn add_edge(&mut self, a: NodeId, b: NodeId) {
        let ia = self.add_node(a);
        let ib = self.add_node(b);
        if self.graph.find_edge(ia, ib).is_none() {
            self.graph.add_edge(ia, ib, ());
        }
    }

    // ── Queries ──────────────────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.node_index.contains_key(&id)
    }

    pub fn contains_edge(&self, a: NodeId, b: NodeId) -> bool {
        match (self.node_index.get(&a), self.node_index.get(&b)) {
            (Some(&ia), Some(&ib)) => self.graph.find_edge(ia, ib).is_some(),
            _ => false,
        }
    }

    /// All node ids, ascending.
    pub fn nodes(&self) -> Vec<NodeId> {
        self.node_index.keys().copied().collect()
    }

    /// All edges as `(low, high)` pairs, sorted.
    pub fn edges(&self) -> Vec<(NodeId, NodeId)> {
        let mut edges: Vec<(NodeId, NodeId)> = self
            .graph
            .edge_indices()
            .filter_map(|e| self.graph.edge_endpoints(e))
            .map(|(a, b)| {
                let (a, b) = (self.graph[a], self.graph[b]);
                (a.min(b), a.max(b))
            })
            .collect();
        edges.sort_unstable();
        edges
    }

    /// Sorted neighbours of `id`; empty if the node is absent.
    pub fn neighbors(&self, id: NodeId) -> Vec<NodeId> {
        match self.node_index.get(&id) {
            None => vec![],
            Some(&idx) => {
                let mut result: Vec<NodeId> =
                    self.graph.neighbors(idx).map(|n| self.graph[n]).collect();
                result.sort_unstable();
                result.dedup();
                result
            }
        }
    }

    /// Number of incident edges; 0 if the node is absent.
    pub fn degree(&self, id: NodeId) -> usize {
        match self.node_index.get(&id) {
            None => 0,
            Some(&idx) => self.graph.edges(idx).count(),
        }
    }

    // ── Subsetting ───────────────────────────────────────────────────────────

    /// The part of the network to draw.
    ///
    /// - only `nodes`: the induced subgraph on those nodes
    /// - only `edges`: those edges and their endpoints
    /// - both: the given nodes plus the given edges among them
    /// - neither: a copy of the whole network
    pub fn restrict(
        &self,
        nodes: Option<&[NodeId]>,
        edges: Option<&[(NodeId, NodeId)]>,
    ) -> Result<Network> {
        if let Some(&missing) = nodes.into_iter().flatten().find(|&&n| !self.contains_node(n)) {
            return Err(PlotError::UnknownNode(missing));
        }
        if let Some(&(a, b)) = edges
            .into_iter()
            .flatten()
            .find(|&&(a, b)| !self.contains_edge(a, b))
        {
            return Err(PlotError::UnknownEdge(a, b));
        }

        let mut out = Network::new();
        match (nodes, edges) {
            (None, None) => return Ok(self.clone()),
            (Some(nodes), None) => {
                let keep: BTreeSet<NodeId> = nodes.iter().copied().collect();
                for &id in &keep {
                    out.add_node(id);
                }
                for (a, b) in self.edges() {
                    if keep.contains(&a) && keep.contains(&b) {
                        out.add_edge(a, b);
                    }
                }
            }
            (None, Some(edges)) => {
                for &(a, b) in edges {
                    out.add_edge(a.min(b), a.max(b));
                }
            }
            (Some(nodes), Some(edges)) => {
                let keep: BTreeSet<NodeId> = nodes.iter().copied().collect();
                for &id in &keep {
                    out.add_node(id);
                }
                for &(a, b) in edges {
                    if keep.contains(&a) && keep.contains(&b) {
                        out.add_edge(a.min(b), a.max(b));
                    }
                }
            }
        }
        Ok(out)
    }
}

impl GraphSource for Network {
    fn node_ids(&self) -> Vec<NodeId> {
        self.nodes()
    }

    fn edge_pairs(&self) -> Vec<(NodeId, NodeId)> {
        self.edges()
    }
}

// ─── Private helpers ──────────────────────────────────────────────────────────

fn as_node_id(value: f64, row: usize) -> Result<NodeId> {
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= u32::MAX as f64 {
        Ok(value as NodeId)
    } else {
        Err(PlotError::UnsupportedGraphInput(format!(
            "edge list row {row} holds '{value}', which is not a node id"
        )))
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
