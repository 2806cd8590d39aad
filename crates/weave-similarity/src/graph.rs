//! Undirected neighbor graph over patterns.
//!
//! Two patterns are neighbors when some relationship references both of them
//! with strength strictly above the configured floor. Edges carry the
//! strongest such relationship's strength.

use petgraph::graph::{NodeIndex, UnGraph};

use weave_core::models::Relationship;
use weave_core::{FxHashMap, FxHashSet, PatternId};

pub struct NeighborGraph {
    graph: UnGraph<PatternId, f64>,
    index: FxHashMap<PatternId, NodeIndex>,
}

impl NeighborGraph {
    /// One node per id, in the given order, so node index `i` is the `i`-th id.
    pub fn build<'a, R>(ids: &[PatternId], relationships: R, strength_floor: f64) -> Self
    where
        R: IntoIterator<Item = &'a Relationship>,
    {
        let mut graph: UnGraph<PatternId, f64> = UnGraph::with_capacity(ids.len(), 0);
        let mut index = FxHashMap::default();
        for id in ids {
            let node = graph.add_node(id.clone());
            index.insert(id.clone(), node);
        }

        for relationship in relationships {
            if relationship.strength <= strength_floor {
                continue;
            }
            // References to patterns outside the set contribute nothing.
            let nodes: Vec<NodeIndex> = relationship
                .references()
                .filter_map(|(_, id)| index.get(id).copied())
                .collect();
            for (i, &a) in nodes.iter().enumerate() {
                for &b in &nodes[i + 1..] {
                    match graph.find_edge(a, b) {
                        Some(edge) => {
                            if let Some(weight) = graph.edge_weight_mut(edge) {
                                *weight = weight.max(relationship.strength);
                            }
                        }
                        None => {
                            graph.add_edge(a, b, relationship.strength);
                        }
                    }
                }
            }
        }

        Self { graph, index }
    }

    pub fn node(&self, id: &PatternId) -> Option<NodeIndex> {
        self.index.get(id).copied()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Neighbor ids of `id`, unordered. Empty for unknown ids.
    pub fn neighbors(&self, id: &PatternId) -> Vec<&PatternId> {
        let Some(node) = self.node(id) else {
            return Vec::new();
        };
        self.graph
            .neighbors(node)
            .filter_map(|n| self.graph.node_weight(n))
            .collect()
    }

    /// Neighbor sets by node index, for scoring.
    pub(crate) fn neighbor_sets(&self) -> Vec<FxHashSet<usize>> {
        self.graph
            .node_indices()
            .map(|node| self.graph.neighbors(node).map(NodeIndex::index).collect())
            .collect()
    }

    /// Strength of the edge between `a` and `b`, if they are neighbors.
    pub fn link_strength(&self, a: &PatternId, b: &PatternId) -> Option<f64> {
        let edge = self.graph.find_edge(self.node(a)?, self.node(b)?)?;
        self.graph.edge_weight(edge).copied()
    }
}
