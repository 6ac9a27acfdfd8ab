use std::collections::HashMap;

use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::{Bfs, EdgeRef};
use petgraph::Direction;

use crate::model::{LayerId, ResetRule};

use super::error::TopologyError;

/// Directed edge along which a reset propagates: resetting `from` resets `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Branch {
    pub from: LayerId,
    pub to: LayerId,
}

impl Branch {
    pub fn new(from: LayerId, to: LayerId) -> Self {
        Self { from, to }
    }
}

/// Layer layout plus the reset-propagation graph.
///
/// The branch graph is checked for cycles once, here; resets rely on it
/// being acyclic and never re-check.
#[derive(Debug, Clone)]
pub struct Tree {
    rows: Vec<Vec<LayerId>>,
    graph: DiGraph<LayerId, ()>,
    nodes: HashMap<LayerId, NodeIndex>,
    on_reset: ResetRule,
}

impl Tree {
    pub fn new(
        rows: Vec<Vec<LayerId>>,
        branches: &[Branch],
        on_reset: ResetRule,
        layer_count: usize,
    ) -> Result<Self, TopologyError> {
        let mut graph = DiGraph::new();
        let mut nodes = HashMap::new();
        let mut node_for = |layer: LayerId| -> Result<NodeIndex, TopologyError> {
            if layer.index() >= layer_count {
                return Err(TopologyError::UnknownLayer(layer));
            }
            Ok(*nodes.entry(layer).or_insert_with(|| graph.add_node(layer)))
        };

        let mut edges = Vec::with_capacity(branches.len());
        for layer in rows.iter().flatten() {
            node_for(*layer)?;
        }
        for branch in branches {
            edges.push((node_for(branch.from)?, node_for(branch.to)?));
        }
        for layer in &on_reset.layers {
            if layer.index() >= layer_count {
                return Err(TopologyError::UnknownLayer(*layer));
            }
        }
        for (from, to) in edges {
            graph.update_edge(from, to, ());
        }

        toposort(&graph, None).map_err(|cycle| TopologyError::Cycle(graph[cycle.node_id()]))?;

        Ok(Self {
            rows,
            graph,
            nodes,
            on_reset,
        })
    }

    pub fn rows(&self) -> &[Vec<LayerId>] {
        &self.rows
    }

    pub fn on_reset(&self) -> &ResetRule {
        &self.on_reset
    }

    pub fn branches(&self) -> Vec<Branch> {
        let mut branches = self
            .graph
            .edge_references()
            .map(|edge| Branch::new(self.graph[edge.source()], self.graph[edge.target()]))
            .collect::<Vec<_>>();
        branches.sort_by_key(|branch| (branch.from, branch.to));
        branches
    }

    /// Direct branch targets of `layer`, in id order.
    pub fn children(&self, layer: LayerId) -> Vec<LayerId> {
        let Some(&node) = self.nodes.get(&layer) else {
            return Vec::new();
        };
        let mut children = self
            .graph
            .neighbors_directed(node, Direction::Outgoing)
            .map(|child| self.graph[child])
            .collect::<Vec<_>>();
        children.sort();
        children
    }

    /// Every layer reachable through outgoing branches, excluding `layer`.
    pub fn descendants(&self, layer: LayerId) -> Vec<LayerId> {
        let Some(&start) = self.nodes.get(&layer) else {
            return Vec::new();
        };
        let mut bfs = Bfs::new(&self.graph, start);
        let mut out = Vec::new();
        while let Some(node) = bfs.next(&self.graph) {
            if node != start {
                out.push(self.graph[node]);
            }
        }
        out.sort();
        out
    }
}

#[cfg(test)]
mod tests {
    use super::{Branch, Tree};
    use crate::core::TopologyError;
    use crate::model::{LayerId, ResetRule};

    const V: LayerId = LayerId(1);
    const L: LayerId = LayerId(2);
    const IQ: LayerId = LayerId(3);
    const A: LayerId = LayerId(4);

    #[test]
    fn descendants_follow_outgoing_branches_only() {
        let tree = Tree::new(
            vec![vec![V], vec![L, IQ]],
            &[Branch::new(L, V), Branch::new(IQ, L)],
            ResetRule::default(),
            5,
        )
        .expect("acyclic tree");

        assert_eq!(tree.children(IQ), vec![L]);
        assert_eq!(tree.descendants(IQ), vec![V, L]);
        assert_eq!(tree.descendants(L), vec![V]);
        assert!(tree.descendants(V).is_empty());
        assert!(tree.descendants(A).is_empty());
        assert_eq!(tree.branches().len(), 2);
        assert_eq!(tree.rows().to_vec(), vec![vec![V], vec![L, IQ]]);
    }

    #[test]
    fn cycles_are_rejected_at_construction() {
        let result = Tree::new(
            vec![vec![V, L]],
            &[Branch::new(L, V), Branch::new(V, IQ), Branch::new(IQ, L)],
            ResetRule::default(),
            5,
        );

        assert!(matches!(result, Err(TopologyError::Cycle(_))));
    }

    #[test]
    fn self_loops_are_cycles() {
        let result = Tree::new(vec![vec![V]], &[Branch::new(V, V)], ResetRule::default(), 5);

        assert_eq!(result.err(), Some(TopologyError::Cycle(V)));
    }

    #[test]
    fn unknown_layers_are_rejected() {
        let result = Tree::new(vec![vec![LayerId(9)]], &[], ResetRule::default(), 5);

        assert_eq!(result.err(), Some(TopologyError::UnknownLayer(LayerId(9))));
    }
}
