use std::collections::HashMap;
use std::ops::Index;

use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use tracing::{debug, info};

use super::models::{ConceptNode, ConceptRecord};
use super::TaxonomyError;


/// Broader → narrower concept graph. Edge weights record declaration order, so
/// parent and child listings do not depend on petgraph's adjacency order.
#[derive(Debug, Clone, Default)]
pub struct ConceptGraph {
    graph: DiGraph<ConceptNode, u32>,
    index: HashMap<String, NodeIndex>,
}

impl ConceptGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Nodes first, edges second, so `broader` may point at a record that comes later.
    pub fn from_records(records: &[ConceptRecord]) -> Result<Self, TaxonomyError> {
        let mut graph = Self::new();

        for record in records {
            let node = ConceptNode::from_record(record)
                .ok_or_else(|| TaxonomyError::MissingLabel(record.id.clone()))?;
            graph.add_node(node)?;
        }

        for record in records {
            for parent_id in &record.broader {
                if !graph.index.contains_key(parent_id) {
                    return Err(TaxonomyError::UnknownConcept {
                        concept: record.id.clone(),
                        missing: parent_id.clone(),
                    });
                }
                graph.add_edge(parent_id, &record.id)?;
            }
        }

        graph.ensure_acyclic()?;

        info!(
            "Built concept graph: {} concepts, {} relations, {} roots",
            graph.len(),
            graph.edge_count(),
            graph.roots().len()
        );
        Ok(graph)
    }

    pub fn add_node(&mut self, node: ConceptNode) -> Result<NodeIndex, TaxonomyError> {
        if self.index.contains_key(&node.id) {
            return Err(TaxonomyError::DuplicateConcept(node.id));
        }
        let id = node.id.clone();
        let idx = self.graph.add_node(node);
        self.index.insert(id, idx);
        Ok(idx)
    }

    pub fn add_edge(&mut self, parent_id: &str, child_id: &str) -> Result<(), TaxonomyError> {
        let parent = self.require(parent_id)?;
        let child = self.require(child_id)?;

        if parent == child {
            return Err(TaxonomyError::Cycle(child_id.to_string()));
        }
        if self.graph.find_edge(parent, child).is_some() {
            debug!("Skipping repeated relation {} -> {}", parent_id, child_id);
            return Ok(());
        }

        let order = self.graph.edge_count() as u32;
        self.graph.add_edge(parent, child, order);
        Ok(())
    }

    fn require(&self, id: &str) -> Result<NodeIndex, TaxonomyError> {
        self.find(id)
            .ok_or_else(|| TaxonomyError::NotFound(id.to_string()))
    }

    pub fn ensure_acyclic(&self) -> Result<(), TaxonomyError> {
        self.topological_order().map(|_| ())
    }

    /// Every parent precedes its children.
    pub fn topological_order(&self) -> Result<Vec<NodeIndex>, TaxonomyError> {
        toposort(&self.graph, None)
            .map_err(|cycle| TaxonomyError::Cycle(self.graph[cycle.node_id()].id.clone()))
    }

    pub fn find(&self, id: &str) -> Option<NodeIndex> {
        self.index.get(id).copied()
    }

    pub fn get(&self, id: &str) -> Option<&ConceptNode> {
        self.find(id).map(|idx| &self.graph[idx])
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeIndex, &ConceptNode)> + '_ {
        self.graph.node_indices().map(move |idx| (idx, &self.graph[idx]))
    }

    /// Sources of the incoming edges of `idx`, in declaration order.
    pub fn incoming_edges(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        self.ordered_neighbors(idx, Direction::Incoming)
    }

    /// The first declared broader concept, `None` for a root.
    pub fn parent_of(&self, idx: NodeIndex) -> Option<NodeIndex> {
        self.graph
            .edges_directed(idx, Direction::Incoming)
            .min_by_key(|edge| *edge.weight())
            .map(|edge| edge.source())
    }

    pub fn children(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        self.ordered_neighbors(idx, Direction::Outgoing)
    }

    fn ordered_neighbors(&self, idx: NodeIndex, direction: Direction) -> Vec<NodeIndex> {
        let mut edges: Vec<(u32, NodeIndex)> = self
            .graph
            .edges_directed(idx, direction)
            .map(|edge| {
                let other = match direction {
                    Direction::Incoming => edge.source(),
                    Direction::Outgoing => edge.target(),
                };
                (*edge.weight(), other)
            })
            .collect();
        edges.sort_unstable();
        edges.into_iter().map(|(_, other)| other).collect()
    }

    /// Nodes without a broader concept, ordered by id.
    pub fn roots(&self) -> Vec<NodeIndex> {
        let mut roots: Vec<NodeIndex> = self
            .graph
            .node_indices()
            .filter(|&idx| {
                self.graph
                    .neighbors_directed(idx, Direction::Incoming)
                    .next()
                    .is_none()
            })
            .collect();
        roots.sort_by(|a, b| self.graph[*a].id.cmp(&self.graph[*b].id));
        roots
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}

impl Index<NodeIndex> for ConceptGraph {
    type Output = ConceptNode;

    fn index(&self, idx: NodeIndex) -> &ConceptNode {
        &self.graph[idx]
    }
}
