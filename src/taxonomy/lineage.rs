use std::collections::BTreeSet;

use petgraph::graph::NodeIndex;
use serde::Serialize;
use tracing::debug;

use super::config::ParentPolicy;
use super::graph::ConceptGraph;
use super::TaxonomyError;
use crate::PATH_SEPARATOR;


/// What a concept inherits from its ancestors.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Lineage {
    pub depth: usize,
    pub path_label: String,
    pub vocabulary: BTreeSet<String>,
}


/// Lineage of every node, indexed like the graph. Built once, read-only afterwards.
#[derive(Debug, Clone)]
pub struct LineageTable {
    entries: Vec<Lineage>,
    max_depth: usize,
}

impl LineageTable {
    pub fn compute(graph: &ConceptGraph, policy: ParentPolicy) -> Result<Self, TaxonomyError> {
        let mut entries = vec![Lineage::default(); graph.len()];
        let mut max_depth = 0;

        for idx in graph.topological_order()? {
            let node = &graph[idx];
            let parents = graph.incoming_edges(idx);

            if policy == ParentPolicy::Strict && parents.len() > 1 {
                return Err(TaxonomyError::MultipleParents {
                    concept: node.id.clone(),
                    parents: parents.iter().map(|&p| graph[p].id.clone()).collect(),
                });
            }

            let lineage = match parents.first() {
                None => Lineage {
                    depth: 1,
                    path_label: node.label.clone(),
                    vocabulary: node.terms.clone(),
                },
                Some(&primary) => {
                    let inherited = &entries[primary.index()];
                    let mut vocabulary = inherited.vocabulary.clone();
                    vocabulary.extend(node.terms.iter().cloned());

                    for &other in &parents[1..] {
                        debug!(
                            "Merging vocabulary of secondary parent {} into {}",
                            graph[other].id, node.id
                        );
                        vocabulary.extend(entries[other.index()].vocabulary.iter().cloned());
                    }

                    Lineage {
                        depth: inherited.depth + 1,
                        path_label: format!("{}{}{}", inherited.path_label, PATH_SEPARATOR, node.label),
                        vocabulary,
                    }
                }
            };

            max_depth = max_depth.max(lineage.depth);
            entries[idx.index()] = lineage;
        }

        Ok(Self { entries, max_depth })
    }

    pub fn get(&self, idx: NodeIndex) -> &Lineage {
        &self.entries[idx.index()]
    }

    pub fn depth(&self, idx: NodeIndex) -> usize {
        self.entries[idx.index()].depth
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeIndex, &Lineage)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, lineage)| (NodeIndex::new(i), lineage))
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::models::ConceptRecord;

    fn chain() -> ConceptGraph {
        ConceptGraph::from_records(&[
            ConceptRecord::new("c", "Query Languages").with_broader("b"),
            ConceptRecord::new("a", "Information Systems"),
            ConceptRecord::new("b", "Data Management Systems")
                .with_alt_label("Databases")
                .with_broader("a"),
        ])
        .unwrap()
    }

    #[test]
    fn test_root_lineage() {
        let graph = chain();
        let table = LineageTable::compute(&graph, ParentPolicy::Merge).unwrap();
        let a = graph.find("a").unwrap();

        let lineage = table.get(a);
        assert_eq!(lineage.depth, 1);
        assert_eq!(lineage.path_label, graph[a].label);
        assert_eq!(lineage.vocabulary, graph[a].terms);
    }

    #[test]
    fn test_child_extends_parent() {
        let graph = chain();
        let table = LineageTable::compute(&graph, ParentPolicy::Merge).unwrap();

        for (idx, node) in graph.nodes() {
            let Some(parent) = graph.parent_of(idx) else { continue };
            let own = table.get(idx);
            let inherited = table.get(parent);

            assert_eq!(own.depth, inherited.depth + 1);
            assert_eq!(own.path_label, format!("{} -> {}", inherited.path_label, node.label));
            assert!(own.vocabulary.is_superset(&node.terms));
            assert!(own.vocabulary.is_superset(&inherited.vocabulary));
        }

        let c = graph.find("c").unwrap();
        assert_eq!(
            table.get(c).path_label,
            "information systems -> data management systems -> query languages"
        );
        assert!(table.get(c).vocabulary.contains("databases"));
        assert_eq!(table.max_depth(), 3);
    }

    #[test]
    fn test_strict_policy_rejects_multiple_parents() {
        let graph = ConceptGraph::from_records(&[
            ConceptRecord::new("p1", "Networks"),
            ConceptRecord::new("p2", "Security"),
            ConceptRecord::new("x", "Firewalls").with_broader("p1").with_broader("p2"),
        ])
        .unwrap();

        let err = LineageTable::compute(&graph, ParentPolicy::Strict).unwrap_err();
        assert!(matches!(
            err,
            TaxonomyError::MultipleParents { ref concept, ref parents }
                if concept == "x" && parents == &vec!["p1".to_string(), "p2".to_string()]
        ));
    }

    #[test]
    fn test_merge_policy_unions_every_parent() {
        let graph = ConceptGraph::from_records(&[
            ConceptRecord::new("p1", "Networks"),
            ConceptRecord::new("p2", "Security"),
            ConceptRecord::new("x", "Firewalls").with_broader("p1").with_broader("p2"),
        ])
        .unwrap();
        let table = LineageTable::compute(&graph, ParentPolicy::Merge).unwrap();
        let x = table.get(graph.find("x").unwrap());

        assert_eq!(x.depth, 2);
        assert_eq!(x.path_label, "networks -> firewalls");
        let vocabulary: Vec<&str> = x.vocabulary.iter().map(String::as_str).collect();
        assert_eq!(vocabulary, vec!["firewalls", "networks", "security"]);
    }
}
