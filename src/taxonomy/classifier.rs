use std::collections::BTreeSet;
use std::sync::Arc;

use petgraph::graph::NodeIndex;
use tracing::debug;

use super::config::RankingConfig;
use super::graph::ConceptGraph;
use super::lineage::LineageTable;
use super::normalize::TextNormalizer;
use super::statistics::CorpusStatistics;


struct IndexedConcept {
    node: NodeIndex,
    id: String,
    depth: usize,
    terms: BTreeSet<String>,
}


#[derive(Debug, Clone, PartialEq)]
pub struct ScoredConcept {
    pub node: NodeIndex,
    pub score: f64,
    pub matched_terms: Vec<String>,
}


/// `depth × |overlap| × (|overlap| × Σ idf(overlap))`
pub fn similarity_score(depth: usize, idf_sum: f64, overlap: usize) -> f64 {
    let overlap = overlap as f64;
    depth as f64 * overlap * (idf_sum * overlap)
}


/// Scores keyword sets against every concept of one taxonomy variant. The
/// normalized vocabulary of each concept is computed once at construction and
/// doubles as the IDF corpus.
pub struct ConceptClassifier {
    normalizer: Arc<dyn TextNormalizer>,
    concepts: Vec<IndexedConcept>,
    statistics: CorpusStatistics,
    ranking: RankingConfig,
}

impl ConceptClassifier {
    pub fn new(
        graph: &ConceptGraph,
        lineages: &LineageTable,
        normalizer: Arc<dyn TextNormalizer>,
        ranking: RankingConfig,
    ) -> Self {
        let concepts: Vec<IndexedConcept> = graph
            .nodes()
            .map(|(idx, node)| {
                let lineage = lineages.get(idx);
                let vocabulary: Vec<String> = lineage.vocabulary.iter().cloned().collect();
                IndexedConcept {
                    node: idx,
                    id: node.id.clone(),
                    depth: lineage.depth,
                    terms: normalizer.normalize(&vocabulary),
                }
            })
            .collect();

        let statistics = CorpusStatistics::from_documents(concepts.iter().map(|c| &c.terms));

        Self {
            normalizer,
            concepts,
            statistics,
            ranking,
        }
    }

    pub fn statistics(&self) -> &CorpusStatistics {
        &self.statistics
    }

    pub fn ranking(&self) -> &RankingConfig {
        &self.ranking
    }

    pub fn normalizer(&self) -> &Arc<dyn TextNormalizer> {
        &self.normalizer
    }

    pub fn normalized_terms(&self, node: NodeIndex) -> Option<&BTreeSet<String>> {
        self.concepts
            .iter()
            .find(|c| c.node == node)
            .map(|c| &c.terms)
    }

    pub fn normalize_keywords<I, S>(&self, keywords: I) -> BTreeSet<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords: Vec<String> = keywords
            .into_iter()
            .map(|k| k.as_ref().to_string())
            .collect();
        self.normalizer.normalize(&keywords)
    }

    /// Every concept with a positive score, best first. Ties go to the smaller id.
    pub fn rank<I, S>(&self, keywords: I) -> Vec<ScoredConcept>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let stemmed = self.normalize_keywords(keywords);
        if stemmed.is_empty() {
            debug!("No keywords left after normalization");
            return Vec::new();
        }

        let mut scored: Vec<(&IndexedConcept, ScoredConcept)> = self
            .concepts
            .iter()
            .filter_map(|concept| {
                let matched: Vec<String> = stemmed.intersection(&concept.terms).cloned().collect();
                if matched.is_empty() {
                    return None;
                }

                let idf_sum = self.statistics.idf_sum(&matched);
                let score = similarity_score(concept.depth, idf_sum, matched.len());
                if matched.len() > 1 {
                    debug!("{:?} => {:.4} for {}", matched, idf_sum * matched.len() as f64, concept.id);
                }
                if score <= 0.0 {
                    return None;
                }

                Some((
                    concept,
                    ScoredConcept {
                        node: concept.node,
                        score,
                        matched_terms: matched,
                    },
                ))
            })
            .collect();

        scored.sort_by(|(a, sa), (b, sb)| {
            sb.score
                .total_cmp(&sa.score)
                .then_with(|| a.id.cmp(&b.id))
        });

        for (concept, scored) in &scored {
            debug!("Similarity for {} => {:.4}", concept.id, scored.score);
        }

        scored.into_iter().map(|(_, s)| s).collect()
    }

    /// `rank`, truncated by the configured rule.
    pub fn get_matches<I, S>(&self, keywords: I) -> Vec<ScoredConcept>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut ranked = self.rank(keywords);
        let keep = self
            .ranking
            .truncation
            .keep(ranked.len(), self.ranking.max_results);
        ranked.truncate(keep);
        ranked
    }
}
