use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use petgraph::graph::NodeIndex;
use serde::Serialize;
use tracing::{info, warn};

use super::classifier::ConceptClassifier;
use super::config::{ParentPolicy, RankingConfig};
use super::graph::ConceptGraph;
use super::lineage::{Lineage, LineageTable};
use super::models::{ConceptDescriptor, ConceptMatch, ConceptRecord, Language, TaxonomyStats};
use super::normalize::TextNormalizer;
use super::statistics::CorpusStatistics;
use super::TaxonomyError;
use crate::translation::CachedTranslator;
use crate::utils::safe_truncate_ellipsis;


#[derive(Debug, Clone, Default)]
pub struct VariantOptions {
    pub ranking: RankingConfig,
    pub parent_policy: ParentPolicy,
}


#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase", tag = "kind")]
pub enum VariantSource {
    Authored,
    Translated { from: Language },
}


/// One language's complete taxonomy: graph, lineages, IDF table and classifier.
/// Immutable once built; share it behind an `Arc` for concurrent queries.
pub struct TaxonomyVariant {
    language: Language,
    source: VariantSource,
    graph: ConceptGraph,
    lineages: LineageTable,
    classifier: ConceptClassifier,
    unresolved: BTreeSet<String>,
}

impl TaxonomyVariant {
    /// Variant over the labels as authored. The normalizer decides the language.
    pub fn build(
        records: &[ConceptRecord],
        normalizer: Arc<dyn TextNormalizer>,
        options: &VariantOptions,
    ) -> Result<Self, TaxonomyError> {
        Self::assemble(
            VariantSource::Authored,
            records,
            normalizer,
            options,
            BTreeSet::new(),
        )
    }

    /// Variant over labels translated by `translator`. Labels without a
    /// translation keep their source text and are listed by `unresolved_labels`.
    pub async fn build_translated(
        records: &[ConceptRecord],
        translator: &CachedTranslator,
        normalizer: Arc<dyn TextNormalizer>,
        options: &VariantOptions,
    ) -> Result<Self, TaxonomyError> {
        if normalizer.language() != translator.target() {
            return Err(TaxonomyError::LanguageMismatch {
                expected: translator.target(),
                found: normalizer.language(),
            });
        }

        let translated = translator.translate_records(records).await;
        if !translated.unresolved.is_empty() {
            let sample: Vec<&str> = translated
                .unresolved
                .iter()
                .take(5)
                .map(String::as_str)
                .collect();
            warn!(
                "{} labels have no {} translation, e.g. {}",
                translated.unresolved.len(),
                translator.target(),
                safe_truncate_ellipsis(&sample.join(", "), 120)
            );
        }

        Self::assemble(
            VariantSource::Translated {
                from: translator.source(),
            },
            &translated.records,
            normalizer,
            options,
            translated.unresolved,
        )
    }

    fn assemble(
        source: VariantSource,
        records: &[ConceptRecord],
        normalizer: Arc<dyn TextNormalizer>,
        options: &VariantOptions,
        unresolved: BTreeSet<String>,
    ) -> Result<Self, TaxonomyError> {
        if records.is_empty() {
            return Err(TaxonomyError::Empty);
        }

        let language = normalizer.language();
        let graph = ConceptGraph::from_records(records)?;
        let lineages = LineageTable::compute(&graph, options.parent_policy)?;
        let classifier =
            ConceptClassifier::new(&graph, &lineages, normalizer, options.ranking.clone());

        info!(
            "Taxonomy variant '{}' ready: {} concepts, depth {}, {} terms",
            language,
            graph.len(),
            lineages.max_depth(),
            classifier.statistics().vocabulary_size()
        );

        Ok(Self {
            language,
            source,
            graph,
            lineages,
            classifier,
            unresolved,
        })
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn source(&self) -> VariantSource {
        self.source
    }

    pub fn graph(&self) -> &ConceptGraph {
        &self.graph
    }

    pub fn lineage(&self, idx: NodeIndex) -> &Lineage {
        self.lineages.get(idx)
    }

    pub fn statistics(&self) -> &CorpusStatistics {
        self.classifier.statistics()
    }

    pub fn classifier(&self) -> &ConceptClassifier {
        &self.classifier
    }

    pub fn unresolved_labels(&self) -> &BTreeSet<String> {
        &self.unresolved
    }

    pub fn descriptor(&self, idx: NodeIndex) -> ConceptDescriptor {
        let node = &self.graph[idx];
        let lineage = self.lineages.get(idx);
        ConceptDescriptor {
            id: node.id.clone(),
            label: node.label.clone(),
            path_label: lineage.path_label.clone(),
            vocabulary: lineage.vocabulary.clone(),
            depth: lineage.depth,
            label_status: node.label_status,
        }
    }

    pub fn concept(&self, id: &str) -> Option<ConceptDescriptor> {
        self.graph.find(id).map(|idx| self.descriptor(idx))
    }

    pub fn classify<I, S>(&self, keywords: I) -> Vec<ConceptMatch>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.classifier
            .get_matches(keywords)
            .into_iter()
            .map(|scored| ConceptMatch {
                concept: self.descriptor(scored.node),
                score: scored.score,
                matched_terms: scored.matched_terms,
            })
            .collect()
    }

    pub fn stats(&self) -> TaxonomyStats {
        TaxonomyStats {
            language: self.language,
            total_concepts: self.graph.len(),
            total_relations: self.graph.edge_count(),
            roots: self.graph.roots().len(),
            max_depth: self.lineages.max_depth(),
            vocabulary_size: self.statistics().vocabulary_size(),
            unresolved_labels: self.unresolved.len(),
        }
    }

    /// One line per concept, own terms in brackets, tab-indented under the
    /// parent it is printed beneath. Concepts reachable through several
    /// parents are listed once, under the first one the walk reaches.
    pub fn render_tree(&self) -> String {
        let mut output = String::new();
        let mut visited: HashSet<NodeIndex> = HashSet::new();

        for root in self.graph.roots() {
            let mut stack = vec![(root, 0)];
            while let Some((idx, level)) = stack.pop() {
                if !visited.insert(idx) {
                    continue;
                }

                let node = &self.graph[idx];
                let terms: Vec<&str> = node.terms.iter().map(String::as_str).collect();
                output.push_str(&format!("{}{}[{}]\n", "\t".repeat(level), node.label, terms.join(",")));

                stack.extend(
                    self.graph
                        .children(idx)
                        .into_iter()
                        .rev()
                        .map(|child| (child, level + 1)),
                );
            }
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::config::TruncationRule;
    use crate::taxonomy::models::LabelStatus;
    use crate::taxonomy::normalize::{PlainNormalizer, SnowballNormalizer};
    use crate::translation::cached::tests::DictionaryTranslator;
    use crate::translation::TranslationCache;

    fn records() -> Vec<ConceptRecord> {
        vec![
            ConceptRecord::new("is", "Information systems"),
            ConceptRecord::new("dms", "Data management systems")
                .with_alt_label("Database systems")
                .with_broader("is"),
            ConceptRecord::new("ql", "Query languages").with_broader("dms"),
            ConceptRecord::new("net", "Networks"),
            ConceptRecord::new("sec", "Network security").with_broader("net"),
        ]
    }

    fn plain() -> Arc<dyn TextNormalizer> {
        Arc::new(PlainNormalizer::new(Language::English, ["of", "and"]))
    }

    #[test]
    fn test_descriptors() {
        let variant = TaxonomyVariant::build(&records(), plain(), &VariantOptions::default()).unwrap();
        let ql = variant.concept("ql").unwrap();

        assert_eq!(ql.label, "query languages");
        assert_eq!(ql.depth, 3);
        assert_eq!(
            ql.path_label,
            "information systems -> data management systems -> query languages"
        );
        assert!(ql.vocabulary.contains("database"));
        assert_eq!(ql.label_status, LabelStatus::Authored);
        assert!(variant.concept("missing").is_none());
    }

    #[test]
    fn test_classify_returns_descriptors() {
        let variant = TaxonomyVariant::build(&records(), plain(), &VariantOptions::default()).unwrap();
        let matches = variant.classify(["query", "database"]);

        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].concept.id, "ql");
        assert_eq!(matches[1].concept.id, "dms");
        assert!(matches[0].score > matches[1].score);
    }

    #[test]
    fn test_literal_rule_drops_single_match() {
        let options = VariantOptions {
            ranking: RankingConfig {
                max_results: 2,
                truncation: TruncationRule::Literal,
            },
            ..Default::default()
        };
        let variant = TaxonomyVariant::build(&records(), plain(), &options).unwrap();
        assert!(variant.classify(["security"]).is_empty());

        let variant = TaxonomyVariant::build(&records(), plain(), &VariantOptions::default()).unwrap();
        assert_eq!(variant.classify(["security"])[0].concept.id, "sec");
    }

    #[test]
    fn test_empty_taxonomy_is_fatal() {
        assert!(matches!(
            TaxonomyVariant::build(&[], plain(), &VariantOptions::default()),
            Err(TaxonomyError::Empty)
        ));
    }

    #[test]
    fn test_stats_and_tree() {
        let variant = TaxonomyVariant::build(&records(), plain(), &VariantOptions::default()).unwrap();
        let stats = variant.stats();
        assert_eq!(stats.total_concepts, 5);
        assert_eq!(stats.total_relations, 3);
        assert_eq!(stats.roots, 2);
        assert_eq!(stats.max_depth, 3);
        assert_eq!(stats.unresolved_labels, 0);

        let tree = variant.render_tree();
        let lines: Vec<&str> = tree.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "information systems[information,systems]");
        assert_eq!(lines[1], "\tdata management systems[data,database,management,systems]");
        assert_eq!(lines[2], "\t\tquery languages[languages,query]");
        assert_eq!(lines[3], "networks[networks]");
        assert_eq!(lines[4], "\tnetwork security[network,security]");
    }

    #[test]
    fn test_tree_indents_shared_concept_under_printed_parent() {
        let records = vec![
            ConceptRecord::new("a", "A"),
            ConceptRecord::new("b", "B").with_broader("a"),
            ConceptRecord::new("x", "X").with_broader("z").with_broader("b"),
            ConceptRecord::new("z", "Z"),
        ];
        let variant = TaxonomyVariant::build(&records, plain(), &VariantOptions::default()).unwrap();

        assert_eq!(variant.concept("x").unwrap().depth, 2);
        let tree = variant.render_tree();
        assert_eq!(
            tree.lines().collect::<Vec<_>>(),
            vec!["a[a]", "\tb[b]", "\t\tx[x]", "z[z]"]
        );
    }

    #[test]
    fn test_english_snowball_keeps_domain_vocabulary() {
        let records = vec![
            ConceptRecord::new("A", "system"),
            ConceptRecord::new("B", "database").with_alt_label("system").with_broader("A"),
            ConceptRecord::new("C", "query").with_broader("B"),
        ];
        let normalizer = Arc::new(SnowballNormalizer::new(Language::English));
        let system = normalizer.stem("system");
        let database = normalizer.stem("database");

        let keywords: Vec<String> = ["system", "database"].iter().map(|w| w.to_string()).collect();
        let normalized = normalizer.normalize(&keywords);
        assert_eq!(normalized.len(), 2);
        assert!(normalized.contains(&system));

        let variant = TaxonomyVariant::build(&records, normalizer, &VariantOptions::default()).unwrap();
        let a = variant.graph().find("A").unwrap();
        assert!(variant.classifier().normalized_terms(a).unwrap().contains(&system));

        let matches = variant.classify(["system", "database"]);
        let ids: Vec<&str> = matches.iter().map(|m| m.concept.id.as_str()).collect();
        assert_eq!(ids, vec!["C", "B"]);
        for m in &matches {
            assert_eq!(m.matched_terms, vec![database.clone(), system.clone()]);
        }

        let ln15 = (1.5f64).ln();
        assert!((matches[0].score - 3.0 * 2.0 * (ln15 * 2.0)).abs() < 1e-9);
        assert!((matches[1].score - 2.0 * 2.0 * (ln15 * 2.0)).abs() < 1e-9);
    }

    #[test]
    fn test_portuguese_snowball_keeps_sistema() {
        let records = vec![
            ConceptRecord::new("a", "Sistema de informação"),
            ConceptRecord::new("b", "Banco de dados").with_broader("a"),
            ConceptRecord::new("c", "Linguagens de consulta").with_broader("b"),
        ];
        let normalizer = Arc::new(SnowballNormalizer::new(Language::Portuguese));
        let sistema = normalizer.stem("sistema");
        let consulta = normalizer.stem("consulta");
        assert_eq!(
            normalizer.remove_stopwords(&["sistema de consulta".to_string()]),
            vec!["sistema", "consulta"]
        );

        let variant = TaxonomyVariant::build(&records, normalizer, &VariantOptions::default()).unwrap();
        let a = variant.graph().find("a").unwrap();
        assert!(variant.classifier().normalized_terms(a).unwrap().contains(&sistema));

        let matches = variant.classify(["sistema", "consulta"]);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].concept.id, "c");
        assert!(matches[0].matched_terms.contains(&sistema));
        assert!(matches[0].matched_terms.contains(&consulta));
    }

    #[test]
    fn test_concurrent_classification() {
        let variant = Arc::new(
            TaxonomyVariant::build(&records(), plain(), &VariantOptions::default()).unwrap(),
        );
        let expected = variant.classify(["network", "security"]);

        std::thread::scope(|scope| {
            for _ in 0..4 {
                let variant = Arc::clone(&variant);
                let expected = &expected;
                scope.spawn(move || {
                    for _ in 0..50 {
                        let matches = variant.classify(["security", "network"]);
                        assert_eq!(matches.len(), expected.len());
                        assert_eq!(matches[0].concept, expected[0].concept);
                    }
                });
            }
        });
    }

    #[tokio::test]
    async fn test_translated_variant_tracks_unresolved_labels() {
        let provider = Arc::new(DictionaryTranslator::new(&[
            ("Information systems", "Sistemas de informação"),
            ("Data management systems", "Sistemas de gerenciamento de dados"),
            ("Database systems", "Sistemas de banco de dados"),
            ("Query languages", "Linguagens de consulta"),
            ("Networks", "Redes"),
        ]));
        let translator = CachedTranslator::new(
            Some(provider),
            TranslationCache::new(),
            Language::English,
            Language::Portuguese,
        );
        let normalizer = Arc::new(SnowballNormalizer::new(Language::Portuguese));

        let variant = TaxonomyVariant::build_translated(
            &records(),
            &translator,
            normalizer,
            &VariantOptions::default(),
        )
        .await
        .unwrap();

        assert_eq!(variant.language(), Language::Portuguese);
        assert_eq!(
            variant.source(),
            VariantSource::Translated { from: Language::English }
        );
        assert_eq!(
            variant.unresolved_labels().iter().collect::<Vec<_>>(),
            vec!["Network security"]
        );

        let sec = variant.concept("sec").unwrap();
        assert_eq!(sec.label, "network security");
        assert_eq!(sec.label_status, LabelStatus::Untranslated);
        assert_eq!(sec.path_label, "redes -> network security");

        let ql = variant.concept("ql").unwrap();
        assert_eq!(ql.label_status, LabelStatus::Translated);
        assert_eq!(ql.label, "linguagens de consulta");

        let matches = variant.classify(["consulta"]);
        assert_eq!(matches[0].concept.id, "ql");
        assert_eq!(variant.classify(["security"])[0].concept.id, "sec");
    }

    #[tokio::test]
    async fn test_translated_variant_without_provider_is_constructible() {
        let translator = CachedTranslator::new(
            None,
            TranslationCache::new(),
            Language::English,
            Language::Portuguese,
        );
        let variant = TaxonomyVariant::build_translated(
            &records(),
            &translator,
            Arc::new(SnowballNormalizer::new(Language::Portuguese)),
            &VariantOptions::default(),
        )
        .await
        .unwrap();

        assert_eq!(variant.stats().unresolved_labels, 6);
        assert!(variant.graph().nodes().all(|(_, n)| n.label_status == LabelStatus::Untranslated));
    }

    #[tokio::test]
    async fn test_translated_variant_language_mismatch() {
        let translator = CachedTranslator::new(
            None,
            TranslationCache::new(),
            Language::English,
            Language::Portuguese,
        );
        let result =
            TaxonomyVariant::build_translated(&records(), &translator, plain(), &VariantOptions::default())
                .await;
        assert!(matches!(result, Err(TaxonomyError::LanguageMismatch { .. })));
    }
}
