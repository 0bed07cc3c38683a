use std::collections::{BTreeSet, HashMap};

use tracing::info;


/// Inverse document frequency over normalized concept vocabularies. One
/// document per concept.
#[derive(Debug, Clone, Default)]
pub struct CorpusStatistics {
    document_frequency: HashMap<String, usize>,
    idf: HashMap<String, f64>,
    corpus_size: usize,
}

impl CorpusStatistics {
    pub fn from_documents<'a, I>(documents: I) -> Self
    where
        I: IntoIterator<Item = &'a BTreeSet<String>>,
    {
        let mut document_frequency: HashMap<String, usize> = HashMap::new();
        let mut corpus_size = 0;

        for document in documents {
            corpus_size += 1;
            for term in document {
                *document_frequency.entry(term.clone()).or_default() += 1;
            }
        }

        let idf = document_frequency
            .iter()
            .map(|(term, &df)| (term.clone(), (corpus_size as f64 / df as f64).ln()))
            .collect();

        info!(
            "Built IDF table: {} terms over {} documents",
            document_frequency.len(),
            corpus_size
        );

        Self {
            document_frequency,
            idf,
            corpus_size,
        }
    }

    pub fn idf(&self, term: &str) -> Option<f64> {
        self.idf.get(term).copied()
    }

    /// Sum of the idf of `terms`; unknown terms weigh nothing.
    pub fn idf_sum<'a, I>(&self, terms: I) -> f64
    where
        I: IntoIterator<Item = &'a String>,
    {
        terms
            .into_iter()
            .map(|term| self.idf(term).unwrap_or(0.0))
            .sum()
    }

    pub fn document_frequency(&self, term: &str) -> usize {
        self.document_frequency.get(term).copied().unwrap_or(0)
    }

    pub fn corpus_size(&self) -> usize {
        self.corpus_size
    }

    pub fn vocabulary_size(&self) -> usize {
        self.idf.len()
    }
}
