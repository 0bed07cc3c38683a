
pub mod classifier;
pub mod config;
pub mod graph;
pub mod lineage;
pub mod loader;
pub mod models;
pub mod normalize;
pub mod registry;
pub mod statistics;
pub mod variant;

pub use classifier::{ConceptClassifier, ScoredConcept, similarity_score};
pub use config::{ParentPolicy, RankingConfig, TruncationRule};
pub use graph::ConceptGraph;
pub use lineage::{Lineage, LineageTable};
pub use loader::{load_records, parse_records};
pub use models::{
    ClassificationQuery, ClassificationResult, ConceptDescriptor, ConceptMatch, ConceptNode,
    ConceptRecord, LabelStatus, Language, TaxonomyStats,
};
pub use normalize::{PlainNormalizer, SnowballNormalizer, TextNormalizer};
pub use registry::TaxonomyRegistry;
pub use statistics::CorpusStatistics;
pub use variant::{TaxonomyVariant, VariantOptions, VariantSource};
pub use petgraph::graph::NodeIndex;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TaxonomyError {
    #[error("Concept not found: {0}")]
    NotFound(String),
    #[error("Duplicate concept id: {0}")]
    DuplicateConcept(String),
    #[error("Concept {concept} references unknown broader concept {missing}")]
    UnknownConcept { concept: String, missing: String },
    #[error("Concept has no label: {0}")]
    MissingLabel(String),
    #[error("Concept {concept} has several broader concepts: {parents:?}")]
    MultipleParents { concept: String, parents: Vec<String> },
    #[error("Cycle through concept: {0}")]
    Cycle(String),
    #[error("Taxonomy has no concepts")]
    Empty,
    #[error("Normalizer language {found} does not match variant language {expected}")]
    LanguageMismatch { expected: Language, found: Language },
}
