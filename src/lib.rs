

pub mod core;
pub mod taxonomy;
pub mod translation;
pub mod utils;

pub use utils::{label_words, safe_truncate_ellipsis};


pub use crate::core::config::TaxonomistConfig;
pub use crate::core::error::{Result, TaxonomistError};
pub use taxonomy::{
    ClassificationQuery, ClassificationResult, ConceptDescriptor, ConceptMatch, Language,
    TaxonomyError, TaxonomyRegistry, TaxonomyVariant,
};
pub use translation::{CachedTranslator, TranslationCache, Translator, TranslatorFactory};


pub const DEFAULT_MAX_RESULTS: usize = 2;


pub const PATH_SEPARATOR: &str = " -> ";
