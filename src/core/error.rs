

use thiserror::Error;

use crate::taxonomy::TaxonomyError;
use crate::translation::TranslationError;


#[derive(Error, Debug)]
pub enum TaxonomistError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Taxonomy error: {0}")]
    Taxonomy(#[from] TaxonomyError),

    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("Variant already registered for language: {0}")]
    DuplicateVariant(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<config::ConfigError> for TaxonomistError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}


pub type Result<T> = std::result::Result<T, TaxonomistError>;
