use async_trait::async_trait;
use thiserror::Error;

use crate::taxonomy::Language;


#[derive(Error, Debug)]
pub enum TranslationError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Cache I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid provider URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("No translation provider available")]
    Unavailable,
}


#[async_trait]
pub trait Translator: Send + Sync {

    async fn translate(
        &self,
        text: &str,
        source: Language,
        target: Language,
    ) -> Result<String, TranslationError>;


    fn provider_name(&self) -> &str;
}
