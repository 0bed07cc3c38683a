use std::sync::Arc;

use tracing::warn;

use super::base::{TranslationError, Translator};
use super::libretranslate::LibreTranslateProvider;
use crate::core::config::TaxonomistConfig;


pub struct TranslatorFactory;

impl TranslatorFactory {

    pub fn create(
        provider: &str,
        base_url: &str,
        api_key: Option<&str>,
        timeout_secs: u64,
    ) -> Result<Arc<dyn Translator>, TranslationError> {
        match provider {
            "libretranslate" => Ok(Arc::new(LibreTranslateProvider::new(
                base_url,
                api_key.map(String::from),
                timeout_secs,
            )?)),
            other => Err(TranslationError::Provider(format!(
                "Unknown translation provider: {other}. Supported: libretranslate"
            ))),
        }
    }

    /// `None` when no endpoint is configured or the provider cannot be built;
    /// the translated variant then relies on the cache alone.
    pub fn from_config(config: &TaxonomistConfig) -> Option<Arc<dyn Translator>> {
        let base_url = config.translation_url.as_deref()?;
        match Self::create(
            &config.translation_provider,
            base_url,
            config.translation_api_key.as_deref(),
            config.translation_timeout,
        ) {
            Ok(provider) => Some(provider),
            Err(e) => {
                warn!("Translation provider unavailable: {}", e);
                None
            }
        }
    }
}
