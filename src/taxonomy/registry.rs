use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use tracing::info;

use super::loader::load_records;
use super::models::{ClassificationQuery, ClassificationResult, Language};
use super::normalize::SnowballNormalizer;
use super::variant::{TaxonomyVariant, VariantOptions};
use crate::core::config::TaxonomistConfig;
use crate::core::error::{Result, TaxonomistError};
use crate::translation::{CachedTranslator, TranslationCache, TranslatorFactory};


/// Taxonomy variants keyed by language. Queries are routed by their language
/// tag; a tag without a variant is an error, never a fallback.
#[derive(Default)]
pub struct TaxonomyRegistry {
    variants: HashMap<Language, Arc<TaxonomyVariant>>,
}

impl TaxonomyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Source variant from `taxonomy_path`, plus the translated variant when
    /// `translation_target` is set.
    pub async fn bootstrap(config: &TaxonomistConfig) -> Result<Self> {
        let records = load_records(&config.taxonomy_path)?;
        let options = VariantOptions {
            ranking: config.ranking.clone(),
            parent_policy: config.parent_policy,
        };

        let mut registry = Self::new();
        registry.register(TaxonomyVariant::build(
            &records,
            Arc::new(SnowballNormalizer::new(config.source_language)),
            &options,
        )?)?;

        if let Some(target) = config.translation_target {
            let cache = match &config.translation_cache_path {
                Some(path) => TranslationCache::load(path)?,
                None => TranslationCache::new(),
            };
            let translator = CachedTranslator::new(
                TranslatorFactory::from_config(config),
                cache,
                config.source_language,
                target,
            )
            .with_concurrency(config.translation_concurrency);

            registry.register(
                TaxonomyVariant::build_translated(
                    &records,
                    &translator,
                    Arc::new(SnowballNormalizer::new(target)),
                    &options,
                )
                .await?,
            )?;
        }

        Ok(registry)
    }

    pub fn register(&mut self, variant: TaxonomyVariant) -> Result<Arc<TaxonomyVariant>> {
        let language = variant.language();
        if self.variants.contains_key(&language) {
            return Err(TaxonomistError::DuplicateVariant(language.to_string()));
        }

        let variant = Arc::new(variant);
        self.variants.insert(language, Arc::clone(&variant));
        info!("Registered taxonomy variant '{}'", language);
        Ok(variant)
    }

    pub fn variant(&self, tag: &str) -> Result<&Arc<TaxonomyVariant>> {
        Language::from_str(tag.trim())
            .ok()
            .and_then(|language| self.variants.get(&language))
            .ok_or_else(|| TaxonomistError::UnsupportedLanguage(tag.to_string()))
    }

    pub fn languages(&self) -> Vec<Language> {
        let mut languages: Vec<Language> = self.variants.keys().copied().collect();
        languages.sort();
        languages
    }

    pub fn classify(&self, query: &ClassificationQuery) -> Result<ClassificationResult> {
        let variant = self.variant(&query.language)?;
        Ok(ClassificationResult {
            language: variant.language(),
            matches: variant.classify(&query.keywords),
        })
    }
}
