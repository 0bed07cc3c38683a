use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tracing::{info, warn};

use super::base::{TranslationError, Translator};
use super::cache::TranslationCache;
use crate::taxonomy::{ConceptRecord, LabelStatus, Language};


#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationOutcome {
    Translated(String),
    /// No translation; carries the source text.
    Unresolved(String),
}

impl TranslationOutcome {
    pub fn text(&self) -> &str {
        match self {
            Self::Translated(text) | Self::Unresolved(text) => text,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Translated(_))
    }
}


#[derive(Debug, Clone)]
pub struct TranslatedRecords {
    pub records: Vec<ConceptRecord>,
    pub unresolved: BTreeSet<String>,
}


/// Cache first, provider on a miss. Works without a provider: every miss is
/// then reported as unresolved.
pub struct CachedTranslator {
    provider: Option<Arc<dyn Translator>>,
    cache: TranslationCache,
    source: Language,
    target: Language,
    concurrency: usize,
}

impl CachedTranslator {
    pub fn new(
        provider: Option<Arc<dyn Translator>>,
        cache: TranslationCache,
        source: Language,
        target: Language,
    ) -> Self {
        match &provider {
            Some(p) => info!("Translating {} -> {} via {}", source, target, p.provider_name()),
            None => warn!("No translation provider for {} -> {}; cache only", source, target),
        }
        Self {
            provider,
            cache,
            source,
            target,
            concurrency: 8,
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn source(&self) -> Language {
        self.source
    }

    pub fn target(&self) -> Language {
        self.target
    }

    pub fn cache(&self) -> &TranslationCache {
        &self.cache
    }

    pub async fn resolve(&self, text: &str) -> TranslationOutcome {
        if let Some(cached) = self.cache.get(text) {
            return TranslationOutcome::Translated(cached);
        }

        let result = match &self.provider {
            Some(provider) => provider.translate(text, self.source, self.target).await,
            None => Err(TranslationError::Unavailable),
        };

        match result {
            Ok(translated) if !translated.trim().is_empty() => {
                self.cache.insert(text, translated.clone());
                TranslationOutcome::Translated(translated)
            }
            Ok(_) => {
                warn!("Empty translation for '{}'", text);
                TranslationOutcome::Unresolved(text.to_string())
            }
            Err(TranslationError::Unavailable) => TranslationOutcome::Unresolved(text.to_string()),
            Err(e) => {
                warn!("Translation failed for '{}': {}", text, e);
                TranslationOutcome::Unresolved(text.to_string())
            }
        }
    }

    /// Translates every label of `records`. Labels without a translation keep
    /// their source text and mark the record `Untranslated`. New translations
    /// are persisted before returning.
    pub async fn translate_records(&self, records: &[ConceptRecord]) -> TranslatedRecords {
        let texts: BTreeSet<&str> = records
            .iter()
            .flat_map(|record| record.labels())
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .collect();

        let outcomes: HashMap<String, TranslationOutcome> = stream::iter(texts)
            .map(|text| async move { (text.to_string(), self.resolve(text).await) })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        let unresolved: BTreeSet<String> = outcomes
            .iter()
            .filter(|(_, outcome)| !outcome.is_resolved())
            .map(|(text, _)| text.clone())
            .collect();

        let translate_all = |labels: &[String], complete: &mut bool| -> Vec<String> {
            labels
                .iter()
                .map(|label| match outcomes.get(label.trim()) {
                    Some(outcome) => {
                        *complete &= outcome.is_resolved();
                        outcome.text().to_string()
                    }
                    None => label.clone(),
                })
                .collect()
        };

        let records = records
            .iter()
            .map(|record| {
                let mut complete = true;
                let pref_labels = translate_all(&record.pref_labels, &mut complete);
                let alt_labels = translate_all(&record.alt_labels, &mut complete);
                ConceptRecord {
                    id: record.id.clone(),
                    pref_labels,
                    alt_labels,
                    broader: record.broader.clone(),
                    label_status: if complete {
                        LabelStatus::Translated
                    } else {
                        LabelStatus::Untranslated
                    },
                }
            })
            .collect();

        if let Err(e) = self.cache.persist() {
            warn!("Could not persist translation cache: {}", e);
        }

        let stats = self.cache.stats();
        info!(
            "Translated {} labels ({} unresolved); cache: {} entries, {} hits, {} misses, hit rate {:.2}",
            outcomes.len(),
            unresolved.len(),
            stats.size,
            stats.hits,
            stats.misses,
            stats.hit_rate
        );
        TranslatedRecords {
            records,
            unresolved,
        }
    }
}
