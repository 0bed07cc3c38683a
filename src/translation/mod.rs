pub mod base;
pub mod cache;
pub mod cached;
pub mod factory;
pub mod libretranslate;

pub use base::{TranslationError, Translator};
pub use cache::{CacheStats, TranslationCache};
pub use cached::{CachedTranslator, TranslatedRecords, TranslationOutcome};
pub use factory::TranslatorFactory;
pub use libretranslate::LibreTranslateProvider;
