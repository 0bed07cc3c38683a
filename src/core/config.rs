

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::error::{Result, TaxonomistError};
use crate::taxonomy::{Language, ParentPolicy, RankingConfig};

const ENV_PREFIX: &str = "TAXONOMIST";
const CONFIG_PATH_VAR: &str = "TAXONOMIST_CONFIG";


#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxonomistConfig {
    pub taxonomy_path: PathBuf,
    pub source_language: Language,


    pub translation_target: Option<Language>,
    pub translation_provider: String,
    pub translation_url: Option<String>,
    pub translation_api_key: Option<String>,
    pub translation_cache_path: Option<PathBuf>,
    pub translation_timeout: u64,
    pub translation_concurrency: usize,

    pub ranking: RankingConfig,
    pub parent_policy: ParentPolicy,
}

impl TaxonomistConfig {
    pub fn new(taxonomy_path: impl Into<PathBuf>) -> Self {
        Self {
            taxonomy_path: taxonomy_path.into(),
            source_language: Language::English,
            translation_target: None,
            translation_provider: "libretranslate".to_string(),
            translation_url: None,
            translation_api_key: None,
            translation_cache_path: None,
            translation_timeout: 30,
            translation_concurrency: 8,
            ranking: RankingConfig::default(),
            parent_policy: ParentPolicy::default(),
        }
    }

    /// Defaults, then the optional file, then `TAXONOMIST_*` environment variables.
    /// Nested keys use a double underscore: `TAXONOMIST_RANKING__MAX_RESULTS=3`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        }

        let settings = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }


    pub fn from_env() -> Result<Self> {
        let path = std::env::var(CONFIG_PATH_VAR).ok().map(PathBuf::from);
        Self::load(path.as_deref())
    }

    pub fn translation_enabled(&self) -> bool {
        self.translation_target.is_some()
    }

    pub fn validate(&self) -> Result<()> {
        if self.ranking.max_results == 0 {
            return Err(TaxonomistError::Config(
                "ranking.max_results must be at least 1".to_string(),
            ));
        }
        if self.translation_concurrency == 0 {
            return Err(TaxonomistError::Config(
                "translation_concurrency must be at least 1".to_string(),
            ));
        }
        if self.translation_target == Some(self.source_language) {
            return Err(TaxonomistError::Config(format!(
                "translation_target must differ from source_language ({})",
                self.source_language
            )));
        }
        Ok(())
    }
}

impl Default for TaxonomistConfig {
    fn default() -> Self {
        Self::new("taxonomy.json")
    }
}
