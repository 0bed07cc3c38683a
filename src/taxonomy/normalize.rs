use std::collections::{BTreeSet, HashSet};

use lazy_static::lazy_static;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use stop_words::LANGUAGE;

use super::models::Language;

lazy_static! {
    static ref TOKEN_PATTERN: Regex = Regex::new(r"[\p{L}\p{N}]+(?:['’][\p{L}]+)*").unwrap();

    static ref ENGLISH_STOPWORDS: HashSet<String> = load_stopwords(LANGUAGE::English);

    static ref PORTUGUESE_STOPWORDS: HashSet<String> = load_stopwords(LANGUAGE::Portuguese);
}

fn load_stopwords(language: LANGUAGE) -> HashSet<String> {
    stop_words::get(language)
        .into_iter()
        .map(|word| word.to_string().to_lowercase())
        .collect()
}


/// Stopword removal followed by stemming, applied identically to taxonomy
/// vocabularies and query keywords.
pub trait TextNormalizer: Send + Sync {
    fn language(&self) -> Language;

    /// Tokenizes the terms and drops stopwords. Output tokens are lowercase.
    fn remove_stopwords(&self, terms: &[String]) -> Vec<String>;

    fn stem(&self, term: &str) -> String;

    fn normalize(&self, terms: &[String]) -> BTreeSet<String> {
        let terms: Vec<String> = terms
            .iter()
            .filter(|term| !term.trim().is_empty())
            .cloned()
            .collect();

        self.remove_stopwords(&terms)
            .iter()
            .map(|term| self.stem(term))
            .filter(|stem| !stem.is_empty())
            .collect()
    }
}


pub fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    TOKEN_PATTERN
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
}


/// Snowball stemming with the `stop-words` list of the language.
pub struct SnowballNormalizer {
    language: Language,
    stemmer: Stemmer,
    extra_stopwords: HashSet<String>,
}

impl SnowballNormalizer {
    pub fn new(language: Language) -> Self {
        let algorithm = match language {
            Language::English => Algorithm::English,
            Language::Portuguese => Algorithm::Portuguese,
        };
        Self {
            language,
            stemmer: Stemmer::create(algorithm),
            extra_stopwords: HashSet::new(),
        }
    }

    pub fn with_extra_stopwords<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extra_stopwords
            .extend(words.into_iter().map(|w| w.as_ref().to_lowercase()));
        self
    }

    fn stopwords(&self) -> &'static HashSet<String> {
        match self.language {
            Language::English => &ENGLISH_STOPWORDS,
            Language::Portuguese => &PORTUGUESE_STOPWORDS,
        }
    }

    fn is_stopword(&self, token: &str) -> bool {
        self.stopwords().contains(token) || self.extra_stopwords.contains(token)
    }
}

impl TextNormalizer for SnowballNormalizer {
    fn language(&self) -> Language {
        self.language
    }

    fn remove_stopwords(&self, terms: &[String]) -> Vec<String> {
        terms
            .iter()
            .flat_map(|term| tokenize(term))
            .filter(|token| !self.is_stopword(token))
            .collect()
    }

    fn stem(&self, term: &str) -> String {
        self.stemmer.stem(&term.to_lowercase()).into_owned()
    }
}


/// Lowercasing and an explicit stoplist, no stemming. Suited to vocabularies
/// that were normalized upstream.
pub struct PlainNormalizer {
    language: Language,
    stopwords: HashSet<String>,
}

impl PlainNormalizer {
    pub fn new<I, S>(language: Language, stopwords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            language,
            stopwords: stopwords
                .into_iter()
                .map(|w| w.as_ref().to_lowercase())
                .collect(),
        }
    }
}

impl TextNormalizer for PlainNormalizer {
    fn language(&self) -> Language {
        self.language
    }

    fn remove_stopwords(&self, terms: &[String]) -> Vec<String> {
        terms
            .iter()
            .flat_map(|term| term.split_whitespace())
            .map(str::to_lowercase)
            .filter(|token| !self.stopwords.contains(token))
            .collect()
    }

    fn stem(&self, term: &str) -> String {
        term.to_lowercase()
    }
}
