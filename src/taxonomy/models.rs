use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};
use strum::{Display, EnumString, IntoStaticStr};

use crate::utils::label_words;


#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, EnumString,
    IntoStaticStr, Display,
)]
#[strum(ascii_case_insensitive)]
pub enum Language {
    #[serde(rename = "en", alias = "english")]
    #[strum(to_string = "en", serialize = "english")]
    English,
    #[serde(rename = "pt", alias = "pt-br", alias = "pt_br", alias = "portuguese")]
    #[strum(to_string = "pt", serialize = "pt-br", serialize = "pt_br", serialize = "portuguese")]
    Portuguese,
}

impl Language {
    pub fn code(&self) -> &'static str {
        self.into()
    }
}


#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelStatus {
    #[default]
    Authored,
    Translated,
    /// At least one label kept its source-language text.
    Untranslated,
}


#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConceptRecord {
    pub id: String,
    #[serde(default)]
    pub pref_labels: Vec<String>,
    #[serde(default)]
    pub alt_labels: Vec<String>,
    #[serde(default)]
    pub broader: Vec<String>,
    #[serde(default)]
    pub label_status: LabelStatus,
}

impl ConceptRecord {
    pub fn new(id: impl Into<String>, pref_label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            pref_labels: vec![pref_label.into()],
            alt_labels: Vec::new(),
            broader: Vec::new(),
            label_status: LabelStatus::Authored,
        }
    }

    pub fn with_alt_label(mut self, label: impl Into<String>) -> Self {
        self.alt_labels.push(label.into());
        self
    }

    pub fn with_broader(mut self, parent_id: impl Into<String>) -> Self {
        self.broader.push(parent_id.into());
        self
    }

    /// First non-blank preferred label, else first non-blank alternate label.
    pub fn primary_label(&self) -> Option<&str> {
        self.pref_labels
            .iter()
            .chain(self.alt_labels.iter())
            .map(|label| label.trim())
            .find(|label| !label.is_empty())
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.pref_labels
            .iter()
            .chain(self.alt_labels.iter())
            .map(String::as_str)
    }
}


#[derive(Debug, Clone, Serialize)]
pub struct ConceptNode {
    pub id: String,
    pub label: String,
    pub terms: BTreeSet<String>,
    pub label_status: LabelStatus,
}

impl ConceptNode {
    pub fn new(id: impl Into<String>, label: &str, terms: BTreeSet<String>) -> Self {
        Self {
            id: id.into(),
            label: label.trim().to_lowercase(),
            terms,
            label_status: LabelStatus::Authored,
        }
    }

    /// `None` when the record carries no usable label.
    pub fn from_record(record: &ConceptRecord) -> Option<Self> {
        let label = record.primary_label()?;
        let terms = record.labels().flat_map(label_words).collect();
        let mut node = Self::new(record.id.clone(), label, terms);
        node.label_status = record.label_status;
        Some(node)
    }
}

impl PartialEq for ConceptNode {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ConceptNode {}

impl Hash for ConceptNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}


#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConceptDescriptor {
    pub id: String,
    pub label: String,
    pub path_label: String,
    pub vocabulary: BTreeSet<String>,
    pub depth: usize,
    pub label_status: LabelStatus,
}


#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConceptMatch {
    pub concept: ConceptDescriptor,
    pub score: f64,
    pub matched_terms: Vec<String>,
}


#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationQuery {
    pub keywords: BTreeSet<String>,
    pub language: String,
}

impl ClassificationQuery {
    pub fn new<I, S>(keywords: I, language: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keywords: keywords.into_iter().map(Into::into).collect(),
            language: language.into(),
        }
    }
}


#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub language: Language,
    pub matches: Vec<ConceptMatch>,
}

impl ClassificationResult {
    pub fn concepts(&self) -> impl Iterator<Item = &ConceptDescriptor> {
        self.matches.iter().map(|m| &m.concept)
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }
}


#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxonomyStats {
    pub language: Language,
    pub total_concepts: usize,
    pub total_relations: usize,
    pub roots: usize,
    pub max_depth: usize,
    pub vocabulary_size: usize,
    pub unresolved_labels: usize,
}
