

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};


#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, EnumString, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TruncationRule {
    /// `ranked[0 .. min(max, count - 1)]`: a single match is dropped.
    Literal,
    /// `ranked[0 .. min(max, count)]`.
    #[default]
    TopN,
}

impl TruncationRule {
    pub fn keep(&self, count: usize, max_results: usize) -> usize {
        match self {
            Self::Literal => max_results.min(count.saturating_sub(1)),
            Self::TopN => max_results.min(count),
        }
    }
}


#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, EnumString, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ParentPolicy {
    /// Reject concepts with more than one broader concept.
    Strict,
    /// Union vocabulary across every parent; depth and path follow the first declared parent.
    #[default]
    Merge,
}


#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    pub max_results: usize,
    pub truncation: TruncationRule,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            max_results: crate::DEFAULT_MAX_RESULTS,
            truncation: TruncationRule::default(),
        }
    }
}
