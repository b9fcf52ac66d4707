//! Text-analysis capability used by the finding-aid heuristics.

pub mod rule_based;

pub use rule_based::RuleBasedNlp;

/// Semantic class of a recognized entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityLabel {
    Person,
    Organization,
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub text: String,
    pub label: EntityLabel,
}

impl Entity {
    pub fn new(text: impl Into<String>, label: EntityLabel) -> Self {
        Self {
            text: text.into(),
            label,
        }
    }
}

/// Sentence segmentation and named-entity recognition.
///
/// Loaded once and shared by every document of a batch.
pub trait NlpModel: Send + Sync {
    fn sentences(&self, text: &str) -> Vec<String>;
    fn entities(&self, text: &str) -> Vec<Entity>;
}
