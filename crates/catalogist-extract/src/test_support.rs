//! Deterministic stand-ins for the injected capabilities.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::{ExtractError, Result};
use crate::lookup::UrlLookup;
use crate::nlp::{Entity, NlpModel};

/// NLP model answering from canned tables keyed by exact input text.
#[derive(Debug, Default)]
pub struct FakeNlp {
    entities: HashMap<String, Vec<Entity>>,
    sentences: HashMap<String, Vec<String>>,
}

impl FakeNlp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entities_for(mut self, text: &str, entities: Vec<Entity>) -> Self {
        self.entities.insert(text.to_string(), entities);
        self
    }

    pub fn sentences_for(mut self, text: &str, sentences: Vec<&str>) -> Self {
        self.sentences.insert(
            text.to_string(),
            sentences.into_iter().map(String::from).collect(),
        );
        self
    }
}

impl NlpModel for FakeNlp {
    fn sentences(&self, text: &str) -> Vec<String> {
        if let Some(sentences) = self.sentences.get(text) {
            return sentences.clone();
        }
        let trimmed = text.trim();
        if trimmed.is_empty() {
            Vec::new()
        } else {
            vec![trimmed.to_string()]
        }
    }

    fn entities(&self, text: &str) -> Vec<Entity> {
        self.entities.get(text).cloned().unwrap_or_default()
    }
}

/// URL lookup backed by a fixed table; unknown names miss.
#[derive(Debug, Default)]
pub struct FakeLookup {
    urls: HashMap<String, String>,
    fail: bool,
}

impl FakeLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, url: &str) -> Self {
        self.urls.insert(name.to_string(), url.to_string());
        self
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl UrlLookup for FakeLookup {
    async fn lookup(&self, name: &str) -> Result<Option<String>> {
        if self.fail {
            return Err(ExtractError::ApiError(name.to_string(), "connection refused".to_string()));
        }
        Ok(self.urls.get(name).cloned())
    }
}
