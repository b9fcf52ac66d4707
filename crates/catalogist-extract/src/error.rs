use thiserror::Error;

use catalogist_core::CoreError;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("XML error in {document}: {message}")]
    Xml { document: String, message: String },

    #[error("document {0} has no root element")]
    EmptyDocument(String),

    #[error("invalid path expression `{path}`: {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error from {0}: {1}")]
    ApiError(String, String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl ExtractError {
    pub(crate) fn xml(document: &str, err: impl std::fmt::Display) -> Self {
        Self::Xml {
            document: document.to_string(),
            message: err.to_string(),
        }
    }

    pub(crate) fn invalid_path(path: &str, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ExtractError>;
