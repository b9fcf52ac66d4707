//! XML parsing, dialect classification, field extraction and batch
//! aggregation for catalogist.

pub mod batch;
pub mod dialect;
pub mod error;
pub mod extractors;
pub mod heuristics;
pub mod http;
pub mod lookup;
pub mod nlp;
pub mod xml;

#[cfg(test)]
mod test_support;

pub use batch::Pipeline;
pub use dialect::classify;
pub use error::{ExtractError, Result};
pub use extractors::{Extractor, FindingAidExtractor, MarcExtractor, ModsExtractor};
pub use lookup::{DisabledLookup, SearchworksLookup, UrlLookup};
pub use nlp::{Entity, EntityLabel, NlpModel, RuleBasedNlp};
pub use xml::{Document, Element, PathResolver};
