//! Per-dialect field extraction.
//!
//! Every extractor builds a fresh [`FieldMap`] holding its dialect's whole
//! vocabulary; a field that cannot be determined stays empty.

pub mod finding_aid;
pub mod marc;
pub mod mods;

use async_trait::async_trait;

use catalogist_core::{Dialect, FieldMap};

use crate::error::Result;
use crate::xml::{Document, Element, PathResolver};

pub use finding_aid::FindingAidExtractor;
pub use marc::MarcExtractor;
pub use mods::ModsExtractor;

/// Turns one parsed document into a row of its dialect's table.
#[async_trait]
pub trait Extractor: Send + Sync {
    fn dialect(&self) -> Dialect;

    async fn extract(&self, document: &Document) -> Result<FieldMap>;
}

/// Last node text under the first `parent` child of `context`.
pub(crate) fn last_text_in(
    resolver: &PathResolver,
    context: &Element,
    parent: &str,
    child: &str,
) -> Result<String> {
    match resolver.find(context, parent)? {
        Some(element) => resolver.last_text(element, child),
        None => Ok(String::new()),
    }
}

/// File name without its `.xml` suffix and anything after it.
pub(crate) fn file_stem(name: &str) -> &str {
    name.split(".xml").next().unwrap_or(name)
}
