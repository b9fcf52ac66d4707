use catalogist_core::Dialect;

use crate::xml::Document;

/// Decide the dialect of a document from its root namespace.
pub fn classify(document: &Document) -> Dialect {
    let dialect = Dialect::from_namespace(document.namespace());
    tracing::debug!(document = document.name(), %dialect, "classified");
    dialect
}
