use std::sync::Arc;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

use catalogist_core::{Dialect, FieldMap, HeuristicsConfig};

use crate::error::Result;
use crate::extractors::Extractor;
use crate::heuristics::text::{clean_text, remove_chars, strip_line_breaks, strip_punctuation};
use crate::heuristics::{FallbackChain, infer_collection_creator};
use crate::lookup::{UrlLookup, lookup_or_empty};
use crate::nlp::NlpModel;
use crate::xml::{Document, Element, PathResolver};

static ARS_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"ARS-?.?\d+").expect("valid ARS number regex"));

/// Extracts EAD finding aids.
///
/// Holds the shared NLP model and URL lookup; both are injected so a batch
/// loads them once.
pub struct FindingAidExtractor {
    resolver: PathResolver,
    nlp: Arc<dyn NlpModel>,
    lookup: Arc<dyn UrlLookup>,
    noise_words: Vec<String>,
}

impl FindingAidExtractor {
    pub fn new(
        nlp: Arc<dyn NlpModel>,
        lookup: Arc<dyn UrlLookup>,
        heuristics: &HeuristicsConfig,
    ) -> Self {
        Self {
            resolver: PathResolver::for_dialect(Dialect::FindingAid),
            nlp,
            lookup,
            noise_words: heuristics.noise_words.clone(),
        }
    }

    pub async fn extract_fields(&self, document: &Document) -> Result<FieldMap> {
        let root = document.root();

        let full_description = FallbackChain::new("full_description")
            .then("abstract", || self.abstract_text(root))
            .then("scopecontent", || self.scope_content(root))
            .resolve()?;
        let description = self
            .nlp
            .sentences(&full_description)
            .into_iter()
            .next()
            .unwrap_or_default();
        let title = clean_text(&strip_punctuation(
            &self.resolver.first_text(root, ".//unittitle")?,
        ));
        let inventory_number = FallbackChain::new("inventory_number")
            .then("unitid", || {
                Ok(remove_chars(
                    &self.resolver.first_text(root, ".//unitid")?,
                    &['-', '.'],
                ))
            })
            .then("file_name", || Ok(ars_number(document.name())))
            .resolve()?;
        let collection_creator = infer_collection_creator(
            self.nlp.as_ref(),
            self.noise_words.as_slice(),
            &title,
            &description,
        )?;
        let collection_size = self.collection_size(root)?;
        let url = lookup_or_empty(self.lookup.as_ref(), &title).await;

        let mut map = FieldMap::new(Dialect::FindingAid);
        map.set("full_description", full_description)?;
        map.set("description", description)?;
        map.set("label", title.clone())?;
        map.set("title", title)?;
        map.set("inventory_number", inventory_number)?;
        map.set("collection_creator", collection_creator)?;
        map.set("collection_size", collection_size)?;
        map.set("url", url)?;
        Ok(map)
    }

    /// All character data under every `abstract`, inline markup included.
    fn abstract_text(&self, root: &Element) -> Result<String> {
        let text = self.resolver.concat_text(root, ".//abstract")?;
        Ok(clean_text(&remove_chars(&text, &['\n', '\r'])))
    }

    /// Third node text across every `scopecontent` subtree.
    ///
    /// Only consulted when the first `scopecontent` has child elements.
    fn scope_content(&self, root: &Element) -> Result<String> {
        let scopes = self.resolver.find_all(root, ".//scopecontent")?;
        match scopes.first() {
            Some(first) if !first.children.is_empty() => {}
            _ => return Ok(String::new()),
        }
        let third = scopes
            .iter()
            .flat_map(|scope| scope.node_texts())
            .nth(2)
            .unwrap_or("");
        Ok(clean_text(third))
    }

    fn collection_size(&self, root: &Element) -> Result<String> {
        let Some(physdesc) = self.resolver.find(root, ".//physdesc")? else {
            return Ok(String::new());
        };
        Ok(clean_text(&strip_line_breaks(&physdesc.node_texts().join(" "))))
    }
}

#[async_trait]
impl Extractor for FindingAidExtractor {
    fn dialect(&self) -> Dialect {
        Dialect::FindingAid
    }

    async fn extract(&self, document: &Document) -> Result<FieldMap> {
        self.extract_fields(document).await
    }
}

/// `ARS` call number embedded in a file name, without `-` and `.`.
fn ars_number(name: &str) -> String {
    ARS_NUMBER_RE
        .find(&name.to_uppercase())
        .map(|m| remove_chars(m.as_str(), &['-', '.']))
        .unwrap_or_default()
}
