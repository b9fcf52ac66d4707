use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

use catalogist_core::{Dialect, FieldMap};

use crate::error::Result;
use crate::extractors::{Extractor, file_stem};
use crate::heuristics::FallbackChain;
use crate::heuristics::text::reverse_name;
use crate::xml::{Document, Element, PathResolver};

static RECORD_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d{8}").expect("valid record number regex"));

/// Extracts MARC21 slim records.
#[derive(Debug, Clone, Copy)]
pub struct MarcExtractor {
    resolver: PathResolver,
}

impl Default for MarcExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl MarcExtractor {
    pub fn new() -> Self {
        Self {
            resolver: PathResolver::for_dialect(Dialect::Marc),
        }
    }

    pub fn extract_fields(&self, document: &Document) -> Result<FieldMap> {
        let record = self.record(document.root())?;
        let composer = reverse_name(&self.subfield(record, "100", "a")?);

        let mut map = FieldMap::new(Dialect::Marc);
        map.set("title", self.subfield(record, "245", "a")?)?;
        map.set("subtitle", self.subfield(record, "245", "b")?)?;
        map.set("arranger", self.role(record, "arranger", &composer)?)?;
        map.set("instrumentalist", self.role(record, "instrumentalist", &composer)?)?;
        map.set("composer", composer)?;
        map.set(
            "publisher",
            self.subfield(record, "264", "b")?.trim_matches(',').to_string(),
        )?;
        map.set("size", self.subfield(record, "300", "c")?)?;
        map.set("catalog_number", self.subfield(record, "028", "a")?)?;
        map.set("date", self.date(record)?)?;
        map.set("identifier", record_number(document.name()))?;
        map.set("collection", self.subfield(record, "690", "a")?.trim().to_string())?;
        map.set("citation_a", self.subfield(record, "510", "a")?)?;
        map.set("citation_c", self.subfield(record, "510", "c")?)?;
        map.set("roll_type", self.roll_type(record)?)?;
        Ok(map)
    }

    /// The record element, unwrapping a `collection` root.
    fn record<'a>(&self, root: &'a Element) -> Result<&'a Element> {
        if root.name == "collection" {
            if let Some(record) = self.resolver.find(root, "record")? {
                return Ok(record);
            }
        }
        Ok(root)
    }

    /// Last `$code` text of the first `tag` datafield.
    fn subfield(&self, record: &Element, tag: &str, code: &str) -> Result<String> {
        let Some(field) = self
            .resolver
            .find(record, &format!(r#"datafield[@tag="{tag}"]"#))?
        else {
            return Ok(String::new());
        };
        self.resolver
            .last_text(field, &format!(r#"subfield[@code="{code}"]"#))
    }

    fn role(&self, record: &Element, role: &'static str, composer: &str) -> Result<String> {
        FallbackChain::new(role)
            .then("added_entry", || self.added_entry_with_role(record, role))
            .then("main_entry_relator", || {
                Ok(if self.main_entry_has_role(record, role)? {
                    composer.to_string()
                } else {
                    String::new()
                })
            })
            .resolve()
    }

    /// Name of the last 700 datafield mentioning `role` anywhere in its text.
    fn added_entry_with_role(&self, record: &Element, role: &str) -> Result<String> {
        let role = role.to_lowercase();
        let mut found = String::new();
        for field in self.resolver.find_all(record, r#"datafield[@tag="700"]"#)? {
            let texts = field.node_texts();
            if texts.iter().any(|text| text.to_lowercase().contains(&role)) {
                found = reverse_name(texts.get(1).copied().unwrap_or(""));
            }
        }
        Ok(found)
    }

    fn main_entry_has_role(&self, record: &Element, role: &str) -> Result<bool> {
        let role = role.to_lowercase();
        let Some(field) = self.resolver.find(record, r#"datafield[@tag="100"]"#)? else {
            return Ok(false);
        };
        Ok(self
            .resolver
            .node_texts(field, r#"subfield[@code="e"]"#)?
            .iter()
            .any(|text| text.to_lowercase().contains(&role)))
    }

    fn date(&self, record: &Element) -> Result<String> {
        let Some(control) = self.resolver.find(record, r#"controlfield[@tag="008"]"#)? else {
            return Ok(String::new());
        };
        Ok(control.node_texts().into_iter().map(dates_from_008).collect())
    }

    fn roll_type(&self, record: &Element) -> Result<String> {
        let notes = self.resolver.find_all(record, r#"datafield[@tag="500"]"#)?;
        match notes.get(1) {
            Some(note) => self.resolver.last_text(note, r#"subfield[@code="a"]"#),
            None => Ok(String::new()),
        }
    }
}

#[async_trait]
impl Extractor for MarcExtractor {
    fn dialect(&self) -> Dialect {
        Dialect::Marc
    }

    async fn extract(&self, document: &Document) -> Result<FieldMap> {
        self.extract_fields(document)
    }
}

/// Date 1 (positions 7..11) and, when numeric, date 2 (11..15) of an 008 field.
pub fn dates_from_008(field: &str) -> String {
    let mut date = String::new();
    if let Some(first) = field.get(7..11) {
        date.push_str(first);
    }
    if let Some(second) = field.get(11..15) {
        if second.chars().all(|c| c.is_ascii_digit()) {
            date.push_str(", ");
            date.push_str(second);
        }
    }
    date
}

/// First run of eight digits in the file stem.
fn record_number(name: &str) -> String {
    RECORD_NUMBER_RE
        .find(file_stem(name))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}
