use async_trait::async_trait;

use catalogist_core::{Dialect, FieldMap};

use crate::error::Result;
use crate::extractors::{Extractor, file_stem, last_text_in};
use crate::heuristics::text::reverse_name;
use crate::xml::{Document, Element, PathResolver};

/// Extracts MODS v3 records.
#[derive(Debug, Clone, Copy)]
pub struct ModsExtractor {
    resolver: PathResolver,
}

impl Default for ModsExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ModsExtractor {
    pub fn new() -> Self {
        Self {
            resolver: PathResolver::for_dialect(Dialect::Mods),
        }
    }

    pub fn extract_fields(&self, document: &Document) -> Result<FieldMap> {
        let root = document.root();
        let r = &self.resolver;

        let mut map = FieldMap::new(Dialect::Mods);
        map.set("title", self.title(root)?)?;
        map.set("uniform_title", r.last_text(root, r#"titleInfo[@type="uniform"]"#)?)?;
        map.set("subtitle", last_text_in(r, root, "titleInfo", "subTitle")?)?;
        map.set("composer", self.composer(root)?)?;
        map.set("arranger", self.name_with_role(root, "arranger")?)?;
        map.set("instrumentalist", self.name_with_role(root, "instrumentalist")?)?;
        map.set("performer", r.last_text(root, r#"note[@type="performers"]"#)?)?;
        map.set(
            "publisher",
            last_text_in(r, root, r#"originInfo[@eventType="publication"]"#, "publisher")?,
        )?;
        map.set("extent", last_text_in(r, root, "physicalDescription", "extent")?)?;
        map.set("date_issued", self.date_issued(root)?)?;
        map.set("identifier", druid(document.name()))?;
        map.set("genre", self.genres(root)?)?;
        map.set(
            "record_identifier",
            last_text_in(r, root, "recordInfo", r#"recordIdentifier[@source="SIRSI"]"#)?,
        )?;
        Ok(map)
    }

    /// Every text under the first `titleInfo`'s children, space-joined.
    fn title(&self, root: &Element) -> Result<String> {
        let Some(info) = self.resolver.find(root, "titleInfo")? else {
            return Ok(String::new());
        };
        let parts: Vec<&str> = info
            .children
            .iter()
            .flat_map(Element::node_texts)
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .collect();
        Ok(parts.join(" "))
    }

    fn composer(&self, root: &Element) -> Result<String> {
        let Some(primary) = self.resolver.find(root, r#"name[@usage="primary"]"#)? else {
            return Ok(String::new());
        };
        let first = primary
            .children
            .iter()
            .flat_map(Element::node_texts)
            .next()
            .unwrap_or("");
        Ok(reverse_name(first))
    }

    /// First `namePart` of the last `name` carrying `role` as a role term.
    fn name_with_role(&self, root: &Element, role: &str) -> Result<String> {
        let mut holder = None;
        for name in self.resolver.find_all(root, "name")? {
            let has_role = self
                .resolver
                .node_texts(name, "role")?
                .iter()
                .any(|text| text.trim().eq_ignore_ascii_case(role));
            if has_role {
                holder = Some(name);
            }
        }
        let Some(name) = holder else {
            return Ok(String::new());
        };
        Ok(match self.resolver.find(name, "namePart")? {
            Some(part) => reverse_name(part.node_texts().last().copied().unwrap_or("")),
            None => String::new(),
        })
    }

    fn date_issued(&self, root: &Element) -> Result<String> {
        let Some(origin) = self.resolver.find(root, "originInfo")? else {
            return Ok(String::new());
        };
        Ok(self.resolver.node_texts(origin, "dateIssued")?.join(", "))
    }

    fn genres(&self, root: &Element) -> Result<Vec<String>> {
        Ok(self
            .resolver
            .node_texts(root, "genre")?
            .into_iter()
            .map(String::from)
            .collect())
    }
}

#[async_trait]
impl Extractor for ModsExtractor {
    fn dialect(&self) -> Dialect {
        Dialect::Mods
    }

    async fn extract(&self, document: &Document) -> Result<FieldMap> {
        self.extract_fields(document)
    }
}

/// Object identifier following `druid_` in the file stem.
fn druid(name: &str) -> String {
    file_stem(name)
        .split_once("druid_")
        .map(|(_, id)| id.to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalogist_core::FieldValue;

    const RECORD: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<mods xmlns="http://www.loc.gov/mods/v3" version="3.6">
  <titleInfo>
    <nonSort>The </nonSort>
    <title>Entertainer</title>
    <subTitle>a rag time two step</subTitle>
  </titleInfo>
  <titleInfo type="uniform">
    <title>Entertainer (Piano roll)</title>
  </titleInfo>
  <name type="personal" usage="primary">
    <namePart>Joplin, Scott</namePart>
    <role><roleTerm type="text">composer</roleTerm></role>
  </name>
  <name type="personal">
    <namePart>Smith, John</namePart>
    <role><roleTerm type="text">Arranger</roleTerm></role>
  </name>
  <name type="personal">
    <namePart>Doe, Jane</namePart>
    <role><roleTerm type="text"> arranger </roleTerm></role>
  </name>
  <name type="personal">
    <namePart>Brown, Mary</namePart>
    <role><roleTerm type="text">instrumentalist</roleTerm></role>
  </name>
  <genre authority="lcgft">Piano rolls</genre>
  <genre authority="lcgft">Ragtime music</genre>
  <originInfo eventType="publication">
    <publisher>QRS</publisher>
    <dateIssued>1915</dateIssued>
    <dateIssued encoding="marc">1915</dateIssued>
  </originInfo>
  <physicalDescription>
    <extent>1 piano roll ; 29 cm</extent>
  </physicalDescription>
  <note type="performers">Played by Mary Brown</note>
  <recordInfo>
    <recordIdentifier source="SIRSI">a1234567</recordIdentifier>
  </recordInfo>
</mods>"#;

    fn extract(name: &str, xml: &str) -> FieldMap {
        let doc = Document::parse(name, xml).unwrap();
        ModsExtractor::new().extract_fields(&doc).unwrap()
    }

    #[test]
    fn test_full_record() {
        let map = extract("druid_bb123cd4567.xml", RECORD);
        assert_eq!(map.text("title"), "The Entertainer a rag time two step");
        assert_eq!(map.text("uniform_title"), "Entertainer (Piano roll)");
        assert_eq!(map.text("subtitle"), "a rag time two step");
        assert_eq!(map.text("composer"), "Scott Joplin");
        assert_eq!(map.text("performer"), "Played by Mary Brown");
        assert_eq!(map.text("publisher"), "QRS");
        assert_eq!(map.text("extent"), "1 piano roll ; 29 cm");
        assert_eq!(map.text("date_issued"), "1915, 1915");
        assert_eq!(map.text("identifier"), "bb123cd4567");
        assert_eq!(map.text("record_identifier"), "a1234567");
        assert_eq!(
            map.get("genre"),
            Some(&FieldValue::List(vec![
                "Piano rolls".to_string(),
                "Ragtime music".to_string()
            ]))
        );
    }

    #[test]
    fn test_roles_last_match_wins() {
        let map = extract("druid_x.xml", RECORD);
        assert_eq!(map.text("arranger"), "Jane Doe");
        assert_eq!(map.text("instrumentalist"), "Mary Brown");
    }

    #[test]
    fn test_identifier_requires_druid_prefix() {
        assert_eq!(druid("druid_abc.xml"), "abc");
        assert_eq!(druid("record.xml"), "");
    }

    #[test]
    fn test_sparse_record_keeps_every_key() {
        let map = extract("plain.xml", r#"<mods xmlns="http://www.loc.gov/mods/v3"/>"#);
        assert_eq!(map.len(), Dialect::Mods.fields().len());
        assert!(map.iter().all(|(_, value)| value.is_empty()));
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let doc = Document::parse("druid_bb123cd4567.xml", RECORD).unwrap();
        let extractor = ModsExtractor::new();
        assert_eq!(
            extractor.extract_fields(&doc).unwrap(),
            extractor.extract_fields(&doc).unwrap()
        );
    }
}
