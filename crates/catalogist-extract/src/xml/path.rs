use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

use catalogist_core::Dialect;

use crate::error::{ExtractError, Result};
use crate::xml::document::Element;

static STEP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^([A-Za-z_][\w.\-]*)(?:\[@([A-Za-z_][\w.\-]*)\s*=\s*(?:"([^"]*)"|'([^']*)')\])?$"#,
    )
    .expect("valid path step regex")
});

/// A parsed path expression such as `.//unittitle` or
/// `datafield[@tag="100"]/subfield[@code="a"]`.
///
/// The first step matches direct children of the context element, or every
/// descendant when the path starts with `.//`. Later steps match children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    descendant: bool,
    steps: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Step {
    name: String,
    predicate: Option<(String, String)>,
}

impl Step {
    fn matches(&self, element: &Element, namespace: Option<&str>) -> bool {
        element.is(namespace, &self.name)
            && self
                .predicate
                .as_ref()
                .is_none_or(|(attr, value)| element.attribute(attr) == Some(value.as_str()))
    }
}

impl FromStr for Path {
    type Err = ExtractError;

    fn from_str(expr: &str) -> Result<Self> {
        let (descendant, rest) = match expr.strip_prefix(".//") {
            Some(rest) => (true, rest),
            None => (false, expr),
        };
        if rest.is_empty() {
            return Err(ExtractError::invalid_path(expr, "empty path"));
        }

        let steps = rest
            .split('/')
            .map(|raw| {
                let caps = STEP_RE
                    .captures(raw.trim())
                    .ok_or_else(|| ExtractError::invalid_path(expr, format!("bad step `{raw}`")))?;
                let predicate = caps.get(2).map(|attr| {
                    let value = caps.get(3).or_else(|| caps.get(4)).map_or("", |m| m.as_str());
                    (attr.as_str().to_string(), value.to_string())
                });
                Ok(Step {
                    name: caps[1].to_string(),
                    predicate,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { descendant, steps })
    }
}

/// Namespace-aware lookup of elements and text for one dialect.
#[derive(Debug, Clone, Copy)]
pub struct PathResolver {
    namespace: Option<&'static str>,
}

impl PathResolver {
    pub fn new(namespace: Option<&'static str>) -> Self {
        Self { namespace }
    }

    pub fn for_dialect(dialect: Dialect) -> Self {
        Self::new(dialect.namespace())
    }

    /// Every element matching `path`, in document order.
    pub fn find_all<'a>(&self, context: &'a Element, path: &str) -> Result<Vec<&'a Element>> {
        let path: Path = path.parse()?;
        let mut steps = path.steps.iter();
        let Some(first) = steps.next() else {
            return Ok(Vec::new());
        };

        let mut current: Vec<&Element> = if path.descendant {
            context
                .iter()
                .skip(1)
                .filter(|el| first.matches(el, self.namespace))
                .collect()
        } else {
            self.children(context, first)
        };

        for step in steps {
            current = current
                .into_iter()
                .flat_map(|el| self.children(el, step))
                .collect();
        }
        Ok(current)
    }

    pub fn find<'a>(&self, context: &'a Element, path: &str) -> Result<Option<&'a Element>> {
        Ok(self.find_all(context, path)?.into_iter().next())
    }

    /// Own texts of every node under every match, in pre-order.
    pub fn node_texts<'a>(&self, context: &'a Element, path: &str) -> Result<Vec<&'a str>> {
        Ok(self
            .find_all(context, path)?
            .into_iter()
            .flat_map(Element::node_texts)
            .collect())
    }

    /// Text of the first node under the matches, or `""`.
    pub fn first_text(&self, context: &Element, path: &str) -> Result<String> {
        Ok(self
            .node_texts(context, path)?
            .first()
            .map(|text| text.to_string())
            .unwrap_or_default())
    }

    /// Text of the last node under the matches, or `""`.
    pub fn last_text(&self, context: &Element, path: &str) -> Result<String> {
        Ok(self
            .node_texts(context, path)?
            .last()
            .map(|text| text.to_string())
            .unwrap_or_default())
    }

    /// All character data under every match, concatenated.
    pub fn concat_text(&self, context: &Element, path: &str) -> Result<String> {
        Ok(self
            .find_all(context, path)?
            .into_iter()
            .map(Element::itertext)
            .collect())
    }

    fn children<'a>(&self, element: &'a Element, step: &Step) -> Vec<&'a Element> {
        element
            .children
            .iter()
            .filter(|child| step.matches(child, self.namespace))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::Document;

    const MARC: &str = r#"<record xmlns="http://www.loc.gov/MARC21/slim">
  <controlfield tag="008">750101s1920    xx</controlfield>
  <datafield tag="100" ind1="1" ind2=" ">
    <subfield code="a">Joplin, Scott,</subfield>
    <subfield code="e">composer</subfield>
  </datafield>
  <datafield tag="500"><subfield code="a">First note</subfield></datafield>
  <datafield tag="500"><subfield code="a">Second note</subfield></datafield>
  <other:datafield xmlns:other="urn:other" tag="100"><other:subfield code="a">Hidden</other:subfield></other:datafield>
</record>"#;

    fn marc() -> (Document, PathResolver) {
        (
            Document::parse("marc.xml", MARC).unwrap(),
            PathResolver::for_dialect(Dialect::Marc),
        )
    }

    #[test]
    fn test_parse_path() {
        let path: Path = r#".//datafield[@tag="100"]/subfield[@code='a']"#.parse().unwrap();
        assert!(path.descendant);
        assert_eq!(path.steps.len(), 2);
        assert_eq!(
            path.steps[1].predicate,
            Some(("code".to_string(), "a".to_string()))
        );
    }

    #[test]
    fn test_invalid_paths() {
        for expr in ["", ".//", "a//b", "a[@x=1]", "a[tag]"] {
            assert!(
                matches!(expr.parse::<Path>(), Err(ExtractError::InvalidPath { .. })),
                "{expr} should be rejected"
            );
        }
    }

    #[test]
    fn test_attribute_predicate() {
        let (doc, resolver) = marc();
        let notes = resolver
            .find_all(doc.root(), r#"datafield[@tag="500"]"#)
            .unwrap();
        assert_eq!(notes.len(), 2);

        let text = resolver
            .last_text(notes[1], r#"subfield[@code="a"]"#)
            .unwrap();
        assert_eq!(text, "Second note");
    }

    #[test]
    fn test_namespace_filters_foreign_elements() {
        let (doc, resolver) = marc();
        let composers = resolver
            .find_all(doc.root(), r#"datafield[@tag="100"]"#)
            .unwrap();
        assert_eq!(composers.len(), 1);
    }

    #[test]
    fn test_child_versus_descendant() {
        let (doc, resolver) = marc();
        assert!(resolver.find(doc.root(), "subfield").unwrap().is_none());
        assert_eq!(resolver.find_all(doc.root(), ".//subfield").unwrap().len(), 4);
    }

    #[test]
    fn test_text_helpers() {
        let (doc, resolver) = marc();
        let path = r#"datafield[@tag="100"]/subfield"#;
        assert_eq!(resolver.first_text(doc.root(), path).unwrap(), "Joplin, Scott,");
        assert_eq!(resolver.last_text(doc.root(), path).unwrap(), "composer");
        assert_eq!(
            resolver.concat_text(doc.root(), path).unwrap(),
            "Joplin, Scott,composer"
        );
    }

    #[test]
    fn test_missing_path_yields_empty() {
        let (doc, resolver) = marc();
        let path = r#"datafield[@tag="245"]/subfield[@code="a"]"#;
        assert!(resolver.find_all(doc.root(), path).unwrap().is_empty());
        assert_eq!(resolver.last_text(doc.root(), path).unwrap(), "");
    }
}
