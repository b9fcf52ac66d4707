use quick_xml::NsReader;
use quick_xml::encoding::Decoder;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;

use catalogist_core::SourceDocument;

use crate::error::{ExtractError, Result};

/// One element of a parsed tree.
///
/// `text` is the character data before the first child element and `tail`
/// the character data following this element inside its parent, as in an
/// element tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub namespace: Option<String>,
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub text: Option<String>,
    pub tail: Option<String>,
    pub children: Vec<Element>,
}

impl Element {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn is(&self, namespace: Option<&str>, name: &str) -> bool {
        self.name == name && self.namespace.as_deref() == namespace
    }

    /// Own text, or `""`.
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    /// Pre-order walk over this element and all of its descendants.
    pub fn iter(&self) -> Iter<'_> {
        Iter { stack: vec![self] }
    }

    /// Own text of every node in [`Element::iter`] order, `""` where absent.
    pub fn node_texts(&self) -> Vec<&str> {
        self.iter().map(Element::text).collect()
    }

    /// All character data in the subtree, children's tails included.
    pub fn itertext(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        out.push_str(self.text());
        for child in &self.children {
            child.collect_text(out);
            if let Some(tail) = &child.tail {
                out.push_str(tail);
            }
        }
    }
}

pub struct Iter<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        let element = self.stack.pop()?;
        self.stack.extend(element.children.iter().rev());
        Some(element)
    }
}

/// A parsed XML file. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    name: String,
    root: Element,
}

impl Document {
    pub fn parse(name: impl Into<String>, xml: &str) -> Result<Self> {
        let name = name.into();
        let root = parse_tree(&name, NsReader::from_str(xml))?;
        Ok(Self { name, root })
    }

    /// Parse raw bytes, decoding them per the XML declaration's encoding
    /// (UTF-8 when undeclared).
    pub fn parse_bytes(name: impl Into<String>, xml: &[u8]) -> Result<Self> {
        let name = name.into();
        let root = parse_tree(&name, NsReader::from_reader(xml))?;
        Ok(Self { name, root })
    }

    pub fn from_source(source: &SourceDocument) -> Result<Self> {
        Self::parse_bytes(source.name.clone(), &source.content)
    }

    /// Source file name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    /// Namespace URI of the root element.
    pub fn namespace(&self) -> Option<&str> {
        self.root.namespace.as_deref()
    }
}

fn parse_tree(document: &str, mut reader: NsReader<&[u8]>) -> Result<Element> {
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let (resolved, event) = reader
            .read_resolved_event()
            .map_err(|e| ExtractError::xml(document, e))?;
        let namespace = match resolved {
            ResolveResult::Bound(ns) => Some(String::from_utf8_lossy(ns.0).into_owned()),
            _ => None,
        };

        match event {
            Event::Start(start) => {
                ensure_single_root(document, &root)?;
                let element = open_element(document, reader.decoder(), namespace, &start)?;
                stack.push(element);
            }
            Event::Empty(start) => {
                ensure_single_root(document, &root)?;
                let element = open_element(document, reader.decoder(), namespace, &start)?;
                close_element(element, &mut stack, &mut root);
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| ExtractError::xml(document, "unbalanced end tag"))?;
                close_element(element, &mut stack, &mut root);
            }
            Event::Text(text) => {
                let text = text.unescape().map_err(|e| ExtractError::xml(document, e))?;
                append_text(&mut stack, &text);
            }
            Event::CData(data) => {
                let data = data.decode().map_err(|e| ExtractError::xml(document, e))?;
                append_text(&mut stack, &data);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(ExtractError::xml(document, "unexpected end of document"));
    }
    root.ok_or_else(|| ExtractError::EmptyDocument(document.to_string()))
}

fn ensure_single_root(document: &str, root: &Option<Element>) -> Result<()> {
    if root.is_some() {
        return Err(ExtractError::xml(document, "multiple root elements"));
    }
    Ok(())
}

fn open_element(
    document: &str,
    decoder: Decoder,
    namespace: Option<String>,
    start: &BytesStart<'_>,
) -> Result<Element> {
    let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| ExtractError::xml(document, e))?;
        if attr.key.as_ref().starts_with(b"xmlns") {
            continue;
        }
        let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
        let value = attr
            .decode_and_unescape_value(decoder)
            .map_err(|e| ExtractError::xml(document, e))?
            .into_owned();
        attributes.push((key, value));
    }
    Ok(Element {
        namespace,
        name,
        attributes,
        ..Default::default()
    })
}

fn close_element(element: Element, stack: &mut [Element], root: &mut Option<Element>) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => *root = Some(element),
    }
}

fn append_text(stack: &mut [Element], text: &str) {
    let Some(current) = stack.last_mut() else {
        return;
    };
    let slot = match current.children.last_mut() {
        Some(child) => &mut child.tail,
        None => &mut current.text,
    };
    slot.get_or_insert_with(String::new).push_str(text);
}
