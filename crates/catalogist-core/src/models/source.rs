use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A raw XML resource handed to the pipeline, named by its file name.
///
/// Content is kept as raw bytes; the parser decodes it according to the
/// XML declaration, so Latin-1 and other non-UTF-8 exports are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDocument {
    pub name: String,
    pub content: Vec<u8>,
}

impl SourceDocument {
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Read a file from disk; the document name is the file name.
    pub fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read(path)?;
        Ok(Self {
            name: Self::name_for(path),
            content,
        })
    }

    /// The name a document read from `path` is reported under.
    pub fn name_for(path: &Path) -> String {
        path.file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_uses_file_name() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("druid_ab123cd4567.xml");
        std::fs::write(&path, "<mods/>").unwrap();

        let doc = SourceDocument::read(&path).unwrap();
        assert_eq!(doc.name, "druid_ab123cd4567.xml");
        assert_eq!(doc.content, b"<mods/>");
    }

    #[test]
    fn test_read_keeps_non_utf8_bytes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ars0001.xml");
        let latin1: &[u8] = b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?><ead>Dvo\xF8rak</ead>";
        std::fs::write(&path, latin1).unwrap();

        let doc = SourceDocument::read(&path).unwrap();
        assert_eq!(doc.name, "ars0001.xml");
        assert_eq!(doc.content, latin1);
    }

    #[test]
    fn test_read_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.xml");

        let err = SourceDocument::read(&path).unwrap_err();
        assert!(matches!(err, crate::error::CoreError::Io(_)));
        assert_eq!(SourceDocument::name_for(&path), "missing.xml");
    }
}
