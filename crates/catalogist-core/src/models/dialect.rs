use serde::{Deserialize, Serialize};

/// Namespace of EAD finding aids.
pub const FINDING_AID_NAMESPACE: &str = "urn:isbn:1-931666-22-9";
/// Namespace of MODS v3 records.
pub const MODS_NAMESPACE: &str = "http://www.loc.gov/mods/v3";
/// Namespace of MARC21 slim records.
pub const MARC_NAMESPACE: &str = "http://www.loc.gov/MARC21/slim";

pub const FINDING_AID_FIELDS: &[&str] = &[
    "full_description",
    "description",
    "title",
    "label",
    "inventory_number",
    "collection_creator",
    "collection_size",
    "url",
];

pub const MODS_FIELDS: &[&str] = &[
    "title",
    "uniform_title",
    "subtitle",
    "composer",
    "arranger",
    "instrumentalist",
    "performer",
    "publisher",
    "extent",
    "date_issued",
    "identifier",
    "genre",
    "record_identifier",
];

pub const MARC_FIELDS: &[&str] = &[
    "title",
    "subtitle",
    "composer",
    "arranger",
    "instrumentalist",
    "publisher",
    "size",
    "catalog_number",
    "date",
    "identifier",
    "collection",
    "citation_a",
    "citation_c",
    "roll_type",
];

/// The XML metadata schema a document is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    FindingAid,
    Mods,
    Marc,
    Unknown,
}

impl Dialect {
    /// Dialects that produce output tables, in output order.
    pub const RECOGNIZED: [Dialect; 3] = [Dialect::FindingAid, Dialect::Marc, Dialect::Mods];

    /// Resolve a root element namespace URI to a dialect.
    pub fn from_namespace(namespace: Option<&str>) -> Self {
        match namespace {
            Some(FINDING_AID_NAMESPACE) => Self::FindingAid,
            Some(MODS_NAMESPACE) => Self::Mods,
            Some(MARC_NAMESPACE) => Self::Marc,
            _ => Self::Unknown,
        }
    }

    pub fn namespace(&self) -> Option<&'static str> {
        match self {
            Self::FindingAid => Some(FINDING_AID_NAMESPACE),
            Self::Mods => Some(MODS_NAMESPACE),
            Self::Marc => Some(MARC_NAMESPACE),
            Self::Unknown => None,
        }
    }

    /// Fixed field vocabulary, in column order.
    pub fn fields(&self) -> &'static [&'static str] {
        match self {
            Self::FindingAid => FINDING_AID_FIELDS,
            Self::Mods => MODS_FIELDS,
            Self::Marc => MARC_FIELDS,
            Self::Unknown => &[],
        }
    }

    /// Human-readable table label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::FindingAid => "Finding aids",
            Self::Mods => "MODS",
            Self::Marc => "MARCS",
            Self::Unknown => "Unknown",
        }
    }

    pub fn csv_file_name(&self) -> String {
        format!("{}.csv", self.label())
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespace_roundtrip() {
        for dialect in Dialect::RECOGNIZED {
            assert_eq!(Dialect::from_namespace(dialect.namespace()), dialect);
        }
    }

    #[test]
    fn test_unknown_namespace() {
        assert_eq!(Dialect::from_namespace(None), Dialect::Unknown);
        assert_eq!(
            Dialect::from_namespace(Some("http://www.tei-c.org/ns/1.0")),
            Dialect::Unknown
        );
        assert!(Dialect::Unknown.fields().is_empty());
    }

    #[test]
    fn test_csv_file_names() {
        assert_eq!(Dialect::FindingAid.csv_file_name(), "Finding aids.csv");
        assert_eq!(Dialect::Marc.csv_file_name(), "MARCS.csv");
        assert_eq!(Dialect::Mods.csv_file_name(), "MODS.csv");
    }
}
