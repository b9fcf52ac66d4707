use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::error::{CoreError, Result};
use crate::models::dialect::Dialect;
use crate::models::field::{FieldMap, FieldValue};

/// Columnar batch result for one dialect.
///
/// Columns follow the dialect vocabulary; every column holds one value per
/// document, in the order the documents were supplied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialectTable {
    dialect: Dialect,
    columns: Vec<Vec<FieldValue>>,
}

impl DialectTable {
    pub fn empty(dialect: Dialect) -> Self {
        Self {
            dialect,
            columns: vec![Vec::new(); dialect.fields().len()],
        }
    }

    pub fn from_maps(dialect: Dialect, maps: impl IntoIterator<Item = FieldMap>) -> Result<Self> {
        let mut table = Self::empty(dialect);
        for map in maps {
            table.push(map)?;
        }
        Ok(table)
    }

    pub fn push(&mut self, map: FieldMap) -> Result<()> {
        if map.dialect() != self.dialect {
            return Err(CoreError::VocabularyMismatch {
                expected: self.dialect.to_string(),
                found: map.dialect().to_string(),
            });
        }
        for (column, value) in self.columns.iter_mut().zip(map.into_values()) {
            column.push(value);
        }
        Ok(())
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn fields(&self) -> &'static [&'static str] {
        self.dialect.fields()
    }

    pub fn column(&self, field: &str) -> Option<&[FieldValue]> {
        self.fields()
            .iter()
            .position(|name| *name == field)
            .map(|index| self.columns[index].as_slice())
    }

    /// Number of rows (documents).
    pub fn len(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Row-wise view, one entry per document.
    pub fn rows(&self) -> impl Iterator<Item = Vec<&FieldValue>> + '_ {
        (0..self.len()).map(move |row| self.columns.iter().map(|column| &column[row]).collect())
    }
}

impl Serialize for DialectTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (name, column) in self.fields().iter().zip(&self.columns) {
            map.serialize_entry(name, column)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marc_row(title: &str) -> FieldMap {
        let mut map = FieldMap::new(Dialect::Marc);
        map.set("title", title).unwrap();
        map
    }

    #[test]
    fn test_empty_table_keeps_every_key() {
        let table = DialectTable::from_maps(Dialect::Mods, Vec::new()).unwrap();
        assert!(table.is_empty());
        for field in Dialect::Mods.fields() {
            assert_eq!(table.column(field).map(<[FieldValue]>::len), Some(0));
        }
    }

    #[test]
    fn test_preserves_input_order() {
        let table = DialectTable::from_maps(
            Dialect::Marc,
            vec![marc_row("First"), marc_row("Second"), marc_row("Third")],
        )
        .unwrap();

        assert_eq!(table.len(), 3);
        let titles: Vec<_> = table
            .column("title")
            .unwrap()
            .iter()
            .map(|v| v.render(""))
            .collect();
        assert_eq!(titles, vec!["First", "Second", "Third"]);
        for field in Dialect::Marc.fields() {
            assert_eq!(table.column(field).unwrap().len(), 3);
        }
    }

    #[test]
    fn test_rejects_foreign_vocabulary() {
        let mut table = DialectTable::empty(Dialect::Marc);
        let err = table.push(FieldMap::new(Dialect::Mods)).unwrap_err();
        assert!(matches!(err, CoreError::VocabularyMismatch { .. }));
        assert!(table.is_empty());
    }

    #[test]
    fn test_rows_view() {
        let table = DialectTable::from_maps(Dialect::Marc, vec![marc_row("Only")]).unwrap();
        let rows: Vec<_> = table.rows().collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].len(), Dialect::Marc.fields().len());
        assert_eq!(rows[0][0].render(""), "Only");
    }
}
