use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::dialect::Dialect;
use crate::models::table::DialectTable;

/// A document that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedDocument {
    pub name: String,
    pub error: String,
}

/// Outcome of one batch: a table per recognized dialect, plus the documents
/// that produced no row.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub generated_at: DateTime<Utc>,
    pub total: usize,
    pub finding_aids: DialectTable,
    pub marc: DialectTable,
    pub mods: DialectTable,
    /// Documents whose root namespace matched no dialect.
    pub skipped: Vec<String>,
    pub failed: Vec<FailedDocument>,
}

impl BatchReport {
    pub fn new(total: usize) -> Self {
        Self {
            generated_at: Utc::now(),
            total,
            finding_aids: DialectTable::empty(Dialect::FindingAid),
            marc: DialectTable::empty(Dialect::Marc),
            mods: DialectTable::empty(Dialect::Mods),
            skipped: Vec::new(),
            failed: Vec::new(),
        }
    }

    pub fn table(&self, dialect: Dialect) -> Option<&DialectTable> {
        match dialect {
            Dialect::FindingAid => Some(&self.finding_aids),
            Dialect::Marc => Some(&self.marc),
            Dialect::Mods => Some(&self.mods),
            Dialect::Unknown => None,
        }
    }

    pub fn table_mut(&mut self, dialect: Dialect) -> Option<&mut DialectTable> {
        match dialect {
            Dialect::FindingAid => Some(&mut self.finding_aids),
            Dialect::Marc => Some(&mut self.marc),
            Dialect::Mods => Some(&mut self.mods),
            Dialect::Unknown => None,
        }
    }

    /// All three tables in output order, empty ones included.
    pub fn tables(&self) -> [&DialectTable; 3] {
        [&self.finding_aids, &self.marc, &self.mods]
    }

    pub fn row_count(&self) -> usize {
        self.tables().iter().map(|table| table.len()).sum()
    }

    /// Rows, skips and failures together account for every input.
    pub fn is_complete(&self) -> bool {
        self.row_count() + self.skipped.len() + self.failed.len() == self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::field::FieldMap;

    #[test]
    fn test_new_report_has_all_tables() {
        let report = BatchReport::new(0);
        for dialect in Dialect::RECOGNIZED {
            let table = report.table(dialect).unwrap();
            assert_eq!(table.dialect(), dialect);
            assert!(table.is_empty());
        }
        assert!(report.table(Dialect::Unknown).is_none());
        assert!(report.is_complete());
    }

    #[test]
    fn test_accounting() {
        let mut report = BatchReport::new(3);
        report
            .table_mut(Dialect::Marc)
            .unwrap()
            .push(FieldMap::new(Dialect::Marc))
            .unwrap();
        report.skipped.push("tei.xml".to_string());
        assert!(!report.is_complete());

        report.failed.push(FailedDocument {
            name: "broken.xml".to_string(),
            error: "unexpected end of file".to_string(),
        });
        assert_eq!(report.row_count(), 1);
        assert!(report.is_complete());
    }
}
