use std::io::Write;
use std::path::{Path, PathBuf};

use csv::Writer;

use crate::error::Result;
use crate::models::{BatchReport, DialectTable};

/// Write one table as CSV: a header row of field names, then one row per
/// document. List values are joined with `list_separator`.
pub fn write_table<W: Write>(table: &DialectTable, writer: W, list_separator: &str) -> Result<()> {
    let mut csv_writer = Writer::from_writer(writer);
    csv_writer.write_record(table.fields())?;
    for row in table.rows() {
        csv_writer.write_record(row.iter().map(|value| value.render(list_separator)))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write every non-empty table of a report into `dir`, one file per dialect.
pub fn write_report(
    report: &BatchReport,
    dir: &Path,
    list_separator: &str,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;
    let mut written = Vec::new();
    for table in report.tables() {
        if table.is_empty() {
            continue;
        }
        let path = dir.join(table.dialect().csv_file_name());
        let file = std::fs::File::create(&path)?;
        write_table(table, file, list_separator)?;
        tracing::info!(path = %path.display(), rows = table.len(), "wrote table");
        written.push(path);
    }
    Ok(written)
}
