//! Record export: CSV file or console.

use crate::error::Result;
use crate::parser::Record;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// CSV column order for exported records
pub const CSV_COLUMNS: &[&str] = &[
    "PubmedID",
    "Title",
    "Publication Date",
    "Non-academic Author(s)",
    "Company Affiliation(s)",
    "Corresponding Author Email",
];

/// Separator used when flattening list fields into one cell
const LIST_SEPARATOR: &str = "; ";

/// Flat CSV row, fields in `CSV_COLUMNS` order
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    id: &'a str,
    title: &'a str,
    publication_date: &'a str,
    authors: String,
    company_affiliations: String,
    corresponding_email: &'a str,
}

impl<'a> From<&'a Record> for CsvRow<'a> {
    fn from(record: &'a Record) -> Self {
        Self {
            id: &record.id,
            title: &record.title,
            publication_date: &record.publication_date,
            authors: record.authors.join(LIST_SEPARATOR),
            company_affiliations: record.company_affiliations.join(LIST_SEPARATOR),
            corresponding_email: &record.corresponding_email,
        }
    }
}

/// What the exporter did with the records
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// Nothing to export; no file written, nothing printed
    Empty,
    /// Records written to a CSV file
    Written { path: PathBuf, count: usize },
    /// Records printed to stdout
    Printed { count: usize },
}

/// Write records as CSV (header included) to any writer
pub fn write_records<W: Write>(writer: W, records: &[Record]) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.write_record(CSV_COLUMNS)?;

    for record in records {
        wtr.serialize(CsvRow::from(record))?;
    }

    wtr.flush()?;
    Ok(())
}

/// Save records to a CSV file, replacing any existing content
pub fn save_csv(path: &Path, records: &[Record]) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_records(file, records)?;
    info!(path = %path.display(), count = records.len(), "Saved CSV");
    Ok(())
}

/// Print records as pretty JSON
pub fn print_records<W: Write>(mut writer: W, records: &[Record]) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, records)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Export records to `output` when given, otherwise print them.
pub fn export(records: &[Record], output: Option<&Path>) -> Result<ExportOutcome> {
    if records.is_empty() {
        info!("No records with company affiliations to export");
        return Ok(ExportOutcome::Empty);
    }

    match output {
        Some(path) => {
            save_csv(path, records)?;
            Ok(ExportOutcome::Written {
                path: path.to_path_buf(),
                count: records.len(),
            })
        }
        None => {
            print_records(std::io::stdout().lock(), records)?;
            Ok(ExportOutcome::Printed {
                count: records.len(),
            })
        }
    }
}
