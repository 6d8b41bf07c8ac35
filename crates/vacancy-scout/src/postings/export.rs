use std::io::Write;
use std::path::Path;

use serde::Serialize;
use serde_json::Value;

use super::domain::PostingRecord;
use super::salary::Salary;
use super::sanitize::strip_markup;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to write CSV export: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to write CSV export: {0}")]
    Io(#[from] std::io::Error),
}

const HEADER: [&str; 4] = ["title", "link", "salary", "description"];

#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    title: &'a str,
    link: &'a str,
    salary: String,
    description: String,
}

impl<'a> ExportRow<'a> {
    fn from_record(record: &'a PostingRecord) -> Self {
        Self {
            title: text_field(record, "title"),
            link: text_field(record, "link"),
            salary: Salary::from_json(record.get("salary")).to_string(),
            description: strip_markup(record.get("description").and_then(Value::as_str)),
        }
    }
}

fn text_field<'a>(record: &'a PostingRecord, field: &str) -> &'a str {
    record.get(field).and_then(Value::as_str).unwrap_or_default()
}

/// Write `records` as CSV with a `title,link,salary,description` header, which
/// is written even when there are no records.
/// Returns the number of rows written.
pub fn export_csv<W: Write>(records: &[PostingRecord], writer: W) -> Result<usize, ExportError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv_writer.write_record(HEADER)?;

    for record in records {
        csv_writer.serialize(ExportRow::from_record(record))?;
    }
    csv_writer.flush()?;
    Ok(records.len())
}

pub fn export_csv_to_path<P: AsRef<Path>>(
    records: &[PostingRecord],
    path: P,
) -> Result<usize, ExportError> {
    let file = std::fs::File::create(path)?;
    export_csv(records, file)
}
