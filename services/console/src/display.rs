use std::io::{self, Write};

use serde_json::Value;
use vacancy_scout::postings::{PostingRecord, Salary, NO_DESCRIPTION, UNSPECIFIED};

const SEPARATOR_WIDTH: usize = 40;

pub(crate) fn render_postings<W: Write>(out: &mut W, records: &[PostingRecord]) -> io::Result<()> {
    if records.is_empty() {
        return writeln!(out, "No postings found.");
    }

    for record in records {
        render_posting(out, record)?;
    }
    writeln!(out, "{} posting(s) shown.", records.len())
}

fn render_posting<W: Write>(out: &mut W, record: &PostingRecord) -> io::Result<()> {
    if let Some(id) = record.get("id") {
        writeln!(out, "ID: {}", plain(id))?;
    }
    writeln!(out, "Title: {}", text_or(record.get("title"), "untitled"))?;
    writeln!(out, "Link: {}", text_or(record.get("link"), "no link"))?;
    writeln!(out, "Salary: {}", salary_label(record.get("salary")))?;
    writeln!(
        out,
        "Description: {}",
        text_or(record.get("description"), NO_DESCRIPTION)
    )?;
    writeln!(out, "{}", "-".repeat(SEPARATOR_WIDTH))
}

fn salary_label(value: Option<&Value>) -> String {
    match value {
        Some(Value::Number(_)) => format!("{} RUB", Salary::from_json(value)),
        Some(Value::String(text)) if !text.is_empty() => text.clone(),
        _ => UNSPECIFIED.to_string(),
    }
}

fn text_or(value: Option<&Value>, fallback: &str) -> String {
    match value {
        Some(Value::String(text)) if !text.is_empty() => text.clone(),
        Some(Value::Null) | None => fallback.to_string(),
        Some(Value::String(_)) => fallback.to_string(),
        Some(other) => other.to_string(),
    }
}

fn plain(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
