use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::domain::PostingRecord;
use super::salary::{Salary, SalaryRange};
use super::sanitize::strip_markup;

/// Fields every stored posting must carry.
pub const REQUIRED_FIELDS: [&str; 4] = ["title", "link", "salary", "description"];

/// Storage abstraction so alternative backends can stand in for the JSON file.
pub trait PostingStore {
    fn add(&self, record: PostingRecord) -> Result<AddOutcome, StoreError>;
    fn delete(&self, id: &Value) -> Result<usize, StoreError>;
    fn filter_by_keywords(&self, words: &[String]) -> Vec<PostingRecord>;
    fn filter_by_salary(&self, range: SalaryRange) -> Vec<PostingRecord>;
}

/// What [`PostingStore::add`] did with a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    Duplicate,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("posting is missing required field '{0}'")]
    MissingField(String),
    #[error("failed to access posting store {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to encode postings: {0}")]
    Encode(#[from] serde_json::Error),
}

impl StoreError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Ordered collection of posting records kept as a JSON array in a single file.
///
/// Every mutation is a full load, modify, rewrite cycle. Concurrent writers
/// are not coordinated and a crash mid-write can leave a truncated file, which
/// later loads as an empty store.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Open the store at `path`, creating parent directories and an empty
    /// array file when nothing exists there yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let store = Self { path: path.into() };
        if !store.path.exists() {
            if let Some(parent) = store.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(|err| StoreError::io(parent, err))?;
            }
            store.save(&[])?;
            info!(path = %store.path.display(), "created empty posting store");
        }
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every stored record. Missing, unreadable or malformed files read as
    /// an empty store.
    pub fn load(&self) -> Vec<PostingRecord> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Vec::new(),
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "posting store unreadable, treating as empty");
                return Vec::new();
            }
        };

        let records = match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Array(items)) => items
                .into_iter()
                .map(|item| match item {
                    Value::Object(record) => Some(record),
                    _ => None,
                })
                .collect::<Option<Vec<_>>>(),
            Ok(_) => None,
            Err(err) => {
                debug!(path = %self.path.display(), error = %err, "posting store is not valid JSON");
                None
            }
        };

        match records {
            Some(records) => {
                debug!(path = %self.path.display(), count = records.len(), "loaded postings");
                records
            }
            None => {
                warn!(path = %self.path.display(), "posting store is not a list of objects, treating as empty");
                Vec::new()
            }
        }
    }

    /// Rewrite the whole file with `records`, in order.
    pub fn save(&self, records: &[PostingRecord]) -> Result<(), StoreError> {
        let mut buffer = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        records.serialize(&mut serializer)?;

        fs::write(&self.path, buffer).map_err(|err| StoreError::io(&self.path, err))?;
        debug!(path = %self.path.display(), count = records.len(), "saved postings");
        Ok(())
    }
}

impl PostingStore for JsonFileStore {
    fn add(&self, mut record: PostingRecord) -> Result<AddOutcome, StoreError> {
        if let Some(missing) = REQUIRED_FIELDS
            .iter()
            .find(|field| !record.contains_key(**field))
        {
            return Err(StoreError::MissingField(missing.to_string()));
        }

        let description = strip_markup(record.get("description").and_then(Value::as_str));
        record.insert("description".to_string(), Value::String(description));

        let mut records = self.load();
        if records.iter().any(|stored| records_match(stored, &record)) {
            debug!(title = ?record.get("title"), "posting already stored, skipping");
            return Ok(AddOutcome::Duplicate);
        }

        info!(title = ?record.get("title"), "posting added");
        records.push(record);
        self.save(&records)?;
        Ok(AddOutcome::Added)
    }

    fn delete(&self, id: &Value) -> Result<usize, StoreError> {
        let mut records = self.load();
        let before = records.len();
        records.retain(|record| !record.get("id").is_some_and(|stored| values_match(stored, id)));
        let removed = before - records.len();

        self.save(&records)?;
        info!(%id, removed, "deleted postings");
        Ok(removed)
    }

    fn filter_by_keywords(&self, words: &[String]) -> Vec<PostingRecord> {
        let records = self.load();
        if words.is_empty() {
            return records;
        }

        let needles: Vec<String> = words.iter().map(|word| word.to_lowercase()).collect();
        records
            .into_iter()
            .filter(|record| {
                let haystack =
                    strip_markup(record.get("description").and_then(Value::as_str)).to_lowercase();
                needles.iter().any(|needle| haystack.contains(needle.as_str()))
            })
            .collect()
    }

    fn filter_by_salary(&self, range: SalaryRange) -> Vec<PostingRecord> {
        self.load()
            .into_iter()
            .filter(|record| match record.get("salary") {
                Some(value @ Value::Number(_)) => match Salary::from_json(Some(value)) {
                    Salary::Numeric(amount) => range.contains(amount),
                    Salary::Unspecified => false,
                },
                _ => false,
            })
            .collect()
    }
}

/// Same key set, every field equal under [`values_match`].
fn records_match(lhs: &PostingRecord, rhs: &PostingRecord) -> bool {
    lhs.len() == rhs.len()
        && lhs
            .iter()
            .all(|(key, value)| rhs.get(key).is_some_and(|other| values_match(value, other)))
}

/// JSON equality where numbers compare numerically, so `1` matches `1.0`.
fn values_match(lhs: &Value, rhs: &Value) -> bool {
    match (lhs, rhs) {
        (Value::Number(lhs), Value::Number(rhs)) => lhs.as_f64() == rhs.as_f64(),
        (Value::Array(lhs), Value::Array(rhs)) => {
            lhs.len() == rhs.len() && lhs.iter().zip(rhs).all(|(l, r)| values_match(l, r))
        }
        (Value::Object(lhs), Value::Object(rhs)) => records_match(lhs, rhs),
        _ => lhs == rhs,
    }
}
