//! Remote job-search backends.
//!
//! A [`VacancySource`] turns a search keyword into [`RawVacancy`] records. Only
//! HeadHunter is implemented; the trait keeps the import pipeline independent
//! of it.

mod headhunter;

pub use headhunter::{parse_items, HeadHunterClient};

use async_trait::async_trait;
use serde_json::Value;

use crate::postings::SalaryInput;

/// Unvalidated posting as mapped from a source response.
#[derive(Debug, Clone, PartialEq)]
pub struct RawVacancy {
    pub title: String,
    pub link: String,
    pub salary: Option<SalaryInput>,
    pub description: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("connection failed: {0}")]
    Connection(#[from] reqwest::Error),
    #[error("connection failed: source answered {status}: {body}")]
    Status { status: u16, body: String },
    #[error("unexpected response from source: {0}")]
    Decode(String),
}

#[async_trait]
pub trait VacancySource: Send + Sync {
    /// Issue a raw query against `url` and return the decoded JSON body.
    async fn connect(&self, url: &str, params: &[(&str, String)]) -> Result<Value, SourceError>;

    /// Search postings matching `keyword`.
    async fn fetch(&self, keyword: &str) -> Result<Vec<RawVacancy>, SourceError>;
}
