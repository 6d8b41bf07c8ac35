use std::cmp::Ordering;
use std::fmt;

use serde_json::{Map, Value};

use super::salary::{Salary, SalaryInput};
use super::sanitize::strip_markup;
use crate::sources::RawVacancy;

/// Field map persisted for each posting.
pub type PostingRecord = Map<String, Value>;

/// Validation failures raised while building a [`JobPosting`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PostingError {
    #[error("invalid posting: empty title")]
    EmptyTitle,
    #[error("invalid posting: bad link '{0}'")]
    BadLink(String),
}

/// A validated job listing. Fields are fixed once construction succeeds.
#[derive(Debug, Clone, PartialEq)]
pub struct JobPosting {
    title: String,
    link: String,
    salary: Salary,
    description: String,
}

impl JobPosting {
    /// Validate and normalize a posting.
    ///
    /// Checks run in order (title, then link), so an empty title is reported even
    /// when the link is also wrong.
    pub fn new(
        title: impl Into<String>,
        link: impl Into<String>,
        salary: Option<SalaryInput>,
        description: Option<&str>,
    ) -> Result<Self, PostingError> {
        let title = title.into();
        if title.is_empty() {
            return Err(PostingError::EmptyTitle);
        }

        let link = link.into();
        if !link.starts_with("http") {
            return Err(PostingError::BadLink(link));
        }

        Ok(Self {
            title,
            link,
            salary: Salary::from_input(salary),
            description: strip_markup(description),
        })
    }

    pub fn from_raw(raw: &RawVacancy) -> Result<Self, PostingError> {
        Self::new(
            raw.title.as_str(),
            raw.link.as_str(),
            raw.salary.clone(),
            raw.description.as_deref(),
        )
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn link(&self) -> &str {
        &self.link
    }

    pub fn salary(&self) -> Salary {
        self.salary
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Compare by salary. `None` whenever either salary is undisclosed.
    pub fn salary_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self.salary, other.salary) {
            (Salary::Numeric(lhs), Salary::Numeric(rhs)) => lhs.partial_cmp(&rhs),
            _ => None,
        }
    }

    pub fn pays_less_than(&self, other: &Self) -> bool {
        self.salary_cmp(other) == Some(Ordering::Less)
    }

    pub fn pays_more_than(&self, other: &Self) -> bool {
        self.salary_cmp(other) == Some(Ordering::Greater)
    }

    pub fn to_field_map(&self) -> PostingRecord {
        let mut record = Map::new();
        record.insert("title".to_string(), Value::from(self.title.as_str()));
        record.insert("link".to_string(), Value::from(self.link.as_str()));
        record.insert("salary".to_string(), self.salary.to_json());
        record.insert(
            "description".to_string(),
            Value::from(self.description.as_str()),
        );
        record
    }
}

impl fmt::Display for JobPosting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}, {}", self.title, self.salary)?;
        writeln!(f, "{}", self.description)?;
        write!(f, "link: {}", self.link)
    }
}

/// Order stored records by numeric salary. Records without a numeric salary
/// keep their relative order and always sort after the paid ones.
pub fn sort_by_salary(records: &mut [PostingRecord], descending: bool) {
    records.sort_by(|lhs, rhs| {
        let lhs = Salary::from_json(lhs.get("salary")).amount();
        let rhs = Salary::from_json(rhs.get("salary")).amount();
        match (lhs, rhs) {
            (Some(lhs), Some(rhs)) if descending => rhs.total_cmp(&lhs),
            (Some(lhs), Some(rhs)) => lhs.total_cmp(&rhs),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    });
}
