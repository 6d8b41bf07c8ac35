//! Normalization, persistence and filtering of job postings.
//!
//! Raw records coming from a [`crate::sources::VacancySource`] are validated into a
//! [`JobPosting`], flattened into a [`PostingRecord`] and handed to a
//! [`PostingStore`]. Filters read the stored records directly.

pub mod domain;
pub mod export;
pub mod import;
pub mod salary;
pub mod sanitize;
pub mod store;

pub use domain::{sort_by_salary, JobPosting, PostingError, PostingRecord};
pub use export::{export_csv, export_csv_to_path, ExportError};
pub use import::{import_vacancies, ImportSummary, RejectedPosting, RejectionReason};
pub use salary::{RangeParse, RangeWarning, Salary, SalaryInput, SalaryRange, UNSPECIFIED};
pub use sanitize::{strip_markup, NO_DESCRIPTION};
pub use store::{AddOutcome, JsonFileStore, PostingStore, StoreError, REQUIRED_FIELDS};
