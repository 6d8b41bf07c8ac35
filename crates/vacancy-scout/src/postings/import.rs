use tracing::{info, warn};

use super::domain::{JobPosting, PostingError};
use super::store::{AddOutcome, PostingStore, StoreError};
use crate::sources::{SourceError, VacancySource};

/// A source record that could not be stored, with the reason.
#[derive(Debug)]
pub struct RejectedPosting {
    pub title: String,
    pub reason: RejectionReason,
}

#[derive(Debug, thiserror::Error)]
pub enum RejectionReason {
    #[error(transparent)]
    Invalid(#[from] PostingError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Outcome of one fetch-and-store run.
#[derive(Debug, Default)]
pub struct ImportSummary {
    pub fetched: usize,
    pub added: Vec<String>,
    pub duplicates: usize,
    pub rejected: Vec<RejectedPosting>,
}

/// Fetch postings for `keyword` and store every one that validates.
///
/// A bad record never aborts the batch: validation and store failures are
/// collected in [`ImportSummary::rejected`]. Only a failing fetch is returned as
/// an error.
pub async fn import_vacancies<S, P>(
    source: &S,
    store: &P,
    keyword: &str,
) -> Result<ImportSummary, SourceError>
where
    S: VacancySource + ?Sized,
    P: PostingStore + ?Sized,
{
    let raw_vacancies = source.fetch(keyword).await?;
    let mut summary = ImportSummary {
        fetched: raw_vacancies.len(),
        ..ImportSummary::default()
    };

    for raw in &raw_vacancies {
        let stored = JobPosting::from_raw(raw)
            .map_err(RejectionReason::from)
            .and_then(|posting| store.add(posting.to_field_map()).map_err(RejectionReason::from));

        match stored {
            Ok(AddOutcome::Added) => summary.added.push(raw.title.clone()),
            Ok(AddOutcome::Duplicate) => summary.duplicates += 1,
            Err(reason) => {
                warn!(title = %raw.title, %reason, "posting rejected");
                summary.rejected.push(RejectedPosting {
                    title: raw.title.clone(),
                    reason,
                });
            }
        }
    }

    info!(
        keyword,
        fetched = summary.fetched,
        added = summary.added.len(),
        duplicates = summary.duplicates,
        rejected = summary.rejected.len(),
        "import finished"
    );
    Ok(summary)
}
