use std::io::{self, Write};
use std::path::Path;

use serde_json::Value;
use tracing::warn;
use vacancy_scout::postings::{
    export_csv_to_path, import_vacancies, sort_by_salary, PostingStore, SalaryRange,
};
use vacancy_scout::sources::VacancySource;

use crate::display::render_postings;

/// Actions shared by the subcommands and the interactive menu.
///
/// Every failure a user can cause is reported on `out`; only write errors on
/// `out` itself are returned.
pub(crate) struct Console<'a, S: ?Sized, P: ?Sized, W> {
    source: &'a S,
    store: &'a P,
    out: W,
}

impl<'a, S, P, W> Console<'a, S, P, W>
where
    S: VacancySource + ?Sized,
    P: PostingStore + ?Sized,
    W: Write,
{
    pub(crate) fn new(source: &'a S, store: &'a P, out: W) -> Self {
        Self { source, store, out }
    }

    pub(crate) fn out(&mut self) -> &mut W {
        &mut self.out
    }

    pub(crate) async fn fetch(&mut self, query: &str) -> io::Result<()> {
        let query = query.trim();
        if query.is_empty() {
            return writeln!(self.out, "Search query cannot be empty.");
        }

        let summary = match import_vacancies(self.source, self.store, query).await {
            Ok(summary) => summary,
            Err(err) => {
                warn!(query, error = %err, "vacancy fetch failed");
                writeln!(self.out, "Could not reach the vacancy API: {err}")?;
                return writeln!(self.out, "No postings were added.");
            }
        };

        for title in &summary.added {
            writeln!(self.out, "Posting «{title}» added.")?;
        }
        for rejected in &summary.rejected {
            writeln!(
                self.out,
                "Skipped «{}»: {}",
                rejected.title, rejected.reason
            )?;
        }
        writeln!(
            self.out,
            "Fetched {}, added {}, already stored {}, skipped {}.",
            summary.fetched,
            summary.added.len(),
            summary.duplicates,
            summary.rejected.len()
        )
    }

    pub(crate) fn delete(&mut self, raw_id: &str) -> io::Result<()> {
        let raw_id = raw_id.trim();
        let Ok(id) = raw_id.parse::<u64>() else {
            return writeln!(self.out, "Invalid id '{raw_id}': expected a whole number.");
        };

        match self.store.delete(&Value::from(id)) {
            Ok(0) => writeln!(self.out, "No posting with id {id}."),
            Ok(removed) => writeln!(self.out, "Deleted {removed} posting(s) with id {id}."),
            Err(err) => writeln!(self.out, "Could not delete posting {id}: {err}"),
        }
    }

    pub(crate) fn search(&mut self, words: &[String]) -> io::Result<()> {
        let records = self.store.filter_by_keywords(words);
        render_postings(&mut self.out, &records)
    }

    pub(crate) fn list(&mut self) -> io::Result<()> {
        self.search(&[])
    }

    pub(crate) fn salary(&mut self, expr: &str) -> io::Result<()> {
        let parsed = SalaryRange::parse(expr);
        if let Some(warning) = parsed.warning {
            return writeln!(
                self.out,
                "Invalid salary range format ({warning}). Use MIN-MAX, e.g. 100000-200000."
            );
        }
        if parsed.range.is_accept_all() {
            return writeln!(
                self.out,
                "Invalid salary range format. Use MIN-MAX, e.g. 100000-200000."
            );
        }

        let records = self.store.filter_by_salary(parsed.range);
        render_postings(&mut self.out, &records)
    }

    pub(crate) fn top(&mut self, limit: usize) -> io::Result<()> {
        let mut records = self.store.filter_by_salary(SalaryRange::accept_all());
        sort_by_salary(&mut records, true);
        records.truncate(limit);
        render_postings(&mut self.out, &records)
    }

    pub(crate) fn export(&mut self, path: &Path, words: &[String]) -> io::Result<()> {
        let records = self.store.filter_by_keywords(words);
        match export_csv_to_path(&records, path) {
            Ok(written) => writeln!(
                self.out,
                "Exported {written} posting(s) to {}.",
                path.display()
            ),
            Err(err) => writeln!(self.out, "Could not export postings: {err}"),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use tempfile::TempDir;
    use vacancy_scout::postings::JsonFileStore;
    use vacancy_scout::sources::{parse_items, RawVacancy, SourceError};

    pub(crate) struct CannedSource(pub(crate) Option<serde_json::Value>);

    #[async_trait]
    impl VacancySource for CannedSource {
        async fn connect(
            &self,
            _url: &str,
            _params: &[(&str, String)],
        ) -> Result<serde_json::Value, SourceError> {
            self.0.clone().ok_or_else(|| SourceError::Status {
                status: 502,
                body: "bad gateway".to_string(),
            })
        }

        async fn fetch(&self, _keyword: &str) -> Result<Vec<RawVacancy>, SourceError> {
            let body = self.connect("canned://", &[]).await?;
            parse_items(&body)
        }
    }

    pub(crate) fn canned_response() -> serde_json::Value {
        json!({
            "items": [
                {
                    "name": "Python Developer",
                    "alternate_url": "https://hh.ru/vacancy/1",
                    "salary": {"from": 120000},
                    "snippet": {"requirement": "<highlighttext>Python</highlighttext>, Django"}
                },
                {
                    "name": "Java Developer",
                    "alternate_url": "https://hh.ru/vacancy/2",
                    "salary": {"from": 80000},
                    "snippet": {"requirement": "Java, Spring"}
                },
                {
                    "name": "No Link",
                    "alternate_url": "ftp://hh.ru/vacancy/3"
                }
            ]
        })
    }

    pub(crate) fn temp_store() -> (TempDir, JsonFileStore) {
        let dir = TempDir::new().expect("tempdir");
        let store = JsonFileStore::open(dir.path().join("vacancies.json")).expect("store opens");
        (dir, store)
    }

    fn output(console: &mut Console<'_, CannedSource, JsonFileStore, Vec<u8>>) -> String {
        let text = String::from_utf8(console.out().clone()).expect("utf8");
        console.out().clear();
        text
    }

    #[tokio::test]
    async fn fetch_reports_added_and_skipped_postings() {
        let (_dir, store) = temp_store();
        let source = CannedSource(Some(canned_response()));
        let mut console = Console::new(&source, &store, Vec::new());

        console.fetch("developer").await.expect("write");
        let text = output(&mut console);
        assert!(text.contains("Posting «Python Developer» added."));
        assert!(text.contains("Skipped «No Link»: invalid posting: bad link"));
        assert!(text.contains("Fetched 3, added 2, already stored 0, skipped 1."));

        console.fetch("developer").await.expect("write");
        assert!(output(&mut console).contains("added 0, already stored 2"));
    }

    #[tokio::test]
    async fn fetch_failures_are_reported_as_zero_results() {
        let (_dir, store) = temp_store();
        let source = CannedSource(None);
        let mut console = Console::new(&source, &store, Vec::new());

        console.fetch("rust").await.expect("write");
        let text = output(&mut console);
        assert!(text.contains("Could not reach the vacancy API: connection failed"));
        assert!(store.load().is_empty());

        console.fetch("   ").await.expect("write");
        assert_eq!(output(&mut console), "Search query cannot be empty.\n");
    }

    #[tokio::test]
    async fn salary_top_and_delete_actions() {
        let (_dir, store) = temp_store();
        store
            .save(&[
                json!({"id": 1, "title": "Low", "link": "https://a", "salary": 80000, "description": "a"}),
                json!({"id": 2, "title": "High", "link": "https://b", "salary": 120000, "description": "b"}),
                json!({"id": 3, "title": "Secret", "link": "https://c", "salary": "unspecified", "description": "c"}),
            ]
            .into_iter()
            .map(|value| value.as_object().cloned().expect("object"))
            .collect::<Vec<_>>())
            .expect("seed");
        let source = CannedSource(None);
        let mut console = Console::new(&source, &store, Vec::new());

        console.salary("90000-130000").expect("write");
        let text = output(&mut console);
        assert!(text.contains("Title: High"));
        assert!(!text.contains("Title: Low"));

        console.salary("-50000-150000").expect("write");
        assert!(output(&mut console).starts_with("Invalid salary range format"));
        console.salary("").expect("write");
        assert!(output(&mut console).starts_with("Invalid salary range format"));

        console.top(1).expect("write");
        let text = output(&mut console);
        assert!(text.contains("Title: High"));
        assert!(text.ends_with("1 posting(s) shown.\n"));

        console.delete("abc").expect("write");
        assert!(output(&mut console).starts_with("Invalid id 'abc'"));
        console.delete("99").expect("write");
        assert_eq!(output(&mut console), "No posting with id 99.\n");
        console.delete("1").expect("write");
        assert_eq!(output(&mut console), "Deleted 1 posting(s) with id 1.\n");
        assert_eq!(store.load().len(), 2);
    }

    #[tokio::test]
    async fn export_writes_matching_postings() {
        let (dir, store) = temp_store();
        let source = CannedSource(Some(canned_response()));
        let mut console = Console::new(&source, &store, Vec::new());
        console.fetch("developer").await.expect("write");
        output(&mut console);

        let path = dir.path().join("python.csv");
        console
            .export(&path, &["django".to_string()])
            .expect("write");
        assert!(output(&mut console).starts_with("Exported 1 posting(s)"));

        let csv = std::fs::read_to_string(&path).expect("csv written");
        assert!(csv.contains("Python Developer,https://hh.ru/vacancy/1,120000,\"Python, Django\""));
    }
}
