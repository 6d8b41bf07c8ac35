use async_trait::async_trait;
use serde_json::{json, Value};
use tempfile::TempDir;
use vacancy_scout::postings::{
    import_vacancies, JsonFileStore, PostingError, PostingStore, RejectionReason, SalaryInput,
    SalaryRange, NO_DESCRIPTION, UNSPECIFIED,
};
use vacancy_scout::sources::{parse_items, RawVacancy, SourceError, VacancySource};

/// Serves a canned HeadHunter response body instead of calling the network.
struct CannedSource {
    body: Value,
}

#[async_trait]
impl VacancySource for CannedSource {
    async fn connect(&self, _url: &str, _params: &[(&str, String)]) -> Result<Value, SourceError> {
        Ok(self.body.clone())
    }

    async fn fetch(&self, _keyword: &str) -> Result<Vec<RawVacancy>, SourceError> {
        let body = self.connect("canned://vacancies", &[]).await?;
        parse_items(&body)
    }
}

struct UnreachableSource;

#[async_trait]
impl VacancySource for UnreachableSource {
    async fn connect(&self, _url: &str, _params: &[(&str, String)]) -> Result<Value, SourceError> {
        Err(SourceError::Status {
            status: 503,
            body: "maintenance".to_string(),
        })
    }

    async fn fetch(&self, keyword: &str) -> Result<Vec<RawVacancy>, SourceError> {
        self.connect("https://api.hh.ru/vacancies", &[("text", keyword.to_string())])
            .await
            .map(|_| Vec::new())
    }
}

fn search_response() -> Value {
    json!({
        "items": [
            {
                "name": "Python Developer",
                "alternate_url": "https://hh.ru/vacancy/1",
                "salary": {"from": 120000, "to": null},
                "snippet": {"requirement": "Опыт работы с <highlighttext>Python</highlighttext> от 3 лет"}
            },
            {
                "name": "Java Developer",
                "alternate_url": "https://hh.ru/vacancy/2",
                "salary": {"from": 80000},
                "snippet": {"requirement": "Spring, Kafka"}
            },
            {
                "name": "Mystery Role",
                "alternate_url": "https://hh.ru/vacancy/3",
                "salary": null,
                "snippet": {}
            },
            {
                "name": "",
                "alternate_url": "https://hh.ru/vacancy/4"
            },
            {
                "name": "Broken Link",
                "alternate_url": "hh.ru/vacancy/5"
            }
        ]
    })
}

fn temp_store() -> (TempDir, JsonFileStore) {
    let dir = TempDir::new().expect("tempdir");
    let store = JsonFileStore::open(dir.path().join("vacancies.json")).expect("store opens");
    (dir, store)
}

#[tokio::test]
async fn import_stores_valid_postings_and_reports_rejections() {
    let (_dir, store) = temp_store();
    let source = CannedSource {
        body: search_response(),
    };

    let summary = import_vacancies(&source, &store, "developer")
        .await
        .expect("import succeeds");

    assert_eq!(summary.fetched, 5);
    assert_eq!(
        summary.added,
        vec!["Python Developer", "Java Developer", "Mystery Role"]
    );
    assert_eq!(summary.duplicates, 0);
    assert_eq!(summary.rejected.len(), 2);
    assert!(matches!(
        summary.rejected[0].reason,
        RejectionReason::Invalid(PostingError::EmptyTitle)
    ));
    assert!(matches!(
        summary.rejected[1].reason,
        RejectionReason::Invalid(PostingError::BadLink(_))
    ));

    let stored = store.load();
    assert_eq!(stored.len(), 3);
    assert_eq!(stored[0]["description"], json!("Опыт работы с Python от 3 лет"));
    assert_eq!(stored[0]["salary"], json!(120000.0));
    assert_eq!(stored[2]["salary"], json!(UNSPECIFIED));
    assert_eq!(stored[2]["description"], json!(NO_DESCRIPTION));
}

#[tokio::test]
async fn repeated_import_only_counts_duplicates() {
    let (_dir, store) = temp_store();
    let source = CannedSource {
        body: search_response(),
    };

    import_vacancies(&source, &store, "developer")
        .await
        .expect("first import");
    let second = import_vacancies(&source, &store, "developer")
        .await
        .expect("second import");

    assert!(second.added.is_empty());
    assert_eq!(second.duplicates, 3);
    assert_eq!(store.load().len(), 3);
}

#[tokio::test]
async fn source_failures_are_returned_without_touching_the_store() {
    let (_dir, store) = temp_store();

    let err = import_vacancies(&UnreachableSource, &store, "rust")
        .await
        .expect_err("source is down");

    assert!(matches!(err, SourceError::Status { status: 503, .. }));
    assert!(err.to_string().starts_with("connection failed"));
    assert!(store.load().is_empty());
}

#[tokio::test]
async fn imported_postings_feed_both_filters() {
    let (_dir, store) = temp_store();
    let source = CannedSource {
        body: search_response(),
    };
    import_vacancies(&source, &store, "developer")
        .await
        .expect("import succeeds");

    let kafka = store.filter_by_keywords(&["KAFKA".to_string()]);
    assert_eq!(kafka.len(), 1);
    assert_eq!(kafka[0]["title"], json!("Java Developer"));

    let range = SalaryRange::parse("90000-130000").range;
    let paid = store.filter_by_salary(range);
    assert_eq!(paid.len(), 1);
    assert_eq!(paid[0]["title"], json!("Python Developer"));

    assert_eq!(store.filter_by_keywords(&[]).len(), store.load().len());
}

#[test]
fn manual_posting_round_trips_through_the_store() {
    let (_dir, store) = temp_store();
    let posting = vacancy_scout::postings::JobPosting::new(
        "Python Developer",
        "https://x",
        Some(SalaryInput::Number(100_000.0)),
        Some("Opt <b>Python</b>"),
    )
    .expect("valid posting");

    store.add(posting.to_field_map()).expect("add succeeds");
    store.add(posting.to_field_map()).expect("duplicate add is not an error");

    let stored = store.load();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0]["description"], json!("Opt Python"));
}
