use async_trait::async_trait;
use reqwest::header::USER_AGENT;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use super::{RawVacancy, SourceError, VacancySource};
use crate::config::SourceConfig;
use crate::postings::{strip_markup, SalaryInput};

/// Client for the public `api.hh.ru/vacancies` search endpoint.
#[derive(Debug, Clone)]
pub struct HeadHunterClient {
    http: Client,
    config: SourceConfig,
}

impl HeadHunterClient {
    pub fn new(config: SourceConfig) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    fn search_params(&self, keyword: &str) -> Vec<(&'static str, String)> {
        vec![
            ("text", keyword.to_string()),
            ("per_page", self.config.per_page.to_string()),
            ("only_with_salary", self.config.only_with_salary.to_string()),
        ]
    }
}

#[async_trait]
impl VacancySource for HeadHunterClient {
    async fn connect(&self, url: &str, params: &[(&str, String)]) -> Result<Value, SourceError> {
        let response = self
            .http
            .get(url)
            .header(USER_AGENT, &self.config.user_agent)
            .query(params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|err| SourceError::Decode(err.to_string()))
    }

    async fn fetch(&self, keyword: &str) -> Result<Vec<RawVacancy>, SourceError> {
        let params = self.search_params(keyword);
        let body = self.connect(&self.config.base_url, &params).await?;
        let vacancies = parse_items(&body)?;
        debug!(keyword, count = vacancies.len(), "fetched HeadHunter vacancies");
        Ok(vacancies)
    }
}

/// Map a search response body to raw postings.
///
/// A body without `items` yields no postings; a body that is not an object is
/// a decode error. Items that are not objects are skipped.
pub fn parse_items(body: &Value) -> Result<Vec<RawVacancy>, SourceError> {
    let Value::Object(root) = body else {
        return Err(SourceError::Decode(
            "search response is not a JSON object".to_string(),
        ));
    };

    let items = match root.get("items") {
        Some(Value::Array(items)) => items.as_slice(),
        Some(_) => {
            return Err(SourceError::Decode(
                "search response 'items' is not a list".to_string(),
            ))
        }
        None => &[],
    };

    let mut vacancies = Vec::with_capacity(items.len());
    for item in items {
        let Value::Object(item) = item else {
            warn!("skipping non-object HeadHunter item");
            continue;
        };

        let text_field = |primary: &str, fallback: &str| {
            item.get(primary)
                .or_else(|| item.get(fallback))
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };

        let salary = item
            .get("salary")
            .and_then(|salary| salary.get("from"))
            .and_then(Value::as_f64)
            .map(SalaryInput::Number);

        let description = item
            .get("snippet")
            .and_then(|snippet| snippet.get("requirement"))
            .and_then(Value::as_str)
            .map(|text| strip_markup(Some(text)));

        vacancies.push(RawVacancy {
            title: text_field("name", "title"),
            link: text_field("alternate_url", "link"),
            salary,
            description,
        });
    }

    Ok(vacancies)
}
