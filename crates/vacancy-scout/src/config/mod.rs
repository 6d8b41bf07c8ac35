use std::env;
use std::fmt;
use std::path::PathBuf;

const DEFAULT_STORE_PATH: &str = "data/vacancies.json";
const DEFAULT_API_URL: &str = "https://api.hh.ru/vacancies";
const MAX_PER_PAGE: u32 = 100;

/// Distinguishes runtime behavior for different stages of the tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub store: StoreConfig,
    pub source: SourceConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let store_path = env::var("VACANCY_STORE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_STORE_PATH));

        let base_url = env::var("HH_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let per_page = env::var("HH_PER_PAGE")
            .unwrap_or_else(|_| MAX_PER_PAGE.to_string())
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|value| (1..=MAX_PER_PAGE).contains(value))
            .ok_or(ConfigError::InvalidPerPage)?;
        let only_with_salary = match env::var("HH_ONLY_WITH_SALARY") {
            Ok(raw) => parse_flag(&raw).ok_or(ConfigError::InvalidFlag {
                name: "HH_ONLY_WITH_SALARY",
                value: raw,
            })?,
            Err(_) => true,
        };
        let user_agent = env::var("HH_USER_AGENT")
            .unwrap_or_else(|_| format!("vacancy-scout/{}", env!("CARGO_PKG_VERSION")));

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            store: StoreConfig { path: store_path },
            source: SourceConfig {
                base_url,
                per_page,
                only_with_salary,
                user_agent,
            },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Location of the posting file.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub path: PathBuf,
}

/// HeadHunter search settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    pub base_url: String,
    pub per_page: u32,
    pub only_with_salary: bool,
    pub user_agent: String,
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPerPage,
    InvalidFlag { name: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPerPage => {
                write!(f, "HH_PER_PAGE must be a whole number between 1 and {MAX_PER_PAGE}")
            }
            ConfigError::InvalidFlag { name, value } => {
                write!(f, "{name} must be true or false, got '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
