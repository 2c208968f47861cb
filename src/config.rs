use std::path::PathBuf;
use std::str::FromStr;

const API_ENDPOINT: &str = "https://search.mudah.my/v1/search";
const HTML_BASE_URL: &str = "https://www.mudah.my/malaysia/cars-for-sale";
const CAR_CATEGORY: u32 = 1020;
const PAGE_SIZE: usize = 50; // API accepts up to 200 per request
const MAX_RECORDS: usize = 200;
const MAX_PAGES: usize = 25;
const OUTPUT_PATH: &str = "data.csv";
const DB_PATH: &str = "data/cars.sqlite";

/// Runtime configuration, passed explicitly to each component.
/// Defaults mirror the public listing endpoints; every value can be
/// overridden via a `MUDAH_*` environment variable.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_endpoint: String,
    pub html_base_url: String,
    pub category: u32,
    pub page_size: usize,
    pub max_records: usize,
    pub max_pages: usize,
    pub output_path: PathBuf,
    pub db_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_endpoint: API_ENDPOINT.to_string(),
            html_base_url: HTML_BASE_URL.to_string(),
            category: CAR_CATEGORY,
            page_size: PAGE_SIZE,
            max_records: MAX_RECORDS,
            max_pages: MAX_PAGES,
            output_path: PathBuf::from(OUTPUT_PATH),
            db_path: PathBuf::from(DB_PATH),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Ok(v) = std::env::var("MUDAH_API_ENDPOINT") {
            cfg.api_endpoint = v;
        }
        if let Ok(v) = std::env::var("MUDAH_HTML_URL") {
            cfg.html_base_url = v;
        }
        if let Some(v) = env_parse("MUDAH_CATEGORY") {
            cfg.category = v;
        }
        if let Some(v) = env_parse("MUDAH_PAGE_SIZE") {
            cfg.page_size = v;
        }
        if let Some(v) = env_parse("MUDAH_MAX_RECORDS") {
            cfg.max_records = v;
        }
        if let Some(v) = env_parse("MUDAH_MAX_PAGES") {
            cfg.max_pages = v;
        }
        if let Ok(v) = std::env::var("MUDAH_OUTPUT_PATH") {
            cfg.output_path = PathBuf::from(v);
        }
        if let Ok(v) = std::env::var("MUDAH_DB_PATH") {
            cfg.db_path = PathBuf::from(v);
        }
        cfg
    }
}

fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}
