pub mod api;
pub mod html;

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::fetch::RawResponse;

static NUMERIC_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-?\d+(?:\.\d+)?").unwrap());

/// One normalized car listing. Field order here is the CSV column
/// order, and both strategies must fill every field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub brand_name: String,
    pub model_name: String,
    pub price: f64,
    pub manufactured_year: i32,
    pub mileage: String,
}

impl Listing {
    pub const FIELDS: [&'static str; 5] = [
        "brand_name",
        "model_name",
        "price",
        "manufactured_year",
        "mileage",
    ];
}

/// Extraction strategy: one raw page in, zero or more listings out.
/// A malformed item is skipped with a warning, never fatal to the page.
/// Extraction is pure: the same response always yields the same rows.
pub trait Extractor {
    fn extract(&self, raw: &RawResponse) -> Vec<Listing>;
}

/// Numeric parse after stripping currency symbols and digit grouping:
/// "RM 39,800" → 39800.0, "$10.00" → 10.0
pub fn parse_price(text: &str) -> Option<f64> {
    let cleaned = text.replace(',', "");
    NUMERIC_RE.find(&cleaned)?.as_str().parse().ok()
}

pub fn parse_year(text: &str) -> Option<i32> {
    NUMERIC_RE.find(text.trim())?.as_str().parse().ok()
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_strips_currency_and_grouping() {
        assert_eq!(parse_price("RM 39,800"), Some(39800.0));
        assert_eq!(parse_price("$10.00"), Some(10.0));
        assert_eq!(parse_price("52000"), Some(52000.0));
        assert_eq!(parse_price("free"), None);
    }

    #[test]
    fn year_parses_digits() {
        assert_eq!(parse_year(" 2015 "), Some(2015));
        assert_eq!(parse_year("unknown"), None);
    }
}
