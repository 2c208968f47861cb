use serde_json::Value;
use tracing::warn;

use super::{Extractor, Listing};
use crate::fetch::RawResponse;

/// JSON API strategy: walks `data[].attributes` of a search response
/// and projects the fixed field set out of each item.
pub struct ApiExtractor;

impl Extractor for ApiExtractor {
    fn extract(&self, raw: &RawResponse) -> Vec<Listing> {
        let parsed: Value = match serde_json::from_str(&raw.body) {
            Ok(v) => v,
            Err(e) => {
                warn!("Response is not valid JSON: {}", e);
                return Vec::new();
            }
        };
        let items = match parsed.get("data").and_then(Value::as_array) {
            Some(arr) => arr,
            None => {
                warn!("Response has no `data` array");
                return Vec::new();
            }
        };
        items
            .iter()
            .filter_map(|item| match listing_from_item(item) {
                Ok(listing) => Some(listing),
                Err(missing) => {
                    warn!("Skipping item, missing or invalid field: {}", missing);
                    None
                }
            })
            .collect()
    }
}

/// Project one search item into a `Listing`. `Err` names the key that
/// was absent or had the wrong shape.
fn listing_from_item(item: &Value) -> Result<Listing, String> {
    let attrs = item.get("attributes").ok_or("attributes")?;
    let brand_name = attrs
        .get("make_name")
        .and_then(Value::as_str)
        .ok_or("attributes.make_name")?
        .to_string();
    let model_name = attrs
        .get("model_name")
        .and_then(Value::as_str)
        .ok_or("attributes.model_name")?
        .to_string();
    let price = attrs
        .get("price")
        .and_then(price_value)
        .ok_or("attributes.price")?;
    let manufactured_year = attrs
        .get("manufactured_year")
        .and_then(Value::as_i64)
        .ok_or("attributes.manufactured_year")? as i32;
    let mileage = attrs
        .get("mileage")
        .and_then(mileage_range)
        .ok_or("attributes.mileage")?;
    Ok(Listing {
        brand_name,
        model_name,
        price,
        manufactured_year,
        mileage,
    })
}

/// Price arrives either as a JSON number or as a decorated string.
fn price_value(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => super::parse_price(s),
        _ => None,
    }
}

/// Mileage is a `{gte, lte}` range, joined as "gte - lte".
fn mileage_range(v: &Value) -> Option<String> {
    let gte = scalar_text(v.get("gte")?)?;
    let lte = scalar_text(v.get("lte")?)?;
    Some(format!("{} - {}", gte, lte))
}

fn scalar_text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

// ── Tests ──
