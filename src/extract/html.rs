use scraper::{ElementRef, Html, Selector};
use tracing::warn;

use super::{Extractor, Listing};
use crate::error::PipelineError;
use crate::fetch::RawResponse;

/// CSS selectors locating the repeated listing nodes and, within each
/// node, every field of the record schema.
#[derive(Debug, Clone)]
pub struct SelectorSchema {
    pub item: String,
    pub brand: String,
    pub model: String,
    pub price: String,
    pub year: String,
    pub mileage: String,
}

impl Default for SelectorSchema {
    fn default() -> Self {
        // Rendered listing cards on the cars-for-sale pages.
        Self {
            item: "div.listing-item".into(),
            brand: "span.listing-brand".into(),
            model: "span.listing-model".into(),
            price: "span.listing-price".into(),
            year: "span.listing-year".into(),
            mileage: "span.listing-mileage".into(),
        }
    }
}

/// HTML strategy: an item selector locates repeated listing nodes,
/// per-field sub-selectors pull out each value, and text is trimmed
/// and coerced to the declared type.
pub struct HtmlExtractor {
    item: Selector,
    brand: Selector,
    model: Selector,
    price: Selector,
    year: Selector,
    mileage: Selector,
}

impl HtmlExtractor {
    pub fn new(schema: &SelectorSchema) -> Result<Self, PipelineError> {
        Ok(Self {
            item: parse_selector(&schema.item)?,
            brand: parse_selector(&schema.brand)?,
            model: parse_selector(&schema.model)?,
            price: parse_selector(&schema.price)?,
            year: parse_selector(&schema.year)?,
            mileage: parse_selector(&schema.mileage)?,
        })
    }

    fn listing_from_node(&self, node: &ElementRef) -> Result<Listing, &'static str> {
        let brand_name = field_text(node, &self.brand).ok_or("brand_name")?;
        let model_name = field_text(node, &self.model).ok_or("model_name")?;
        let price_text = field_text(node, &self.price).ok_or("price")?;
        let price = super::parse_price(&price_text).ok_or("price")?;
        let year_text = field_text(node, &self.year).ok_or("manufactured_year")?;
        let manufactured_year = super::parse_year(&year_text).ok_or("manufactured_year")?;
        let mileage = field_text(node, &self.mileage).ok_or("mileage")?;
        Ok(Listing {
            brand_name,
            model_name,
            price,
            manufactured_year,
            mileage,
        })
    }
}

impl Extractor for HtmlExtractor {
    fn extract(&self, raw: &RawResponse) -> Vec<Listing> {
        let doc = Html::parse_document(&raw.body);
        let mut rows = Vec::new();
        for node in doc.select(&self.item) {
            match self.listing_from_node(&node) {
                Ok(listing) => rows.push(listing),
                Err(field) => warn!("Skipping listing node, no match for field: {}", field),
            }
        }
        rows
    }
}

fn parse_selector(css: &str) -> Result<Selector, PipelineError> {
    Selector::parse(css)
        .map_err(|e| PipelineError::SchemaMismatch(format!("bad selector `{}`: {}", css, e)))
}

/// First sub-query match, text trimmed; empty text counts as no match.
fn field_text(node: &ElementRef, sel: &Selector) -> Option<String> {
    let el = node.select(sel).next()?;
    let text = el.text().collect::<String>().trim().to_string();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn test_schema() -> SelectorSchema {
        SelectorSchema {
            item: "div.item".into(),
            brand: "span.brand".into(),
            model: "span.model".into(),
            price: "span.price".into(),
            year: "span.year".into(),
            mileage: "span.mileage".into(),
        }
    }

    fn raw(body: &str) -> RawResponse {
        RawResponse {
            status: 200,
            body: body.to_string(),
        }
    }

    const TWO_ITEMS: &str = r#"<html><body>
        <div class="item">
            <span class="brand">Perodua</span>
            <span class="model">Myvi</span>
            <span class="price">RM 39,800</span>
            <span class="year">2015</span>
            <span class="mileage">60000 - 70000</span>
        </div>
        <div class="item">
            <span class="brand">Proton</span>
            <span class="model">Saga</span>
            <span class="price">RM 25,800</span>
            <span class="year">2019</span>
            <span class="mileage">40000 - 45000</span>
        </div>
    </body></html>"#;

    #[test]
    fn two_nodes_yield_two_records_in_document_order() {
        let ex = HtmlExtractor::new(&test_schema()).unwrap();
        let rows = ex.extract(&raw(TWO_ITEMS));
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].brand_name, "Perodua");
        assert_eq!(rows[0].price, 39800.0);
        assert_eq!(rows[1].brand_name, "Proton");
        assert_eq!(rows[1].manufactured_year, 2019);
    }

    #[test]
    fn missing_sub_query_skips_only_that_node() {
        let body = r#"<div class="item">
                <span class="brand">Honda</span>
                <span class="model">City</span>
                <span class="year">2018</span>
                <span class="mileage">0 - 5000</span>
            </div>
            <div class="item">
                <span class="brand">Toyota</span>
                <span class="model">Vios</span>
                <span class="price">RM 45,000</span>
                <span class="year">2020</span>
                <span class="mileage">5000 - 10000</span>
            </div>"#;
        let ex = HtmlExtractor::new(&test_schema()).unwrap();
        let rows = ex.extract(&raw(body));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].brand_name, "Toyota");
    }

    #[test]
    fn text_is_trimmed_and_coerced() {
        let body = r#"<div class="item">
                <span class="brand">  Nissan </span>
                <span class="model"> Almera</span>
                <span class="price"> RM 52,300.50 </span>
                <span class="year"> 2021 </span>
                <span class="mileage"> 10000 - 15000 </span>
            </div>"#;
        let ex = HtmlExtractor::new(&test_schema()).unwrap();
        let rows = ex.extract(&raw(body));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].brand_name, "Nissan");
        assert_eq!(rows[0].price, 52300.5);
        assert_eq!(rows[0].mileage, "10000 - 15000");
    }

    #[test]
    fn extraction_is_idempotent() {
        let ex = HtmlExtractor::new(&test_schema()).unwrap();
        let response = raw(TWO_ITEMS);
        assert_eq!(ex.extract(&response), ex.extract(&response));
    }

    #[test]
    fn page_without_items_yields_nothing() {
        let ex = HtmlExtractor::new(&test_schema()).unwrap();
        assert!(ex.extract(&raw("<html><body><p>empty</p></body></html>")).is_empty());
    }

    #[test]
    fn bad_selector_is_rejected() {
        let mut schema = test_schema();
        schema.item = "div..".into();
        assert!(matches!(
            HtmlExtractor::new(&schema),
            Err(PipelineError::SchemaMismatch(_))
        ));
    }
}
