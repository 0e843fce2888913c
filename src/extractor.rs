use std::str::FromStr;

use regex::Regex;
use rust_decimal::Decimal;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use crate::config::WatchConfig;
use crate::models::Product;
use crate::utils::error::{AppError, Result};

/// Selector-driven extraction of product records from an already-fetched
/// page. Pure: no network or I/O.
///
/// Items whose price field is absent or empty are skipped quietly (no active
/// discount on that node). Items whose price text is present but not parseable
/// are skipped with a warning. Neither case ever produces a zero-priced
/// product.
#[derive(Debug)]
pub struct ProductExtractor {
    item: Selector,
    name: Selector,
    photo: Selector,
    price: Selector,
    photo_attr: String,
    currency_symbol: String,
    price_regex: Regex,
}

impl ProductExtractor {
    pub fn new(config: &WatchConfig) -> Result<Self> {
        Ok(Self {
            item: parse_selector(&config.item_selector)?,
            name: parse_selector(&config.name_selector)?,
            photo: parse_selector(&config.photo_selector)?,
            price: parse_selector(&config.price_selector)?,
            photo_attr: config.photo_attr.clone(),
            currency_symbol: config.currency_symbol.clone(),
            // A whole price once the currency symbol is gone, tolerating
            // thousands separators.
            price_regex: Regex::new(r"^\d+(?:,\d{3})*(?:\.\d+)?$")
                .map_err(|e| AppError::Config(format!("price regex: {e}")))?,
        })
    }

    /// Walks every `item_selector` match in document order and yields one
    /// `Product` per node that carries a parseable price.
    pub fn extract(&self, html: &str) -> Vec<Product> {
        let document = Html::parse_document(html);
        let mut products = Vec::new();

        for item in document.select(&self.item) {
            let name = first_text(&item, &self.name);
            let photo_url = item
                .select(&self.photo)
                .next()
                .and_then(|el| el.value().attr(&self.photo_attr))
                .unwrap_or_default()
                .to_string();

            let raw_price = first_text(&item, &self.price);
            if raw_price.is_empty() {
                debug!(%name, "item has no price text, skipping");
                continue;
            }

            match self.parse_price(&raw_price) {
                Some(price) => products.push(Product { name, photo_url, price }),
                None => warn!(%name, %raw_price, "unparseable price text, skipping item"),
            }
        }

        products
    }

    fn parse_price(&self, raw: &str) -> Option<Decimal> {
        let cleaned = raw.replace(&self.currency_symbol, "");
        let cleaned = cleaned.trim();
        // Anything beyond a bare number means this was not a price field
        // after all.
        if !self.price_regex.is_match(cleaned) {
            return None;
        }
        Decimal::from_str(&cleaned.replace(',', "")).ok()
    }
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| AppError::Selector {
        selector: selector.to_string(),
        message: format!("{e:?}"),
    })
}

fn first_text(item: &ElementRef<'_>, selector: &Selector) -> String {
    item.select(selector)
        .next()
        .map(|el| el.text().collect::<Vec<_>>().join(" ").trim().to_string())
        .unwrap_or_default()
}
