use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One product row scraped from the listing page. Built only by the
/// extractor and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    pub photo_url: String,
    pub price: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_product_equality_ignores_decimal_scale() {
        let a = Product {
            name: "Spirit of St. Louis".to_string(),
            photo_url: "https://cdn.example.com/sosl.jpg".to_string(),
            price: Decimal::from_str("140.00").unwrap(),
        };
        let b = Product {
            price: Decimal::from_str("140").unwrap(),
            ..a.clone()
        };
        assert_eq!(a, b);
    }

    #[test]
    fn test_product_serializes_price_as_decimal_string() {
        let product = Product {
            name: "Aero".to_string(),
            photo_url: "https://cdn.example.com/aero.jpg".to_string(),
            price: Decimal::from_str("99.60").unwrap(),
        };
        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["price"], "99.60");
        assert_eq!(json["name"], "Aero");
    }
}
