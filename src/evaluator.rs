use rust_decimal::Decimal;

use crate::models::Product;

/// Keeps the products strictly below the threshold. A product priced exactly
/// at the threshold is not flagged. Order-preserving, duplicates pass through.
pub fn below_threshold(products: Vec<Product>, threshold: Decimal) -> Vec<Product> {
    products.into_iter().filter(|p| p.price < threshold).collect()
}
