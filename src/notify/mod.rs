pub mod email;
pub mod sms;

use async_trait::async_trait;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::Product;
use crate::utils::error::Result;

pub use email::EmailChannel;
pub use sms::SmsChannel;

/// A delivery channel for one already-formatted alert message. Channels
/// validate their own credentials at send time, so a run that flags nothing
/// never touches them.
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    fn name(&self) -> &str;

    async fn send(&self, message: &str) -> Result<()>;
}

/// One line per product, `{name}-(${price})` with the price rounded to the
/// nearest integer (midpoints away from zero), joined by single newlines.
/// An empty slice formats to the empty string.
pub fn format_message(products: &[Product]) -> String {
    products
        .iter()
        .map(|p| format!("{}-(${})", p.name, round_price(p.price)))
        .collect::<Vec<_>>()
        .join("\n")
}

fn round_price(price: Decimal) -> Decimal {
    price
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .normalize()
}
