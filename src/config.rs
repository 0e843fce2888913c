use std::env;
use std::str::FromStr;
use std::time::Duration;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::utils::error::{AppError, Result};

/// Defaults mirror the listing this watcher was originally written for.
const DEFAULT_WATCH_URL: &str =
    "https://www.armogan.com/us/all-watches-straps/watches/spirit-of-st-louis";
const DEFAULT_SMS_ENDPOINT: &str = "https://api.africastalking.com/version1/messaging";
const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";

/// What to scrape and what counts as a deal. Immutable for the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    pub source_url: String,
    pub item_selector: String,
    pub name_selector: String,
    pub photo_selector: String,
    /// Attribute read off the photo node, usually `src`.
    pub photo_attr: String,
    pub price_selector: String,
    pub price_threshold: Decimal,
    pub currency_symbol: String,
}

/// SMS gateway settings. Credentials are optional here and only required
/// once a notification is actually about to be dispatched.
#[derive(Debug, Clone)]
pub struct SmsSettings {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub username: Option<String>,
    pub recipient: Option<String>,
}

#[derive(Debug, Clone)]
pub struct EmailSettings {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub address: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelChoice {
    Sms,
    Email,
}

impl FromStr for ChannelChoice {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "sms" => Ok(ChannelChoice::Sms),
            "email" => Ok(ChannelChoice::Email),
            other => Err(AppError::Config(format!(
                "NOTIFY_CHANNEL must be 'sms' or 'email', got '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub watch: WatchConfig,
    pub channel: ChannelChoice,
    pub sms: SmsSettings,
    pub email: EmailSettings,
    pub http_timeout: Duration,
}

impl Settings {
    /// Reads the whole configuration surface from the environment. Structural
    /// values (URL, threshold, timeout, channel choice) are validated eagerly;
    /// channel credentials stay optional until first use.
    pub fn from_env() -> Result<Self> {
        let watch = WatchConfig {
            source_url: env_or("WATCH_URL", DEFAULT_WATCH_URL),
            item_selector: env_or("ITEM_SELECTOR", ".product-item-info"),
            name_selector: env_or("NAME_SELECTOR", "a.product-item-link"),
            photo_selector: env_or("PHOTO_SELECTOR", "img.product-image-photo"),
            photo_attr: env_or("PHOTO_ATTR", "src"),
            price_selector: env_or("PRICE_SELECTOR", "span.price"),
            price_threshold: parse_threshold(&env_or("PRICE_THRESHOLD", "225"))?,
            currency_symbol: env_or("CURRENCY_SYMBOL", "$"),
        };

        Url::parse(&watch.source_url)
            .map_err(|e| AppError::Config(format!("invalid WATCH_URL: {e}")))?;

        let channel = env_or("NOTIFY_CHANNEL", "sms").parse()?;

        let timeout_secs: u64 = env_or("HTTP_TIMEOUT_SECS", "10")
            .parse()
            .map_err(|e| AppError::Config(format!("invalid HTTP_TIMEOUT_SECS: {e}")))?;
        if timeout_secs == 0 {
            return Err(AppError::Config("HTTP_TIMEOUT_SECS must be greater than 0".into()));
        }

        let smtp_port: u16 = env_or("SMTP_PORT", "587")
            .parse()
            .map_err(|e| AppError::Config(format!("invalid SMTP_PORT: {e}")))?;

        Ok(Settings {
            watch,
            channel,
            sms: SmsSettings {
                endpoint: env_or("SMS_ENDPOINT", DEFAULT_SMS_ENDPOINT),
                api_key: env::var("API_KEY").ok(),
                username: env::var("USERNAME").ok(),
                recipient: env::var("RECIPIENT_NUMBER").ok(),
            },
            email: EmailSettings {
                smtp_host: env_or("SMTP_HOST", DEFAULT_SMTP_HOST),
                smtp_port,
                address: env::var("EMAIL_ADDRESS").ok(),
                password: env::var("EMAIL_PASSWORD").ok(),
            },
            http_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

/// Requires an optional credential at the point it is first needed.
pub fn require<'a>(value: &'a Option<String>, name: &'static str) -> Result<&'a str> {
    value.as_deref().ok_or(AppError::MissingEnv(name))
}

pub fn parse_threshold(raw: &str) -> Result<Decimal> {
    Decimal::from_str(raw.trim())
        .map_err(|e| AppError::Config(format!("invalid PRICE_THRESHOLD '{raw}': {e}")))
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
