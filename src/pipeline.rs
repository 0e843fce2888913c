use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::WatchConfig;
use crate::evaluator::below_threshold;
use crate::extractor::ProductExtractor;
use crate::fetcher::PageFetcher;
use crate::notify::{format_message, NotificationChannel};
use crate::utils::error::Result;

/// Outcome of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub extracted: usize,
    pub flagged: usize,
    pub notified: bool,
}

/// One-shot fetch → extract → evaluate → notify pipeline. No state survives
/// a run; recurring execution belongs to an external trigger such as cron.
pub struct PriceWatch {
    fetcher: PageFetcher,
    extractor: ProductExtractor,
    watch: WatchConfig,
}

impl PriceWatch {
    pub fn new(watch: WatchConfig, timeout: Duration) -> Result<Self> {
        Ok(Self {
            fetcher: PageFetcher::new(timeout)?,
            extractor: ProductExtractor::new(&watch)?,
            watch,
        })
    }

    /// A fetch failure aborts the run. Extraction and evaluation only narrow
    /// the product set. A delivery failure is logged and the run still
    /// completes; a config-class failure in the notify stage stays fatal.
    pub async fn run(&self, channel: &dyn NotificationChannel) -> Result<RunSummary> {
        info!(url = %self.watch.source_url, "fetching");
        let html = self.fetcher.fetch(&self.watch.source_url).await?;

        info!("extracting");
        let products = self.extractor.extract(&html);

        info!(extracted = products.len(), threshold = %self.watch.price_threshold, "evaluating");
        let extracted = products.len();
        let flagged = below_threshold(products, self.watch.price_threshold);

        if flagged.is_empty() {
            info!("no products below threshold, nothing to send");
            return Ok(RunSummary { extracted, flagged: 0, notified: false });
        }

        if let Ok(json) = serde_json::to_string(&flagged) {
            debug!(products = %json, "qualifying products");
        }

        let message = format_message(&flagged);
        info!(channel = channel.name(), flagged = flagged.len(), "notifying");

        let notified = match channel.send(&message).await {
            Ok(()) => true,
            Err(e) if e.is_config() => return Err(e),
            Err(e) => {
                warn!(error = %e, "notification delivery failed, run completes anyway");
                false
            }
        };

        Ok(RunSummary { extracted, flagged: flagged.len(), notified })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WatchConfig;
    use crate::utils::error::AppError;
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use std::sync::Mutex;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Records every message handed to `send`.
    struct RecordingChannel {
        calls: Mutex<Vec<String>>,
        fail_with: Option<fn() -> AppError>,
    }

    impl RecordingChannel {
        fn new() -> Self {
            Self { calls: Mutex::new(Vec::new()), fail_with: None }
        }
    }

    #[async_trait]
    impl NotificationChannel for RecordingChannel {
        fn name(&self) -> &str {
            "recording"
        }

        async fn send(&self, message: &str) -> crate::Result<()> {
            self.calls.lock().unwrap().push(message.to_string());
            match self.fail_with {
                Some(make) => Err(make()),
                None => Ok(()),
            }
        }
    }

    fn watch_config(url: String, threshold: u32) -> WatchConfig {
        WatchConfig {
            source_url: url,
            item_selector: ".product-item-info".to_string(),
            name_selector: "a.product-item-link".to_string(),
            photo_selector: "img.product-image-photo".to_string(),
            photo_attr: "src".to_string(),
            price_selector: "span.price".to_string(),
            price_threshold: Decimal::from(threshold),
            currency_symbol: "$".to_string(),
        }
    }

    async fn serve_listing(html: &str) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(html.to_string()))
            .mount(&server)
            .await;
        server
    }

    const LISTING: &str = r#"
        <div class="product-item-info">
            <img class="product-image-photo" src="aero.jpg">
            <a class="product-item-link">Aero</a>
            <span class="price">$200.00</span>
        </div>
        <div class="product-item-info">
            <img class="product-image-photo" src="zed.jpg">
            <a class="product-item-link">Zed</a>
            <span class="price">$140.00</span>
        </div>
    "#;

    #[tokio::test]
    async fn test_send_never_called_when_nothing_qualifies() {
        let server = serve_listing(LISTING).await;
        let pipeline =
            PriceWatch::new(watch_config(server.uri(), 100), Duration::from_secs(5)).unwrap();
        let channel = RecordingChannel::new();

        let summary = pipeline.run(&channel).await.unwrap();

        assert_eq!(summary, RunSummary { extracted: 2, flagged: 0, notified: false });
        assert!(channel.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_send_called_once_with_formatted_message() {
        let server = serve_listing(LISTING).await;
        let pipeline =
            PriceWatch::new(watch_config(server.uri(), 158), Duration::from_secs(5)).unwrap();
        let channel = RecordingChannel::new();

        let summary = pipeline.run(&channel).await.unwrap();

        assert_eq!(summary, RunSummary { extracted: 2, flagged: 1, notified: true });
        let calls = channel.calls.lock().unwrap();
        assert_eq!(calls.as_slice(), ["Zed-($140)"]);
    }

    #[tokio::test]
    async fn test_delivery_failure_does_not_fail_the_run() {
        let server = serve_listing(LISTING).await;
        let pipeline =
            PriceWatch::new(watch_config(server.uri(), 158), Duration::from_secs(5)).unwrap();
        let channel = RecordingChannel {
            calls: Mutex::new(Vec::new()),
            fail_with: Some(|| AppError::Delivery("gateway down".to_string())),
        };

        let summary = pipeline.run(&channel).await.unwrap();
        assert_eq!(summary, RunSummary { extracted: 2, flagged: 1, notified: false });
    }

    #[tokio::test]
    async fn test_missing_credentials_stay_fatal_in_notify_stage() {
        let server = serve_listing(LISTING).await;
        let pipeline =
            PriceWatch::new(watch_config(server.uri(), 158), Duration::from_secs(5)).unwrap();
        let channel = RecordingChannel {
            calls: Mutex::new(Vec::new()),
            fail_with: Some(|| AppError::MissingEnv("API_KEY")),
        };

        let err = pipeline.run(&channel).await.unwrap_err();
        assert!(matches!(err, AppError::MissingEnv("API_KEY")));
    }

    #[tokio::test]
    async fn test_fetch_failure_aborts_before_notification() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let pipeline =
            PriceWatch::new(watch_config(server.uri(), 158), Duration::from_secs(5)).unwrap();
        let channel = RecordingChannel::new();

        let err = pipeline.run(&channel).await.unwrap_err();
        assert!(matches!(err, AppError::HttpStatus { status: 500, .. }));
        assert!(channel.calls.lock().unwrap().is_empty());
    }
}
