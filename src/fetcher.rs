use std::time::Duration;

use tracing::debug;

use crate::utils::error::{AppError, Result};

/// Retrieves the raw listing HTML. One GET per run, bounded timeout,
/// no retries.
pub struct PageFetcher {
    client: reqwest::Client,
}

impl PageFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("pricewatch/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    /// A transport failure or timeout surfaces as `AppError::Http`, a non-2xx
    /// response as `AppError::HttpStatus`. Both abort the run.
    pub async fn fetch(&self, url: &str) -> Result<String> {
        debug!(url, "fetching listing page");
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.text().await?)
    }
}
