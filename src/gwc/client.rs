use crate::config::GwcConfig;
use crate::error::FetchError;
use reqwest::{Client as HttpClient, StatusCode};
use std::time::Duration;

use super::rules::Schema;
use super::snapshot::{Scrape, Snapshot};

/// Retrieves the GeoWebCache status page.
pub struct Client {
    http_client: HttpClient,
    target_url: String,
    timeout: Duration,
}

impl Client {
    pub fn new(config: GwcConfig) -> Self {
        let timeout = config.scrape_timeout();
        Self {
            http_client: HttpClient::new(),
            target_url: config.target_url,
            timeout,
        }
    }

    pub fn target_url(&self) -> &str {
        &self.target_url
    }

    /// Issues a single GET bounded by the configured timeout.
    ///
    /// The timeout covers connecting, sending and reading the whole body. Only a
    /// 200 response counts as success.
    pub async fn fetch(&self) -> Result<String, FetchError> {
        let response = self
            .http_client
            .get(&self.target_url)
            .header("user-agent", "reqwest")
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| FetchError::from_send(e, self.timeout))?;

        if response.status() != StatusCode::OK {
            return Err(FetchError::status(response.status()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::from_body(e, self.timeout))?;
        Ok(String::from_utf8_lossy(&body).into_owned())
    }

    /// Fetches the page and builds a snapshot from it.
    ///
    /// Fetch failures are logged here and reported to the caller only as
    /// [`Scrape::Down`]; extraction is skipped entirely in that case.
    pub async fn scrape(&self, schema: &Schema) -> Scrape {
        match self.fetch().await {
            Ok(body) => Scrape::Up(Snapshot::from_page(schema, &body)),
            Err(e) => {
                tracing::warn!(target_url = %self.target_url, error = %e, "gwc scrape failed");
                Scrape::Down
            }
        }
    }
}
