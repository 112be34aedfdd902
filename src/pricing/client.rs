//! HTTP client for the remote pricing authority.

use crate::config::Config;
use crate::pricing::models::{PriceQuote, QuoteRequest};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info};
use wreq::Client;
use wreq_util::Emulation;

/// Source of authoritative price quotes - enables mocking for tests.
#[async_trait]
pub trait PricingAuthority: Send + Sync {
    /// Fetches the quote for one listing and modifier set.
    async fn fetch(&self, request: &QuoteRequest) -> Result<PriceQuote>;
}

/// Pricing authority reached over HTTP, impersonating the browser that
/// normally issues these requests.
pub struct PricingClient {
    client: Client,
    base_url: String,
    price_path: String,
}

impl PricingClient {
    /// Creates a new client from the configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let mut builder = Client::builder()
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10));

        if let Some(proxy_url) = &config.proxy {
            debug!("Configuring proxy: {}", proxy_url);
            let proxy = wreq::Proxy::all(proxy_url).context("Failed to configure proxy")?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            price_path: config.price_path.clone(),
        })
    }

    /// Builds the full quote URL with query parameters.
    fn quote_url(&self, request: &QuoteRequest) -> String {
        format!(
            "{}{}?id={}&wordCount={}&express={}&packOrderId={}",
            self.base_url,
            self.price_path,
            urlencoding::encode(&request.site_id),
            request.word_count,
            request.express,
            urlencoding::encode(request.pack_order_id.as_deref().unwrap_or_default()),
        )
    }

    async fn get(&self, url: &str) -> Result<String> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .emulation(Emulation::Chrome131)
            .header("Accept", "application/json, text/javascript, */*; q=0.01")
            .header("X-Requested-With", "XMLHttpRequest")
            .header("Cache-Control", "no-cache")
            .send()
            .await
            .context("Failed to send request")?;

        let status = response.status();
        debug!("Response status: {}", status);

        if !status.is_success() {
            anyhow::bail!("Pricing request failed with status: {}", status);
        }

        response.text().await.context("Failed to read response body")
    }
}

#[async_trait]
impl PricingAuthority for PricingClient {
    async fn fetch(&self, request: &QuoteRequest) -> Result<PriceQuote> {
        let url = self.quote_url(request);

        info!(
            "Fetching quote for site {} ({} extra words, express: {})",
            request.site_id, request.word_count, request.express
        );
        let body = self.get(&url).await?;

        serde_json::from_str(&body).context("Failed to decode price quote")
    }
}
