//! Client for the browser-automation sidecar that logs into the booking site
//! and drops reservation snapshots into the cache directory. The sidecar owns
//! the whole scraping protocol; this client only checks driver health and
//! requests a search.

use anyhow::Context;
use async_trait::async_trait;
use serde_json::json;

/// Asks an external service to produce a snapshot for `(date, building)`.
/// `date` uses the booking site's `YYYY/MM/DD` form.
#[async_trait]
pub trait SnapshotFetcher: Send + Sync {
    async fn fetch(&self, date: &str, building_code: &str) -> anyhow::Result<()>;
}

pub struct ScraperClient {
    url: String,
    client: reqwest::Client,
}

impl ScraperClient {
    pub fn new(url: String) -> Self {
        Self {
            url,
            client: reqwest::Client::new(),
        }
    }

    /// Initialize the browser driver unless it is already active.
    async fn ensure_ready(&self) -> anyhow::Result<()> {
        let active = match self
            .client
            .get(format!("{}/driver_status", self.url))
            .send()
            .await
        {
            Ok(resp) => {
                let data: serde_json::Value = resp
                    .json()
                    .await
                    .context("failed to parse driver status response")?;
                data["status"].as_str() == Some("active")
            }
            Err(_) => false,
        };

        if !active {
            self.client
                .post(format!("{}/initialize_driver", self.url))
                .send()
                .await
                .context("failed to initialize scraper driver")?;
        }
        Ok(())
    }
}

#[async_trait]
impl SnapshotFetcher for ScraperClient {
    async fn fetch(&self, date: &str, building_code: &str) -> anyhow::Result<()> {
        self.ensure_ready().await?;

        tracing::info!(date, building_code, "requesting reservation scrape");
        let body = json!({
            "start_date": date,
            "end_date": date,
            "building_code": building_code,
        });
        let resp = self
            .client
            .post(format!("{}/search", self.url))
            .json(&body)
            .send()
            .await
            .context("failed to request scrape from sidecar")?;

        if !resp.status().is_success() {
            anyhow::bail!("scraper sidecar returned status {}", resp.status());
        }
        Ok(())
    }
}
