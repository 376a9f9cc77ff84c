use anyhow::{Context, Result};
use futures::try_join;
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::config::Config;
use crate::models::{CountyRecord, Dataset};
use crate::topo::{self, Topology};

/// Fetches the two public datasets and derives the boundary geometry.
pub struct DataClient {
    client: Client,
    education_url: String,
    counties_url: String,
}

impl DataClient {
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::new(),
            education_url: config.education_url.clone(),
            counties_url: config.counties_url.clone(),
        }
    }

    /// Loads everything the dashboard needs. On any failure (network,
    /// malformed JSON, missing topology objects) this notifies the user and
    /// hands back an empty dataset; callers must treat that as "no data"
    /// and skip rendering. No retry, no partial success.
    pub async fn load(&self) -> Dataset {
        match self.try_load().await {
            Ok(dataset) => dataset,
            Err(e) => {
                eprintln!("❌ Failed to load dashboard data: {:#}", e);
                eprintln!("   Check your Internet connection and try again.");
                Dataset::empty()
            }
        }
    }

    async fn try_load(&self) -> Result<Dataset> {
        println!("📊 Loading county data...");
        let (records, topology) = try_join!(self.fetch_education(), self.fetch_topology())?;

        let counties = topo::feature_collection(&topology, "counties")?;
        let states = topo::feature_collection(&topology, "states")?;
        let state_borders = topo::mesh(&topology, "states")?;

        println!(
            "✅ Loaded {} county records, {} county shapes, {} states",
            records.len(),
            counties.len(),
            states.len()
        );

        Ok(Dataset {
            records,
            counties,
            states,
            state_borders,
        })
    }

    async fn fetch_education(&self) -> Result<Vec<CountyRecord>> {
        self.fetch_json(&self.education_url).await
    }

    async fn fetch_topology(&self) -> Result<Topology> {
        self.fetch_json(&self.counties_url).await
    }

    async fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", url))?;

        let status = response.status();
        let text = response.text().await.context("Failed to get response text")?;

        if !status.is_success() {
            anyhow::bail!("Request to {} failed: {} - {}", url, status, text);
        }

        serde_json::from_str(&text).with_context(|| format!("Failed to parse response from {}", url))
    }
}
