//! Apache Drill REST client.
//!
//! Drill must be running on the configured host and port to allow querying
//! of parquet data. Availability is probed before query submission so an
//! unreachable engine is reported distinctly from a rejected statement.
//! Neither condition is retried.

use crate::config::EngineConfig;
use crate::error::{Result, WeatherError};
use crate::query::{QueryEngine, QueryResults};
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

/// Query client against the Drill REST API
#[derive(Debug, Clone)]
pub struct DrillEngine {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct DrillQuery<'a> {
    #[serde(rename = "queryType")]
    query_type: &'a str,
    query: &'a str,
}

impl DrillEngine {
    /// Build a client with the configured call timeout
    pub fn new(config: &EngineConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                WeatherError::configuration(format!("failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            base_url: config.base_url(),
            client,
        })
    }

    fn unavailable(&self, reason: impl Into<String>) -> WeatherError {
        WeatherError::EngineUnavailable {
            url: self.base_url.clone(),
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl QueryEngine for DrillEngine {
    async fn ensure_available(&self) -> Result<()> {
        let url = format!("{}/status", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.unavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(self.unavailable(format!(
                "status endpoint returned HTTP {}",
                response.status()
            )));
        }
        debug!("Drill is active at {}", self.base_url);
        Ok(())
    }

    async fn execute(&self, sql: &str) -> Result<QueryResults> {
        let url = format!("{}/query.json", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&DrillQuery {
                query_type: "SQL",
                query: sql,
            })
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    self.unavailable(e.to_string())
                } else {
                    WeatherError::query(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WeatherError::query(format!(
                "engine rejected the statement with HTTP {status}: {body}"
            )));
        }

        response
            .json::<QueryResults>()
            .await
            .map_err(|e| WeatherError::query(format!("malformed engine response: {e}")))
    }
}
